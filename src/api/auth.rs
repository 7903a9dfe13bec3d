//! Authentication endpoints: register, login, logout.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::api::middleware::{ApiError, AppState, TOKEN_COOKIE};
use crate::api::users::UserView;
use crate::models::RegisterInput;
use crate::services::LoginInput;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub password: String,
    #[serde(default)]
    pub description: String,
}

/// Register a new user
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .users
        .register(RegisterInput {
            name: req.name,
            password: req.password,
            description: req.description,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(UserView::from(user))))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub name: String,
    pub password: String,
}

/// Log in and receive the session token as an HttpOnly cookie.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let token = state
        .users
        .login(LoginInput {
            name: req.name,
            password: req.password,
        })
        .await?;

    let cookie = format!(
        "{TOKEN_COOKIE}={token}; Path=/; Max-Age={}; HttpOnly",
        state.tokens.validity_secs()
    );

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(json!({ "message": "login successful" })),
    ))
}

/// Log out by expiring the session cookie. The token itself stays valid
/// until its expiry; there is no server-side session to revoke.
pub async fn logout() -> impl IntoResponse {
    let cookie = format!("{TOKEN_COOKIE}=; Path=/; Max-Age=0; HttpOnly");
    (
        [(header::SET_COOKIE, cookie)],
        Json(json!({ "message": "logged out" })),
    )
}
