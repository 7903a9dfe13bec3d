//! API middleware
//!
//! Contains the shared application state, the error-to-response mapping,
//! and the bearer-token authentication middleware.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::error::ServiceError;
use crate::services::{BlogService, CommentService, TokenAuthenticator, TokenError, UserService};

/// Name of the session cookie carrying the signed token.
pub const TOKEN_COOKIE: &str = "token";

/// Application state containing shared services
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserService>,
    pub blogs: Arc<BlogService>,
    pub comments: Arc<CommentService>,
    pub tokens: Arc<TokenAuthenticator>,
}

/// Token subject extracted from a verified request, attached as an
/// extension by [`require_auth`]. Holds the username the token was
/// issued for; handlers resolve it to a user row when they need one.
#[derive(Debug, Clone)]
pub struct AuthenticatedSubject(pub String);

/// Error response for API errors. Serializes as `{"Error": message}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "Error": self.message }))).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        let status = match &err {
            ServiceError::Validation(_) | ServiceError::Conflict(_) => StatusCode::BAD_REQUEST,
            ServiceError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ServiceError::Auth(TokenError::Signing(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ServiceError::Auth(_) => StatusCode::UNAUTHORIZED,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Linkage(_) | ServiceError::Store(_) | ServiceError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %err, "request failed");
        }

        Self::new(status, err.to_string())
    }
}

/// Extract the bearer token from the request, trying the Authorization
/// header first and falling back to the session cookie.
fn extract_token(request: &Request) -> Option<String> {
    if let Some(auth_header) = request.headers().get(header::AUTHORIZATION) {
        if let Ok(auth_str) = auth_header.to_str() {
            if let Some(token) = auth_str.strip_prefix("Bearer ") {
                return Some(token.to_string());
            }
        }
    }

    if let Some(cookie_header) = request.headers().get(header::COOKIE) {
        if let Ok(cookie_str) = cookie_header.to_str() {
            for cookie in cookie_str.split(';') {
                let cookie = cookie.trim();
                if let Some(token) = cookie.strip_prefix("token=") {
                    return Some(token.to_string());
                }
            }
        }
    }

    None
}

/// Authentication middleware
///
/// Verifies the token signature and expiry without touching the store;
/// the subject is attached for handlers that need the caller's identity.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token =
        extract_token(&request).ok_or_else(|| ApiError::unauthorized("missing auth token"))?;

    let subject = state
        .tokens
        .verify(&token)
        .map_err(|e| ApiError::from(ServiceError::Auth(e)))?;

    request
        .extensions_mut()
        .insert(AuthenticatedSubject(subject));
    Ok(next.run(request).await)
}
