//! User endpoints (authenticated).

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::api::middleware::{ApiError, AppState};
use crate::models::User;

/// Public view of a user. The password digest never leaves the service
/// layer through this type.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserView {
    pub id: String,
    pub name: String,
    pub description: String,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name,
            description: user.description,
        }
    }
}

/// Deletion result, reporting how many documents were removed.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteReply {
    #[serde(rename = "DeletedCount")]
    pub deleted_count: u64,
}

/// List all users
pub async fn list_users(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let users = state.users.list().await?;
    let views: Vec<UserView> = users.into_iter().map(UserView::from).collect();
    Ok(Json(json!({ "users": views })))
}

/// Get a user by id
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.users.get(&id).await?;
    Ok(Json(UserView::from(user)))
}

/// Delete a user by id
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted_count = state.users.delete(&id).await?;
    Ok(Json(DeleteReply { deleted_count }))
}
