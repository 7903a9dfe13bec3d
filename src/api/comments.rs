//! Comment endpoints (authenticated).

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::api::middleware::{ApiError, AppState};
use crate::api::users::DeleteReply;

#[derive(Debug, Deserialize)]
pub struct InsertCommentRequest {
    pub text: String,
}

/// List all comments
pub async fn list_comments(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let comments = state.comments.list().await?;
    Ok(Json(json!({ "comments": comments })))
}

/// Create a comment attached to the given blog
pub async fn insert_comment(
    State(state): State<AppState>,
    Path(blog_id): Path<String>,
    Json(req): Json<InsertCommentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let comment = state.comments.attach(&blog_id, &req.text).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

/// Unlink a comment from its blog and delete it
pub async fn delete_comment(
    State(state): State<AppState>,
    Path((blog_id, comment_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted_count = state.comments.detach(&blog_id, &comment_id).await?;
    Ok(Json(DeleteReply { deleted_count }))
}
