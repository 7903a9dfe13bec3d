//! Blog endpoints (authenticated).

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::api::middleware::{ApiError, AppState, AuthenticatedSubject};
use crate::api::users::DeleteReply;

#[derive(Debug, Deserialize)]
pub struct InsertBlogRequest {
    pub content: String,
}

/// List the caller's blogs, resolved through their ownership records.
pub async fn list_blogs(
    State(state): State<AppState>,
    Extension(subject): Extension<AuthenticatedSubject>,
) -> Result<impl IntoResponse, ApiError> {
    let blogs = state.blogs.list_for(&subject.0).await?;
    Ok(Json(json!({ "blogs": blogs })))
}

/// Publish a blog owned by the caller
pub async fn insert_blog(
    State(state): State<AppState>,
    Extension(subject): Extension<AuthenticatedSubject>,
    Json(req): Json<InsertBlogRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let blog = state.blogs.publish(&subject.0, &req.content).await?;
    Ok((StatusCode::CREATED, Json(blog)))
}

/// Delete a blog by id. Comments and ownership records referencing it
/// are left in place.
pub async fn delete_blog(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted_count = state.blogs.delete(&id).await?;
    Ok(Json(DeleteReply { deleted_count }))
}
