//! RPC front end
//!
//! Envelope-style RPC surface mirroring the REST API. Calls are HTTP POSTs
//! to `/{Service}/{Method}` paths with JSON bodies; the bearer token travels
//! as a `token` field in the request message instead of a cookie, and every
//! response embeds a `{status, message}` envelope with gRPC-numbered status
//! codes. Transport failures aside, the HTTP status is always 200; callers
//! inspect the envelope.
//!
//! Both front ends drive the same services, so the error kinds line up; only
//! the encoding differs.

pub mod handlers;

use axum::{routing::post, Router};
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

use crate::api::AppState;
use crate::error::ServiceError;
use crate::services::TokenError;

/// gRPC status code numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpcCode {
    Ok = 0,
    InvalidArgument = 3,
    NotFound = 5,
    AlreadyExists = 6,
    PermissionDenied = 7,
    Internal = 13,
}

/// Response envelope carried by every RPC reply.
#[derive(Debug, Serialize, Deserialize)]
pub struct ResponseStatus {
    pub status: u16,
    pub message: String,
}

impl ResponseStatus {
    pub fn ok() -> Self {
        Self::new(RpcCode::Ok, "ok")
    }

    pub fn new(code: RpcCode, message: impl Into<String>) -> Self {
        Self {
            status: code as u16,
            message: message.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == RpcCode::Ok as u16
    }
}

impl From<&ServiceError> for ResponseStatus {
    fn from(err: &ServiceError) -> Self {
        let code = match err {
            ServiceError::Validation(_) => RpcCode::InvalidArgument,
            ServiceError::InvalidCredentials => RpcCode::PermissionDenied,
            ServiceError::Auth(TokenError::Signing(_)) => RpcCode::Internal,
            ServiceError::Auth(_) => RpcCode::PermissionDenied,
            ServiceError::NotFound(_) => RpcCode::NotFound,
            ServiceError::Conflict(_) => RpcCode::AlreadyExists,
            ServiceError::Linkage(_) | ServiceError::Store(_) | ServiceError::Internal(_) => {
                RpcCode::Internal
            }
        };

        if code == RpcCode::Internal {
            tracing::error!(error = %err, "rpc call failed");
        }

        Self::new(code, err.to_string())
    }
}

/// Build the RPC router
pub fn build_rpc_router(state: AppState) -> Router {
    Router::new()
        .route("/UserService/Register", post(handlers::register))
        .route("/UserService/Login", post(handlers::login))
        .route("/UserService/GetAllUsers", post(handlers::get_all_users))
        .route("/UserService/GetUserById", post(handlers::get_user_by_id))
        .route(
            "/UserService/DeleteUserById",
            post(handlers::delete_user_by_id),
        )
        .route("/BlogService/GetAllBlogs", post(handlers::get_all_blogs))
        .route("/BlogService/InsertBlog", post(handlers::insert_blog))
        .route(
            "/BlogService/DeleteBlogById",
            post(handlers::delete_blog_by_id),
        )
        .route(
            "/CommentService/InsertCommentByBlogId",
            post(handlers::insert_comment_by_blog_id),
        )
        .route("/CommentService/DeleteComment", post(handlers::delete_comment))
        .route(
            "/CommentService/GetAllComments",
            post(handlers::get_all_comments),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
