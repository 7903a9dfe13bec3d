//! RPC method handlers
//!
//! One handler per method; each parses the request message, authorizes via
//! the token field where required, delegates to the shared services, and
//! shapes the reply around the response envelope.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use super::{ResponseStatus, RpcCode};
use crate::api::AppState;
use crate::error::ServiceError;
use crate::models::{Blog, Comment, RegisterInput, User};
use crate::services::LoginInput;

/// User payload in RPC replies. Carries no password digest.
#[derive(Debug, Serialize, Deserialize)]
pub struct RpcUser {
    pub id: String,
    pub name: String,
    pub description: String,
}

impl From<User> for RpcUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name,
            description: user.description,
        }
    }
}

/// Verify the token field of a request message, returning the subject.
fn authorize(state: &AppState, token: &str) -> Result<String, ResponseStatus> {
    if token.is_empty() {
        return Err(ResponseStatus::new(
            RpcCode::PermissionDenied,
            "missing auth token",
        ));
    }
    state
        .tokens
        .verify(token)
        .map_err(|e| ResponseStatus::from(&ServiceError::Auth(e)))
}

// ---- UserService ----

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub password: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub status: ResponseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<RpcUser>,
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Json<RegisterResponse> {
    let result = state
        .users
        .register(RegisterInput {
            name: req.name,
            password: req.password,
            description: req.description,
        })
        .await;

    Json(match result {
        Ok(user) => RegisterResponse {
            status: ResponseStatus::ok(),
            user: Some(user.into()),
        },
        Err(e) => RegisterResponse {
            status: ResponseStatus::from(&e),
            user: None,
        },
    })
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub name: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub status: ResponseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Json<LoginResponse> {
    let result = state
        .users
        .login(LoginInput {
            name: req.name,
            password: req.password,
        })
        .await;

    Json(match result {
        Ok(token) => LoginResponse {
            status: ResponseStatus::ok(),
            token: Some(token),
        },
        Err(e) => LoginResponse {
            status: ResponseStatus::from(&e),
            token: None,
        },
    })
}

/// Request carrying only the caller's token.
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    #[serde(default)]
    pub token: String,
}

/// Request addressing a document by id.
#[derive(Debug, Deserialize)]
pub struct ByIdRequest {
    #[serde(default)]
    pub token: String,
    pub id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GetAllUsersResponse {
    pub status: ResponseStatus,
    pub users: Vec<RpcUser>,
}

pub async fn get_all_users(
    State(state): State<AppState>,
    Json(req): Json<TokenRequest>,
) -> Json<GetAllUsersResponse> {
    if let Err(status) = authorize(&state, &req.token) {
        return Json(GetAllUsersResponse {
            status,
            users: Vec::new(),
        });
    }

    Json(match state.users.list().await {
        Ok(users) => GetAllUsersResponse {
            status: ResponseStatus::ok(),
            users: users.into_iter().map(RpcUser::from).collect(),
        },
        Err(e) => GetAllUsersResponse {
            status: ResponseStatus::from(&e),
            users: Vec::new(),
        },
    })
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GetUserByIdResponse {
    pub status: ResponseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<RpcUser>,
}

pub async fn get_user_by_id(
    State(state): State<AppState>,
    Json(req): Json<ByIdRequest>,
) -> Json<GetUserByIdResponse> {
    if let Err(status) = authorize(&state, &req.token) {
        return Json(GetUserByIdResponse { status, user: None });
    }

    Json(match state.users.get(&req.id).await {
        Ok(user) => GetUserByIdResponse {
            status: ResponseStatus::ok(),
            user: Some(user.into()),
        },
        Err(e) => GetUserByIdResponse {
            status: ResponseStatus::from(&e),
            user: None,
        },
    })
}

/// Reply for the delete methods; `deleted_count` is 0 when nothing matched.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub status: ResponseStatus,
    pub deleted_count: u64,
}

impl DeleteResponse {
    fn failed(status: ResponseStatus) -> Self {
        Self {
            status,
            deleted_count: 0,
        }
    }
}

pub async fn delete_user_by_id(
    State(state): State<AppState>,
    Json(req): Json<ByIdRequest>,
) -> Json<DeleteResponse> {
    if let Err(status) = authorize(&state, &req.token) {
        return Json(DeleteResponse::failed(status));
    }

    Json(match state.users.delete(&req.id).await {
        Ok(deleted_count) => DeleteResponse {
            status: ResponseStatus::ok(),
            deleted_count,
        },
        Err(e) => DeleteResponse::failed(ResponseStatus::from(&e)),
    })
}

// ---- BlogService ----

#[derive(Debug, Serialize, Deserialize)]
pub struct GetAllBlogsResponse {
    pub status: ResponseStatus,
    pub blogs: Vec<Blog>,
}

/// List the caller's blogs, scoped by the token subject through the
/// ownership join.
pub async fn get_all_blogs(
    State(state): State<AppState>,
    Json(req): Json<TokenRequest>,
) -> Json<GetAllBlogsResponse> {
    let subject = match authorize(&state, &req.token) {
        Ok(subject) => subject,
        Err(status) => {
            return Json(GetAllBlogsResponse {
                status,
                blogs: Vec::new(),
            });
        }
    };

    Json(match state.blogs.list_for(&subject).await {
        Ok(blogs) => GetAllBlogsResponse {
            status: ResponseStatus::ok(),
            blogs,
        },
        Err(e) => GetAllBlogsResponse {
            status: ResponseStatus::from(&e),
            blogs: Vec::new(),
        },
    })
}

#[derive(Debug, Deserialize)]
pub struct InsertBlogRequest {
    #[serde(default)]
    pub token: String,
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InsertBlogResponse {
    pub status: ResponseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blog_id: Option<String>,
}

pub async fn insert_blog(
    State(state): State<AppState>,
    Json(req): Json<InsertBlogRequest>,
) -> Json<InsertBlogResponse> {
    let subject = match authorize(&state, &req.token) {
        Ok(subject) => subject,
        Err(status) => {
            return Json(InsertBlogResponse {
                status,
                blog_id: None,
            });
        }
    };

    Json(match state.blogs.publish(&subject, &req.content).await {
        Ok(blog) => InsertBlogResponse {
            status: ResponseStatus::ok(),
            blog_id: Some(blog.id.to_string()),
        },
        Err(e) => InsertBlogResponse {
            status: ResponseStatus::from(&e),
            blog_id: None,
        },
    })
}

pub async fn delete_blog_by_id(
    State(state): State<AppState>,
    Json(req): Json<ByIdRequest>,
) -> Json<DeleteResponse> {
    if let Err(status) = authorize(&state, &req.token) {
        return Json(DeleteResponse::failed(status));
    }

    Json(match state.blogs.delete(&req.id).await {
        Ok(deleted_count) => DeleteResponse {
            status: ResponseStatus::ok(),
            deleted_count,
        },
        Err(e) => DeleteResponse::failed(ResponseStatus::from(&e)),
    })
}

// ---- CommentService ----

#[derive(Debug, Deserialize)]
pub struct InsertCommentRequest {
    #[serde(default)]
    pub token: String,
    pub blog_id: String,
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InsertCommentResponse {
    pub status: ResponseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment_id: Option<String>,
}

pub async fn insert_comment_by_blog_id(
    State(state): State<AppState>,
    Json(req): Json<InsertCommentRequest>,
) -> Json<InsertCommentResponse> {
    if let Err(status) = authorize(&state, &req.token) {
        return Json(InsertCommentResponse {
            status,
            comment_id: None,
        });
    }

    Json(match state.comments.attach(&req.blog_id, &req.text).await {
        Ok(comment) => InsertCommentResponse {
            status: ResponseStatus::ok(),
            comment_id: Some(comment.id.to_string()),
        },
        Err(e) => InsertCommentResponse {
            status: ResponseStatus::from(&e),
            comment_id: None,
        },
    })
}

#[derive(Debug, Deserialize)]
pub struct DeleteCommentRequest {
    #[serde(default)]
    pub token: String,
    pub blog_id: String,
    pub comment_id: String,
}

pub async fn delete_comment(
    State(state): State<AppState>,
    Json(req): Json<DeleteCommentRequest>,
) -> Json<DeleteResponse> {
    if let Err(status) = authorize(&state, &req.token) {
        return Json(DeleteResponse::failed(status));
    }

    Json(
        match state.comments.detach(&req.blog_id, &req.comment_id).await {
            Ok(deleted_count) => DeleteResponse {
                status: ResponseStatus::ok(),
                deleted_count,
            },
            Err(e) => DeleteResponse::failed(ResponseStatus::from(&e)),
        },
    )
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GetAllCommentsResponse {
    pub status: ResponseStatus,
    pub comments: Vec<Comment>,
}

pub async fn get_all_comments(
    State(state): State<AppState>,
    Json(req): Json<TokenRequest>,
) -> Json<GetAllCommentsResponse> {
    if let Err(status) = authorize(&state, &req.token) {
        return Json(GetAllCommentsResponse {
            status,
            comments: Vec::new(),
        });
    }

    Json(match state.comments.list().await {
        Ok(comments) => GetAllCommentsResponse {
            status: ResponseStatus::ok(),
            comments,
        },
        Err(e) => GetAllCommentsResponse {
            status: ResponseStatus::from(&e),
            comments: Vec::new(),
        },
    })
}
