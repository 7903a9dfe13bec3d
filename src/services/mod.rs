//! Services layer - business logic
//!
//! Services own the rules the routing layers delegate to:
//! - `credential`: password digesting and verification
//! - `token`: stateless signed session tokens
//! - `user`: registration, login, user CRUD
//! - `blog`: publish (with the ownership join) and owner-scoped listing
//! - `comment`: attaching/detaching comments to a blog's denormalized
//!   comment-id list
//!
//! The compound multi-collection writes live in `blog` and `comment`; their
//! partial-failure contracts are documented on the operations themselves.

pub mod blog;
pub mod comment;
pub mod credential;
pub mod token;
pub mod user;

pub use blog::BlogService;
pub use comment::CommentService;
pub use token::{TokenAuthenticator, TokenError};
pub use user::{LoginInput, UserService};

use crate::db::DocumentId;
use crate::error::ServiceError;

/// Parse a client-supplied id string, mapping malformed input to a
/// validation error (a client error, distinct from "not found").
pub(crate) fn parse_id(raw: &str) -> Result<DocumentId, ServiceError> {
    raw.parse()
        .map_err(|_| ServiceError::Validation(format!("invalid id '{raw}'")))
}
