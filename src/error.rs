//! Service error taxonomy
//!
//! One error type is shared by every service so both front ends translate
//! the same kinds. The propagation policy: the core never hides a store
//! failure behind a generic success, and the kind survives translation into
//! whatever status code a front end picks.

use crate::db::{DocumentId, StoreError};
use crate::services::token::TokenError;

/// Partial failure of a compound multi-collection write.
///
/// Each variant carries the id of the document orphaned by the failure so a
/// caller can retry the link step or clean up. The core never auto-retries
/// or auto-compensates.
#[derive(Debug, thiserror::Error)]
pub enum LinkageError {
    /// A blog was inserted but the ownership record write failed; the blog
    /// exists with no owner until the caller links or deletes it.
    #[error("blog {blog_id} was created but the ownership link failed: {reason}")]
    OwnershipLinkFailed { blog_id: DocumentId, reason: String },

    /// A comment was inserted but the blog's comment-id list could not be
    /// updated; the comment exists unlinked until the caller retries.
    #[error("comment {comment_id} was created but the blog link update failed: {reason}")]
    LinkUpdateFailed {
        comment_id: DocumentId,
        reason: String,
    },
}

/// Errors surfaced by the services layer.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Malformed id or missing/empty required field. Always a client error.
    #[error("{0}")]
    Validation(String),

    /// Constant-shape login failure, covering both "no such user" and
    /// "wrong password" so usernames cannot be enumerated.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// Token issuance or verification failure.
    #[error(transparent)]
    Auth(#[from] TokenError),

    /// The named entity does not exist. For deletes this is converted to a
    /// zero count instead.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Uniqueness violation (duplicate username). A client error.
    #[error("{0}")]
    Conflict(String),

    /// Partial failure of a compound write; carries the orphaned id.
    #[error(transparent)]
    Linkage(#[from] LinkageError),

    /// Underlying persistence failure, fatal to the current request.
    #[error("store failure: {0}")]
    Store(#[from] StoreError),

    /// Any other internal failure (e.g. password hashing).
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ServiceError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }
}
