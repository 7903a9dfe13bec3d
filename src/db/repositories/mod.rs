//! Typed repositories
//!
//! Repository pattern implementations over the document store gateway.
//! Each repository handles CRUD for one entity and owns the translation
//! between entity structs and stored JSON documents. Errors stay as typed
//! `StoreError`s so the services can preserve the error kind end to end.

pub mod blog;
pub mod comment;
pub mod ownership;
pub mod user;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::db::StoreError;

pub use blog::{BlogRepository, StoreBlogRepository};
pub use comment::{CommentRepository, StoreCommentRepository};
pub use ownership::{OwnershipRepository, StoreOwnershipRepository};
pub use user::{StoreUserRepository, UserRepository};

/// Encode an entity into a stored document.
fn encode<T: Serialize>(entity: &T) -> Result<Value, StoreError> {
    serde_json::to_value(entity).map_err(|e| StoreError::Encode(e.to_string()))
}

/// Decode a stored document back into an entity.
fn decode<T: DeserializeOwned>(collection: &str, doc: Value) -> Result<T, StoreError> {
    serde_json::from_value(doc).map_err(|e| StoreError::Decode {
        collection: collection.to_string(),
        message: e.to_string(),
    })
}
