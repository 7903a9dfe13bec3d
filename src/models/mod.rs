//! Data models
//!
//! Entity structs persisted as documents through the store gateway, plus the
//! input types the services accept. The serde shape of each entity is
//! exactly the stored document shape; the `_id` field is store-assigned and
//! omitted from serialization while still nil.

mod blog;
mod comment;
mod ownership;
mod user;

pub use blog::Blog;
pub use comment::Comment;
pub use ownership::OwnershipRecord;
pub use user::{RegisterInput, User};
