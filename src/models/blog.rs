//! Blog model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::DocumentId;

/// A published blog post.
///
/// `comment_ids` is a denormalized cache of which comments belong to this
/// blog, maintained by the comment service through whole-array writes. Every
/// id in it must reference an existing comment document, and no comment is
/// referenced by more than one blog. Ownership is not stored here; it lives
/// in the `OwnershipRecord` join collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Blog {
    /// Store-assigned identifier
    #[serde(
        rename = "_id",
        default = "DocumentId::nil",
        skip_serializing_if = "DocumentId::is_nil"
    )]
    pub id: DocumentId,
    /// Post body
    pub content: String,
    /// Ordered ids of the comments attached to this blog
    pub comment_ids: Vec<DocumentId>,
    /// Publication timestamp
    pub published_at: DateTime<Utc>,
}

impl Blog {
    /// Build a not-yet-persisted blog with an empty comment list.
    pub fn new(content: String) -> Self {
        Self {
            id: DocumentId::nil(),
            content,
            comment_ids: Vec::new(),
            published_at: Utc::now(),
        }
    }
}
