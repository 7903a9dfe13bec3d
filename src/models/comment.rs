//! Comment model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::DocumentId;

/// A comment on a blog post.
///
/// Comments are created standalone and then linked into exactly one blog's
/// `comment_ids` list. The vote counters are plain attributes carried in the
/// document; no exposed operation mutates them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    /// Store-assigned identifier
    #[serde(
        rename = "_id",
        default = "DocumentId::nil",
        skip_serializing_if = "DocumentId::is_nil"
    )]
    pub id: DocumentId,
    /// Comment body
    pub text: String,
    /// Creation timestamp
    pub commented_at: DateTime<Utc>,
    /// Up-vote counter (never mutated by any exposed operation)
    pub up_votes: i64,
    /// Down-vote counter (never mutated by any exposed operation)
    pub down_votes: i64,
}

impl Comment {
    /// Build a not-yet-persisted comment with zeroed vote counters.
    pub fn new(text: String) -> Self {
        Self {
            id: DocumentId::nil(),
            text,
            commented_at: Utc::now(),
            up_votes: 0,
            down_votes: 0,
        }
    }
}
