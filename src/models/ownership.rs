//! Blog ownership join record

use serde::{Deserialize, Serialize};

use crate::db::DocumentId;

/// Join record associating a user with a blog they published.
///
/// This record exists solely so "list my blogs" can be answered without an
/// owner field on `Blog` itself. After every completed operation both ids
/// must reference existing documents; a partially failed publish can leave a
/// blog with no record (the orphan the blog service reports, never repairs).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnershipRecord {
    /// Store-assigned identifier
    #[serde(
        rename = "_id",
        default = "DocumentId::nil",
        skip_serializing_if = "DocumentId::is_nil"
    )]
    pub id: DocumentId,
    /// Owning user
    pub user_id: DocumentId,
    /// Owned blog
    pub blog_id: DocumentId,
}

impl OwnershipRecord {
    /// Build a not-yet-persisted join record.
    pub fn new(user_id: DocumentId, blog_id: DocumentId) -> Self {
        Self {
            id: DocumentId::nil(),
            user_id,
            blog_id,
        }
    }
}
