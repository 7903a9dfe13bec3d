//! Blog repository

use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

use super::{decode, encode};
use crate::db::{collections, DocumentId, DocumentStore, Filter, StoreError};
use crate::models::Blog;

/// Blog repository trait
#[async_trait]
pub trait BlogRepository: Send + Sync {
    /// Insert a new blog and return it with the assigned id.
    async fn insert(&self, blog: &Blog) -> Result<Blog, StoreError>;

    /// Look up a blog by id.
    async fn find_by_id(&self, id: DocumentId) -> Result<Option<Blog>, StoreError>;

    /// Batch-fetch blogs whose id is in the given set.
    async fn find_by_ids(&self, ids: &[DocumentId]) -> Result<Vec<Blog>, StoreError>;

    /// Replace the whole comment-id list of a blog. Returns the modified
    /// count (0 when the blog no longer exists).
    ///
    /// This is a full-array write-back, not an atomic append: callers doing
    /// read-modify-write race with each other, and the last writer wins.
    async fn set_comment_ids(
        &self,
        id: DocumentId,
        comment_ids: &[DocumentId],
    ) -> Result<u64, StoreError>;

    /// Delete a blog by id. Returns the deleted count (0 on a miss).
    /// Does not touch the blog's comments or ownership record.
    async fn delete_by_id(&self, id: DocumentId) -> Result<u64, StoreError>;
}

/// Gateway-backed blog repository.
pub struct StoreBlogRepository {
    store: Arc<dyn DocumentStore>,
}

impl StoreBlogRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Create a boxed repository for dependency injection.
    pub fn boxed(store: Arc<dyn DocumentStore>) -> Arc<dyn BlogRepository> {
        Arc::new(Self::new(store))
    }
}

#[async_trait]
impl BlogRepository for StoreBlogRepository {
    async fn insert(&self, blog: &Blog) -> Result<Blog, StoreError> {
        let doc = encode(blog)?;
        let id = self.store.insert(collections::BLOGS, doc).await?;
        let mut created = blog.clone();
        created.id = id;
        Ok(created)
    }

    async fn find_by_id(&self, id: DocumentId) -> Result<Option<Blog>, StoreError> {
        self.store
            .find_one(collections::BLOGS, &Filter::by_id(id))
            .await?
            .map(|doc| decode(collections::BLOGS, doc))
            .transpose()
    }

    async fn find_by_ids(&self, ids: &[DocumentId]) -> Result<Vec<Blog>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let id_values = ids.iter().map(|id| id.as_value()).collect();
        self.store
            .find_many(collections::BLOGS, &Filter::all().is_in("_id", id_values))
            .await?
            .into_iter()
            .map(|doc| decode(collections::BLOGS, doc))
            .collect()
    }

    async fn set_comment_ids(
        &self,
        id: DocumentId,
        comment_ids: &[DocumentId],
    ) -> Result<u64, StoreError> {
        self.store
            .update_fields(
                collections::BLOGS,
                id,
                json!({ "comment_ids": comment_ids }),
            )
            .await
    }

    async fn delete_by_id(&self, id: DocumentId) -> Result<u64, StoreError> {
        self.store
            .delete_one(collections::BLOGS, &Filter::by_id(id))
            .await
    }
}
