//! Comment repository

use async_trait::async_trait;
use std::sync::Arc;

use super::{decode, encode};
use crate::db::{collections, DocumentId, DocumentStore, Filter, StoreError};
use crate::models::Comment;

/// Comment repository trait
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Insert a new comment and return it with the assigned id.
    async fn insert(&self, comment: &Comment) -> Result<Comment, StoreError>;

    /// Look up a comment by id.
    async fn find_by_id(&self, id: DocumentId) -> Result<Option<Comment>, StoreError>;

    /// List all comments.
    async fn list(&self) -> Result<Vec<Comment>, StoreError>;

    /// Delete a comment by id. Returns the deleted count (0 on a miss).
    async fn delete_by_id(&self, id: DocumentId) -> Result<u64, StoreError>;
}

/// Gateway-backed comment repository.
pub struct StoreCommentRepository {
    store: Arc<dyn DocumentStore>,
}

impl StoreCommentRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Create a boxed repository for dependency injection.
    pub fn boxed(store: Arc<dyn DocumentStore>) -> Arc<dyn CommentRepository> {
        Arc::new(Self::new(store))
    }
}

#[async_trait]
impl CommentRepository for StoreCommentRepository {
    async fn insert(&self, comment: &Comment) -> Result<Comment, StoreError> {
        let doc = encode(comment)?;
        let id = self.store.insert(collections::COMMENTS, doc).await?;
        let mut created = comment.clone();
        created.id = id;
        Ok(created)
    }

    async fn find_by_id(&self, id: DocumentId) -> Result<Option<Comment>, StoreError> {
        self.store
            .find_one(collections::COMMENTS, &Filter::by_id(id))
            .await?
            .map(|doc| decode(collections::COMMENTS, doc))
            .transpose()
    }

    async fn list(&self) -> Result<Vec<Comment>, StoreError> {
        self.store
            .find_many(collections::COMMENTS, &Filter::all())
            .await?
            .into_iter()
            .map(|doc| decode(collections::COMMENTS, doc))
            .collect()
    }

    async fn delete_by_id(&self, id: DocumentId) -> Result<u64, StoreError> {
        self.store
            .delete_one(collections::COMMENTS, &Filter::by_id(id))
            .await
    }
}
