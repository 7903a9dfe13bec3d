//! Ownership record repository
//!
//! The user-to-blog join. Records are only ever inserted (by the publish
//! operation) and queried by owning user; nothing deletes them, which is the
//! documented orphaning gap when a blog is deleted.

use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

use super::{decode, encode};
use crate::db::{collections, DocumentId, DocumentStore, StoreError};
use crate::db::Filter;
use crate::models::OwnershipRecord;

/// Ownership record repository trait
#[async_trait]
pub trait OwnershipRepository: Send + Sync {
    /// Insert a join record for a freshly published blog.
    async fn insert(
        &self,
        user_id: DocumentId,
        blog_id: DocumentId,
    ) -> Result<OwnershipRecord, StoreError>;

    /// All records owned by the given user.
    async fn find_by_user(&self, user_id: DocumentId) -> Result<Vec<OwnershipRecord>, StoreError>;
}

/// Gateway-backed ownership repository.
pub struct StoreOwnershipRepository {
    store: Arc<dyn DocumentStore>,
}

impl StoreOwnershipRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Create a boxed repository for dependency injection.
    pub fn boxed(store: Arc<dyn DocumentStore>) -> Arc<dyn OwnershipRepository> {
        Arc::new(Self::new(store))
    }
}

#[async_trait]
impl OwnershipRepository for StoreOwnershipRepository {
    async fn insert(
        &self,
        user_id: DocumentId,
        blog_id: DocumentId,
    ) -> Result<OwnershipRecord, StoreError> {
        let record = OwnershipRecord::new(user_id, blog_id);
        let doc = encode(&record)?;
        let id = self.store.insert(collections::OWNERSHIP_RECORDS, doc).await?;
        let mut created = record;
        created.id = id;
        Ok(created)
    }

    async fn find_by_user(&self, user_id: DocumentId) -> Result<Vec<OwnershipRecord>, StoreError> {
        self.store
            .find_many(
                collections::OWNERSHIP_RECORDS,
                &Filter::all().eq("user_id", json!(user_id)),
            )
            .await?
            .into_iter()
            .map(|doc| decode(collections::OWNERSHIP_RECORDS, doc))
            .collect()
    }
}
