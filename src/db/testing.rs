//! Test doubles for the document store gateway.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;

use super::gateway::{DocumentId, DocumentStore, Filter, StoreError};
use super::memory::MemoryStore;

/// A store that behaves like `MemoryStore` except that chosen operations on
/// chosen collections fail with a backend error. Used to exercise the
/// partial-failure paths of the compound write operations.
#[derive(Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    deny_insert: HashSet<&'static str>,
    deny_find: HashSet<&'static str>,
    deny_update: HashSet<&'static str>,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every insert into `collection`.
    pub fn deny_insert(mut self, collection: &'static str) -> Self {
        self.deny_insert.insert(collection);
        self
    }

    /// Fail every find against `collection`.
    pub fn deny_find(mut self, collection: &'static str) -> Self {
        self.deny_find.insert(collection);
        self
    }

    /// Fail every field update in `collection`.
    pub fn deny_update(mut self, collection: &'static str) -> Self {
        self.deny_update.insert(collection);
        self
    }

    pub fn boxed(self) -> Arc<dyn DocumentStore> {
        Arc::new(self)
    }

    fn injected() -> StoreError {
        StoreError::Backend("injected failure".into())
    }
}

#[async_trait]
impl DocumentStore for FlakyStore {
    async fn insert(&self, collection: &str, document: Value) -> Result<DocumentId, StoreError> {
        if self.deny_insert.contains(collection) {
            return Err(Self::injected());
        }
        self.inner.insert(collection, document).await
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Option<Value>, StoreError> {
        if self.deny_find.contains(collection) {
            return Err(Self::injected());
        }
        self.inner.find_one(collection, filter).await
    }

    async fn find_many(&self, collection: &str, filter: &Filter) -> Result<Vec<Value>, StoreError> {
        if self.deny_find.contains(collection) {
            return Err(Self::injected());
        }
        self.inner.find_many(collection, filter).await
    }

    async fn update_fields(
        &self,
        collection: &str,
        id: DocumentId,
        fields: Value,
    ) -> Result<u64, StoreError> {
        if self.deny_update.contains(collection) {
            return Err(Self::injected());
        }
        self.inner.update_fields(collection, id, fields).await
    }

    async fn delete_one(&self, collection: &str, filter: &Filter) -> Result<u64, StoreError> {
        self.inner.delete_one(collection, filter).await
    }
}
