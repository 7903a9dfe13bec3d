//! Per-call timeout decorator for the document store gateway.
//!
//! The underlying store enforces no deadline of its own, so every gateway
//! call is bounded here with `tokio::time::timeout`. An elapsed deadline
//! surfaces as `StoreError::Timeout` and fails only the current request.

use async_trait::async_trait;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use super::gateway::{DocumentId, DocumentStore, Filter, StoreError};

/// Wraps another `DocumentStore`, bounding every call with a deadline.
pub struct TimeoutStore {
    inner: Arc<dyn DocumentStore>,
    op_timeout: Duration,
}

impl TimeoutStore {
    pub fn new(inner: Arc<dyn DocumentStore>, op_timeout: Duration) -> Self {
        Self { inner, op_timeout }
    }

    /// Create an `Arc`-ed decorated store for dependency injection.
    pub fn wrap(inner: Arc<dyn DocumentStore>, op_timeout: Duration) -> Arc<dyn DocumentStore> {
        Arc::new(Self::new(inner, op_timeout))
    }

    async fn bounded<T, F>(&self, fut: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, StoreError>>,
    {
        timeout(self.op_timeout, fut)
            .await
            .map_err(|_| StoreError::Timeout(self.op_timeout))?
    }
}

#[async_trait]
impl DocumentStore for TimeoutStore {
    async fn insert(&self, collection: &str, document: Value) -> Result<DocumentId, StoreError> {
        self.bounded(self.inner.insert(collection, document)).await
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Option<Value>, StoreError> {
        self.bounded(self.inner.find_one(collection, filter)).await
    }

    async fn find_many(&self, collection: &str, filter: &Filter) -> Result<Vec<Value>, StoreError> {
        self.bounded(self.inner.find_many(collection, filter)).await
    }

    async fn update_fields(
        &self,
        collection: &str,
        id: DocumentId,
        fields: Value,
    ) -> Result<u64, StoreError> {
        self.bounded(self.inner.update_fields(collection, id, fields))
            .await
    }

    async fn delete_one(&self, collection: &str, filter: &Filter) -> Result<u64, StoreError> {
        self.bounded(self.inner.delete_one(collection, filter)).await
    }
}
