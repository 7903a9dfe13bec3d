//! User repository
//!
//! Document store operations for users. Provides the `UserRepository` trait
//! for the services layer and `StoreUserRepository` implementing it on top
//! of the gateway.

use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

use super::{decode, encode};
use crate::db::{collections, DocumentId, DocumentStore, Filter, StoreError};
use crate::models::User;

/// User repository trait
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user and return it with the assigned id.
    async fn insert(&self, user: &User) -> Result<User, StoreError>;

    /// Look up a user by id.
    async fn find_by_id(&self, id: DocumentId) -> Result<Option<User>, StoreError>;

    /// Look up a user by name (the natural key used at login).
    async fn find_by_name(&self, name: &str) -> Result<Option<User>, StoreError>;

    /// List all users.
    async fn list(&self) -> Result<Vec<User>, StoreError>;

    /// Delete a user by id. Returns the deleted count (0 on a miss).
    async fn delete_by_id(&self, id: DocumentId) -> Result<u64, StoreError>;
}

/// Gateway-backed user repository.
pub struct StoreUserRepository {
    store: Arc<dyn DocumentStore>,
}

impl StoreUserRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Create a boxed repository for dependency injection.
    pub fn boxed(store: Arc<dyn DocumentStore>) -> Arc<dyn UserRepository> {
        Arc::new(Self::new(store))
    }
}

#[async_trait]
impl UserRepository for StoreUserRepository {
    async fn insert(&self, user: &User) -> Result<User, StoreError> {
        let doc = encode(user)?;
        let id = self.store.insert(collections::USERS, doc).await?;
        let mut created = user.clone();
        created.id = id;
        Ok(created)
    }

    async fn find_by_id(&self, id: DocumentId) -> Result<Option<User>, StoreError> {
        self.store
            .find_one(collections::USERS, &Filter::by_id(id))
            .await?
            .map(|doc| decode(collections::USERS, doc))
            .transpose()
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<User>, StoreError> {
        self.store
            .find_one(collections::USERS, &Filter::all().eq("name", json!(name)))
            .await?
            .map(|doc| decode(collections::USERS, doc))
            .transpose()
    }

    async fn list(&self) -> Result<Vec<User>, StoreError> {
        self.store
            .find_many(collections::USERS, &Filter::all())
            .await?
            .into_iter()
            .map(|doc| decode(collections::USERS, doc))
            .collect()
    }

    async fn delete_by_id(&self, id: DocumentId) -> Result<u64, StoreError> {
        self.store
            .delete_one(collections::USERS, &Filter::by_id(id))
            .await
    }
}
