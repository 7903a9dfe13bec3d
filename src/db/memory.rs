//! In-memory document store backend
//!
//! A `DocumentStore` implementation holding each collection as an
//! insertion-ordered vector of JSON documents behind an async `RwLock`.
//! Collections are created lazily on first insert, the way a document
//! database would. This backend carries the whole service in tests and in
//! single-process deployments; the gateway trait is the seam where a real
//! database would plug in.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::gateway::{DocumentId, DocumentStore, Filter, StoreError, ID_FIELD};

/// In-memory backend for the document store gateway.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an `Arc`-ed store for dependency injection.
    pub fn boxed() -> Arc<dyn DocumentStore> {
        Arc::new(Self::new())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert(&self, collection: &str, document: Value) -> Result<DocumentId, StoreError> {
        let mut document = document;
        let obj = document.as_object_mut().ok_or(StoreError::InvalidDocument)?;

        let id = DocumentId::generate();
        obj.insert(ID_FIELD.to_string(), id.as_value());

        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .push(document);
        Ok(id)
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Option<Value>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|doc| filter.matches(doc)).cloned()))
    }

    async fn find_many(&self, collection: &str, filter: &Filter) -> Result<Vec<Value>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| filter.matches(doc))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn update_fields(
        &self,
        collection: &str,
        id: DocumentId,
        fields: Value,
    ) -> Result<u64, StoreError> {
        let update = match fields {
            Value::Object(map) => map,
            _ => return Err(StoreError::InvalidDocument),
        };

        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(0);
        };

        let id_value = id.as_value();
        for doc in docs.iter_mut() {
            if doc.get(ID_FIELD) == Some(&id_value) {
                let obj = doc.as_object_mut().ok_or(StoreError::InvalidDocument)?;
                for (key, value) in update {
                    obj.insert(key, value);
                }
                return Ok(1);
            }
        }
        Ok(0)
    }

    async fn delete_one(&self, collection: &str, filter: &Filter) -> Result<u64, StoreError> {
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(0);
        };

        match docs.iter().position(|doc| filter.matches(doc)) {
            Some(index) => {
                docs.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn insert_assigns_an_id_and_find_one_returns_it() {
        let store = MemoryStore::new();
        let id = store
            .insert("users", json!({"name": "alice"}))
            .await
            .unwrap();
        assert!(!id.is_nil());

        let found = store
            .find_one("users", &Filter::by_id(id))
            .await
            .unwrap()
            .expect("document should exist");
        assert_eq!(found["name"], "alice");
        assert_eq!(found["_id"], json!(id.to_string()));
    }

    #[tokio::test]
    async fn insert_rejects_non_object_documents() {
        let store = MemoryStore::new();
        let err = store.insert("users", json!("scalar")).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidDocument));
    }

    #[tokio::test]
    async fn find_one_on_missing_collection_returns_none() {
        let store = MemoryStore::new();
        let found = store.find_one("ghosts", &Filter::all()).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn find_many_filters_and_preserves_insertion_order() {
        let store = MemoryStore::new();
        store
            .insert("comments", json!({"text": "first", "flag": true}))
            .await
            .unwrap();
        store
            .insert("comments", json!({"text": "second", "flag": false}))
            .await
            .unwrap();
        store
            .insert("comments", json!({"text": "third", "flag": true}))
            .await
            .unwrap();

        let flagged = store
            .find_many("comments", &Filter::all().eq("flag", json!(true)))
            .await
            .unwrap();
        assert_eq!(flagged.len(), 2);
        assert_eq!(flagged[0]["text"], "first");
        assert_eq!(flagged[1]["text"], "third");
    }

    #[tokio::test]
    async fn update_fields_overwrites_named_fields_only() {
        let store = MemoryStore::new();
        let id = store
            .insert("blogs", json!({"content": "hello", "comment_ids": []}))
            .await
            .unwrap();

        let modified = store
            .update_fields("blogs", id, json!({"comment_ids": ["a", "b"]}))
            .await
            .unwrap();
        assert_eq!(modified, 1);

        let doc = store
            .find_one("blogs", &Filter::by_id(id))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(doc["comment_ids"], json!(["a", "b"]));
        assert_eq!(doc["content"], "hello");
    }

    #[tokio::test]
    async fn update_fields_on_missing_id_modifies_nothing() {
        let store = MemoryStore::new();
        store.insert("blogs", json!({"content": "x"})).await.unwrap();
        let modified = store
            .update_fields("blogs", DocumentId::generate(), json!({"content": "y"}))
            .await
            .unwrap();
        assert_eq!(modified, 0);
    }

    #[tokio::test]
    async fn delete_one_is_idempotent_on_misses() {
        let store = MemoryStore::new();
        let id = store.insert("users", json!({"name": "bob"})).await.unwrap();

        assert_eq!(
            store.delete_one("users", &Filter::by_id(id)).await.unwrap(),
            1
        );
        assert_eq!(
            store.delete_one("users", &Filter::by_id(id)).await.unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn delete_one_removes_only_the_first_match() {
        let store = MemoryStore::new();
        store
            .insert("comments", json!({"text": "dup"}))
            .await
            .unwrap();
        store
            .insert("comments", json!({"text": "dup"}))
            .await
            .unwrap();

        let deleted = store
            .delete_one("comments", &Filter::all().eq("text", json!("dup")))
            .await
            .unwrap();
        assert_eq!(deleted, 1);

        let remaining = store.find_many("comments", &Filter::all()).await.unwrap();
        assert_eq!(remaining.len(), 1);
    }
}
