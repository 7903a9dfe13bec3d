//! Document store gateway
//!
//! This module defines the uniform access layer for the four named
//! collections the service persists into. It provides:
//! - `DocumentStore` trait: insert / find-one / find-many / update-fields /
//!   delete-one against a named collection, with JSON documents on the wire
//! - `Filter`: the small predicate language the repositories query with
//!   (field equality and id-in-set)
//! - `DocumentId`: opaque, store-assigned identifier
//!
//! The gateway offers no cross-collection atomicity. Compound operations in
//! the services layer are ordered sequences of independently-committed
//! writes, and their partial-failure behavior is specified there.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use uuid::Uuid;

/// Collection names used by the repositories.
pub mod collections {
    pub const USERS: &str = "users";
    pub const BLOGS: &str = "blogs";
    pub const COMMENTS: &str = "comments";
    pub const OWNERSHIP_RECORDS: &str = "ownership_records";
}

/// Field under which the store keeps the assigned id inside each document.
pub const ID_FIELD: &str = "_id";

/// Opaque, store-assigned document identifier.
///
/// A freshly constructed entity carries the nil id; the store assigns a real
/// one on insert. The nil id is skipped during serialization so inserted
/// documents never carry a client-chosen `_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(Uuid);

impl DocumentId {
    /// Generate a fresh random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// The nil id, used as the "not yet persisted" marker.
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    /// Whether this is the nil (unassigned) id.
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }

    /// JSON representation as stored in documents and filters.
    pub fn as_value(&self) -> Value {
        Value::String(self.to_string())
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error for ids that are not well-formed.
#[derive(Debug, thiserror::Error)]
#[error("invalid document id '{0}'")]
pub struct ParseIdError(pub String);

impl FromStr for DocumentId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| ParseIdError(s.to_string()))
    }
}

/// A conjunctive filter over document fields.
///
/// The empty filter matches every document.
#[derive(Debug, Clone, Default)]
pub struct Filter {
    clauses: Vec<Clause>,
}

#[derive(Debug, Clone)]
enum Clause {
    Eq(String, Value),
    In(String, Vec<Value>),
}

impl Filter {
    /// Empty filter (matches all documents in the collection).
    pub fn all() -> Self {
        Self::default()
    }

    /// Filter matching a single document by id.
    pub fn by_id(id: DocumentId) -> Self {
        Self::all().eq(ID_FIELD, id.as_value())
    }

    /// Add a field-equality clause.
    pub fn eq(mut self, field: impl Into<String>, value: Value) -> Self {
        self.clauses.push(Clause::Eq(field.into(), value));
        self
    }

    /// Add a field-membership clause (document matches when the field's
    /// value is one of `values`).
    pub fn is_in(mut self, field: impl Into<String>, values: Vec<Value>) -> Self {
        self.clauses.push(Clause::In(field.into(), values));
        self
    }

    /// Evaluate the filter against a document.
    pub fn matches(&self, doc: &Value) -> bool {
        self.clauses.iter().all(|clause| match clause {
            Clause::Eq(field, value) => doc.get(field) == Some(value),
            Clause::In(field, values) => doc
                .get(field)
                .map(|v| values.contains(v))
                .unwrap_or(false),
        })
    }
}

/// Errors surfaced by the gateway.
///
/// Any failure here is fatal to the current request and must be propagated,
/// never swallowed. The services layer wraps these without hiding the kind.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The document handed to `insert` was not a JSON object.
    #[error("document must be a JSON object")]
    InvalidDocument,

    /// A stored document could not be decoded into the expected entity.
    #[error("failed to decode document from '{collection}': {message}")]
    Decode { collection: String, message: String },

    /// An entity could not be encoded into a document.
    #[error("failed to encode document: {0}")]
    Encode(String),

    /// The call did not complete within the configured per-call timeout.
    #[error("store operation timed out after {0:?}")]
    Timeout(Duration),

    /// Any other backend failure.
    #[error("store backend failure: {0}")]
    Backend(String),
}

/// Uniform create/read/update/delete access to named collections.
///
/// This is the only trait in the crate that touches persistence. Every call
/// may block on I/O; callers treat each one as an awaitable operation with
/// whatever timeout the configured decorator enforces.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a document and return the store-assigned id.
    ///
    /// The document must be a JSON object; any `_id` it carries is replaced.
    async fn insert(&self, collection: &str, document: Value) -> Result<DocumentId, StoreError>;

    /// Find the first document matching the filter.
    async fn find_one(&self, collection: &str, filter: &Filter)
        -> Result<Option<Value>, StoreError>;

    /// Find every document matching the filter, in insertion order.
    async fn find_many(&self, collection: &str, filter: &Filter)
        -> Result<Vec<Value>, StoreError>;

    /// Overwrite the given top-level fields of the document with the given
    /// id. Returns the number of documents modified (0 or 1).
    ///
    /// This is a whole-field replacement, not an in-place array mutation:
    /// writing an array field here is a read-modify-write from the caller's
    /// perspective and is subject to lost updates under concurrency.
    async fn update_fields(
        &self,
        collection: &str,
        id: DocumentId,
        fields: Value,
    ) -> Result<u64, StoreError>;

    /// Delete the first document matching the filter. Returns the number of
    /// documents deleted (0 or 1); a miss is not an error.
    async fn delete_one(&self, collection: &str, filter: &Filter) -> Result<u64, StoreError>;
}
