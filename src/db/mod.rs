//! Persistence layer
//!
//! The only part of the crate that touches storage. It is split into:
//! - `gateway`: the `DocumentStore` trait plus the filter and id types —
//!   the uniform insert/find/update/delete-by-filter surface over named
//!   collections
//! - `memory`: the in-memory backend
//! - `timeout`: a decorator bounding every gateway call with a deadline
//! - `repositories`: typed CRUD per entity, built on the gateway
//!
//! The gateway handle is constructed once in `main` and injected into the
//! repositories; nothing in the crate holds an ambient global connection.

pub mod gateway;
pub mod memory;
pub mod repositories;
#[cfg(test)]
pub mod testing;
pub mod timeout;

pub use gateway::{collections, DocumentId, DocumentStore, Filter, ParseIdError, StoreError};
pub use memory::MemoryStore;
pub use timeout::TimeoutStore;
