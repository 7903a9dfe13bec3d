//! User model
//!
//! The identity anchor of the system. The name is the natural key used at
//! login and must be unique (case-sensitive) across all users; uniqueness is
//! enforced by the user service at registration time, not by the store.

use serde::{Deserialize, Serialize};

use crate::db::DocumentId;

/// A registered user.
///
/// The `password_digest` is an argon2id PHC string produced by
/// `services::credential`; plaintext passwords never reach this struct.
/// Users are created at registration and never updated by any exposed
/// operation besides deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Store-assigned identifier
    #[serde(
        rename = "_id",
        default = "DocumentId::nil",
        skip_serializing_if = "DocumentId::is_nil"
    )]
    pub id: DocumentId,
    /// Unique, case-sensitive username
    pub name: String,
    /// Salted password digest (never the plaintext)
    pub password_digest: String,
    /// Free-form profile description
    pub description: String,
}

impl User {
    /// Build a not-yet-persisted user. The password must already be
    /// digested; the store assigns the id on insert.
    pub fn new(name: String, password_digest: String, description: String) -> Self {
        Self {
            id: DocumentId::nil(),
            name,
            password_digest,
            description,
        }
    }
}

/// Registration input carrying the plaintext password, digested by the user
/// service before a `User` is ever constructed.
#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub name: String,
    pub password: String,
    pub description: String,
}
