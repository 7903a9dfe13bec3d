//! User service
//!
//! Registration, login, and user CRUD. Policies preserved here:
//! - registration rejects a taken name with a conflict, while a lookup
//!   failure during the check stays a store error (the two are distinct)
//! - login failure has one constant shape for "no such user" and "wrong
//!   password"
//! - delete-by-id is idempotent: a well-formed but absent id is a zero
//!   count, only a malformed id is an error

use std::sync::Arc;

use anyhow::Context;

use crate::db::repositories::UserRepository;
use crate::error::ServiceError;
use crate::models::{RegisterInput, User};
use crate::services::credential;
use crate::services::token::TokenAuthenticator;

/// Login input (plaintext password, verified against the stored digest).
#[derive(Debug, Clone)]
pub struct LoginInput {
    pub name: String,
    pub password: String,
}

/// User management and authentication service.
pub struct UserService {
    users: Arc<dyn UserRepository>,
    tokens: Arc<TokenAuthenticator>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>, tokens: Arc<TokenAuthenticator>) -> Self {
        Self { users, tokens }
    }

    /// Register a new user.
    ///
    /// # Errors
    ///
    /// - `Validation` for an empty name or password
    /// - `Conflict` when the name is already taken
    /// - `Store` when the uniqueness check or the insert itself fails
    pub async fn register(&self, input: RegisterInput) -> Result<User, ServiceError> {
        if input.name.trim().is_empty() {
            return Err(ServiceError::validation("username must not be empty"));
        }
        if input.password.is_empty() {
            return Err(ServiceError::validation("password must not be empty"));
        }

        // A failed lookup is a store error; only a successful lookup that
        // finds a user is a duplicate.
        if self.users.find_by_name(&input.name).await?.is_some() {
            return Err(ServiceError::conflict(format!(
                "username '{}' is already taken",
                input.name
            )));
        }

        let password_digest =
            credential::digest(&input.password).context("failed to digest password")?;

        let user = User::new(input.name, password_digest, input.description);
        let created = self.users.insert(&user).await?;
        tracing::info!(user = %created.name, id = %created.id, "user registered");
        Ok(created)
    }

    /// Authenticate credentials and issue a session token.
    ///
    /// Fails with the constant-shape `InvalidCredentials` for both an
    /// unknown name and a wrong password.
    pub async fn login(&self, input: LoginInput) -> Result<String, ServiceError> {
        let user = self
            .users
            .find_by_name(&input.name)
            .await?
            .ok_or(ServiceError::InvalidCredentials)?;

        let valid = credential::verify(&input.password, &user.password_digest)
            .context("failed to verify password")?;
        if !valid {
            return Err(ServiceError::InvalidCredentials);
        }

        let token = self.tokens.issue(&user.name)?;
        tracing::info!(user = %user.name, "login succeeded");
        Ok(token)
    }

    /// Get a user by its id string.
    pub async fn get(&self, id: &str) -> Result<User, ServiceError> {
        let id = super::parse_id(id)?;
        self.users
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound("user"))
    }

    /// List all users.
    pub async fn list(&self) -> Result<Vec<User>, ServiceError> {
        Ok(self.users.list().await?)
    }

    /// Delete a user by its id string. Returns the deleted count; a
    /// well-formed id that matches nothing is a zero count, not an error.
    pub async fn delete(&self, id: &str) -> Result<u64, ServiceError> {
        let id = super::parse_id(id)?;
        Ok(self.users.delete_by_id(id).await?)
    }

    /// Resolve a token subject back to its user row.
    ///
    /// A token can outlive its account; a subject with no user row fails
    /// with `NotFound` rather than being treated as authenticated.
    pub async fn resolve_subject(&self, name: &str) -> Result<User, ServiceError> {
        self.users
            .find_by_name(name)
            .await?
            .ok_or(ServiceError::NotFound("user"))
    }
}
