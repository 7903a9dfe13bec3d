//! Credential digesting
//!
//! One-way transform of plaintext passwords into a storable digest, using
//! Argon2id with a random salt and the crate's secure defaults. Digests are
//! PHC strings; verification parses the stored string and recomputes.

use anyhow::{anyhow, Context, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Digest a plaintext password into a storable PHC string.
pub fn digest(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let digest = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("password digest failed: {e}"))?;
    Ok(digest.to_string())
}

/// Verify a plaintext password against a stored digest.
///
/// Returns `Ok(false)` on a mismatch; an error only for an unparseable
/// stored digest.
pub fn verify(password: &str, stored: &str) -> Result<bool> {
    let parsed = PasswordHash::new(stored)
        .map_err(|e| anyhow!("stored digest is not a valid PHC string: {e}"))
        .context("credential verification failed")?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(anyhow!("credential verification failed: {e}")),
    }
}
