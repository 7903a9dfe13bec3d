//! Session token authenticator
//!
//! Issues and verifies stateless, signed, time-limited bearer tokens that
//! bind a username. The token is an HS256 JWT over a `{sub, iat, exp}`
//! claim set; the shared secret is held by the authenticator and never
//! leaves it. Verification is pure: it recomputes the MAC, checks the
//! expiry against the current time, and has no side effects. There is no
//! session store — a token stays valid until its window elapses.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Default validity window, mirrored by the REST cookie's Max-Age.
pub const DEFAULT_VALIDITY_SECS: i64 = 3600;

/// Token operation failures.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// No token was presented at all.
    #[error("missing authentication token")]
    Missing,

    /// The token could not be parsed as a signed claim set.
    #[error("malformed token")]
    Malformed,

    /// The recomputed MAC does not match: the payload was altered after
    /// signing, or signed with a different secret.
    #[error("token signature mismatch")]
    SignatureInvalid,

    /// The validity window has elapsed.
    #[error("token expired")]
    Expired,

    /// Signing failed while issuing.
    #[error("token signing failed: {0}")]
    Signing(String),
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// Subject: the authenticated username.
    sub: String,
    /// Issued-at, seconds since the epoch.
    iat: i64,
    /// Expiry, seconds since the epoch.
    exp: i64,
}

/// Stateless issuer/verifier of session tokens.
pub struct TokenAuthenticator {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validity: Duration,
}

impl TokenAuthenticator {
    /// Build an authenticator over a shared secret with the default
    /// one-hour validity window.
    pub fn new(secret: &[u8]) -> Self {
        Self::with_validity(secret, DEFAULT_VALIDITY_SECS)
    }

    /// Build an authenticator with an explicit validity window in seconds.
    pub fn with_validity(secret: &[u8], validity_secs: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validity: Duration::seconds(validity_secs),
        }
    }

    /// Seconds a freshly issued token stays valid.
    pub fn validity_secs(&self) -> i64 {
        self.validity.num_seconds()
    }

    /// Issue a signed token binding `subject`, valid from now for the
    /// configured window.
    pub fn issue(&self, subject: &str) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: (now + self.validity).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify a token and recover its subject.
    ///
    /// Rejects MAC mismatches before anything else is trusted, then rejects
    /// tokens whose expiry has passed (no leeway).
    pub fn verify(&self, token: &str) -> Result<String, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                jsonwebtoken::errors::ErrorKind::InvalidSignature => TokenError::SignatureInvalid,
                _ => TokenError::Malformed,
            }
        })?;
        Ok(data.claims.sub)
    }
}
