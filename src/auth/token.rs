//! Session token codec: HMAC-signed JWT verification.
//!
//! Tokens are issued by the external auth backend; this side only verifies
//! them. Verification never errors out of the caller's control flow: every
//! failure comes back as an [`InvalidToken`] value that callers fold into
//! "not authenticated".
//!
//! Two claims are mandatory beyond the signature: `userId` must be non-zero,
//! and `exp` must be present. A token without an expiry is rejected as
//! malformed rather than treated as valid forever.

use std::fmt;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

/// Minimum accepted length of the shared signing secret.
pub const MIN_SECRET_LEN: usize = 32;

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Numeric user id. Zero or absent means the token identifies nobody.
    #[serde(rename = "userId", default)]
    pub user_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Issued-at (Unix timestamp, seconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    /// Expiration (Unix timestamp, seconds).
    pub exp: i64,
}

/// Why a token was rejected. Callers treat every variant as unauthenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum InvalidToken {
    #[error("token is malformed")]
    Malformed,
    #[error("token signature does not verify")]
    BadSignature,
    #[error("token has expired")]
    Expired,
    #[error("token carries no user id")]
    MissingUser,
}

impl From<jsonwebtoken::errors::Error> for InvalidToken {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => Self::BadSignature,
            ErrorKind::ExpiredSignature => Self::Expired,
            _ => Self::Malformed,
        }
    }
}

/// Verifies session tokens against the shared HMAC secret.
///
/// Immutable after construction; shared read-only across requests.
#[derive(Clone)]
pub struct TokenCodec {
    key: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    /// Build a codec from the shared secret. Length is enforced by
    /// [`crate::config::Config`], not here.
    #[must_use]
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.leeway = 0;
        validation.validate_aud = false;
        Self { key: DecodingKey::from_secret(secret.as_bytes()), validation }
    }

    /// Verify signature and expiry, returning the decoded claims.
    ///
    /// # Errors
    ///
    /// Returns the rejection reason for malformed, mis-signed, expired, or
    /// user-less tokens.
    pub fn verify(&self, token: &str) -> Result<SessionClaims, InvalidToken> {
        let data = decode::<SessionClaims>(token, &self.key, &self.validation)?;
        if data.claims.user_id == 0 {
            return Err(InvalidToken::MissingUser);
        }
        Ok(data.claims)
    }
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithms", &self.validation.algorithms)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "token_test.rs"]
mod tests;
