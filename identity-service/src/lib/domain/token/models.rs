use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::identity::models::PrincipalId;

/// Refresh token record unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RefreshTokenId(pub Uuid);

impl RefreshTokenId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RefreshTokenId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RefreshTokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One issued refresh token.
///
/// Only the Argon2 hash of the secret is ever persisted. Records are never
/// deleted by the engine; expiry and revocation are logical.
#[derive(Debug, Clone)]
pub struct RefreshTokenRecord {
    pub id: RefreshTokenId,
    pub principal_id: PrincipalId,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    /// Once set, the record is permanently unusable even if unexpired.
    pub revoked_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl RefreshTokenRecord {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Claims carried by a signed access token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessClaims {
    /// Principal id
    pub sub: String,
    pub email: String,
    /// Normalized role keys, ordered ascending
    pub roles: Vec<String>,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Token pair handed to a caller after login or refresh.
///
/// The refresh token plaintext appears here once and is never recoverable
/// afterwards.
#[derive(Debug, Clone)]
pub struct IssuedTokens {
    pub access_token: String,
    /// Access token lifetime in seconds
    pub access_token_expires_in: i64,
    pub refresh_token: String,
    pub refresh_token_expires_at: DateTime<Utc>,
}
