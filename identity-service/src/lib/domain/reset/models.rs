use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::identity::models::PrincipalId;

/// Reset token record unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResetTokenId(pub Uuid);

impl ResetTokenId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ResetTokenId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ResetTokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One-time password-reset token.
///
/// Unlike refresh tokens the secret is stored plaintext-comparable: its
/// lifetime is minutes and it is single-use, so direct lookup is the better
/// trade against one more slow hash per request. Usable only while
/// `used_at` is null and `now < expires_at`; redemption is irreversible.
#[derive(Debug, Clone)]
pub struct ResetTokenRecord {
    pub id: ResetTokenId,
    pub principal_id: PrincipalId,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
}

impl ResetTokenRecord {
    pub fn is_redeemable(&self, now: DateTime<Utc>) -> bool {
        self.used_at.is_none() && now < self.expires_at
    }
}
