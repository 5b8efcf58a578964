use std::sync::Arc;

use auth::CredentialHasher;
use chrono::DateTime;
use chrono::Utc;

use crate::domain::token::errors::TokenError;
use crate::domain::token::models::RefreshTokenId;
use crate::domain::token::models::RefreshTokenRecord;
use crate::domain::token::ports::RefreshTokenStore;

/// How many recent records a single lookup will hash-compare by default.
pub const DEFAULT_SCAN_WINDOW: usize = 50;

/// Lookup and revocation over the hashed refresh-token store.
///
/// Refresh secrets are stored under a salted, non-deterministic hash, so a
/// presented token cannot be found by equality. Instead the ledger scans a
/// bounded window of the most recent non-revoked records, newest first, and
/// runs one Argon2 verification per candidate. The bound caps verification
/// cost per lookup; a session older than the window's worth of newer
/// sessions for the whole store simply stops matching, which is the accepted
/// trade-off.
pub struct RefreshTokenLedger {
    store: Arc<dyn RefreshTokenStore>,
    hasher: CredentialHasher,
    scan_window: usize,
}

impl RefreshTokenLedger {
    pub fn new(store: Arc<dyn RefreshTokenStore>, scan_window: usize) -> Self {
        Self {
            store,
            hasher: CredentialHasher::new(),
            scan_window,
        }
    }

    /// Find the still-valid record matching a presented token.
    ///
    /// A record whose hash matches but whose expiry has passed yields `None`
    /// exactly like no match at all, so expired-but-unrevoked rows cannot be
    /// told apart from non-existent tokens by a caller.
    pub async fn find_valid(
        &self,
        presented: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<RefreshTokenRecord>, TokenError> {
        match self.find_match(presented).await? {
            Some(record) if record.is_expired(now) => Ok(None),
            found => Ok(found),
        }
    }

    /// Find the record matching a presented token regardless of expiry.
    ///
    /// Used by logout, which revokes whatever it can find.
    pub async fn find_match(
        &self,
        presented: &str,
    ) -> Result<Option<RefreshTokenRecord>, TokenError> {
        let candidates = self.store.find_recent_active(self.scan_window).await?;

        for candidate in candidates {
            match self.hasher.verify(presented, &candidate.token_hash) {
                Ok(true) => return Ok(Some(candidate)),
                Ok(false) => continue,
                Err(e) => {
                    tracing::warn!(
                        record_id = %candidate.id,
                        error = %e,
                        "Skipping refresh token record with unverifiable hash"
                    );
                    continue;
                }
            }
        }

        Ok(None)
    }

    /// Set `revoked_at` on a record.
    ///
    /// # Returns
    /// `true` iff this call performed the revocation; `false` when the
    /// record was already revoked (or gone), which a rotation caller must
    /// treat as having lost the race.
    pub async fn revoke(
        &self,
        id: &RefreshTokenId,
        now: DateTime<Utc>,
    ) -> Result<bool, TokenError> {
        let revoked = self.store.revoke(id, now).await?;
        if revoked {
            tracing::debug!(record_id = %id, "Refresh token revoked");
        }
        Ok(revoked)
    }
}
