use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use crate::domain::token::errors::TokenError;
use crate::domain::token::models::RefreshTokenId;
use crate::domain::token::models::RefreshTokenRecord;

/// Persistence operations for the refresh token ledger.
#[async_trait]
pub trait RefreshTokenStore: Send + Sync + 'static {
    /// Persist a freshly issued record. Issuance always inserts; existing
    /// records are never updated with a new hash.
    ///
    /// # Errors
    /// * `Store` - Storage operation failed
    async fn insert(&self, record: RefreshTokenRecord) -> Result<(), TokenError>;

    /// The most recent non-revoked records, newest first, at most `limit`.
    ///
    /// Expired records are included; filtering expiry is the ledger's job so
    /// that an expired match and a missing match are indistinguishable to
    /// callers.
    async fn find_recent_active(
        &self,
        limit: usize,
    ) -> Result<Vec<RefreshTokenRecord>, TokenError>;

    /// Conditionally set `revoked_at`.
    ///
    /// # Returns
    /// `true` iff the record existed with `revoked_at` null and this call
    /// set it. Concurrent callers racing on the same record must see at
    /// most one `true`.
    async fn revoke(
        &self,
        id: &RefreshTokenId,
        revoked_at: DateTime<Utc>,
    ) -> Result<bool, TokenError>;
}
