use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use crate::domain::reset::errors::ResetError;
use crate::domain::reset::models::ResetTokenId;
use crate::domain::reset::models::ResetTokenRecord;

/// Persistence operations for password-reset tokens.
#[async_trait]
pub trait ResetTokenStore: Send + Sync + 'static {
    /// Persist a new reset token record.
    ///
    /// # Errors
    /// * `Store` - Storage operation failed
    async fn insert(&self, record: ResetTokenRecord) -> Result<(), ResetError>;

    /// Retrieve a record by its token value.
    async fn find_by_token(&self, token: &str) -> Result<Option<ResetTokenRecord>, ResetError>;

    /// Conditionally set `used_at`.
    ///
    /// # Returns
    /// `true` iff the record existed with `used_at` null and this call set
    /// it. Concurrent redeemers racing on the same record must see at most
    /// one `true`.
    async fn mark_used(
        &self,
        id: &ResetTokenId,
        used_at: DateTime<Utc>,
    ) -> Result<bool, ResetError>;
}
