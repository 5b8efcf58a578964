use std::sync::Arc;

use auth::CredentialHasher;
use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::domain::identity::models::is_strong_password;
use crate::domain::identity::models::NormalizedEmail;
use crate::domain::identity::ports::CredentialStore;
use crate::domain::identity::ports::Notifier;
use crate::domain::identity::ports::PrincipalStore;
use crate::domain::reset::errors::ResetError;
use crate::domain::reset::models::ResetTokenId;
use crate::domain::reset::models::ResetTokenRecord;
use crate::domain::reset::ports::ResetTokenStore;

/// Issues and redeems one-time password-reset tokens.
pub struct PasswordResetWorkflow {
    principals: Arc<dyn PrincipalStore>,
    credentials: Arc<dyn CredentialStore>,
    tokens: Arc<dyn ResetTokenStore>,
    notifier: Arc<dyn Notifier>,
    hasher: CredentialHasher,
    token_ttl: Duration,
}

impl PasswordResetWorkflow {
    pub fn new(
        principals: Arc<dyn PrincipalStore>,
        credentials: Arc<dyn CredentialStore>,
        tokens: Arc<dyn ResetTokenStore>,
        notifier: Arc<dyn Notifier>,
        token_ttl: Duration,
    ) -> Self {
        Self {
            principals,
            credentials,
            tokens,
            notifier,
            hasher: CredentialHasher::new(),
            token_ttl,
        }
    }

    /// Start a reset for an email address.
    ///
    /// Succeeds identically whether or not the email matches a principal,
    /// so the endpoint cannot be used to enumerate accounts. Only when a
    /// match exists is a token generated, persisted, and handed to the
    /// notifier.
    pub async fn request(&self, email: &str, now: DateTime<Utc>) -> Result<(), ResetError> {
        let email = match NormalizedEmail::new(email) {
            Ok(email) => email,
            // Unparseable input cannot match anyone; same success shape
            Err(_) => return Ok(()),
        };

        let principal = match self
            .principals
            .find_by_email(&email)
            .await
            .map_err(|e| ResetError::Store(e.to_string()))?
        {
            Some(principal) => principal,
            None => return Ok(()),
        };
        let credential = self
            .credentials
            .find_by_principal(&principal.id)
            .await
            .map_err(|e| ResetError::Store(e.to_string()))?;
        if credential.is_none() {
            return Ok(());
        }

        let token = auth::secret::generate();
        self.tokens
            .insert(ResetTokenRecord {
                id: ResetTokenId::new(),
                principal_id: principal.id,
                token: token.clone(),
                expires_at: now + self.token_ttl,
                used_at: None,
            })
            .await?;

        if let Err(e) = self
            .notifier
            .send_password_reset(principal.email.as_str(), &token)
            .await
        {
            tracing::error!(
                principal_id = %principal.id,
                error = %e,
                "Failed to deliver password reset notification"
            );
        }

        tracing::debug!(principal_id = %principal.id, "Password reset requested");
        Ok(())
    }

    /// Redeem a reset token and install a new password.
    ///
    /// The conditional mark-used runs before the password is touched, so of
    /// any number of concurrent redeemers exactly one wins; the rest observe
    /// `InvalidResetToken`, the same failure a missing or expired token
    /// produces.
    pub async fn redeem(
        &self,
        token: &str,
        new_password: &str,
        now: DateTime<Utc>,
    ) -> Result<(), ResetError> {
        let record = self
            .tokens
            .find_by_token(token)
            .await?
            .ok_or(ResetError::InvalidResetToken)?;
        if !record.is_redeemable(now) {
            return Err(ResetError::InvalidResetToken);
        }
        if !is_strong_password(new_password) {
            return Err(ResetError::WeakPassword);
        }

        let won = self.tokens.mark_used(&record.id, now).await?;
        if !won {
            return Err(ResetError::InvalidResetToken);
        }

        let password_hash = self.hasher.hash(new_password)?;
        self.credentials
            .update_password_hash(&record.principal_id, &password_hash)
            .await
            .map_err(|e| ResetError::Store(e.to_string()))?;

        tracing::info!(principal_id = %record.principal_id, "Password reset redeemed");
        Ok(())
    }
}
