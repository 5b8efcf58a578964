use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use crate::domain::identity::errors::IdentityError;
use crate::domain::identity::errors::NotifierError;
use crate::domain::identity::models::CredentialRecord;
use crate::domain::identity::models::NormalizedEmail;
use crate::domain::identity::models::Principal;
use crate::domain::identity::models::PrincipalId;
use crate::domain::role::models::RoleKey;

/// Persistence operations for principals.
///
/// The host owns the principal table; the engine only needs these lookups.
#[async_trait]
pub trait PrincipalStore: Send + Sync + 'static {
    /// Persist a new principal.
    ///
    /// # Errors
    /// * `Store` - Storage operation failed
    async fn insert(&self, principal: Principal) -> Result<Principal, IdentityError>;

    /// Retrieve a principal by identifier.
    ///
    /// # Returns
    /// Optional principal (None if not found)
    async fn find_by_id(&self, id: &PrincipalId) -> Result<Option<Principal>, IdentityError>;

    /// Retrieve a principal by normalized email.
    async fn find_by_email(
        &self,
        email: &NormalizedEmail,
    ) -> Result<Option<Principal>, IdentityError>;

    /// Distinct emails of active principals holding the given role.
    ///
    /// Joins principals, credential records, and role assignments; used for
    /// admin notification fan-out.
    async fn find_active_emails_with_role(
        &self,
        role: &RoleKey,
    ) -> Result<Vec<String>, IdentityError>;
}

/// Persistence operations for credential records.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Persist a new credential record.
    ///
    /// # Errors
    /// * `Store` - Storage operation failed
    async fn insert(&self, record: CredentialRecord) -> Result<CredentialRecord, IdentityError>;

    /// Retrieve the credential record attached to a principal.
    async fn find_by_principal(
        &self,
        id: &PrincipalId,
    ) -> Result<Option<CredentialRecord>, IdentityError>;

    /// Retrieve the credential record currently holding a pending
    /// email-verification token.
    async fn find_by_verification_token(
        &self,
        token: &str,
    ) -> Result<Option<CredentialRecord>, IdentityError>;

    /// Replace the stored password hash.
    async fn update_password_hash(
        &self,
        id: &PrincipalId,
        password_hash: &str,
    ) -> Result<(), IdentityError>;

    /// Mark the email verified and clear the pending verification token.
    async fn set_email_verified(
        &self,
        id: &PrincipalId,
        verified_at: DateTime<Utc>,
    ) -> Result<(), IdentityError>;

    /// Set or clear the admin-approval timestamp.
    async fn set_admin_approved(
        &self,
        id: &PrincipalId,
        approved_at: Option<DateTime<Utc>>,
    ) -> Result<(), IdentityError>;

    /// Flip the active flag. Idempotent.
    async fn set_active(&self, id: &PrincipalId, active: bool) -> Result<(), IdentityError>;
}

/// Outbound notification channel.
///
/// Delivery is the collaborator's concern; the engine treats every send as
/// fire-and-forget and never echoes a token back through an error.
#[async_trait]
pub trait Notifier: Send + Sync + 'static {
    /// Deliver an email-verification token to a freshly registered principal.
    async fn send_email_verification(&self, email: &str, token: &str) -> Result<(), NotifierError>;

    /// Deliver a password-reset token.
    async fn send_password_reset(&self, email: &str, token: &str) -> Result<(), NotifierError>;

    /// Tell the active admins a principal completed email verification.
    async fn send_admins_account_verified(
        &self,
        admin_emails: &[String],
        principal: &Principal,
    ) -> Result<(), NotifierError>;

    /// Tell a principal their account was approved.
    async fn send_account_approved(
        &self,
        email: &str,
        name: Option<&str>,
    ) -> Result<(), NotifierError>;
}
