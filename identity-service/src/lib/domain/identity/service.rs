use std::sync::Arc;

use auth::CredentialHasher;
use chrono::Duration;

use crate::config::EngineConfig;
use crate::domain::access::gate;
use crate::domain::access::gate::AccessRequirements;
use crate::domain::clock::Clock;
use crate::domain::identity::errors::IdentityError;
use crate::domain::identity::models::is_strong_password;
use crate::domain::identity::models::AuthOutcome;
use crate::domain::identity::models::CredentialRecord;
use crate::domain::identity::models::NormalizedEmail;
use crate::domain::identity::models::Principal;
use crate::domain::identity::models::PrincipalId;
use crate::domain::identity::ports::CredentialStore;
use crate::domain::identity::ports::Notifier;
use crate::domain::identity::ports::PrincipalStore;
use crate::domain::reset::ports::ResetTokenStore;
use crate::domain::reset::PasswordResetWorkflow;
use crate::domain::role::ports::RoleAssignmentStore;
use crate::domain::role::ports::RoleStore;
use crate::domain::role::registry::RoleRegistry;
use crate::domain::token::ledger::RefreshTokenLedger;
use crate::domain::token::ports::RefreshTokenStore;
use crate::domain::token::TokenIssuer;

/// Orchestrates the principal-facing authentication lifecycle: registration,
/// login, token refresh, logout, and password change/reset.
///
/// Per principal the state machine runs
/// `Unregistered -> Registered(unverified) -> Verified -> Approved`, with an
/// orthogonal active flag; the access gate evaluates those flags on every
/// login and refresh.
pub struct IdentityService {
    principals: Arc<dyn PrincipalStore>,
    credentials: Arc<dyn CredentialStore>,
    registry: RoleRegistry,
    issuer: TokenIssuer,
    ledger: RefreshTokenLedger,
    reset: PasswordResetWorkflow,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    hasher: CredentialHasher,
    requirements: AccessRequirements,
}

impl IdentityService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: &EngineConfig,
        principals: Arc<dyn PrincipalStore>,
        credentials: Arc<dyn CredentialStore>,
        refresh_tokens: Arc<dyn RefreshTokenStore>,
        reset_tokens: Arc<dyn ResetTokenStore>,
        roles: Arc<dyn RoleStore>,
        assignments: Arc<dyn RoleAssignmentStore>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let issuer = TokenIssuer::new(
            config.jwt.secret.as_bytes(),
            Duration::minutes(config.jwt.access_token_ttl_minutes),
            Duration::days(config.tokens.refresh_token_ttl_days),
            Arc::clone(&refresh_tokens),
        );
        let ledger = RefreshTokenLedger::new(refresh_tokens, config.tokens.refresh_scan_window);
        let reset = PasswordResetWorkflow::new(
            Arc::clone(&principals),
            Arc::clone(&credentials),
            reset_tokens,
            Arc::clone(&notifier),
            Duration::minutes(config.tokens.reset_token_ttl_minutes),
        );

        Self {
            principals,
            credentials,
            registry: RoleRegistry::new(roles, assignments),
            issuer,
            ledger,
            reset,
            notifier,
            clock,
            hasher: CredentialHasher::new(),
            requirements: config.access.clone(),
        }
    }

    /// Register a new principal with an unverified credential record.
    ///
    /// The generated email-verification token goes only to the notifier;
    /// a delivery failure is logged and does not roll the registration back.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        first_name: Option<String>,
        last_name: Option<String>,
    ) -> Result<Principal, IdentityError> {
        let email = NormalizedEmail::new(email)?;

        if !is_strong_password(password) {
            return Err(IdentityError::WeakPassword);
        }

        if self.principals.find_by_email(&email).await?.is_some() {
            return Err(IdentityError::DuplicateEmail(email.as_str().to_string()));
        }

        let now = self.clock.now();
        let password_hash = self.hasher.hash(password)?;
        let verification_token = auth::secret::generate();

        let principal = self
            .principals
            .insert(Principal {
                id: PrincipalId::new(),
                email,
                first_name,
                last_name,
            })
            .await?;

        self.credentials
            .insert(CredentialRecord {
                principal_id: principal.id,
                password_hash,
                email_verified_at: None,
                email_verification_token: Some(verification_token.clone()),
                phone_verified_at: None,
                admin_approved_at: None,
                is_active: true,
                created_at: now,
            })
            .await?;

        if let Err(err) = self
            .notifier
            .send_email_verification(principal.email.as_str(), &verification_token)
            .await
        {
            tracing::warn!(
                principal_id = %principal.id,
                error = %err,
                "Email verification notification failed"
            );
        }

        tracing::info!(principal_id = %principal.id, "Principal registered");
        Ok(principal)
    }

    /// Authenticate with email and password and issue a token pair.
    ///
    /// Unknown email and wrong password produce the same
    /// `InvalidCredentials`; the access gate runs only after the password
    /// check so a blocked reason never leaks whether the password was right
    /// for a non-existent account.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthOutcome, IdentityError> {
        let now = self.clock.now();

        let email = match NormalizedEmail::new(email) {
            Ok(email) => email,
            Err(_) => return Err(IdentityError::InvalidCredentials),
        };

        let principal = self
            .principals
            .find_by_email(&email)
            .await?
            .ok_or(IdentityError::InvalidCredentials)?;

        let credential = self
            .credentials
            .find_by_principal(&principal.id)
            .await?
            .ok_or(IdentityError::InvalidCredentials)?;

        if !self.hasher.verify(password, &credential.password_hash)? {
            tracing::warn!(principal_id = %principal.id, "Failed login attempt");
            return Err(IdentityError::InvalidCredentials);
        }

        if let Some(reason) = gate::decide(&credential.account_state(), &self.requirements) {
            return Err(IdentityError::Blocked(reason));
        }

        let roles = self.registry.role_keys_for(&principal.id).await?;
        let tokens = self.issuer.issue(&principal, &roles, now).await?;

        tracing::info!(principal_id = %principal.id, "Principal logged in");
        Ok(AuthOutcome {
            principal,
            roles,
            tokens,
        })
    }

    /// Rotate a refresh token: revoke the presented one and issue a fresh
    /// pair.
    ///
    /// The conditional revoke runs before anything is issued, so of two
    /// concurrent refreshes with the same token at most one obtains new
    /// tokens; the other observes `InvalidRefreshToken`. The access gate
    /// re-runs here, so a principal deactivated after login cannot refresh.
    pub async fn refresh(&self, refresh_token: &str) -> Result<AuthOutcome, IdentityError> {
        let now = self.clock.now();

        let record = self
            .ledger
            .find_valid(refresh_token, now)
            .await?
            .ok_or(IdentityError::InvalidRefreshToken)?;

        if !self.ledger.revoke(&record.id, now).await? {
            // Lost the rotation race to a concurrent refresh
            return Err(IdentityError::InvalidRefreshToken);
        }

        let principal = self
            .principals
            .find_by_id(&record.principal_id)
            .await?
            .ok_or(IdentityError::InvalidRefreshToken)?;

        let credential = self
            .credentials
            .find_by_principal(&principal.id)
            .await?
            .ok_or(IdentityError::InvalidRefreshToken)?;

        if let Some(reason) = gate::decide(&credential.account_state(), &self.requirements) {
            return Err(IdentityError::Blocked(reason));
        }

        let roles = self.registry.role_keys_for(&principal.id).await?;
        let tokens = self.issuer.issue(&principal, &roles, now).await?;

        tracing::debug!(principal_id = %principal.id, "Refresh token rotated");
        Ok(AuthOutcome {
            principal,
            roles,
            tokens,
        })
    }

    /// Best-effort session teardown.
    ///
    /// Revokes the presented token's record when one matches, expired or
    /// not. A missing token, no match, and even a store failure all still
    /// report success; there is nothing useful a caller could do with a
    /// logout error.
    pub async fn logout(&self, refresh_token: Option<&str>) {
        let Some(refresh_token) = refresh_token else {
            return;
        };

        let found = match self.ledger.find_match(refresh_token).await {
            Ok(found) => found,
            Err(err) => {
                tracing::warn!(error = %err, "Logout lookup failed");
                return;
            }
        };

        if let Some(record) = found {
            let now = self.clock.now();
            if let Err(err) = self.ledger.revoke(&record.id, now).await {
                tracing::warn!(
                    principal_id = %record.principal_id,
                    error = %err,
                    "Logout revocation failed"
                );
            }
        }
    }

    /// Replace a principal's password after re-verifying the current one.
    pub async fn change_password(
        &self,
        principal_id: &PrincipalId,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), IdentityError> {
        let credential = self
            .credentials
            .find_by_principal(principal_id)
            .await?
            .ok_or_else(|| IdentityError::PrincipalNotFound(principal_id.to_string()))?;

        if !self
            .hasher
            .verify(current_password, &credential.password_hash)?
        {
            return Err(IdentityError::InvalidCredentials);
        }

        if !is_strong_password(new_password) {
            return Err(IdentityError::WeakPassword);
        }

        let password_hash = self.hasher.hash(new_password)?;
        self.credentials
            .update_password_hash(principal_id, &password_hash)
            .await?;

        tracing::info!(principal_id = %principal_id, "Password changed");
        Ok(())
    }

    /// Redeem a pending email-verification token.
    ///
    /// Marks the email verified and clears the pending token, so a second
    /// redemption of the same token fails `InvalidVerificationToken`.
    pub async fn verify_email_by_token(&self, token: &str) -> Result<Principal, IdentityError> {
        let credential = self
            .credentials
            .find_by_verification_token(token)
            .await?
            .ok_or(IdentityError::InvalidVerificationToken)?;

        let now = self.clock.now();
        self.credentials
            .set_email_verified(&credential.principal_id, now)
            .await?;

        let principal = self
            .principals
            .find_by_id(&credential.principal_id)
            .await?
            .ok_or_else(|| {
                IdentityError::PrincipalNotFound(credential.principal_id.to_string())
            })?;

        tracing::info!(principal_id = %principal.id, "Email verified");
        Ok(principal)
    }

    /// Start a password reset; identical success shape whether or not the
    /// email matches a principal.
    pub async fn request_password_reset(&self, email: &str) -> Result<(), IdentityError> {
        let now = self.clock.now();
        self.reset.request(email, now).await?;
        Ok(())
    }

    /// Redeem a reset token and install a new password.
    pub async fn reset_password(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<(), IdentityError> {
        let now = self.clock.now();
        self.reset.redeem(token, new_password, now).await?;
        Ok(())
    }
}
