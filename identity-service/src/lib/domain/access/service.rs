use std::collections::BTreeSet;
use std::sync::Arc;

use crate::domain::access::errors::AccessError;
use crate::domain::clock::Clock;
use crate::domain::identity::models::Principal;
use crate::domain::identity::models::PrincipalId;
use crate::domain::identity::ports::CredentialStore;
use crate::domain::identity::ports::Notifier;
use crate::domain::identity::ports::PrincipalStore;
use crate::domain::role::models::Role;
use crate::domain::role::models::RoleKey;
use crate::domain::role::ports::RoleAssignmentStore;
use crate::domain::role::ports::RoleStore;
use crate::domain::role::registry::RoleRegistry;

/// Outcome of the admin fan-out after an email verification.
#[derive(Debug, Clone)]
pub struct AdminNotification {
    /// Whether a notification was attempted (there was at least one admin).
    pub notified: bool,
    /// Distinct active admin emails, ordered ascending.
    pub admin_emails: Vec<String>,
}

/// Orchestrates the admin-facing mutations: verification completion,
/// approval toggling, activation toggling, and the role catalog and
/// per-principal assignments.
pub struct AccessWorkflowService {
    principals: Arc<dyn PrincipalStore>,
    credentials: Arc<dyn CredentialStore>,
    registry: RoleRegistry,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
}

impl AccessWorkflowService {
    pub fn new(
        principals: Arc<dyn PrincipalStore>,
        credentials: Arc<dyn CredentialStore>,
        roles: Arc<dyn RoleStore>,
        assignments: Arc<dyn RoleAssignmentStore>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            principals,
            credentials,
            registry: RoleRegistry::new(roles, assignments),
            notifier,
            clock,
        }
    }

    async fn require_principal(&self, id: &PrincipalId) -> Result<Principal, AccessError> {
        self.principals
            .find_by_id(id)
            .await?
            .ok_or_else(|| AccessError::PrincipalNotFound(id.to_string()))
    }

    /// Mark a principal's email verified and tell the active admins an
    /// account awaits approval.
    ///
    /// Notification happens only when at least one active principal holds
    /// `ADMIN`; a delivery failure is logged but still counts as notified,
    /// since the verification itself already committed.
    pub async fn mark_email_verified_and_notify_admins(
        &self,
        principal_id: &PrincipalId,
    ) -> Result<AdminNotification, AccessError> {
        let principal = self.require_principal(principal_id).await?;

        let now = self.clock.now();
        self.credentials.set_email_verified(principal_id, now).await?;

        let admin_emails: Vec<String> = self
            .principals
            .find_active_emails_with_role(&RoleKey::admin())
            .await?
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let notified = !admin_emails.is_empty();
        if notified {
            if let Err(err) = self
                .notifier
                .send_admins_account_verified(&admin_emails, &principal)
                .await
            {
                tracing::warn!(
                    principal_id = %principal.id,
                    error = %err,
                    "Admin notification failed"
                );
            }
        }

        tracing::info!(
            principal_id = %principal.id,
            admins = admin_emails.len(),
            "Email verified by admin workflow"
        );
        Ok(AdminNotification {
            notified,
            admin_emails,
        })
    }

    /// Grant or revoke admin approval.
    ///
    /// The principal is told only on the transition to approved; a
    /// revocation is silent.
    pub async fn set_admin_approval(
        &self,
        principal_id: &PrincipalId,
        approved: bool,
    ) -> Result<(), AccessError> {
        let principal = self.require_principal(principal_id).await?;

        let approved_at = approved.then(|| self.clock.now());
        self.credentials
            .set_admin_approved(principal_id, approved_at)
            .await?;

        if approved {
            if let Err(err) = self
                .notifier
                .send_account_approved(principal.email.as_str(), principal.first_name.as_deref())
                .await
            {
                tracing::warn!(
                    principal_id = %principal.id,
                    error = %err,
                    "Approval notification failed"
                );
            }
        }

        tracing::info!(principal_id = %principal.id, approved, "Admin approval updated");
        Ok(())
    }

    /// Flip the active flag. Unconditional and idempotent.
    pub async fn set_active(
        &self,
        principal_id: &PrincipalId,
        active: bool,
    ) -> Result<(), AccessError> {
        self.require_principal(principal_id).await?;
        self.credentials.set_active(principal_id, active).await?;
        tracing::info!(principal_id = %principal_id, active, "Active flag updated");
        Ok(())
    }

    /// The role catalog, ordered by key.
    pub async fn list_roles(&self) -> Result<Vec<Role>, AccessError> {
        Ok(self.registry.list_catalog().await?)
    }

    /// Upsert a role by name. Returns the refreshed catalog.
    pub async fn upsert_role(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<Vec<Role>, AccessError> {
        Ok(self.registry.create_or_update(name, description).await?)
    }

    /// Delete a role from the catalog, cascading its assignments.
    ///
    /// Reports `false` when the role is absent, a system role, or `ADMIN`.
    pub async fn delete_role(&self, name: &str) -> Result<bool, AccessError> {
        Ok(self.registry.remove(name).await?)
    }

    /// A principal's role keys, ordered ascending.
    pub async fn get_roles(&self, principal_id: &PrincipalId) -> Result<Vec<RoleKey>, AccessError> {
        self.require_principal(principal_id).await?;
        Ok(self.registry.role_keys_for(principal_id).await?)
    }

    /// Replace a principal's role set with the given names, normalized and
    /// de-duplicated. Missing roles are auto-created.
    pub async fn set_roles(
        &self,
        principal_id: &PrincipalId,
        names: &[String],
    ) -> Result<Vec<RoleKey>, AccessError> {
        self.require_principal(principal_id).await?;

        let mut keys = Vec::with_capacity(names.len());
        for name in names {
            keys.push(RoleKey::new(name)?);
        }

        Ok(self.registry.set_for_principal(principal_id, keys).await?)
    }

    /// Add one role to a principal's set. Idempotent.
    pub async fn assign_role(
        &self,
        principal_id: &PrincipalId,
        name: &str,
    ) -> Result<Vec<RoleKey>, AccessError> {
        self.require_principal(principal_id).await?;

        let key = RoleKey::new(name)?;
        let mut keys = self.registry.role_keys_for(principal_id).await?;
        keys.push(key);

        Ok(self.registry.set_for_principal(principal_id, keys).await?)
    }

    /// Drop one role from a principal's set. Absent assignments are not an
    /// error.
    pub async fn remove_role(
        &self,
        principal_id: &PrincipalId,
        name: &str,
    ) -> Result<Vec<RoleKey>, AccessError> {
        self.require_principal(principal_id).await?;

        let key = RoleKey::new(name)?;
        let keys: Vec<RoleKey> = self
            .registry
            .role_keys_for(principal_id)
            .await?
            .into_iter()
            .filter(|held| held != &key)
            .collect();

        Ok(self.registry.set_for_principal(principal_id, keys).await?)
    }
}
