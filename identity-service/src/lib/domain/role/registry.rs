use std::collections::BTreeSet;
use std::sync::Arc;

use crate::domain::role::errors::RoleError;
use crate::domain::role::models::Role;
use crate::domain::role::models::RoleId;
use crate::domain::role::models::RoleKey;
use crate::domain::role::ports::RoleAssignmentStore;
use crate::domain::role::ports::RoleStore;

/// Role catalog and assignment registry.
///
/// Owns normalization, the protected-role policy, and auto-vivification of
/// roles referenced before they exist. Only the two workflow services talk
/// to it; nothing else touches the role stores directly.
#[derive(Clone)]
pub struct RoleRegistry {
    roles: Arc<dyn RoleStore>,
    assignments: Arc<dyn RoleAssignmentStore>,
}

impl RoleRegistry {
    pub fn new(roles: Arc<dyn RoleStore>, assignments: Arc<dyn RoleAssignmentStore>) -> Self {
        Self { roles, assignments }
    }

    /// The whole catalog, ordered by key ascending.
    pub async fn list_catalog(&self) -> Result<Vec<Role>, RoleError> {
        let mut catalog = self.roles.list_all().await?;
        catalog.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(catalog)
    }

    /// Upsert a role by normalized key.
    ///
    /// Creating marks `is_system` iff the key is `ADMIN`; updating an
    /// existing role only touches the description, and only when one is
    /// supplied. Returns the refreshed catalog.
    pub async fn create_or_update(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<Vec<Role>, RoleError> {
        let key = RoleKey::new(name)?;
        let description = description
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string);

        match self.roles.find_by_key(&key).await? {
            None => {
                let role = Role {
                    id: RoleId::new(),
                    key: key.clone(),
                    description,
                    is_system: key.is_admin(),
                };
                self.roles.insert(role).await?;
                tracing::info!(role = %key, "Role created");
            }
            Some(existing) => {
                if description.is_some() {
                    self.roles
                        .update_description(&existing.id, description)
                        .await?;
                }
            }
        }

        self.list_catalog().await
    }

    /// Remove a non-system role and cascade its assignments.
    ///
    /// Reports `false` (not an error) when the role is absent, a system
    /// role, or `ADMIN`.
    pub async fn remove(&self, name: &str) -> Result<bool, RoleError> {
        let key = RoleKey::new(name)?;
        let role = match self.roles.find_by_key(&key).await? {
            Some(role) => role,
            None => return Ok(false),
        };
        if role.is_system || role.key.is_admin() {
            return Ok(false);
        }

        self.assignments.delete_by_role(&role.id).await?;
        self.roles.delete(&role.id).await?;
        tracing::info!(role = %key, "Role removed");
        Ok(true)
    }

    /// Auto-create any missing roles for a batch of keys, then return the
    /// full set of roles for those keys.
    pub async fn ensure_exist(&self, keys: &[RoleKey]) -> Result<Vec<Role>, RoleError> {
        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let existing = self.roles.find_by_keys(keys).await?;
        let known: BTreeSet<&RoleKey> = existing.iter().map(|role| &role.key).collect();
        for key in keys {
            if known.contains(key) {
                continue;
            }
            let role = Role {
                id: RoleId::new(),
                key: key.clone(),
                description: None,
                is_system: key.is_admin(),
            };
            self.roles.insert(role).await?;
        }

        self.roles.find_by_keys(keys).await
    }

    /// A principal's role keys, ordered ascending.
    pub async fn role_keys_for(
        &self,
        principal_id: &crate::domain::identity::models::PrincipalId,
    ) -> Result<Vec<RoleKey>, RoleError> {
        let assignments = self.assignments.find_by_principal(principal_id).await?;
        if assignments.is_empty() {
            return Ok(Vec::new());
        }

        let role_ids: Vec<RoleId> = assignments.iter().map(|a| a.role_id).collect();
        let roles = self.roles.find_by_ids(&role_ids).await?;
        let mut keys: Vec<RoleKey> = roles.into_iter().map(|role| role.key).collect();
        keys.sort();
        Ok(keys)
    }

    /// Replace a principal's assignment set, de-duplicated, auto-vivifying
    /// any missing roles first. Returns the stored keys ordered ascending.
    pub async fn set_for_principal(
        &self,
        principal_id: &crate::domain::identity::models::PrincipalId,
        keys: Vec<RoleKey>,
    ) -> Result<Vec<RoleKey>, RoleError> {
        let deduped: Vec<RoleKey> = keys.into_iter().collect::<BTreeSet<_>>().into_iter().collect();

        let roles = self.ensure_exist(&deduped).await?;
        let role_ids: Vec<RoleId> = roles.iter().map(|role| role.id).collect();
        self.assignments
            .replace_for_principal(principal_id, &role_ids)
            .await?;

        Ok(deduped)
    }
}
