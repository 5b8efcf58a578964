use async_trait::async_trait;

use crate::domain::identity::models::PrincipalId;
use crate::domain::role::errors::RoleError;
use crate::domain::role::models::Role;
use crate::domain::role::models::RoleAssignment;
use crate::domain::role::models::RoleId;
use crate::domain::role::models::RoleKey;

/// Persistence operations for the role catalog.
#[async_trait]
pub trait RoleStore: Send + Sync + 'static {
    /// Persist a new role.
    ///
    /// # Errors
    /// * `Store` - Storage operation failed
    async fn insert(&self, role: Role) -> Result<Role, RoleError>;

    /// Replace the description of an existing role.
    ///
    /// # Errors
    /// * `Store` - Storage operation failed
    async fn update_description(
        &self,
        id: &RoleId,
        description: Option<String>,
    ) -> Result<(), RoleError>;

    /// Retrieve a role by its normalized key.
    ///
    /// # Returns
    /// Optional role (None if not found)
    async fn find_by_key(&self, key: &RoleKey) -> Result<Option<Role>, RoleError>;

    /// Retrieve the roles whose keys appear in `keys` (missing keys are
    /// skipped without error).
    async fn find_by_keys(&self, keys: &[RoleKey]) -> Result<Vec<Role>, RoleError>;

    /// Retrieve the roles whose ids appear in `ids` (missing ids are skipped
    /// without error).
    async fn find_by_ids(&self, ids: &[RoleId]) -> Result<Vec<Role>, RoleError>;

    /// Retrieve the whole catalog ordered by key ascending.
    async fn list_all(&self) -> Result<Vec<Role>, RoleError>;

    /// Remove a role from the catalog.
    ///
    /// # Errors
    /// * `Store` - Storage operation failed
    async fn delete(&self, id: &RoleId) -> Result<(), RoleError>;
}

/// Persistence operations for principal-role assignments.
#[async_trait]
pub trait RoleAssignmentStore: Send + Sync + 'static {
    /// Retrieve all assignments held by a principal.
    async fn find_by_principal(
        &self,
        principal_id: &PrincipalId,
    ) -> Result<Vec<RoleAssignment>, RoleError>;

    /// Replace a principal's assignment set wholesale.
    ///
    /// # Errors
    /// * `Store` - Storage operation failed
    async fn replace_for_principal(
        &self,
        principal_id: &PrincipalId,
        role_ids: &[RoleId],
    ) -> Result<(), RoleError>;

    /// Remove every assignment referencing a role (cascade for role removal).
    async fn delete_by_role(&self, role_id: &RoleId) -> Result<(), RoleError>;
}
