use thiserror::Error;

use crate::domain::identity::errors::IdentityError;
use crate::domain::role::errors::RoleError;
use crate::domain::role::errors::RoleKeyError;

/// Top-level error for admin-facing workflow operations
#[derive(Debug, Error)]
pub enum AccessError {
    // The caller is privileged, so naming the missing principal is safe
    #[error("Principal not found: {0}")]
    PrincipalNotFound(String),

    #[error("Invalid role name: {0}")]
    InvalidRoleName(#[from] RoleKeyError),

    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error(transparent)]
    Role(#[from] RoleError),
}
