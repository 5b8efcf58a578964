use thiserror::Error;

/// Error for RoleKey validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RoleKeyError {
    #[error("Invalid role name: {0:?}")]
    InvalidRoleName(String),
}

/// Top-level error for role catalog and assignment operations
#[derive(Debug, Clone, Error)]
pub enum RoleError {
    #[error("Invalid role: {0}")]
    InvalidKey(#[from] RoleKeyError),

    #[error("Store error: {0}")]
    Store(String),
}
