use thiserror::Error;

use crate::domain::access::gate::BlockReason;
use crate::domain::reset::errors::ResetError;
use crate::domain::role::errors::RoleError;
use crate::domain::token::errors::TokenError;

/// Error for PrincipalId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PrincipalIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

/// Error for NormalizedEmail validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Error for notification delivery failures.
///
/// Notification is fire-and-forget from the engine's perspective: services
/// log this error and never roll back the state change that triggered the
/// notification.
#[derive(Debug, Clone, Error)]
#[error("Notification failed: {0}")]
pub struct NotifierError(pub String);

/// Top-level error for identity operations
#[derive(Debug, Error)]
pub enum IdentityError {
    // Value object validation errors (caller's fault, safe to report verbatim)
    #[error("Invalid principal ID: {0}")]
    InvalidPrincipalId(#[from] PrincipalIdError),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Password must contain an uppercase letter, a lowercase letter, and a digit")]
    WeakPassword,

    // Conflict
    #[error("Email already in use: {0}")]
    DuplicateEmail(String),

    // Authentication failures, deliberately low-information: unknown email
    // and wrong password are indistinguishable, as are missing, expired,
    // and revoked tokens.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("Invalid verification token")]
    InvalidVerificationToken,

    #[error("Authentication blocked: {0}")]
    Blocked(BlockReason),

    // Admin-facing lookup failure (the caller is already privileged, so
    // enumeration is not a concern here)
    #[error("Principal not found: {0}")]
    PrincipalNotFound(String),

    // Collaborator errors
    #[error("Credential hashing error: {0}")]
    Hash(#[from] auth::HashError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Reset(#[from] ResetError),

    #[error(transparent)]
    Role(#[from] RoleError),

    // Infrastructure errors
    #[error("Store error: {0}")]
    Store(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for IdentityError {
    fn from(err: anyhow::Error) -> Self {
        IdentityError::Unknown(err.to_string())
    }
}
