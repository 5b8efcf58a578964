use thiserror::Error;

/// Error for password-reset operations
#[derive(Debug, Clone, Error)]
pub enum ResetError {
    // One deliberately coarse failure: missing, already-used, and expired
    // tokens are indistinguishable to the caller.
    #[error("Invalid password reset token")]
    InvalidResetToken,

    #[error("Password must contain an uppercase letter, a lowercase letter, and a digit")]
    WeakPassword,

    #[error("Credential hashing error: {0}")]
    Hash(#[from] auth::HashError),

    #[error("Store error: {0}")]
    Store(String),
}
