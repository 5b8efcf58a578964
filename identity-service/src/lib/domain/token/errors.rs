use thiserror::Error;

/// Error for token issuance and ledger operations
#[derive(Debug, Clone, Error)]
pub enum TokenError {
    #[error("Access token error: {0}")]
    Jwt(#[from] auth::JwtError),

    #[error("Token hashing error: {0}")]
    Hash(#[from] auth::HashError),

    #[error("Store error: {0}")]
    Store(String),
}
