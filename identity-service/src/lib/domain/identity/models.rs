use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::access::gate::AccountState;
use crate::domain::identity::errors::EmailError;
use crate::domain::identity::errors::PrincipalIdError;
use crate::domain::role::models::RoleKey;
use crate::domain::token::models::IssuedTokens;

/// Principal unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PrincipalId(pub Uuid);

impl PrincipalId {
    /// Generate a new random principal ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a principal ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, PrincipalIdError> {
        Uuid::parse_str(s)
            .map(PrincipalId)
            .map_err(|e| PrincipalIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for PrincipalId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Normalized email address value type.
///
/// Stored and compared in trimmed, lowercased form; format is validated with
/// an RFC 5322 compliant parser at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedEmail(String);

impl NormalizedEmail {
    /// Trim, lowercase, and validate a raw email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Input does not conform to RFC 5322
    pub fn new(email: &str) -> Result<Self, EmailError> {
        let normalized = email.trim().to_lowercase();
        email_address::EmailAddress::from_str(&normalized)
            .map(|_| NormalizedEmail(normalized))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    /// Get the normalized address as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedEmail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// The host application's user identity.
///
/// The host owns profile storage; the engine only reads the fields it needs
/// for tokens and notifications.
#[derive(Debug, Clone)]
pub struct Principal {
    pub id: PrincipalId,
    pub email: NormalizedEmail,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Engine-owned authentication state, one-to-one with a principal.
///
/// Absence of a record means the principal cannot authenticate at all.
#[derive(Debug, Clone)]
pub struct CredentialRecord {
    pub principal_id: PrincipalId,
    pub password_hash: String,
    pub email_verified_at: Option<DateTime<Utc>>,
    /// Pending email-verification token; cleared once redeemed.
    pub email_verification_token: Option<String>,
    pub phone_verified_at: Option<DateTime<Utc>>,
    pub admin_approved_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl CredentialRecord {
    /// Snapshot of the flags the access gate decides on.
    pub fn account_state(&self) -> AccountState {
        AccountState {
            is_active: self.is_active,
            email_verified_at: self.email_verified_at,
            phone_verified_at: self.phone_verified_at,
            admin_approved_at: self.admin_approved_at,
        }
    }
}

/// Result of a successful login or refresh.
#[derive(Debug, Clone)]
pub struct AuthOutcome {
    pub principal: Principal,
    /// Role keys ordered ascending, as carried in the access token.
    pub roles: Vec<RoleKey>,
    pub tokens: IssuedTokens,
}

/// Password strength policy: at least one uppercase letter, one lowercase
/// letter, and one digit.
pub fn is_strong_password(password: &str) -> bool {
    password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_digit())
}
