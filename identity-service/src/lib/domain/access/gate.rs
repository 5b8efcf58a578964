use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;

/// Account-state flags the gate decides on.
///
/// A snapshot taken from the credential record; the gate itself performs no
/// I/O and can be evaluated anywhere.
#[derive(Debug, Clone, Copy)]
pub struct AccountState {
    pub is_active: bool,
    pub email_verified_at: Option<DateTime<Utc>>,
    pub phone_verified_at: Option<DateTime<Utc>>,
    pub admin_approved_at: Option<DateTime<Utc>>,
}

/// Which account-state requirements the gate enforces.
///
/// Each flag is independently overridable through configuration.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct AccessRequirements {
    #[serde(default = "default_true")]
    pub require_active: bool,
    #[serde(default = "default_true")]
    pub require_email_verification: bool,
    #[serde(default)]
    pub require_phone_verification: bool,
    #[serde(default = "default_true")]
    pub require_admin_approval: bool,
}

fn default_true() -> bool {
    true
}

impl Default for AccessRequirements {
    fn default() -> Self {
        Self {
            require_active: true,
            require_email_verification: true,
            require_phone_verification: false,
            require_admin_approval: true,
        }
    }
}

/// Why an otherwise-authenticated principal may not proceed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockReason {
    AccountDeactivated,
    EmailVerificationRequired,
    PhoneVerificationRequired,
    AdminApprovalRequired,
}

impl BlockReason {
    /// Stable machine-readable code for transports to surface.
    pub fn as_code(&self) -> &'static str {
        match self {
            BlockReason::AccountDeactivated => "ACCOUNT_DEACTIVATED",
            BlockReason::EmailVerificationRequired => "EMAIL_VERIFICATION_REQUIRED",
            BlockReason::PhoneVerificationRequired => "PHONE_VERIFICATION_REQUIRED",
            BlockReason::AdminApprovalRequired => "ADMIN_APPROVAL_REQUIRED",
        }
    }
}

impl std::fmt::Display for BlockReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_code())
    }
}

/// Decide whether an account may authenticate.
///
/// Requirements are checked in a fixed order, short-circuiting at the first
/// violation: active, then email verified, then phone verified, then admin
/// approved. Disabling a requirement makes its missing field never block.
/// Returns `None` when every enabled requirement is satisfied.
pub fn decide(state: &AccountState, requirements: &AccessRequirements) -> Option<BlockReason> {
    if requirements.require_active && !state.is_active {
        return Some(BlockReason::AccountDeactivated);
    }

    if requirements.require_email_verification && state.email_verified_at.is_none() {
        return Some(BlockReason::EmailVerificationRequired);
    }

    if requirements.require_phone_verification && state.phone_verified_at.is_none() {
        return Some(BlockReason::PhoneVerificationRequired);
    }

    if requirements.require_admin_approval && state.admin_approved_at.is_none() {
        return Some(BlockReason::AdminApprovalRequired);
    }

    None
}
