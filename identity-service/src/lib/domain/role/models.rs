use std::fmt;

use uuid::Uuid;

use crate::domain::identity::models::PrincipalId;
use crate::domain::role::errors::RoleKeyError;

/// Reserved system role that always exists and can never be deleted.
pub const ADMIN_ROLE: &str = "ADMIN";

/// Role unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoleId(pub Uuid);

impl RoleId {
    /// Generate a new random role ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RoleId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Normalized role key value type.
///
/// Roles are addressed by an uppercase key matching `[A-Z][A-Z0-9_]*`. The
/// key can only be constructed through the validating factory, so any
/// `RoleKey` held at runtime is already normalized: trimmed, uppercased,
/// whitespace runs collapsed to a single underscore. The legacy alias
/// `ADMINISTRATOR` normalizes to `ADMIN`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoleKey(String);

impl RoleKey {
    /// Normalize and validate a raw role name.
    ///
    /// # Errors
    /// * `InvalidRoleName` - Normalized form does not match `[A-Z][A-Z0-9_]*`
    pub fn new(name: &str) -> Result<Self, RoleKeyError> {
        let normalized = name
            .trim()
            .to_uppercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_");

        let mut chars = normalized.chars();
        let valid = matches!(chars.next(), Some(c) if c.is_ascii_uppercase())
            && chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_');
        if !valid {
            return Err(RoleKeyError::InvalidRoleName(name.trim().to_string()));
        }

        if normalized == "ADMINISTRATOR" {
            return Ok(Self(ADMIN_ROLE.to_string()));
        }

        Ok(Self(normalized))
    }

    /// The reserved `ADMIN` key.
    pub fn admin() -> Self {
        Self(ADMIN_ROLE.to_string())
    }

    pub fn is_admin(&self) -> bool {
        self.0 == ADMIN_ROLE
    }

    /// Get the normalized key as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Role catalog entry.
#[derive(Debug, Clone)]
pub struct Role {
    pub id: RoleId,
    pub key: RoleKey,
    pub description: Option<String>,
    /// System roles (currently only `ADMIN`) cannot be removed.
    pub is_system: bool,
}

/// Many-to-many join between a principal and a role, unique per pair.
#[derive(Debug, Clone)]
pub struct RoleAssignment {
    pub id: Uuid,
    pub principal_id: PrincipalId,
    pub role_id: RoleId,
}
