//! Authentication primitives library
//!
//! Provides the cryptographic building blocks for the identity engine:
//! - Credential hashing (Argon2id), used for passwords and refresh-token secrets
//! - JWT encoding and validation for signed access tokens
//! - High-entropy opaque secret generation for refresh, reset, and
//!   email-verification tokens
//!
//! The engine defines its own claims and record types and composes these
//! primitives; nothing in this crate knows about principals, roles, or stores.
//!
//! # Examples
//!
//! ## Credential Hashing
//! ```
//! use auth::CredentialHasher;
//!
//! let hasher = CredentialHasher::new();
//! let digest = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &digest).unwrap());
//! assert!(!hasher.verify("not_my_password", &digest).unwrap());
//! ```
//!
//! ## Opaque Secrets
//! ```
//! let secret = auth::secret::generate();
//! // 32 random bytes, URL-safe base64 without padding
//! assert_eq!(secret.len(), 43);
//! ```

pub mod hash;
pub mod jwt;
pub mod secret;

// Re-export commonly used items
pub use hash::CredentialHasher;
pub use hash::HashError;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
