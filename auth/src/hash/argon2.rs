use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Argon2;

use super::errors::HashError;

/// One-way credential hashing.
///
/// Wraps Argon2id with a fresh random salt per digest. The slow hash is
/// deliberate: the same hasher protects passwords and refresh-token secrets,
/// so an exfiltrated store cannot be brute-forced offline at digest speed.
pub struct CredentialHasher;

impl CredentialHasher {
    /// Create a new hasher with the library's default Argon2id parameters.
    pub fn new() -> Self {
        Self
    }

    /// Hash a plaintext secret.
    ///
    /// Non-deterministic: every call salts independently, so two digests of
    /// the same secret never compare equal. Matching goes through [`verify`].
    ///
    /// # Arguments
    /// * `secret` - Plaintext password or token secret
    ///
    /// # Returns
    /// PHC string format digest (algorithm, parameters, salt, and hash)
    ///
    /// # Errors
    /// * `HashingFailed` - The hashing operation itself failed
    ///
    /// [`verify`]: CredentialHasher::verify
    pub fn hash(&self, secret: &str) -> Result<String, HashError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        argon2
            .hash_password(secret.as_bytes(), &salt)
            .map(|digest| digest.to_string())
            .map_err(|e| HashError::HashingFailed(e.to_string()))
    }

    /// Verify a plaintext secret against a stored digest.
    ///
    /// A mismatch is a `false` return, never an error; only a digest that
    /// cannot be parsed at all is reported as `InvalidDigest`.
    ///
    /// # Arguments
    /// * `secret` - Plaintext to check
    /// * `digest` - Stored digest in PHC string format
    pub fn verify(&self, secret: &str, digest: &str) -> Result<bool, HashError> {
        let parsed = PasswordHash::new(digest).map_err(|e| HashError::InvalidDigest(e.to_string()))?;

        let argon2 = Argon2::default();

        Ok(argon2.verify_password(secret.as_bytes(), &parsed).is_ok())
    }
}

impl Default for CredentialHasher {
    fn default() -> Self {
        Self::new()
    }
}
