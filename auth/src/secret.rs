//! Opaque token secret generation.
//!
//! Refresh tokens, password-reset tokens, and email-verification tokens are
//! not signed credentials; they are random secrets whose only property is
//! unguessability. 32 bytes from the OS RNG give 256 bits of entropy,
//! rendered as URL-safe base64 so the value survives query strings and email
//! links unescaped.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;

/// Number of random bytes per secret (256 bits).
const SECRET_BYTES: usize = 32;

/// Generate a fresh opaque secret.
///
/// The caller sees the plaintext exactly once; whether it is persisted
/// hashed (refresh tokens) or plaintext-comparable (short-lived reset
/// tokens) is the caller's policy.
pub fn generate() -> String {
    let mut bytes = [0u8; SECRET_BYTES];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_length_and_charset() {
        let secret = generate();

        // 32 bytes -> 43 base64 chars without padding
        assert_eq!(secret.len(), 43);
        assert!(secret
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_generate_is_unique() {
        let first = generate();
        let second = generate();
        assert_ne!(first, second);
    }
}
