//! Password hashing for the credential service
//!
//! One-way Argon2 transform with a fresh random salt per call; verification
//! relies on argon2's internal constant-time comparison.

use anyhow::Result;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};

/// Hash a password with a fresh random salt
pub fn hash(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
        .to_string();

    Ok(password_hash)
}

/// Verify a password against a stored hash
///
/// A mismatch is `Ok(false)`; a stored hash that cannot be parsed is an
/// error.
pub fn verify(password: &str, stored_hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(stored_hash)
        .map_err(|e| anyhow::anyhow!("Failed to parse password hash: {}", e))?;

    let argon2 = Argon2::default();
    let result = argon2.verify_password(password.as_bytes(), &parsed_hash);

    Ok(result.is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let hashed = hash("hunter2hunter2").unwrap();

        assert!(verify("hunter2hunter2", &hashed).unwrap());
        assert!(!verify("wrong password", &hashed).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let first = hash("same password").unwrap();
        let second = hash("same password").unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn test_malformed_stored_hash_is_an_error() {
        assert!(verify("anything", "not-a-phc-string").is_err());
    }
}
