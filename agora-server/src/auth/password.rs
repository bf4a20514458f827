//! Password hashing
//!
//! New passwords are stored as Argon2id PHC strings. Rows written before
//! hashing was introduced hold the plaintext; those still verify by exact
//! comparison and are logged so they can be rotated.

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use rand::rngs::OsRng;

#[derive(Debug, thiserror::Error)]
#[error("failed to hash password: {0}")]
pub struct PasswordError(String);

/// Hash a password into a PHC string.
pub fn hash_password(plain: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError(e.to_string()))
}

/// Check `candidate` against a stored password.
pub fn verify_password(stored: &str, candidate: &str) -> bool {
    match PasswordHash::new(stored) {
        Ok(parsed) => Argon2::default()
            .verify_password(candidate.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => {
            tracing::warn!("verifying against a legacy plaintext password row");
            constant_time_eq::constant_time_eq(stored.as_bytes(), candidate.as_bytes())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let stored = hash_password("hunter22").unwrap();
        assert!(stored.starts_with("$argon2"));
        assert!(verify_password(&stored, "hunter22"));
        assert!(!verify_password(&stored, "hunter23"));
    }

    #[test]
    fn salts_differ() {
        let a = hash_password("hunter22").unwrap();
        let b = hash_password("hunter22").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn legacy_plaintext_rows_still_verify() {
        assert!(verify_password("leftpass123", "leftpass123"));
        assert!(!verify_password("leftpass123", "leftpass124"));
        assert!(!verify_password("leftpass123", "leftpass1234"));
    }

    #[test]
    fn legacy_comparison_rejects_prefixes_and_empty_input() {
        assert!(!verify_password("leftpass123", "leftpass12"));
        assert!(!verify_password("leftpass123", ""));
        assert!(!verify_password("", "leftpass123"));
    }
}
