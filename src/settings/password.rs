// One-way password hashing for the configuration edit gate

use crate::types::{AppError, AppResult};
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

/// Argon2 PHC string with a random salt
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::PasswordHash(e.to_string()))?;
    Ok(hash.to_string())
}

pub fn verify_password(password: &str, password_hash: &str) -> bool {
    let parsed = match PasswordHash::new(password_hash) {
        Ok(value) => value,
        Err(_) => return false,
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

pub fn is_phc_hash(stored: &str) -> bool {
    PasswordHash::new(stored).is_ok()
}

/// Recover the plaintext from a record written by the old reversible encoding
/// (plain base64 of the password). `None` if it is not valid base64 text.
pub fn decode_legacy_hash(stored: &str) -> Option<String> {
    let bytes = BASE64.decode(stored.trim()).ok()?;
    String::from_utf8(bytes).ok().filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("abc123").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(is_phc_hash(&hash));
        assert!(verify_password("abc123", &hash));
        assert!(!verify_password("wrong", &hash));
    }

    #[test]
    fn test_salted() {
        assert_ne!(hash_password("same").unwrap(), hash_password("same").unwrap());
    }

    #[test]
    fn test_garbage_hash_never_verifies() {
        assert!(!verify_password("abc123", "YWJjMTIz"));
        assert!(!is_phc_hash("YWJjMTIz"));
    }

    #[test]
    fn test_decode_legacy_hash() {
        assert_eq!(decode_legacy_hash("YWJjMTIz").as_deref(), Some("abc123"));
        assert_eq!(decode_legacy_hash("%%%"), None);
    }
}
