use argon2::{
    password_hash::{PasswordHasher, PasswordVerifier, SaltString},
    Argon2, PasswordHash,
};
use once_cell::sync::Lazy;
use rand::rngs::OsRng;
use tracing::warn;

use crate::errors::ServiceError;

// Verified against when no real hash is available, so a failed login costs the
// same whether or not the account exists.
static DUMMY_HASH: Lazy<Option<String>> = Lazy::new(|| hash("not-a-real-password").ok());

/// Argon2id PHC string with a fresh random salt.
pub fn hash(plain: &str) -> Result<String, ServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| ServiceError::Hashing(e.to_string()))
}

/// An unparseable stored hash never matches.
pub fn verify(plain: &str, phc: &str) -> bool {
    match PasswordHash::new(phc) {
        Ok(parsed) => Argon2::default().verify_password(plain.as_bytes(), &parsed).is_ok(),
        Err(e) => {
            warn!(error = %e, "stored_password_hash_unreadable");
            false
        }
    }
}

/// Burn one verification; the outcome is irrelevant.
pub fn verify_dummy(plain: &str) {
    if let Some(phc) = DUMMY_HASH.as_deref() {
        verify(plain, phc);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let phc = hash("s3cret").unwrap();
        assert!(phc.starts_with("$argon2"));
        assert!(verify("s3cret", &phc));
        assert!(!verify("S3cret", &phc));
        assert_ne!(hash("s3cret").unwrap(), phc, "salt must differ per hash");
    }

    #[test]
    fn unreadable_hash_never_matches() {
        assert!(!verify("plaintext", "plaintext"));
        assert!(!verify("", ""));
    }
}
