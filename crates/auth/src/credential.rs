//! Credential hashing and comparison.
//!
//! Stored credentials are argon2 PHC strings. Verification goes through the
//! argon2 verifier, which compares digests in constant time. A stored value that
//! is not a PHC string is compared with `subtle::ConstantTimeEq`.

use std::sync::OnceLock;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use subtle::ConstantTimeEq;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CredentialError {
    #[error("credential cannot be empty")]
    Empty,

    #[error("unable to hash credential: {0}")]
    Hash(String),
}

/// Hash a plaintext credential for storage.
pub fn hash_credential(secret: &str) -> Result<String, CredentialError> {
    if secret.is_empty() {
        return Err(CredentialError::Empty);
    }
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(secret.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| CredentialError::Hash(e.to_string()))
}

/// Compare a presented secret against a stored credential.
pub fn verify_credential(stored: &str, presented: &str) -> bool {
    match PasswordHash::new(stored) {
        Ok(parsed) => Argon2::default()
            .verify_password(presented.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => {
            warn!("stored credential is not an argon2 hash");
            stored.as_bytes().ct_eq(presented.as_bytes()).into()
        }
    }
}

/// Verify `presented` against a throwaway hash and report a mismatch.
///
/// Used where no stored credential exists, so that path costs one argon2
/// verification like a real mismatch does.
pub fn verify_decoy_credential(presented: &str) -> bool {
    static DECOY: OnceLock<Option<String>> = OnceLock::new();
    if let Some(hash) = DECOY.get_or_init(|| hash_credential("dashgate-decoy-credential").ok()) {
        let _ = verify_credential(hash, presented);
    }
    false
}
