//! Salted password hashes.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CredentialError {
    #[error("password must not be empty")]
    EmptyPassword,
    #[error("password hashing failed: {0}")]
    Hash(String),
    #[error("stored credential is not a valid hash: {0}")]
    Malformed(String),
}

/// An Argon2id hash in PHC string form. The plaintext is never kept.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential([REDACTED])")
    }
}

impl Credential {
    /// Hashes `password` with a fresh random salt.
    pub fn hash(password: &str) -> Result<Self, CredentialError> {
        if password.is_empty() {
            return Err(CredentialError::EmptyPassword);
        }
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| Self(hash.to_string()))
            .map_err(|e| CredentialError::Hash(e.to_string()))
    }

    /// `Ok(false)` on mismatch; `Err` only when the stored hash is unusable.
    pub fn verify(&self, password: &str) -> Result<bool, CredentialError> {
        let parsed = PasswordHash::new(&self.0).map_err(|e| CredentialError::Malformed(e.to_string()))?;
        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(CredentialError::Malformed(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correct_password_matches() {
        let credential = Credential::hash("hunter2").unwrap();
        assert!(credential.verify("hunter2").unwrap());
        assert!(!credential.verify("hunter3").unwrap());
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let a = Credential::hash("hunter2").unwrap();
        let b = Credential::hash("hunter2").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn plaintext_never_appears() {
        let credential = Credential::hash("hunter2").unwrap();
        assert!(!serde_json::to_string(&credential).unwrap().contains("hunter2"));
        assert_eq!(format!("{credential:?}"), "Credential([REDACTED])");
    }

    #[test]
    fn legacy_plaintext_is_rejected_as_malformed() {
        let legacy: Credential = serde_json::from_str("\"00000000\"").unwrap();
        assert!(matches!(legacy.verify("00000000"), Err(CredentialError::Malformed(_))));
    }

    #[test]
    fn empty_password_is_refused() {
        assert_eq!(Credential::hash(""), Err(CredentialError::EmptyPassword));
    }
}
