//! Password hashing using Argon2
//!
//! Hashes are stored in PHC string format, which carries the algorithm,
//! parameters and salt alongside the digest.
//!
//! # Examples
//!
//! ```
//! use application::PasswordHasher;
//! use infrastructure::adapters::Argon2PasswordHasher;
//!
//! let hasher = Argon2PasswordHasher::new();
//!
//! let hash = hasher.hash("correct horse").unwrap();
//! assert!(hasher.verify("correct horse", &hash).unwrap());
//! assert!(!hasher.verify("battery staple", &hash).unwrap());
//! ```

use application::{ApplicationError, PasswordHasher};
use argon2::{
    Argon2, PasswordHash as PhcHash, PasswordHasher as ArgonPasswordHasher, PasswordVerifier,
    password_hash::{self, SaltString, rand_core::OsRng},
};
use domain::PasswordHash;
use thiserror::Error;
use tracing::{debug, instrument};

/// Errors that can occur while hashing or verifying passwords
#[derive(Debug, Error)]
pub enum PasswordHashError {
    /// Failed to hash the password
    #[error("Failed to hash password: {0}")]
    HashingFailed(String),

    /// Stored hash is not a valid PHC string
    #[error("Invalid hash format: {0}")]
    InvalidHashFormat(String),

    /// Verification failed for a reason other than a wrong password
    #[error("Failed to verify password: {0}")]
    VerificationFailed(String),
}

impl From<PasswordHashError> for ApplicationError {
    fn from(err: PasswordHashError) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Argon2id password hasher
///
/// Uses the crate defaults (19 MiB memory, 2 iterations, 1 lane).
#[derive(Debug, Clone, Default)]
pub struct Argon2PasswordHasher {
    argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Hash a password with a freshly generated salt
    #[instrument(skip_all)]
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| PasswordHashError::HashingFailed(e.to_string()))?;

        debug!("Hashed password");
        Ok(hash.to_string())
    }

    /// Verify a password against a PHC string
    ///
    /// Comparison is constant-time. A wrong password is `Ok(false)`.
    #[instrument(skip_all)]
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool, PasswordHashError> {
        let parsed = PhcHash::new(hash)
            .map_err(|e| PasswordHashError::InvalidHashFormat(e.to_string()))?;

        match self.argon2.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => {
                debug!("Password mismatch");
                Ok(false)
            },
            Err(e) => Err(PasswordHashError::VerificationFailed(e.to_string())),
        }
    }

    /// Whether a stored value looks like an Argon2 PHC string
    #[must_use]
    pub fn is_hashed(value: &str) -> bool {
        value.starts_with("$argon2")
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &str) -> Result<PasswordHash, ApplicationError> {
        Ok(PasswordHash::from_hash(self.hash_password(password)?))
    }

    fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, ApplicationError> {
        Ok(self.verify_password(password, hash.as_str())?)
    }
}
