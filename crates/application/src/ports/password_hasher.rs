//! Password hashing port
//!
//! The algorithm is an adapter concern; the application only hands plaintext
//! in and stores the opaque result.

use domain::PasswordHash;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for one-way password hashing
#[cfg_attr(test, automock)]
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password with a fresh salt
    fn hash(&self, password: &str) -> Result<PasswordHash, ApplicationError>;

    /// Check a plaintext password against a stored hash
    fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, ApplicationError>;
}
