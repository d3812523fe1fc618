//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations.

mod argon2_password_hasher;

pub use argon2_password_hasher::{Argon2PasswordHasher, PasswordHashError};
