//! Infrastructure layer - Adapters for the application ports
//!
//! Contains the in-memory stores, the Argon2 password hasher, configuration
//! loading, tracing setup and the wiring that assembles the services.

pub mod adapters;
pub mod bootstrap;
pub mod config;
pub mod persistence;
pub mod telemetry;
#[cfg(test)]
pub mod testing;

pub use adapters::{Argon2PasswordHasher, PasswordHashError};
pub use bootstrap::{InMemoryStores, Roster};
pub use config::{AppConfig, Environment, SecurityConfig, ValidationConfig};
pub use persistence::{
    InMemoryEmployeeStore, InMemoryReferenceStore, InMemoryUserAccountStore, StoreError,
};
pub use telemetry::{LogFormat, TelemetryConfig, TelemetryError, init_tracing};
