//! Domain layer for Roster
//!
//! Employees, their login accounts and the rank hierarchy that decides who
//! may create or modify whom. Everything here is synchronous and free of I/O;
//! storage and hashing live behind ports in the application layer.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::{DomainError, DomainErrorKind};
pub use value_objects::*;
