//! Application layer - Use cases and orchestration
//!
//! Ports for storage and hashing, request DTOs with their validation, and the
//! services that enforce rank checks, uniqueness and write ordering across the
//! employee and account aggregates.

pub mod error;
pub mod policy;
pub mod ports;
pub mod request_context;
pub mod requests;
pub mod services;

pub use error::{ApplicationError, ErrorKind, FieldError, ValidationErrors};
pub use policy::{LockoutPolicy, RequestPolicy};
pub use ports::*;
pub use request_context::RequestContext;
pub use requests::{
    ChangePasswordRequest, CreateEmployeeRequest, ManagerUpdate, UpdateEmployeeRequest,
    ValidatedCreateEmployee, ValidatedUpdateEmployee,
};
pub use services::*;
