//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod employee_store;
mod password_hasher;
mod reference_store;
mod user_account_store;

pub use employee_store::EmployeeStore;
#[cfg(test)]
pub use employee_store::MockEmployeeStore;
pub use password_hasher::PasswordHasher;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use reference_store::{DepartmentStore, JobTitleStore, RoleStore};
#[cfg(test)]
pub use reference_store::{MockDepartmentStore, MockJobTitleStore, MockRoleStore};
pub use user_account_store::UserAccountStore;
#[cfg(test)]
pub use user_account_store::MockUserAccountStore;
