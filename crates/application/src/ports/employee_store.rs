//! Employee storage port
//!
//! Defines the interface for employee persistence. Implementations must
//! enforce uniqueness of the normalized email and the CPF digits at the
//! storage level and report violations as `ApplicationError::Conflict`.

use async_trait::async_trait;
use domain::{DocumentNumber, EmailAddress, Employee, EmployeeId};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for employee persistence
#[cfg_attr(test, automock)]
#[async_trait]
pub trait EmployeeStore: Send + Sync {
    /// Get an employee by ID
    async fn get_by_id(&self, id: EmployeeId) -> Result<Option<Employee>, ApplicationError>;

    /// Whether any employee uses this normalized email
    async fn email_exists(&self, email: &EmailAddress) -> Result<bool, ApplicationError>;

    /// Whether any employee uses this CPF (compared by digits)
    async fn document_exists(&self, document: &DocumentNumber) -> Result<bool, ApplicationError>;

    /// Insert a new employee
    ///
    /// Fails with `Conflict` when the email or CPF is already taken.
    async fn add(&self, employee: &Employee) -> Result<(), ApplicationError>;

    /// Replace a stored employee
    ///
    /// Fails with `NotFound` for unknown ids and `Conflict` when the new email
    /// or CPF belongs to another employee.
    async fn update(&self, employee: &Employee) -> Result<(), ApplicationError>;

    /// Remove an employee; returns whether it existed
    async fn delete_by_id(&self, id: EmployeeId) -> Result<bool, ApplicationError>;

    /// Employees whose manager is `manager_id`
    async fn list_subordinates(
        &self,
        manager_id: EmployeeId,
    ) -> Result<Vec<Employee>, ApplicationError>;
}
