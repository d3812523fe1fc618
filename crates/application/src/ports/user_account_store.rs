//! User account storage port

use async_trait::async_trait;
use domain::{EmailAddress, EmployeeId, UserAccount, UserAccountId};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for user account persistence
///
/// User names are unique; a second account for the same normalized email or
/// the same employee is a `Conflict`.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UserAccountStore: Send + Sync {
    async fn get_by_id(&self, id: UserAccountId) -> Result<Option<UserAccount>, ApplicationError>;

    /// Look up an account by its user name
    async fn get_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserAccount>, ApplicationError>;

    /// The account linked to an employee
    async fn get_by_employee_id(
        &self,
        employee_id: EmployeeId,
    ) -> Result<Option<UserAccount>, ApplicationError>;

    async fn add(&self, account: &UserAccount) -> Result<(), ApplicationError>;

    async fn update(&self, account: &UserAccount) -> Result<(), ApplicationError>;
}
