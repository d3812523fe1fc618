//! Application services - Use case implementations

mod account_service;
mod authorization;
mod employee_service;
#[cfg(test)]
mod test_support;

use std::{fmt, sync::Arc};

pub use account_service::AccountService;
pub use employee_service::{EmployeeService, EmployeeWithAccount};

use crate::ports::{
    DepartmentStore, EmployeeStore, JobTitleStore, PasswordHasher, RoleStore, UserAccountStore,
};

/// The adapters a service needs, shared as trait objects
#[derive(Clone)]
pub struct ServicePorts {
    pub employees: Arc<dyn EmployeeStore>,
    pub accounts: Arc<dyn UserAccountStore>,
    pub departments: Arc<dyn DepartmentStore>,
    pub job_titles: Arc<dyn JobTitleStore>,
    pub roles: Arc<dyn RoleStore>,
    pub hasher: Arc<dyn PasswordHasher>,
}

impl fmt::Debug for ServicePorts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServicePorts").finish_non_exhaustive()
    }
}
