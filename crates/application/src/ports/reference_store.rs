//! Read ports for reference data: departments, job titles and roles

use async_trait::async_trait;
use domain::{Department, DepartmentId, HierarchicalRole, JobTitle, JobTitleId, Role};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Department lookups
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DepartmentStore: Send + Sync {
    async fn exists(&self, id: DepartmentId) -> Result<bool, ApplicationError>;

    async fn get_by_id(&self, id: DepartmentId) -> Result<Option<Department>, ApplicationError>;
}

/// Job title lookups
#[cfg_attr(test, automock)]
#[async_trait]
pub trait JobTitleStore: Send + Sync {
    async fn exists(&self, id: JobTitleId) -> Result<bool, ApplicationError>;

    async fn get_by_id(&self, id: JobTitleId) -> Result<Option<JobTitle>, ApplicationError>;
}

/// Role lookups
///
/// Every rank resolves to exactly one stored role; accounts are granted that
/// role when they are created or change rank.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RoleStore: Send + Sync {
    async fn get_by_level(&self, level: HierarchicalRole) -> Result<Option<Role>, ApplicationError>;
}
