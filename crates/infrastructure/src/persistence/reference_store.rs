//! In-memory reference data: departments, job titles and roles
//!
//! One store backs the three read-only ports. Writes happen at startup through
//! the inherent `add_*` methods.

use std::{collections::HashMap, sync::Arc};

use application::{ApplicationError, DepartmentStore, JobTitleStore, RoleStore};
use async_trait::async_trait;
use domain::{
    Department, DepartmentId, DomainError, HierarchicalRole, JobTitle, JobTitleId, Role,
};
use parking_lot::RwLock;
use tracing::debug;

#[derive(Debug, Default)]
struct ReferenceTables {
    departments: HashMap<DepartmentId, Department>,
    job_titles: HashMap<JobTitleId, JobTitle>,
    roles: HashMap<HierarchicalRole, Role>,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryReferenceStore {
    tables: Arc<RwLock<ReferenceTables>>,
}

impl InMemoryReferenceStore {
    /// Empty store with no departments, titles or roles
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with one job title and the default role for every rank
    ///
    /// Titles are named after the rank they grant. No departments are created.
    pub fn with_default_ranks() -> Result<Self, DomainError> {
        let store = Self::new();
        for rank in HierarchicalRole::ALL {
            store.add_job_title(JobTitle::new(rank.title(), rank.hierarchy_level().value())?);
            store.add_role(Role::default_for(rank));
        }
        debug!(ranks = HierarchicalRole::ALL.len(), "Seeded default ranks");
        Ok(store)
    }

    pub fn add_department(&self, department: Department) -> DepartmentId {
        let id = department.id();
        self.tables.write().departments.insert(id, department);
        id
    }

    pub fn add_job_title(&self, job_title: JobTitle) -> JobTitleId {
        let id = job_title.id;
        self.tables.write().job_titles.insert(id, job_title);
        id
    }

    /// Install `role` as the role for its rank, replacing any previous one
    pub fn add_role(&self, role: Role) -> Option<Role> {
        self.tables.write().roles.insert(role.level(), role)
    }

    /// First active job title granting `rank`
    #[must_use]
    pub fn job_title_for(&self, rank: HierarchicalRole) -> Option<JobTitle> {
        self.tables
            .read()
            .job_titles
            .values()
            .find(|t| t.is_active && t.rank() == rank)
            .cloned()
    }
}

#[async_trait]
impl DepartmentStore for InMemoryReferenceStore {
    async fn exists(&self, id: DepartmentId) -> Result<bool, ApplicationError> {
        Ok(self.tables.read().departments.contains_key(&id))
    }

    async fn get_by_id(&self, id: DepartmentId) -> Result<Option<Department>, ApplicationError> {
        Ok(self.tables.read().departments.get(&id).cloned())
    }
}

#[async_trait]
impl JobTitleStore for InMemoryReferenceStore {
    async fn exists(&self, id: JobTitleId) -> Result<bool, ApplicationError> {
        Ok(self.tables.read().job_titles.contains_key(&id))
    }

    async fn get_by_id(&self, id: JobTitleId) -> Result<Option<JobTitle>, ApplicationError> {
        Ok(self.tables.read().job_titles.get(&id).cloned())
    }
}

#[async_trait]
impl RoleStore for InMemoryReferenceStore {
    async fn get_by_level(&self, level: HierarchicalRole) -> Result<Option<Role>, ApplicationError> {
        Ok(self.tables.read().roles.get(&level).cloned())
    }
}
