//! In-memory employee store
//!
//! Implements the `EmployeeStore` port. Email and CPF carry unique indexes
//! that are checked and updated under the same write lock as the row, so two
//! concurrent inserts of the same address cannot both succeed.

use std::{collections::HashMap, sync::Arc};

use application::{ApplicationError, EmployeeStore};
use async_trait::async_trait;
use domain::{DocumentNumber, EmailAddress, Employee, EmployeeId};
use parking_lot::RwLock;
use tracing::{debug, instrument, warn};

use super::error::StoreError;

#[derive(Debug, Default)]
struct EmployeeTable {
    rows: HashMap<EmployeeId, Employee>,
    by_email: HashMap<String, EmployeeId>,
    by_document: HashMap<String, EmployeeId>,
}

impl EmployeeTable {
    /// Fail if `employee`'s email or CPF is indexed under a different id
    fn check_unique(&self, employee: &Employee) -> Result<(), StoreError> {
        let id = employee.id();
        let email = employee.email().as_str();
        if self.by_email.get(email).is_some_and(|owner| *owner != id) {
            return Err(StoreError::UniqueViolation {
                index: "email",
                key: email.to_string(),
            });
        }
        let digits = employee.document().digits();
        if self.by_document.get(digits).is_some_and(|owner| *owner != id) {
            return Err(StoreError::UniqueViolation {
                index: "document_number",
                key: digits.to_string(),
            });
        }
        Ok(())
    }

    fn unindex(&mut self, employee: &Employee) {
        self.by_email.remove(employee.email().as_str());
        self.by_document.remove(employee.document().digits());
    }

    fn index(&mut self, employee: &Employee) {
        self.by_email
            .insert(employee.email().as_str().to_string(), employee.id());
        self.by_document
            .insert(employee.document().digits().to_string(), employee.id());
    }
}

/// Employee rows with unique email and CPF indexes
#[derive(Debug, Clone, Default)]
pub struct InMemoryEmployeeStore {
    table: Arc<RwLock<EmployeeTable>>,
}

impl InMemoryEmployeeStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored employees
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.read().rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl EmployeeStore for InMemoryEmployeeStore {
    async fn get_by_id(&self, id: EmployeeId) -> Result<Option<Employee>, ApplicationError> {
        Ok(self.table.read().rows.get(&id).cloned())
    }

    async fn email_exists(&self, email: &EmailAddress) -> Result<bool, ApplicationError> {
        Ok(self.table.read().by_email.contains_key(email.as_str()))
    }

    async fn document_exists(&self, document: &DocumentNumber) -> Result<bool, ApplicationError> {
        Ok(self.table.read().by_document.contains_key(document.digits()))
    }

    #[instrument(skip(self, employee), fields(employee_id = %employee.id()))]
    async fn add(&self, employee: &Employee) -> Result<(), ApplicationError> {
        let mut table = self.table.write();
        if table.rows.contains_key(&employee.id()) {
            return Err(StoreError::UniqueViolation {
                index: "employee_id",
                key: employee.id().to_string(),
            }
            .into());
        }
        if let Err(e) = table.check_unique(employee) {
            warn!(error = %e, "Rejected duplicate employee");
            return Err(e.into());
        }

        table.index(employee);
        table.rows.insert(employee.id(), employee.clone());
        debug!("Inserted employee");
        Ok(())
    }

    #[instrument(skip(self, employee), fields(employee_id = %employee.id()))]
    async fn update(&self, employee: &Employee) -> Result<(), ApplicationError> {
        let mut table = self.table.write();
        let Some(previous) = table.rows.get(&employee.id()).cloned() else {
            return Err(StoreError::MissingRow {
                entity: "Employee",
                id: employee.id().to_string(),
            }
            .into());
        };
        table.check_unique(employee)?;

        table.unindex(&previous);
        table.index(employee);
        table.rows.insert(employee.id(), employee.clone());
        debug!("Updated employee");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_by_id(&self, id: EmployeeId) -> Result<bool, ApplicationError> {
        let mut table = self.table.write();
        let Some(removed) = table.rows.remove(&id) else {
            return Ok(false);
        };
        table.unindex(&removed);
        debug!("Deleted employee");
        Ok(true)
    }

    async fn list_subordinates(
        &self,
        manager_id: EmployeeId,
    ) -> Result<Vec<Employee>, ApplicationError> {
        let table = self.table.read();
        let mut subordinates: Vec<Employee> = table
            .rows
            .values()
            .filter(|e| e.manager_id() == Some(manager_id))
            .cloned()
            .collect();
        subordinates.sort_by(|a, b| a.full_name().cmp(&b.full_name()));
        Ok(subordinates)
    }
}
