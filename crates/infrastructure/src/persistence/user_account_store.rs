//! In-memory user account store
//!
//! Implements the `UserAccountStore` port with unique indexes on the user
//! name and on the owning employee.

use std::{collections::HashMap, sync::Arc};

use application::{ApplicationError, UserAccountStore};
use async_trait::async_trait;
use domain::{EmailAddress, EmployeeId, UserAccount, UserAccountId};
use parking_lot::RwLock;
use tracing::{debug, instrument};

use super::error::StoreError;

#[derive(Debug, Default)]
struct AccountTable {
    rows: HashMap<UserAccountId, UserAccount>,
    by_user_name: HashMap<String, UserAccountId>,
    by_employee: HashMap<EmployeeId, UserAccountId>,
}

impl AccountTable {
    fn check_unique(&self, account: &UserAccount) -> Result<(), StoreError> {
        let id = account.id();
        let user_name = account.user_name().as_str();
        if self.by_user_name.get(user_name).is_some_and(|owner| *owner != id) {
            return Err(StoreError::UniqueViolation {
                index: "user_name",
                key: user_name.to_string(),
            });
        }
        if self
            .by_employee
            .get(&account.employee_id())
            .is_some_and(|owner| *owner != id)
        {
            return Err(StoreError::UniqueViolation {
                index: "employee_id",
                key: account.employee_id().to_string(),
            });
        }
        Ok(())
    }

    fn unindex(&mut self, account: &UserAccount) {
        self.by_user_name.remove(account.user_name().as_str());
        self.by_employee.remove(&account.employee_id());
    }

    fn index(&mut self, account: &UserAccount) {
        self.by_user_name
            .insert(account.user_name().as_str().to_string(), account.id());
        self.by_employee.insert(account.employee_id(), account.id());
    }

    fn insert(&mut self, account: &UserAccount) -> Result<(), StoreError> {
        if self.rows.contains_key(&account.id()) {
            return Err(StoreError::UniqueViolation {
                index: "account_id",
                key: account.id().to_string(),
            });
        }
        self.check_unique(account)?;

        self.index(account);
        self.rows.insert(account.id(), account.clone());
        Ok(())
    }
}

/// User accounts, one per employee, unique by user name
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserAccountStore {
    table: Arc<RwLock<AccountTable>>,
}

impl InMemoryUserAccountStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.table.read().rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert `account` only if the table has no rows yet
    ///
    /// The emptiness check and the insert share one write lock, so among
    /// concurrent callers at most one succeeds.
    #[instrument(skip(self, account), fields(account_id = %account.id()))]
    pub fn add_first(&self, account: &UserAccount) -> Result<(), StoreError> {
        let mut table = self.table.write();
        if !table.rows.is_empty() {
            return Err(StoreError::NotEmpty { table: "accounts" });
        }
        table.insert(account)?;
        debug!("Inserted first account");
        Ok(())
    }
}

#[async_trait]
impl UserAccountStore for InMemoryUserAccountStore {
    async fn get_by_id(&self, id: UserAccountId) -> Result<Option<UserAccount>, ApplicationError> {
        Ok(self.table.read().rows.get(&id).cloned())
    }

    async fn get_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserAccount>, ApplicationError> {
        let table = self.table.read();
        Ok(table
            .by_user_name
            .get(email.as_str())
            .and_then(|id| table.rows.get(id))
            .cloned())
    }

    async fn get_by_employee_id(
        &self,
        employee_id: EmployeeId,
    ) -> Result<Option<UserAccount>, ApplicationError> {
        let table = self.table.read();
        Ok(table
            .by_employee
            .get(&employee_id)
            .and_then(|id| table.rows.get(id))
            .cloned())
    }

    #[instrument(skip(self, account), fields(account_id = %account.id()))]
    async fn add(&self, account: &UserAccount) -> Result<(), ApplicationError> {
        self.table.write().insert(account)?;
        debug!("Inserted account");
        Ok(())
    }

    #[instrument(skip(self, account), fields(account_id = %account.id()))]
    async fn update(&self, account: &UserAccount) -> Result<(), ApplicationError> {
        let mut table = self.table.write();
        let Some(previous) = table.rows.get(&account.id()).cloned() else {
            return Err(StoreError::MissingRow {
                entity: "UserAccount",
                id: account.id().to_string(),
            }
            .into());
        };
        table.check_unique(account)?;

        table.unindex(&previous);
        table.index(account);
        table.rows.insert(account.id(), account.clone());
        debug!("Updated account");
        Ok(())
    }
}
