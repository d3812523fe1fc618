//! Hand-written in-memory ports shared by the service tests

use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicU32, Ordering},
    },
};

use async_trait::async_trait;
use chrono::NaiveDate;
use domain::{
    DateOfBirth, Department, DepartmentId, DocumentNumber, EmailAddress, Employee, EmployeeId,
    HierarchicalRole, JobTitle, JobTitleId, NewEmployee, PasswordHash, PersonName, PhoneNumber,
    PhoneRegion, Role, UserAccount, UserAccountId,
};
use secrecy::SecretString;
use tokio::sync::Mutex;

use super::ServicePorts;
use crate::{
    error::ApplicationError,
    ports::{
        DepartmentStore, EmployeeStore, JobTitleStore, PasswordHasher, RoleStore, UserAccountStore,
    },
    requests::CreateEmployeeRequest,
};

/// A valid CPF derived from `seed`
pub(crate) fn cpf(seed: u32) -> DocumentNumber {
    DocumentNumber::from_base(123_456_000 + seed).unwrap()
}

#[derive(Default)]
pub(crate) struct FakeEmployees {
    pub(crate) rows: Mutex<HashMap<EmployeeId, Employee>>,
    pub(crate) adds: AtomicU32,
}

#[async_trait]
impl EmployeeStore for FakeEmployees {
    async fn get_by_id(&self, id: EmployeeId) -> Result<Option<Employee>, ApplicationError> {
        Ok(self.rows.lock().await.get(&id).cloned())
    }

    async fn email_exists(&self, email: &EmailAddress) -> Result<bool, ApplicationError> {
        Ok(self.rows.lock().await.values().any(|e| e.email() == email))
    }

    async fn document_exists(&self, document: &DocumentNumber) -> Result<bool, ApplicationError> {
        Ok(self
            .rows
            .lock()
            .await
            .values()
            .any(|e| e.document() == document))
    }

    async fn add(&self, employee: &Employee) -> Result<(), ApplicationError> {
        let mut rows = self.rows.lock().await;
        if rows.values().any(|e| e.email() == employee.email()) {
            return Err(ApplicationError::Conflict("email".into()));
        }
        rows.insert(employee.id(), employee.clone());
        self.adds.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn update(&self, employee: &Employee) -> Result<(), ApplicationError> {
        let mut rows = self.rows.lock().await;
        if !rows.contains_key(&employee.id()) {
            return Err(ApplicationError::not_found("Employee", employee.id()));
        }
        rows.insert(employee.id(), employee.clone());
        Ok(())
    }

    async fn delete_by_id(&self, id: EmployeeId) -> Result<bool, ApplicationError> {
        Ok(self.rows.lock().await.remove(&id).is_some())
    }

    async fn list_subordinates(
        &self,
        manager_id: EmployeeId,
    ) -> Result<Vec<Employee>, ApplicationError> {
        Ok(self
            .rows
            .lock()
            .await
            .values()
            .filter(|e| e.manager_id() == Some(manager_id))
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub(crate) struct FakeAccounts {
    pub(crate) rows: Mutex<HashMap<UserAccountId, UserAccount>>,
    pub(crate) fail_add: AtomicBool,
    pub(crate) fail_update: AtomicBool,
}

#[async_trait]
impl UserAccountStore for FakeAccounts {
    async fn get_by_id(&self, id: UserAccountId) -> Result<Option<UserAccount>, ApplicationError> {
        Ok(self.rows.lock().await.get(&id).cloned())
    }

    async fn get_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<UserAccount>, ApplicationError> {
        Ok(self
            .rows
            .lock()
            .await
            .values()
            .find(|a| a.user_name() == email)
            .cloned())
    }

    async fn get_by_employee_id(
        &self,
        employee_id: EmployeeId,
    ) -> Result<Option<UserAccount>, ApplicationError> {
        Ok(self
            .rows
            .lock()
            .await
            .values()
            .find(|a| a.employee_id() == employee_id)
            .cloned())
    }

    async fn add(&self, account: &UserAccount) -> Result<(), ApplicationError> {
        if self.fail_add.load(Ordering::SeqCst) {
            return Err(ApplicationError::Storage("account table unavailable".into()));
        }
        self.rows.lock().await.insert(account.id(), account.clone());
        Ok(())
    }

    async fn update(&self, account: &UserAccount) -> Result<(), ApplicationError> {
        if self.fail_update.load(Ordering::SeqCst) {
            return Err(ApplicationError::Storage("account table unavailable".into()));
        }
        self.rows.lock().await.insert(account.id(), account.clone());
        Ok(())
    }
}

pub(crate) struct FakeReference {
    pub(crate) departments: HashMap<DepartmentId, Department>,
    pub(crate) job_titles: HashMap<JobTitleId, JobTitle>,
    pub(crate) roles: HashMap<HierarchicalRole, Role>,
}

impl Default for FakeReference {
    fn default() -> Self {
        let department = Department::new("Engineering", None).unwrap();
        let job_titles = HierarchicalRole::ALL
            .into_iter()
            .map(|rank| {
                let title = JobTitle::new(rank.as_str(), rank.hierarchy_level().value()).unwrap();
                (title.id, title)
            })
            .collect();
        let roles = HierarchicalRole::ALL
            .into_iter()
            .map(|rank| (rank, Role::default_for(rank)))
            .collect();
        Self {
            departments: HashMap::from([(department.id(), department)]),
            job_titles,
            roles,
        }
    }
}

#[async_trait]
impl DepartmentStore for FakeReference {
    async fn exists(&self, id: DepartmentId) -> Result<bool, ApplicationError> {
        Ok(self.departments.contains_key(&id))
    }

    async fn get_by_id(&self, id: DepartmentId) -> Result<Option<Department>, ApplicationError> {
        Ok(self.departments.get(&id).cloned())
    }
}

#[async_trait]
impl JobTitleStore for FakeReference {
    async fn exists(&self, id: JobTitleId) -> Result<bool, ApplicationError> {
        Ok(self.job_titles.contains_key(&id))
    }

    async fn get_by_id(&self, id: JobTitleId) -> Result<Option<JobTitle>, ApplicationError> {
        Ok(self.job_titles.get(&id).cloned())
    }
}

#[async_trait]
impl RoleStore for FakeReference {
    async fn get_by_level(&self, level: HierarchicalRole) -> Result<Option<Role>, ApplicationError> {
        Ok(self.roles.get(&level).cloned())
    }
}

/// Stores `plain:<password>` so tests can read the hash back
pub(crate) struct FakeHasher;

impl PasswordHasher for FakeHasher {
    fn hash(&self, password: &str) -> Result<PasswordHash, ApplicationError> {
        Ok(PasswordHash::from_hash(format!("plain:{password}")))
    }

    fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, ApplicationError> {
        Ok(hash.as_str() == format!("plain:{password}"))
    }
}

pub(crate) struct Fixture {
    pub(crate) employees: Arc<FakeEmployees>,
    pub(crate) accounts: Arc<FakeAccounts>,
    pub(crate) reference: Arc<FakeReference>,
    seq: AtomicU32,
}

impl Fixture {
    pub(crate) fn new() -> Self {
        Self {
            employees: Arc::new(FakeEmployees::default()),
            accounts: Arc::new(FakeAccounts::default()),
            reference: Arc::new(FakeReference::default()),
            seq: AtomicU32::new(1),
        }
    }

    pub(crate) fn ports(&self) -> ServicePorts {
        ServicePorts {
            employees: self.employees.clone(),
            accounts: self.accounts.clone(),
            departments: self.reference.clone(),
            job_titles: self.reference.clone(),
            roles: self.reference.clone(),
            hasher: Arc::new(FakeHasher),
        }
    }

    pub(crate) fn department_id(&self) -> DepartmentId {
        *self.reference.departments.keys().next().unwrap()
    }

    pub(crate) fn job_title(&self, rank: HierarchicalRole) -> &JobTitle {
        self.reference
            .job_titles
            .values()
            .find(|t| t.rank() == rank)
            .unwrap()
    }

    fn next_seq(&self) -> u32 {
        self.seq.fetch_add(1, Ordering::SeqCst)
    }

    /// Store an employee with an account of the given rank and password `password1`
    pub(crate) async fn seed(&self, rank: HierarchicalRole) -> (Employee, UserAccount) {
        let n = self.next_seq();
        let title = self.job_title(rank);
        let email = EmailAddress::new(format!("seed{n}@acme.com")).unwrap();
        let employee = Employee::create(
            EmployeeId::new(),
            NewEmployee {
                first_name: PersonName::new("Seed").unwrap(),
                last_name: PersonName::new(format!("Person {n}")).unwrap(),
                email: email.clone(),
                document: cpf(n),
                date_of_birth: DateOfBirth::new(NaiveDate::from_ymd_opt(1985, 5, 20).unwrap())
                    .unwrap(),
                phones: vec![PhoneNumber::new("11987654321", PhoneRegion::Brazil).unwrap()],
                job_title_id: title.id,
                job_title_name: title.name.clone(),
                department_id: self.department_id(),
                manager_id: None,
            },
        )
        .unwrap();
        let mut account = UserAccount::create(
            UserAccountId::new(),
            employee.id(),
            email,
            PasswordHash::from_hash("plain:password1"),
        );
        account.add_role(self.reference.roles[&rank].clone());

        self.employees
            .rows
            .lock()
            .await
            .insert(employee.id(), employee.clone());
        self.accounts
            .rows
            .lock()
            .await
            .insert(account.id(), account.clone());
        (employee, account)
    }

    pub(crate) async fn account(&self, id: UserAccountId) -> UserAccount {
        self.accounts.rows.lock().await[&id].clone()
    }

    pub(crate) async fn employee(&self, id: EmployeeId) -> Employee {
        self.employees.rows.lock().await[&id].clone()
    }

    /// A valid create request for a new employee of `rank`
    pub(crate) fn create_request(&self, rank: HierarchicalRole) -> CreateEmployeeRequest {
        let n = self.next_seq();
        CreateEmployeeRequest {
            first_name: "Ana".to_string(),
            last_name: "Souza".to_string(),
            email: format!("new{n}@acme.com"),
            document_number: cpf(n).formatted(),
            date_of_birth: NaiveDate::from_ymd_opt(1992, 8, 1).unwrap(),
            phones: vec!["+55 11 91234-5678".to_string()],
            job_title_id: self.job_title(rank).id,
            department_id: self.department_id(),
            manager_id: None,
            password: SecretString::from("initial-pass"),
        }
    }
}
