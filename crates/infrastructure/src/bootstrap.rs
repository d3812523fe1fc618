//! Service wiring
//!
//! Builds the application services over the in-memory stores and the Argon2
//! hasher, and provisions the first SuperUser account. Every other account is
//! created through `EmployeeService::create_employee` by an existing actor.

use std::{fmt, sync::Arc};

use application::{
    AccountService, ApplicationError, CreateEmployeeRequest, EmployeeService, EmployeeWithAccount,
    PasswordHasher, RequestPolicy, ServicePorts,
};
use chrono::Utc;
use domain::{
    Department, DepartmentId, DomainError, Employee, EmployeeId, HierarchicalRole, NewEmployee,
    UserAccount, UserAccountId,
};
use secrecy::ExposeSecret;
use tracing::{info, instrument, warn};

use crate::{
    adapters::Argon2PasswordHasher,
    config::AppConfig,
    persistence::{InMemoryEmployeeStore, InMemoryReferenceStore, InMemoryUserAccountStore},
};

/// The in-memory stores behind every port
#[derive(Debug, Clone)]
pub struct InMemoryStores {
    pub employees: InMemoryEmployeeStore,
    pub accounts: InMemoryUserAccountStore,
    pub reference: InMemoryReferenceStore,
}

impl InMemoryStores {
    /// Empty employee and account tables over the default rank titles and roles
    pub fn new() -> Result<Self, DomainError> {
        Ok(Self {
            employees: InMemoryEmployeeStore::new(),
            accounts: InMemoryUserAccountStore::new(),
            reference: InMemoryReferenceStore::with_default_ranks()?,
        })
    }

    /// Port bundle sharing these stores
    pub fn ports(&self, hasher: Arc<dyn PasswordHasher>) -> ServicePorts {
        ServicePorts {
            employees: Arc::new(self.employees.clone()),
            accounts: Arc::new(self.accounts.clone()),
            departments: Arc::new(self.reference.clone()),
            job_titles: Arc::new(self.reference.clone()),
            roles: Arc::new(self.reference.clone()),
            hasher,
        }
    }
}

/// Fully wired services plus the stores they share
#[derive(Clone)]
pub struct Roster {
    pub employees: EmployeeService,
    pub accounts: AccountService,
    pub stores: InMemoryStores,
    ports: ServicePorts,
    policy: RequestPolicy,
}

impl fmt::Debug for Roster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Roster")
            .field("employees", &self.stores.employees.len())
            .field("accounts", &self.stores.accounts.len())
            .finish_non_exhaustive()
    }
}

impl Roster {
    /// Wire the services from configuration over fresh stores
    pub fn from_config(config: &AppConfig) -> Result<Self, DomainError> {
        Ok(Self::with_stores(config, InMemoryStores::new()?))
    }

    /// Wire the services from configuration over existing stores
    pub fn with_stores(config: &AppConfig, stores: InMemoryStores) -> Self {
        let ports = stores.ports(Arc::new(Argon2PasswordHasher::new()));
        let policy = config.request_policy();
        let employees = EmployeeService::new(ports.clone(), policy);
        let accounts = AccountService::new(ports.clone(), policy, config.lockout_policy());

        info!(
            environment = %config.environment,
            max_failed_attempts = config.security.max_failed_attempts,
            minimum_age = config.validation.minimum_age,
            "Roster services ready"
        );
        Self {
            employees,
            accounts,
            stores,
            ports,
            policy,
        }
    }

    /// Add a department to the reference data
    pub fn add_department(
        &self,
        name: &str,
        description: Option<String>,
    ) -> Result<DepartmentId, DomainError> {
        Ok(self
            .stores
            .reference
            .add_department(Department::new(name, description)?))
    }

    /// Create the first SuperUser employee and account without an acting user
    ///
    /// Only allowed while no account exists; the account insert itself
    /// re-checks that under the store's write lock, so concurrent callers
    /// produce a single SuperUser. The request's job title must grant the
    /// SuperUser rank.
    ///
    /// # Errors
    ///
    /// `Validation` for field problems, `Conflict` once any account exists,
    /// `NotFound` for an unknown job title or department, `PermissionDenied`
    /// when the job title ranks below SuperUser.
    #[instrument(skip(self, request))]
    pub async fn provision_super_user(
        &self,
        request: &CreateEmployeeRequest,
    ) -> Result<EmployeeWithAccount, ApplicationError> {
        let input = request.validate_with(&self.policy, Utc::now().date_naive())?;

        if !self.stores.accounts.is_empty() {
            warn!("Refusing to provision a second administrator");
            return Err(ApplicationError::Conflict(
                "an account already exists".to_string(),
            ));
        }

        let job_title = self
            .ports
            .job_titles
            .get_by_id(input.job_title_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Job title", input.job_title_id))?;
        if job_title.rank() != HierarchicalRole::SuperUser {
            return Err(ApplicationError::PermissionDenied(format!(
                "initial account must be {}, not {}",
                HierarchicalRole::SuperUser,
                job_title.rank()
            )));
        }
        if !self.ports.departments.exists(input.department_id).await? {
            return Err(ApplicationError::not_found("Department", input.department_id));
        }
        let role = self
            .ports
            .roles
            .get_by_level(HierarchicalRole::SuperUser)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Role", HierarchicalRole::SuperUser))?;
        let password_hash = self.ports.hasher.hash(input.password.expose_secret())?;

        let employee = Employee::create(
            EmployeeId::new(),
            NewEmployee {
                first_name: input.first_name,
                last_name: input.last_name,
                email: input.email.clone(),
                document: input.document,
                date_of_birth: input.date_of_birth,
                phones: input.phones,
                job_title_id: job_title.id,
                job_title_name: job_title.name,
                department_id: input.department_id,
                manager_id: None,
            },
        )?;
        let mut account =
            UserAccount::create(UserAccountId::new(), employee.id(), input.email, password_hash);
        account.add_role(role);

        self.ports.employees.add(&employee).await?;
        if let Err(e) = self.stores.accounts.add_first(&account) {
            warn!(error = %e, "Lost the race to provision the administrator");
            self.ports.employees.delete_by_id(employee.id()).await?;
            return Err(e.into());
        }

        info!(account_id = %account.id(), "Provisioned initial SuperUser");
        Ok(EmployeeWithAccount { employee, account })
    }
}
