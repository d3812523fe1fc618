//! Employee Service - creates, updates and deactivates employees with their accounts
//!
//! Checks run in a fixed order and the first failure wins; only request field
//! validation collects every problem before failing. Nothing is written until
//! all checks pass, and an employee is never left stored without its account.

use std::{collections::HashSet, fmt};

use domain::{
    DomainError, Employee, EmployeeId, HierarchicalRole, NewEmployee, Role, RoleId, UserAccount,
    UserAccountId,
};
use secrecy::ExposeSecret;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use super::{
    ServicePorts,
    authorization::{ensure_can_create, ensure_can_modify, ensure_not_cancelled, resolve_actor},
};
use crate::{
    error::ApplicationError,
    policy::RequestPolicy,
    request_context::RequestContext,
    requests::{CreateEmployeeRequest, ManagerUpdate, UpdateEmployeeRequest},
};

/// An employee together with its login account
#[derive(Debug, Clone)]
pub struct EmployeeWithAccount {
    pub employee: Employee,
    pub account: UserAccount,
}

/// Service for employee lifecycle operations
#[derive(Clone)]
pub struct EmployeeService {
    ports: ServicePorts,
    policy: RequestPolicy,
}

impl fmt::Debug for EmployeeService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmployeeService")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

/// Replace every role on `account` with `role`
fn replace_roles(account: &mut UserAccount, role: Role) -> bool {
    let stale: Vec<RoleId> = account
        .roles()
        .iter()
        .map(Role::id)
        .filter(|id| *id != role.id())
        .collect();
    let mut changed = false;
    for id in stale {
        changed |= account.remove_role(id);
    }
    account.add_role(role) || changed
}

impl EmployeeService {
    /// Create a new employee service
    pub const fn new(ports: ServicePorts, policy: RequestPolicy) -> Self {
        Self { ports, policy }
    }

    async fn load_employee(&self, id: EmployeeId) -> Result<Employee, ApplicationError> {
        self.ports
            .employees
            .get_by_id(id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Employee", id))
    }

    async fn load_account_of(
        &self,
        employee_id: EmployeeId,
    ) -> Result<UserAccount, ApplicationError> {
        self.ports
            .accounts
            .get_by_employee_id(employee_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("User account for employee", employee_id))
    }

    async fn load_role(&self, rank: HierarchicalRole) -> Result<Role, ApplicationError> {
        self.ports
            .roles
            .get_by_level(rank)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Role", rank))
    }

    /// Walk the manager chain upward from `manager`, failing if it reaches `employee_id`
    async fn ensure_no_cycle(
        &self,
        employee_id: EmployeeId,
        manager: &Employee,
    ) -> Result<(), ApplicationError> {
        let mut seen = HashSet::from([manager.id()]);
        let mut next = manager.manager_id();
        while let Some(id) = next {
            if id == employee_id {
                return Err(DomainError::circular(employee_id, manager.id()).into());
            }
            if !seen.insert(id) {
                // Existing loop above us that does not include this employee
                break;
            }
            next = self
                .ports
                .employees
                .get_by_id(id)
                .await?
                .and_then(|e| e.manager_id());
        }
        Ok(())
    }

    /// Create an employee and its account
    ///
    /// # Errors
    ///
    /// In order: `Validation` for field problems, `ActorNotFound`,
    /// `NotFound` for the job title, `PermissionDenied` for the rank,
    /// `NotFound` for the department, `Conflict` for the email then the CPF,
    /// `NotFound` for the manager. `Cancelled` if the token fires before the
    /// first write.
    #[instrument(
        skip(self, ctx, request, cancel),
        fields(actor = %ctx.actor_id(), request_id = %ctx.request_id())
    )]
    pub async fn create_employee(
        &self,
        ctx: &RequestContext,
        request: &CreateEmployeeRequest,
        cancel: &CancellationToken,
    ) -> Result<EmployeeWithAccount, ApplicationError> {
        let input = request.validate_with(&self.policy, ctx.today())?;
        ensure_not_cancelled(cancel)?;

        let actor = resolve_actor(self.ports.accounts.as_ref(), ctx.actor_id()).await?;

        let job_title = self
            .ports
            .job_titles
            .get_by_id(input.job_title_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Job title", input.job_title_id))?;
        let rank = job_title.rank();
        ensure_can_create(&actor, rank)?;
        ensure_not_cancelled(cancel)?;

        if !self.ports.departments.exists(input.department_id).await? {
            return Err(ApplicationError::not_found("Department", input.department_id));
        }

        if self.ports.employees.email_exists(&input.email).await? {
            return Err(ApplicationError::Conflict(format!(
                "email {} is already in use",
                input.email
            )));
        }
        if self.ports.employees.document_exists(&input.document).await? {
            return Err(ApplicationError::Conflict(
                "document number is already in use".to_string(),
            ));
        }

        if let Some(manager_id) = input.manager_id {
            if self.ports.employees.get_by_id(manager_id).await?.is_none() {
                return Err(ApplicationError::not_found("Manager", manager_id));
            }
        }
        ensure_not_cancelled(cancel)?;

        let role = self.load_role(rank).await?;
        let password_hash = self.ports.hasher.hash(input.password.expose_secret())?;

        let employee_id = EmployeeId::new();
        let employee = Employee::create(
            employee_id,
            NewEmployee {
                first_name: input.first_name,
                last_name: input.last_name,
                email: input.email.clone(),
                document: input.document,
                date_of_birth: input.date_of_birth,
                phones: input.phones,
                job_title_id: job_title.id,
                job_title_name: job_title.name.clone(),
                department_id: input.department_id,
                manager_id: input.manager_id,
            },
        )?;
        let mut account =
            UserAccount::create(UserAccountId::new(), employee_id, input.email, password_hash);
        account.add_role(role);

        ensure_not_cancelled(cancel)?;
        self.ports.employees.add(&employee).await?;
        if let Err(e) = self.ports.accounts.add(&account).await {
            warn!(
                employee_id = %employee_id,
                error = %e,
                "Account insert failed, removing employee"
            );
            if let Err(cleanup) = self.ports.employees.delete_by_id(employee_id).await {
                error!(
                    employee_id = %employee_id,
                    error = %cleanup,
                    "Failed to remove orphaned employee"
                );
            }
            return Err(e);
        }

        info!(
            employee_id = %employee_id,
            account_id = %account.id(),
            rank = %rank,
            "Created employee"
        );
        Ok(EmployeeWithAccount { employee, account })
    }

    /// Apply a partial update to an employee
    ///
    /// # Errors
    ///
    /// `Validation` for field problems, `ActorNotFound`, `NotFound` for the
    /// employee or any referenced entity, `PermissionDenied` when the actor
    /// outranks neither the target nor the new rank, `Conflict` for a taken
    /// email or CPF, and a domain error for self or circular management.
    #[instrument(
        skip(self, ctx, request, cancel),
        fields(actor = %ctx.actor_id(), employee_id = %employee_id)
    )]
    pub async fn update_employee(
        &self,
        ctx: &RequestContext,
        employee_id: EmployeeId,
        request: &UpdateEmployeeRequest,
        cancel: &CancellationToken,
    ) -> Result<Employee, ApplicationError> {
        let changes = request.validate_with(&self.policy, ctx.today())?;
        ensure_not_cancelled(cancel)?;

        let actor = resolve_actor(self.ports.accounts.as_ref(), ctx.actor_id()).await?;
        let original = self.load_employee(employee_id).await?;
        let mut employee = original.clone();
        let mut account = self.load_account_of(employee_id).await?;
        ensure_can_modify(&actor, &account)?;

        let mut employee_changed = false;
        let mut account_changed = false;

        if let Some(job_title_id) = changes
            .job_title_id
            .filter(|id| *id != employee.job_title_id())
        {
            let title = self
                .ports
                .job_titles
                .get_by_id(job_title_id)
                .await?
                .ok_or_else(|| ApplicationError::not_found("Job title", job_title_id))?;
            let rank = title.rank();
            ensure_can_create(&actor, rank)?;
            let role = self.load_role(rank).await?;
            employee_changed |= employee.change_job_title(title.id, title.name.clone())?;
            account_changed |= replace_roles(&mut account, role);
        }

        if let Some(department_id) = changes
            .department_id
            .filter(|id| *id != employee.department_id())
        {
            if !self.ports.departments.exists(department_id).await? {
                return Err(ApplicationError::not_found("Department", department_id));
            }
            employee_changed |= employee.change_department(department_id)?;
        }

        if let Some(email) = changes.email {
            if &email == employee.email() {
                debug!("Email unchanged, skipping uniqueness check");
            } else {
                if self.ports.employees.email_exists(&email).await? {
                    return Err(ApplicationError::Conflict(format!(
                        "email {email} is already in use"
                    )));
                }
                account_changed |= account.change_user_name(email.clone());
                employee_changed |= employee.change_email(email);
            }
        }

        if let Some(document) = changes.document {
            if &document == employee.document() {
                debug!("Document unchanged, skipping uniqueness check");
            } else {
                if self.ports.employees.document_exists(&document).await? {
                    return Err(ApplicationError::Conflict(
                        "document number is already in use".to_string(),
                    ));
                }
                employee_changed |= employee.change_document(document);
            }
        }

        match changes.manager {
            ManagerUpdate::Keep => {},
            ManagerUpdate::Remove => employee_changed |= employee.remove_manager(),
            ManagerUpdate::Assign(manager_id) => {
                if manager_id == employee.id() {
                    return Err(DomainError::SelfManagement.into());
                }
                let manager = self
                    .ports
                    .employees
                    .get_by_id(manager_id)
                    .await?
                    .ok_or_else(|| ApplicationError::not_found("Manager", manager_id))?;
                self.ensure_no_cycle(employee.id(), &manager).await?;
                employee_changed |= employee.assign_manager(&manager)?;
            },
        }

        if changes.first_name.is_some() || changes.last_name.is_some() {
            let first = changes
                .first_name
                .unwrap_or_else(|| employee.first_name().clone());
            let last = changes
                .last_name
                .unwrap_or_else(|| employee.last_name().clone());
            employee_changed |= employee.change_name(first, last);
        }
        if let Some(date_of_birth) = changes.date_of_birth {
            employee_changed |= employee.change_date_of_birth(date_of_birth);
        }
        if let Some(phones) = changes.phones {
            let diff = employee.update_phones(phones)?;
            if !diff.is_empty() {
                debug!(
                    added = diff.added.len(),
                    removed = diff.removed.len(),
                    "Reconciled phone numbers"
                );
                employee_changed = true;
            }
        }

        if !employee_changed && !account_changed {
            debug!("Update is a no-op");
            return Ok(employee);
        }

        ensure_not_cancelled(cancel)?;
        if employee_changed {
            self.ports.employees.update(&employee).await?;
        }
        if account_changed {
            if let Err(e) = self.ports.accounts.update(&account).await {
                if employee_changed {
                    warn!(error = %e, "Account update failed, restoring employee");
                    if let Err(restore) = self.ports.employees.update(&original).await {
                        error!(error = %restore, "Failed to restore employee");
                    }
                }
                return Err(e);
            }
        }

        info!(employee_changed, account_changed, "Updated employee");
        Ok(employee)
    }

    /// Logically delete an employee and deactivate its account
    ///
    /// Returns whether anything changed.
    #[instrument(
        skip(self, ctx, cancel),
        fields(actor = %ctx.actor_id(), employee_id = %employee_id)
    )]
    pub async fn deactivate_employee(
        &self,
        ctx: &RequestContext,
        employee_id: EmployeeId,
        cancel: &CancellationToken,
    ) -> Result<bool, ApplicationError> {
        let actor = resolve_actor(self.ports.accounts.as_ref(), ctx.actor_id()).await?;
        let mut employee = self.load_employee(employee_id).await?;
        let mut account = self.load_account_of(employee_id).await?;
        ensure_can_modify(&actor, &account)?;

        let original = employee.clone();
        let employee_changed = employee.deactivate();
        let account_changed = account.deactivate();
        if !employee_changed && !account_changed {
            debug!("Employee already inactive");
            return Ok(false);
        }

        ensure_not_cancelled(cancel)?;
        if employee_changed {
            self.ports.employees.update(&employee).await?;
        }
        if account_changed {
            if let Err(e) = self.ports.accounts.update(&account).await {
                if employee_changed {
                    warn!(error = %e, "Account deactivation failed, restoring employee");
                    if let Err(restore) = self.ports.employees.update(&original).await {
                        error!(error = %restore, "Failed to restore employee");
                    }
                }
                return Err(e);
            }
        }
        info!("Deactivated employee");
        Ok(true)
    }

    /// Fetch an employee on behalf of an authenticated actor
    #[instrument(skip(self, ctx), fields(actor = %ctx.actor_id()))]
    pub async fn get_employee(
        &self,
        ctx: &RequestContext,
        employee_id: EmployeeId,
    ) -> Result<Employee, ApplicationError> {
        resolve_actor(self.ports.accounts.as_ref(), ctx.actor_id()).await?;
        self.load_employee(employee_id).await
    }

    /// Direct reports of `manager_id`
    #[instrument(skip(self, ctx), fields(actor = %ctx.actor_id()))]
    pub async fn list_subordinates(
        &self,
        ctx: &RequestContext,
        manager_id: EmployeeId,
    ) -> Result<Vec<Employee>, ApplicationError> {
        resolve_actor(self.ports.accounts.as_ref(), ctx.actor_id()).await?;
        self.load_employee(manager_id).await?;
        self.ports.employees.list_subordinates(manager_id).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, atomic::Ordering};

    use domain::{HierarchicalRole, JobTitleId, PhoneNumber, PhoneRegion};
    use secrecy::SecretString;

    use super::*;
    use crate::{
        error::ErrorKind,
        ports::{MockEmployeeStore, MockUserAccountStore, UserAccountStore},
        services::test_support::{Fixture, cpf},
    };

    fn create_test_service(fixture: &Fixture) -> EmployeeService {
        EmployeeService::new(fixture.ports(), RequestPolicy::default())
    }

    #[tokio::test]
    async fn manager_creates_senior() {
        let fx = Fixture::new();
        let service = create_test_service(&fx);
        let (_, manager) = fx.seed(HierarchicalRole::Manager).await;
        let request = fx.create_request(HierarchicalRole::Senior);

        let created = service
            .create_employee(
                &RequestContext::new(manager.id()),
                &request,
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(created.account.employee_id(), created.employee.id());
        assert_eq!(created.account.user_name(), created.employee.email());
        assert_eq!(
            created.account.highest_role_level(),
            HierarchicalRole::Senior
        );
        assert_eq!(created.account.password_hash().as_str(), "plain:initial-pass");
        assert_eq!(fx.employee(created.employee.id()).await, created.employee);
        assert_eq!(fx.account(created.account.id()).await, created.account);
    }

    #[tokio::test]
    async fn junior_cannot_create_manager() {
        let fx = Fixture::new();
        let service = create_test_service(&fx);
        let (_, junior) = fx.seed(HierarchicalRole::Junior).await;
        let request = fx.create_request(HierarchicalRole::Manager);

        let err = service
            .create_employee(
                &RequestContext::new(junior.id()),
                &request,
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::PermissionDenied);
        assert_eq!(fx.employees.adds.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unknown_actor_fails_before_any_store_write() {
        let fx = Fixture::new();
        let mut accounts = MockUserAccountStore::new();
        accounts.expect_get_by_id().returning(|_| Ok(None));
        accounts.expect_add().never();
        let mut employees = MockEmployeeStore::new();
        employees.expect_email_exists().never();
        employees.expect_add().never();

        let ports = ServicePorts {
            employees: Arc::new(employees),
            accounts: Arc::new(accounts),
            ..fx.ports()
        };
        let service = EmployeeService::new(ports, RequestPolicy::default());

        let err = service
            .create_employee(
                &RequestContext::new(UserAccountId::new()),
                &fx.create_request(HierarchicalRole::Junior),
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::ActorNotFound(_)));
        assert!(err.is_unauthorized());
    }

    #[tokio::test]
    async fn validation_runs_before_actor_lookup() {
        let fx = Fixture::new();
        let mut accounts = MockUserAccountStore::new();
        accounts.expect_get_by_id().never();
        let ports = ServicePorts {
            accounts: Arc::new(accounts),
            ..fx.ports()
        };
        let service = EmployeeService::new(ports, RequestPolicy::default());
        let request = CreateEmployeeRequest {
            email: "nope".to_string(),
            phones: vec!["1187654321".to_string()],
            ..fx.create_request(HierarchicalRole::Junior)
        };

        let err = service
            .create_employee(
                &RequestContext::new(UserAccountId::new()),
                &request,
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();

        let errors = err.validation_errors().unwrap();
        assert!(errors.has_field("email"));
        assert!(errors.has_field("phones[0]"));
    }

    #[tokio::test]
    async fn unknown_job_title_is_not_found() {
        let fx = Fixture::new();
        let service = create_test_service(&fx);
        let (_, director) = fx.seed(HierarchicalRole::Director).await;
        let request = CreateEmployeeRequest {
            job_title_id: JobTitleId::new(),
            ..fx.create_request(HierarchicalRole::Junior)
        };

        let err = service
            .create_employee(
                &RequestContext::new(director.id()),
                &request,
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn rank_check_precedes_department_check() {
        let fx = Fixture::new();
        let service = create_test_service(&fx);
        let (_, junior) = fx.seed(HierarchicalRole::Junior).await;
        let request = CreateEmployeeRequest {
            department_id: domain::DepartmentId::new(),
            ..fx.create_request(HierarchicalRole::Director)
        };

        let err = service
            .create_employee(
                &RequestContext::new(junior.id()),
                &request,
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PermissionDenied);
    }

    #[tokio::test]
    async fn missing_department_is_not_found() {
        let fx = Fixture::new();
        let service = create_test_service(&fx);
        let (_, manager) = fx.seed(HierarchicalRole::Manager).await;
        let request = CreateEmployeeRequest {
            department_id: domain::DepartmentId::new(),
            ..fx.create_request(HierarchicalRole::Junior)
        };

        let err = service
            .create_employee(
                &RequestContext::new(manager.id()),
                &request,
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::NotFound { entity: "Department", .. }));
    }

    #[tokio::test]
    async fn duplicate_email_differing_in_case_conflicts() {
        let fx = Fixture::new();
        let service = create_test_service(&fx);
        let (_, manager) = fx.seed(HierarchicalRole::Manager).await;
        let ctx = RequestContext::new(manager.id());
        let cancel = CancellationToken::new();

        let first = CreateEmployeeRequest {
            email: "a@b.com".to_string(),
            ..fx.create_request(HierarchicalRole::Junior)
        };
        service.create_employee(&ctx, &first, &cancel).await.unwrap();

        let second = CreateEmployeeRequest {
            email: "A@B.com".to_string(),
            ..fx.create_request(HierarchicalRole::Junior)
        };
        let err = service
            .create_employee(&ctx, &second, &cancel)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn duplicate_document_conflicts_even_when_masked_differently() {
        let fx = Fixture::new();
        let service = create_test_service(&fx);
        let (seeded, manager) = fx.seed(HierarchicalRole::Manager).await;
        let request = CreateEmployeeRequest {
            document_number: seeded.document().formatted(),
            ..fx.create_request(HierarchicalRole::Junior)
        };

        let err = service
            .create_employee(
                &RequestContext::new(manager.id()),
                &request,
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::Conflict(msg) if msg.contains("document")));
    }

    #[tokio::test]
    async fn unknown_manager_is_not_found() {
        let fx = Fixture::new();
        let service = create_test_service(&fx);
        let (_, manager) = fx.seed(HierarchicalRole::Manager).await;
        let request = CreateEmployeeRequest {
            manager_id: Some(EmployeeId::new()),
            ..fx.create_request(HierarchicalRole::Junior)
        };

        let err = service
            .create_employee(
                &RequestContext::new(manager.id()),
                &request,
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::NotFound { entity: "Manager", .. }));
    }

    #[tokio::test]
    async fn cancelled_create_writes_nothing() {
        let fx = Fixture::new();
        let service = create_test_service(&fx);
        let (_, manager) = fx.seed(HierarchicalRole::Manager).await;
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = service
            .create_employee(
                &RequestContext::new(manager.id()),
                &fx.create_request(HierarchicalRole::Junior),
                &cancel,
            )
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Cancelled);
        assert_eq!(fx.employees.adds.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failed_account_insert_removes_employee() {
        let fx = Fixture::new();
        let service = create_test_service(&fx);
        let (_, manager) = fx.seed(HierarchicalRole::Manager).await;
        let before = fx.employees.rows.lock().await.len();
        fx.accounts.fail_add.store(true, Ordering::SeqCst);

        let err = service
            .create_employee(
                &RequestContext::new(manager.id()),
                &fx.create_request(HierarchicalRole::Junior),
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(fx.employees.adds.load(Ordering::SeqCst), 1);
        assert_eq!(fx.employees.rows.lock().await.len(), before);
    }

    #[tokio::test]
    async fn director_promotes_senior_to_manager() {
        let fx = Fixture::new();
        let service = create_test_service(&fx);
        let (_, director) = fx.seed(HierarchicalRole::Director).await;
        let (target, _) = fx.seed(HierarchicalRole::Senior).await;
        let request = UpdateEmployeeRequest {
            job_title_id: Some(fx.job_title(HierarchicalRole::Manager).id),
            ..UpdateEmployeeRequest::default()
        };

        let updated = service
            .update_employee(
                &RequestContext::new(director.id()),
                target.id(),
                &request,
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        assert_eq!(
            updated.job_title_id(),
            fx.job_title(HierarchicalRole::Manager).id
        );
        let account = fx
            .accounts
            .get_by_employee_id(target.id())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(account.roles().len(), 1);
        assert_eq!(account.highest_role_level(), HierarchicalRole::Manager);
    }

    #[tokio::test]
    async fn senior_cannot_promote_to_manager() {
        let fx = Fixture::new();
        let service = create_test_service(&fx);
        let (_, senior) = fx.seed(HierarchicalRole::Senior).await;
        let (target, _) = fx.seed(HierarchicalRole::Senior).await;
        let request = UpdateEmployeeRequest {
            job_title_id: Some(fx.job_title(HierarchicalRole::Manager).id),
            ..UpdateEmployeeRequest::default()
        };

        let err = service
            .update_employee(
                &RequestContext::new(senior.id()),
                target.id(),
                &request,
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::PermissionDenied);
        assert_eq!(fx.employee(target.id()).await, target);
    }

    #[tokio::test]
    async fn cannot_modify_higher_ranked_employee() {
        let fx = Fixture::new();
        let service = create_test_service(&fx);
        let (_, senior) = fx.seed(HierarchicalRole::Senior).await;
        let (director, _) = fx.seed(HierarchicalRole::Director).await;
        let request = UpdateEmployeeRequest {
            first_name: Some("Changed".to_string()),
            ..UpdateEmployeeRequest::default()
        };

        let err = service
            .update_employee(
                &RequestContext::new(senior.id()),
                director.id(),
                &request,
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PermissionDenied);
    }

    #[tokio::test]
    async fn unchanged_email_skips_uniqueness_check() {
        let fx = Fixture::new();
        let (target, _) = fx.seed(HierarchicalRole::Junior).await;
        let (_, manager) = fx.seed(HierarchicalRole::Manager).await;

        let mut employees = MockEmployeeStore::new();
        let stored = target.clone();
        employees
            .expect_get_by_id()
            .returning(move |_| Ok(Some(stored.clone())));
        employees.expect_email_exists().never();
        employees.expect_document_exists().never();
        employees.expect_update().never();

        let ports = ServicePorts {
            employees: Arc::new(employees),
            ..fx.ports()
        };
        let service = EmployeeService::new(ports, RequestPolicy::default());
        let request = UpdateEmployeeRequest {
            email: Some(target.email().as_str().to_uppercase()),
            document_number: Some(target.document().formatted()),
            ..UpdateEmployeeRequest::default()
        };

        let updated = service
            .update_employee(
                &RequestContext::new(manager.id()),
                target.id(),
                &request,
                &CancellationToken::new(),
            )
            .await
            .unwrap();
        assert_eq!(updated.updated_at(), target.updated_at());
    }

    #[tokio::test]
    async fn changed_email_must_be_unused_and_moves_user_name() {
        let fx = Fixture::new();
        let service = create_test_service(&fx);
        let (_, manager) = fx.seed(HierarchicalRole::Manager).await;
        let (target, target_account) = fx.seed(HierarchicalRole::Junior).await;
        let (other, _) = fx.seed(HierarchicalRole::Junior).await;
        let ctx = RequestContext::new(manager.id());
        let cancel = CancellationToken::new();

        let taken = UpdateEmployeeRequest {
            email: Some(other.email().to_string()),
            ..UpdateEmployeeRequest::default()
        };
        let err = service
            .update_employee(&ctx, target.id(), &taken, &cancel)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);

        let fresh = UpdateEmployeeRequest {
            email: Some("Renamed@Acme.com".to_string()),
            ..UpdateEmployeeRequest::default()
        };
        service
            .update_employee(&ctx, target.id(), &fresh, &cancel)
            .await
            .unwrap();
        assert_eq!(
            fx.account(target_account.id()).await.user_name().as_str(),
            "renamed@acme.com"
        );
    }

    #[tokio::test]
    async fn changed_document_must_be_unused() {
        let fx = Fixture::new();
        let service = create_test_service(&fx);
        let (_, manager) = fx.seed(HierarchicalRole::Manager).await;
        let (target, _) = fx.seed(HierarchicalRole::Junior).await;
        let (other, _) = fx.seed(HierarchicalRole::Junior).await;

        let request = UpdateEmployeeRequest {
            document_number: Some(other.document().formatted()),
            ..UpdateEmployeeRequest::default()
        };
        let err = service
            .update_employee(
                &RequestContext::new(manager.id()),
                target.id(),
                &request,
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conflict);

        let request = UpdateEmployeeRequest {
            document_number: Some(cpf(9_000).raw().to_string()),
            ..UpdateEmployeeRequest::default()
        };
        let updated = service
            .update_employee(
                &RequestContext::new(manager.id()),
                target.id(),
                &request,
                &CancellationToken::new(),
            )
            .await
            .unwrap();
        assert_eq!(updated.document(), &cpf(9_000));
    }

    #[tokio::test]
    async fn manager_chain_cycle_is_rejected() {
        let fx = Fixture::new();
        let service = create_test_service(&fx);
        let (_, director) = fx.seed(HierarchicalRole::Director).await;
        let (a, _) = fx.seed(HierarchicalRole::Senior).await;
        let (b, _) = fx.seed(HierarchicalRole::Senior).await;
        let (c, _) = fx.seed(HierarchicalRole::Senior).await;
        let ctx = RequestContext::new(director.id());
        let cancel = CancellationToken::new();

        let assign = |id| UpdateEmployeeRequest {
            manager: ManagerUpdate::Assign(id),
            ..UpdateEmployeeRequest::default()
        };
        // a -> b -> c
        service
            .update_employee(&ctx, a.id(), &assign(b.id()), &cancel)
            .await
            .unwrap();
        service
            .update_employee(&ctx, b.id(), &assign(c.id()), &cancel)
            .await
            .unwrap();

        let err = service
            .update_employee(&ctx, c.id(), &assign(a.id()), &cancel)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StateInvariantViolated);

        let err = service
            .update_employee(&ctx, c.id(), &assign(c.id()), &cancel)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ApplicationError::Domain(DomainError::SelfManagement)
        ));

        let subordinates = service.list_subordinates(&ctx, c.id()).await.unwrap();
        assert_eq!(subordinates.len(), 1);
        assert_eq!(subordinates[0].id(), b.id());
    }

    #[tokio::test]
    async fn phones_are_reconciled() {
        let fx = Fixture::new();
        let service = create_test_service(&fx);
        let (_, manager) = fx.seed(HierarchicalRole::Manager).await;
        let (target, _) = fx.seed(HierarchicalRole::Junior).await;
        let request = UpdateEmployeeRequest {
            phones: Some(vec!["11 3333-4444".to_string(), "+1 212 555 0134".to_string()]),
            ..UpdateEmployeeRequest::default()
        };

        let updated = service
            .update_employee(
                &RequestContext::new(manager.id()),
                target.id(),
                &request,
                &CancellationToken::new(),
            )
            .await
            .unwrap();

        let landline = PhoneNumber::new("1133334444", PhoneRegion::Brazil).unwrap();
        assert_eq!(updated.phones().len(), 2);
        assert!(updated.phones().contains(&landline));
        assert!(!updated.phones().contains(target.phones().primary()));
    }

    #[tokio::test]
    async fn no_op_update_writes_nothing() {
        let fx = Fixture::new();
        let service = create_test_service(&fx);
        let (_, manager) = fx.seed(HierarchicalRole::Manager).await;
        let (target, _) = fx.seed(HierarchicalRole::Junior).await;
        let request = UpdateEmployeeRequest {
            first_name: Some(target.first_name().as_str().to_string()),
            department_id: Some(target.department_id()),
            ..UpdateEmployeeRequest::default()
        };

        let updated = service
            .update_employee(
                &RequestContext::new(manager.id()),
                target.id(),
                &request,
                &CancellationToken::new(),
            )
            .await
            .unwrap();
        assert_eq!(updated, target);
    }

    #[tokio::test]
    async fn emptying_the_phone_set_is_a_state_violation() {
        let fx = Fixture::new();
        let service = create_test_service(&fx);
        let (_, manager) = fx.seed(HierarchicalRole::Manager).await;
        let (target, _) = fx.seed(HierarchicalRole::Junior).await;
        let request = UpdateEmployeeRequest {
            phones: Some(Vec::new()),
            ..UpdateEmployeeRequest::default()
        };

        let err = service
            .update_employee(
                &RequestContext::new(manager.id()),
                target.id(),
                &request,
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::StateInvariantViolated);
        assert_eq!(fx.employee(target.id()).await.phones().len(), 1);
    }

    #[tokio::test]
    async fn failed_account_update_restores_employee() {
        let fx = Fixture::new();
        let service = create_test_service(&fx);
        let (_, manager) = fx.seed(HierarchicalRole::Manager).await;
        let (target, _) = fx.seed(HierarchicalRole::Junior).await;
        fx.accounts.fail_update.store(true, Ordering::SeqCst);

        let request = UpdateEmployeeRequest {
            email: Some("moved@acme.com".to_string()),
            ..UpdateEmployeeRequest::default()
        };
        assert!(service
            .update_employee(
                &RequestContext::new(manager.id()),
                target.id(),
                &request,
                &CancellationToken::new(),
            )
            .await
            .is_err());
        assert_eq!(fx.employee(target.id()).await.email(), target.email());
    }

    #[tokio::test]
    async fn deactivate_is_rank_gated_and_idempotent() {
        let fx = Fixture::new();
        let service = create_test_service(&fx);
        let (_, manager) = fx.seed(HierarchicalRole::Manager).await;
        let (_, junior) = fx.seed(HierarchicalRole::Junior).await;
        let (target, target_account) = fx.seed(HierarchicalRole::Senior).await;
        let cancel = CancellationToken::new();

        let err = service
            .deactivate_employee(&RequestContext::new(junior.id()), target.id(), &cancel)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PermissionDenied);

        let ctx = RequestContext::new(manager.id());
        assert!(service.deactivate_employee(&ctx, target.id(), &cancel).await.unwrap());
        assert!(!service.deactivate_employee(&ctx, target.id(), &cancel).await.unwrap());
        assert!(!fx.employee(target.id()).await.is_active());
        assert!(!fx.account(target_account.id()).await.is_active());
    }

    #[tokio::test]
    async fn failed_account_deactivation_keeps_employee_active() {
        let fx = Fixture::new();
        let service = create_test_service(&fx);
        let (_, manager) = fx.seed(HierarchicalRole::Manager).await;
        let (target, target_account) = fx.seed(HierarchicalRole::Junior).await;
        fx.accounts.fail_update.store(true, Ordering::SeqCst);

        let result = service
            .deactivate_employee(
                &RequestContext::new(manager.id()),
                target.id(),
                &CancellationToken::new(),
            )
            .await;

        assert!(result.is_err());
        assert!(fx.employee(target.id()).await.is_active());
        assert!(fx.account(target_account.id()).await.is_active());
    }

    #[tokio::test]
    async fn inactive_actor_cannot_create() {
        let fx = Fixture::new();
        let service = create_test_service(&fx);
        let (_, director) = fx.seed(HierarchicalRole::Director).await;
        let mut inactive = director.clone();
        inactive.deactivate();
        fx.accounts.update(&inactive).await.unwrap();

        let err = service
            .create_employee(
                &RequestContext::new(director.id()),
                &fx.create_request(HierarchicalRole::Junior),
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PermissionDenied);
    }

    #[tokio::test]
    async fn password_shorter_than_policy_is_rejected() {
        let fx = Fixture::new();
        let service = EmployeeService::new(
            fx.ports(),
            RequestPolicy {
                min_password_length: 20,
                ..RequestPolicy::default()
            },
        );
        let (_, director) = fx.seed(HierarchicalRole::Director).await;
        let request = CreateEmployeeRequest {
            password: SecretString::from("only-sixteen-chr"),
            ..fx.create_request(HierarchicalRole::Junior)
        };

        let err = service
            .create_employee(
                &RequestContext::new(director.id()),
                &request,
                &CancellationToken::new(),
            )
            .await
            .unwrap_err();
        assert!(err.validation_errors().unwrap().has_field("password"));
    }
}
