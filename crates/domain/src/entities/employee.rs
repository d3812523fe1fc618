//! Employee aggregate
//!
//! All changes go through methods that report whether state actually changed;
//! `updated_at` moves only on real changes. Subordinates are not held here:
//! the manager link is a plain id and the reverse direction is a store query.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    errors::DomainError,
    value_objects::{
        DateOfBirth, DepartmentId, DocumentNumber, EmailAddress, EmployeeId, JobTitleId,
        PersonName, PhoneNumber, PhoneSet, PhoneSetChanges,
    },
};

/// Validated input for creating an employee
#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub email: EmailAddress,
    pub document: DocumentNumber,
    pub date_of_birth: DateOfBirth,
    pub phones: Vec<PhoneNumber>,
    pub job_title_id: JobTitleId,
    pub job_title_name: String,
    pub department_id: DepartmentId,
    pub manager_id: Option<EmployeeId>,
}

/// An employee of the organization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    id: EmployeeId,
    first_name: PersonName,
    last_name: PersonName,
    email: EmailAddress,
    document: DocumentNumber,
    date_of_birth: DateOfBirth,
    phones: PhoneSet,
    job_title_id: JobTitleId,
    job_title_name: String,
    department_id: DepartmentId,
    manager_id: Option<EmployeeId>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Employee {
    /// Create a new active employee
    ///
    /// # Errors
    ///
    /// Fails when no phone is given, when the department or job title id is
    /// empty, or when `manager_id` equals the new employee's own id.
    pub fn create(id: EmployeeId, input: NewEmployee) -> Result<Self, DomainError> {
        if input.department_id.is_nil() {
            return Err(DomainError::EmptyIdentifier("Department id"));
        }
        if input.job_title_id.is_nil() {
            return Err(DomainError::EmptyIdentifier("Job title id"));
        }
        if input.manager_id == Some(id) {
            return Err(DomainError::SelfManagement);
        }
        let phones = PhoneSet::new(input.phones)?;
        let now = Utc::now();

        Ok(Self {
            id,
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            document: input.document,
            date_of_birth: input.date_of_birth,
            phones,
            job_title_id: input.job_title_id,
            job_title_name: input.job_title_name.trim().to_string(),
            department_id: input.department_id,
            manager_id: input.manager_id,
            is_active: true,
            created_at: now,
            updated_at: now,
        })
    }

    pub const fn id(&self) -> EmployeeId {
        self.id
    }

    pub const fn first_name(&self) -> &PersonName {
        &self.first_name
    }

    pub const fn last_name(&self) -> &PersonName {
        &self.last_name
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub const fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub const fn document(&self) -> &DocumentNumber {
        &self.document
    }

    pub const fn date_of_birth(&self) -> DateOfBirth {
        self.date_of_birth
    }

    pub const fn phones(&self) -> &PhoneSet {
        &self.phones
    }

    pub const fn job_title_id(&self) -> JobTitleId {
        self.job_title_id
    }

    pub fn job_title_name(&self) -> &str {
        &self.job_title_name
    }

    pub const fn department_id(&self) -> DepartmentId {
        self.department_id
    }

    pub const fn manager_id(&self) -> Option<EmployeeId> {
        self.manager_id
    }

    pub const fn is_active(&self) -> bool {
        self.is_active
    }

    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Change first and last name
    pub fn change_name(&mut self, first_name: PersonName, last_name: PersonName) -> bool {
        if self.first_name == first_name && self.last_name == last_name {
            return false;
        }
        self.first_name = first_name;
        self.last_name = last_name;
        self.touch();
        true
    }

    /// Replace the email address
    pub fn change_email(&mut self, email: EmailAddress) -> bool {
        if self.email == email {
            return false;
        }
        self.email = email;
        self.touch();
        true
    }

    /// Replace the CPF
    pub fn change_document(&mut self, document: DocumentNumber) -> bool {
        if self.document == document {
            return false;
        }
        self.document = document;
        self.touch();
        true
    }

    pub fn change_date_of_birth(&mut self, date_of_birth: DateOfBirth) -> bool {
        if self.date_of_birth == date_of_birth {
            return false;
        }
        self.date_of_birth = date_of_birth;
        self.touch();
        true
    }

    /// Move the employee to another job title
    pub fn change_job_title(
        &mut self,
        job_title_id: JobTitleId,
        job_title_name: impl AsRef<str>,
    ) -> Result<bool, DomainError> {
        if job_title_id.is_nil() {
            return Err(DomainError::EmptyIdentifier("Job title id"));
        }
        let name = job_title_name.as_ref().trim();
        if self.job_title_id == job_title_id && self.job_title_name == name {
            return Ok(false);
        }
        self.job_title_id = job_title_id;
        self.job_title_name = name.to_string();
        self.touch();
        Ok(true)
    }

    /// Move the employee to another department
    pub fn change_department(&mut self, department_id: DepartmentId) -> Result<bool, DomainError> {
        if department_id.is_nil() {
            return Err(DomainError::EmptyIdentifier("Department id"));
        }
        if self.department_id == department_id {
            return Ok(false);
        }
        self.department_id = department_id;
        self.touch();
        Ok(true)
    }

    /// Add a phone number unless it is already present
    pub fn add_phone(&mut self, phone: PhoneNumber) -> bool {
        match self.phones.with(phone) {
            Some(phones) => {
                self.phones = phones;
                self.touch();
                true
            },
            None => false,
        }
    }

    /// Remove a phone number
    ///
    /// # Errors
    ///
    /// Returns `DomainError::EmptyPhoneSet` when `phone` is the last number.
    pub fn remove_phone(&mut self, phone: &PhoneNumber) -> Result<bool, DomainError> {
        match self.phones.without(phone)? {
            Some(phones) => {
                self.phones = phones;
                self.touch();
                Ok(true)
            },
            None => Ok(false),
        }
    }

    /// Reconcile the phone set with `phones`
    ///
    /// Numbers kept from the current set retain their order; new numbers are
    /// appended in the order given.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::EmptyPhoneSet` for an empty input; the current
    /// set is left untouched.
    pub fn update_phones(
        &mut self,
        phones: impl IntoIterator<Item = PhoneNumber>,
    ) -> Result<PhoneSetChanges, DomainError> {
        let target = PhoneSet::new(phones)?;
        let changes = self.phones.diff(&target);
        if changes.is_empty() {
            return Ok(changes);
        }

        let reconciled = self
            .phones
            .iter()
            .filter(|p| !changes.removed.contains(p))
            .chain(changes.added.iter())
            .cloned()
            .collect::<Vec<_>>();
        self.phones = PhoneSet::new(reconciled)?;
        self.touch();
        Ok(changes)
    }

    /// Assign a manager
    ///
    /// Only the immediate cycle (the manager reporting to this employee) can be
    /// detected here; longer chains are checked by the caller with a store walk.
    pub fn assign_manager(&mut self, manager: &Self) -> Result<bool, DomainError> {
        if manager.id == self.id {
            return Err(DomainError::SelfManagement);
        }
        if manager.manager_id == Some(self.id) {
            return Err(DomainError::circular(self.id, manager.id));
        }
        if self.manager_id == Some(manager.id) {
            return Ok(false);
        }
        self.manager_id = Some(manager.id);
        self.touch();
        Ok(true)
    }

    pub fn remove_manager(&mut self) -> bool {
        if self.manager_id.is_none() {
            return false;
        }
        self.manager_id = None;
        self.touch();
        true
    }

    pub fn activate(&mut self) -> bool {
        if self.is_active {
            return false;
        }
        self.is_active = true;
        self.touch();
        true
    }

    /// Logical deletion
    pub fn deactivate(&mut self) -> bool {
        if !self.is_active {
            return false;
        }
        self.is_active = false;
        self.touch();
        true
    }
}
