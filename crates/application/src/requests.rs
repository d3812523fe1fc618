//! Request DTOs and request-level validation
//!
//! Requests carry raw strings. `validate_with` turns them into value objects,
//! collecting every field problem into one `ApplicationError::Validation`
//! instead of stopping at the first.

use chrono::NaiveDate;
use domain::{
    DateOfBirth, DepartmentId, DocumentNumber, EmailAddress, EmployeeId, JobTitleId, PersonName,
    PhoneNumber, PhoneRegion,
};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use validator::Validate;

use crate::{
    error::{ApplicationError, ValidationErrors},
    policy::RequestPolicy,
};

/// Input for creating an employee together with its account
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateEmployeeRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub document_number: String,
    pub date_of_birth: NaiveDate,
    #[validate(length(min = 1, max = 10, message = "between 1 and 10 phone numbers are required"))]
    pub phones: Vec<String>,
    pub job_title_id: JobTitleId,
    pub department_id: DepartmentId,
    #[serde(default)]
    pub manager_id: Option<EmployeeId>,
    pub password: SecretString,
}

/// Requested change to an employee's manager
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", content = "manager_id", rename_all = "snake_case")]
pub enum ManagerUpdate {
    #[default]
    Keep,
    Assign(EmployeeId),
    Remove,
}

/// Partial update of an employee; absent fields are left untouched
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct UpdateEmployeeRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub document_number: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    /// Full replacement of the phone set; an empty set is refused by the employee
    #[validate(length(max = 10, message = "at most 10 phone numbers are allowed"))]
    pub phones: Option<Vec<String>>,
    pub job_title_id: Option<JobTitleId>,
    pub department_id: Option<DepartmentId>,
    pub manager: ManagerUpdate,
}

/// Password change for the actor's own account or, administratively, another one
#[derive(Debug, Clone, Deserialize)]
pub struct ChangePasswordRequest {
    /// Required when changing one's own password
    #[serde(default)]
    pub current_password: Option<SecretString>,
    pub new_password: SecretString,
}

/// A create request after every field has been validated
#[derive(Debug, Clone)]
pub struct ValidatedCreateEmployee {
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub email: EmailAddress,
    pub document: DocumentNumber,
    pub date_of_birth: DateOfBirth,
    pub phones: Vec<PhoneNumber>,
    pub job_title_id: JobTitleId,
    pub department_id: DepartmentId,
    pub manager_id: Option<EmployeeId>,
    pub password: SecretString,
}

/// An update request after every provided field has been validated
#[derive(Debug, Clone, Default)]
pub struct ValidatedUpdateEmployee {
    pub first_name: Option<PersonName>,
    pub last_name: Option<PersonName>,
    pub email: Option<EmailAddress>,
    pub document: Option<DocumentNumber>,
    pub date_of_birth: Option<DateOfBirth>,
    pub phones: Option<Vec<PhoneNumber>>,
    pub job_title_id: Option<JobTitleId>,
    pub department_id: Option<DepartmentId>,
    pub manager: ManagerUpdate,
}

fn check_date_of_birth(
    errors: &mut ValidationErrors,
    date: NaiveDate,
    policy: &RequestPolicy,
    today: NaiveDate,
) -> Option<DateOfBirth> {
    let dob = errors.capture("date_of_birth", DateOfBirth::new_as_of(date, today))?;
    if dob.is_at_least(policy.minimum_age, today) {
        Some(dob)
    } else {
        errors.push(
            "date_of_birth",
            format!("employee must be at least {} years old", policy.minimum_age),
        );
        None
    }
}

fn check_phones(
    errors: &mut ValidationErrors,
    phones: &[String],
    region: PhoneRegion,
) -> Vec<PhoneNumber> {
    phones
        .iter()
        .enumerate()
        .filter_map(|(i, raw)| {
            errors.capture(&format!("phones[{i}]"), PhoneNumber::new(raw, region))
        })
        .collect()
}

pub(crate) fn check_password(
    errors: &mut ValidationErrors,
    field: &str,
    password: &SecretString,
    min_length: usize,
) {
    if password.expose_secret().chars().count() < min_length {
        errors.push(field, format!("must be at least {min_length} characters"));
    }
}

fn check_not_nil(errors: &mut ValidationErrors, field: &str, is_nil: bool) {
    if is_nil {
        errors.push(field, "must not be empty");
    }
}

impl CreateEmployeeRequest {
    /// Validate every field, reporting all problems at once
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Validation` listing each invalid field.
    pub fn validate_with(
        &self,
        policy: &RequestPolicy,
        today: NaiveDate,
    ) -> Result<ValidatedCreateEmployee, ApplicationError> {
        let mut errors = ValidationErrors::new();
        if let Err(e) = self.validate() {
            errors.extend_from(&e);
        }

        let first_name = errors.capture("first_name", PersonName::new(&self.first_name));
        let last_name = errors.capture("last_name", PersonName::new(&self.last_name));
        let email = errors.capture("email", EmailAddress::new(self.email.as_str()));
        let document = errors.capture(
            "document_number",
            DocumentNumber::new(self.document_number.as_str()),
        );
        let date_of_birth = check_date_of_birth(&mut errors, self.date_of_birth, policy, today);
        let phones = check_phones(&mut errors, &self.phones, policy.default_phone_region);
        check_not_nil(&mut errors, "job_title_id", self.job_title_id.is_nil());
        check_not_nil(&mut errors, "department_id", self.department_id.is_nil());
        check_password(&mut errors, "password", &self.password, policy.min_password_length);

        match (first_name, last_name, email, document, date_of_birth) {
            (Some(first_name), Some(last_name), Some(email), Some(document), Some(date_of_birth))
                if errors.is_empty() =>
            {
                Ok(ValidatedCreateEmployee {
                    first_name,
                    last_name,
                    email,
                    document,
                    date_of_birth,
                    phones,
                    job_title_id: self.job_title_id,
                    department_id: self.department_id,
                    manager_id: self.manager_id,
                    password: self.password.clone(),
                })
            },
            _ => Err(ApplicationError::Validation(errors)),
        }
    }
}

impl UpdateEmployeeRequest {
    /// Validate the provided fields, reporting all problems at once
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Validation` listing each invalid field.
    pub fn validate_with(
        &self,
        policy: &RequestPolicy,
        today: NaiveDate,
    ) -> Result<ValidatedUpdateEmployee, ApplicationError> {
        let mut errors = ValidationErrors::new();
        if let Err(e) = self.validate() {
            errors.extend_from(&e);
        }

        let validated = ValidatedUpdateEmployee {
            first_name: self
                .first_name
                .as_ref()
                .and_then(|n| errors.capture("first_name", PersonName::new(n))),
            last_name: self
                .last_name
                .as_ref()
                .and_then(|n| errors.capture("last_name", PersonName::new(n))),
            email: self
                .email
                .as_ref()
                .and_then(|e| errors.capture("email", EmailAddress::new(e.as_str()))),
            document: self
                .document_number
                .as_ref()
                .and_then(|d| errors.capture("document_number", DocumentNumber::new(d.as_str()))),
            date_of_birth: self
                .date_of_birth
                .and_then(|d| check_date_of_birth(&mut errors, d, policy, today)),
            phones: self
                .phones
                .as_ref()
                .map(|p| check_phones(&mut errors, p, policy.default_phone_region)),
            job_title_id: self.job_title_id,
            department_id: self.department_id,
            manager: self.manager,
        };
        if let Some(id) = self.job_title_id {
            check_not_nil(&mut errors, "job_title_id", id.is_nil());
        }
        if let Some(id) = self.department_id {
            check_not_nil(&mut errors, "department_id", id.is_nil());
        }

        errors.into_result()?;
        Ok(validated)
    }
}
