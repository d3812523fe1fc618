//! Application-level errors

use std::{borrow::Cow, fmt};

use domain::{DomainError, DomainErrorKind};
use serde::Serialize;
use thiserror::Error;

/// Coarse classification every failure maps to
///
/// Presentation layers translate this into status codes; the set is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidFormat,
    ValidationFailed,
    NotFound,
    PermissionDenied,
    Conflict,
    StateInvariantViolated,
    Unauthorized,
    Cancelled,
    Internal,
}

/// A single problem with a request field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// All field problems found while validating one request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a problem with `field`
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Record a value-object construction failure for `field`
    pub fn push_domain(&mut self, field: impl Into<String>, error: &DomainError) {
        self.push(field, error.to_string());
    }

    /// Unwrap a construction result, recording the error under `field`
    pub fn capture<T>(&mut self, field: &str, result: Result<T, DomainError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.push_domain(field, &e);
                None
            },
        }
    }

    /// Merge field errors reported by a `validator` derive
    pub fn extend_from(&mut self, errors: &validator::ValidationErrors) {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));
        for (field, problems) in fields {
            for problem in problems {
                let message = problem
                    .message
                    .clone()
                    .unwrap_or_else(|| Cow::Owned(format!("failed {} check", problem.code)));
                self.push(field.to_string(), message);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Whether any problem was recorded for `field`
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    /// `Ok(())` when nothing was recorded, otherwise a validation failure
    pub fn into_result(self) -> Result<(), ApplicationError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ApplicationError::Validation(self))
        }
    }
}

impl From<&validator::ValidationErrors> for ValidationErrors {
    fn from(errors: &validator::ValidationErrors) -> Self {
        let mut out = Self::new();
        out.extend_from(errors);
        out
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", e.field, e.message)?;
        }
        Ok(())
    }
}

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain-level error
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// One or more request fields are invalid
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// Referenced entity does not exist
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// The acting account could not be resolved
    #[error("Acting account not found: {0}")]
    ActorNotFound(String),

    /// The actor's rank does not allow the operation
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// A uniqueness constraint was violated
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Wrong user name or password
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Account is locked out until the given time
    #[error("Account locked until {until}")]
    AccountLocked { until: chrono::DateTime<chrono::Utc> },

    /// Account is deactivated
    #[error("Account is inactive")]
    AccountInactive,

    /// The caller cancelled the operation
    #[error("Operation cancelled")]
    Cancelled,

    /// Storage adapter failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Taxonomy kind for this error
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(e) => match e.kind() {
                DomainErrorKind::InvalidFormat => ErrorKind::InvalidFormat,
                DomainErrorKind::StateInvariantViolated => ErrorKind::StateInvariantViolated,
            },
            Self::Validation(_) => ErrorKind::ValidationFailed,
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::PermissionDenied(_) | Self::AccountInactive => ErrorKind::PermissionDenied,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::ActorNotFound(_) | Self::InvalidCredentials | Self::AccountLocked { .. } => {
                ErrorKind::Unauthorized
            },
            Self::Cancelled => ErrorKind::Cancelled,
            Self::Storage(_) | Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Whether the caller failed to authenticate
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self.kind(), ErrorKind::Unauthorized)
    }

    /// Field errors when this is a validation failure
    pub const fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}
