//! Domain-level errors

use thiserror::Error;

/// Coarse classification of a domain failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainErrorKind {
    /// A value object could not be constructed from its input
    InvalidFormat,
    /// An aggregate refused a change that would break one of its invariants
    StateInvariantViolated,
}

/// Errors that can occur in the domain layer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Invalid email address format
    #[error("Invalid email address: {0}")]
    InvalidEmailAddress(String),

    /// Invalid CPF document number
    #[error("Invalid document number: {0}")]
    InvalidDocumentNumber(String),

    /// Invalid phone number format
    #[error("Invalid phone number: {0}")]
    InvalidPhoneNumber(String),

    /// Invalid date of birth
    #[error("Invalid date of birth: {0}")]
    InvalidDateOfBirth(String),

    /// Invalid first or last name
    #[error("Invalid name: {0}")]
    InvalidName(String),

    /// Job title hierarchy level outside the accepted set
    #[error("Invalid hierarchy level: {0}")]
    InvalidHierarchyLevel(i32),

    /// Identifier that must not be empty was empty
    #[error("{0} must not be empty")]
    EmptyIdentifier(&'static str),

    /// An employee must always keep at least one phone number
    #[error("An employee must have at least one phone number")]
    EmptyPhoneSet,

    /// An employee cannot manage itself
    #[error("An employee cannot be their own manager")]
    SelfManagement,

    /// The requested manager is already managed by this employee
    #[error("Circular manager assignment between {employee} and {manager}")]
    CircularManagement { employee: String, manager: String },
}

impl DomainError {
    /// Classify this error
    pub const fn kind(&self) -> DomainErrorKind {
        match self {
            Self::InvalidEmailAddress(_)
            | Self::InvalidDocumentNumber(_)
            | Self::InvalidPhoneNumber(_)
            | Self::InvalidDateOfBirth(_)
            | Self::InvalidName(_)
            | Self::InvalidHierarchyLevel(_)
            | Self::EmptyIdentifier(_) => DomainErrorKind::InvalidFormat,
            Self::EmptyPhoneSet | Self::SelfManagement | Self::CircularManagement { .. } => {
                DomainErrorKind::StateInvariantViolated
            },
        }
    }

    /// Create a circular management error
    pub fn circular(employee: impl ToString, manager: impl ToString) -> Self {
        Self::CircularManagement {
            employee: employee.to_string(),
            manager: manager.to_string(),
        }
    }
}
