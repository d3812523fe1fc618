//! Department reference entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{errors::DomainError, value_objects::DepartmentId};

/// An organizational department
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    id: DepartmentId,
    name: String,
    description: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Department {
    /// Create a new, active department
    pub fn new(name: impl AsRef<str>, description: Option<String>) -> Result<Self, DomainError> {
        let name = Self::validate_name(name.as_ref())?;
        let now = Utc::now();
        Ok(Self {
            id: DepartmentId::new(),
            name,
            description,
            is_active: true,
            created_at: now,
            updated_at: now,
        })
    }

    /// Restore a department from storage
    #[must_use]
    pub const fn restore(
        id: DepartmentId,
        name: String,
        description: Option<String>,
        is_active: bool,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            description,
            is_active,
            created_at,
            updated_at,
        }
    }

    fn validate_name(name: &str) -> Result<String, DomainError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidName(
                "department name must not be empty".to_string(),
            ));
        }
        Ok(trimmed.to_string())
    }

    pub const fn id(&self) -> DepartmentId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
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

    /// Rename the department; returns whether anything changed
    pub fn rename(&mut self, name: impl AsRef<str>) -> Result<bool, DomainError> {
        let name = Self::validate_name(name.as_ref())?;
        if name == self.name {
            return Ok(false);
        }
        self.name = name;
        self.updated_at = Utc::now();
        Ok(true)
    }

    /// Logical deletion
    pub fn deactivate(&mut self) -> bool {
        if !self.is_active {
            return false;
        }
        self.is_active = false;
        self.updated_at = Utc::now();
        true
    }
}
