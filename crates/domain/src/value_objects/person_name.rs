//! Person name value object

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

const MIN_LENGTH: usize = 2;
const MAX_LENGTH: usize = 100;

/// A trimmed first or last name of 2-100 characters
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonName(String);

impl PersonName {
    /// Create a name, trimming surrounding whitespace
    pub fn new(name: impl AsRef<str>) -> Result<Self, DomainError> {
        let trimmed = name.as_ref().trim();
        let length = trimmed.chars().count();
        if length < MIN_LENGTH {
            return Err(DomainError::InvalidName(format!(
                "must have at least {MIN_LENGTH} characters"
            )));
        }
        if length > MAX_LENGTH {
            return Err(DomainError::InvalidName(format!(
                "must have at most {MAX_LENGTH} characters"
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PersonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
