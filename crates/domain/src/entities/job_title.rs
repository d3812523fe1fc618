//! Job title reference entity

use serde::{Deserialize, Serialize};

use crate::{
    errors::DomainError,
    value_objects::{HierarchicalRole, HierarchyLevel, JobTitleId},
};

/// A job title with the hierarchy level that determines its rank
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobTitle {
    pub id: JobTitleId,
    pub name: String,
    pub hierarchy_level: HierarchyLevel,
    pub is_active: bool,
}

impl JobTitle {
    /// Create a new job title
    pub fn new(name: impl AsRef<str>, hierarchy_level: i32) -> Result<Self, DomainError> {
        let name = name.as_ref().trim();
        if name.is_empty() {
            return Err(DomainError::InvalidName(
                "job title name must not be empty".to_string(),
            ));
        }
        Ok(Self {
            id: JobTitleId::new(),
            name: name.to_string(),
            hierarchy_level: HierarchyLevel::new(hierarchy_level)?,
            is_active: true,
        })
    }

    /// Rank granted to holders of this title
    pub const fn rank(&self) -> HierarchicalRole {
        self.hierarchy_level.role()
    }
}
