//! Organizational rank scale and job-title hierarchy levels
//!
//! Ranks form a total order by authority:
//! `SuperUser > Director > Manager > Senior > Pleno > Junior`.
//! The equal-or-lower rule lets an actor act on any target whose rank does
//! not exceed its own.
//!
//! # Examples
//!
//! ```
//! use domain::{HierarchicalRole, HierarchyLevel};
//!
//! let manager = HierarchicalRole::Manager;
//! assert!(manager.can_act_on(HierarchicalRole::Senior));
//! assert!(manager.can_act_on(HierarchicalRole::Manager));
//! assert!(!manager.can_act_on(HierarchicalRole::Director));
//!
//! let level = HierarchyLevel::new(3).unwrap();
//! assert_eq!(level.role(), HierarchicalRole::Senior);
//! ```

use std::{cmp::Ordering, fmt};

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Ordered rank used for every create/modify permission check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HierarchicalRole {
    SuperUser,
    Director,
    Manager,
    Senior,
    Pleno,
    Junior,
}

impl HierarchicalRole {
    /// All ranks, from highest to lowest authority
    pub const ALL: [Self; 6] = [
        Self::SuperUser,
        Self::Director,
        Self::Manager,
        Self::Senior,
        Self::Pleno,
        Self::Junior,
    ];

    /// The rank with the least authority
    pub const LOWEST: Self = Self::Junior;

    /// Authority weight; larger means more powerful
    pub const fn authority(self) -> u8 {
        match self {
            Self::SuperUser => 6,
            Self::Director => 5,
            Self::Manager => 4,
            Self::Senior => 3,
            Self::Pleno => 2,
            Self::Junior => 1,
        }
    }

    /// Whether a holder of this rank may create or modify a target of `target` rank
    pub const fn can_act_on(self, target: Self) -> bool {
        target.authority() <= self.authority()
    }

    /// The job-title hierarchy level mapped to this rank
    pub const fn hierarchy_level(self) -> HierarchyLevel {
        HierarchyLevel(match self {
            Self::SuperUser => HierarchyLevel::SUPER_USER,
            Self::Director => 1,
            Self::Manager => 2,
            Self::Senior => 3,
            Self::Pleno => 4,
            Self::Junior => 5,
        })
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SuperUser => "super_user",
            Self::Director => "director",
            Self::Manager => "manager",
            Self::Senior => "senior",
            Self::Pleno => "pleno",
            Self::Junior => "junior",
        }
    }

    /// Human-readable rank name, e.g. `"Super User"` or `"Pleno"`
    pub const fn title(self) -> &'static str {
        match self {
            Self::SuperUser => "Super User",
            Self::Director => "Director",
            Self::Manager => "Manager",
            Self::Senior => "Senior",
            Self::Pleno => "Pleno",
            Self::Junior => "Junior",
        }
    }
}

impl PartialOrd for HierarchicalRole {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HierarchicalRole {
    fn cmp(&self, other: &Self) -> Ordering {
        self.authority().cmp(&other.authority())
    }
}

impl fmt::Display for HierarchicalRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Numeric job-title level: 1 (highest business rank) to 5, or 999 for super users
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct HierarchyLevel(i32);

impl HierarchyLevel {
    /// Level reserved for super users
    pub const SUPER_USER: i32 = 999;

    /// Validate a raw level
    pub const fn new(level: i32) -> Result<Self, DomainError> {
        match level {
            1..=5 | Self::SUPER_USER => Ok(Self(level)),
            other => Err(DomainError::InvalidHierarchyLevel(other)),
        }
    }

    pub const fn value(self) -> i32 {
        self.0
    }

    /// The rank this level maps to
    pub const fn role(self) -> HierarchicalRole {
        match self.0 {
            1 => HierarchicalRole::Director,
            2 => HierarchicalRole::Manager,
            3 => HierarchicalRole::Senior,
            4 => HierarchicalRole::Pleno,
            5 => HierarchicalRole::Junior,
            // construction only admits 1..=5 and 999
            _ => HierarchicalRole::SuperUser,
        }
    }
}

impl TryFrom<i32> for HierarchyLevel {
    type Error = DomainError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<HierarchyLevel> for i32 {
    fn from(level: HierarchyLevel) -> Self {
        level.0
    }
}

impl From<HierarchyLevel> for HierarchicalRole {
    fn from(level: HierarchyLevel) -> Self {
        level.role()
    }
}

impl fmt::Display for HierarchyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
