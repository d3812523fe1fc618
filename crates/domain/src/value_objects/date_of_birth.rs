//! Date of birth value object

use std::fmt;

use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// A date of birth that is not in the future
///
/// Minimum-age rules are applied by request validation, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateOfBirth(NaiveDate);

impl DateOfBirth {
    /// Create a date of birth, rejecting dates after today (UTC)
    pub fn new(date: NaiveDate) -> Result<Self, DomainError> {
        Self::new_as_of(date, Utc::now().date_naive())
    }

    /// Create a date of birth relative to an explicit "today"
    pub fn new_as_of(date: NaiveDate, today: NaiveDate) -> Result<Self, DomainError> {
        if date > today {
            return Err(DomainError::InvalidDateOfBirth(format!(
                "{date} is in the future"
            )));
        }
        Ok(Self(date))
    }

    /// Parse an ISO-8601 date (`YYYY-MM-DD`)
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        let date = NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map_err(|e| DomainError::InvalidDateOfBirth(format!("{s}: {e}")))?;
        Self::new(date)
    }

    /// The wrapped date
    pub const fn date(&self) -> NaiveDate {
        self.0
    }

    /// Completed years of age on the given date
    pub fn age_on(&self, on: NaiveDate) -> u32 {
        let born = self.0;
        if on < born {
            return 0;
        }
        let mut years = on.year() - born.year();
        if (on.month(), on.day()) < (born.month(), born.day()) {
            years -= 1;
        }
        u32::try_from(years).unwrap_or(0)
    }

    /// Whether the person is at least `years` old on the given date
    pub fn is_at_least(&self, years: u32, on: NaiveDate) -> bool {
        self.age_on(on) >= years
    }
}

impl fmt::Display for DateOfBirth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}
