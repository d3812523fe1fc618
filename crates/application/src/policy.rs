//! Tunable rules applied by the services
//!
//! Infrastructure builds these from configuration; tests use the defaults.

use chrono::Duration;
use domain::PhoneRegion;

/// Request-level validation settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestPolicy {
    /// Minimum plaintext password length (default: 8)
    pub min_password_length: usize,
    /// Minimum employee age in whole years (default: 18)
    pub minimum_age: u32,
    /// Region assumed for phone numbers without a country code (default: BR)
    pub default_phone_region: PhoneRegion,
}

impl Default for RequestPolicy {
    fn default() -> Self {
        Self {
            min_password_length: 8,
            minimum_age: 18,
            default_phone_region: PhoneRegion::Brazil,
        }
    }
}

/// Failed-login lockout settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockoutPolicy {
    /// Consecutive failures that trigger a lockout (default: 5)
    pub max_failed_attempts: u32,
    /// How long a lockout lasts (default: 15 minutes)
    pub lockout_duration: Duration,
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self {
            max_failed_attempts: 5,
            lockout_duration: Duration::minutes(15),
        }
    }
}
