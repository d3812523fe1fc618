//! Security configuration: sign-in lockout and password rules.

use serde::{Deserialize, Serialize};

/// Security configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Consecutive failed sign-ins before an account is locked
    #[serde(default = "default_max_failed_attempts")]
    pub max_failed_attempts: u32,

    /// Lockout length in minutes (default: 15)
    #[serde(default = "default_lockout_minutes")]
    pub lockout_minutes: u32,

    /// Minimum plaintext password length
    #[serde(default = "default_min_password_length")]
    pub min_password_length: usize,
}

const fn default_max_failed_attempts() -> u32 {
    5
}

const fn default_lockout_minutes() -> u32 {
    15
}

const fn default_min_password_length() -> usize {
    8
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_failed_attempts: default_max_failed_attempts(),
            lockout_minutes: default_lockout_minutes(),
            min_password_length: default_min_password_length(),
        }
    }
}
