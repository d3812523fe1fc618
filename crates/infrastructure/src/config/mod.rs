//! Application configuration
//!
//! Split into focused sub-modules:
//! - `security`: sign-in lockout and password rules
//! - `validation`: request-level checks such as minimum age
//!
//! Telemetry settings live beside the subscriber in [`crate::telemetry`].

mod security;
mod validation;

use std::fmt;

use application::{LockoutPolicy, RequestPolicy};
use serde::{Deserialize, Serialize};

pub use security::SecurityConfig;
pub use validation::ValidationConfig;

use crate::telemetry::TelemetryConfig;

/// Prefix for environment overrides, e.g. `ROSTER_SECURITY__MAX_FAILED_ATTEMPTS`
pub const ENV_PREFIX: &str = "ROSTER";

/// Application environment (development or production)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            _ => Err(format!(
                "Invalid environment: {s}. Use 'development' or 'production'"
            )),
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development or production)
    #[serde(default)]
    pub environment: Environment,

    /// Sign-in lockout and password rules
    #[serde(default)]
    pub security: SecurityConfig,

    /// Request validation rules
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Log filter and output format
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load configuration from an optional `config.toml` and `ROSTER_*` variables
    ///
    /// Nested keys use a double underscore, so `ROSTER_VALIDATION__MINIMUM_AGE=21`
    /// overrides `validation.minimum_age`.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from the named file (extension optional) plus the environment
    pub fn load_from(file: &str) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            // Load from file if exists
            .add_source(config::File::with_name(file).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// Request validation settings as seen by the services
    #[must_use]
    pub const fn request_policy(&self) -> RequestPolicy {
        RequestPolicy {
            min_password_length: self.security.min_password_length,
            minimum_age: self.validation.minimum_age,
            default_phone_region: self.validation.default_phone_region,
        }
    }

    /// Sign-in lockout settings as seen by the services
    #[must_use]
    pub fn lockout_policy(&self) -> LockoutPolicy {
        LockoutPolicy {
            max_failed_attempts: self.security.max_failed_attempts,
            lockout_duration: chrono::Duration::minutes(i64::from(
                self.security.lockout_minutes,
            )),
        }
    }
}
