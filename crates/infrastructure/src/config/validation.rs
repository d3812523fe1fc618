//! Request validation configuration

use domain::PhoneRegion;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Youngest allowed employee, in whole years
    #[serde(default = "default_minimum_age")]
    pub minimum_age: u32,

    /// Region assumed for phone numbers written without a country code
    #[serde(default)]
    pub default_phone_region: PhoneRegion,
}

const fn default_minimum_age() -> u32 {
    18
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            minimum_age: default_minimum_age(),
            default_phone_region: PhoneRegion::default(),
        }
    }
}
