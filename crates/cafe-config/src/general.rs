//! General application configuration.

use cafe_core::enums::Role;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

const fn default_role() -> Role {
    Role::Specialist
}

fn default_format() -> String {
    "json".to_string()
}

const FORMATS: [&str; 3] = ["json", "table", "raw"];

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Role the CLI runs as when `--role` is not given.
    #[serde(default = "default_role")]
    pub role: Role,

    /// Output format when `--format` is not given (`json`, `table` or `raw`).
    #[serde(default = "default_format")]
    pub format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            role: default_role(),
            format: default_format(),
        }
    }
}

impl GeneralConfig {
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if `format` is not a known output format.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !FORMATS.contains(&self.format.as_str()) {
            return Err(ConfigError::invalid(
                "general.format",
                format!("'{}' is not one of {}", self.format, FORMATS.join(", ")),
            ));
        }
        Ok(())
    }
}
