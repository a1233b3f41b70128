//! Deployment profile detection

use serde::{Deserialize, Serialize};
use std::env;

use super::ConfigError;

/// Variables consulted for the profile name, first match wins
const PROFILE_VARS: [&str; 3] = ["ENVIRONMENT", "ENV", "RUST_ENV"];

/// Deployment profile; picks logging defaults and the dotenv file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    /// Detect the profile from the process environment
    ///
    /// Falls back to `Development` when nothing is set or the value is unknown.
    pub fn from_env() -> Self {
        Self::detect(|name| env::var(name).ok())
    }

    /// Detect the profile through an arbitrary variable lookup
    pub fn detect(lookup: impl Fn(&str) -> Option<String>) -> Self {
        PROFILE_VARS
            .iter()
            .find_map(|name| lookup(name))
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }

    /// Dotenv file holding this profile's overrides, e.g. `.env.staging`
    pub fn env_file(&self) -> String {
        format!(".env.{}", self.as_str())
    }
}

impl std::str::FromStr for Environment {
    type Err = ConfigError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "staging" | "stage" | "test" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(ConfigError::invalid("ENVIRONMENT", format!("unknown profile '{}'", raw))),
        }
    }
}
