//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `environment` - Deployment profile detection
//! - `logging` - Subscriber settings per profile
//! - `otp` - OTP lifetimes, attempt limits, cooldown and cleanup scheduling

pub mod environment;
pub mod logging;
pub mod otp;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// Re-export commonly used types
pub use environment::Environment;
pub use logging::{LogFormat, LoggingConfig};
pub use otp::OtpConfig;

/// Errors raised while loading or validating configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

impl ConfigError {
    pub fn invalid(key: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key: key.into(),
            message: message.into(),
        }
    }
}

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// OTP and reset token configuration
    #[serde(default)]
    pub otp: OtpConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            otp: OtpConfig::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Create configuration for development environment
    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            otp: OtpConfig::default(),
            logging: LoggingConfig::for_environment(Environment::Development),
        }
    }

    /// Create configuration for production environment
    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            otp: OtpConfig::default(),
            logging: LoggingConfig::for_environment(Environment::Production),
        }
    }

    /// Load configuration from environment
    ///
    /// The environment picks the baseline profile; OTP settings are then
    /// overridden from `OTP_*` variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let env = Environment::from_env();
        let mut config = match env {
            Environment::Development => Self::development(),
            Environment::Production => Self::production(),
            Environment::Staging => {
                let mut config = Self::development();
                config.environment = Environment::Staging;
                config.logging = LoggingConfig::for_environment(Environment::Staging);
                config
            }
        };
        config.otp = OtpConfig::from_env()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profiles_use_default_otp_settings() {
        let dev = AppConfig::development();
        assert_eq!(dev.environment, Environment::Development);
        assert_eq!(dev.otp, OtpConfig::default());
        assert_eq!(dev.logging.level, "debug");

        let prod = AppConfig::production();
        assert_eq!(prod.environment, Environment::Production);
        assert_eq!(prod.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: AppConfig = serde_json::from_str(r#"{"environment":"staging"}"#).unwrap();
        assert_eq!(config.environment, Environment::Staging);
        assert_eq!(config.otp.max_attempts, 5);
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::invalid("OTP_MAX_ATTEMPTS", "must be at least 1");
        assert_eq!(
            err.to_string(),
            "Invalid value for OTP_MAX_ATTEMPTS: must be at least 1"
        );
    }
}
