//! OTP and reset token configuration module

use serde::{Deserialize, Serialize};
use std::env;

use super::ConfigError;

/// OTP issuance, verification and cleanup settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct OtpConfig {
    /// Lifetime of an issued OTP in seconds
    #[serde(default = "default_otp_ttl")]
    pub otp_ttl_seconds: u64,

    /// Lifetime of a reset token in seconds
    #[serde(default = "default_reset_token_ttl")]
    pub reset_token_ttl_seconds: u64,

    /// Wrong guesses allowed before the OTP is discarded
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Minimum seconds between OTP requests for the same key
    #[serde(default = "default_cooldown")]
    pub cooldown_seconds: u64,

    /// How often the expiry sweep runs, in seconds
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_seconds: u64,

    /// Whether the background sweep is started at all
    #[serde(default = "default_cleanup_enabled")]
    pub cleanup_enabled: bool,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            otp_ttl_seconds: default_otp_ttl(),
            reset_token_ttl_seconds: default_reset_token_ttl(),
            max_attempts: default_max_attempts(),
            cooldown_seconds: default_cooldown(),
            cleanup_interval_seconds: default_cleanup_interval(),
            cleanup_enabled: default_cleanup_enabled(),
        }
    }
}

impl OtpConfig {
    /// Create from environment variables
    ///
    /// Unset variables fall back to defaults; set but unparsable ones are errors.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`from_env`](Self::from_env) over an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            otp_ttl_seconds: parse_var("OTP_TTL_SECONDS", lookup("OTP_TTL_SECONDS"), defaults.otp_ttl_seconds)?,
            reset_token_ttl_seconds: parse_var(
                "RESET_TOKEN_TTL_SECONDS",
                lookup("RESET_TOKEN_TTL_SECONDS"),
                defaults.reset_token_ttl_seconds,
            )?,
            max_attempts: parse_var("OTP_MAX_ATTEMPTS", lookup("OTP_MAX_ATTEMPTS"), defaults.max_attempts)?,
            cooldown_seconds: parse_var(
                "OTP_COOLDOWN_SECONDS",
                lookup("OTP_COOLDOWN_SECONDS"),
                defaults.cooldown_seconds,
            )?,
            cleanup_interval_seconds: parse_var(
                "OTP_CLEANUP_INTERVAL_SECONDS",
                lookup("OTP_CLEANUP_INTERVAL_SECONDS"),
                defaults.cleanup_interval_seconds,
            )?,
            cleanup_enabled: parse_var(
                "OTP_CLEANUP_ENABLED",
                lookup("OTP_CLEANUP_ENABLED"),
                defaults.cleanup_enabled,
            )?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check that every setting is usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.otp_ttl_seconds == 0 {
            return Err(ConfigError::invalid("otp_ttl_seconds", "must be greater than 0"));
        }
        if self.reset_token_ttl_seconds == 0 {
            return Err(ConfigError::invalid(
                "reset_token_ttl_seconds",
                "must be greater than 0",
            ));
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::invalid("max_attempts", "must be at least 1"));
        }
        if self.cleanup_enabled && self.cleanup_interval_seconds == 0 {
            return Err(ConfigError::invalid(
                "cleanup_interval_seconds",
                "must be greater than 0 when cleanup is enabled",
            ));
        }
        Ok(())
    }

    /// Set the OTP lifetime
    pub fn with_otp_ttl(mut self, seconds: u64) -> Self {
        self.otp_ttl_seconds = seconds;
        self
    }

    /// Set the cooldown between requests
    pub fn with_cooldown(mut self, seconds: u64) -> Self {
        self.cooldown_seconds = seconds;
        self
    }

    /// Set the number of allowed attempts
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::invalid(key, format!("cannot parse '{}'", raw))),
        None => Ok(default),
    }
}

fn default_otp_ttl() -> u64 {
    60 // 1 minute
}

fn default_reset_token_ttl() -> u64 {
    600 // 10 minutes
}

fn default_max_attempts() -> u32 {
    5
}

fn default_cooldown() -> u64 {
    60
}

fn default_cleanup_interval() -> u64 {
    30
}

fn default_cleanup_enabled() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = OtpConfig::default();
        assert_eq!(config.otp_ttl_seconds, 60);
        assert_eq!(config.reset_token_ttl_seconds, 600);
        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.cooldown_seconds, 60);
        assert_eq!(config.cleanup_interval_seconds, 30);
        assert!(config.cleanup_enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_values() {
        assert!(OtpConfig::default().with_otp_ttl(0).validate().is_err());
        assert!(OtpConfig::default().with_max_attempts(0).validate().is_err());

        let config = OtpConfig {
            reset_token_ttl_seconds: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = OtpConfig {
            cleanup_interval_seconds: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        // A zero interval is fine once the sweep is switched off
        let config = OtpConfig {
            cleanup_interval_seconds: 0,
            cleanup_enabled: false,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_cooldown_is_allowed() {
        assert!(OtpConfig::default().with_cooldown(0).validate().is_ok());
    }

    #[test]
    fn test_lookup_overrides() {
        let lookup = |name: &str| match name {
            "OTP_MAX_ATTEMPTS" => Some("3".to_string()),
            "OTP_COOLDOWN_SECONDS" => Some(" 120 ".to_string()),
            "OTP_CLEANUP_ENABLED" => Some("false".to_string()),
            _ => None,
        };
        let config = OtpConfig::from_lookup(lookup).unwrap();
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.cooldown_seconds, 120);
        assert!(!config.cleanup_enabled);
        assert_eq!(config.otp_ttl_seconds, 60);
    }

    #[test]
    fn test_lookup_rejects_garbage() {
        let err = OtpConfig::from_lookup(|name: &str| {
            (name == "OTP_MAX_ATTEMPTS").then(|| "many".to_string())
        })
        .unwrap_err();
        assert!(err.to_string().contains("OTP_MAX_ATTEMPTS"));

        // Parses, but fails validation
        let err = OtpConfig::from_lookup(|name: &str| {
            (name == "OTP_TTL_SECONDS").then(|| "0".to_string())
        })
        .unwrap_err();
        assert!(err.to_string().contains("otp_ttl_seconds"));
    }

    #[test]
    fn test_parse_var() {
        assert_eq!(parse_var("K", None, 7u64).unwrap(), 7);
        assert_eq!(parse_var("K", Some(" 9 ".to_string()), 7u64).unwrap(), 9);
        assert!(parse_var("K", Some("-1".to_string()), 7u64).is_err());
    }

    #[test]
    fn test_partial_deserialize() {
        let config: OtpConfig = serde_json::from_str(r#"{"max_attempts": 3}"#).unwrap();
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.otp_ttl_seconds, 60);
    }
}
