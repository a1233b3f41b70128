//! Configuration for the OTP manager and its cleanup service

use chrono::Duration;
use otp_shared::OtpConfig;

use crate::domain::entities::otp_record::{DEFAULT_MAX_ATTEMPTS, DEFAULT_OTP_TTL_SECONDS};
use crate::domain::entities::reset_token::DEFAULT_RESET_TOKEN_TTL_SECONDS;
use crate::errors::{DomainError, DomainResult, ValidationError};

/// Upper bound for any configured lifetime (one year)
const MAX_LIFETIME_SECONDS: u64 = 365 * 24 * 60 * 60;

/// Configuration for the OTP manager
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpManagerConfig {
    /// How long an issued code stays valid
    pub otp_ttl: Duration,
    /// How long a reset token stays redeemable
    pub reset_token_ttl: Duration,
    /// Wrong guesses allowed per issued code
    pub max_attempts: u32,
    /// Minimum interval between code requests for one key
    pub cooldown: Duration,
}

impl Default for OtpManagerConfig {
    fn default() -> Self {
        Self {
            otp_ttl: Duration::seconds(DEFAULT_OTP_TTL_SECONDS),
            reset_token_ttl: Duration::seconds(DEFAULT_RESET_TOKEN_TTL_SECONDS),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            cooldown: Duration::seconds(60),
        }
    }
}

impl OtpManagerConfig {
    /// Check that the configuration can drive the state machine
    pub fn validate(&self) -> DomainResult<()> {
        let max_lifetime = Duration::seconds(MAX_LIFETIME_SECONDS as i64);
        if self.otp_ttl <= Duration::zero() || self.otp_ttl > max_lifetime {
            return Err(out_of_range("otp_ttl").into());
        }
        if self.reset_token_ttl <= Duration::zero() || self.reset_token_ttl > max_lifetime {
            return Err(out_of_range("reset_token_ttl").into());
        }
        if self.cooldown < Duration::zero() || self.cooldown > max_lifetime {
            return Err(out_of_range("cooldown").into());
        }
        if self.max_attempts == 0 {
            return Err(ValidationError::OutOfRange {
                field: "max_attempts".to_string(),
                min: "1".to_string(),
                max: u32::MAX.to_string(),
            }
            .into());
        }
        Ok(())
    }
}

impl TryFrom<&OtpConfig> for OtpManagerConfig {
    type Error = DomainError;

    fn try_from(config: &OtpConfig) -> Result<Self, Self::Error> {
        config.validate()?;
        let manager_config = Self {
            otp_ttl: lifetime("otp_ttl_seconds", config.otp_ttl_seconds)?,
            reset_token_ttl: lifetime("reset_token_ttl_seconds", config.reset_token_ttl_seconds)?,
            max_attempts: config.max_attempts,
            cooldown: lifetime("cooldown_seconds", config.cooldown_seconds)?,
        };
        manager_config.validate()?;
        Ok(manager_config)
    }
}

/// Configuration for the background cleanup service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OtpCleanupConfig {
    /// How often to run cleanup (in seconds)
    pub interval_seconds: u64,
    /// Whether to enable automatic cleanup
    pub enabled: bool,
}

impl Default for OtpCleanupConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 30,
            enabled: true,
        }
    }
}

impl From<&OtpConfig> for OtpCleanupConfig {
    fn from(config: &OtpConfig) -> Self {
        Self {
            interval_seconds: config.cleanup_interval_seconds,
            enabled: config.cleanup_enabled,
        }
    }
}

fn lifetime(field: &str, seconds: u64) -> DomainResult<Duration> {
    if seconds > MAX_LIFETIME_SECONDS {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: "0".to_string(),
            max: MAX_LIFETIME_SECONDS.to_string(),
        }
        .into());
    }
    Ok(Duration::seconds(seconds as i64))
}

fn out_of_range(field: &str) -> ValidationError {
    ValidationError::OutOfRange {
        field: field.to_string(),
        min: "1s".to_string(),
        max: format!("{}s", MAX_LIFETIME_SECONDS),
    }
}
