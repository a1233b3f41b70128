//! Shared utilities and common types for the OtpGate server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types
//! - Error response structures
//! - Logging bootstrap
//! - Utility functions (email normalization, OTP key derivation)

pub mod config;
pub mod errors;
pub mod logging;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{AppConfig, ConfigError, Environment, LogFormat, LoggingConfig, OtpConfig};
pub use errors::{error_codes, ErrorResponse, IntoErrorResponse};
pub use logging::init_tracing;
pub use utils::validation;
