//! OTP service module for email-based password reset
//!
//! This module provides the complete OTP workflow:
//! - Code generation from the OS CSPRNG
//! - Per-key cooldown between requests
//! - Verification with attempt tracking and constant-time comparison
//! - Single-use reset tokens bound to the verified key
//! - Periodic sweep of expired records
//!
//! Delivery of the code to the user is left to the caller.

mod cleanup;
mod clock;
mod codes;
mod config;
mod service;
mod store;
mod types;

#[cfg(test)]
mod tests;

pub use cleanup::OtpCleanupService;
pub use clock::{Clock, ManualClock, SystemClock};
pub use codes::{constant_time_compare, ensure_secure_rng, generate_reset_token, generate_secure_code};
pub use config::{OtpCleanupConfig, OtpManagerConfig};
pub use service::OtpManager;
pub use types::{CleanupResult, IssuedOtp, ResetGrant, StoreStats};
