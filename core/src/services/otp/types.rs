//! Types for OTP manager results

use chrono::{DateTime, Utc};
use std::fmt;

/// Result of a successful OTP request
#[derive(Clone, PartialEq, Eq)]
pub struct IssuedOtp {
    /// The 6-digit code to deliver to the user
    pub code: String,
    /// When the code stops being accepted
    pub expires_at: DateTime<Utc>,
    /// When the user can request another code
    pub next_allowed_at: DateTime<Utc>,
}

impl fmt::Debug for IssuedOtp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssuedOtp")
            .field("code", &"******")
            .field("expires_at", &self.expires_at)
            .field("next_allowed_at", &self.next_allowed_at)
            .finish()
    }
}

/// Result of a successful OTP verification
#[derive(Clone, PartialEq, Eq)]
pub struct ResetGrant {
    /// Opaque single-use reset token
    pub token: String,
    /// When the token stops being redeemable
    pub expires_at: DateTime<Utc>,
}

impl fmt::Debug for ResetGrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResetGrant")
            .field("token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Result of a cleanup sweep
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CleanupResult {
    /// Number of expired OTP records removed
    pub expired_otps: usize,
    /// Number of elapsed cooldowns removed
    pub expired_cooldowns: usize,
    /// Number of expired reset tokens removed
    pub expired_reset_tokens: usize,
}

impl CleanupResult {
    /// Get total number of items cleaned up
    pub fn total_cleaned(&self) -> usize {
        self.expired_otps + self.expired_cooldowns + self.expired_reset_tokens
    }
}

/// Raw record counts, including records that expired but were not swept yet
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StoreStats {
    pub otp_records: usize,
    pub cooldowns: usize,
    pub reset_tokens: usize,
}
