//! OTP record entity for email-based password reset.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default number of wrong guesses tolerated per issued code
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Length of the verification code
pub const CODE_LENGTH: usize = 6;

/// Default lifetime of an issued code (1 minute)
pub const DEFAULT_OTP_TTL_SECONDS: i64 = 60;

/// A live one-time passcode for a single key
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpRecord {
    /// The 6-digit code, zero-padded
    pub code: String,

    /// Timestamp after which the code is no longer accepted
    pub expires_at: DateTime<Utc>,

    /// Wrong guesses still allowed before the record is discarded
    pub attempts_left: u32,
}

impl OtpRecord {
    /// Creates a record for a freshly generated code
    ///
    /// # Arguments
    ///
    /// * `code` - The generated code
    /// * `issued_at` - Current time according to the manager's clock
    /// * `ttl` - How long the code stays valid
    /// * `max_attempts` - Wrong guesses allowed
    pub fn new(code: String, issued_at: DateTime<Utc>, ttl: Duration, max_attempts: u32) -> Self {
        Self {
            code,
            expires_at: issued_at + ttl,
            attempts_left: max_attempts,
        }
    }

    /// Checks if the code has expired at the given instant
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Records a wrong guess
    ///
    /// # Returns
    ///
    /// The number of attempts left afterwards. Zero means the record must be
    /// discarded.
    pub fn record_failed_attempt(&mut self) -> u32 {
        self.attempts_left = self.attempts_left.saturating_sub(1);
        self.attempts_left
    }

    /// Whether no further guesses are allowed
    pub fn is_exhausted(&self) -> bool {
        self.attempts_left == 0
    }
}

// Keeps the code out of log lines
impl fmt::Debug for OtpRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OtpRecord")
            .field("code", &"******")
            .field("expires_at", &self.expires_at)
            .field("attempts_left", &self.attempts_left)
            .finish()
    }
}
