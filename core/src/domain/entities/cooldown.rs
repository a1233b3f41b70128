//! Cooldown entity limiting how often a key may request a new code.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Earliest time the next OTP request for a key is accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CooldownRecord {
    pub next_allowed_at: DateTime<Utc>,
}

impl CooldownRecord {
    pub fn new(next_allowed_at: DateTime<Utc>) -> Self {
        Self { next_allowed_at }
    }

    /// Whether requests are still blocked at `now`
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        now < self.next_allowed_at
    }

    /// Whole seconds until the next request is allowed, rounded up
    ///
    /// Zero once the cooldown has elapsed.
    pub fn retry_after_seconds(&self, now: DateTime<Utc>) -> u64 {
        if !self.is_active_at(now) {
            return 0;
        }
        let remaining_ms = (self.next_allowed_at - now).num_milliseconds();
        // Sub-millisecond remainders still count as one second
        ((remaining_ms + 999) / 1000).max(1) as u64
    }
}
