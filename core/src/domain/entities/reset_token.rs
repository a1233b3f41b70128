//! Reset token entity issued after a successful OTP verification.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default lifetime of a reset token (10 minutes)
pub const DEFAULT_RESET_TOKEN_TTL_SECONDS: i64 = 600;

/// Single-use credential bound to the key that earned it
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetToken {
    /// Opaque token value handed to the client
    pub token: String,

    /// Key whose OTP verification produced this token
    pub key: String,

    /// Timestamp after which the token can no longer be redeemed
    pub expires_at: DateTime<Utc>,
}

impl ResetToken {
    /// Creates a token bound to `key`
    ///
    /// # Arguments
    ///
    /// * `token` - Freshly generated opaque value
    /// * `key` - The key that passed verification
    /// * `issued_at` - Current time according to the manager's clock
    /// * `ttl` - How long the token can be redeemed
    pub fn new(token: String, key: String, issued_at: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            token,
            key,
            expires_at: issued_at + ttl,
        }
    }

    /// Checks if the token has expired at the given instant
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Checks whether the token belongs to `key`
    pub fn is_bound_to(&self, key: &str) -> bool {
        self.key == key
    }
}

impl fmt::Debug for ResetToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResetToken")
            .field("token", &"<redacted>")
            .field("key", &self.key)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_token() {
        let now = Utc::now();
        let token = ResetToken::new(
            "abc123".to_string(),
            "otp:email:a@x.com".to_string(),
            now,
            Duration::seconds(DEFAULT_RESET_TOKEN_TTL_SECONDS),
        );

        assert_eq!(token.expires_at, now + Duration::minutes(10));
        assert!(!token.is_expired_at(now));
        assert!(token.is_expired_at(now + Duration::minutes(11)));
        assert!(token.is_bound_to("otp:email:a@x.com"));
        assert!(!token.is_bound_to("otp:email:b@x.com"));
    }

    #[test]
    fn test_debug_redacts_token() {
        let token = ResetToken::new(
            "very-secret".to_string(),
            "k".to_string(),
            Utc::now(),
            Duration::seconds(1),
        );
        assert!(!format!("{:?}", token).contains("very-secret"));
    }
}
