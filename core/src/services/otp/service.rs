//! Main OTP manager implementation

use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use otp_shared::validation::validators;
use std::sync::Arc;

use crate::domain::entities::{CooldownRecord, OtpRecord, ResetToken};
use crate::errors::{DomainResult, OtpError, ValidationError};

use super::clock::{Clock, SystemClock};
use super::codes::{constant_time_compare, ensure_secure_rng, generate_reset_token, generate_secure_code};
use super::config::OtpManagerConfig;
use super::store::OtpStore;
use super::types::{CleanupResult, IssuedOtp, ResetGrant, StoreStats};

/// What a verification attempt did to the key's record
enum VerifyOutcome {
    Missing,
    Expired,
    Mismatch { remaining: u32 },
    Exhausted,
    Matched,
}

/// What a redemption attempt did to the token
enum RedeemOutcome {
    Missing,
    Expired,
    KeyMismatch,
    Redeemed,
}

/// Owner of all OTP, cooldown and reset token state
///
/// Construct one per process and share it behind an `Arc`. Every operation is
/// synchronous and bounded; none performs I/O.
pub struct OtpManager<K: Clock = SystemClock> {
    /// Per-key records
    store: OtpStore,
    /// Time source for every expiry decision
    clock: Arc<K>,
    /// Manager configuration
    config: OtpManagerConfig,
}

impl OtpManager<SystemClock> {
    /// Create a manager driven by wall-clock time
    ///
    /// # Returns
    ///
    /// * `Ok(OtpManager)` - Ready to serve requests
    /// * `Err(DomainError)` - If the configuration is unusable or the OS
    ///   random source is unavailable
    pub fn new(config: OtpManagerConfig) -> DomainResult<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }
}

impl<K: Clock> OtpManager<K> {
    /// Create a manager with an explicit time source
    pub fn with_clock(config: OtpManagerConfig, clock: Arc<K>) -> DomainResult<Self> {
        config.validate()?;
        ensure_secure_rng()?;

        tracing::info!(
            otp_ttl_seconds = config.otp_ttl.num_seconds(),
            reset_token_ttl_seconds = config.reset_token_ttl.num_seconds(),
            max_attempts = config.max_attempts,
            cooldown_seconds = config.cooldown.num_seconds(),
            "OTP manager initialized"
        );

        Ok(Self {
            store: OtpStore::new(),
            clock,
            config,
        })
    }

    /// The configuration this manager runs with
    pub fn config(&self) -> &OtpManagerConfig {
        &self.config
    }

    /// Issue a new code for `key`
    ///
    /// This method:
    /// 1. Rejects an empty key
    /// 2. Rejects the request while the key's cooldown is active
    /// 3. Stores a fresh code, replacing any earlier one for the key
    /// 4. Restarts the cooldown
    ///
    /// Steps 2 to 4 run while the key's cooldown slot is held, so two
    /// concurrent requests cannot both get past the cooldown.
    ///
    /// # Arguments
    ///
    /// * `key` - Normalized identity, e.g. from `otp_key_for_email`
    ///
    /// # Returns
    ///
    /// * `Ok(IssuedOtp)` - The code to deliver to the user
    /// * `Err(DomainError::Otp(OtpError::CooldownActive { .. }))` - Too soon
    pub fn request_otp(&self, key: &str) -> DomainResult<IssuedOtp> {
        if !validators::not_empty(key) {
            return Err(ValidationError::RequiredField {
                field: "key".to_string(),
            }
            .into());
        }

        let code = generate_secure_code()?;
        let now = self.clock.now();
        let expires_at = now + self.config.otp_ttl;
        let next_allowed_at = now + self.config.cooldown;

        let otp = OtpRecord::new(code.clone(), now, self.config.otp_ttl, self.config.max_attempts);
        let cooldown = CooldownRecord::new(next_allowed_at);

        // The OTP write happens while the cooldown slot is still held
        match self.store.cooldowns.entry(key.to_string()) {
            Entry::Occupied(entry) if entry.get().is_active_at(now) => {
                let retry_after_seconds = entry.get().retry_after_seconds(now);
                drop(entry);
                tracing::warn!(
                    key = key,
                    retry_after_seconds = retry_after_seconds,
                    event = "otp_cooldown_active",
                    "OTP request rejected during cooldown"
                );
                return Err(OtpError::CooldownActive { retry_after_seconds }.into());
            }
            Entry::Occupied(mut entry) => {
                self.store.otps.insert(key.to_string(), otp);
                entry.insert(cooldown);
            }
            Entry::Vacant(entry) => {
                self.store.otps.insert(key.to_string(), otp);
                entry.insert(cooldown);
            }
        }

        tracing::info!(
            key = key,
            expires_at = %expires_at,
            event = "otp_generated",
            "Generated new OTP"
        );

        Ok(IssuedOtp {
            code,
            expires_at,
            next_allowed_at,
        })
    }

    /// Verify a code and, on success, issue a reset token
    ///
    /// The whole check runs under the key's OTP slot:
    /// - no record: rejected
    /// - expired: record removed, rejected
    /// - wrong code: one attempt consumed; the record is removed when none
    ///   are left; rejected
    /// - right code: record removed (single use), token issued
    ///
    /// Every rejection is the same [`OtpError::InvalidOrExpiredOtp`].
    ///
    /// # Arguments
    ///
    /// * `key` - The key the code was issued for
    /// * `provided_code` - The code entered by the user
    pub fn verify_otp(&self, key: &str, provided_code: &str) -> DomainResult<ResetGrant> {
        let now = self.clock.now();

        let outcome = match self.store.otps.entry(key.to_string()) {
            Entry::Vacant(_) => VerifyOutcome::Missing,
            Entry::Occupied(mut entry) => {
                if entry.get().is_expired_at(now) {
                    entry.remove();
                    VerifyOutcome::Expired
                } else if constant_time_compare(&entry.get().code, provided_code) {
                    entry.remove();
                    VerifyOutcome::Matched
                } else {
                    let remaining = entry.get_mut().record_failed_attempt();
                    if entry.get().is_exhausted() {
                        entry.remove();
                        VerifyOutcome::Exhausted
                    } else {
                        VerifyOutcome::Mismatch { remaining }
                    }
                }
            }
        };

        match outcome {
            VerifyOutcome::Matched => {
                let grant = self.issue_reset_token(key, now);
                tracing::info!(
                    key = key,
                    event = "otp_verified_success",
                    "OTP verified, reset token issued"
                );
                Ok(grant)
            }
            VerifyOutcome::Mismatch { remaining } => {
                tracing::warn!(
                    key = key,
                    remaining_attempts = remaining,
                    event = "otp_verification_failed",
                    "OTP verification failed"
                );
                Err(OtpError::InvalidOrExpiredOtp.into())
            }
            VerifyOutcome::Exhausted => {
                tracing::warn!(
                    key = key,
                    event = "otp_attempts_exhausted",
                    "Maximum OTP attempts exceeded, code discarded"
                );
                Err(OtpError::InvalidOrExpiredOtp.into())
            }
            VerifyOutcome::Expired => {
                tracing::info!(key = key, event = "otp_expired", "OTP expired before verification");
                Err(OtpError::InvalidOrExpiredOtp.into())
            }
            VerifyOutcome::Missing => {
                tracing::debug!(key = key, event = "otp_missing", "No live OTP for key");
                Err(OtpError::InvalidOrExpiredOtp.into())
            }
        }
    }

    /// Redeem a reset token for `expected_key`
    ///
    /// A token redeems exactly once and only for the key that earned it. A
    /// token presented with the wrong key is left in place.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - The token was valid and is now consumed
    /// * `Err(DomainError::Otp(OtpError::TokenInvalid))` - Missing, expired or
    ///   bound to another key
    pub fn redeem_reset_token(&self, token: &str, expected_key: &str) -> DomainResult<()> {
        let now = self.clock.now();

        let outcome = match self.store.reset_tokens.entry(token.to_string()) {
            Entry::Vacant(_) => RedeemOutcome::Missing,
            Entry::Occupied(entry) => {
                if entry.get().is_expired_at(now) {
                    entry.remove();
                    RedeemOutcome::Expired
                } else if !entry.get().is_bound_to(expected_key) {
                    RedeemOutcome::KeyMismatch
                } else {
                    entry.remove();
                    RedeemOutcome::Redeemed
                }
            }
        };

        match outcome {
            RedeemOutcome::Redeemed => {
                tracing::info!(
                    key = expected_key,
                    event = "reset_token_redeemed",
                    "Reset token redeemed"
                );
                Ok(())
            }
            RedeemOutcome::KeyMismatch => {
                tracing::warn!(
                    key = expected_key,
                    reason = "key_mismatch",
                    event = "reset_token_rejected",
                    "Reset token presented for a different key"
                );
                Err(OtpError::TokenInvalid.into())
            }
            RedeemOutcome::Expired => {
                tracing::debug!(
                    key = expected_key,
                    reason = "expired",
                    event = "reset_token_rejected",
                    "Reset token rejected"
                );
                Err(OtpError::TokenInvalid.into())
            }
            RedeemOutcome::Missing => {
                tracing::debug!(
                    key = expected_key,
                    reason = "missing",
                    event = "reset_token_rejected",
                    "Reset token rejected"
                );
                Err(OtpError::TokenInvalid.into())
            }
        }
    }

    /// Boolean form of [`redeem_reset_token`](Self::redeem_reset_token)
    pub fn try_redeem_reset_token(&self, token: &str, expected_key: &str) -> bool {
        self.redeem_reset_token(token, expected_key).is_ok()
    }

    /// Remove every expired code, elapsed cooldown and expired reset token
    ///
    /// Only reclaims memory; the other operations re-check expiry themselves.
    pub fn cleanup_expired(&self) -> CleanupResult {
        let now = self.clock.now();

        let result = CleanupResult {
            expired_otps: self.store.purge_expired_otps(now),
            expired_cooldowns: self.store.purge_expired_cooldowns(now),
            expired_reset_tokens: self.store.purge_expired_reset_tokens(now),
        };

        tracing::debug!(
            expired_otps = result.expired_otps,
            expired_cooldowns = result.expired_cooldowns,
            expired_reset_tokens = result.expired_reset_tokens,
            event = "cleanup_completed",
            "Expired OTP state swept"
        );

        result
    }

    /// Wrong guesses still allowed for the key's live code
    ///
    /// `None` when the key has no live code.
    pub fn remaining_attempts(&self, key: &str) -> Option<u32> {
        let now = self.clock.now();
        self.store
            .otps
            .get(key)
            .filter(|record| !record.is_expired_at(now))
            .map(|record| record.attempts_left)
    }

    /// When the key may request its next code
    ///
    /// `None` when no cooldown is active, i.e. a request would be accepted now.
    pub fn next_allowed_request_at(&self, key: &str) -> Option<DateTime<Utc>> {
        let now = self.clock.now();
        self.store
            .cooldowns
            .get(key)
            .filter(|cooldown| cooldown.is_active_at(now))
            .map(|cooldown| cooldown.next_allowed_at)
    }

    /// Raw record counts, swept or not
    pub fn stats(&self) -> StoreStats {
        self.store.stats()
    }

    fn issue_reset_token(&self, key: &str, now: DateTime<Utc>) -> ResetGrant {
        let token = ResetToken::new(
            generate_reset_token(),
            key.to_string(),
            now,
            self.config.reset_token_ttl,
        );
        let grant = ResetGrant {
            token: token.token.clone(),
            expires_at: token.expires_at,
        };
        self.store.reset_tokens.insert(token.token.clone(), token);
        grant
    }
}
