//! In-memory state owned by the OTP manager
//!
//! Each map is a `DashMap`, so keys hash to independent shards and no
//! operation needs a global lock. Read-modify-write sequences go through the
//! `entry` API, which holds the key's shard for the whole update.
//!
//! Lock order when two maps are touched: cooldowns, then otps, then
//! reset_tokens. No path holds two entries of the same map.

use chrono::{DateTime, Utc};
use dashmap::DashMap;

use crate::domain::entities::{CooldownRecord, OtpRecord, ResetToken};

use super::types::StoreStats;

#[derive(Debug, Default)]
pub(crate) struct OtpStore {
    /// key -> live code
    pub(crate) otps: DashMap<String, OtpRecord>,
    /// key -> earliest next request
    pub(crate) cooldowns: DashMap<String, CooldownRecord>,
    /// token -> reset token
    pub(crate) reset_tokens: DashMap<String, ResetToken>,
}

impl OtpStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn stats(&self) -> StoreStats {
        StoreStats {
            otp_records: self.otps.len(),
            cooldowns: self.cooldowns.len(),
            reset_tokens: self.reset_tokens.len(),
        }
    }

    pub(crate) fn purge_expired_otps(&self, now: DateTime<Utc>) -> usize {
        purge(&self.otps, |record| record.is_expired_at(now))
    }

    pub(crate) fn purge_expired_cooldowns(&self, now: DateTime<Utc>) -> usize {
        purge(&self.cooldowns, |cooldown| !cooldown.is_active_at(now))
    }

    pub(crate) fn purge_expired_reset_tokens(&self, now: DateTime<Utc>) -> usize {
        purge(&self.reset_tokens, |token| token.is_expired_at(now))
    }
}

/// Remove every entry for which `is_expired` holds
///
/// Candidates are collected first and the iterator is dropped before any
/// removal. Each removal re-checks the predicate under the key's own lock, so
/// a record refreshed in between survives.
fn purge<V>(map: &DashMap<String, V>, is_expired: impl Fn(&V) -> bool) -> usize {
    let candidates: Vec<String> = map
        .iter()
        .filter(|entry| is_expired(entry.value()))
        .map(|entry| entry.key().clone())
        .collect();

    candidates
        .iter()
        .filter(|key| map.remove_if(key.as_str(), |_, value| is_expired(value)).is_some())
        .count()
}
