//! Background sweep of expired OTP state
//!
//! Expired records are already ignored by every operation; this service only
//! keeps memory bounded when keys are never revisited.

use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::clock::Clock;
use super::config::OtpCleanupConfig;
use super::service::OtpManager;
use super::types::CleanupResult;

/// Periodically calls [`OtpManager::cleanup_expired`]
pub struct OtpCleanupService<K: Clock + 'static> {
    manager: Arc<OtpManager<K>>,
    config: OtpCleanupConfig,
}

impl<K: Clock + 'static> OtpCleanupService<K> {
    pub fn new(manager: Arc<OtpManager<K>>, config: OtpCleanupConfig) -> Self {
        Self { manager, config }
    }

    /// The manager this service sweeps
    pub fn manager(&self) -> &Arc<OtpManager<K>> {
        &self.manager
    }

    /// Run a single cleanup cycle
    pub fn run_cleanup(&self) -> CleanupResult {
        let result = self.manager.cleanup_expired();

        if result.total_cleaned() > 0 {
            info!(
                expired_otps = result.expired_otps,
                expired_cooldowns = result.expired_cooldowns,
                expired_reset_tokens = result.expired_reset_tokens,
                event = "otp_cleanup_cycle",
                "OTP cleanup removed {} records",
                result.total_cleaned()
            );
        }

        result
    }

    /// Start the cleanup service as a background task
    ///
    /// Spawns a tokio task that sweeps once per interval, starting
    /// immediately. Must be called from within a tokio runtime.
    ///
    /// # Returns
    ///
    /// * `Some(JoinHandle)` - Abort it to stop the sweep
    /// * `None` - Cleanup is disabled or the interval is zero
    pub fn start_background_task(self: Arc<Self>) -> Option<JoinHandle<()>> {
        if !self.config.enabled {
            warn!("OTP cleanup service is disabled");
            return None;
        }
        if self.config.interval_seconds == 0 {
            warn!("OTP cleanup interval is zero, background sweep not started");
            return None;
        }

        let interval = std::time::Duration::from_secs(self.config.interval_seconds);

        Some(tokio::spawn(async move {
            info!(
                "OTP cleanup service started - will run every {} seconds",
                self.config.interval_seconds
            );

            let mut interval_timer = tokio::time::interval(interval);

            loop {
                interval_timer.tick().await;
                let result = self.run_cleanup();
                debug!(total = result.total_cleaned(), "OTP cleanup tick");
            }
        }))
    }
}
