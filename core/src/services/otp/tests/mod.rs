//! Tests for the OTP manager

#[cfg(test)]
mod cleanup_tests;
#[cfg(test)]
mod concurrency_tests;

#[cfg(test)]
use std::sync::Arc;

#[cfg(test)]
use crate::services::otp::{ManualClock, OtpManager, OtpManagerConfig};

/// Manager on a manual clock with default settings
#[cfg(test)]
pub(crate) fn manual_manager() -> (OtpManager<ManualClock>, Arc<ManualClock>) {
    manual_manager_with(OtpManagerConfig::default())
}

#[cfg(test)]
pub(crate) fn manual_manager_with(
    config: OtpManagerConfig,
) -> (OtpManager<ManualClock>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::starting_now());
    let manager = OtpManager::with_clock(config, clock.clone()).unwrap();
    (manager, clock)
}
