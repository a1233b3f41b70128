//! Tests for cleanup_expired and the background cleanup service

use chrono::Duration;
use std::sync::Arc;

use super::manual_manager;
use crate::services::otp::{CleanupResult, OtpCleanupConfig, OtpCleanupService, StoreStats};

#[test]
fn test_cleanup_on_empty_store() {
    let (manager, _clock) = manual_manager();
    assert_eq!(manager.cleanup_expired(), CleanupResult::default());
}

#[test]
fn test_cleanup_keeps_live_records() {
    let (manager, _clock) = manual_manager();
    let issued = manager.request_otp("otp:email:a@x.com").unwrap();
    manager.request_otp("otp:email:b@x.com").unwrap();
    manager.verify_otp("otp:email:a@x.com", &issued.code).unwrap();

    assert_eq!(manager.cleanup_expired().total_cleaned(), 0);
    assert_eq!(
        manager.stats(),
        StoreStats {
            otp_records: 1,
            cooldowns: 2,
            reset_tokens: 1,
        }
    );
}

#[test]
fn test_cleanup_counts_each_kind() {
    let (manager, clock) = manual_manager();
    let issued = manager.request_otp("otp:email:a@x.com").unwrap();
    manager.request_otp("otp:email:b@x.com").unwrap();
    manager.request_otp("otp:email:c@x.com").unwrap();
    manager.verify_otp("otp:email:a@x.com", &issued.code).unwrap();

    // Codes and cooldowns are gone after a minute, the token is not
    clock.advance(Duration::seconds(61));
    let result = manager.cleanup_expired();
    assert_eq!(
        result,
        CleanupResult {
            expired_otps: 2,
            expired_cooldowns: 3,
            expired_reset_tokens: 0,
        }
    );

    clock.advance(Duration::minutes(10));
    let result = manager.cleanup_expired();
    assert_eq!(result.expired_reset_tokens, 1);
    assert_eq!(result.total_cleaned(), 1);
    assert_eq!(manager.stats(), StoreStats::default());
}

#[test]
fn test_cleanup_spares_reissued_code() {
    let (manager, clock) = manual_manager();
    manager.request_otp("otp:email:a@x.com").unwrap();

    clock.advance(Duration::seconds(61));
    let fresh = manager.request_otp("otp:email:a@x.com").unwrap();

    let result = manager.cleanup_expired();
    assert_eq!(result.total_cleaned(), 0);
    assert!(manager.verify_otp("otp:email:a@x.com", &fresh.code).is_ok());
}

#[test]
fn test_run_cleanup_delegates_to_manager() {
    let (manager, clock) = manual_manager();
    manager.request_otp("otp:email:a@x.com").unwrap();
    clock.advance(Duration::minutes(5));

    let service = OtpCleanupService::new(Arc::new(manager), OtpCleanupConfig::default());
    let result = service.run_cleanup();
    assert_eq!(result.expired_otps, 1);
    assert_eq!(result.expired_cooldowns, 1);
    assert_eq!(service.manager().stats(), StoreStats::default());
}

#[tokio::test]
async fn test_disabled_service_does_not_start() {
    let (manager, _clock) = manual_manager();
    let manager = Arc::new(manager);

    let disabled = Arc::new(OtpCleanupService::new(
        manager.clone(),
        OtpCleanupConfig {
            interval_seconds: 30,
            enabled: false,
        },
    ));
    assert!(disabled.start_background_task().is_none());

    let zero_interval = Arc::new(OtpCleanupService::new(
        manager,
        OtpCleanupConfig {
            interval_seconds: 0,
            enabled: true,
        },
    ));
    assert!(zero_interval.start_background_task().is_none());
}

#[tokio::test(start_paused = true)]
async fn test_background_task_sweeps_periodically() {
    let (manager, clock) = manual_manager();
    let manager = Arc::new(manager);
    manager.request_otp("otp:email:a@x.com").unwrap();
    clock.advance(Duration::seconds(61));

    let service = Arc::new(OtpCleanupService::new(
        manager.clone(),
        OtpCleanupConfig {
            interval_seconds: 30,
            enabled: true,
        },
    ));
    let handle = service.start_background_task().unwrap();

    // First tick fires immediately
    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    assert_eq!(manager.stats(), StoreStats::default());

    manager.request_otp("otp:email:a@x.com").unwrap();
    clock.advance(Duration::seconds(61));
    assert_eq!(manager.stats().otp_records, 1);

    tokio::time::sleep(std::time::Duration::from_secs(31)).await;
    assert_eq!(manager.stats(), StoreStats::default());

    handle.abort();
    assert!(handle.await.unwrap_err().is_cancelled());
}
