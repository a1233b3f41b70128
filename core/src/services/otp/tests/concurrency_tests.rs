//! Races between callers sharing one manager

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Barrier;

use super::manual_manager;
use crate::errors::OtpError;

const THREADS: usize = 16;

#[test]
fn test_concurrent_requests_issue_one_code() {
    let (manager, _clock) = manual_manager();
    let issued = AtomicUsize::new(0);
    let throttled = AtomicUsize::new(0);
    let barrier = Barrier::new(THREADS);

    std::thread::scope(|scope| {
        for _ in 0..THREADS {
            scope.spawn(|| {
                barrier.wait();
                match manager.request_otp("otp:email:a@x.com") {
                    Ok(_) => issued.fetch_add(1, Ordering::SeqCst),
                    Err(err) => {
                        assert!(matches!(err.as_otp(), Some(OtpError::CooldownActive { .. })));
                        throttled.fetch_add(1, Ordering::SeqCst)
                    }
                };
            });
        }
    });

    assert_eq!(issued.load(Ordering::SeqCst), 1);
    assert_eq!(throttled.load(Ordering::SeqCst), THREADS - 1);
}

#[test]
fn test_concurrent_verification_succeeds_once() {
    let (manager, _clock) = manual_manager();
    let code = manager.request_otp("otp:email:a@x.com").unwrap().code;
    let successes = AtomicUsize::new(0);
    let barrier = Barrier::new(THREADS);

    std::thread::scope(|scope| {
        for _ in 0..THREADS {
            scope.spawn(|| {
                barrier.wait();
                if manager.verify_otp("otp:email:a@x.com", &code).is_ok() {
                    successes.fetch_add(1, Ordering::SeqCst);
                }
            });
        }
    });

    assert_eq!(successes.load(Ordering::SeqCst), 1);
    assert_eq!(manager.stats().reset_tokens, 1);
}

#[test]
fn test_concurrent_wrong_guesses_never_exceed_limit() {
    let (manager, _clock) = manual_manager();
    let code = manager.request_otp("otp:email:a@x.com").unwrap().code;
    let wrong = if code == "000000" { "000001" } else { "000000" };
    let barrier = Barrier::new(THREADS);

    std::thread::scope(|scope| {
        for _ in 0..THREADS {
            scope.spawn(|| {
                barrier.wait();
                let _ = manager.verify_otp("otp:email:a@x.com", wrong);
            });
        }
    });

    // Sixteen wrong guesses against a limit of five discard the code
    assert_eq!(manager.remaining_attempts("otp:email:a@x.com"), None);
    assert!(manager.verify_otp("otp:email:a@x.com", &code).is_err());
}

#[test]
fn test_concurrent_redemption_succeeds_once() {
    let (manager, _clock) = manual_manager();
    let code = manager.request_otp("otp:email:a@x.com").unwrap().code;
    let token = manager.verify_otp("otp:email:a@x.com", &code).unwrap().token;
    let successes = AtomicUsize::new(0);
    let barrier = Barrier::new(THREADS);

    std::thread::scope(|scope| {
        for _ in 0..THREADS {
            scope.spawn(|| {
                barrier.wait();
                if manager.try_redeem_reset_token(&token, "otp:email:a@x.com") {
                    successes.fetch_add(1, Ordering::SeqCst);
                }
            });
        }
    });

    assert_eq!(successes.load(Ordering::SeqCst), 1);
}

#[test]
fn test_cleanup_races_with_requests() {
    let (manager, _clock) = manual_manager();
    let barrier = Barrier::new(THREADS);

    std::thread::scope(|scope| {
        for i in 0..THREADS {
            let manager = &manager;
            let barrier = &barrier;
            scope.spawn(move || {
                barrier.wait();
                if i % 2 == 0 {
                    manager.cleanup_expired();
                } else {
                    manager.request_otp(&format!("otp:email:user{}@x.com", i)).unwrap();
                }
            });
        }
    });

    // Nothing had expired, so every issued code survives the sweeps
    assert_eq!(manager.stats().otp_records, THREADS / 2);
}
