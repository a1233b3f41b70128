//! Walk one user through the password reset flow
//!
//! Run with `RUST_LOG=debug` to see every state transition.

use std::sync::Arc;

use anyhow::Context;
use otp_core::services::{OtpCleanupConfig, OtpCleanupService, OtpManager, OtpManagerConfig};
use otp_shared::validation::{otp_key_for_email, validators};
use otp_shared::{init_tracing, AppConfig, Environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::from_filename(Environment::from_env().env_file()).ok();
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env().context("loading configuration")?;
    init_tracing(&config.logging);

    let manager = Arc::new(OtpManager::new(OtpManagerConfig::try_from(&config.otp)?)?);
    let cleanup = Arc::new(OtpCleanupService::new(
        manager.clone(),
        OtpCleanupConfig::from(&config.otp),
    ));
    let cleanup_task = cleanup.start_background_task();

    let email = "  Alice@Example.com ";
    anyhow::ensure!(validators::is_valid_email(email.trim()), "malformed email");
    let key = otp_key_for_email(email).context("email is blank")?;

    let issued = manager.request_otp(&key)?;
    tracing::info!(key = %key, expires_at = %issued.expires_at, "Code sent (delivery is simulated)");

    if let Err(err) = manager.request_otp(&key) {
        tracing::info!(error = %err, "Second request throttled as expected");
    }

    if let Err(err) = manager.verify_otp(&key, "not-the-code") {
        tracing::info!(
            error = %err,
            remaining = ?manager.remaining_attempts(&key),
            "Wrong code rejected"
        );
    }

    let grant = manager.verify_otp(&key, &issued.code)?;
    tracing::info!(token_expires_at = %grant.expires_at, "Reset token issued");

    manager.redeem_reset_token(&grant.token, &key)?;
    tracing::info!("Password may now be changed");

    let replay = manager.try_redeem_reset_token(&grant.token, &key);
    tracing::info!(replay_accepted = replay, "Token replay attempted");

    tracing::info!(stats = ?manager.stats(), "Store state");

    if let Some(handle) = cleanup_task {
        handle.abort();
    }
    Ok(())
}
