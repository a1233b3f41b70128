//! Tracing subscriber bootstrap
//!
//! Installs a global `tracing-subscriber` fmt subscriber built from
//! [`LoggingConfig`]. `RUST_LOG`, when set, overrides the configured level.

use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, LoggingConfig};

/// Initialize the global tracing subscriber
///
/// Returns `false` when a global subscriber was already installed, which is
/// harmless and common in tests.
pub fn init_tracing(config: &LoggingConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_str()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(config.colored)
        .with_file(config.source_location)
        .with_line_number(config.source_location);

    let result = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
    };

    match result {
        Ok(()) => {
            tracing::debug!(level = %config.level, format = ?config.format, "Tracing initialized");
            true
        }
        Err(_) => false,
    }
}
