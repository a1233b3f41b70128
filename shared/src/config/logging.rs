//! Log output settings consumed by `init_tracing`

use serde::{Deserialize, Serialize};

use super::Environment;

/// Output shape of the fmt subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    #[default]
    Pretty,
    Compact,
}

/// Subscriber settings; `RUST_LOG` still overrides `level` at runtime
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive, e.g. `info` or `otp_core=debug`
    pub level: String,
    pub format: LogFormat,
    /// ANSI colors; only useful on a terminal
    pub colored: bool,
    /// Attach file and line to every event
    pub source_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::for_environment(Environment::default())
    }
}

impl LoggingConfig {
    /// Human-readable and verbose locally, structured and quieter when deployed
    pub fn for_environment(env: Environment) -> Self {
        let (level, format) = match env {
            Environment::Development => ("debug", LogFormat::Pretty),
            Environment::Staging => ("info", LogFormat::Json),
            Environment::Production => ("warn", LogFormat::Json),
        };
        let local = env == Environment::Development;

        Self {
            level: level.to_string(),
            format,
            colored: local,
            source_location: local,
        }
    }
}
