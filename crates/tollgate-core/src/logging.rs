//! Subscriber setup for embedders that do not install their own.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;

/// ## Summary
/// Installs a global `tracing` subscriber filtered by `config.level`.
///
/// An unparsable level falls back to `info` with a warning.
///
/// ## Errors
/// Returns an error if a global subscriber is already installed.
pub fn init(config: &LoggingConfig) -> anyhow::Result<()> {
    let (filter, invalid) = match EnvFilter::try_new(config.level.as_str()) {
        Ok(filter) => (filter, false),
        Err(_) => (EnvFilter::new("info"), true),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_line_number(true))
        .try_init()?;

    if invalid {
        tracing::warn!(level = %config.level, "Invalid log level in config, using info");
    }

    Ok(())
}
