//! Tracing subscriber setup.
//!
//! Log filtering follows `RUST_LOG` syntax (e.g. `info,urlshort=debug`).
//! `LOG_FORMAT=json` switches to one JSON object per line for log shippers.

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Installs the global tracing subscriber.
///
/// # Errors
///
/// Returns an error if the filter directive is invalid or a global
/// subscriber is already installed.
pub fn init_tracing(config: &Config) -> Result<()> {
    let filter = EnvFilter::try_new(&config.log_level)
        .with_context(|| format!("Invalid log filter '{}'", config.log_level))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let installed = if config.log_format == "json" {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {e}"))
}
