//! # Logging
//!
//! Installs the global `tracing` subscriber.
//!
//! `RUST_LOG` wins when set; otherwise the configured level applies to the
//! server and store crates while dependencies stay at `warn`.

use crate::config::LogFormat;
use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Build the filter for the configured level
pub fn env_filter(level: &str) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    let directive = if level.contains('=') || level.contains(',') {
        level.to_string()
    } else {
        format!("warn,iam_apiserver={level},store={level},tower_http={level}")
    };
    EnvFilter::try_new(&directive).map_err(|e| anyhow!("invalid log level {level:?}: {e}"))
}

pub fn init_logging(level: &str, format: LogFormat) -> Result<()> {
    let filter = env_filter(level)?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let installed = match format {
        LogFormat::Json => builder.json().with_current_span(true).try_init(),
        LogFormat::Text => builder.try_init(),
    };
    installed.map_err(|e| anyhow!("failed to install tracing subscriber: {e}"))
}
