//! # Server Configuration
//!
//! Server-level settings loaded from environment variables.

use crate::constants::{
    DEFAULT_BIND_ADDRESS, DEFAULT_DATABASE_MAX_CONNECTIONS, DEFAULT_DATABASE_URL, DEFAULT_PORT,
    DEFAULT_SHUTDOWN_TIMEOUT_SECS,
};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "console" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format: {other}")),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Text => f.write_str("text"),
            LogFormat::Json => f.write_str("json"),
        }
    }
}

/// Server-level configuration
///
/// All settings have defaults and can be overridden via environment variables.
/// Command-line flags take precedence over both.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to
    pub bind_address: String,
    pub port: u16,
    /// Database connection URL (`postgres://…` or `sqlite:…`)
    pub database_url: String,
    /// Upper bound on pooled database connections
    pub database_max_connections: u32,
    /// Log filter directive (ERROR, WARN, INFO, DEBUG, TRACE or a full `EnvFilter` string)
    pub log_level: String,
    pub log_format: LogFormat,
    /// Grace period for in-flight requests on shutdown (seconds)
    pub shutdown_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            port: DEFAULT_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            database_max_connections: DEFAULT_DATABASE_MAX_CONNECTIONS,
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            shutdown_timeout_secs: DEFAULT_SHUTDOWN_TIMEOUT_SECS,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);
        Self {
            bind_address: env.str_or("BIND_ADDRESS", DEFAULT_BIND_ADDRESS),
            port: env.parse_or("PORT", DEFAULT_PORT),
            database_url: env.str_or("DATABASE_URL", DEFAULT_DATABASE_URL),
            database_max_connections: env.parse_or(
                "DATABASE_MAX_CONNECTIONS",
                DEFAULT_DATABASE_MAX_CONNECTIONS,
            ),
            log_level: env.str_or("LOG_LEVEL", "info"),
            log_format: env.parse_or("LOG_FORMAT", LogFormat::Text),
            shutdown_timeout_secs: env.parse_or(
                "SHUTDOWN_TIMEOUT_SECS",
                DEFAULT_SHUTDOWN_TIMEOUT_SECS,
            ),
        }
    }

    /// `host:port` for the listener
    #[must_use]
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    #[must_use]
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }

    /// Whether the configured database lives only in memory
    #[must_use]
    pub fn uses_ephemeral_database(&self) -> bool {
        store::is_in_memory(&self.database_url)
    }
}

struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Read a value or return default; unparsable values fall back to the default
    fn parse_or<T: FromStr>(&self, key: &str, default: T) -> T {
        (self.0)(key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }

    /// Read a string or return default; empty values count as unset
    fn str_or(&self, key: &str, default: &str) -> String {
        (self.0)(key)
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| default.to_string())
    }
}
