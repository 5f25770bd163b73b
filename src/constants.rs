//! # Constants
//!
//! Shared constants used throughout the API server.
//!
//! Defaults can be overridden via configuration or environment variables
//! where applicable. The secret quota is fixed.

/// Maximum number of live secrets a single user may own
pub const MAX_SECRET_COUNT: u64 = 10;

/// Request header carrying the authenticated caller's identity
/// Set by the upstream authentication layer and trusted over any body field
pub const USERNAME_HEADER: &str = "username";

/// Request/response header carrying the request identifier
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Default bind address for the HTTP server
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";

/// Default HTTP server port
pub const DEFAULT_PORT: u16 = 8080;

/// Default database URL when none is configured
/// Data is lost on restart
pub const DEFAULT_DATABASE_URL: &str = "sqlite::memory:";

/// Default connection pool size
pub const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 10;

/// Default time allowed for in-flight requests to finish on shutdown (seconds)
pub const DEFAULT_SHUTDOWN_TIMEOUT_SECS: u64 = 10;

/// Maximum length of a secret name
pub const MAX_NAME_LENGTH: usize = 63;

/// Maximum length of a secret description
pub const MAX_DESCRIPTION_LENGTH: usize = 255;
