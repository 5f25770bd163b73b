//! # Configuration
//!
//! Settings for the API server, loaded from environment variables.

pub mod server;

pub use server::{LogFormat, ServerConfig};
