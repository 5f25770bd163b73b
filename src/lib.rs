//! IAM API Server Library
//!
//! HTTP surface for the secret resource:
//! - Router, handlers and middleware
//! - Error codes and the error response body
//! - Field validation
//! - Configuration, logging and metrics
//!
//! Persistence lives in the `store` crate.
//!
//! ## Quick Start
//!
//! ```rust
//! use iam_apiserver::prelude::*;
//! ```

pub mod api;
pub mod code;
pub mod config;
pub mod constants;
pub mod middleware;
pub mod observability;
pub mod prelude;
pub mod response;
pub mod server;
pub mod validation;
