//! Prelude module for common imports
//!
//! ```rust
//! use iam_apiserver::prelude::*;
//! ```

pub use crate::code::Code;
pub use crate::config::{LogFormat, ServerConfig};
pub use crate::middleware::RequestId;
pub use crate::response::{ApiError, ApiResult};
pub use crate::server::{router, serve, AppState};

pub use store::{DataStore, Factory, Secret, SecretList, SecretStore};
