//! # Secret API
//!
//! Handlers for `/v1/secrets`. Every handler scopes its store calls to the
//! caller named by the `username` header.

mod create;
mod delete;
mod get;
mod list;
mod update;

pub use create::create;
pub use delete::{delete, delete_collection};
pub use get::get;
pub use list::list;
pub use update::update;

use crate::code::Code;
use crate::response::ApiError;
use axum::extract::rejection::{JsonRejection, QueryRejection};

fn bind_error(rejection: &JsonRejection) -> ApiError {
    ApiError::with_code(Code::Bind, rejection.body_text())
}

fn query_error(rejection: &QueryRejection) -> ApiError {
    ApiError::with_code(Code::Bind, rejection.body_text())
}
