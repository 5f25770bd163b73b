//! # Response Writer
//!
//! Turns handler outcomes into HTTP responses.
//!
//! Successful handlers return their data directly (usually `Json<T>`).
//! Failures return [`ApiError`], which renders as
//! `{"code": <numeric>, "message": <stable text>, "details": <specifics>}`
//! with the status its [`Code`] maps to.

use crate::code::Code;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use store::StoreError;
use thiserror::Error;
use tracing::{error, warn};

/// Result alias for handlers
pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Error)]
#[error("{}: {}", .code.message(), .details)]
pub struct ApiError {
    pub code: Code,
    pub details: String,
}

impl ApiError {
    pub fn with_code(code: Code, details: impl Into<String>) -> Self {
        Self {
            code,
            details: details.into(),
        }
    }

    /// Map a store failure for an operation on a single named secret
    ///
    /// A missing row becomes `SecretNotFound`. Everything else is a
    /// database error.
    #[must_use]
    pub fn from_lookup(err: &StoreError) -> Self {
        if err.is_not_found() {
            Self::with_code(Code::SecretNotFound, err.to_string())
        } else {
            Self::database(err)
        }
    }

    #[must_use]
    pub fn database(err: &StoreError) -> Self {
        Self::with_code(Code::Database, err.to_string())
    }
}

/// Error body sent to clients
#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    code: u32,
    message: &'a str,
    details: &'a str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.code.http_status();
        if status.is_server_error() {
            error!(code = self.code.as_u32(), details = %self.details, "Request failed");
        } else {
            warn!(code = self.code.as_u32(), details = %self.details, "Request rejected");
        }

        let body = ErrorBody {
            code: self.code.as_u32(),
            message: self.code.message(),
            details: &self.details,
        };
        (status, Json(body)).into_response()
    }
}

/// Fallback for unknown routes
pub async fn page_not_found() -> ApiError {
    ApiError::with_code(Code::PageNotFound, "no route matches the request")
}

/// Empty success body, rendered as `null`
pub fn no_content() -> (StatusCode, Json<Option<()>>) {
    (StatusCode::OK, Json(None))
}
