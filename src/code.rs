//! # Error Codes
//!
//! Stable error classifications surfaced to API clients.
//!
//! Each code carries a numeric identifier, the HTTP status it maps to and a
//! fixed human-readable message. Common codes live in the 1000xx range,
//! database codes in 1001xx and secret codes in 1101xx.

use axum::http::StatusCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Code {
    Success,
    Unknown,
    Bind,
    Validation,
    PageNotFound,
    Database,
    ReachMaxCount,
    SecretNotFound,
}

impl Code {
    /// Numeric code returned in error bodies
    #[must_use]
    pub fn as_u32(self) -> u32 {
        match self {
            Code::Success => 100_001,
            Code::Unknown => 100_002,
            Code::Bind => 100_003,
            Code::Validation => 100_004,
            Code::PageNotFound => 100_005,
            Code::Database => 100_101,
            Code::ReachMaxCount => 110_101,
            Code::SecretNotFound => 110_102,
        }
    }

    #[must_use]
    pub fn http_status(self) -> StatusCode {
        match self {
            Code::Success => StatusCode::OK,
            Code::Bind | Code::Validation | Code::ReachMaxCount => StatusCode::BAD_REQUEST,
            Code::PageNotFound | Code::SecretNotFound => StatusCode::NOT_FOUND,
            Code::Unknown | Code::Database => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Code::Success => "OK",
            Code::Unknown => "Internal server error",
            Code::Bind => "Error occurred while binding the request body to the struct",
            Code::Validation => "Validation failed",
            Code::PageNotFound => "Page not found",
            Code::Database => "Database error",
            Code::ReachMaxCount => "Secret reach the max count",
            Code::SecretNotFound => "Secret not found",
        }
    }

    /// Short label used for metrics
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Code::Success => "success",
            Code::Unknown => "unknown",
            Code::Bind => "bind",
            Code::Validation => "validation",
            Code::PageNotFound => "page_not_found",
            Code::Database => "database",
            Code::ReachMaxCount => "reach_max_count",
            Code::SecretNotFound => "secret_not_found",
        }
    }
}
