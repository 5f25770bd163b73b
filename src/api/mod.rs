//! # HTTP API
//!
//! Versioned REST handlers. Each resource lives in its own module.

pub mod secret;

use crate::code::Code;
use crate::constants::USERNAME_HEADER;
use crate::response::{ApiError, ApiResult};
use crate::validation::FieldError;
use axum::http::HeaderMap;

/// Owner of the request, as set by the authentication layer
///
/// A missing or empty header is a validation failure.
pub fn username(headers: &HeaderMap) -> ApiResult<String> {
    headers
        .get(USERNAME_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
        .ok_or_else(|| {
            let err = FieldError::Required {
                path: USERNAME_HEADER.to_string(),
            };
            ApiError::with_code(Code::Validation, err.to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_username_header() {
        let mut headers = HeaderMap::new();
        let err = username(&headers).unwrap_err();
        assert_eq!(err.code, Code::Validation);
        assert_eq!(err.details, "username: Required value");

        headers.insert(USERNAME_HEADER, HeaderValue::from_static("   "));
        assert!(username(&headers).is_err());

        headers.insert(USERNAME_HEADER, HeaderValue::from_static("alice"));
        assert_eq!(username(&headers).unwrap(), "alice");
    }
}
