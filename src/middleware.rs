//! # Middleware
//!
//! Request-scoped middleware shared by every route:
//! - Request id assignment and propagation
//! - Access logging

use crate::constants::REQUEST_ID_HEADER;
use axum::{
    extract::Request,
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

/// Identifier of the request being served, stored as a request extension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

impl RequestId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Request id middleware
///
/// Reuses the caller's `X-Request-Id` when present, otherwise generates one.
/// The id is attached to the request, to every log event emitted while the
/// request is served, and to the response.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map_or_else(|| Uuid::new_v4().to_string(), ToString::to_string);

    request
        .extensions_mut()
        .insert(RequestId(request_id.clone()));

    let span = info_span!("request", request_id = %request_id);
    let mut response = next.run(request).instrument(span).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

/// Request logging middleware
/// Logs every request with method, path, client address, response status and duration
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = std::time::Instant::now();

    info!(
        "→ {} {} [client: {}]",
        method,
        path,
        request
            .headers()
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
    );

    let response = next.run(request).await;
    let duration = start.elapsed();

    info!(
        "← {} {} [{}] [{:.3}s]",
        method,
        path,
        response.status().as_u16(),
        duration.as_secs_f64()
    );

    response
}
