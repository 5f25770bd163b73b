//! # HTTP Server
//!
//! Router and listener for the IAM API server.
//!
//! Provides endpoints:
//! - `/v1/secrets` and `/v1/secrets/{name}` - Secret resource
//! - `/metrics` - Prometheus metrics in text format
//! - `/healthz` - Liveness probe (always returns 200)
//! - `/version` - Build metadata
//!
//! Unknown routes answer with a `PageNotFound` error body.

use crate::api::secret;
use crate::config::ServerConfig;
use crate::middleware::{logging_middleware, request_id_middleware};
use crate::observability::metrics;
use crate::response::page_not_found;
use anyhow::Context;
use axum::{
    http::StatusCode,
    middleware,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use std::fmt;
use std::future::IntoFuture;
use std::sync::Arc;
use store::Factory;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

/// State shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub factory: Arc<dyn Factory>,
}

impl AppState {
    pub fn new(factory: Arc<dyn Factory>) -> Self {
        Self { factory }
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/v1/secrets",
            post(secret::create)
                .get(secret::list)
                .delete(secret::delete_collection),
        )
        .route(
            "/v1/secrets/{name}",
            get(secret::get).put(secret::update).delete(secret::delete),
        )
        .route("/metrics", get(metrics_handler))
        .route("/healthz", get(healthz_handler))
        .route("/version", get(version_handler))
        .fallback(page_not_found)
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(logging_middleware)),
        )
        .with_state(state)
}

/// Serve until SIGINT/SIGTERM, then drain in-flight requests
///
/// Requests still running once the shutdown timeout has elapsed are dropped.
pub async fn serve(config: &ServerConfig, state: AppState) -> anyhow::Result<()> {
    let addr = config.listen_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("HTTP server listening on {}", addr);

    let signalled = Arc::new(Notify::new());
    let trigger = Arc::clone(&signalled);
    let server = axum::serve(listener, router(state))
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            trigger.notify_waiters();
        })
        .into_future();

    let timeout = config.shutdown_timeout();
    let drained = signalled.notified();
    tokio::select! {
        result = server => result.context("HTTP server failed")?,
        () = async {
            drained.await;
            tokio::time::sleep(timeout).await;
        } => {
            warn!(
                timeout_secs = timeout.as_secs(),
                "Shutdown timeout elapsed, dropping in-flight requests"
            );
        }
    }

    info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, shutting down"),
        () = terminate => info!("Received SIGTERM, shutting down"),
    }
}

async fn metrics_handler() -> impl IntoResponse {
    match metrics::encode() {
        Ok(buffer) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            buffer,
        ),
        Err(e) => {
            error!("Failed to encode metrics: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [("content-type", "text/plain")],
                format!("Failed to encode metrics: {e}").into_bytes(),
            )
        }
    }
}

async fn healthz_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "iam-apiserver"
    }))
}

async fn version_handler() -> Json<Value> {
    Json(json!({
        "version": env!("CARGO_PKG_VERSION"),
        "gitCommit": env!("BUILD_GIT_HASH"),
        "buildDate": env!("BUILD_DATETIME"),
        "buildTimestamp": env!("BUILD_TIMESTAMP"),
    }))
}
