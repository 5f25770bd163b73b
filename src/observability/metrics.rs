//! # Metrics
//!
//! Prometheus metrics for the secret API.
//!
//! ## Metrics Exposed
//!
//! - `iam_secret_operations_total{operation}` - Secret operations handled
//! - `iam_secret_operation_errors_total{operation,code}` - Failed secret operations by error code
//! - `iam_secret_operation_duration_seconds{operation}` - Duration of secret operations

use crate::response::ApiResult;
use anyhow::Result;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry};
use std::future::Future;
use std::sync::LazyLock;

// Metrics
pub(crate) static REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

static SECRET_OPERATIONS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        Opts::new(
            "iam_secret_operations_total",
            "Total number of secret operations handled",
        ),
        &["operation"],
    )
    .expect("Failed to create SECRET_OPERATIONS_TOTAL metric - this should never happen")
});

static SECRET_OPERATION_ERRORS_TOTAL: LazyLock<IntCounterVec> = LazyLock::new(|| {
    IntCounterVec::new(
        Opts::new(
            "iam_secret_operation_errors_total",
            "Total number of failed secret operations",
        ),
        &["operation", "code"],
    )
    .expect("Failed to create SECRET_OPERATION_ERRORS_TOTAL metric - this should never happen")
});

static SECRET_OPERATION_DURATION: LazyLock<HistogramVec> = LazyLock::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "iam_secret_operation_duration_seconds",
            "Duration of secret operations in seconds",
        )
        .buckets(vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]),
        &["operation"],
    )
    .expect("Failed to create SECRET_OPERATION_DURATION metric - this should never happen")
});

/// Register every metric with the registry served on `/metrics`
///
/// Calling it more than once is harmless.
pub fn register_metrics() -> Result<()> {
    register(Box::new(SECRET_OPERATIONS_TOTAL.clone()))?;
    register(Box::new(SECRET_OPERATION_ERRORS_TOTAL.clone()))?;
    register(Box::new(SECRET_OPERATION_DURATION.clone()))?;
    Ok(())
}

fn register(collector: Box<dyn prometheus::core::Collector>) -> Result<()> {
    match REGISTRY.register(collector) {
        Ok(()) | Err(prometheus::Error::AlreadyReg) => Ok(()),
        Err(e) => Err(e.into()),
    }
}

/// Run one secret operation, recording count, duration and failure code
pub async fn observe<T, F>(operation: &'static str, fut: F) -> ApiResult<T>
where
    F: Future<Output = ApiResult<T>>,
{
    SECRET_OPERATIONS_TOTAL
        .with_label_values(&[operation])
        .inc();
    let timer = SECRET_OPERATION_DURATION
        .with_label_values(&[operation])
        .start_timer();

    let result = fut.await;
    timer.observe_duration();

    if let Err(e) = &result {
        SECRET_OPERATION_ERRORS_TOTAL
            .with_label_values(&[operation, e.code.as_str()])
            .inc();
    }
    result
}

/// Render the registry in the Prometheus text format
pub fn encode() -> Result<Vec<u8>> {
    use prometheus::{Encoder, TextEncoder};

    let mut buffer = Vec::new();
    TextEncoder::new().encode(&REGISTRY.gather(), &mut buffer)?;
    Ok(buffer)
}
