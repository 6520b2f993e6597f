//! Prometheus metrics for the cowtrends service
//!
//! This module provides metrics tracking for:
//! - API: request counts by endpoint/status, request duration
//! - Trending: query volume, empty result sets, store failures
//!
//! # Usage
//!
//! Call `init_metrics()` at application startup to register all metrics.
//! If initialization fails, metrics operations become no-ops.

use prometheus::{
    register_counter, register_counter_vec, register_histogram_vec, Counter, CounterVec, Encoder,
    HistogramVec, TextEncoder,
};
use std::sync::OnceLock;

// ============================================================================
// Metrics Storage
// ============================================================================

/// Container for all service metrics
struct ServiceMetrics {
    api_requests: CounterVec,
    api_duration: HistogramVec,
    trending_queries: Counter,
    trending_empty_results: Counter,
    store_errors: Counter,
}

/// Global storage for service metrics
static SERVICE_METRICS: OnceLock<ServiceMetrics> = OnceLock::new();

/// Flag to track if initialization was attempted
static METRICS_INIT_ATTEMPTED: OnceLock<bool> = OnceLock::new();

// ============================================================================
// Initialization
// ============================================================================

/// Initialize all Prometheus metrics
///
/// This function should be called once at application startup. If metric
/// registration fails, errors are logged and subsequent metric operations
/// become no-ops.
pub fn init_metrics() -> Result<(), Box<dyn std::error::Error>> {
    // Prevent double initialization
    if METRICS_INIT_ATTEMPTED.get().is_some() {
        return Ok(());
    }
    METRICS_INIT_ATTEMPTED.set(true).ok();

    let metrics = ServiceMetrics {
        api_requests: register_counter_vec!(
            "cowtrends_api_requests_total",
            "Total API requests by endpoint and status",
            &["endpoint", "status"]
        )?,
        api_duration: register_histogram_vec!(
            "cowtrends_api_request_duration_seconds",
            "API request duration in seconds",
            &["endpoint"],
            vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]
        )?,
        trending_queries: register_counter!(
            "cowtrends_trending_queries_total",
            "Total trending computations requested"
        )?,
        trending_empty_results: register_counter!(
            "cowtrends_trending_empty_results_total",
            "Trending computations that returned no tags"
        )?,
        store_errors: register_counter!(
            "cowtrends_store_errors_total",
            "Post store failures (unavailable or timed out)"
        )?,
    };

    SERVICE_METRICS
        .set(metrics)
        .map_err(|_| "Service metrics already initialized")?;

    tracing::info!("Prometheus metrics initialized successfully");
    Ok(())
}

/// Check if metrics have been initialized
pub fn metrics_initialized() -> bool {
    SERVICE_METRICS.get().is_some()
}

// ============================================================================
// Recording Helpers (no-ops when uninitialized)
// ============================================================================

/// Count one API request
pub fn record_api_request(endpoint: &str, status: u16) {
    if let Some(m) = SERVICE_METRICS.get() {
        m.api_requests
            .with_label_values(&[endpoint, &status.to_string()])
            .inc();
    }
}

/// Observe one API request duration
pub fn observe_api_duration(endpoint: &str, seconds: f64) {
    if let Some(m) = SERVICE_METRICS.get() {
        m.api_duration.with_label_values(&[endpoint]).observe(seconds);
    }
}

/// Count one trending computation
pub fn record_trending_query() {
    if let Some(m) = SERVICE_METRICS.get() {
        m.trending_queries.inc();
    }
}

/// Count one empty trending result
pub fn record_empty_result() {
    if let Some(m) = SERVICE_METRICS.get() {
        m.trending_empty_results.inc();
    }
}

/// Count one store failure
pub fn record_store_error() {
    if let Some(m) = SERVICE_METRICS.get() {
        m.store_errors.inc();
    }
}

// ============================================================================
// Exposition
// ============================================================================

/// Render all registered metrics in Prometheus text format
pub fn render() -> String {
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::warn!(error = %e, "Failed to encode metrics");
        return String::new();
    }

    String::from_utf8(buffer).unwrap_or_default()
}

// ============================================================================
// Tests
// ============================================================================
