//! Metrics collection for the NPHIES gateway
//!
//! Prometheus metrics for HTTP traffic, bundle processing and downstream
//! handler calls, exposed at `/metrics`.

use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter, register_int_counter_vec,
    register_int_gauge_vec, HistogramVec, IntCounter, IntCounterVec, IntGaugeVec,
};

lazy_static! {
    // HTTP Request Metrics

    /// Total HTTP requests by method, path, and status
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "nphies_http_requests_total",
        "Total number of HTTP requests",
        &["method", "path", "status"]
    )
    .expect("Failed to register HTTP_REQUESTS_TOTAL");

    /// HTTP request duration in seconds
    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "nphies_http_request_duration_seconds",
        "HTTP request duration in seconds",
        &["method", "path"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]
    )
    .expect("Failed to register HTTP_REQUEST_DURATION_SECONDS");

    /// In-flight HTTP requests
    pub static ref HTTP_REQUESTS_IN_FLIGHT: IntGaugeVec = register_int_gauge_vec!(
        "nphies_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
        &["method", "path"]
    )
    .expect("Failed to register HTTP_REQUESTS_IN_FLIGHT");

    /// HTTP request body size in bytes
    pub static ref HTTP_REQUEST_SIZE_BYTES: HistogramVec = register_histogram_vec!(
        "nphies_http_request_size_bytes",
        "HTTP request body size in bytes",
        &["method", "path"],
        vec![100.0, 1_000.0, 10_000.0, 100_000.0, 1_000_000.0, 10_000_000.0]
    )
    .expect("Failed to register HTTP_REQUEST_SIZE_BYTES");

    // Bundle Metrics

    /// Processed bundles by message type and overall dispatch status
    pub static ref BUNDLES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "nphies_bundles_total",
        "Total number of processed bundles",
        &["message_type", "overall_status"]
    )
    .expect("Failed to register BUNDLES_TOTAL");

    /// Bundle entries skipped during extraction
    pub static ref EXTRACTION_WARNINGS_TOTAL: IntCounter = register_int_counter!(
        "nphies_extraction_warnings_total",
        "Total number of bundle entries skipped during extraction"
    )
    .expect("Failed to register EXTRACTION_WARNINGS_TOTAL");

    // Handler Metrics

    /// Outbound handler calls by handler and result
    pub static ref HANDLER_CALLS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "nphies_handler_calls_total",
        "Total number of downstream handler calls",
        &["handler", "status"]
    )
    .expect("Failed to register HANDLER_CALLS_TOTAL");

    /// Outbound handler call duration
    pub static ref HANDLER_CALL_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "nphies_handler_call_duration_seconds",
        "Downstream handler call duration in seconds",
        &["handler"],
        vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]
    )
    .expect("Failed to register HANDLER_CALL_DURATION_SECONDS");
}

pub fn record_handler_call(handler: &str, status: &str, duration_seconds: f64) {
    HANDLER_CALLS_TOTAL
        .with_label_values(&[handler, status])
        .inc();
    HANDLER_CALL_DURATION_SECONDS
        .with_label_values(&[handler])
        .observe(duration_seconds);
}

pub fn record_bundle(message_type: &str, overall_status: &str) {
    BUNDLES_TOTAL
        .with_label_values(&[message_type, overall_status])
        .inc();
}

pub fn record_extraction_warnings(count: usize) {
    if count > 0 {
        EXTRACTION_WARNINGS_TOTAL.inc_by(count as u64);
    }
}

/// Helper to sanitize path for metrics labels (collapse message types, limit cardinality)
pub fn sanitize_path(path: &str) -> String {
    // Compatibility prefix
    let path = path.strip_prefix("/nphies").unwrap_or(path);
    let path = if path.is_empty() { "/" } else { path };

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    match segments.as_slice() {
        [] => "/".to_string(),
        ["transform", _] => "/transform/{message_type}".to_string(),
        [single] => match *single {
            "extract" | "process" | "supported-profiles" | "health" | "metrics"
            | "favicon.ico" => format!("/{single}"),
            _ => "/{unmatched}".to_string(),
        },
        _ => "/{unmatched}".to_string(),
    }
}
