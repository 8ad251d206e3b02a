// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Prometheus metrics for the Fornex webhook solver.
//!
//! All metrics use the namespace prefix `fornex_webhook`.
//!
//! # Metrics Categories
//!
//! - **Challenge Metrics** - Present/CleanUp calls, their outcome and duration
//! - **Record Metrics** - Challenge records created and deleted at Fornex
//! - **API Metrics** - Requests issued to the Fornex API by method and status class
//!
//! # Example
//!
//! ```rust,no_run
//! use fornex_webhook::metrics::record_challenge_success;
//!
//! record_challenge_success("Present", std::time::Duration::from_millis(350));
//! ```

use prometheus::{CounterVec, Encoder, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder};
use std::sync::LazyLock;
use std::time::Duration;

// ============================================================================
// Metric Name Constants
// ============================================================================

/// Namespace prefix for all metrics (prometheus-safe)
const METRICS_NAMESPACE: &str = "fornex_webhook";

// ============================================================================
// Global Metrics Registry
// ============================================================================

/// Global Prometheus metrics registry
///
/// All metrics are registered in this registry and exposed via `/metrics` endpoint.
pub static METRICS_REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

// ============================================================================
// Challenge Metrics
// ============================================================================

/// Total number of challenge operations by action and outcome
///
/// Labels:
/// - `action`: `Present` or `CleanUp`
/// - `outcome`: `success` or the failing stage (`initialization`, `retrieve`, `create`, `delete`)
pub static CHALLENGES_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_challenges_total"),
        "Total number of challenge operations by action and outcome",
    );
    let counter = CounterVec::new(opts, &["action", "outcome"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

/// Duration of challenge operations in seconds
///
/// Labels:
/// - `action`: `Present` or `CleanUp`
pub static CHALLENGE_DURATION_SECONDS: LazyLock<HistogramVec> = LazyLock::new(|| {
    let opts = HistogramOpts::new(
        format!("{METRICS_NAMESPACE}_challenge_duration_seconds"),
        "Duration of challenge operations in seconds by action",
    )
    .buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]);
    let histogram = HistogramVec::new(opts, &["action"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(histogram.clone()))
        .unwrap();
    histogram
});

// ============================================================================
// Record Metrics
// ============================================================================

/// Total number of challenge record mutations
///
/// Labels:
/// - `operation`: `created`, `deleted` or `already_present`
pub static RECORD_OPERATIONS_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_record_operations_total"),
        "Total number of challenge record operations by kind",
    );
    let counter = CounterVec::new(opts, &["operation"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

// ============================================================================
// API Metrics
// ============================================================================

/// Total number of Fornex API requests
///
/// Labels:
/// - `method`: HTTP method
/// - `status_class`: `2xx`, `3xx`, `4xx`, `5xx` or `error` when no response arrived
pub static API_REQUESTS_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_api_requests_total"),
        "Total number of Fornex API requests by method and status class",
    );
    let counter = CounterVec::new(opts, &["method", "status_class"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

// ============================================================================
// Helper Functions
// ============================================================================

/// Record a successful challenge operation
///
/// # Arguments
/// * `action` - `Present` or `CleanUp`
/// * `duration` - Time taken by the operation
pub fn record_challenge_success(action: &str, duration: Duration) {
    CHALLENGES_TOTAL
        .with_label_values(&[action, "success"])
        .inc();
    CHALLENGE_DURATION_SECONDS
        .with_label_values(&[action])
        .observe(duration.as_secs_f64());
}

/// Record a failed challenge operation
///
/// # Arguments
/// * `action` - `Present` or `CleanUp`
/// * `stage` - Stage the operation failed in
/// * `duration` - Time taken by the operation
pub fn record_challenge_error(action: &str, stage: &str, duration: Duration) {
    CHALLENGES_TOTAL.with_label_values(&[action, stage]).inc();
    CHALLENGE_DURATION_SECONDS
        .with_label_values(&[action])
        .observe(duration.as_secs_f64());
}

/// Record a challenge record operation (`created`, `deleted`, `already_present`)
pub fn record_record_operation(operation: &str) {
    RECORD_OPERATIONS_TOTAL
        .with_label_values(&[operation])
        .inc();
}

/// Record a Fornex API request
///
/// # Arguments
/// * `method` - HTTP method
/// * `status` - HTTP status code, or `None` if no response was received
pub fn record_api_request(method: &str, status: Option<u16>) {
    let status_class = match status {
        Some(200..=299) => "2xx",
        Some(300..=399) => "3xx",
        Some(400..=499) => "4xx",
        Some(500..=599) => "5xx",
        _ => "error",
    };
    API_REQUESTS_TOTAL
        .with_label_values(&[method, status_class])
        .inc();
}

/// Gather and encode all metrics in Prometheus text format
///
/// # Returns
/// Prometheus-formatted metrics as a String
///
/// # Errors
/// Returns error if encoding fails
pub fn gather_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = METRICS_REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(format!("UTF-8 error: {e}")))
}
