// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Prometheus metrics for the `ConfigMap` DNS provider.
//!
//! All metrics use the namespace prefix `configmap_dns_` and are served from the
//! webhook's `/metrics` route.
//!
//! # Metrics Categories
//!
//! - **Webhook Metrics** - Requests by route and response status
//! - **Record Metrics** - Change-set operations applied and records under management
//! - **Render Metrics** - Records skipped or degraded while rendering
//! - **Store Metrics** - `ConfigMap` operations and their outcomes

use crate::constants::METRICS_NAMESPACE;
use prometheus::{CounterVec, Encoder, Gauge, Opts, Registry, TextEncoder};
use std::sync::LazyLock;

/// Global Prometheus metrics registry
pub static METRICS_REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

// ============================================================================
// Webhook Metrics
// ============================================================================

/// Total webhook requests
///
/// Labels:
/// - `route`: Handler name (`records`, `apply_changes`, `adjust_endpoints`, ...)
/// - `status`: HTTP status code
pub static WEBHOOK_REQUESTS_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_webhook_requests_total"),
        "Total number of webhook requests by route and status",
    );
    register(CounterVec::new(opts, &["route", "status"]))
});

// ============================================================================
// Record Metrics
// ============================================================================

/// Total record changes applied
///
/// Labels:
/// - `operation`: `create`, `update`, `delete`
pub static RECORD_CHANGES_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_record_changes_total"),
        "Total number of record changes applied by operation",
    );
    register(CounterVec::new(opts, &["operation"]))
});

/// Number of records in the canonical list after the last save
pub static MANAGED_RECORDS: LazyLock<Gauge> = LazyLock::new(|| {
    register(Gauge::new(
        format!("{METRICS_NAMESPACE}_managed_records"),
        "Number of records in the canonical record list",
    ))
});

// ============================================================================
// Render Metrics
// ============================================================================

/// Records left out of the rendered configuration
///
/// Labels:
/// - `reason`: `unsupported_type`, `missing_target`, `malformed_name`
pub static RENDER_SKIPPED_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_render_skipped_records_total"),
        "Total number of records skipped while rendering by reason",
    );
    register(CounterVec::new(opts, &["reason"]))
});

/// Standard records whose configured TTL was replaced by the default
pub static RENDER_TTL_OVERRIDES_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_render_ttl_overrides_total"),
        "Total number of configured TTLs ignored while rendering",
    );
    register(CounterVec::new(opts, &["record_type"]))
});

// ============================================================================
// Store Metrics
// ============================================================================

/// Blob store operations
///
/// Labels:
/// - `operation`: `get`, `create`, `update`
/// - `outcome`: `success`, `absent`, `error`
pub static STORE_OPERATIONS_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_store_operations_total"),
        "Total number of ConfigMap operations by operation and outcome",
    );
    register(CounterVec::new(opts, &["operation", "outcome"]))
});

fn register<M>(metric: prometheus::Result<M>) -> M
where
    M: prometheus::core::Collector + Clone + 'static,
{
    let metric = metric.expect("metric options are static and valid");
    METRICS_REGISTRY
        .register(Box::new(metric.clone()))
        .expect("metric is registered exactly once");
    metric
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Record a handled webhook request
pub fn record_webhook_request(route: &str, status: u16) {
    let status = status.to_string();
    WEBHOOK_REQUESTS_TOTAL
        .with_label_values(&[route, status.as_str()])
        .inc();
}

/// Record a batch of applied changes
///
/// # Arguments
/// * `operation` - `create`, `update` or `delete`
/// * `count` - Number of records in that part of the change-set
#[allow(clippy::cast_precision_loss)]
pub fn record_changes(operation: &str, count: usize) {
    if count > 0 {
        RECORD_CHANGES_TOTAL
            .with_label_values(&[operation])
            .inc_by(count as f64);
    }
}

/// Record the size of the canonical list after a save
#[allow(clippy::cast_precision_loss)]
pub fn record_managed_records(count: usize) {
    MANAGED_RECORDS.set(count as f64);
}

/// Record a record skipped during rendering
pub fn record_render_skip(reason: &str) {
    RENDER_SKIPPED_TOTAL.with_label_values(&[reason]).inc();
}

/// Record a configured TTL replaced by the default during rendering
pub fn record_ttl_override(record_type: &str) {
    RENDER_TTL_OVERRIDES_TOTAL
        .with_label_values(&[record_type])
        .inc();
}

/// Record a blob store operation outcome
pub fn record_store_operation(operation: &str, outcome: &str) {
    STORE_OPERATIONS_TOTAL
        .with_label_values(&[operation, outcome])
        .inc();
}

/// Gather and encode all metrics in Prometheus text format
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
