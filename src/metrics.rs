// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Prometheus metrics for the deSEC DNS operator.
//!
//! All metrics use the namespace prefix `desec_owly_dedyn_io_` (prometheus-safe
//! version of the API group).
//!
//! # Metrics Categories
//!
//! - **Reconciliation Metrics** - reconcile outcomes, durations and requeues
//! - **Error Metrics** - reconcile errors by category
//! - **Provider Metrics** - deSEC API calls by operation and outcome
//!
//! # Example
//!
//! ```rust,no_run
//! use desec_dns_operator::metrics::record_reconciliation_success;
//!
//! record_reconciliation_success("Ingress", std::time::Duration::from_millis(20));
//! ```

use prometheus::{CounterVec, Encoder, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder};
use std::sync::LazyLock;
use std::time::Duration;

// ============================================================================
// Metric Name Constants
// ============================================================================

/// Namespace prefix for all operator metrics (prometheus-safe)
const METRICS_NAMESPACE: &str = "desec_owly_dedyn_io";

// ============================================================================
// Global Metrics Registry
// ============================================================================

/// Global Prometheus metrics registry
///
/// All metrics are registered in this registry and exposed via `/metrics` endpoint.
pub static METRICS_REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

fn register_counter(name: &str, help: &str, labels: &[&str]) -> CounterVec {
    let opts = Opts::new(format!("{METRICS_NAMESPACE}_{name}"), help);
    let counter = CounterVec::new(opts, labels).expect("metric definition is valid");
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .expect("metric is registered once");
    counter
}

// ============================================================================
// Reconciliation Metrics
// ============================================================================

/// Total number of reconciliations by resource type and status
///
/// Labels:
/// - `resource_type`: Kind of the reconciled object (`Ingress`, `ManagedDomain`)
/// - `status`: Outcome (`success`, `error`)
pub static RECONCILIATION_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    register_counter(
        "reconciliations_total",
        "Total number of reconciliations by resource type and status",
        &["resource_type", "status"],
    )
});

/// Duration of reconciliations in seconds
///
/// Labels:
/// - `resource_type`: Kind of the reconciled object
pub static RECONCILIATION_DURATION_SECONDS: LazyLock<HistogramVec> = LazyLock::new(|| {
    let opts = HistogramOpts::new(
        format!("{METRICS_NAMESPACE}_reconciliation_duration_seconds"),
        "Duration of reconciliations in seconds by resource type",
    )
    .buckets(vec![0.001, 0.01, 0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0]);
    let histogram =
        HistogramVec::new(opts, &["resource_type"]).expect("metric definition is valid");
    METRICS_REGISTRY
        .register(Box::new(histogram.clone()))
        .expect("metric is registered once");
    histogram
});

/// Total number of requeue requests
///
/// Labels:
/// - `resource_type`: Kind of the reconciled object
/// - `reason`: `pending` (short requeue), `refresh` (periodic), `error`
pub static REQUEUE_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    register_counter(
        "requeues_total",
        "Total number of requeue operations by resource type and reason",
        &["resource_type", "reason"],
    )
});

// ============================================================================
// Error Metrics
// ============================================================================

/// Total number of errors by resource type and error category
///
/// Labels:
/// - `resource_type`: Kind of the reconciled object
/// - `error_type`: `config_error`, `api_error`, `conflict`, `provider_error`
pub static ERRORS_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    register_counter(
        "errors_total",
        "Total number of errors by resource type and error category",
        &["resource_type", "error_type"],
    )
});

// ============================================================================
// Provider Metrics
// ============================================================================

/// Total number of deSEC API requests
///
/// Labels:
/// - `operation`: `list_domains`, `create_domain`, `list_rrsets`, `create_rrset`, `update_ip`
/// - `outcome`: `success`, `error`
pub static PROVIDER_REQUESTS_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    register_counter(
        "provider_requests_total",
        "Total number of deSEC API requests by operation and outcome",
        &["operation", "outcome"],
    )
});

// ============================================================================
// Helper Functions
// ============================================================================

/// Record a successful reconciliation
pub fn record_reconciliation_success(resource_type: &str, duration: Duration) {
    RECONCILIATION_TOTAL
        .with_label_values(&[resource_type, "success"])
        .inc();
    RECONCILIATION_DURATION_SECONDS
        .with_label_values(&[resource_type])
        .observe(duration.as_secs_f64());
}

/// Record a failed reconciliation together with its error category
pub fn record_reconciliation_error(resource_type: &str, error_type: &str, duration: Duration) {
    RECONCILIATION_TOTAL
        .with_label_values(&[resource_type, "error"])
        .inc();
    RECONCILIATION_DURATION_SECONDS
        .with_label_values(&[resource_type])
        .observe(duration.as_secs_f64());
    ERRORS_TOTAL
        .with_label_values(&[resource_type, error_type])
        .inc();
}

/// Record a requeue request
pub fn record_requeue(resource_type: &str, reason: &str) {
    REQUEUE_TOTAL
        .with_label_values(&[resource_type, reason])
        .inc();
}

/// Record the outcome of one deSEC API call
pub fn record_provider_request(operation: &str, success: bool) {
    let outcome = if success { "success" } else { "error" };
    PROVIDER_REQUESTS_TOTAL
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_reconciliation_success() {
        let resource_type = "TestResource";

        record_reconciliation_success(resource_type, Duration::from_millis(500));

        let counter = RECONCILIATION_TOTAL.with_label_values(&[resource_type, "success"]);
        assert!(counter.get() > 0.0);
        let histogram = RECONCILIATION_DURATION_SECONDS.with_label_values(&[resource_type]);
        assert!(histogram.get_sample_count() > 0);
    }

    #[test]
    fn test_record_reconciliation_error() {
        let resource_type = "TestResourceError";

        record_reconciliation_error(resource_type, "conflict", Duration::from_millis(250));

        let counter = RECONCILIATION_TOTAL.with_label_values(&[resource_type, "error"]);
        assert!(counter.get() > 0.0);
        let errors = ERRORS_TOTAL.with_label_values(&[resource_type, "conflict"]);
        assert!(errors.get() > 0.0);
    }

    #[test]
    fn test_record_provider_request() {
        record_provider_request("metrics_test_op", false);

        let counter = PROVIDER_REQUESTS_TOTAL.with_label_values(&["metrics_test_op", "error"]);
        assert!(counter.get() > 0.0);
    }

    #[test]
    fn test_gather_metrics() {
        record_reconciliation_success("GatherTest", Duration::from_millis(100));
        record_requeue("GatherTest", "pending");

        let metrics_text = gather_metrics().expect("gathering metrics should succeed");
        assert!(metrics_text.contains("desec_owly_dedyn_io"));
        assert!(metrics_text.contains("reconciliations_total"));
        assert!(metrics_text.contains("requeues_total"));
    }
}
