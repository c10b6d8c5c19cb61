//! Metrics collection for portal-service.
//!
//! Business counters are recorded through the `metrics` facade and rendered
//! by the Prometheus recorder installed in [`init_metrics`].

use crate::workflow::{RequestKind, RequestStatus};
use metrics::counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder. Later calls are no-ops, so test
/// binaries that build several applications can call it freely.
pub fn init_metrics() {
    if METRICS_HANDLE.get().is_some() {
        return;
    }
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            let _ = METRICS_HANDLE.set(handle);
        }
        Err(e) => tracing::warn!("Prometheus recorder not installed: {}", e),
    }
}

/// Get metrics output in Prometheus text format.
pub fn get_metrics() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized\n".to_string())
}

pub fn record_submission(kind: RequestKind) {
    counter!("portal_requests_submitted_total", "kind" => kind.as_str()).increment(1);
}

pub fn record_transition(kind: RequestKind, to: RequestStatus) {
    counter!(
        "portal_status_transitions_total",
        "kind" => kind.as_str(),
        "to" => to.as_str()
    )
    .increment(1);
}

pub fn record_denied_transition(kind: RequestKind, reason: &'static str) {
    counter!(
        "portal_transitions_denied_total",
        "kind" => kind.as_str(),
        "reason" => reason
    )
    .increment(1);
}
