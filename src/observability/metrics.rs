//! Metrics collection and exposition.
//!
//! # Metrics
//! - `explorer_requests_total` (counter): inbound requests by route, status
//! - `explorer_request_duration_seconds` (histogram): inbound latency by route
//! - `explorer_upstream_calls_total` (counter): upstream calls by action, outcome
//! - `explorer_upstream_call_duration_seconds` (histogram): upstream latency by action

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => {
            tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter")
        }
    }
}

pub fn record_request(route: &'static str, status: u16, start: Instant) {
    metrics::counter!(
        "explorer_requests_total",
        "route" => route,
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("explorer_request_duration_seconds", "route" => route)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_upstream_call(action: &'static str, outcome: &'static str, start: Instant) {
    metrics::counter!(
        "explorer_upstream_calls_total",
        "action" => action,
        "outcome" => outcome
    )
    .increment(1);
    metrics::histogram!("explorer_upstream_call_duration_seconds", "action" => action)
        .record(start.elapsed().as_secs_f64());
}
