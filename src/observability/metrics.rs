//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): inbound requests by operation, status
//! - `gateway_request_duration_seconds` (histogram): latency per operation
//! - `gateway_upstream_calls_total` (counter): upstream calls by call, outcome
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed
//! - Prometheus exporter is optional and bound to its own address

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a completed inbound request.
pub fn record_request(operation: &str, status: u16, start: Instant) {
    counter!(
        "gateway_requests_total",
        "operation" => operation.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    histogram!(
        "gateway_request_duration_seconds",
        "operation" => operation.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record one outbound call to the upstream API.
///
/// `call` is `login` or `query`; `outcome` is `ok` or a failure class.
pub fn record_upstream_call(call: &'static str, outcome: &'static str) {
    counter!("gateway_upstream_calls_total", "call" => call, "outcome" => outcome).increment(1);
}
