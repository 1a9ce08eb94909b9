//! Metrics collection and exposition.
//!
//! # Metrics
//! - `api_requests_total` (counter): completed requests by method, status
//! - `api_request_duration_seconds` (histogram): latency distribution
//!
//! Recording sites live in the pipeline: the capture layer counts
//! successful completions, the classification layer counts failures, so
//! every audited request is counted exactly once.

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus exporter on its own listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "metrics endpoint listening"),
        Err(err) => tracing::error!(error = %err, "failed to install metrics exporter"),
    }
}

/// Record one completed request.
pub fn record_request(method: &str, status: u16, start: Instant) {
    let elapsed = start.elapsed().as_secs_f64();
    metrics::counter!(
        "api_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("api_request_duration_seconds", "method" => method.to_string())
        .record(elapsed);
}
