//! Metrics collection and exposition.
//!
//! # Metrics
//! - `rest_requests_total` (counter): requests by method, route, status
//! - `rest_request_duration_seconds` (histogram): latency by method, route
//! - `rest_events_created_total` (counter): events constructed, by type

use std::net::SocketAddr;
use std::time::Duration;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape endpoint.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record a completed request.
pub fn record_request(method: &str, status: u16, route: &str, elapsed: Duration) {
    counter!(
        "rest_requests_total",
        "method" => method.to_string(),
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!(
        "rest_request_duration_seconds",
        "method" => method.to_string(),
        "route" => route.to_string()
    )
    .record(elapsed.as_secs_f64());
}

/// Record a successfully constructed event.
pub fn record_event_created(event_type: &str) {
    counter!("rest_events_created_total", "event" => event_type.to_string()).increment(1);
}
