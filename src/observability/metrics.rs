//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gate_requests_rejected_total` (counter): rejections by reason
//! - `gate_rate_limit_clients` (gauge): tracked client buckets after each sweep
//! - `gate_rate_limit_evictions_total` (counter): idle clients evicted
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;

use metrics::{counter, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape endpoint. Needs a running tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_rejection(reason: &'static str) {
    counter!("gate_requests_rejected_total", "reason" => reason).increment(1);
}

pub fn record_rate_limit_clients(count: usize) {
    gauge!("gate_rate_limit_clients").set(count as f64);
}

pub fn record_rate_limit_evictions(evicted: usize) {
    counter!("gate_rate_limit_evictions_total").increment(evicted as u64);
}
