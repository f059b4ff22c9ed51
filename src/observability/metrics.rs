//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define blog server metrics (reloads, generation, feed hits)
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `blog_reloads_total` (counter): reload attempts by outcome
//! - `blog_reload_duration_seconds` (histogram): time from trigger to publish
//! - `blog_snapshot_generation` (gauge): generation currently served
//! - `blog_feed_requests_total` (counter): feed hits by kind
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed
//! - Labels are low-cardinality (outcome, feed kind)

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder with an HTTP scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a finished reload attempt.
pub fn record_reload(outcome: &'static str, start: Instant) {
    counter!("blog_reloads_total", "outcome" => outcome).increment(1);
    histogram!("blog_reload_duration_seconds").record(start.elapsed().as_secs_f64());
}

/// Record the generation that is now being served.
pub fn record_generation(generation: u64) {
    gauge!("blog_snapshot_generation").set(generation as f64);
}

/// Record a served feed request.
pub fn record_feed_request(kind: &'static str) {
    counter!("blog_feed_requests_total", "kind" => kind).increment(1);
}
