//! Metrics collection and exposition.
//!
//! # Metrics
//! - `sink_config_reloads_total` (counter): reload attempts by mode, outcome
//! - `sink_config_active_sinks` (gauge): sinks in the active set

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::reload::ApplyMode;

/// Install the Prometheus exporter on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one pass through the reload pipeline.
pub fn record_reload(mode: ApplyMode, outcome: &'static str) {
    ::metrics::counter!(
        "sink_config_reloads_total",
        "mode" => mode.as_str(),
        "outcome" => outcome
    )
    .increment(1);
}

/// Record the size of the active sink set.
pub fn record_active_sinks(count: usize) {
    ::metrics::gauge!("sink_config_active_sinks").set(count as f64);
}
