//! Prometheus request metrics served at `/metrics`.

use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use prometheus::Registry;

/// Build the request metrics middleware over a dedicated registry.
///
/// # Errors
///
/// Returns [`std::io::Error`] when the collectors cannot be registered.
pub(crate) fn build_metrics() -> std::io::Result<PrometheusMetrics> {
    PrometheusMetricsBuilder::new("chronograf")
        .registry(Registry::new())
        .endpoint("/metrics")
        .build()
        .map_err(|err| std::io::Error::other(format!("prometheus setup failed: {err}")))
}
