//! Prometheus metrics endpoint handler.
//!
//! Served on the operations listener. Labels carry no request data beyond
//! the bounded method/endpoint/status set.

use axum::{extract::State, response::IntoResponse};
use metrics_exporter_prometheus::PrometheusHandle;

/// Handler for GET /metrics
#[tracing::instrument(skip_all, name = "video.metrics.scrape")]
pub async fn metrics_handler(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    handle.render()
}
