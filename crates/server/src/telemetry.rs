//! Bridges pipeline observations to the `metrics` facade.

use std::time::Duration;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use vpm::{LabelError, PipelineMetrics};

/// [`PipelineMetrics`] implementation feeding the global `metrics` recorder.
#[derive(Debug, Default, Clone, Copy)]
pub struct PrometheusPipelineMetrics;

impl PipelineMetrics for PrometheusPipelineMetrics {
    fn record_labeling(&self, latency: Duration, result: Result<usize, &LabelError>) {
        let outcome = if result.is_ok() { "ok" } else { "error" };
        metrics::histogram!("vpm_label_latency_seconds", "outcome" => outcome)
            .record(latency.as_secs_f64());
        if let Ok(count) = result {
            metrics::histogram!("vpm_detected_labels").record(count as f64);
        }
    }

    fn record_ranking(&self, latency: Duration, catalog_size: usize, matched: usize) {
        metrics::histogram!("vpm_rank_latency_seconds").record(latency.as_secs_f64());
        metrics::gauge!("vpm_catalog_size").set(catalog_size as f64);
        metrics::histogram!("vpm_ranked_results").record(matched as f64);
    }
}

/// Install the Prometheus recorder and return a handle for `/metrics`.
pub fn install_prometheus() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    Ok(handle)
}
