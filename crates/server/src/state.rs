use crate::config::ServerConfig;
use crate::error::ServerResult;
use labels::{build_label_source, LabelSource};
use matcher::{load_catalog, Catalog};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Arc<ServerConfig>,

    /// Product catalog, loaded once and never mutated
    pub catalog: Arc<Catalog>,

    /// Image label source (shared across requests)
    pub labeler: Arc<dyn LabelSource>,

    /// Prometheus renderer, present when the recorder is installed
    pub metrics: Option<PrometheusHandle>,
}

impl ServerState {
    /// Create new server state: load the catalog and build the label source
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        let catalog = load_catalog(&config.catalog_path)?;
        let labeler = build_label_source(&config.labels)?;
        Ok(Self::with_parts(config, catalog, labeler))
    }

    /// Assemble state from already-built parts (tests, embedding)
    pub fn with_parts(
        config: ServerConfig,
        catalog: Catalog,
        labeler: Arc<dyn LabelSource>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            catalog: Arc::new(catalog),
            labeler,
            metrics: None,
        }
    }

    /// Attach a Prometheus handle for `/metrics`
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

/// Server metadata for readiness checks
#[derive(Debug, serde::Serialize)]
pub struct ServerMetadata {
    pub version: String,
    pub uptime_seconds: u64,
    pub catalog_size: usize,
    pub label_source: String,
}
