use labels::LabelSourceConfig;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server bind address
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum request body size in MB
    #[serde(default = "default_max_body_size_mb")]
    pub max_body_size_mb: usize,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub enable_cors: bool,

    /// The single browser origin allowed by CORS
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,

    /// Product catalog JSON file, read once at startup
    #[serde(default = "default_catalog_path")]
    pub catalog_path: PathBuf,

    /// Directory served under `/raw_images`
    #[serde(default = "default_raw_images_dir")]
    pub raw_images_dir: PathBuf,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Metrics endpoint enabled
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,

    /// Image label source settings
    #[serde(default)]
    pub labels: LabelSourceConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            port: default_port(),
            timeout_secs: default_timeout_secs(),
            max_body_size_mb: default_max_body_size_mb(),
            enable_cors: default_true(),
            cors_origin: default_cors_origin(),
            catalog_path: default_catalog_path(),
            raw_images_dir: default_raw_images_dir(),
            log_level: default_log_level(),
            metrics_enabled: default_true(),
            labels: LabelSourceConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables and config files
    pub fn load() -> anyhow::Result<Self> {
        let builder = config::Config::builder()
            // Load from file if exists
            .add_source(config::File::with_name("server").required(false))
            // Override with environment variables, e.g. VPM_SERVER__LABELS__API_KEY
            .add_source(config::Environment::with_prefix("VPM_SERVER").separator("__"));

        let config: ServerConfig = builder.build()?.try_deserialize()?;

        if config.labels.mode == "vision"
            && config.labels.api_key.is_none()
            && config.labels.api_auth_header.is_none()
        {
            tracing::warn!("No Vision credentials configured; label requests will be unauthenticated");
        }

        Ok(config)
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr_str = format!("{}:{}", self.bind_addr, self.port);
        Ok(addr_str.parse()?)
    }

    /// Get request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Get max body size in bytes
    pub fn max_body_size(&self) -> usize {
        self.max_body_size_mb * 1024 * 1024
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_body_size_mb() -> usize {
    10
}

fn default_true() -> bool {
    true
}

fn default_cors_origin() -> String {
    "http://localhost:3000".to_string()
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("./products.json")
}

fn default_raw_images_dir() -> PathBuf {
    PathBuf::from("raw_images")
}

fn default_log_level() -> String {
    "info".to_string()
}
