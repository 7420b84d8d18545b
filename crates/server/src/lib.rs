//! VPM Server - HTTP API for the Visual Product Matcher
//!
//! This crate exposes the product matcher over HTTP. A client uploads an
//! image, the configured label source describes it, and the catalog is
//! ranked by label overlap.
//!
//! # Features
//!
//! - **Middleware**: Compression, single-origin CORS, request ID tracking, structured logging
//! - **Configuration**: Environment variable and file-based configuration
//! - **Error Handling**: Failures reported in-band as `{"error": "..."}`
//! - **Graceful Shutdown**: Proper signal handling for production deployments
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use server::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::load()?;
//!     server::start_server(config).await?;
//!     Ok(())
//! }
//! ```
//!
//! # API Endpoints
//!
//! - `GET /` - Static banner
//! - `GET /health` - Liveness probe
//! - `GET /ready` - Readiness probe with catalog size
//! - `GET /metrics` - Prometheus metrics
//! - `POST /match` - Upload an image (multipart field `image`) and get ranked products
//! - `GET /raw_images/*` - Product images served from disk

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;
pub mod telemetry;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::{build_router, start_server};
pub use state::ServerState;
