//! Server initialization and routing
//!
//! This module handles the Axum server setup including:
//! - Router configuration with all API endpoints
//! - Middleware stack (CORS, logging, request IDs, timeouts)
//! - Static image hosting
//! - Graceful shutdown handling

use crate::config::ServerConfig;
use crate::middleware::{log_requests, request_id};
use crate::routes::{api_info, health, matching, not_found};
use crate::state::ServerState;
use crate::telemetry::{install_prometheus, PrometheusPipelineMetrics};
use anyhow::Context;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, StatusCode};
use axum::middleware::from_fn;
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Build the Axum router with all routes and middleware
///
/// Middleware stack (outermost first):
/// 1. Tracing
/// 2. Request ID tracking
/// 3. Request logging
/// 4. CORS
/// 5. Compression
/// 6. Timeout handling
pub fn build_router(state: Arc<ServerState>) -> anyhow::Result<Router> {
    let config = state.config.clone();

    let cors = if config.enable_cors {
        let origin: HeaderValue = config
            .cors_origin
            .parse()
            .with_context(|| format!("invalid CORS origin `{}`", config.cors_origin))?;
        CorsLayer::new()
            .allow_origin(AllowOrigin::list([origin]))
            .allow_methods(AllowMethods::mirror_request())
            .allow_headers(AllowHeaders::mirror_request())
            .allow_credentials(true)
    } else {
        CorsLayer::new()
    };

    let router = Router::new()
        .route("/", get(api_info))
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .route("/metrics", get(health::metrics))
        .route("/match", post(matching::match_upload))
        .route("/match/", post(matching::match_upload))
        .nest_service("/raw_images", ServeDir::new(&config.raw_images_dir))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(config.max_body_size()))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            config.timeout(),
        ))
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(from_fn(log_requests))
        .layer(from_fn(request_id))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(router)
}

/// Start the VPM HTTP server
///
/// Initializes logging and metrics, loads the catalog, builds the label
/// source and serves until SIGTERM or Ctrl+C.
///
/// # Example
///
/// ```rust,no_run
/// use server::ServerConfig;
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let config = ServerConfig::load()?;
///     server::start_server(config).await?;
///     Ok(())
/// }
/// ```
///
/// # Initialization
///
/// 1. Sets up structured JSON logging with the configured log level
/// 2. Installs the Prometheus recorder (when metrics are enabled)
/// 3. Loads the catalog and builds the label source
/// 4. Builds the router and binds to the configured TCP address
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(&config.log_level)
        .with_target(false)
        .with_thread_ids(true)
        .with_thread_names(true)
        .json()
        .init();

    let metrics_handle = if config.metrics_enabled {
        let handle = install_prometheus()?;
        vpm::set_pipeline_metrics(Some(Arc::new(PrometheusPipelineMetrics)));
        Some(handle)
    } else {
        None
    };

    // Create server state
    let mut state = ServerState::new(config.clone())?;
    if let Some(handle) = metrics_handle {
        state = state.with_metrics(handle);
    }
    let catalog_size = state.catalog.len();
    let label_source = state.labeler.name().to_string();
    let state = Arc::new(state);

    let app = build_router(state)?;

    let addr: SocketAddr = config.socket_addr()?;

    tracing::info!("Starting VPM server on {}", addr);
    tracing::info!(
        "Catalog: {} products from {}, label source: {}",
        catalog_size,
        config.catalog_path.display(),
        label_source
    );
    tracing::info!(
        "Timeout: {}s, Max body: {}MB",
        config.timeout_secs,
        config.max_body_size_mb
    );
    tracing::info!(
        "CORS: {} ({}), Metrics: {}",
        config.enable_cors,
        config.cors_origin,
        config.metrics_enabled
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Shutdown signal handler
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received Ctrl+C, shutting down..."),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down..."),
    }
}
