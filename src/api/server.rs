use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use super::handlers::{health_check, metrics, AppState};
use crate::alerts::HttpAlertSource;
use crate::config::{ConfigError, ExporterConfig};
use crate::metrics::MetricStore;
use crate::updater::UpdateLoop;

/// Build the application router
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/metrics", get(metrics))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Validate configuration, start the update loop and serve `/metrics`.
///
/// Returns only on shutdown or on a fatal startup/serve error.
pub async fn run_server(config: ExporterConfig) -> Result<(), ServerError> {
    let url = config.validate()?;
    let source = HttpAlertSource::new(url, config.fetch_timeout).map_err(ConfigError::from)?;

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e: std::net::AddrParseError| ServerError::Addr(e.to_string()))?;
    let listener = TcpListener::bind(addr).await.map_err(ServerError::Bind)?;

    tracing::info!("Polling alerts from {}", source.url());

    let store = Arc::new(MetricStore::new());

    let mut update_loop = UpdateLoop::new(
        Arc::new(source),
        Arc::clone(&store),
        config.update_interval,
    );
    let update_handle = update_loop.start();

    let state = Arc::new(AppState {
        store: Arc::clone(&store),
    });
    let app = build_router(state);

    tracing::info!("Starting exporter on {}/metrics", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServerError::Serve)?;

    update_loop.stop().await;
    if let Err(e) = update_handle.await {
        tracing::warn!(error = %e, "Update loop task ended abnormally");
    }

    tracing::info!("Exporter stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install CTRL+C signal handler");
        std::future::pending::<()>().await;
    }

    tracing::info!("Shutdown signal received, stopping update loop...");
}

/// Fatal errors that stop the exporter
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid listen address: {0}")]
    Addr(String),

    #[error("Failed to bind listener: {0}")]
    Bind(std::io::Error),

    #[error("Server error: {0}")]
    Serve(std::io::Error),
}
