//! Alertmanager Exporter
//!
//! Run with: cargo run
//!
//! Environment variables:
//! - ALERTMANAGER_URL: Alerts API to poll (default: http://localhost:9093/api/v1/alerts)
//! - EXPORTER_HOST: Bind address (default: 0.0.0.0)
//! - EXPORTER_PORT: Port number (default: 8080)
//! - UPDATE_INTERVAL: Seconds between fetches (default: 15)
//! - FETCH_TIMEOUT: Per-request timeout in seconds (default: 10)
//! - RUST_LOG: Log level (default: info)

use alertmanager_exporter::api::run_server;
use alertmanager_exporter::ExporterConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "alertmanager_exporter=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ExporterConfig::from_env();

    tracing::info!("Starting with configuration:");
    tracing::info!("  Alertmanager URL: {}", config.alertmanager_url);
    tracing::info!("  Exporter address: {}:{}", config.host, config.port);
    tracing::info!("  Update interval: {:?}", config.update_interval);
    tracing::info!("  Fetch timeout: {:?}", config.fetch_timeout);

    run_server(config).await?;
    Ok(())
}
