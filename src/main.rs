// Main entry point - Dependency injection and server setup
use std::{net::SocketAddr, sync::Arc, time::Duration};
use anyhow::Context;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

use fleet_telemetry::application::dataset_repository::DatasetRepository;
use fleet_telemetry::application::fleet_service::FleetService;
use fleet_telemetry::infrastructure::config::{load_app_config, DatasetSource};
use fleet_telemetry::infrastructure::file_repository::FileDatasetRepository;
use fleet_telemetry::infrastructure::http_repository::HttpDatasetRepository;
use fleet_telemetry::presentation::app_state::AppState;
use fleet_telemetry::presentation::handlers::{
    equipment_history, health_check, list_equipment, map_view, position_history, reload, status,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_app_config()?;

    // Create repository (infrastructure layer)
    let repository: Arc<dyn DatasetRepository> = match config.dataset.source {
        DatasetSource::File => {
            let repo = FileDatasetRepository::new(config.dataset.dir.clone(), config.dataset.files.clone());
            tracing::info!("Reading dataset from {}", repo.dir().display());
            Arc::new(repo)
        }
        DatasetSource::Http => {
            let base_url = config
                .dataset
                .base_url
                .clone()
                .context("dataset.base_url is required when dataset.source = \"http\"")?;
            tracing::info!("Fetching dataset from {}", base_url);
            Arc::new(HttpDatasetRepository::new(
                base_url,
                config.dataset.files.clone(),
                Duration::from_secs(config.dataset.timeout_secs),
            )?)
        }
    };

    // Create service (application layer) and run the first load cycle.
    // A failed first load is served as 503 until POST /reload succeeds.
    let fleet_service = FleetService::new(repository);
    if let Err(e) = fleet_service.reload().await {
        tracing::warn!("Initial dataset load failed: {}", e);
    }

    let state = Arc::new(AppState { fleet_service });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/status", get(status))
        .route("/map", get(map_view))
        .route("/equipment", get(list_equipment))
        .route("/equipment/:id/history", get(equipment_history))
        .route("/equipment/:id/positions", get(position_history))
        .route("/reload", post(reload))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = config
        .server
        .bind
        .parse()
        .with_context(|| format!("Invalid server.bind address {}", config.server.bind))?;
    tracing::info!("Starting fleet-telemetry service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
