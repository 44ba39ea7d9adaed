// Watermeter API server
// Decision: Configuration comes from the environment, optionally seeded from a .env file

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use watermeter_api::{router, ApiConfig, AppState};
use watermeter_core::NotificationPipeline;
use watermeter_storage::{create_db_observation_store, Database, StorageConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let dotenv = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "watermeter_api=debug,watermeter_core=debug,watermeter_storage=debug,tower_http=debug"
                .into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("watermeter-api starting...");
    if let Ok(path) = dotenv {
        tracing::info!(path = %path.display(), "Loaded environment file");
    }

    let storage_config = StorageConfig::from_env().context("Invalid storage configuration")?;
    tracing::info!(?storage_config, "Storage configured");

    let db = Database::connect(&storage_config)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Connected to database");
    let store = create_db_observation_store(db, &storage_config);

    let api_config = ApiConfig::from_env().context("Invalid service configuration")?;
    tracing::info!(port = api_config.port, "Service configured");
    if api_config.cors_origins.is_empty() {
        tracing::info!("CORS mirrors the request origin");
    } else {
        tracing::info!(origins = ?api_config.cors_origins, "CORS origins configured");
    }

    let pipeline = NotificationPipeline::new(Arc::new(store)).with_scope(api_config.entity_scope);
    tracing::info!(scope = ?pipeline.scope(), "Notification pipeline ready");
    let app = router(AppState::new(pipeline), &api_config.cors_origins);

    let addr = format!("0.0.0.0:{}", api_config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("watermeter-api stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
