use anyhow::{Context, Result};
use std::env;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use layout_assistant::config::{Config, StorageKind};
use layout_assistant::db::repositories::{LayoutStore, MemoryLayoutStore, PgLayoutStore};
use layout_assistant::gemini::{ChatModel, GeminiClient};
use layout_assistant::{create_router, AppState, Limits};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting layout assistant API server...");

    // --- Configuration ---
    let config_path =
        env::var("CONFIG_PATH").unwrap_or_else(|_| "config/default.toml".to_string());
    info!("Loading configuration from: {}", config_path);
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load configuration from {}", config_path))?;

    // --- Storage ---
    let store: Arc<dyn LayoutStore> = match config.storage {
        StorageKind::Memory => {
            warn!("Using in-memory layout storage; layouts are lost on restart.");
            Arc::new(MemoryLayoutStore::new(config.history_depth))
        }
        StorageKind::Postgres => {
            info!("Setting up database connection pool...");
            let url = config
                .database_url
                .as_deref()
                .context("database_url is required for postgres storage")?;
            Arc::new(PgLayoutStore::connect(url, config.history_depth).await?)
        }
    };

    // --- Gemini ---
    let chat: Option<Arc<dyn ChatModel>> = match env::var("GEMINI_API_KEY") {
        Ok(key) if !key.trim().is_empty() => {
            let client = GeminiClient::new(&config.gemini, key.trim())
                .context("Failed to build Gemini client")?;
            info!(model = %config.gemini.model, "Gemini client ready.");
            Some(Arc::new(client) as Arc<dyn ChatModel>)
        }
        _ => {
            warn!("GEMINI_API_KEY is not set; /chat will return an error.");
            None
        }
    };

    let app = create_router(AppState {
        store,
        chat,
        limits: Limits::from(&config),
    });

    // --- Server ---
    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(addr)
        .await
        .context("Failed to bind TCP listener")?;
    info!("API server listening on {}", addr);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Axum server failed")?;

    info!("Application shut down.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received.");
}
