use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use hearth_api::config::AppConfig;
use hearth_api::database::{DatabaseManager, MemoryStore, PgStore, Store};
use hearth_api::{app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    tracing::info!("Starting Hearth API in {:?} mode", config.environment);
    if config.uses_dev_secret() {
        tracing::warn!("Using the development token secret; set SECRET before deploying");
    }

    let store: Arc<dyn Store> = match config.database.url {
        Some(_) => {
            let db = DatabaseManager::connect(&config.database).await?;
            db.migrate().await?;
            Arc::new(PgStore::new(db))
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using the in-memory store, data is lost on exit");
            Arc::new(MemoryStore::new())
        }
    };

    let router = app(AppState::new(store, &config), &config);

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Hearth API listening on http://{}", bind_addr);
    axum::serve(listener, router).await?;
    Ok(())
}
