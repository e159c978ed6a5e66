mod api;
mod config;
mod dashboard;
mod db;
mod error;
mod models;
mod state;

use crate::config::Config;
use crate::state::AppState;
use anyhow::Result;
use moka::future::Cache;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // Load Config
    let config = Config::new().expect("Failed to load config");
    let config = Arc::new(config);

    // Open the execution store (populated by the pipeline service)
    let max_connections = config.database.max_connections.unwrap_or(5);
    let db = db::init_db(&config.database.url, max_connections)
        .await
        .expect("Failed to open execution store");

    let execution_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM pipeline_executions")
        .fetch_one(&db)
        .await
        .unwrap_or(0);
    info!("Execution store ready ({} executions)", execution_count);

    let ttl = config.dashboard.cache_ttl_seconds.unwrap_or(600);
    let capacity = config.dashboard.cache_capacity.unwrap_or(10_000);

    // Create AppState
    let state = AppState {
        db,
        config: config.clone(),
        cache: Cache::builder()
            .time_to_live(std::time::Duration::from_secs(ttl))
            .max_capacity(capacity)
            .build(),
    };

    // Start Web Server
    let app = api::app_router(state);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("Server running on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
