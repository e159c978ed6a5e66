use crate::config::Config;
use moka::future::Cache;
use serde_json::Value as JsonValue;
use sqlx::SqlitePool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<Config>,
    pub cache: Cache<String, JsonValue>,
}
