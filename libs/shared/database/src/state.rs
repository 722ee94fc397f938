use std::sync::Arc;

use sqlx::SqlitePool;

use shared_config::AppConfig;

/// Shared router state: configuration plus the persistence context every service is built from.
#[derive(Debug, Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub pool: SqlitePool,
}

impl AppState {
    pub fn new(config: AppConfig, pool: SqlitePool) -> Self {
        Self {
            config: Arc::new(config),
            pool,
        }
    }
}
