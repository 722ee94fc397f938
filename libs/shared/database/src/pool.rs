use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use sqlx::{Sqlite, Transaction};
use thiserror::Error;
use tracing::{debug, info};

use shared_config::AppConfig;

use crate::schema;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Invalid database url '{url}': {source}")]
    InvalidUrl { url: String, source: sqlx::Error },

    #[error("Failed to create database directory {path}: {source}")]
    Directory { path: String, source: std::io::Error },

    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

/// Opens the configured database, creating the file, its directory and the schema if needed.
pub async fn connect(config: &AppConfig) -> Result<SqlitePool, DatabaseError> {
    let options = SqliteConnectOptions::from_str(&config.database_url)
        .map_err(|source| DatabaseError::InvalidUrl {
            url: config.database_url.clone(),
            source,
        })?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5));

    if let Some(dir) = database_dir(&config.database_url) {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            debug!("Creating database directory {}", dir.display());
            std::fs::create_dir_all(dir).map_err(|source| DatabaseError::Directory {
                path: dir.display().to_string(),
                source,
            })?;
        }
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(config.database_max_connections.max(1))
        .acquire_timeout(Duration::from_secs(10))
        .connect_with(options)
        .await?;

    schema::apply(&pool).await?;
    info!("Database ready at {} (WAL mode)", config.database_url);

    Ok(pool)
}

/// A private in-memory database with the full schema.
///
/// Every connection to `sqlite::memory:` is its own database, so the pool is pinned
/// to one connection that never expires.
pub async fn connect_in_memory() -> Result<SqlitePool, DatabaseError> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;

    schema::apply(&pool).await?;
    Ok(pool)
}

/// Opens a transaction that holds the database write lock from its first statement.
///
/// A deferred transaction that reads and then writes fails with `SQLITE_BUSY` when
/// another writer committed in between, without waiting on the busy timeout.
/// `BEGIN IMMEDIATE` queues behind the current writer instead, so every read inside
/// sees committed state.
pub async fn begin_write(pool: &SqlitePool) -> Result<Transaction<'static, Sqlite>, sqlx::Error> {
    pool.begin_with("BEGIN IMMEDIATE").await
}

fn database_dir(url: &str) -> Option<&Path> {
    let path = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))?;
    let path = path.split('?').next()?;
    if path.is_empty() || path == ":memory:" {
        return None;
    }
    Path::new(path).parent()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_dir_for_file_urls() {
        assert_eq!(
            database_dir("sqlite://storage/db/hospital.db"),
            Some(Path::new("storage/db"))
        );
        assert_eq!(
            database_dir("sqlite:data/app.db?mode=rwc"),
            Some(Path::new("data"))
        );
    }

    #[test]
    fn test_database_dir_skips_memory() {
        assert_eq!(database_dir("sqlite::memory:"), None);
        assert_eq!(database_dir("postgres://localhost/db"), None);
    }

    #[tokio::test]
    async fn test_in_memory_pool_has_schema() {
        let pool = connect_in_memory().await.unwrap();
        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .unwrap();

        let names: Vec<&str> = tables.iter().map(|(name,)| name.as_str()).collect();
        assert_eq!(
            names,
            vec!["bookings", "medical_records", "medicines", "orders", "users"]
        );
    }
}
