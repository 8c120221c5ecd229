// ABOUTME: Database connection management and schema bootstrap
// ABOUTME: Opens the SQLite pool with WAL, foreign keys, and busy timeout, then runs migrations

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use tracing::{debug, info};

use warden_config::DatabaseConfig;

use crate::{StorageError, StorageResult};

/// Open (creating if needed) the database described by `config` and apply migrations
pub async fn connect(config: &DatabaseConfig) -> StorageResult<SqlitePool> {
    // Ensure parent directory exists
    if let Some(parent) = config.path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(StorageError::Io)?;
        }
    }

    debug!(path = %config.path.display(), "Connecting to database");

    let busy_timeout = Duration::from_secs(config.busy_timeout_secs);
    let options = SqliteConnectOptions::new()
        .filename(&config.path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .foreign_keys(true)
        .busy_timeout(busy_timeout);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(busy_timeout)
        .connect_with(options)
        .await
        .map_err(StorageError::Sqlx)?;

    info!("Database connection established");

    run_migrations(&pool).await?;
    Ok(pool)
}

/// Private in-memory database with migrations applied
///
/// Uses a single long-lived connection so every query sees the same database.
pub async fn connect_in_memory() -> StorageResult<SqlitePool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .map_err(StorageError::Sqlx)?
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .map_err(StorageError::Sqlx)?;

    run_migrations(&pool).await?;
    Ok(pool)
}

pub async fn run_migrations(pool: &SqlitePool) -> StorageResult<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(StorageError::Migration)?;

    debug!("Database migrations completed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_connect_creates_database_file_and_schema() {
        let temp_dir = TempDir::new().unwrap();
        let config = DatabaseConfig {
            path: temp_dir.path().join("nested").join("warden.db"),
            max_connections: 2,
            busy_timeout_secs: 5,
        };

        let pool = connect(&config).await.unwrap();

        assert!(config.path.exists());
        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master
             WHERE type = 'table' AND name LIKE 'service_account%'
             ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .unwrap();
        assert_eq!(tables, vec!["service_account_tokens", "service_accounts"]);
    }

    #[tokio::test]
    async fn test_connect_is_idempotent_across_restarts() {
        let temp_dir = TempDir::new().unwrap();
        let config = DatabaseConfig {
            path: temp_dir.path().join("warden.db"),
            max_connections: 1,
            busy_timeout_secs: 5,
        };

        let first = connect(&config).await.unwrap();
        first.close().await;

        assert!(connect(&config).await.is_ok());
    }

    #[tokio::test]
    async fn test_in_memory_database_enforces_foreign_keys() {
        let pool = connect_in_memory().await.unwrap();

        let enabled: i64 = sqlx::query_scalar("PRAGMA foreign_keys")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(enabled, 1);
    }
}
