// ABOUTME: Wires configuration, the database pool, and token services together
// ABOUTME: One context per CLI invocation

use sqlx::SqlitePool;
use thiserror::Error;
use tracing::debug;

use warden_config::{Config, ConfigError};
use warden_security::{TokenService, TokenServiceError};
use warden_storage::{connect, ServiceAccountStorage, StorageError};

#[derive(Error, Debug)]
pub enum ContextError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Storage(#[from] StorageError),

    #[error("Token service error: {0}")]
    TokenService(#[from] TokenServiceError),
}

pub struct AppContext {
    pub config: Config,
    pub pool: SqlitePool,
    pub accounts: ServiceAccountStorage,
    pub tokens: TokenService,
}

impl AppContext {
    /// Load configuration from the environment and open the database
    pub async fn from_env() -> Result<Self, ContextError> {
        let config = Config::from_env()?;
        Self::new(config).await
    }

    pub async fn new(config: Config) -> Result<Self, ContextError> {
        debug!(path = %config.database.path.display(), "Opening database");
        let pool = connect(&config.database).await?;
        let tokens = TokenService::from_config(pool.clone(), &config)?;

        Ok(Self {
            accounts: ServiceAccountStorage::new(pool.clone()),
            tokens,
            pool,
            config,
        })
    }
}
