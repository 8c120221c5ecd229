// ABOUTME: Data layer and persistence for Warden
// ABOUTME: SQLite-backed storage for service accounts and their authentication tokens

use thiserror::Error;

use warden_core::{ServiceAccountId, TokenId, ValidationError};

pub mod accounts;
pub mod db;
pub mod tokens;

pub use accounts::ServiceAccountStorage;
pub use db::{connect, connect_in_memory, run_migrations};
pub use tokens::{SqliteTokenStore, TokenStore};

/// SQLite extended result codes surfaced through `DatabaseError::code()`
pub(crate) const SQLITE_CONSTRAINT_UNIQUE: &str = "2067";
pub(crate) const SQLITE_CONSTRAINT_PRIMARYKEY: &str = "1555";
pub(crate) const SQLITE_CONSTRAINT_FOREIGNKEY: &str = "787";
/// Primary result codes; extended codes carry them in the low byte
const SQLITE_BUSY: i32 = 5;
const SQLITE_LOCKED: i32 = 6;

/// Storage errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("Invalid stored value: {0}")]
    Validation(#[from] ValidationError),
    #[error("A token with the same key and digest already exists for this account")]
    DuplicateToken,
    #[error("Service account not found: {0}")]
    AccountNotFound(ServiceAccountId),
    #[error("Token not found: {0}")]
    TokenNotFound(TokenId),
}

pub type StorageResult<T> = Result<T, StorageError>;

impl StorageError {
    /// Whether the failure is transient and the caller may retry the whole operation
    pub fn is_retryable(&self) -> bool {
        match self {
            StorageError::Io(_) => true,
            StorageError::Sqlx(sqlx::Error::PoolTimedOut)
            | StorageError::Sqlx(sqlx::Error::Io(_)) => true,
            StorageError::Sqlx(sqlx::Error::Database(db_err)) => db_err
                .code()
                .and_then(|code| code.parse::<i32>().ok())
                .is_some_and(is_busy_or_locked),
            _ => false,
        }
    }
}

fn is_busy_or_locked(code: i32) -> bool {
    matches!(code & 0xff, SQLITE_BUSY | SQLITE_LOCKED)
}
