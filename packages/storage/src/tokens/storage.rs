// ABOUTME: Storage operations for service account tokens
// ABOUTME: Insert with uniqueness enforcement, prefix lookup, one-shot revocation, cascading delete

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection, SqlitePool};
use tracing::{debug, info, warn};

use warden_core::{Digest, ServiceAccountId, TokenId, TokenKey, TokenRecord};

use crate::{
    StorageError, StorageResult, SQLITE_CONSTRAINT_FOREIGNKEY, SQLITE_CONSTRAINT_PRIMARYKEY,
    SQLITE_CONSTRAINT_UNIQUE,
};

const TOKEN_COLUMNS: &str = "id, token_key, digest, created_at, revoked_at, service_account_id";

/// Persistence contract for token records, independent of the backing database
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Insert an active token; fails with `DuplicateToken` on a uniqueness conflict
    async fn create(
        &self,
        service_account_id: ServiceAccountId,
        token_key: &TokenKey,
        digest: &Digest,
    ) -> StorageResult<TokenRecord>;

    /// All records sharing the prefix, active or revoked, across every account
    async fn find_candidates_by_prefix(&self, token_key: &TokenKey)
        -> StorageResult<Vec<TokenRecord>>;

    /// Mark a token revoked; revoking an already revoked token is a no-op
    async fn revoke(&self, token_id: TokenId) -> StorageResult<()>;

    /// Remove every token owned by the account, returning how many were removed
    async fn delete_for_account(&self, service_account_id: ServiceAccountId) -> StorageResult<u64>;

    async fn get(&self, token_id: TokenId) -> StorageResult<Option<TokenRecord>>;

    async fn list_for_account(
        &self,
        service_account_id: ServiceAccountId,
    ) -> StorageResult<Vec<TokenRecord>>;

    async fn count_active(&self) -> StorageResult<i64>;
}

pub struct SqliteTokenStore {
    pool: SqlitePool,
}

impl SqliteTokenStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TokenStore for SqliteTokenStore {
    async fn create(
        &self,
        service_account_id: ServiceAccountId,
        token_key: &TokenKey,
        digest: &Digest,
    ) -> StorageResult<TokenRecord> {
        let created_at = Utc::now();

        let result = sqlx::query(
            "INSERT INTO service_account_tokens
                 (token_key, digest, created_at, revoked_at, service_account_id)
             VALUES (?, ?, ?, NULL, ?)",
        )
        .bind(token_key.as_str())
        .bind(digest.as_str())
        .bind(created_at)
        .bind(service_account_id)
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) => {
                let id = done.last_insert_rowid();
                debug!(token_id = id, token_key = %token_key, service_account_id, "Created token");
                Ok(TokenRecord {
                    id,
                    token_key: token_key.clone(),
                    digest: digest.clone(),
                    created_at,
                    revoked_at: None,
                    service_account_id,
                })
            }
            Err(sqlx::Error::Database(db_err)) => {
                match db_err.code().as_deref() {
                    Some(SQLITE_CONSTRAINT_UNIQUE) | Some(SQLITE_CONSTRAINT_PRIMARYKEY) => {
                        warn!(
                            token_key = %token_key,
                            service_account_id,
                            "Token uniqueness conflict"
                        );
                        return Err(StorageError::DuplicateToken);
                    }
                    Some(SQLITE_CONSTRAINT_FOREIGNKEY) => {
                        return Err(StorageError::AccountNotFound(service_account_id));
                    }
                    _ => {}
                }
                Err(StorageError::Sqlx(sqlx::Error::Database(db_err)))
            }
            Err(e) => Err(StorageError::Sqlx(e)),
        }
    }

    async fn find_candidates_by_prefix(
        &self,
        token_key: &TokenKey,
    ) -> StorageResult<Vec<TokenRecord>> {
        let rows = sqlx::query(&format!(
            "SELECT {TOKEN_COLUMNS} FROM service_account_tokens WHERE token_key = ? ORDER BY id"
        ))
        .bind(token_key.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        rows.iter().map(row_to_token).collect()
    }

    async fn revoke(&self, token_id: TokenId) -> StorageResult<()> {
        let result = sqlx::query(
            "UPDATE service_account_tokens
             SET revoked_at = ?
             WHERE id = ? AND revoked_at IS NULL",
        )
        .bind(Utc::now())
        .bind(token_id)
        .execute(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 1 {
            info!(token_id, "Token revoked");
            return Ok(());
        }

        let exists: Option<i64> =
            sqlx::query_scalar("SELECT id FROM service_account_tokens WHERE id = ?")
                .bind(token_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(StorageError::Sqlx)?;

        match exists {
            Some(_) => {
                debug!(token_id, "Token already revoked");
                Ok(())
            }
            None => Err(StorageError::TokenNotFound(token_id)),
        }
    }

    async fn delete_for_account(&self, service_account_id: ServiceAccountId) -> StorageResult<u64> {
        let mut conn = self.pool.acquire().await.map_err(StorageError::Sqlx)?;
        delete_tokens_for_account(&mut conn, service_account_id).await
    }

    async fn get(&self, token_id: TokenId) -> StorageResult<Option<TokenRecord>> {
        let row = sqlx::query(&format!(
            "SELECT {TOKEN_COLUMNS} FROM service_account_tokens WHERE id = ?"
        ))
        .bind(token_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        row.as_ref().map(row_to_token).transpose()
    }

    async fn list_for_account(
        &self,
        service_account_id: ServiceAccountId,
    ) -> StorageResult<Vec<TokenRecord>> {
        let rows = sqlx::query(&format!(
            "SELECT {TOKEN_COLUMNS} FROM service_account_tokens
             WHERE service_account_id = ?
             ORDER BY id DESC"
        ))
        .bind(service_account_id)
        .fetch_all(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        rows.iter().map(row_to_token).collect()
    }

    async fn count_active(&self) -> StorageResult<i64> {
        let row = sqlx::query(
            "SELECT COUNT(*) as count FROM service_account_tokens WHERE revoked_at IS NULL",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(StorageError::Sqlx)?;

        let count: i64 = row.try_get("count").map_err(StorageError::Sqlx)?;
        Ok(count)
    }
}

/// Delete every token owned by an account on an existing connection or transaction
pub async fn delete_tokens_for_account(
    conn: &mut SqliteConnection,
    service_account_id: ServiceAccountId,
) -> StorageResult<u64> {
    let result = sqlx::query("DELETE FROM service_account_tokens WHERE service_account_id = ?")
        .bind(service_account_id)
        .execute(&mut *conn)
        .await
        .map_err(StorageError::Sqlx)?;

    let removed = result.rows_affected();
    info!(service_account_id, removed, "Deleted tokens for service account");
    Ok(removed)
}

fn row_to_token(row: &SqliteRow) -> StorageResult<TokenRecord> {
    Ok(TokenRecord {
        id: row.try_get("id")?,
        token_key: TokenKey::new(row.try_get::<String, _>("token_key")?)?,
        digest: Digest::new(row.try_get::<String, _>("digest")?)?,
        created_at: row.try_get("created_at")?,
        revoked_at: row.try_get("revoked_at")?,
        service_account_id: row.try_get("service_account_id")?,
    })
}
