// ABOUTME: Service account storage layer using SQLite
// ABOUTME: Create, lookup, and transactional delete that cascades through the token table

use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::{debug, info};

use warden_core::{validate_account_name, ServiceAccount, ServiceAccountId};

use crate::tokens::delete_tokens_for_account;
use crate::{StorageError, StorageResult};

pub struct ServiceAccountStorage {
    pool: SqlitePool,
}

impl ServiceAccountStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, name: &str) -> StorageResult<ServiceAccount> {
        let name = validate_account_name(name)?;
        let created_at = Utc::now();

        let result = sqlx::query("INSERT INTO service_accounts (name, created_at) VALUES (?, ?)")
            .bind(&name)
            .bind(created_at)
            .execute(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        let id = result.last_insert_rowid();
        info!(service_account_id = id, name = %name, "Created service account");

        Ok(ServiceAccount {
            id,
            name,
            created_at,
        })
    }

    pub async fn get(&self, id: ServiceAccountId) -> StorageResult<Option<ServiceAccount>> {
        let row = sqlx::query("SELECT id, name, created_at FROM service_accounts WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        row.as_ref().map(row_to_account).transpose()
    }

    pub async fn exists(&self, id: ServiceAccountId) -> StorageResult<bool> {
        Ok(self.get(id).await?.is_some())
    }

    pub async fn list(&self) -> StorageResult<Vec<ServiceAccount>> {
        let rows = sqlx::query("SELECT id, name, created_at FROM service_accounts ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::Sqlx)?;

        rows.iter().map(row_to_account).collect()
    }

    /// Delete an account and every token it owns in one transaction
    ///
    /// Returns the number of tokens removed.
    pub async fn delete(&self, id: ServiceAccountId) -> StorageResult<u64> {
        debug!(service_account_id = id, "Deleting service account");

        let mut tx = self.pool.begin().await.map_err(StorageError::Sqlx)?;

        let removed_tokens = delete_tokens_for_account(&mut tx, id).await?;

        let result = sqlx::query("DELETE FROM service_accounts WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(StorageError::Sqlx)?;

        if result.rows_affected() == 0 {
            tx.rollback().await.map_err(StorageError::Sqlx)?;
            return Err(StorageError::AccountNotFound(id));
        }

        tx.commit().await.map_err(StorageError::Sqlx)?;

        info!(
            service_account_id = id,
            removed_tokens, "Deleted service account"
        );
        Ok(removed_tokens)
    }
}

fn row_to_account(row: &SqliteRow) -> StorageResult<ServiceAccount> {
    Ok(ServiceAccount {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        created_at: row.try_get("created_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connect_in_memory;
    use crate::tokens::{SqliteTokenStore, TokenStore};
    use warden_core::{Digest, TokenKey, ValidationError, DIGEST_LENGTH};

    async fn setup() -> (SqlitePool, ServiceAccountStorage) {
        let pool = connect_in_memory().await.unwrap();
        let storage = ServiceAccountStorage::new(pool.clone());
        (pool, storage)
    }

    #[tokio::test]
    async fn test_create_and_get_account() {
        let (_pool, storage) = setup().await;

        let created = storage.create("  deploy-bot  ").await.unwrap();
        let fetched = storage.get(created.id).await.unwrap().unwrap();

        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.name, "deploy-bot");
        assert!(storage.exists(created.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_create_rejects_blank_name() {
        let (_pool, storage) = setup().await;

        let result = storage.create("   ").await;

        assert!(matches!(
            result,
            Err(StorageError::Validation(ValidationError::EmptyAccountName))
        ));
    }

    #[tokio::test]
    async fn test_list_returns_accounts_in_creation_order() {
        let (_pool, storage) = setup().await;
        storage.create("first").await.unwrap();
        storage.create("second").await.unwrap();

        let names: Vec<String> = storage
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.name)
            .collect();

        assert_eq!(names, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_delete_cascades_to_owned_tokens_only() {
        let (pool, storage) = setup().await;
        let tokens = SqliteTokenStore::new(pool);
        let doomed = storage.create("doomed").await.unwrap();
        let survivor = storage.create("survivor").await.unwrap();

        for (account, key) in [
            (doomed.id, "aaaaaaaa"),
            (doomed.id, "bbbbbbbb"),
            (survivor.id, "cccccccc"),
        ] {
            tokens
                .create(
                    account,
                    &TokenKey::new(key).unwrap(),
                    &Digest::new("x".repeat(DIGEST_LENGTH)).unwrap(),
                )
                .await
                .unwrap();
        }

        let removed = storage.delete(doomed.id).await.unwrap();

        assert_eq!(removed, 2);
        assert!(storage.get(doomed.id).await.unwrap().is_none());
        assert!(tokens.list_for_account(doomed.id).await.unwrap().is_empty());
        assert_eq!(tokens.list_for_account(survivor.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_unknown_account() {
        let (_pool, storage) = setup().await;

        let result = storage.delete(404).await;

        assert!(matches!(result, Err(StorageError::AccountNotFound(404))));
    }
}
