// ABOUTME: Token lifecycle operations: issue, authenticate, revoke, and listing
// ABOUTME: Issuance retries on uniqueness conflicts with freshly generated tokens

use std::sync::Arc;

use sqlx::SqlitePool;
use tracing::{info, warn};

use warden_config::Config;
use warden_core::{ServiceAccountId, TokenId, TokenRecord};
use warden_storage::{SqliteTokenStore, StorageError, TokenStore};

use super::authenticator::TokenAuthenticator;
use super::codec::TokenCodec;
use super::error::{AuthError, TokenServiceError};
use super::types::{AuthenticatedToken, GeneratedToken, IssuedToken};

#[derive(Clone)]
pub struct TokenService {
    store: Arc<dyn TokenStore>,
    codec: Arc<TokenCodec>,
    authenticator: TokenAuthenticator,
    max_issue_attempts: u32,
}

impl TokenService {
    pub fn new(
        store: Arc<dyn TokenStore>,
        codec: Arc<TokenCodec>,
        max_issue_attempts: u32,
    ) -> Self {
        let authenticator = TokenAuthenticator::new(Arc::clone(&store), Arc::clone(&codec));
        Self {
            store,
            codec,
            authenticator,
            max_issue_attempts: max_issue_attempts.max(1),
        }
    }

    /// SQLite-backed service using the configured digest cost and retry bound
    pub fn from_config(pool: SqlitePool, config: &Config) -> Result<Self, TokenServiceError> {
        let codec = TokenCodec::new(config.digest_cost)?;
        Ok(Self::new(
            Arc::new(SqliteTokenStore::new(pool)),
            Arc::new(codec),
            config.issue_max_attempts,
        ))
    }

    /// Mint a token for `service_account_id`
    ///
    /// The plaintext in the returned value is never stored and cannot be
    /// recovered later. A uniqueness conflict triggers a fresh generation, up to
    /// the configured number of attempts.
    pub async fn issue(
        &self,
        service_account_id: ServiceAccountId,
    ) -> Result<IssuedToken, TokenServiceError> {
        for attempt in 1..=self.max_issue_attempts {
            let generated = self.generate().await?;

            match self
                .store
                .create(service_account_id, &generated.token_key, &generated.digest)
                .await
            {
                Ok(record) => {
                    info!(
                        token_id = record.id,
                        token_key = %record.token_key,
                        service_account_id,
                        "Issued service account token"
                    );
                    return Ok(IssuedToken::new(generated.plaintext, record));
                }
                Err(StorageError::DuplicateToken) => {
                    warn!(
                        attempt,
                        max_attempts = self.max_issue_attempts,
                        service_account_id,
                        "Generated token collided with an existing one, regenerating"
                    );
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(TokenServiceError::DuplicateAfterRetries {
            attempts: self.max_issue_attempts,
        })
    }

    pub async fn authenticate(&self, plaintext: &str) -> Result<AuthenticatedToken, AuthError> {
        self.authenticator.authenticate(plaintext).await
    }

    /// Mark a token revoked; revoking twice is a no-op
    pub async fn revoke(&self, token_id: TokenId) -> Result<(), TokenServiceError> {
        self.store.revoke(token_id).await?;
        info!(token_id, "Revoked service account token");
        Ok(())
    }

    pub async fn get_token(
        &self,
        token_id: TokenId,
    ) -> Result<Option<TokenRecord>, TokenServiceError> {
        Ok(self.store.get(token_id).await?)
    }

    /// Tokens owned by an account, newest first
    pub async fn list_tokens(
        &self,
        service_account_id: ServiceAccountId,
    ) -> Result<Vec<TokenRecord>, TokenServiceError> {
        Ok(self.store.list_for_account(service_account_id).await?)
    }

    pub async fn count_active(&self) -> Result<i64, TokenServiceError> {
        Ok(self.store.count_active().await?)
    }

    async fn generate(&self) -> Result<GeneratedToken, TokenServiceError> {
        let codec = Arc::clone(&self.codec);
        let generated = tokio::task::spawn_blocking(move || codec.generate())
            .await
            .map_err(|e| TokenServiceError::Internal(e.to_string()))??;
        Ok(generated)
    }
}
