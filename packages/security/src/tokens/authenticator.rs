// ABOUTME: Verifies presented plaintext tokens against stored digests
// ABOUTME: Parse, prefix lookup, constant-time verify, then the revocation check

use std::sync::Arc;

use tracing::{debug, error, warn};

use warden_core::TokenRecord;
use warden_storage::TokenStore;

use super::codec::{split_token, TokenCodec};
use super::error::{AuthError, RejectionReason};
use super::types::AuthenticatedToken;

#[derive(Clone)]
pub struct TokenAuthenticator {
    store: Arc<dyn TokenStore>,
    codec: Arc<TokenCodec>,
}

impl TokenAuthenticator {
    pub fn new(store: Arc<dyn TokenStore>, codec: Arc<TokenCodec>) -> Self {
        Self { store, codec }
    }

    /// Resolve a presented token to its owning service account
    ///
    /// Every rejection is reported as `AuthError::Rejected`; only store or task
    /// failures surface as other variants.
    pub async fn authenticate(&self, plaintext: &str) -> Result<AuthenticatedToken, AuthError> {
        let Some((token_key, secret_suffix)) = split_token(plaintext) else {
            return Err(reject(RejectionReason::MalformedToken, None));
        };

        let candidates = self.store.find_candidates_by_prefix(&token_key).await?;
        if candidates.is_empty() {
            return Err(reject(
                RejectionReason::UnknownToken,
                Some(token_key.as_str()),
            ));
        }

        debug!(
            token_key = %token_key,
            candidates = candidates.len(),
            "Verifying token candidates"
        );

        let mut matched = self
            .verify_candidates(secret_suffix.to_string(), candidates)
            .await?;

        // Only an unambiguous match identifies an account
        if matched.len() > 1 {
            let token_ids: Vec<_> = matched.iter().map(|record| record.id).collect();
            error!(
                token_key = %token_key,
                ?token_ids,
                "Presented token matches more than one stored digest"
            );
            return Err(reject(
                RejectionReason::InvalidToken,
                Some(token_key.as_str()),
            ));
        }

        let Some(record) = matched.pop() else {
            return Err(reject(
                RejectionReason::InvalidToken,
                Some(token_key.as_str()),
            ));
        };

        // A matching digest never outweighs revocation
        if record.is_revoked() {
            return Err(reject(
                RejectionReason::RevokedToken,
                Some(token_key.as_str()),
            ));
        }

        debug!(
            token_id = record.id,
            service_account_id = record.service_account_id,
            "Token authenticated"
        );

        Ok(AuthenticatedToken {
            service_account_id: record.service_account_id,
            token_id: record.id,
        })
    }

    /// Run the slow hash for every candidate off the async executor
    ///
    /// Returns all matching records; verification never stops at the first hit.
    async fn verify_candidates(
        &self,
        secret_suffix: String,
        candidates: Vec<TokenRecord>,
    ) -> Result<Vec<TokenRecord>, AuthError> {
        let codec = Arc::clone(&self.codec);

        tokio::task::spawn_blocking(move || {
            candidates
                .into_iter()
                .filter(|candidate| match codec.verify(&secret_suffix, &candidate.digest) {
                    Ok(matches) => matches,
                    Err(e) => {
                        // Corrupt row: never matches, never aborts the attempt
                        error!(
                            token_id = candidate.id,
                            error = %e,
                            "Stored token digest is malformed"
                        );
                        false
                    }
                })
                .collect()
        })
        .await
        .map_err(|e| AuthError::Internal(e.to_string()))
    }
}

fn reject(reason: RejectionReason, token_key: Option<&str>) -> AuthError {
    warn!(
        reason = %reason,
        token_key = token_key.unwrap_or("-"),
        "Token authentication rejected"
    );
    AuthError::Rejected(reason)
}
