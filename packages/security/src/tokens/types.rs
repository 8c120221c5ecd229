// ABOUTME: Type definitions for service account token issuance and authentication
// ABOUTME: Plaintext-bearing results redact themselves in Debug output

use std::fmt;

use serde::Serialize;

use warden_core::{Digest, ServiceAccountId, TokenId, TokenKey, TokenRecord};

/// Output of the codec - the ONLY time the plaintext token exists
#[derive(Clone)]
pub struct GeneratedToken {
    pub plaintext: String,  // Show once to the caller
    pub token_key: TokenKey, // Indexed, non-secret prefix
    pub digest: Digest,      // Stored instead of the secret suffix
}

impl fmt::Debug for GeneratedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratedToken")
            .field("plaintext", &"<redacted>")
            .field("token_key", &self.token_key)
            .field("digest", &self.digest)
            .finish()
    }
}

/// Freshly issued token: the persisted record plus its one-time plaintext
#[derive(Clone)]
pub struct IssuedToken {
    pub plaintext: String,
    pub record: TokenRecord,
}

impl IssuedToken {
    pub fn new(plaintext: String, record: TokenRecord) -> Self {
        Self { plaintext, record }
    }

    pub fn id(&self) -> TokenId {
        self.record.id
    }
}

impl fmt::Debug for IssuedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssuedToken")
            .field("plaintext", &"<redacted>")
            .field("record", &self.record)
            .finish()
    }
}

/// Result of a successful authentication
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AuthenticatedToken {
    pub service_account_id: ServiceAccountId,
    pub token_id: TokenId,
}
