// ABOUTME: Error taxonomy for token generation, authentication, and issuance
// ABOUTME: Rejections collapse to one generic message; the precise reason is kept for audit logs

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use warden_storage::StorageError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Entropy source failure: {0}")]
    EntropySource(String),

    #[error("Stored digest is malformed: {0}")]
    MalformedDigest(String),

    #[error("Invalid digest parameters: {0}")]
    InvalidParameters(String),

    #[error("Failed to compute digest: {0}")]
    Hashing(String),
}

/// Why an authentication attempt was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    MalformedToken,
    UnknownToken,
    InvalidToken,
    RevokedToken,
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            RejectionReason::MalformedToken => "malformed_token",
            RejectionReason::UnknownToken => "unknown_token",
            RejectionReason::InvalidToken => "invalid_token",
            RejectionReason::RevokedToken => "revoked_token",
        };
        f.write_str(code)
    }
}

#[derive(Error, Debug)]
pub enum AuthError {
    /// Display never reveals which check failed
    #[error("authentication failed")]
    Rejected(RejectionReason),

    #[error("Token store error: {0}")]
    Storage(#[from] StorageError),

    #[error("Verification task failed: {0}")]
    Internal(String),
}

impl AuthError {
    /// Precise rejection reason, for audit logging only
    pub fn reason(&self) -> Option<RejectionReason> {
        match self {
            AuthError::Rejected(reason) => Some(*reason),
            _ => None,
        }
    }

    pub fn is_rejection(&self) -> bool {
        matches!(self, AuthError::Rejected(_))
    }

    /// Whether the caller may retry; rejections are final
    pub fn is_retryable(&self) -> bool {
        match self {
            AuthError::Storage(e) => e.is_retryable(),
            _ => false,
        }
    }
}

#[derive(Error, Debug)]
pub enum TokenServiceError {
    #[error("Token codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("Token store error: {0}")]
    Storage(#[from] StorageError),

    #[error("Token uniqueness conflict persisted after {attempts} attempts")]
    DuplicateAfterRetries { attempts: u32 },

    #[error("Background task failed: {0}")]
    Internal(String),
}
