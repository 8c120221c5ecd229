// ABOUTME: Core types, constants, and validation for Warden
// ABOUTME: Foundational package shared by the storage, security, and CLI packages

pub mod constants;
pub mod types;
pub mod validation;

// Re-export main types
pub use types::{
    Digest, ServiceAccount, ServiceAccountId, TokenId, TokenKey, TokenRecord, TokenStatus,
};

// Re-export constants
pub use constants::{
    default_database_path, warden_dir, DIGEST_LENGTH, MAX_ACCOUNT_NAME_LENGTH, MIN_TOKEN_LENGTH,
    TOKEN_KEY_LENGTH,
};

// Re-export validation
pub use validation::{
    validate_account_name, validate_digest, validate_token_key, ValidationError,
};
