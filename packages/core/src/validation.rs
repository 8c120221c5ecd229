// ABOUTME: Construction-time validation for persisted token fields and account names
// ABOUTME: Length mismatches are rejected before anything reaches the database

use thiserror::Error;

use crate::constants::{DIGEST_LENGTH, MAX_ACCOUNT_NAME_LENGTH, TOKEN_KEY_LENGTH};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Token key must be exactly {TOKEN_KEY_LENGTH} ASCII characters, got {0}")]
    TokenKeyLength(usize),

    #[error("Digest must be exactly {DIGEST_LENGTH} ASCII characters, got {0}")]
    DigestLength(usize),

    #[error("Account name cannot be empty")]
    EmptyAccountName,

    #[error("Account name exceeds {MAX_ACCOUNT_NAME_LENGTH} characters")]
    AccountNameTooLong,
}

pub fn validate_token_key(value: &str) -> Result<(), ValidationError> {
    if !value.is_ascii() || value.len() != TOKEN_KEY_LENGTH {
        return Err(ValidationError::TokenKeyLength(value.chars().count()));
    }
    Ok(())
}

pub fn validate_digest(value: &str) -> Result<(), ValidationError> {
    if !value.is_ascii() || value.len() != DIGEST_LENGTH {
        return Err(ValidationError::DigestLength(value.chars().count()));
    }
    Ok(())
}

/// Trims and checks a service account name, returning the trimmed form
pub fn validate_account_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyAccountName);
    }
    if trimmed.chars().count() > MAX_ACCOUNT_NAME_LENGTH {
        return Err(ValidationError::AccountNameTooLong);
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_key_must_be_exact_length() {
        assert!(validate_token_key("abcdEFGH").is_ok());
        assert_eq!(
            validate_token_key("short"),
            Err(ValidationError::TokenKeyLength(5))
        );
        assert_eq!(
            validate_token_key("abcdEFGHi"),
            Err(ValidationError::TokenKeyLength(9))
        );
    }

    #[test]
    fn test_token_key_rejects_multibyte_characters() {
        // 8 bytes but only 4 characters
        assert!(validate_token_key("éééé").is_err());
    }

    #[test]
    fn test_digest_must_be_exact_length() {
        assert!(validate_digest(&"a".repeat(DIGEST_LENGTH)).is_ok());
        assert_eq!(
            validate_digest(&"a".repeat(DIGEST_LENGTH - 1)),
            Err(ValidationError::DigestLength(DIGEST_LENGTH - 1))
        );
        assert!(validate_digest("").is_err());
    }

    #[test]
    fn test_account_name_is_trimmed() {
        assert_eq!(validate_account_name("  ci-bot ").unwrap(), "ci-bot");
        assert_eq!(
            validate_account_name("   "),
            Err(ValidationError::EmptyAccountName)
        );
        assert_eq!(
            validate_account_name(&"x".repeat(MAX_ACCOUNT_NAME_LENGTH + 1)),
            Err(ValidationError::AccountNameTooLong)
        );
    }
}
