// ABOUTME: Token plaintext generation and salted Argon2id digests of the secret suffix
// ABOUTME: Digest format is "argon2id$<salt>$<hash>" in unpadded base64url, exactly 128 characters
//
// TOKEN LAYOUT:
//
// - 32 random bytes, base64url without padding -> 43 printable characters
// - characters [0, 8) are the token key: stored in clear and indexed
// - characters [8, 43) are the secret suffix: only its digest is stored
//
// Lookups narrow candidates by token key first, so the slow hash only ever runs
// against rows sharing the presented prefix.

use std::sync::Arc;

use argon2::{Algorithm, Argon2, Params, Version};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD as BASE64, Engine};
use subtle::ConstantTimeEq;

use warden_config::DigestCost;
use warden_core::{Digest, TokenKey, MIN_TOKEN_LENGTH, TOKEN_KEY_LENGTH};

use super::entropy::{EntropySource, SystemEntropy};
use super::error::CodecError;
use super::types::GeneratedToken;

/// Random bytes behind every plaintext token
pub const TOKEN_ENTROPY_BYTES: usize = 32;

/// Per-digest salt size
pub const SALT_BYTES: usize = 24;

/// Raw Argon2id output size
pub const HASH_BYTES: usize = 64;

/// Longest plaintext accepted for verification
pub const MAX_TOKEN_LENGTH: usize = 256;

const ALGORITHM: &str = "argon2id";
const SEPARATOR: char = '$';

pub struct TokenCodec {
    entropy: Arc<dyn EntropySource>,
    params: Params,
}

impl TokenCodec {
    /// Codec backed by the operating system random generator
    pub fn new(cost: DigestCost) -> Result<Self, CodecError> {
        Self::with_entropy(cost, Arc::new(SystemEntropy::new()))
    }

    pub fn with_entropy(
        cost: DigestCost,
        entropy: Arc<dyn EntropySource>,
    ) -> Result<Self, CodecError> {
        let params = Params::new(
            cost.memory_kib,
            cost.iterations,
            cost.parallelism,
            Some(HASH_BYTES),
        )
        .map_err(|e| CodecError::InvalidParameters(e.to_string()))?;

        Ok(Self { entropy, params })
    }

    /// Create a new plaintext token together with its storable prefix and digest
    pub fn generate(&self) -> Result<GeneratedToken, CodecError> {
        let mut random_bytes = [0u8; TOKEN_ENTROPY_BYTES];
        self.entropy.fill(&mut random_bytes)?;

        let plaintext = BASE64.encode(random_bytes);
        let (prefix, secret_suffix) = plaintext.split_at(TOKEN_KEY_LENGTH);

        // The base64url alphabet is ASCII, so the prefix always has the right shape
        let token_key = TokenKey::new(prefix).map_err(|e| CodecError::Hashing(e.to_string()))?;
        let digest = self.digest(secret_suffix)?;

        Ok(GeneratedToken {
            plaintext,
            token_key,
            digest,
        })
    }

    /// Hash a secret suffix under a fresh random salt
    pub fn digest(&self, secret_suffix: &str) -> Result<Digest, CodecError> {
        let mut salt = [0u8; SALT_BYTES];
        self.entropy.fill(&mut salt)?;

        let hash = self.hash(secret_suffix, &salt)?;

        let encoded = format!(
            "{ALGORITHM}{SEPARATOR}{}{SEPARATOR}{}",
            BASE64.encode(salt),
            BASE64.encode(hash)
        );
        Digest::new(encoded).map_err(|e| CodecError::Hashing(e.to_string()))
    }

    /// Recompute the hash with the salt embedded in `digest` and compare in constant time
    pub fn verify(&self, secret_suffix: &str, digest: &Digest) -> Result<bool, CodecError> {
        let (salt, expected) = parse_digest(digest)?;
        let computed = self.hash(secret_suffix, &salt)?;

        Ok(computed[..].ct_eq(&expected[..]).into())
    }

    fn hash(&self, secret_suffix: &str, salt: &[u8]) -> Result<[u8; HASH_BYTES], CodecError> {
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone());

        let mut output = [0u8; HASH_BYTES];
        argon2
            .hash_password_into(secret_suffix.as_bytes(), salt, &mut output)
            .map_err(|e| CodecError::Hashing(e.to_string()))?;
        Ok(output)
    }
}

/// Split a presented plaintext into its token key and secret suffix
///
/// Returns `None` for anything that could never have been issued: too short,
/// too long, or with a non-ASCII prefix.
pub fn split_token(plaintext: &str) -> Option<(TokenKey, &str)> {
    if plaintext.len() < MIN_TOKEN_LENGTH || plaintext.len() > MAX_TOKEN_LENGTH {
        return None;
    }
    if !plaintext.is_char_boundary(TOKEN_KEY_LENGTH) {
        return None;
    }

    let (prefix, secret_suffix) = plaintext.split_at(TOKEN_KEY_LENGTH);
    TokenKey::new(prefix).ok().map(|key| (key, secret_suffix))
}

fn parse_digest(digest: &Digest) -> Result<([u8; SALT_BYTES], [u8; HASH_BYTES]), CodecError> {
    let mut parts = digest.as_str().split(SEPARATOR);

    let (algorithm, salt, hash) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(algorithm), Some(salt), Some(hash), None) => (algorithm, salt, hash),
        _ => {
            return Err(CodecError::MalformedDigest(
                "expected algorithm, salt and hash components".to_string(),
            ))
        }
    };

    if algorithm != ALGORITHM {
        return Err(CodecError::MalformedDigest(format!(
            "unsupported algorithm '{}'",
            algorithm
        )));
    }

    let salt = decode_fixed::<SALT_BYTES>(salt, "salt")?;
    let hash = decode_fixed::<HASH_BYTES>(hash, "hash")?;
    Ok((salt, hash))
}

fn decode_fixed<const N: usize>(encoded: &str, component: &str) -> Result<[u8; N], CodecError> {
    let bytes = BASE64
        .decode(encoded)
        .map_err(|_| CodecError::MalformedDigest(format!("{} is not valid base64url", component)))?;

    bytes.try_into().map_err(|bytes: Vec<u8>| {
        CodecError::MalformedDigest(format!(
            "{} must be {} bytes, got {}",
            component,
            N,
            bytes.len()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::test_support::{fast_codec, FailingEntropy, ScriptedEntropy};
    use warden_core::DIGEST_LENGTH;

    #[test]
    fn test_generate_produces_expected_shapes() {
        let codec = fast_codec();

        let token = codec.generate().unwrap();

        assert_eq!(token.plaintext.len(), 43);
        assert_eq!(token.token_key.as_str(), &token.plaintext[..TOKEN_KEY_LENGTH]);
        assert_eq!(token.digest.as_str().len(), DIGEST_LENGTH);
        assert!(token.digest.as_str().starts_with("argon2id$"));
        assert!(token
            .plaintext
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_generate_produces_unique_tokens() {
        let codec = fast_codec();

        let first = codec.generate().unwrap();
        let second = codec.generate().unwrap();

        assert_ne!(first.plaintext, second.plaintext);
        assert_ne!(first.digest, second.digest);
    }

    #[test]
    fn test_generated_suffix_verifies_against_its_digest() {
        let codec = fast_codec();
        let token = codec.generate().unwrap();
        let (_, secret) = split_token(&token.plaintext).unwrap();

        assert!(codec.verify(secret, &token.digest).unwrap());
    }

    #[test]
    fn test_wrong_suffix_does_not_verify() {
        let codec = fast_codec();
        let token = codec.generate().unwrap();

        assert!(!codec.verify("not-the-secret-suffix", &token.digest).unwrap());
        assert!(!codec.verify("", &token.digest).unwrap());
    }

    #[test]
    fn test_same_secret_salted_differently() {
        let codec = fast_codec();
        let secret = "identical-secret-suffix-value-00000";

        let first = codec.digest(secret).unwrap();
        let second = codec.digest(secret).unwrap();

        assert_ne!(first, second);
        assert!(codec.verify(secret, &first).unwrap());
        assert!(codec.verify(secret, &second).unwrap());
    }

    #[test]
    fn test_scripted_entropy_is_deterministic() {
        let codec = TokenCodec::with_entropy(
            DigestCost {
                memory_kib: 64,
                iterations: 1,
                parallelism: 1,
            },
            Arc::new(ScriptedEntropy::new(vec![7, 9, 7, 9])),
        )
        .unwrap();

        let first = codec.generate().unwrap();
        let second = codec.generate().unwrap();

        assert_eq!(first.plaintext, second.plaintext);
        assert_eq!(first.digest, second.digest);
    }

    #[test]
    fn test_entropy_failure_is_reported() {
        let codec = TokenCodec::with_entropy(
            DigestCost {
                memory_kib: 64,
                iterations: 1,
                parallelism: 1,
            },
            Arc::new(FailingEntropy),
        )
        .unwrap();

        assert!(matches!(
            codec.generate(),
            Err(CodecError::EntropySource(_))
        ));
    }

    #[test]
    fn test_invalid_cost_parameters_are_rejected() {
        let result = TokenCodec::new(DigestCost {
            memory_kib: 1,
            iterations: 0,
            parallelism: 1,
        });

        assert!(matches!(result, Err(CodecError::InvalidParameters(_))));
    }

    #[test]
    fn test_verify_rejects_malformed_digests() {
        let codec = fast_codec();
        let salt = BASE64.encode([1u8; SALT_BYTES]);
        let hash = BASE64.encode([2u8; HASH_BYTES]);

        let candidates = [
            format!("bcrypt00${}${}", salt, hash),
            format!("argon2idX{}X{}", salt, hash),
            format!("argon2id${}${}", "!".repeat(32), hash),
            format!("argon2id${}$${}", &salt[..31], hash),
        ];

        for candidate in candidates {
            let digest = Digest::new(candidate.clone()).unwrap();
            assert!(
                matches!(
                    codec.verify("secret", &digest),
                    Err(CodecError::MalformedDigest(_))
                ),
                "expected malformed digest for {}",
                candidate
            );
        }
    }

    #[test]
    fn test_split_token_boundaries() {
        assert!(split_token("").is_none());
        assert!(split_token("12345678").is_none());
        assert!(split_token(&"x".repeat(MAX_TOKEN_LENGTH + 1)).is_none());

        let (key, secret) = split_token("12345678s").unwrap();
        assert_eq!(key.as_str(), "12345678");
        assert_eq!(secret, "s");
    }

    #[test]
    fn test_split_token_rejects_non_ascii_prefix() {
        // 'é' straddles the prefix boundary
        assert!(split_token("1234567é-rest").is_none());
        assert!(split_token("ééééé-rest").is_none());
    }
}
