// ABOUTME: Deterministic and failing entropy sources plus a cheap codec for unit tests
// ABOUTME: Compiled only under cfg(test)

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use warden_config::DigestCost;

use super::codec::TokenCodec;
use super::entropy::{EntropySource, SystemEntropy};
use super::error::CodecError;

/// Argon2id cost low enough to keep unit tests fast
pub const FAST_COST: DigestCost = DigestCost {
    memory_kib: 64,
    iterations: 1,
    parallelism: 1,
};

pub fn fast_codec() -> TokenCodec {
    TokenCodec::new(FAST_COST).unwrap()
}

/// Fills each requested buffer with the next scripted byte, then falls back to the OS source
///
/// A token generation draws twice (token bytes, then salt), so replaying a pair of
/// seeds reproduces an identical token and digest.
pub struct ScriptedEntropy {
    seeds: Mutex<VecDeque<u8>>,
    fallback: SystemEntropy,
}

impl ScriptedEntropy {
    pub fn new(seeds: Vec<u8>) -> Self {
        Self {
            seeds: Mutex::new(seeds.into()),
            fallback: SystemEntropy::new(),
        }
    }
}

impl EntropySource for ScriptedEntropy {
    fn fill(&self, dest: &mut [u8]) -> Result<(), CodecError> {
        let next = self
            .seeds
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front();

        match next {
            Some(seed) => {
                dest.fill(seed);
                Ok(())
            }
            None => self.fallback.fill(dest),
        }
    }
}

pub struct FailingEntropy;

impl EntropySource for FailingEntropy {
    fn fill(&self, _dest: &mut [u8]) -> Result<(), CodecError> {
        Err(CodecError::EntropySource("entropy pool closed".to_string()))
    }
}

pub fn scripted_codec(seeds: Vec<u8>) -> Arc<TokenCodec> {
    Arc::new(TokenCodec::with_entropy(FAST_COST, Arc::new(ScriptedEntropy::new(seeds))).unwrap())
}
