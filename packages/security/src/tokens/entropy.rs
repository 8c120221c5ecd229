// ABOUTME: Pluggable source of cryptographically secure random bytes
// ABOUTME: Defaults to the operating system generator exposed by ring

use ring::rand::{SecureRandom, SystemRandom};

use super::error::CodecError;

pub trait EntropySource: Send + Sync {
    fn fill(&self, dest: &mut [u8]) -> Result<(), CodecError>;
}

/// Operating system CSPRNG
#[derive(Debug)]
pub struct SystemEntropy {
    rng: SystemRandom,
}

impl SystemEntropy {
    pub fn new() -> Self {
        Self {
            rng: SystemRandom::new(),
        }
    }
}

impl Default for SystemEntropy {
    fn default() -> Self {
        Self::new()
    }
}

impl EntropySource for SystemEntropy {
    fn fill(&self, dest: &mut [u8]) -> Result<(), CodecError> {
        self.rng.fill(dest).map_err(|_| {
            CodecError::EntropySource("System random source is unavailable".to_string())
        })
    }
}
