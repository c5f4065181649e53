// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Per-call identifiers.

use super::error::{RpcError, RpcResult};
use ring::rand::{SecureRandom, SystemRandom};

/// Source of random bytes for call ids.
pub trait RandomSource: Send + Sync + 'static {
    fn fill(&self, dest: &mut [u8]) -> RpcResult<()>;
}

/// Cryptographically secure randomness from the operating system.
#[derive(Debug, Clone)]
pub struct SystemRandomSource {
    rng: SystemRandom,
}

impl SystemRandomSource {
    pub fn new() -> Self {
        Self {
            rng: SystemRandom::new(),
        }
    }
}

impl Default for SystemRandomSource {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for SystemRandomSource {
    fn fill(&self, dest: &mut [u8]) -> RpcResult<()> {
        self.rng
            .fill(dest)
            .map_err(|_| RpcError::Internal("SystemRandom failed to generate call id".to_string()))
    }
}

/// `len` random bytes rendered as base58.
pub fn generate_call_id(random: &dyn RandomSource, len: usize) -> RpcResult<String> {
    let mut bytes = vec![0u8; len];
    random.fill(&mut bytes)?;
    Ok(bs58::encode(bytes).into_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    struct Zeros;

    impl RandomSource for Zeros {
        fn fill(&self, dest: &mut [u8]) -> RpcResult<()> {
            dest.fill(0);
            Ok(())
        }
    }

    #[test]
    fn ids_are_base58_of_requested_length() {
        let id = generate_call_id(&SystemRandomSource::new(), 20).unwrap();
        let decoded = bs58::decode(&id).into_vec().unwrap();
        assert_eq!(decoded.len(), 20);
    }

    #[test]
    fn ids_do_not_repeat() {
        let source = SystemRandomSource::new();
        let ids: HashSet<String> = (0..256)
            .map(|_| generate_call_id(&source, 20).unwrap())
            .collect();
        assert_eq!(ids.len(), 256);
    }

    #[test]
    fn injected_source_is_deterministic() {
        // base58 renders each leading zero byte as '1'.
        assert_eq!(generate_call_id(&Zeros, 4).unwrap(), "1111");
    }
}
