// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! nanocluster configuration - single source of truth
//!
//! - **Static**: protocol constants shared by every peer
//! - **Runtime**: [`RpcConfig`], built in code or loaded from YAML
//!
//! # Example YAML
//!
//! ```yaml
//! # rpc.yaml
//! credential_validity_ms: 10000
//! max_future_skew_ms: 20000
//! replay_cache_capacity: 4096
//! ```

use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Random bytes per call id (rendered base58).
pub const CALL_ID_BYTES: usize = 20;

/// How long a freshly signed credential stays valid.
pub const CREDENTIAL_VALIDITY: Duration = Duration::from_secs(15);

/// Furthest ahead of the verifier's clock a credential may claim to expire.
///
/// Must stay above [`CREDENTIAL_VALIDITY`] or honest callers with a slightly
/// fast clock get rejected.
pub const MAX_CREDENTIAL_SKEW: Duration = Duration::from_secs(20);

/// Seen-id capacity when the replay guard is enabled without a size.
pub const DEFAULT_REPLAY_CACHE_CAPACITY: usize = 8192;

/// Deepest array/object nesting a decoded value may have.
pub const MAX_VALUE_DEPTH: usize = 128;

/// Largest encoded message the codec reads or writes (16 MiB).
pub const MAX_MESSAGE_BYTES: u64 = 16 * 1024 * 1024;

/// Error message returned to callers for any credential rejection.
pub const AUTH_FAILED_MESSAGE: &str = "authentication failed";

fn default_credential_validity_ms() -> u64 {
    CREDENTIAL_VALIDITY.as_millis() as u64
}

fn default_max_future_skew_ms() -> u64 {
    MAX_CREDENTIAL_SKEW.as_millis() as u64
}

fn default_call_id_bytes() -> usize {
    CALL_ID_BYTES
}

/// Runtime knobs for signing, verification and call ids.
///
/// Defaults reproduce the protocol constants above; the replay guard is off.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RpcConfig {
    /// Lifetime of credentials this side signs.
    #[serde(default = "default_credential_validity_ms")]
    pub credential_validity_ms: u64,

    /// Maximum `validUntil - now` the verifier accepts.
    #[serde(default = "default_max_future_skew_ms")]
    pub max_future_skew_ms: u64,

    /// Random bytes per call id.
    #[serde(default = "default_call_id_bytes")]
    pub call_id_bytes: usize,

    /// Remember this many call ids and reject repeats (None = disabled).
    #[serde(default)]
    pub replay_cache_capacity: Option<usize>,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            credential_validity_ms: default_credential_validity_ms(),
            max_future_skew_ms: default_max_future_skew_ms(),
            call_id_bytes: CALL_ID_BYTES,
            replay_cache_capacity: None,
        }
    }
}

impl RpcConfig {
    pub fn builder() -> RpcConfigBuilder {
        RpcConfigBuilder::default()
    }

    /// Parse and validate a YAML document. Missing keys take their defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, String> {
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| format!("Failed to parse YAML: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a YAML file.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let content =
            fs::read_to_string(path).map_err(|e| format!("Failed to read YAML file: {}", e))?;
        Self::from_yaml_str(&content)
    }

    /// Reject settings no peer could work with.
    pub fn validate(&self) -> Result<(), String> {
        if self.call_id_bytes == 0 {
            return Err("call_id_bytes must be at least 1".to_string());
        }
        if self.credential_validity_ms == 0 {
            return Err("credential_validity_ms must be positive".to_string());
        }
        if self.replay_cache_capacity == Some(0) {
            return Err("replay_cache_capacity must be positive when set".to_string());
        }
        if self.credential_validity_ms > self.max_future_skew_ms {
            log::warn!(
                "credential_validity_ms ({}) exceeds max_future_skew_ms ({}); \
                 peers using the same settings will reject our credentials",
                self.credential_validity_ms,
                self.max_future_skew_ms
            );
        }
        Ok(())
    }

    pub fn credential_validity(&self) -> Duration {
        Duration::from_millis(self.credential_validity_ms)
    }

    pub fn max_future_skew(&self) -> Duration {
        Duration::from_millis(self.max_future_skew_ms)
    }
}

/// Builder for [`RpcConfig`].
#[derive(Debug, Clone, Default)]
pub struct RpcConfigBuilder {
    config: RpcConfig,
}

impl RpcConfigBuilder {
    pub fn credential_validity(mut self, validity: Duration) -> Self {
        self.config.credential_validity_ms = validity.as_millis() as u64;
        self
    }

    pub fn max_future_skew(mut self, skew: Duration) -> Self {
        self.config.max_future_skew_ms = skew.as_millis() as u64;
        self
    }

    pub fn call_id_bytes(mut self, bytes: usize) -> Self {
        self.config.call_id_bytes = bytes;
        self
    }

    /// Enable the replay guard with the given capacity.
    pub fn replay_cache(mut self, capacity: usize) -> Self {
        self.config.replay_cache_capacity = Some(capacity);
        self
    }

    /// Enable the replay guard with [`DEFAULT_REPLAY_CACHE_CAPACITY`].
    pub fn replay_guard(self) -> Self {
        self.replay_cache(DEFAULT_REPLAY_CACHE_CAPACITY)
    }

    pub fn build(self) -> Result<RpcConfig, String> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_protocol_constants() {
        let config = RpcConfig::default();
        assert_eq!(config.credential_validity(), Duration::from_secs(15));
        assert_eq!(config.max_future_skew(), Duration::from_secs(20));
        assert_eq!(config.call_id_bytes, 20);
        assert_eq!(config.replay_cache_capacity, None);
    }

    #[test]
    fn yaml_fills_missing_keys_with_defaults() {
        let config = RpcConfig::from_yaml_str("replay_cache_capacity: 16\n").unwrap();
        assert_eq!(config.replay_cache_capacity, Some(16));
        assert_eq!(config.credential_validity_ms, 15_000);
    }

    #[test]
    fn yaml_rejects_invalid_values() {
        assert!(RpcConfig::from_yaml_str("call_id_bytes: 0\n").is_err());
        assert!(RpcConfig::from_yaml_str("replay_cache_capacity: 0\n").is_err());
        assert!(RpcConfig::from_yaml_str("credential_validity_ms: soon\n").is_err());
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "credential_validity_ms: 5000").unwrap();
        writeln!(file, "max_future_skew_ms: 8000").unwrap();

        let config = RpcConfig::from_yaml_file(file.path()).unwrap();
        assert_eq!(config.credential_validity(), Duration::from_secs(5));
        assert_eq!(config.max_future_skew(), Duration::from_secs(8));
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = RpcConfig::from_yaml_file(dir.path().join("absent.yaml")).unwrap_err();
        assert!(err.contains("Failed to read"));
    }

    #[test]
    fn builder_sets_fields() {
        let config = RpcConfig::builder()
            .credential_validity(Duration::from_secs(5))
            .call_id_bytes(32)
            .replay_guard()
            .build()
            .unwrap();
        assert_eq!(config.credential_validity_ms, 5000);
        assert_eq!(config.call_id_bytes, 32);
        assert_eq!(
            config.replay_cache_capacity,
            Some(DEFAULT_REPLAY_CACHE_CAPACITY)
        );
    }
}
