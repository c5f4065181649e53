// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Server-side credential verification.
//!
//! # Checks, in order
//!
//! 1. `auth` has the credential shape
//! 2. `validUntil` is at most `max_future_skew` ahead of now
//! 3. `validUntil` has not passed
//! 4. the user exists in the [`CredentialStore`]
//! 5. the digest matches (constant-time)
//! 6. the call id is fresh, when the replay guard is enabled

use super::clock::{Clock, SystemClock};
use super::credential::{credential_digest, credential_type, AuthCredential};
use super::error::AuthError;
use crate::codec::{BincodeCodec, Codec};
use crate::config::{RpcConfig, MAX_CREDENTIAL_SKEW};
use crate::types::TypeError;
use crate::value::Value;
use futures::future::{BoxFuture, FutureExt};
use lru::LruCache;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::future::Future;
use std::num::NonZeroUsize;
use std::sync::Arc;
use subtle::ConstantTimeEq;

/// Password lookup keyed by username.
pub trait CredentialStore: Send + Sync + 'static {
    /// `None` when the user is unknown.
    fn lookup_password<'a>(&'a self, username: &'a str) -> BoxFuture<'a, Option<String>>;
}

/// A function-based credential store.
impl<F, Fut> CredentialStore for F
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Option<String>> + Send + 'static,
{
    fn lookup_password<'a>(&'a self, username: &'a str) -> BoxFuture<'a, Option<String>> {
        self(username.to_string()).boxed()
    }
}

/// In-memory username/password table.
#[derive(Debug, Clone, Default)]
pub struct StaticCredentialStore {
    users: HashMap<String, String>,
}

impl StaticCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.users.insert(username.into(), password.into());
        self
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for StaticCredentialStore {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            users: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl CredentialStore for StaticCredentialStore {
    fn lookup_password<'a>(&'a self, username: &'a str) -> BoxFuture<'a, Option<String>> {
        let password = self.users.get(username).cloned();
        async move { password }.boxed()
    }
}

/// Bounded memory of accepted call ids.
///
/// Entries older than the credential validity are harmless to keep (their
/// credentials have expired); eviction only matters when more than
/// `capacity` calls arrive within one validity window.
pub struct ReplayGuard {
    seen: Mutex<LruCache<String, ()>>,
}

impl ReplayGuard {
    pub fn new(capacity: usize) -> Self {
        Self {
            seen: Mutex::new(LruCache::new(
                NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN),
            )),
        }
    }

    /// Record `id`; false if it was already recorded.
    pub fn record(&self, id: &str) -> bool {
        let mut seen = self.seen.lock();
        if seen.contains(id) {
            return false;
        }
        seen.put(id.to_string(), ());
        true
    }

    pub fn len(&self) -> usize {
        self.seen.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Verifies username/password credentials against a [`CredentialStore`].
pub struct CredentialVerifier {
    store: Arc<dyn CredentialStore>,
    clock: Arc<dyn Clock>,
    codec: Arc<dyn Codec>,
    max_future_skew_ms: u64,
    replay: Option<ReplayGuard>,
}

impl CredentialVerifier {
    pub fn new(store: impl CredentialStore) -> Self {
        Self {
            store: Arc::new(store),
            clock: Arc::new(SystemClock),
            codec: Arc::new(BincodeCodec),
            max_future_skew_ms: MAX_CREDENTIAL_SKEW.as_millis() as u64,
            replay: None,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_codec(mut self, codec: Arc<dyn Codec>) -> Self {
        self.codec = codec;
        self
    }

    /// Apply skew tolerance and, if configured, enable the replay guard.
    pub fn with_config(mut self, config: &RpcConfig) -> Self {
        self.max_future_skew_ms = config.max_future_skew_ms;
        self.replay = config.replay_cache_capacity.map(ReplayGuard::new);
        self
    }

    /// Verify the credential presented with call `id` and payload `call_buf`.
    pub async fn verify(
        &self,
        id: &str,
        call_buf: &[u8],
        auth: &Value,
    ) -> Result<AuthCredential, AuthError> {
        let credential = credential_type()
            .parse(auth.clone())
            .map_err(AuthError::Malformed)?;

        if !credential.valid_until.is_finite() {
            return Err(AuthError::Malformed(TypeError::ShapeMismatch {
                value: auth.field("validUntil").to_string(),
                expected: "finite number".to_string(),
            }));
        }

        let now = self.clock.now_ms();
        let limit = now.saturating_add(self.max_future_skew_ms);
        if credential.valid_until > limit as f64 {
            return Err(AuthError::TooFarInFuture {
                valid_until: credential.valid_until,
                limit,
            });
        }
        if now as f64 > credential.valid_until {
            return Err(AuthError::Expired {
                valid_until: credential.valid_until,
                now,
            });
        }

        let password = self
            .store
            .lookup_password(&credential.username)
            .await
            .ok_or_else(|| AuthError::UnknownUser(credential.username.clone()))?;

        let expected = credential_digest(
            self.codec.as_ref(),
            &credential.username,
            &password,
            id,
            call_buf,
            credential.valid_until,
        )?;
        if !bool::from(credential.sig.ct_eq(&expected)) {
            return Err(AuthError::SignatureMismatch);
        }

        if let Some(guard) = &self.replay {
            if !guard.record(id) {
                return Err(AuthError::Replayed(id.to_string()));
            }
        }

        log::debug!("Verified credential for '{}' (call {})", credential.username, id);
        Ok(credential)
    }
}
