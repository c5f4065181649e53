// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Client-side authorization hooks.

use super::clock::{Clock, SystemClock};
use super::credential::{credential_digest, AuthCredential};
use super::error::AuthError;
use crate::codec::{BincodeCodec, Codec};
use crate::config::{RpcConfig, CREDENTIAL_VALIDITY};
use crate::value::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Produces the `auth` value sent alongside one call.
///
/// Called once per call with that call's id and encoded payload.
pub trait Authorize: Send + Sync + 'static {
    fn authorize(&self, id: &str, call_buf: &[u8]) -> Result<Value, AuthError>;
}

/// A function-based authorizer.
impl<F> Authorize for F
where
    F: Fn(&str, &[u8]) -> Result<Value, AuthError> + Send + Sync + 'static,
{
    fn authorize(&self, id: &str, call_buf: &[u8]) -> Result<Value, AuthError> {
        self(id, call_buf)
    }
}

/// Sends no credential (`auth` is absent).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAuth;

impl Authorize for NoAuth {
    fn authorize(&self, _id: &str, _call_buf: &[u8]) -> Result<Value, AuthError> {
        Ok(Value::Undefined)
    }
}

/// Signs every call with a shared username and password.
///
/// Credentials are never cached: each one is bound to a single call id and
/// payload and expires [`CREDENTIAL_VALIDITY`] after signing.
pub struct UsernamePasswordAuth {
    username: String,
    password: String,
    validity: Duration,
    clock: Arc<dyn Clock>,
    codec: Arc<dyn Codec>,
}

impl UsernamePasswordAuth {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            validity: CREDENTIAL_VALIDITY,
            clock: Arc::new(SystemClock),
            codec: Arc::new(BincodeCodec),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Must match the codec the verifier uses.
    pub fn with_codec(mut self, codec: Arc<dyn Codec>) -> Self {
        self.codec = codec;
        self
    }

    pub fn with_config(mut self, config: &RpcConfig) -> Self {
        self.validity = config.credential_validity();
        self
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Build a credential for one call.
    pub fn sign(&self, id: &str, call_buf: &[u8]) -> Result<AuthCredential, AuthError> {
        let valid_until = (self.clock.now_ms() + self.validity.as_millis() as u64) as f64;
        let sig = credential_digest(
            self.codec.as_ref(),
            &self.username,
            &self.password,
            id,
            call_buf,
            valid_until,
        )?;

        Ok(AuthCredential {
            username: self.username.clone(),
            valid_until,
            sig,
        })
    }
}

impl Authorize for UsernamePasswordAuth {
    fn authorize(&self, id: &str, call_buf: &[u8]) -> Result<Value, AuthError> {
        Ok(self.sign(id, call_buf)?.to_value())
    }
}

impl fmt::Debug for UsernamePasswordAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UsernamePasswordAuth")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("validity", &self.validity)
            .finish()
    }
}
