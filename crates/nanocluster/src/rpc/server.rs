// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! RPC Server implementation.
//!
//! The RpcServer turns one encoded envelope into one encoded result. It owns
//! no sockets: mount [`RpcServer::handle`] behind whatever transport carries
//! the bytes.

use super::dispatch::{Dispatcher, Implementation};
use super::error::{RpcError, RpcResult};
use super::protocol::Protocol;
use super::types::{call_type, envelope_type, CallResult};
use crate::auth::CredentialVerifier;
use crate::codec::{BincodeCodec, Codec};
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// Reply used when the real reply cannot be encoded.
const INTERNAL_ERROR_MESSAGE: &str = "internal error";

/// Per-call context handed to every handler.
pub struct CallContext<S> {
    /// Call id chosen by the caller.
    pub id: String,
    /// Verified username, `None` when no verifier is installed.
    pub username: Option<String>,
    /// State shared by all calls of the server.
    pub state: Arc<S>,
}

impl<S> Clone for CallContext<S> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            username: self.username.clone(),
            state: Arc::clone(&self.state),
        }
    }
}

impl<S> fmt::Debug for CallContext<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallContext")
            .field("id", &self.id)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Service endpoint: envelope checks, credential verification, dispatch.
///
/// # Example
///
/// ```rust
/// use nanocluster::rpc::{CallContext, Implementation, Protocol, RpcServer};
/// use nanocluster::types::typed::{function, number};
/// use nanocluster::Value;
///
/// let protocol = Protocol::builder()
///     .method("double", function([number()]).returns(number()))
///     .build()
///     .unwrap();
///
/// let implementation = Implementation::new().sync_handler(
///     "double",
///     |_ctx: CallContext<()>, args: Vec<Value>| {
///         let n = args[0].as_f64().unwrap_or_default();
///         Ok(Value::from(n * 2.0))
///     },
/// );
///
/// let server = RpcServer::new("calculator", protocol, implementation, ()).unwrap();
/// assert_eq!(server.name(), "calculator");
/// ```
pub struct RpcServer<S> {
    name: String,
    dispatcher: Dispatcher<CallContext<S>>,
    verifier: Option<CredentialVerifier>,
    codec: Arc<dyn Codec>,
    state: Arc<S>,
}

impl<S: Send + Sync + 'static> RpcServer<S> {
    /// Pair `protocol` with its handlers. Fails if they do not line up.
    pub fn new(
        name: impl Into<String>,
        protocol: Protocol,
        implementation: Implementation<CallContext<S>>,
        state: S,
    ) -> RpcResult<Self> {
        let name = name.into();
        let dispatcher = Dispatcher::new(protocol, implementation)?;

        log::info!(
            "[{}] RPC server ready ({} methods)",
            name,
            dispatcher.protocol().len()
        );

        Ok(Self {
            name,
            dispatcher,
            verifier: None,
            codec: Arc::new(BincodeCodec),
            state: Arc::new(state),
        })
    }

    /// Require a valid credential on every call.
    pub fn with_verifier(mut self, verifier: CredentialVerifier) -> Self {
        self.verifier = Some(verifier);
        self
    }

    pub fn with_codec(mut self, codec: Arc<dyn Codec>) -> Self {
        self.codec = codec;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn protocol(&self) -> &Protocol {
        self.dispatcher.protocol()
    }

    pub fn state(&self) -> &Arc<S> {
        &self.state
    }

    /// Problems preventing this server from serving callers that expect
    /// `expected`. Empty means compatible.
    pub fn check_compatibility(&self, expected: &Protocol) -> Vec<String> {
        self.dispatcher.check_compatibility(expected)
    }

    /// Process one encoded request and return the encoded result.
    ///
    /// Every failure, including undecodable input, is answered with
    /// `{ err: message }`.
    pub async fn handle(&self, request: &[u8]) -> Vec<u8> {
        let outcome = self.process(request).await;
        self.encode_reply(CallResult::from(outcome))
    }

    async fn process(&self, request: &[u8]) -> RpcResult<Value> {
        let envelope = envelope_type().parse(self.codec.decode(request)?)?;

        let username = match &self.verifier {
            Some(verifier) => {
                match verifier
                    .verify(&envelope.id, &envelope.call_buf, &envelope.auth)
                    .await
                {
                    Ok(credential) => Some(credential.username),
                    Err(e) if e.is_auth_failure() => {
                        log::warn!("[{}] Rejected call {}: {}", self.name, envelope.id, e);
                        return Err(RpcError::AuthInvalid);
                    }
                    Err(e) => {
                        log::error!(
                            "[{}] Credential check for call {} failed: {}",
                            self.name,
                            envelope.id,
                            e
                        );
                        return Err(RpcError::AuthInvalid);
                    }
                }
            }
            None => None,
        };

        let payload = call_type().parse(self.codec.decode(&envelope.call_buf)?)?;

        log::debug!(
            "[{}] Call {} (id {}, user {:?})",
            self.name,
            payload.method,
            envelope.id,
            username
        );

        let ctx = CallContext {
            id: envelope.id,
            username,
            state: Arc::clone(&self.state),
        };
        let result = self
            .dispatcher
            .call_checked(&payload.method, ctx, payload.args)
            .await;

        if let Err(RpcError::Shape(e)) = &result {
            log::warn!("[{}] Bad arguments for {}: {}", self.name, payload.method, e);
        }
        result
    }

    fn encode_reply(&self, reply: CallResult) -> Vec<u8> {
        match self.codec.encode(&reply.to_value()) {
            Ok(bytes) => bytes,
            Err(e) => {
                log::error!("[{}] Failed to encode reply: {}", self.name, e);
                let fallback = CallResult::Err(INTERNAL_ERROR_MESSAGE.to_string());
                self.codec.encode(&fallback.to_value()).unwrap_or_default()
            }
        }
    }
}

impl<S> fmt::Debug for RpcServer<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RpcServer")
            .field("name", &self.name)
            .field("verifier", &self.verifier.is_some())
            .finish_non_exhaustive()
    }
}
