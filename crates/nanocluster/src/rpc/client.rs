// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! RPC Client implementation.
//!
//! Each call is one self-contained exchange over the injected [`Transport`]:
//! fresh id, encoded payload, credential, envelope out, result in.

use super::call_id::{generate_call_id, RandomSource, SystemRandomSource};
use super::error::{RpcError, RpcResult};
use super::protocol::Protocol;
use super::transport::Transport;
use super::types::{CallPayload, CallResult, Envelope};
use crate::auth::{Authorize, NoAuth};
use crate::codec::{BincodeCodec, Codec};
use crate::config::{RpcConfig, CALL_ID_BYTES};
use crate::types::{FromValue, FunctionType, Type};
use crate::value::Value;
use std::sync::Arc;

/// Client for calling methods of a remote service.
///
/// # Example
///
/// ```rust,no_run
/// use nanocluster::rpc::RpcClient;
/// use nanocluster::auth::UsernamePasswordAuth;
/// use nanocluster::Value;
///
/// # async fn example(transport: impl nanocluster::rpc::Transport) -> nanocluster::rpc::RpcResult<()> {
/// let client = RpcClient::builder(transport)
///     .authorize(UsernamePasswordAuth::new("alice", "s3cret"))
///     .build();
///
/// let sum = client.call("add", vec![Value::from(1), Value::from(2)]).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct RpcClient {
    transport: Arc<dyn Transport>,
    protocol: Option<Arc<Protocol>>,
    codec: Arc<dyn Codec>,
    random: Arc<dyn RandomSource>,
    authorize: Arc<dyn Authorize>,
    call_id_bytes: usize,
}

impl RpcClient {
    pub fn builder(transport: impl Transport) -> RpcClientBuilder {
        RpcClientBuilder {
            transport: Arc::new(transport),
            protocol: None,
            codec: Arc::new(BincodeCodec),
            random: Arc::new(SystemRandomSource::new()),
            authorize: Arc::new(NoAuth),
            call_id_bytes: CALL_ID_BYTES,
        }
    }

    /// Protocol calls are checked against, if one was given.
    pub fn protocol(&self) -> Option<&Protocol> {
        self.protocol.as_deref()
    }

    /// Call `method` with positional `args` and return the unwrapped `ok` value.
    ///
    /// With a protocol set, undeclared methods fail before anything is sent.
    pub async fn call(&self, method: &str, args: Vec<Value>) -> RpcResult<Value> {
        if let Some(protocol) = &self.protocol {
            if !protocol.contains(method) {
                return Err(RpcError::UnknownMethod(method.to_string()));
            }
        }

        let id = generate_call_id(self.random.as_ref(), self.call_id_bytes)?;
        let payload = CallPayload {
            method: method.to_string(),
            args,
        };
        let call_buf = self.codec.encode(&payload.to_value())?;
        let auth = self.authorize.authorize(&id, &call_buf)?;

        let envelope = Envelope { id, call_buf, auth };
        let request = self.codec.encode(&envelope.to_value())?;

        log::debug!("RPC call {} (id {}, {} bytes)", method, envelope.id, request.len());

        let response = self.transport.send(request).await?;
        let value = self
            .codec
            .decode(&response)
            .map_err(|e| RpcError::Transport(format!("undecodable response: {}", e)))?;

        match CallResult::from_value(value)? {
            CallResult::Ok(value) => Ok(value),
            CallResult::Err(message) => {
                log::warn!("RPC call {} (id {}) failed remotely: {}", method, envelope.id, message);
                Err(RpcError::Remote(message))
            }
        }
    }

    /// Like [`RpcClient::call`], converting the reply through `ty`.
    pub async fn call_parsed<T: FromValue>(
        &self,
        method: &str,
        args: Vec<Value>,
        ty: &Type<T>,
    ) -> RpcResult<T> {
        let value = self.call(method, args).await?;
        Ok(ty.parse(value)?)
    }

    /// Callable handle for one method.
    pub fn method(&self, name: &str) -> RpcResult<RemoteMethod> {
        let signature = match &self.protocol {
            Some(protocol) => Some(
                protocol
                    .get(name)
                    .cloned()
                    .ok_or_else(|| RpcError::UnknownMethod(name.to_string()))?,
            ),
            None => None,
        };

        Ok(RemoteMethod {
            client: self.clone(),
            name: name.to_string(),
            signature,
        })
    }

    /// One handle per declared method. Empty without a protocol.
    pub fn methods(&self) -> Vec<RemoteMethod> {
        self.protocol
            .iter()
            .flat_map(|protocol| protocol.iter())
            .map(|(name, signature)| RemoteMethod {
                client: self.clone(),
                name: name.to_string(),
                signature: Some(signature.clone()),
            })
            .collect()
    }
}

impl std::fmt::Debug for RpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcClient")
            .field("protocol", &self.protocol)
            .field("call_id_bytes", &self.call_id_bytes)
            .finish_non_exhaustive()
    }
}

/// Builder for [`RpcClient`].
pub struct RpcClientBuilder {
    transport: Arc<dyn Transport>,
    protocol: Option<Arc<Protocol>>,
    codec: Arc<dyn Codec>,
    random: Arc<dyn RandomSource>,
    authorize: Arc<dyn Authorize>,
    call_id_bytes: usize,
}

impl RpcClientBuilder {
    /// Reject undeclared methods locally.
    pub fn protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = Some(Arc::new(protocol));
        self
    }

    pub fn codec(mut self, codec: Arc<dyn Codec>) -> Self {
        self.codec = codec;
        self
    }

    pub fn random(mut self, random: impl RandomSource) -> Self {
        self.random = Arc::new(random);
        self
    }

    /// Credential hook (default: [`NoAuth`]).
    pub fn authorize(mut self, authorize: impl Authorize) -> Self {
        self.authorize = Arc::new(authorize);
        self
    }

    pub fn config(mut self, config: &RpcConfig) -> Self {
        self.call_id_bytes = config.call_id_bytes;
        self
    }

    pub fn build(self) -> RpcClient {
        RpcClient {
            transport: self.transport,
            protocol: self.protocol,
            codec: self.codec,
            random: self.random,
            authorize: self.authorize,
            call_id_bytes: self.call_id_bytes,
        }
    }
}

/// A single remote method bound to its client.
#[derive(Debug, Clone)]
pub struct RemoteMethod {
    client: RpcClient,
    name: String,
    signature: Option<FunctionType>,
}

impl RemoteMethod {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared signature, when the client has a protocol.
    pub fn signature(&self) -> Option<&FunctionType> {
        self.signature.as_ref()
    }

    pub async fn call(&self, args: Vec<Value>) -> RpcResult<Value> {
        self.client.call(&self.name, args).await
    }

    pub async fn call_parsed<T: FromValue>(&self, args: Vec<Value>, ty: &Type<T>) -> RpcResult<T> {
        self.client.call_parsed(&self.name, args, ty).await
    }
}
