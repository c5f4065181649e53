// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Byte transports: encoded envelope in, encoded result out.

use super::error::RpcResult;
use super::server::RpcServer;
use futures::future::{BoxFuture, FutureExt};
use std::future::Future;
use std::sync::Arc;

/// Carries one request and returns the raw response.
///
/// No retries or connection state: each `send` is one exchange.
pub trait Transport: Send + Sync + 'static {
    fn send(&self, request: Vec<u8>) -> BoxFuture<'_, RpcResult<Vec<u8>>>;
}

/// A function-based transport.
impl<F, Fut> Transport for F
where
    F: Fn(Vec<u8>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = RpcResult<Vec<u8>>> + Send + 'static,
{
    fn send(&self, request: Vec<u8>) -> BoxFuture<'_, RpcResult<Vec<u8>>> {
        self(request).boxed()
    }
}

/// Hands requests straight to an in-process [`RpcServer`].
pub struct LoopbackTransport<S> {
    server: Arc<RpcServer<S>>,
}

impl<S> LoopbackTransport<S> {
    pub fn new(server: Arc<RpcServer<S>>) -> Self {
        Self { server }
    }
}

impl<S> Clone for LoopbackTransport<S> {
    fn clone(&self) -> Self {
        Self {
            server: Arc::clone(&self.server),
        }
    }
}

impl<S: Send + Sync + 'static> Transport for LoopbackTransport<S> {
    fn send(&self, request: Vec<u8>) -> BoxFuture<'_, RpcResult<Vec<u8>>> {
        async move { Ok(self.server.handle(&request).await) }.boxed()
    }
}

#[cfg(feature = "http")]
pub use self::http::HttpTransport;

#[cfg(feature = "http")]
mod http {
    use super::Transport;
    use crate::rpc::error::{RpcError, RpcResult};
    use futures::future::{BoxFuture, FutureExt};

    /// POSTs the envelope as the body and reads the encoded result back.
    ///
    /// The HTTP status is not inspected: call-level failure travels inside
    /// the result.
    #[derive(Debug, Clone)]
    pub struct HttpTransport {
        client: reqwest::Client,
        url: String,
    }

    impl HttpTransport {
        pub fn new(url: impl Into<String>) -> Self {
            Self::with_client(reqwest::Client::new(), url)
        }

        pub fn with_client(client: reqwest::Client, url: impl Into<String>) -> Self {
            Self {
                client,
                url: url.into(),
            }
        }
    }

    impl Transport for HttpTransport {
        fn send(&self, request: Vec<u8>) -> BoxFuture<'_, RpcResult<Vec<u8>>> {
            async move {
                let response = self
                    .client
                    .post(&self.url)
                    .body(request)
                    .send()
                    .await
                    .map_err(|e| RpcError::Transport(e.to_string()))?;
                let body = response
                    .bytes()
                    .await
                    .map_err(|e| RpcError::Transport(e.to_string()))?;
                Ok(body.to_vec())
            }
            .boxed()
        }
    }
}
