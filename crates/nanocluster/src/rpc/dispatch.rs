// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Routing calls by method name to handlers.
//!
//! A [`Dispatcher`] pairs a [`Protocol`] with an [`Implementation`] and
//! offers three call paths:
//!
//! - [`Dispatcher::call_checked`]: arguments are checked against the declared
//!   signature first. Use for anything arriving over the wire.
//! - [`Dispatcher::call_trusted`]: in-process calls whose argument shapes are
//!   already known to be right.
//! - [`Dispatcher::call_unchecked`]: raw escape hatch by name, no checks.

use super::error::{RpcError, RpcResult};
use super::protocol::Protocol;
use crate::types::{conforms, FunctionType, TypeError};
use crate::value::Value;
use futures::future::{BoxFuture, FutureExt};
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

/// Failure reported by a method handler. The message reaches the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerError {
    message: String,
}

impl HandlerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for HandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for HandlerError {}

impl From<String> for HandlerError {
    fn from(message: String) -> Self {
        Self { message }
    }
}

impl From<&str> for HandlerError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<TypeError> for HandlerError {
    fn from(e: TypeError) -> Self {
        Self::new(e.to_string())
    }
}

/// Lets handlers call other services with `?`.
impl From<RpcError> for HandlerError {
    fn from(e: RpcError) -> Self {
        Self::new(e.to_string())
    }
}

/// Result of a handler invocation.
pub type HandlerResult = Result<Value, HandlerError>;

/// Implementation of one method.
pub trait Handler<Ctx>: Send + Sync + 'static {
    fn call(&self, ctx: Ctx, args: Vec<Value>) -> BoxFuture<'static, HandlerResult>;
}

struct AsyncFn<F>(F);

impl<Ctx, F, Fut> Handler<Ctx> for AsyncFn<F>
where
    F: Fn(Ctx, Vec<Value>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    fn call(&self, ctx: Ctx, args: Vec<Value>) -> BoxFuture<'static, HandlerResult> {
        (self.0)(ctx, args).boxed()
    }
}

struct SyncFn<F>(F);

impl<Ctx, F> Handler<Ctx> for SyncFn<F>
where
    F: Fn(Ctx, Vec<Value>) -> HandlerResult + Send + Sync + 'static,
{
    fn call(&self, ctx: Ctx, args: Vec<Value>) -> BoxFuture<'static, HandlerResult> {
        futures::future::ready((self.0)(ctx, args)).boxed()
    }
}

/// Method name to handler table, given some caller-supplied context `Ctx`.
pub struct Implementation<Ctx> {
    handlers: HashMap<String, Arc<dyn Handler<Ctx>>>,
}

impl<Ctx: 'static> Implementation<Ctx> {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Register an async handler. A later registration replaces an earlier one.
    pub fn handler<F, Fut>(mut self, method: impl Into<String>, f: F) -> Self
    where
        F: Fn(Ctx, Vec<Value>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        self.handlers.insert(method.into(), Arc::new(AsyncFn(f)));
        self
    }

    /// Register a handler that completes without suspending.
    pub fn sync_handler<F>(mut self, method: impl Into<String>, f: F) -> Self
    where
        F: Fn(Ctx, Vec<Value>) -> HandlerResult + Send + Sync + 'static,
    {
        self.handlers.insert(method.into(), Arc::new(SyncFn(f)));
        self
    }

    /// Register a custom [`Handler`].
    pub fn with(mut self, method: impl Into<String>, handler: impl Handler<Ctx>) -> Self {
        self.handlers.insert(method.into(), Arc::new(handler));
        self
    }
}

impl<Ctx: 'static> Default for Implementation<Ctx> {
    fn default() -> Self {
        Self::new()
    }
}

/// Validates and routes calls for one protocol.
pub struct Dispatcher<Ctx> {
    protocol: Arc<Protocol>,
    handlers: HashMap<String, Arc<dyn Handler<Ctx>>>,
}

impl<Ctx: 'static> Dispatcher<Ctx> {
    /// Pair a protocol with its implementation.
    ///
    /// Every declared method needs a handler, and every handler a declared
    /// method.
    pub fn new(protocol: Protocol, implementation: Implementation<Ctx>) -> RpcResult<Self> {
        if let Some(missing) = protocol
            .method_names()
            .find(|name| !implementation.handlers.contains_key(*name))
        {
            return Err(RpcError::Protocol(format!(
                "no handler for method {}",
                missing
            )));
        }

        let mut undeclared: Vec<&String> = implementation
            .handlers
            .keys()
            .filter(|name| !protocol.contains(name))
            .collect();
        if !undeclared.is_empty() {
            undeclared.sort();
            return Err(RpcError::Protocol(format!(
                "handler for undeclared method {}",
                undeclared[0]
            )));
        }

        Ok(Self {
            protocol: Arc::new(protocol),
            handlers: implementation.handlers,
        })
    }

    pub fn protocol(&self) -> &Protocol {
        &self.protocol
    }

    /// Problems preventing this service from serving callers that expect
    /// `expected`.
    pub fn check_compatibility(&self, expected: &Protocol) -> Vec<String> {
        self.protocol.check_compatibility(expected)
    }

    /// Invoke without validation, for in-process callers.
    pub async fn call_trusted<I, V>(&self, method: &str, ctx: Ctx, args: I) -> RpcResult<Value>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let args = args.into_iter().map(Into::into).collect();
        self.invoke(method, ctx, args).await
    }

    /// Check `args` against the declared signature, then invoke.
    pub async fn call_checked(&self, method: &str, ctx: Ctx, args: Vec<Value>) -> RpcResult<Value> {
        let signature = self
            .protocol
            .get(method)
            .ok_or_else(|| RpcError::UnknownMethod(method.to_string()))?;
        check_args(&args, signature)?;
        self.invoke(method, ctx, args).await
    }

    /// Invoke by name without validation. Never use for external input.
    pub async fn call_unchecked(&self, method: &str, ctx: Ctx, args: Vec<Value>) -> RpcResult<Value> {
        self.invoke(method, ctx, args).await
    }

    async fn invoke(&self, method: &str, ctx: Ctx, args: Vec<Value>) -> RpcResult<Value> {
        let handler = self
            .handlers
            .get(method)
            .ok_or_else(|| RpcError::UnknownMethod(method.to_string()))?;
        handler
            .call(ctx, args)
            .await
            .map_err(|e| RpcError::Handler(e.message))
    }
}

/// Same outcome as asserting `args` against the tuple of declared argument
/// types, without building the tuple value on the success path.
fn check_args(args: &[Value], signature: &FunctionType) -> Result<(), TypeError> {
    let mut ok = args.len() == signature.args.len();
    if ok {
        for (arg, desc) in args.iter().zip(&signature.args) {
            if !conforms(arg, desc)? {
                ok = false;
                break;
            }
        }
    }

    if ok {
        Ok(())
    } else {
        Err(TypeError::ShapeMismatch {
            value: Value::Array(args.to_vec()).to_string(),
            expected: signature.args_tuple().display(),
        })
    }
}
