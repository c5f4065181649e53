// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Typed remote calls over opaque byte transports.
//!
//! # Overview
//!
//! - A [`Protocol`] names the methods a service exposes and their signatures
//! - A [`Dispatcher`] routes calls to an [`Implementation`]
//! - An [`RpcClient`] sends one envelope per call and unwraps the result
//! - An [`RpcServer`] checks, authenticates and dispatches incoming envelopes
//!
//! # Wire format
//!
//! ```text
//! request  = encode({ id, callBuf: encode({ method, args }), auth })
//! response = encode({ ok: value } | { err: message })
//! ```
//!
//! Call ids are 20 random bytes in base58. Failures of the call itself travel
//! inside the response; only transport and decoding problems surface as
//! [`RpcError::Transport`].
//!
//! # Example
//!
//! ```rust
//! use nanocluster::rpc::{CallContext, Implementation, LoopbackTransport, Protocol, RpcClient, RpcServer};
//! use nanocluster::types::typed::{function, string};
//! use nanocluster::Value;
//! use std::sync::Arc;
//!
//! # futures::executor::block_on(async {
//! let protocol = Protocol::builder()
//!     .method("hello", function([string()]).returns(string()))
//!     .build()?;
//!
//! let implementation = Implementation::new().sync_handler(
//!     "hello",
//!     |_ctx: CallContext<()>, args: Vec<Value>| {
//!         let name = args.first().and_then(Value::as_str).unwrap_or("stranger");
//!         Ok(Value::from(format!("hello {}", name)))
//!     },
//! );
//!
//! let server = Arc::new(RpcServer::new("greeter", protocol.clone(), implementation, ())?);
//! let client = RpcClient::builder(LoopbackTransport::new(server))
//!     .protocol(protocol)
//!     .build();
//!
//! let reply = client.call("hello", vec![Value::from("ada")]).await?;
//! assert_eq!(reply, Value::from("hello ada"));
//! # Ok::<(), nanocluster::rpc::RpcError>(())
//! # }).unwrap();
//! ```

mod call_id;
mod client;
mod dispatch;
mod error;
mod protocol;
mod server;
mod transport;
mod types;

pub use call_id::{generate_call_id, RandomSource, SystemRandomSource};
pub use client::{RemoteMethod, RpcClient, RpcClientBuilder};
pub use dispatch::{Dispatcher, Handler, HandlerError, HandlerResult, Implementation};
pub use error::{RpcError, RpcResult};
pub use protocol::{Protocol, ProtocolBuilder};
pub use server::{CallContext, RpcServer};
#[cfg(feature = "http")]
pub use transport::HttpTransport;
pub use transport::{LoopbackTransport, Transport};
pub use types::{call_type, envelope_type, result_type, CallPayload, CallResult, Envelope};
