// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # nanocluster - typed RPC between services
//!
//! Runtime type descriptors, structural checks and a small authenticated
//! request/response protocol over any byte transport.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use nanocluster::auth::UsernamePasswordAuth;
//! use nanocluster::rpc::{Protocol, RpcClient, Transport};
//! use nanocluster::types::typed::{array, function, number};
//! use nanocluster::Value;
//!
//! # async fn run(transport: impl Transport) -> nanocluster::rpc::RpcResult<()> {
//! let protocol = Protocol::builder()
//!     .method("sum", function([array(number())]).returns(number()))
//!     .build()?;
//!
//! let client = RpcClient::builder(transport)
//!     .protocol(protocol)
//!     .authorize(UsernamePasswordAuth::new("alice", "s3cret"))
//!     .build();
//!
//! let total = client.call("sum", vec![Value::from(vec![1.0, 2.0])]).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +-------------------------------------------------------------+
//! |  rpc    Protocol | Dispatcher | RpcClient | RpcServer       |
//! +-------------------------------------------------------------+
//! |  auth   UsernamePasswordAuth | CredentialVerifier           |
//! +-------------------------------------------------------------+
//! |  types  TypeDescriptor | conforms | is_assignable | Type<T> |
//! +-------------------------------------------------------------+
//! |  codec  Value <-> bytes (bincode)                           |
//! +-------------------------------------------------------------+
//! ```
//!
//! ## Modules Overview
//!
//! - [`types`] - Type descriptors, conformance and assignability (start here)
//! - [`rpc`] - Protocols, dispatch, client and server
//! - [`auth`] - Per-call signed credentials
//! - [`codec`] - Binary object codec
//! - [`config`] - Constants and runtime configuration
//!
//! ## Features
//!
//! - `http`: [`rpc::HttpTransport`] built on reqwest

/// Per-call signed credentials.
pub mod auth;
/// Binary object codec contract and the bincode implementation.
pub mod codec;
/// Constants and runtime configuration.
pub mod config;
/// Protocols, dispatch, client, server and transports.
pub mod rpc;
/// Runtime type descriptors and structural checks.
pub mod types;
/// Dynamic values exchanged between peers.
pub mod value;

pub use codec::{BincodeCodec, Codec, CodecError};
pub use config::RpcConfig;
pub use rpc::{RpcClient, RpcError, RpcResult, RpcServer};
pub use types::{Type, TypeDescriptor, TypeError};
pub use value::Value;
