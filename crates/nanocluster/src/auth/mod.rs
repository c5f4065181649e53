// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Signed, time-bounded call credentials.
//!
//! The transport offers no authentication of its own, so each call carries a
//! credential bound to that call's id and payload:
//!
//! ```text
//! Client                                   Server
//!   | id, callBuf                            |
//!   | sig = Keccak256({user, pw, id,         |
//!   |        callBuf, validUntil})           |
//!   |--- {id, callBuf, auth: {username,     ->|
//!   |        validUntil, sig}}               | shape, expiry window,
//!   |                                        | lookup pw, recompute sig
//! ```
//!
//! A captured credential stays usable for the same `{id, callBuf}` until it
//! expires. [`ReplayGuard`] closes that window when enabled in
//! [`RpcConfig`](crate::config::RpcConfig).

mod clock;
mod credential;
mod error;
mod signer;
mod verifier;

pub use clock::{Clock, ManualClock, SystemClock};
pub use credential::{credential_digest, credential_type, AuthCredential};
pub use error::AuthError;
pub use signer::{Authorize, NoAuth, UsernamePasswordAuth};
pub use verifier::{CredentialStore, CredentialVerifier, ReplayGuard, StaticCredentialStore};
