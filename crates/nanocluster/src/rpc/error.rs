// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types for remote calls.

use crate::auth::AuthError;
use crate::codec::CodecError;
use crate::config::AUTH_FAILED_MESSAGE;
use crate::types::TypeError;
use std::fmt;

/// Result type for RPC operations
pub type RpcResult<T> = Result<T, RpcError>;

/// Errors that can occur during RPC operations
#[derive(Debug, Clone, PartialEq)]
pub enum RpcError {
    /// Method is not part of the protocol
    UnknownMethod(String),

    /// Arguments, envelope or response do not have the expected shape
    Shape(TypeError),

    /// Credential rejected (reason not disclosed to the caller)
    AuthInvalid,

    /// Transport failed or the response could not be decoded
    Transport(String),

    /// Failed to encode a request or reply
    Codec(CodecError),

    /// The callee answered `{ err: message }`
    Remote(String),

    /// The method handler failed
    Handler(String),

    /// Local authorization hook failed to produce a credential
    Auth(AuthError),

    /// Protocol or implementation definition is inconsistent
    Protocol(String),

    /// Peer protocol does not satisfy the expected one
    Incompatible(Vec<String>),

    /// Internal error (e.g. the random source failed)
    Internal(String),
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownMethod(name) => write!(f, "Method {} does not exist", name),
            Self::Shape(e) => write!(f, "{}", e),
            Self::AuthInvalid => f.write_str(AUTH_FAILED_MESSAGE),
            Self::Transport(msg) => write!(f, "RPC transport failed: {}", msg),
            Self::Codec(e) => write!(f, "RPC codec error: {}", e),
            Self::Remote(msg) | Self::Handler(msg) => f.write_str(msg),
            Self::Auth(e) => write!(f, "Failed to authorize call: {}", e),
            Self::Protocol(msg) => write!(f, "Invalid protocol: {}", msg),
            Self::Incompatible(problems) => {
                write!(f, "Incompatible protocol:")?;
                for problem in problems {
                    write!(f, "\n  {}", problem)?;
                }
                Ok(())
            }
            Self::Internal(msg) => write!(f, "Internal RPC error: {}", msg),
        }
    }
}

impl std::error::Error for RpcError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Shape(e) => Some(e),
            Self::Codec(e) => Some(e),
            Self::Auth(e) => Some(e),
            _ => None,
        }
    }
}

impl From<TypeError> for RpcError {
    fn from(e: TypeError) -> Self {
        Self::Shape(e)
    }
}

impl From<CodecError> for RpcError {
    fn from(e: CodecError) -> Self {
        Self::Codec(e)
    }
}

impl From<AuthError> for RpcError {
    fn from(e: AuthError) -> Self {
        Self::Auth(e)
    }
}
