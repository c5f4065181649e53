// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Authentication error types

use crate::codec::CodecError;
use crate::types::TypeError;
use std::fmt;

/// Reasons a credential could not be produced or was rejected.
///
/// Every variant is distinct in logs. Callers across the wire only ever see
/// one generic failure.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthError {
    /// The `auth` value is not a `{ username, validUntil, sig }` credential.
    Malformed(TypeError),

    /// `validUntil` lies further ahead than the verifier tolerates.
    TooFarInFuture { valid_until: f64, limit: u64 },

    /// `validUntil` has passed.
    Expired { valid_until: f64, now: u64 },

    /// The credential store has no password for this user.
    UnknownUser(String),

    /// The digest does not match the expected one.
    SignatureMismatch,

    /// The call id was already accepted once (replay guard enabled).
    Replayed(String),

    /// Canonical encoding of the signed fields failed.
    Codec(CodecError),
}

impl AuthError {
    /// True for rejections of a presented credential, false for local failures.
    pub fn is_auth_failure(&self) -> bool {
        !matches!(self, Self::Codec(_))
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed(e) => write!(f, "Malformed credential: {}", e),
            Self::TooFarInFuture { valid_until, limit } => write!(
                f,
                "validUntil {} is too far in the future (limit {})",
                valid_until, limit
            ),
            Self::Expired { valid_until, now } => write!(
                f,
                "Credential no longer valid (validUntil {} passed, now {})",
                valid_until, now
            ),
            Self::UnknownUser(name) => write!(f, "Unknown user: {}", name),
            Self::SignatureMismatch => write!(f, "Invalid signature"),
            Self::Replayed(id) => write!(f, "Call id already used: {}", id),
            Self::Codec(e) => write!(f, "Credential encoding failed: {}", e),
        }
    }
}

impl std::error::Error for AuthError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Malformed(e) => Some(e),
            Self::Codec(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CodecError> for AuthError {
    fn from(e: CodecError) -> Self {
        Self::Codec(e)
    }
}
