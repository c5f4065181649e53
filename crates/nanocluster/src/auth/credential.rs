// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Username/password credential and its signature.
//!
//! ```text
//! sig = Keccak256(encode({ callBuf, id, password, username, validUntil }))
//! ```
//!
//! The signed object is encoded with the same [`Codec`] as the call, so both
//! sides must share one. Object keys are ordered, which makes the encoding
//! canonical.

use crate::codec::{Codec, CodecError};
use crate::types::typed::{buffer, number, object, string};
use crate::types::{FromValue, Type, TypeError};
use crate::value::Value;
use sha3::{Digest, Keccak256};

/// Credential attached to one outgoing call.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthCredential {
    pub username: String,
    /// Expiry, milliseconds since the Unix epoch.
    pub valid_until: f64,
    /// Keccak-256 digest binding the user, the call and the expiry.
    pub sig: Vec<u8>,
}

impl AuthCredential {
    pub fn to_value(&self) -> Value {
        Value::object([
            ("username", Value::from(self.username.as_str())),
            ("validUntil", Value::Number(self.valid_until)),
            ("sig", Value::Buffer(self.sig.clone())),
        ])
    }
}

impl FromValue for AuthCredential {
    fn from_value(mut value: Value) -> Result<Self, TypeError> {
        Ok(Self {
            username: String::from_value(value.take_field("username"))?,
            valid_until: f64::from_value(value.take_field("validUntil"))?,
            sig: crate::value::Buffer::from_value(value.take_field("sig"))?.0,
        })
    }
}

/// `{ username: string, validUntil: number, sig: buffer }`
pub fn credential_type() -> Type<AuthCredential> {
    object([
        ("username", string().erase()),
        ("validUntil", number().erase()),
        ("sig", buffer().erase()),
    ])
}

/// Digest over the canonical encoding of every signed field.
pub fn credential_digest(
    codec: &dyn Codec,
    username: &str,
    password: &str,
    id: &str,
    call_buf: &[u8],
    valid_until: f64,
) -> Result<Vec<u8>, CodecError> {
    let signed = Value::object([
        ("username", Value::from(username)),
        ("password", Value::from(password)),
        ("id", Value::from(id)),
        ("callBuf", Value::Buffer(call_buf.to_vec())),
        ("validUntil", Value::Number(valid_until)),
    ]);
    let bytes = codec.encode(&signed)?;
    Ok(Keccak256::digest(&bytes).to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::BincodeCodec;

    #[test]
    fn credential_value_matches_descriptor() {
        let cred = AuthCredential {
            username: "alice".to_string(),
            valid_until: 1_700_000_015_000.0,
            sig: vec![7; 32],
        };
        let parsed = credential_type().parse(cred.to_value()).unwrap();
        assert_eq!(parsed, cred);
    }

    #[test]
    fn descriptor_rejects_partial_credentials() {
        let value = Value::object([
            ("username", Value::from("alice")),
            ("validUntil", Value::from("tomorrow")),
            ("sig", Value::Buffer(vec![1])),
        ]);
        assert!(credential_type().parse(value).is_err());
        assert!(credential_type().parse(Value::Null).is_err());
    }

    #[test]
    fn digest_binds_every_field() {
        let codec = BincodeCodec;
        let base = credential_digest(&codec, "u", "p", "id", b"call", 10.0).unwrap();
        assert_eq!(base.len(), 32);
        assert_eq!(
            base,
            credential_digest(&codec, "u", "p", "id", b"call", 10.0).unwrap()
        );

        let variants = [
            credential_digest(&codec, "v", "p", "id", b"call", 10.0).unwrap(),
            credential_digest(&codec, "u", "q", "id", b"call", 10.0).unwrap(),
            credential_digest(&codec, "u", "p", "id2", b"call", 10.0).unwrap(),
            credential_digest(&codec, "u", "p", "id", b"calL", 10.0).unwrap(),
            credential_digest(&codec, "u", "p", "id", b"call", 11.0).unwrap(),
        ];
        for other in &variants {
            assert_ne!(&base, other);
        }
    }
}
