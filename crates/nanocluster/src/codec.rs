// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Binary object codec.
//!
//! The RPC layer only needs "value in, bytes out" and back. [`Codec`] is that
//! contract; [`BincodeCodec`] is the default implementation and round-trips
//! every [`Value`], binary blobs included.
//!
//! Decoding is bounded: messages over
//! [`MAX_MESSAGE_BYTES`](crate::config::MAX_MESSAGE_BYTES) and values nested
//! deeper than [`MAX_VALUE_DEPTH`](crate::config::MAX_VALUE_DEPTH) are
//! rejected with [`CodecError::Decode`].

use crate::config::MAX_MESSAGE_BYTES;
use crate::value::Value;
use bincode::Options;
use std::fmt;

/// Error raised when a value cannot be encoded or bytes cannot be decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Failed to serialize a value
    Encode(String),
    /// Failed to deserialize bytes
    Decode(String),
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Encode(msg) => write!(f, "encode failed: {}", msg),
            Self::Decode(msg) => write!(f, "decode failed: {}", msg),
        }
    }
}

impl std::error::Error for CodecError {}

/// Turns structured values into bytes and back.
pub trait Codec: Send + Sync + 'static {
    /// Serialize a value.
    fn encode(&self, value: &Value) -> Result<Vec<u8>, CodecError>;

    /// Deserialize bytes produced by [`Codec::encode`].
    fn decode(&self, bytes: &[u8]) -> Result<Value, CodecError>;
}

/// Default codec: bincode over the serde representation of [`Value`].
///
/// Fixed-width integers, little endian (the `bincode::serialize` layout).
#[derive(Debug, Clone, Copy, Default)]
pub struct BincodeCodec;

impl BincodeCodec {
    fn options() -> impl Options {
        bincode::DefaultOptions::new()
            .with_fixint_encoding()
            .allow_trailing_bytes()
            .with_limit(MAX_MESSAGE_BYTES)
    }
}

impl Codec for BincodeCodec {
    fn encode(&self, value: &Value) -> Result<Vec<u8>, CodecError> {
        Self::options()
            .serialize(value)
            .map_err(|e| CodecError::Encode(e.to_string()))
    }

    fn decode(&self, bytes: &[u8]) -> Result<Value, CodecError> {
        Self::options()
            .deserialize(bytes)
            .map_err(|e| CodecError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MAX_VALUE_DEPTH;

    #[test]
    fn bincode_roundtrips_nested_values() {
        let value = Value::object([
            ("id", Value::from("abc")),
            ("callBuf", Value::Buffer(vec![0, 1, 255])),
            ("auth", Value::Undefined),
            ("args", Value::from(vec![Value::Null, Value::from(1.25)])),
        ]);

        let bytes = BincodeCodec.encode(&value).expect("encode");
        assert_eq!(BincodeCodec.decode(&bytes).expect("decode"), value);
    }

    #[test]
    fn decode_rejects_garbage() {
        let err = BincodeCodec.decode(&[0xff, 0xff, 0xff, 0xff]).unwrap_err();
        assert!(matches!(err, CodecError::Decode(_)));
    }

    /// `depth` single-element arrays around a null, in the bincode layout.
    fn nested_array_bytes(depth: usize) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(depth * 12 + 4);
        for _ in 0..depth {
            bytes.extend_from_slice(&5u32.to_le_bytes());
            bytes.extend_from_slice(&1u64.to_le_bytes());
        }
        bytes.extend_from_slice(&1u32.to_le_bytes());
        bytes
    }

    fn nested_array(depth: usize) -> Value {
        (0..depth).fold(Value::Null, |inner, _| Value::Array(vec![inner]))
    }

    #[test]
    fn layout_matches_plain_bincode() {
        let value = nested_array(3);
        assert_eq!(BincodeCodec.encode(&value).unwrap(), nested_array_bytes(3));
        assert_eq!(
            BincodeCodec.encode(&value).unwrap(),
            bincode::serialize(&value).unwrap()
        );
    }

    #[test]
    fn nesting_up_to_the_limit_decodes() {
        let bytes = nested_array_bytes(MAX_VALUE_DEPTH);
        assert_eq!(
            BincodeCodec.decode(&bytes).unwrap(),
            nested_array(MAX_VALUE_DEPTH)
        );
    }

    #[test]
    fn nesting_past_the_limit_is_rejected() {
        let err = BincodeCodec
            .decode(&nested_array_bytes(MAX_VALUE_DEPTH + 1))
            .unwrap_err();
        assert!(matches!(&err, CodecError::Decode(msg) if msg.contains("nested deeper")));

        // Deep enough that unbounded recursion would exhaust the stack.
        assert!(BincodeCodec.decode(&nested_array_bytes(200_000)).is_err());
    }

    #[test]
    fn nested_objects_count_toward_the_limit() {
        let deep = (0..=MAX_VALUE_DEPTH).fold(Value::Null, |inner, _| {
            Value::object([("k", inner)])
        });
        let bytes = bincode::serialize(&deep).unwrap();
        assert!(BincodeCodec.decode(&bytes).is_err());
    }

    #[test]
    fn oversized_length_prefix_is_rejected() {
        let mut bytes = 7u32.to_le_bytes().to_vec();
        bytes.extend_from_slice(&u64::MAX.to_le_bytes());
        assert!(matches!(BincodeCodec.decode(&bytes), Err(CodecError::Decode(_))));
    }

    #[test]
    fn encoding_is_deterministic() {
        let a = Value::object([("b", Value::from(1)), ("a", Value::from(2))]);
        let b = Value::object([("a", Value::from(2)), ("b", Value::from(1))]);
        assert_eq!(BincodeCodec.encode(&a), BincodeCodec.encode(&b));
    }
}
