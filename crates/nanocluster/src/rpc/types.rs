// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Wire shapes of a call.
//!
//! ```text
//! request  = encode({ id: string, callBuf: buffer, auth: unknown })
//! callBuf  = encode({ method: string, args: unknown[] })
//! response = encode({ ok: unknown } | { err: string })
//! ```

use super::error::RpcError;
use crate::types::typed::{array, buffer, object, string, unknown};
use crate::types::{FromValue, Type, TypeDescriptor, TypeError};
use crate::value::{Buffer, Value};

/// One call as transmitted: id, encoded payload and credential.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    /// Per-call random id, base58.
    pub id: String,
    /// Encoded [`CallPayload`].
    pub call_buf: Vec<u8>,
    /// Credential, `undefined` when absent.
    pub auth: Value,
}

impl Envelope {
    pub fn to_value(&self) -> Value {
        Value::object([
            ("id", Value::from(self.id.as_str())),
            ("callBuf", Value::Buffer(self.call_buf.clone())),
            ("auth", self.auth.clone()),
        ])
    }
}

impl FromValue for Envelope {
    fn from_value(mut value: Value) -> Result<Self, TypeError> {
        Ok(Self {
            id: String::from_value(value.take_field("id"))?,
            call_buf: Buffer::from_value(value.take_field("callBuf"))?.0,
            auth: value.take_field("auth"),
        })
    }
}

/// `{ id: string, callBuf: buffer, auth: unknown }`
pub fn envelope_type() -> Type<Envelope> {
    object([
        ("id", string().erase()),
        ("callBuf", buffer().erase()),
        ("auth", unknown().erase()),
    ])
}

/// Method name and positional arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct CallPayload {
    pub method: String,
    pub args: Vec<Value>,
}

impl CallPayload {
    pub fn to_value(&self) -> Value {
        Value::object([
            ("method", Value::from(self.method.as_str())),
            ("args", Value::Array(self.args.clone())),
        ])
    }
}

impl FromValue for CallPayload {
    fn from_value(mut value: Value) -> Result<Self, TypeError> {
        Ok(Self {
            method: String::from_value(value.take_field("method"))?,
            args: Vec::from_value(value.take_field("args"))?,
        })
    }
}

/// `{ method: string, args: unknown[] }`
pub fn call_type() -> Type<CallPayload> {
    object([
        ("method", string().erase()),
        ("args", array(unknown()).erase()),
    ])
}

/// `{ ok: inner } | { err: string }`
pub fn result_type(inner: impl Into<TypeDescriptor>) -> TypeDescriptor {
    TypeDescriptor::union([
        TypeDescriptor::object([("ok", inner.into())]),
        TypeDescriptor::object([("err", TypeDescriptor::string())]),
    ])
}

/// Outcome of one call, decoupled from transport success.
#[derive(Debug, Clone, PartialEq)]
pub enum CallResult {
    Ok(Value),
    Err(String),
}

impl CallResult {
    pub fn to_value(&self) -> Value {
        match self {
            Self::Ok(value) => Value::object([("ok", value.clone())]),
            Self::Err(message) => Value::object([("err", Value::from(message.as_str()))]),
        }
    }

    /// Check `value` against `result_type(unknown)` and classify it.
    ///
    /// An `err` key wins over `ok`. Anything else that conforms (any object,
    /// since `ok` may be undefined) is a success.
    pub fn from_value(value: Value) -> Result<Self, TypeError> {
        crate::types::assert_conforms(&value, &result_type(TypeDescriptor::unknown()))?;
        let mut value = value;
        if value.has_key("err") {
            return Ok(match value.take_field("err") {
                Value::String(message) => Self::Err(message),
                other => Self::Err(other.to_string()),
            });
        }
        Ok(Self::Ok(value.take_field("ok")))
    }

    /// `Ok(value)`, or [`RpcError::Remote`] carrying the message verbatim.
    pub fn into_result(self) -> Result<Value, RpcError> {
        match self {
            Self::Ok(value) => Ok(value),
            Self::Err(message) => Err(RpcError::Remote(message)),
        }
    }
}

impl From<Result<Value, RpcError>> for CallResult {
    fn from(result: Result<Value, RpcError>) -> Self {
        match result {
            Ok(value) => Self::Ok(value),
            Err(e) => Self::Err(e.to_string()),
        }
    }
}
