// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Value conformance: does a runtime value belong to a descriptor's shape?
//!
//! # Rules
//!
//! - **object**: every named field must conform; a missing field reads as
//!   `undefined`, and fields the descriptor does not name are ignored
//! - **tuple**: exact length, positional conformance
//! - **record**: every key (a string) and every value conform
//! - **function**: never decidable for a value, raises `UnsupportedCheck`

use super::descriptor::{PrimitiveKind, TypeDescriptor};
use super::error::TypeError;
use crate::value::Value;

/// Decide whether `value` conforms to `desc`.
///
/// Only fails when a function descriptor is reached.
pub fn conforms(value: &Value, desc: &TypeDescriptor) -> Result<bool, TypeError> {
    match desc {
        TypeDescriptor::Primitive(kind) => Ok(PrimitiveKind::of(value) == Some(*kind)),

        TypeDescriptor::Literal(lit) => Ok(lit.matches(value)),

        TypeDescriptor::Array(element) => match value {
            Value::Array(items) => {
                for item in items {
                    if !conforms(item, element)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            _ => Ok(false),
        },

        TypeDescriptor::Tuple(elements) => match value {
            Value::Array(items) if items.len() == elements.len() => {
                for (item, element) in items.iter().zip(elements) {
                    if !conforms(item, element)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            _ => Ok(false),
        },

        TypeDescriptor::Object(fields) => {
            if value.as_object().is_none() {
                return Ok(false);
            }
            for field in fields {
                if !conforms(value.field(&field.name), &field.type_desc)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }

        TypeDescriptor::Record { key, value: value_desc } => match value {
            Value::Object(map) => {
                for (k, v) in map {
                    if !conforms(&Value::String(k.clone()), key)? || !conforms(v, value_desc)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            _ => Ok(false),
        },

        TypeDescriptor::Union(options) => {
            for option in options {
                if conforms(value, option)? {
                    return Ok(true);
                }
            }
            Ok(false)
        }

        TypeDescriptor::Unknown => Ok(true),

        TypeDescriptor::Function(_) => Err(TypeError::UnsupportedCheck {
            descriptor: desc.display(),
        }),

        TypeDescriptor::Buffer => Ok(matches!(value, Value::Buffer(_))),
    }
}

/// Fail with [`TypeError::ShapeMismatch`] unless `value` conforms to `desc`.
pub fn assert_conforms(value: &Value, desc: &TypeDescriptor) -> Result<(), TypeError> {
    if conforms(value, desc)? {
        Ok(())
    } else {
        Err(TypeError::ShapeMismatch {
            value: value.to_string(),
            expected: desc.display(),
        })
    }
}
