// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Descriptor wire form.
//!
//! Descriptors travel as single-key tagged objects so a peer can send the
//! signatures it expects and have them checked remotely:
//!
//! ```text
//! {primitive: "number"}      {literal: 3}               {array: <d>}
//! {tuple: [<d>..]}           {object: [[k, <d>]..]}     {record: {key, value}}
//! {union: [<d>..]}           {unknown: []}              {fn: {args, ret}}
//! {buffer: []}
//! ```
//!
//! Object fields travel as `[name, descriptor]` pairs so declaration order,
//! and with it equality and display, survives the trip.

use super::descriptor::{Field, Literal, PrimitiveKind, TypeDescriptor};
use super::error::TypeError;
use crate::value::{Map, Value};

fn tagged(tag: &str, payload: Value) -> Value {
    let mut map = Map::new();
    map.insert(tag.to_string(), payload);
    Value::Object(map)
}

fn invalid(msg: impl Into<String>) -> TypeError {
    TypeError::InvalidDescriptor(msg.into())
}

impl TypeDescriptor {
    /// Encode as a tagged value.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Primitive(kind) => tagged("primitive", Value::from(kind.name())),
            Self::Literal(lit) => tagged("literal", lit.to_value()),
            Self::Array(element) => tagged("array", element.to_value()),
            Self::Tuple(elements) => tagged(
                "tuple",
                Value::Array(elements.iter().map(Self::to_value).collect()),
            ),
            Self::Object(fields) => tagged(
                "object",
                Value::Array(
                    fields
                        .iter()
                        .map(|f| {
                            Value::Array(vec![Value::from(f.name.as_str()), f.type_desc.to_value()])
                        })
                        .collect(),
                ),
            ),
            Self::Record { key, value } => tagged(
                "record",
                Value::object([("key", key.to_value()), ("value", value.to_value())]),
            ),
            Self::Union(options) => tagged(
                "union",
                Value::Array(options.iter().map(Self::to_value).collect()),
            ),
            Self::Unknown => tagged("unknown", Value::Array(Vec::new())),
            Self::Function(func) => tagged(
                "fn",
                Value::object([
                    (
                        "args",
                        Value::Array(func.args.iter().map(Self::to_value).collect()),
                    ),
                    ("ret", func.ret.to_value()),
                ]),
            ),
            Self::Buffer => tagged("buffer", Value::Array(Vec::new())),
        }
    }

    /// Decode the tagged form produced by [`TypeDescriptor::to_value`].
    pub fn from_value(value: &Value) -> Result<Self, TypeError> {
        let map = value
            .as_object()
            .ok_or_else(|| invalid(format!("expected a tagged object, got {}", value)))?;
        if map.len() != 1 {
            return Err(invalid(format!(
                "expected exactly one tag, got {} keys",
                map.len()
            )));
        }
        let Some((tag, payload)) = map.iter().next() else {
            return Err(invalid("empty descriptor"));
        };

        match tag.as_str() {
            "primitive" => payload
                .as_str()
                .and_then(PrimitiveKind::from_name)
                .map(Self::Primitive)
                .ok_or_else(|| invalid(format!("unknown primitive {}", payload))),
            "literal" => match payload {
                Value::Bool(v) => Ok(Self::Literal(Literal::Bool(*v))),
                Value::Number(v) if v.is_nan() => Err(invalid("literal must not be NaN")),
                Value::Number(v) => Ok(Self::Literal(Literal::Number(*v))),
                Value::String(v) => Ok(Self::Literal(Literal::String(v.clone()))),
                other => Err(invalid(format!("literal must be a primitive, got {}", other))),
            },
            "array" => Ok(Self::array(Self::from_value(payload)?)),
            "tuple" => Ok(Self::Tuple(list_from_value(payload)?)),
            "object" => Ok(Self::Object(fields_from_value(payload)?)),
            "record" => Ok(Self::record(
                Self::from_value(required(payload, "key")?)?,
                Self::from_value(required(payload, "value")?)?,
            )),
            "union" => Ok(Self::Union(list_from_value(payload)?)),
            "unknown" => Ok(Self::Unknown),
            "fn" => Ok(Self::function(
                list_from_value(required(payload, "args")?)?,
                Self::from_value(required(payload, "ret")?)?,
            )),
            "buffer" => Ok(Self::Buffer),
            other => Err(invalid(format!("unknown tag {:?}", other))),
        }
    }
}

fn required<'a>(payload: &'a Value, key: &str) -> Result<&'a Value, TypeError> {
    payload
        .get(key)
        .ok_or_else(|| invalid(format!("missing {:?}", key)))
}

fn fields_from_value(value: &Value) -> Result<Vec<Field>, TypeError> {
    let pairs = value
        .as_array()
        .ok_or_else(|| invalid(format!("object fields must be a list of pairs, got {}", value)))?;
    let mut fields: Vec<Field> = Vec::with_capacity(pairs.len());
    for pair in pairs {
        let (name, desc) = match pair.as_array() {
            Some([Value::String(name), desc]) => (name, desc),
            _ => return Err(invalid(format!("expected a [name, descriptor] pair, got {}", pair))),
        };
        if fields.iter().any(|f| &f.name == name) {
            return Err(invalid(format!("duplicate field {:?}", name)));
        }
        fields.push(Field::new(name.clone(), TypeDescriptor::from_value(desc)?));
    }
    Ok(fields)
}

fn list_from_value(value: &Value) -> Result<Vec<TypeDescriptor>, TypeError> {
    value
        .as_array()
        .ok_or_else(|| invalid(format!("expected a list of descriptors, got {}", value)))?
        .iter()
        .map(TypeDescriptor::from_value)
        .collect()
}
