// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dynamic values carried by call arguments, results and envelopes.
//!
//! `Value` is the shape the binary codec round-trips. It mirrors what a
//! JavaScript-flavoured peer can put on the wire: `undefined` and `null` are
//! distinct, every number is an `f64`, and objects are string-keyed maps.

use crate::config::MAX_VALUE_DEPTH;
use serde::de::{self, DeserializeSeed, EnumAccess, MapAccess, SeqAccess, Unexpected, VariantAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

/// String-keyed map used for object values (ordered, so encoding is canonical).
pub type Map = BTreeMap<String, Value>;

/// A dynamic value that can hold anything a type descriptor can describe.
///
/// Deserialization rejects values nested more than
/// [`MAX_VALUE_DEPTH`](crate::config::MAX_VALUE_DEPTH) arrays/objects deep.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    Object(Map),
    Buffer(Vec<u8>),
}

/// Opaque binary blob, the typed counterpart of [`Value::Buffer`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Buffer(pub Vec<u8>);

impl std::ops::Deref for Buffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl Value {
    /// Build an object value from `(key, value)` pairs.
    pub fn object<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Self::Object(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Check if value is undefined.
    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// Check if value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Try to get as bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Try to get as string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as array.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as object.
    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Self::Object(v) => Some(v),
            _ => None,
        }
    }

    /// Try to get as binary blob.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Buffer(v) => Some(v),
            _ => None,
        }
    }

    /// Get an object field. Missing fields and non-objects yield `None`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object()?.get(key)
    }

    /// Get an object field the way a dynamic language would: absent reads
    /// as `undefined`.
    pub fn field(&self, key: &str) -> &Value {
        static UNDEFINED: Value = Value::Undefined;
        self.get(key).unwrap_or(&UNDEFINED)
    }

    /// Check whether an object value has a key (even if its value is undefined).
    pub fn has_key(&self, key: &str) -> bool {
        self.as_object().is_some_and(|m| m.contains_key(key))
    }

    /// Remove one field from an object value, leaving `undefined` semantics behind.
    pub fn take_field(&mut self, key: &str) -> Value {
        match self {
            Self::Object(map) => map.remove(key).unwrap_or_default(),
            _ => Value::Undefined,
        }
    }
}

// Deserialization
//
// Hand-written so that nesting depth is bounded: a derived impl recurses once
// per level and a few kilobytes of nested arrays would exhaust the stack.

const VARIANTS: &[&str] = &[
    "Undefined", "Null", "Bool", "Number", "String", "Array", "Object", "Buffer",
];

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        ValueSeed { depth: 0 }.deserialize(deserializer)
    }
}

/// Variant index, accepted by position or by name.
struct Tag(u32);

impl<'de> Deserialize<'de> for Tag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_identifier(TagVisitor)
    }
}

struct TagVisitor;

impl<'de> Visitor<'de> for TagVisitor {
    type Value = Tag;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "variant index 0 <= i < {}", VARIANTS.len())
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Tag, E> {
        u32::try_from(v)
            .ok()
            .filter(|i| (*i as usize) < VARIANTS.len())
            .map(Tag)
            .ok_or_else(|| E::invalid_value(Unexpected::Unsigned(v), &self))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Tag, E> {
        VARIANTS
            .iter()
            .position(|name| *name == v)
            .map(|i| Tag(i as u32))
            .ok_or_else(|| E::unknown_variant(v, VARIANTS))
    }
}

/// Reads one value that sits inside `depth` arrays/objects.
#[derive(Clone, Copy)]
struct ValueSeed {
    depth: usize,
}

impl ValueSeed {
    fn nested<E: de::Error>(self) -> Result<Self, E> {
        let depth = self.depth + 1;
        if depth > MAX_VALUE_DEPTH {
            return Err(E::custom(format!(
                "value nested deeper than {} levels",
                MAX_VALUE_DEPTH
            )));
        }
        Ok(Self { depth })
    }
}

impl<'de> DeserializeSeed<'de> for ValueSeed {
    type Value = Value;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        deserializer.deserialize_enum("Value", VARIANTS, self)
    }
}

impl<'de> Visitor<'de> for ValueSeed {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a value")
    }

    fn visit_enum<A: EnumAccess<'de>>(self, data: A) -> Result<Value, A::Error> {
        let (Tag(index), variant) = data.variant::<Tag>()?;
        match index {
            0 => variant.unit_variant().map(|()| Value::Undefined),
            1 => variant.unit_variant().map(|()| Value::Null),
            2 => variant.newtype_variant().map(Value::Bool),
            3 => variant.newtype_variant().map(Value::Number),
            4 => variant.newtype_variant().map(Value::String),
            5 => variant.newtype_variant_seed(ArraySeed(self.nested()?)),
            6 => variant.newtype_variant_seed(ObjectSeed(self.nested()?)),
            _ => variant.newtype_variant().map(Value::Buffer),
        }
    }
}

struct ArraySeed(ValueSeed);

impl<'de> DeserializeSeed<'de> for ArraySeed {
    type Value = Value;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        deserializer.deserialize_seq(self)
    }
}

impl<'de> Visitor<'de> for ArraySeed {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an array of values")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        // Length prefixes are untrusted; grow as elements actually arrive.
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0).min(4096));
        while let Some(item) = seq.next_element_seed(self.0)? {
            items.push(item);
        }
        Ok(Value::Array(items))
    }
}

struct ObjectSeed(ValueSeed);

impl<'de> DeserializeSeed<'de> for ObjectSeed {
    type Value = Value;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        deserializer.deserialize_map(self)
    }
}

impl<'de> Visitor<'de> for ObjectSeed {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string-keyed map of values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Value, A::Error> {
        let mut out = Map::new();
        while let Some((key, value)) = map.next_entry_seed(PhantomData::<String>, self.0)? {
            out.insert(key, value);
        }
        Ok(Value::Object(out))
    }
}

/// Render a number the way a JavaScript peer prints it (`42`, `1.5`, `NaN`).
pub(crate) fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let sign = if n > 0.0 { "" } else { "-" };
        format!("{}Infinity", sign)
    } else if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

fn write_json_str(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    match serde_json::to_string(s) {
        Ok(quoted) => f.write_str(&quoted),
        Err(_) => write!(f, "{:?}", s),
    }
}

/// JSON-like rendering used in diagnostics.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => f.write_str("undefined"),
            Self::Null => f.write_str("null"),
            Self::Bool(v) => write!(f, "{}", v),
            Self::Number(v) => f.write_str(&format_number(*v)),
            Self::String(v) => write_json_str(f, v),
            Self::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Self::Object(map) => {
                f.write_str("{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write_json_str(f, k)?;
                    write!(f, ":{}", v)?;
                }
                f.write_str("}")
            }
            Self::Buffer(bytes) => write!(f, "<buffer {} bytes>", bytes.len()),
        }
    }
}

// Conversion traits
impl From<()> for Value {
    fn from(_: ()) -> Self {
        Self::Undefined
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Number(f64::from(v))
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Number(f64::from(v))
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Self::Number(f64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Number(v as f64)
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Self::Number(v as f64)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<Buffer> for Value {
    fn from(v: Buffer) -> Self {
        Self::Buffer(v.0)
    }
}

impl From<Map> for Value {
    fn from(v: Map) -> Self {
        Self::Object(v)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Self::Array(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Undefined, Into::into)
    }
}
