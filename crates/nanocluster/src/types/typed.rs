// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Statically tagged descriptors.
//!
//! [`Type<T>`] pairs a runtime [`TypeDescriptor`] with a compile-time tag `T`
//! naming the Rust type a conforming value converts into. The tag has no
//! runtime representation; all checking still runs on the descriptor.
//!
//! ```
//! use nanocluster::types::typed::{array, number, object, string};
//! use nanocluster::Value;
//!
//! let tags = array(string());
//! let value = Value::from(vec!["a", "b"]);
//! assert_eq!(tags.parse(value).unwrap(), vec!["a".to_string(), "b".to_string()]);
//!
//! let point = object::<nanocluster::value::Map, _, _, _>([
//!     ("x", number().erase()),
//!     ("y", number().erase()),
//! ]);
//! assert_eq!(point.to_string(), "{ x: number, y: number }");
//! ```

use super::conform::{assert_conforms, conforms};
use super::descriptor::{Literal, TypeDescriptor};
use super::error::TypeError;
use crate::value::{Buffer, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

/// Conversion from a conforming [`Value`] into a Rust type.
pub trait FromValue: Sized {
    /// Convert, failing with [`TypeError::ShapeMismatch`] on the wrong shape.
    fn from_value(value: Value) -> Result<Self, TypeError>;
}

fn mismatch(value: &Value, expected: &str) -> TypeError {
    TypeError::ShapeMismatch {
        value: value.to_string(),
        expected: expected.to_string(),
    }
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self, TypeError> {
        Ok(value)
    }
}

/// Discards the value. Used for `null`, `undefined` and the empty tuple.
impl FromValue for () {
    fn from_value(_value: Value) -> Result<Self, TypeError> {
        Ok(())
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self, TypeError> {
        value.as_bool().ok_or_else(|| mismatch(&value, "boolean"))
    }
}

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self, TypeError> {
        value.as_f64().ok_or_else(|| mismatch(&value, "number"))
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self, TypeError> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(mismatch(&other, "string")),
        }
    }
}

impl FromValue for Buffer {
    fn from_value(value: Value) -> Result<Self, TypeError> {
        match value {
            Value::Buffer(bytes) => Ok(Buffer(bytes)),
            other => Err(mismatch(&other, "buffer")),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self, TypeError> {
        match value {
            Value::Undefined | Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: Value) -> Result<Self, TypeError> {
        match value {
            Value::Array(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(mismatch(&other, "array")),
        }
    }
}

impl<T: FromValue> FromValue for BTreeMap<String, T> {
    fn from_value(value: Value) -> Result<Self, TypeError> {
        match value {
            Value::Object(map) => map
                .into_iter()
                .map(|(k, v)| Ok((k, T::from_value(v)?)))
                .collect(),
            other => Err(mismatch(&other, "object")),
        }
    }
}

/// A descriptor tagged with the Rust type its values convert into.
pub struct Type<T> {
    desc: TypeDescriptor,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Type<T> {
    /// Tag an existing descriptor.
    ///
    /// Nothing ties `T` to `desc` at compile time; a wrong tag shows up as a
    /// conversion error from [`Type::parse`].
    pub fn from_descriptor(desc: TypeDescriptor) -> Self {
        Self {
            desc,
            _marker: PhantomData,
        }
    }

    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.desc
    }

    /// Drop the tag.
    pub fn erase(self) -> TypeDescriptor {
        self.desc
    }

    /// Same as [`conforms`] on the underlying descriptor.
    pub fn check(&self, value: &Value) -> Result<bool, TypeError> {
        conforms(value, &self.desc)
    }

    /// Same as [`assert_conforms`] on the underlying descriptor.
    pub fn assert(&self, value: &Value) -> Result<(), TypeError> {
        assert_conforms(value, &self.desc)
    }
}

impl<T: FromValue> Type<T> {
    /// Check `value` against the descriptor, then convert it.
    pub fn parse(&self, value: Value) -> Result<T, TypeError> {
        assert_conforms(&value, &self.desc)?;
        T::from_value(value)
    }
}

impl<T> Clone for Type<T> {
    fn clone(&self) -> Self {
        Self::from_descriptor(self.desc.clone())
    }
}

impl<T> PartialEq for Type<T> {
    fn eq(&self, other: &Self) -> bool {
        self.desc == other.desc
    }
}

impl<T> fmt::Debug for Type<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Type").field(&self.desc).finish()
    }
}

impl<T> fmt::Display for Type<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.desc, f)
    }
}

impl<T> From<Type<T>> for TypeDescriptor {
    fn from(ty: Type<T>) -> Self {
        ty.desc
    }
}

/// Tag for method signatures. Function values never convert: there is no
/// [`FromValue`] impl.
pub struct Method<R> {
    _marker: PhantomData<fn() -> R>,
}

/// Rust types that can be a literal, and what their values convert into.
pub trait IntoLiteral: Into<Literal> {
    type Output;
}

impl IntoLiteral for bool {
    type Output = bool;
}

impl IntoLiteral for f64 {
    type Output = f64;
}

impl IntoLiteral for i32 {
    type Output = f64;
}

impl IntoLiteral for &str {
    type Output = String;
}

impl IntoLiteral for String {
    type Output = String;
}

/// Heterogeneous element list for [`tuple`].
pub trait TypeList {
    type Output;

    fn into_descriptors(self) -> Vec<TypeDescriptor>;
}

impl TypeList for () {
    type Output = ();

    fn into_descriptors(self) -> Vec<TypeDescriptor> {
        Vec::new()
    }
}

macro_rules! impl_tuple {
    ($($name:ident $idx:tt),+) => {
        impl<$($name),+> TypeList for ($(Type<$name>,)+) {
            type Output = ($($name,)+);

            fn into_descriptors(self) -> Vec<TypeDescriptor> {
                vec![$(self.$idx.desc),+]
            }
        }

        impl<$($name: FromValue),+> FromValue for ($($name,)+) {
            fn from_value(value: Value) -> Result<Self, TypeError> {
                let expected = [$(stringify!($name)),+].len();
                match value {
                    Value::Array(items) if items.len() == expected => {
                        let mut items = items.into_iter();
                        Ok(($($name::from_value(items.next().unwrap_or_default())?,)+))
                    }
                    other => Err(mismatch(&other, &format!("tuple of {}", expected))),
                }
            }
        }
    };
}

impl_tuple!(A 0);
impl_tuple!(A 0, B 1);
impl_tuple!(A 0, B 1, C 2);
impl_tuple!(A 0, B 1, C 2, D 3);
impl_tuple!(A 0, B 1, C 2, D 3, E 4);

pub fn undefined() -> Type<()> {
    Type::from_descriptor(TypeDescriptor::undefined())
}

pub fn null() -> Type<()> {
    Type::from_descriptor(TypeDescriptor::null())
}

pub fn boolean() -> Type<bool> {
    Type::from_descriptor(TypeDescriptor::boolean())
}

pub fn number() -> Type<f64> {
    Type::from_descriptor(TypeDescriptor::number())
}

pub fn string() -> Type<String> {
    Type::from_descriptor(TypeDescriptor::string())
}

pub fn literal<L: IntoLiteral>(value: L) -> Type<L::Output> {
    Type::from_descriptor(TypeDescriptor::literal(value))
}

pub fn array<T>(element: Type<T>) -> Type<Vec<T>> {
    Type::from_descriptor(TypeDescriptor::array(element.desc))
}

/// `tuple((number(), string()))` is a `Type<(f64, String)>`.
pub fn tuple<L: TypeList>(elements: L) -> Type<L::Output> {
    Type::from_descriptor(TypeDescriptor::Tuple(elements.into_descriptors()))
}

/// Object with named fields. The output tag is chosen by the caller,
/// typically a struct implementing [`FromValue`] or `Map`.
pub fn object<T, I, K, D>(fields: I) -> Type<T>
where
    I: IntoIterator<Item = (K, D)>,
    K: Into<String>,
    D: Into<TypeDescriptor>,
{
    Type::from_descriptor(TypeDescriptor::object(fields))
}

pub fn record<K, V>(key: Type<K>, value: Type<V>) -> Type<BTreeMap<String, V>> {
    Type::from_descriptor(TypeDescriptor::record(key.desc, value.desc))
}

/// Union of options sharing one tag, e.g. a set of string literals.
pub fn union<T, I>(options: I) -> Type<T>
where
    I: IntoIterator<Item = Type<T>>,
{
    Type::from_descriptor(TypeDescriptor::Union(
        options.into_iter().map(|o| o.desc).collect(),
    ))
}

/// `T | undefined`, with missing values parsed as `None`.
pub fn optional<T>(inner: Type<T>) -> Type<Option<T>> {
    Type::from_descriptor(TypeDescriptor::union([
        TypeDescriptor::undefined(),
        inner.desc,
    ]))
}

pub fn unknown() -> Type<Value> {
    Type::from_descriptor(TypeDescriptor::Unknown)
}

pub fn buffer() -> Type<Buffer> {
    Type::from_descriptor(TypeDescriptor::Buffer)
}

/// Argument half of a function type; finish it with [`FunctionArgs::returns`].
#[derive(Debug, Clone)]
pub struct FunctionArgs {
    args: Vec<TypeDescriptor>,
}

impl FunctionArgs {
    pub fn returns<R>(self, ret: Type<R>) -> Type<Method<R>> {
        Type::from_descriptor(TypeDescriptor::function(self.args, ret.desc))
    }
}

/// `function([string().erase()]).returns(number())` is `(string) => number`.
pub fn function<I, D>(args: I) -> FunctionArgs
where
    I: IntoIterator<Item = D>,
    D: Into<TypeDescriptor>,
{
    FunctionArgs {
        args: args.into_iter().map(Into::into).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_converts_conforming_values() {
        let pair = tuple((number(), array(string())));
        let value = Value::from(vec![Value::from(2), Value::from(vec!["a"])]);
        assert_eq!(pair.parse(value), Ok((2.0, vec!["a".to_string()])));
    }

    #[test]
    fn parse_rejects_before_converting() {
        let err = number().parse(Value::from("7")).unwrap_err();
        assert_eq!(err.to_string(), "\"7\" is not a number");
    }

    #[test]
    fn literals_keep_their_rust_tag() {
        let mode = union([literal("on"), literal("off")]);
        assert_eq!(mode.to_string(), r#""on" | "off""#);
        assert_eq!(mode.parse(Value::from("off")), Ok("off".to_string()));
        assert!(mode.parse(Value::from("auto")).is_err());
    }

    #[test]
    fn optional_reads_missing_as_none() {
        let tag = optional(string());
        assert_eq!(tag.parse(Value::Undefined), Ok(None));
        assert_eq!(tag.parse(Value::from("x")), Ok(Some("x".to_string())));
        assert!(tag.parse(Value::Null).is_err());
    }

    #[test]
    fn record_parses_into_map() {
        let scores = record(string(), number());
        let parsed = scores
            .parse(Value::object([("a", Value::from(1)), ("b", Value::from(2))]))
            .unwrap();
        assert_eq!(parsed.get("b"), Some(&2.0));
    }

    #[test]
    fn function_builder_matches_untyped_constructor() {
        let method = function([string().erase(), unknown().erase()]).returns(unknown());
        assert_eq!(
            method.descriptor(),
            &TypeDescriptor::function(
                [TypeDescriptor::string(), TypeDescriptor::unknown()],
                TypeDescriptor::unknown()
            )
        );
        assert!(method.check(&Value::Null).unwrap_err().is_unsupported());
    }

    #[test]
    fn buffer_parses_bytes() {
        let bytes = buffer().parse(Value::Buffer(vec![1, 2, 3])).unwrap();
        assert_eq!(&*bytes, &[1, 2, 3]);
    }
}
