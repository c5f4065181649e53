// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type descriptors for runtime type information.

use crate::value::Value;
use std::sync::Arc;

/// Primitive type kinds.
///
/// `Null` and `Undefined` are distinct kinds; neither satisfies the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Undefined,
    Null,
    Boolean,
    Number,
    String,
}

impl PrimitiveKind {
    /// Canonical name, as used in signatures and the descriptor wire form.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::String => "string",
        }
    }

    /// Parse a canonical name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "undefined" => Some(Self::Undefined),
            "null" => Some(Self::Null),
            "boolean" => Some(Self::Boolean),
            "number" => Some(Self::Number),
            "string" => Some(Self::String),
            _ => None,
        }
    }

    /// Runtime kind of a value, if it is a primitive.
    pub fn of(value: &Value) -> Option<Self> {
        match value {
            Value::Undefined => Some(Self::Undefined),
            Value::Null => Some(Self::Null),
            Value::Bool(_) => Some(Self::Boolean),
            Value::Number(_) => Some(Self::Number),
            Value::String(_) => Some(Self::String),
            Value::Array(_) | Value::Object(_) | Value::Buffer(_) => None,
        }
    }
}

/// Concrete literal value.
///
/// Equality is strict, so `Number(NaN)` equals nothing, itself included. A NaN
/// literal therefore describes an empty type and is the one descriptor for
/// which assignability is not reflexive. The wire form refuses it.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Bool(bool),
    Number(f64),
    String(String),
}

impl Literal {
    /// Primitive kind this literal belongs to.
    pub fn kind(&self) -> PrimitiveKind {
        match self {
            Self::Bool(_) => PrimitiveKind::Boolean,
            Self::Number(_) => PrimitiveKind::Number,
            Self::String(_) => PrimitiveKind::String,
        }
    }

    /// Strict equality against a runtime value (`NaN` never matches).
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (Self::Bool(a), Value::Bool(b)) => a == b,
            (Self::Number(a), Value::Number(b)) => a == b,
            (Self::String(a), Value::String(b)) => a == b,
            _ => false,
        }
    }

    /// Convert to a runtime value.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Bool(v) => Value::Bool(*v),
            Self::Number(v) => Value::Number(*v),
            Self::String(v) => Value::String(v.clone()),
        }
    }
}

impl From<bool> for Literal {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<f64> for Literal {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<i32> for Literal {
    fn from(v: i32) -> Self {
        Self::Number(f64::from(v))
    }
}

impl From<&str> for Literal {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for Literal {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

/// Named member of an object type.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Field name.
    pub name: String,
    /// Field type.
    pub type_desc: TypeDescriptor,
}

impl Field {
    /// Create a new field descriptor.
    pub fn new(name: impl Into<String>, type_desc: impl Into<TypeDescriptor>) -> Self {
        Self {
            name: name.into(),
            type_desc: type_desc.into(),
        }
    }
}

/// Signature of a function type.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionType {
    /// Positional argument types.
    pub args: Vec<TypeDescriptor>,
    /// Return type.
    pub ret: Arc<TypeDescriptor>,
}

impl FunctionType {
    /// Tuple of the declared argument types, used to validate an argument list.
    pub fn args_tuple(&self) -> TypeDescriptor {
        TypeDescriptor::Tuple(self.args.clone())
    }
}

/// A structural type, as runtime data.
///
/// Exactly one shape per instance. Descriptors are immutable once built and
/// compare structurally; there is no identity.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDescriptor {
    /// `undefined`, `null`, `boolean`, `number` or `string`.
    Primitive(PrimitiveKind),
    /// A single concrete value.
    Literal(Literal),
    /// Homogeneous sequence of any length.
    Array(Arc<TypeDescriptor>),
    /// Fixed-length positional sequence.
    Tuple(Vec<TypeDescriptor>),
    /// Keyed structure with named fields (extra fields on values are ignored).
    Object(Vec<Field>),
    /// Homogeneous keyed map.
    Record {
        key: Arc<TypeDescriptor>,
        value: Arc<TypeDescriptor>,
    },
    /// Any of the options. An empty union is `never`.
    Union(Vec<TypeDescriptor>),
    /// Matches anything.
    Unknown,
    /// Method signature. Only describes protocol methods.
    Function(FunctionType),
    /// Opaque binary blob.
    Buffer,
}

impl TypeDescriptor {
    /// Create a primitive type descriptor.
    pub fn primitive(kind: PrimitiveKind) -> Self {
        Self::Primitive(kind)
    }

    pub fn undefined() -> Self {
        Self::Primitive(PrimitiveKind::Undefined)
    }

    pub fn null() -> Self {
        Self::Primitive(PrimitiveKind::Null)
    }

    pub fn boolean() -> Self {
        Self::Primitive(PrimitiveKind::Boolean)
    }

    pub fn number() -> Self {
        Self::Primitive(PrimitiveKind::Number)
    }

    pub fn string() -> Self {
        Self::Primitive(PrimitiveKind::String)
    }

    /// Create a literal type descriptor.
    ///
    /// A NaN number literal matches no value; see [`Literal`].
    pub fn literal(value: impl Into<Literal>) -> Self {
        Self::Literal(value.into())
    }

    /// Create an array type descriptor.
    pub fn array(element: impl Into<TypeDescriptor>) -> Self {
        Self::Array(Arc::new(element.into()))
    }

    /// Create a tuple type descriptor.
    pub fn tuple<I, D>(elements: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<TypeDescriptor>,
    {
        Self::Tuple(elements.into_iter().map(Into::into).collect())
    }

    /// Create an object type descriptor.
    ///
    /// Field order is kept for display. A repeated name replaces the earlier
    /// field in place.
    pub fn object<I, K, D>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, D)>,
        K: Into<String>,
        D: Into<TypeDescriptor>,
    {
        let mut out: Vec<Field> = Vec::new();
        for (name, type_desc) in fields {
            let field = Field::new(name, type_desc);
            match out.iter_mut().find(|f| f.name == field.name) {
                Some(existing) => *existing = field,
                None => out.push(field),
            }
        }
        Self::Object(out)
    }

    /// Create a record (keyed map) type descriptor.
    pub fn record(key: impl Into<TypeDescriptor>, value: impl Into<TypeDescriptor>) -> Self {
        Self::Record {
            key: Arc::new(key.into()),
            value: Arc::new(value.into()),
        }
    }

    /// Create a union type descriptor.
    pub fn union<I, D>(options: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<TypeDescriptor>,
    {
        Self::Union(options.into_iter().map(Into::into).collect())
    }

    pub fn unknown() -> Self {
        Self::Unknown
    }

    /// Create a function type descriptor.
    pub fn function<I, D>(args: I, ret: impl Into<TypeDescriptor>) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<TypeDescriptor>,
    {
        Self::Function(FunctionType {
            args: args.into_iter().map(Into::into).collect(),
            ret: Arc::new(ret.into()),
        })
    }

    pub fn buffer() -> Self {
        Self::Buffer
    }

    /// Get fields if this is an object type.
    pub fn fields(&self) -> Option<&[Field]> {
        match self {
            Self::Object(fields) => Some(fields),
            _ => None,
        }
    }

    /// Get field type by name.
    pub fn field(&self, name: &str) -> Option<&TypeDescriptor> {
        self.fields()?
            .iter()
            .find(|f| f.name == name)
            .map(|f| &f.type_desc)
    }

    /// Get the signature if this is a function type.
    pub fn as_function(&self) -> Option<&FunctionType> {
        match self {
            Self::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Check if this is a function type.
    pub fn is_function(&self) -> bool {
        matches!(self, Self::Function(_))
    }

    /// Canonical human-readable signature.
    pub fn display(&self) -> String {
        super::display::to_display_string(self)
    }
}

impl From<PrimitiveKind> for TypeDescriptor {
    fn from(kind: PrimitiveKind) -> Self {
        Self::Primitive(kind)
    }
}

impl From<Literal> for TypeDescriptor {
    fn from(lit: Literal) -> Self {
        Self::Literal(lit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_names_roundtrip() {
        for kind in [
            PrimitiveKind::Undefined,
            PrimitiveKind::Null,
            PrimitiveKind::Boolean,
            PrimitiveKind::Number,
            PrimitiveKind::String,
        ] {
            assert_eq!(PrimitiveKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(PrimitiveKind::from_name("bigint"), None);
    }

    #[test]
    fn test_object_fields() {
        let desc = TypeDescriptor::object([
            ("x", TypeDescriptor::number()),
            ("y", TypeDescriptor::string()),
            ("x", TypeDescriptor::boolean()),
        ]);
        assert_eq!(desc.fields().map(|f| f.len()), Some(2));
        assert_eq!(desc.field("x"), Some(&TypeDescriptor::boolean()));
        assert_eq!(desc.fields().map(|f| f[0].name.as_str()), Some("x"));
        assert!(desc.field("z").is_none());
    }

    #[test]
    fn test_structural_equality() {
        let a = TypeDescriptor::function([TypeDescriptor::string()], TypeDescriptor::unknown());
        let b = TypeDescriptor::function([TypeDescriptor::string()], TypeDescriptor::unknown());
        assert_eq!(a, b);
        assert!(a.is_function());
        assert_eq!(
            a.as_function().map(FunctionType::args_tuple),
            Some(TypeDescriptor::tuple([TypeDescriptor::string()]))
        );
    }

    #[test]
    fn test_literal_matching() {
        assert!(Literal::from("a").matches(&Value::from("a")));
        assert!(!Literal::from("a").matches(&Value::from("b")));
        assert!(!Literal::from(1).matches(&Value::from("1")));
        assert!(!Literal::Number(f64::NAN).matches(&Value::Number(f64::NAN)));
        assert_eq!(Literal::from(true).kind(), PrimitiveKind::Boolean);
    }
}
