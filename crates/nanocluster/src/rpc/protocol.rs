// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Protocols: named method signatures exposed by a service.

use super::error::{RpcError, RpcResult};
use crate::types::{is_assignable, FunctionType, TypeDescriptor, TypeError};
use crate::value::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Immutable mapping from method name to function signature.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Protocol {
    methods: BTreeMap<String, FunctionType>,
}

impl Protocol {
    pub fn builder() -> ProtocolBuilder {
        ProtocolBuilder::default()
    }

    /// Signature of `method`, if declared.
    pub fn get(&self, method: &str) -> Option<&FunctionType> {
        self.methods.get(method)
    }

    pub fn contains(&self, method: &str) -> bool {
        self.methods.contains_key(method)
    }

    pub fn method_names(&self) -> impl Iterator<Item = &str> {
        self.methods.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FunctionType)> {
        self.methods.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// Function descriptor of `method`, if declared.
    pub fn descriptor(&self, method: &str) -> Option<TypeDescriptor> {
        self.get(method).cloned().map(TypeDescriptor::Function)
    }

    /// Encode as `{ method: <descriptor wire form> }`.
    pub fn to_value(&self) -> Value {
        Value::Object(
            self.methods
                .iter()
                .map(|(name, func)| (name.clone(), TypeDescriptor::Function(func.clone()).to_value()))
                .collect(),
        )
    }

    /// Decode the form produced by [`Protocol::to_value`].
    pub fn from_value(value: &Value) -> RpcResult<Self> {
        let map: &Map = value.as_object().ok_or_else(|| {
            RpcError::Shape(TypeError::InvalidDescriptor(format!(
                "protocol must be an object, got {}",
                value
            )))
        })?;

        let mut builder = Self::builder();
        for (name, desc) in map {
            builder = builder.method(name.as_str(), TypeDescriptor::from_value(desc)?);
        }
        builder.build()
    }

    /// Problems preventing `self` from serving callers that expect `expected`.
    ///
    /// Each method of `expected` must exist here with a signature assignable
    /// to the expected one. Empty means compatible.
    pub fn check_compatibility(&self, expected: &Protocol) -> Vec<String> {
        let mut problems = Vec::new();

        for (name, wanted) in &expected.methods {
            let wanted = TypeDescriptor::Function(wanted.clone());
            let Some(actual) = self.methods.get(name) else {
                problems.push(format!("missing method {}: expected {}", name, wanted));
                continue;
            };
            let actual = TypeDescriptor::Function(actual.clone());

            match is_assignable(&wanted, &actual) {
                Ok(true) => {}
                Ok(false) => problems.push(format!(
                    "method {}: expected {}, found {}",
                    name, wanted, actual
                )),
                Err(e) => problems.push(format!("method {}: {}", name, e)),
            }
        }

        problems
    }

    /// Like [`Protocol::check_compatibility`], as a single error.
    pub fn ensure_compatible(&self, expected: &Protocol) -> RpcResult<()> {
        let problems = self.check_compatibility(expected);
        if problems.is_empty() {
            Ok(())
        } else {
            Err(RpcError::Incompatible(problems))
        }
    }
}

/// One `name: signature` line per method.
impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, func)) in self.methods.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}: {}", name, TypeDescriptor::Function(func.clone()))?;
        }
        Ok(())
    }
}

/// Builder for [`Protocol`]. The first definition error is reported by `build`.
#[derive(Debug, Default)]
pub struct ProtocolBuilder {
    methods: BTreeMap<String, FunctionType>,
    error: Option<String>,
}

impl ProtocolBuilder {
    /// Declare a method. `signature` must be a function descriptor.
    pub fn method(mut self, name: impl Into<String>, signature: impl Into<TypeDescriptor>) -> Self {
        if self.error.is_some() {
            return self;
        }

        let name = name.into();
        match signature.into() {
            TypeDescriptor::Function(func) => {
                if self.methods.contains_key(&name) {
                    self.error = Some(format!("duplicate method {}", name));
                } else {
                    self.methods.insert(name, func);
                }
            }
            other => {
                self.error = Some(format!("method {} must be a function type, got {}", name, other));
            }
        }
        self
    }

    pub fn build(self) -> RpcResult<Protocol> {
        match self.error {
            Some(msg) => Err(RpcError::Protocol(msg)),
            None => Ok(Protocol {
                methods: self.methods,
            }),
        }
    }
}
