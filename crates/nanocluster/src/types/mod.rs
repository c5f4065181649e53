// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Structural types as runtime data.
//!
//! Descriptors describe the shapes that cross a service boundary. Nothing
//! about a remote peer is known at compile time, so every argument list and
//! every response is checked against a descriptor when it arrives.
//!
//! # Features
//!
//! - **TypeDescriptor**: closed set of shapes (primitive, literal, array,
//!   tuple, object, record, union, unknown, function, buffer)
//! - **Conformance**: [`conforms`] / [`assert_conforms`] decide whether a value
//!   has a shape
//! - **Assignability**: [`is_assignable`] / [`assert_assignable`] decide
//!   structural subtyping between two shapes, function arguments contravariant
//! - **Wire form**: descriptors encode to and from [`Value`](crate::Value)
//! - **Typed layer**: [`Type<T>`] tags a descriptor with the Rust type its
//!   values parse into
//!
//! # Example
//!
//! ```rust
//! use nanocluster::types::{assert_conforms, is_assignable, TypeDescriptor};
//! use nanocluster::Value;
//!
//! let point = TypeDescriptor::object([
//!     ("x", TypeDescriptor::number()),
//!     ("y", TypeDescriptor::number()),
//! ]);
//! let value = Value::object([("x", Value::from(1)), ("y", Value::from(2))]);
//! assert_conforms(&value, &point).unwrap();
//!
//! let narrow = TypeDescriptor::function([TypeDescriptor::number()], TypeDescriptor::unknown());
//! let wide = TypeDescriptor::function(
//!     [TypeDescriptor::union([TypeDescriptor::number(), TypeDescriptor::string()])],
//!     TypeDescriptor::unknown(),
//! );
//! assert!(is_assignable(&narrow, &wide).unwrap());
//! ```

mod assignable;
mod conform;
mod descriptor;
mod display;
mod error;
pub mod typed;
mod wire;

pub use assignable::{assert_assignable, is_assignable};
pub use conform::{assert_conforms, conforms};
pub use descriptor::{Field, FunctionType, Literal, PrimitiveKind, TypeDescriptor};
pub use display::to_display_string;
pub use error::TypeError;
pub use typed::{FromValue, Type};
