// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Structural assignability (subtyping) between descriptors.
//!
//! `is_assignable(target, source)` answers: may a value shaped like `source`
//! be used wherever `target` is expected?
//!
//! # Rules
//!
//! - **Union source** (checked first): every option must be accepted
//! - **Union target**: some option must accept the source
//! - **Array**: accepts arrays and tuples whose elements it accepts
//! - **Tuple**: equal length, positional
//! - **Object**: width subtyping from objects; from records only when every
//!   required field is provably a literal key of the record
//! - **Record target**: from objects/records it is unsupported and raises
//!   `UnsupportedAssignability`
//! - **Function**: equal arity, arguments contravariant, return covariant

use super::descriptor::{Field, FunctionType, Literal, PrimitiveKind, TypeDescriptor};
use super::error::TypeError;

/// Decide whether `source` is assignable to `target`.
///
/// Fails only for the unsupported record-target case.
pub fn is_assignable(target: &TypeDescriptor, source: &TypeDescriptor) -> Result<bool, TypeError> {
    if let TypeDescriptor::Union(options) = source {
        for option in options {
            if !is_assignable(target, option)? {
                return Ok(false);
            }
        }
        return Ok(true);
    }

    match target {
        TypeDescriptor::Primitive(kind) => Ok(primitive_accepts(*kind, source)),

        TypeDescriptor::Literal(expected) => Ok(match source {
            TypeDescriptor::Literal(actual) => expected == actual,
            _ => false,
        }),

        TypeDescriptor::Array(element) => match source {
            TypeDescriptor::Array(source_element) => is_assignable(element, source_element),
            TypeDescriptor::Tuple(source_elements) => all_assignable_to(element, source_elements),
            _ => Ok(false),
        },

        TypeDescriptor::Tuple(elements) => match source {
            TypeDescriptor::Tuple(source_elements) if source_elements.len() == elements.len() => {
                for (t, s) in elements.iter().zip(source_elements) {
                    if !is_assignable(t, s)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            _ => Ok(false),
        },

        TypeDescriptor::Object(fields) => match source {
            TypeDescriptor::Object(source_fields) => object_from_object(fields, source_fields),
            TypeDescriptor::Record { key, value } => object_from_record(fields, key, value),
            _ => Ok(false),
        },

        TypeDescriptor::Record { .. } => match source {
            TypeDescriptor::Object(_) | TypeDescriptor::Record { .. } => {
                Err(TypeError::UnsupportedAssignability {
                    target: target.display(),
                    source: source.display(),
                })
            }
            _ => Ok(false),
        },

        TypeDescriptor::Union(options) => {
            for option in options {
                if is_assignable(option, source)? {
                    return Ok(true);
                }
            }
            Ok(false)
        }

        TypeDescriptor::Unknown => Ok(true),

        TypeDescriptor::Function(func) => match source {
            TypeDescriptor::Function(source_func) => function_from_function(func, source_func),
            _ => Ok(false),
        },

        TypeDescriptor::Buffer => Ok(matches!(source, TypeDescriptor::Buffer)),
    }
}

/// Fail with [`TypeError::NotAssignable`] unless `source` is assignable to `target`.
pub fn assert_assignable(target: &TypeDescriptor, source: &TypeDescriptor) -> Result<(), TypeError> {
    if is_assignable(target, source)? {
        Ok(())
    } else {
        Err(TypeError::NotAssignable {
            target: target.display(),
            source: source.display(),
        })
    }
}

fn primitive_accepts(kind: PrimitiveKind, source: &TypeDescriptor) -> bool {
    match source {
        TypeDescriptor::Primitive(source_kind) => *source_kind == kind,
        // Literals are never null; the null kind only accepts the null primitive.
        TypeDescriptor::Literal(lit) => lit.kind() == kind,
        _ => false,
    }
}

fn all_assignable_to(target: &TypeDescriptor, sources: &[TypeDescriptor]) -> Result<bool, TypeError> {
    for source in sources {
        if !is_assignable(target, source)? {
            return Ok(false);
        }
    }
    Ok(true)
}

fn object_from_object(target: &[Field], source: &[Field]) -> Result<bool, TypeError> {
    for target_field in target {
        let source_field = source.iter().find(|f| f.name == target_field.name);

        match source_field {
            Some(source_field) => {
                if !is_assignable(&target_field.type_desc, &source_field.type_desc)? {
                    return Ok(false);
                }
            }
            None => return Ok(false),
        }
    }

    Ok(true)
}

fn object_from_record(
    target: &[Field],
    key: &TypeDescriptor,
    value: &TypeDescriptor,
) -> Result<bool, TypeError> {
    let mut exact_keys = Vec::new();
    gather_exact_keys(key, &mut exact_keys);

    for target_field in target {
        if !exact_keys.contains(&target_field.name.as_str()) {
            return Ok(false);
        }
        if !is_assignable(&target_field.type_desc, value)? {
            return Ok(false);
        }
    }

    Ok(true)
}

/// Keys a record key type provably contains: string literals, through unions.
fn gather_exact_keys<'a>(key: &'a TypeDescriptor, out: &mut Vec<&'a str>) {
    match key {
        TypeDescriptor::Literal(Literal::String(s)) => out.push(s),
        TypeDescriptor::Union(options) => {
            for option in options {
                gather_exact_keys(option, out);
            }
        }
        _ => {}
    }
}

fn function_from_function(target: &FunctionType, source: &FunctionType) -> Result<bool, TypeError> {
    if target.args.len() != source.args.len() {
        return Ok(false);
    }

    // Arguments are contravariant: the source must accept everything the
    // target's callers may pass.
    for (target_arg, source_arg) in target.args.iter().zip(&source.args) {
        if !is_assignable(source_arg, target_arg)? {
            return Ok(false);
        }
    }

    is_assignable(&target.ret, &source.ret)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assignable(target: &TypeDescriptor, source: &TypeDescriptor) -> bool {
        is_assignable(target, source).expect("assignability check")
    }

    #[test]
    fn literal_widens_to_its_primitive() {
        assert!(assignable(&TypeDescriptor::string(), &TypeDescriptor::literal("a")));
        assert!(assignable(&TypeDescriptor::number(), &TypeDescriptor::literal(3)));
        assert!(!assignable(&TypeDescriptor::string(), &TypeDescriptor::literal(3)));
        assert!(!assignable(&TypeDescriptor::null(), &TypeDescriptor::literal("null")));
        assert!(!assignable(&TypeDescriptor::literal("a"), &TypeDescriptor::string()));
        assert!(!assignable(&TypeDescriptor::undefined(), &TypeDescriptor::null()));
    }

    #[test]
    fn literal_requires_equal_value() {
        assert!(assignable(&TypeDescriptor::literal("a"), &TypeDescriptor::literal("a")));
        assert!(!assignable(&TypeDescriptor::literal("a"), &TypeDescriptor::literal("b")));
        assert!(!assignable(&TypeDescriptor::literal(1), &TypeDescriptor::literal(true)));
    }

    #[test]
    fn union_source_must_be_uniformly_accepted() {
        let num_or_str = TypeDescriptor::union([TypeDescriptor::number(), TypeDescriptor::string()]);
        assert!(!assignable(&TypeDescriptor::number(), &num_or_str));
        assert!(assignable(&num_or_str, &num_or_str));
        assert!(assignable(
            &TypeDescriptor::union([
                TypeDescriptor::string(),
                TypeDescriptor::boolean(),
                TypeDescriptor::number(),
            ]),
            &num_or_str
        ));
        // never is assignable to anything
        assert!(assignable(&TypeDescriptor::buffer(), &TypeDescriptor::Union(vec![])));
    }

    #[test]
    fn object_width_subtyping() {
        let narrow = TypeDescriptor::object([("a", TypeDescriptor::number())]);
        let wide = TypeDescriptor::object([
            ("a", TypeDescriptor::literal(1)),
            ("b", TypeDescriptor::string()),
        ]);
        assert!(assignable(&narrow, &wide));
        assert!(!assignable(&wide, &narrow));
    }

    #[test]
    fn object_from_record_needs_literal_keys() {
        let target = TypeDescriptor::object([
            ("a", TypeDescriptor::number()),
            ("b", TypeDescriptor::number()),
        ]);
        let exact = TypeDescriptor::record(
            TypeDescriptor::union([TypeDescriptor::literal("a"), TypeDescriptor::literal("b")]),
            TypeDescriptor::literal(7),
        );
        let partial = TypeDescriptor::record(TypeDescriptor::literal("a"), TypeDescriptor::number());
        let open = TypeDescriptor::record(TypeDescriptor::string(), TypeDescriptor::number());
        let wrong_value = TypeDescriptor::record(
            TypeDescriptor::union([TypeDescriptor::literal("a"), TypeDescriptor::literal("b")]),
            TypeDescriptor::string(),
        );

        assert!(assignable(&target, &exact));
        assert!(!assignable(&target, &partial));
        assert!(!assignable(&target, &open));
        assert!(!assignable(&target, &wrong_value));
    }

    #[test]
    fn record_target_is_unsupported() {
        let target = TypeDescriptor::record(TypeDescriptor::string(), TypeDescriptor::number());
        let err = is_assignable(&target, &target).unwrap_err();
        assert!(matches!(err, TypeError::UnsupportedAssignability { .. }));

        let err = is_assignable(&target, &TypeDescriptor::Object(vec![])).unwrap_err();
        assert!(err.is_unsupported());

        assert!(!assignable(&target, &TypeDescriptor::number()));
    }

    #[test]
    fn function_arguments_are_contravariant() {
        let narrow = TypeDescriptor::function([TypeDescriptor::number()], TypeDescriptor::unknown());
        let wide = TypeDescriptor::function(
            [TypeDescriptor::union([TypeDescriptor::number(), TypeDescriptor::string()])],
            TypeDescriptor::unknown(),
        );
        assert!(assignable(&narrow, &wide));
        assert!(!assignable(&wide, &narrow));
    }

    #[test]
    fn function_return_is_covariant_and_arity_exact() {
        let returns_unknown =
            TypeDescriptor::function([TypeDescriptor::string()], TypeDescriptor::unknown());
        let returns_number =
            TypeDescriptor::function([TypeDescriptor::string()], TypeDescriptor::number());
        let binary = TypeDescriptor::function(
            [TypeDescriptor::string(), TypeDescriptor::string()],
            TypeDescriptor::number(),
        );

        assert!(assignable(&returns_unknown, &returns_number));
        assert!(!assignable(&returns_number, &returns_unknown));
        assert!(!assignable(&returns_number, &binary));
        assert!(!assignable(&returns_number, &TypeDescriptor::number()));
    }

    #[test]
    fn tuple_widens_to_array_but_not_back() {
        let numbers = TypeDescriptor::array(TypeDescriptor::number());
        let pair = TypeDescriptor::tuple([TypeDescriptor::number(), TypeDescriptor::number()]);
        let single = TypeDescriptor::tuple([TypeDescriptor::number()]);

        assert!(assignable(&numbers, &pair));
        assert!(!assignable(&single, &numbers));
        assert!(!assignable(&single, &pair));
        assert!(!assignable(
            &numbers,
            &TypeDescriptor::tuple([TypeDescriptor::number(), TypeDescriptor::string()])
        ));
    }

    #[test]
    fn assert_message_names_both_signatures() {
        let err = assert_assignable(&TypeDescriptor::buffer(), &TypeDescriptor::string())
            .unwrap_err();
        assert_eq!(err.to_string(), "buffer cannot accept assignment from string");
    }
}
