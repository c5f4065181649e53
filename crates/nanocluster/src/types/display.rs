// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Canonical signatures for diagnostics, e.g. `{ a: number, b: string[] }`.

use super::descriptor::{Literal, TypeDescriptor};
use crate::value::format_number;
use std::fmt::{self, Write};

/// Render a descriptor as a deterministic human-readable signature.
pub fn to_display_string(desc: &TypeDescriptor) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_type(&mut out, desc);
    out
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_type(f, self)
    }
}

fn write_list<W: Write>(out: &mut W, items: &[TypeDescriptor], sep: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.write_str(sep)?;
        }
        write_type(out, item)?;
    }
    Ok(())
}

fn write_type<W: Write>(out: &mut W, desc: &TypeDescriptor) -> fmt::Result {
    match desc {
        TypeDescriptor::Primitive(kind) => out.write_str(kind.name()),
        TypeDescriptor::Literal(Literal::Bool(v)) => write!(out, "{}", v),
        TypeDescriptor::Literal(Literal::Number(v)) => out.write_str(&format_number(*v)),
        TypeDescriptor::Literal(Literal::String(v)) => write!(out, "{:?}", v),
        TypeDescriptor::Array(element) => {
            // `string | number[]` would read as a union, so wrap compound elements.
            let wrap = matches!(
                element.as_ref(),
                TypeDescriptor::Union(_) | TypeDescriptor::Function(_)
            );
            if wrap {
                out.write_char('(')?;
                write_type(out, element)?;
                out.write_char(')')?;
            } else {
                write_type(out, element)?;
            }
            out.write_str("[]")
        }
        TypeDescriptor::Tuple(elements) => {
            out.write_char('[')?;
            write_list(out, elements, ", ")?;
            out.write_char(']')
        }
        TypeDescriptor::Object(fields) => {
            if fields.is_empty() {
                return out.write_str("{}");
            }
            out.write_str("{ ")?;
            for (i, field) in fields.iter().enumerate() {
                if i > 0 {
                    out.write_str(", ")?;
                }
                write!(out, "{}: ", field.name)?;
                write_type(out, &field.type_desc)?;
            }
            out.write_str(" }")
        }
        TypeDescriptor::Record { key, value } => {
            out.write_str("Record<")?;
            write_type(out, key)?;
            out.write_str(", ")?;
            write_type(out, value)?;
            out.write_char('>')
        }
        TypeDescriptor::Union(options) if options.is_empty() => out.write_str("never"),
        TypeDescriptor::Union(options) => write_list(out, options, " | "),
        TypeDescriptor::Unknown => out.write_str("unknown"),
        TypeDescriptor::Function(func) => {
            out.write_char('(')?;
            write_list(out, &func.args, ", ")?;
            out.write_str(") => ")?;
            write_type(out, &func.ret)
        }
        TypeDescriptor::Buffer => out.write_str("buffer"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_objects_and_arrays() {
        let desc = TypeDescriptor::object([
            ("a", TypeDescriptor::number()),
            ("b", TypeDescriptor::array(TypeDescriptor::string())),
        ]);
        assert_eq!(to_display_string(&desc), "{ a: number, b: string[] }");
        assert_eq!(to_display_string(&TypeDescriptor::Object(vec![])), "{}");
    }

    #[test]
    fn renders_functions() {
        let desc = TypeDescriptor::function(
            [TypeDescriptor::string(), TypeDescriptor::unknown()],
            TypeDescriptor::unknown(),
        );
        assert_eq!(desc.to_string(), "(string, unknown) => unknown");

        let nullary = TypeDescriptor::function(Vec::<TypeDescriptor>::new(), TypeDescriptor::null());
        assert_eq!(nullary.to_string(), "() => null");
    }

    #[test]
    fn wraps_union_elements() {
        let desc = TypeDescriptor::array(TypeDescriptor::union([
            TypeDescriptor::number(),
            TypeDescriptor::string(),
        ]));
        assert_eq!(desc.to_string(), "(number | string)[]");
        assert_eq!(TypeDescriptor::Union(vec![]).to_string(), "never");
    }

    #[test]
    fn renders_literals_records_and_tuples() {
        let desc = TypeDescriptor::tuple([
            TypeDescriptor::literal("on"),
            TypeDescriptor::literal(3),
            TypeDescriptor::literal(false),
            TypeDescriptor::record(TypeDescriptor::string(), TypeDescriptor::buffer()),
        ]);
        assert_eq!(
            desc.to_string(),
            r#"["on", 3, false, Record<string, buffer>]"#
        );
    }

    #[test]
    fn display_is_deterministic() {
        let build = || {
            TypeDescriptor::union([
                TypeDescriptor::object([("ok", TypeDescriptor::unknown())]),
                TypeDescriptor::object([("err", TypeDescriptor::string())]),
            ])
        };
        assert_eq!(build().display(), build().display());
        assert_eq!(build().display(), "{ ok: unknown } | { err: string }");
    }
}
