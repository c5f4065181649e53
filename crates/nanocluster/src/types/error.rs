// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type checking error types

use std::fmt;

/// Errors raised by conformance and assignability checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeError {
    /// A value does not conform to the expected descriptor.
    ShapeMismatch {
        /// Rendered offending value
        value: String,
        /// Canonical signature of the expected type
        expected: String,
    },

    /// A function-typed descriptor was reached while checking a value.
    UnsupportedCheck { descriptor: String },

    /// Assignability into a record type from an object or record source.
    UnsupportedAssignability { target: String, source: String },

    /// `source` is not assignable to `target`.
    NotAssignable { target: String, source: String },

    /// A descriptor in wire form could not be parsed.
    InvalidDescriptor(String),
}

impl TypeError {
    /// True for the two unsupported cases (function checks, record targets).
    pub fn is_unsupported(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedCheck { .. } | Self::UnsupportedAssignability { .. }
        )
    }
}

impl fmt::Display for TypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShapeMismatch { value, expected } => {
                write!(f, "{} is not a {}", value, expected)
            }
            Self::UnsupportedCheck { descriptor } => write!(
                f,
                "Unable to determine whether a value is a {} (function values cannot be checked)",
                descriptor
            ),
            Self::UnsupportedAssignability { target, source } => write!(
                f,
                "Assignability of {} from {} is not supported",
                target, source
            ),
            Self::NotAssignable { target, source } => {
                write!(f, "{} cannot accept assignment from {}", target, source)
            }
            Self::InvalidDescriptor(msg) => write!(f, "Invalid type descriptor: {}", msg),
        }
    }
}

impl std::error::Error for TypeError {}
