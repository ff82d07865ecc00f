/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Models of the class database: raw JSON, and the validated domain model derived from it.

use std::fmt;

pub mod domain;
pub mod domain_mapping;
pub mod json;

/// Reason why the class database cannot be turned into bindings.
///
/// Each variant names the offending entry, so that the build output points at the culprit.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CodegenError {
    /// The JSON does not match the expected schema.
    Json(String),

    DuplicateClass { class: String },
    UnknownParent { class: String, parent: String },
    InheritanceCycle { class: String },

    /// A type of a parameter, return value or signal argument is not supported.
    UnknownType { entry: String, ty: String },

    /// Two methods of the same class map to the same Rust name.
    DuplicateMethod { entry: String },

    /// A non-virtual method has no hash, so its bind cannot be looked up.
    MissingHash { entry: String },

    /// A default value cannot be expressed for the parameter type.
    BadDefault { entry: String, value: String },

    /// Parameter kind that is not allowed in this position, e.g. a pointer in a signal or virtual method.
    UnsupportedParam { entry: String, ty: String },

    /// Enumerator value that does not fit the ordinal type: `i32` for enums, `u64` for bitfields.
    EnumValueOutOfRange { entry: String, value: i64 },
}

impl fmt::Display for CodegenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(msg) => write!(f, "malformed class database: {msg}"),
            Self::DuplicateClass { class } => write!(f, "class `{class}` is declared twice"),
            Self::UnknownParent { class, parent } => {
                write!(f, "class `{class}` inherits unknown class `{parent}`")
            }
            Self::InheritanceCycle { class } => write!(f, "class `{class}` is part of an inheritance cycle"),
            Self::UnknownType { entry, ty } => write!(f, "`{entry}`: unknown type `{ty}`"),
            Self::DuplicateMethod { entry } => write!(f, "`{entry}`: method name is not unique"),
            Self::MissingHash { entry } => write!(f, "`{entry}`: non-virtual method without hash"),
            Self::BadDefault { entry, value } => write!(f, "`{entry}`: unsupported default value `{value}`"),
            Self::UnsupportedParam { entry, ty } => write!(f, "`{entry}`: type `{ty}` not supported here"),
            Self::EnumValueOutOfRange { entry, value } => write!(f, "`{entry}`: value {value} out of range"),
        }
    }
}

impl std::error::Error for CodegenError {}
