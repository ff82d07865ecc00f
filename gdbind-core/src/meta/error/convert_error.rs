/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::error::Error;
use std::fmt;

use crate::builtin::Variant;
use crate::sys::VariantType;

/// Represents errors that can occur when converting values from the engine.
///
/// To create user-defined errors, use [`ConvertError::new("message")`][Self::new].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConvertError {
    kind: ErrorKind,
    value: Option<String>,
}

impl ConvertError {
    /// Construct with a user-defined message.
    pub fn new(user_message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Custom(user_message.into()),
            value: None,
        }
    }

    pub(crate) fn with_kind(kind: ErrorKind) -> Self {
        Self { kind, value: None }
    }

    /// Create an error for a conversion, remembering the value that failed to convert.
    pub(crate) fn with_kind_value<V: fmt::Debug>(kind: ErrorKind, value: V) -> Self {
        Self {
            kind,
            value: Some(format!("{value:?}")),
        }
    }

    pub(crate) fn bad_type(expected: VariantType, actual: VariantType, value: &Variant) -> Self {
        let value = (actual != VariantType::Nil).then(|| value.stringify().to_string());

        Self {
            kind: ErrorKind::BadType { expected, actual },
            value,
        }
    }

    /// What went wrong.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Printed form of the value that failed to convert, if available.
    pub fn value_str(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

impl fmt::Display for ConvertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;

        if let Some(value) = &self.value {
            write!(f, ": {value}")?;
        }

        Ok(())
    }
}

impl Error for ConvertError {}

/// Categories of conversion failures.
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The variant holds a different type than requested.
    BadType {
        expected: VariantType,
        actual: VariantType,
    },

    /// An engine integer does not fit into the host integer type.
    IntOutOfRange { target: &'static str },

    /// An engine integer is not an ordinal of the enum.
    BadEnumOrdinal { enum_name: &'static str },

    /// A null object was passed where an instance is required.
    NullObject,

    /// The object is not an instance of the requested class.
    WrongClass { expected: &'static str },

    /// The object has already been freed.
    DeadObject,

    /// User-defined error.
    Custom(String),
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadType { expected, actual } => {
                write!(f, "expected type {}, got {}", expected.name(), actual.name())
            }
            Self::IntOutOfRange { target } => write!(f, "integer out of range for {target}"),
            Self::BadEnumOrdinal { enum_name } => write!(f, "invalid ordinal for enum {enum_name}"),
            Self::NullObject => write!(f, "object is null"),
            Self::WrongClass { expected } => write!(f, "object is not an instance of {expected}"),
            Self::DeadObject => write!(f, "object has been freed"),
            Self::Custom(message) => write!(f, "{message}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_value() {
        let err = ConvertError::with_kind_value(ErrorKind::BadEnumOrdinal { enum_name: "ProcessMode" }, 17);
        assert_eq!(err.to_string(), "invalid ordinal for enum ProcessMode: 17");
        assert_eq!(err.value_str(), Some("17"));

        let err = ConvertError::new("custom");
        assert_eq!(err.to_string(), "custom");
        assert_eq!(err.value_str(), None);
    }
}
