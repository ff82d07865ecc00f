/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::error::Error;
use std::fmt;

use crate::builtin::Variant;
use crate::meta::error::ConvertError;
use crate::meta::CallContext;
use crate::sys;
use crate::sys::{SignatureMismatch, VariantType};

/// Error capable of representing failed function calls.
///
/// Returned by the `try_` forms of vararg methods in the generated API, e.g.
/// [`Object::try_call()`](crate::classes::Object::try_call), and by the checked call path. Allows to inspect the
/// involved class and method via `class_name()` and `method_name()`, and the cause via [`kind()`](Self::kind).
///
/// # Possible error causes
/// - **Invalid method**: The method does not exist on the object.
/// - **Invalid argument**: The engine could not convert an argument to the declared parameter type.
/// - **Too many or too few arguments**: The number of arguments does not match the number of parameters.
/// - **Null instance**: The method was called on a null object.
/// - **Failed conversion**: A parameter or return value could not be converted on the host side.
/// - **Signature mismatch**: The staged arguments do not fit the method bind (only on the checked path).
pub struct CallError {
    b: Box<InnerCallError>,
}

#[derive(Debug)]
struct InnerCallError {
    class_name: String,
    function_name: String,
    call_expr: String,
    kind: CallErrorKind,
    source: Option<ConvertError>,
}

/// Cause of a [`CallError`].
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum CallErrorKind {
    InvalidMethod,

    /// Argument at `index` (0-based, counting all arguments) could not be converted by the engine.
    InvalidArgument {
        index: usize,
        expected: VariantType,
        actual: Option<VariantType>,
    },

    TooManyArguments {
        expected: usize,
        actual: usize,
    },

    TooFewArguments {
        expected: usize,
        actual: usize,
    },

    InstanceIsNull,

    MethodNotConst,

    /// A parameter of an inbound call could not be converted to its host type.
    ParamConversion { index: usize },

    /// The return value could not be converted to its host type.
    ReturnConversion,

    /// Staged arguments or return type do not fit the bind's recorded signature.
    SignatureMismatch(SignatureMismatch),

    /// Error code not known to this library.
    Unknown(i32),
}

impl fmt::Display for CallErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidMethod => write!(f, "method not found"),
            Self::InvalidArgument {
                index,
                expected,
                actual,
            } => {
                let actual = actual.map_or("?", VariantType::name);
                write!(
                    f,
                    "argument #{index}: cannot convert from {actual} to {}",
                    expected.name()
                )
            }
            Self::TooManyArguments { expected, actual } | Self::TooFewArguments { expected, actual } => {
                write!(
                    f,
                    "function has {expected} parameter{}, but received {actual} argument{}",
                    plural(*expected),
                    plural(*actual)
                )
            }
            Self::InstanceIsNull => write!(f, "instance is null"),
            Self::MethodNotConst => write!(f, "method is not const"),
            Self::ParamConversion { index } => write!(f, "parameter #{index} conversion"),
            Self::ReturnConversion => write!(f, "return value conversion"),
            Self::SignatureMismatch(mismatch) => write!(f, "signature mismatch: {mismatch}"),
            Self::Unknown(code) => write!(f, "unknown reason (error code {code})"),
        }
    }
}

impl CallError {
    /// Name of the class whose method failed. This is the static class, not the dynamic type of the object.
    pub fn class_name(&self) -> &str {
        &self.b.class_name
    }

    /// Name of the function or method that failed.
    pub fn method_name(&self) -> &str {
        &self.b.function_name
    }

    pub fn kind(&self) -> &CallErrorKind {
        &self.b.kind
    }

    // ------------------------------------------------------------------------------------------------------------------------------------------
    // Constructors returning Result<(), Self>; possible failure

    /// Checks the engine side of an outbound varcall.
    pub(crate) fn check_out_varcall(
        call_ctx: &CallContext,
        err: sys::GDExtensionCallError,
        explicit_args: &[Variant],
        varargs: &[Variant],
    ) -> Result<(), Self> {
        if err.error == sys::GDEXTENSION_CALL_OK {
            return Ok(());
        }

        let all_args = || explicit_args.iter().chain(varargs);
        let arg_count = explicit_args.len() + varargs.len();

        let sys::GDExtensionCallError {
            error,
            argument,
            expected,
        } = err;

        let kind = match error {
            sys::GDEXTENSION_CALL_ERROR_INVALID_METHOD => CallErrorKind::InvalidMethod,
            sys::GDEXTENSION_CALL_ERROR_INVALID_ARGUMENT => {
                let index = usize::try_from(argument).unwrap_or(0);
                CallErrorKind::InvalidArgument {
                    index,
                    expected: VariantType::try_from_sys(expected).unwrap_or_default(),
                    actual: all_args().nth(index).map(Variant::get_type),
                }
            }
            sys::GDEXTENSION_CALL_ERROR_TOO_MANY_ARGUMENTS => CallErrorKind::TooManyArguments {
                expected: usize::try_from(expected).unwrap_or(0),
                actual: arg_count,
            },
            sys::GDEXTENSION_CALL_ERROR_TOO_FEW_ARGUMENTS => CallErrorKind::TooFewArguments {
                expected: usize::try_from(expected).unwrap_or(0),
                actual: arg_count,
            },
            sys::GDEXTENSION_CALL_ERROR_INSTANCE_IS_NULL => CallErrorKind::InstanceIsNull,
            sys::GDEXTENSION_CALL_ERROR_METHOD_NOT_CONST => CallErrorKind::MethodNotConst,
            other => CallErrorKind::Unknown(other),
        };

        let explicit_str = join_args(explicit_args.iter());
        let vararg_str = if varargs.is_empty() {
            String::new()
        } else {
            format!(", [va] {}", join_args(varargs.iter()))
        };

        let mut call_error = Self::new(call_ctx, kind, None);
        call_error.b.call_expr = format!("{call_ctx}({explicit_str}{vararg_str})");
        Err(call_error)
    }

    // ------------------------------------------------------------------------------------------------------------------------------------------
    // Constructors returning Self; guaranteed failure

    pub(crate) fn failed_param_conversion(call_ctx: &CallContext, index: usize, err: ConvertError) -> Self {
        Self::new(call_ctx, CallErrorKind::ParamConversion { index }, Some(err))
    }

    pub(crate) fn failed_return_conversion(call_ctx: &CallContext, err: ConvertError) -> Self {
        Self::new(call_ctx, CallErrorKind::ReturnConversion, Some(err))
    }

    pub(crate) fn signature_mismatch(call_ctx: &CallContext, mismatch: SignatureMismatch) -> Self {
        Self::new(call_ctx, CallErrorKind::SignatureMismatch(mismatch), None)
    }

    fn new(call_ctx: &CallContext, kind: CallErrorKind, source: Option<ConvertError>) -> Self {
        let inner = InnerCallError {
            class_name: call_ctx.class_name.to_string(),
            function_name: call_ctx.function_name.to_string(),
            call_expr: format!("{call_ctx}()"),
            kind,
            source,
        };

        Self { b: Box::new(inner) }
    }

    /// Describes the error, optionally including the source conversion error.
    pub fn message(&self, with_source: bool) -> String {
        let InnerCallError {
            call_expr,
            kind,
            source,
            ..
        } = &*self.b;

        let source_str = match source {
            Some(err) if with_source => format!("\n  Source: {err}"),
            _ => String::new(),
        };

        format!("{call_expr}\n    Reason: {kind}{source_str}")
    }
}

impl fmt::Display for CallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = self.message(true);
        write!(f, "function call failed: {message}")
    }
}

impl fmt::Debug for CallError {
    // Delegate to inner box.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.b)
    }
}

impl Error for CallError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.b.kind {
            CallErrorKind::SignatureMismatch(mismatch) => Some(mismatch as &(dyn Error + 'static)),
            _ => self.b.source.as_ref().map(|err| err as &(dyn Error + 'static)),
        }
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Implementation

fn join_args<'a>(args: impl Iterator<Item = &'a Variant>) -> String {
    args.map(|arg| format!("{arg:?}")).collect::<Vec<_>>().join(", ")
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_mentions_context_and_source() {
        let ctx = CallContext::outbound("Node", "get_child");
        let err = CallError::failed_return_conversion(&ctx, ConvertError::new("bad value"));

        assert_eq!(err.class_name(), "Node");
        assert_eq!(err.method_name(), "get_child");
        assert_eq!(err.kind(), &CallErrorKind::ReturnConversion);
        assert_eq!(
            err.to_string(),
            "function call failed: Node::get_child()\n    Reason: return value conversion\n  Source: bad value"
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn signature_mismatch_kind() {
        let ctx = CallContext::outbound("Vector2Sum", "add");
        let mismatch = SignatureMismatch::Arity { expected: 2, actual: 1 };
        let err = CallError::signature_mismatch(&ctx, mismatch);

        assert_eq!(err.kind(), &CallErrorKind::SignatureMismatch(mismatch));
        assert!(err.message(false).ends_with("signature mismatch: expected 2 arguments, got 1"));
    }

    #[test]
    fn signature_mismatch_is_readable_and_chained() {
        let ctx = CallContext::outbound("Vector2Sum", "add");
        let mismatch = SignatureMismatch::Kind {
            index: 0,
            expected: sys::ArgKind::Primitive(VariantType::Float),
            actual: sys::ArgKind::Primitive(VariantType::Int),
        };
        let err = CallError::signature_mismatch(&ctx, mismatch);

        assert_eq!(
            err.to_string(),
            "function call failed: Vector2Sum::add()\n    Reason: signature mismatch: argument #0: expected Primitive(Float), got Primitive(Int)"
        );

        let source = err.source().expect("mismatch is the source");
        assert_eq!(source.to_string(), mismatch.to_string());
    }
}
