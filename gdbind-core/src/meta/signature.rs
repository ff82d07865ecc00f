/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;
use std::marker::PhantomData;
use std::panic::AssertUnwindSafe;

use crate::builtin::Variant;
use crate::meta::error::{CallError, ConvertError};
use crate::meta::{FromGodot, GodotConvert, InParamTuple, OutParamTuple, ToGodot};
use crate::sys;
use sys::{EngineFfi, MethodBindEntry};

/// A full signature for a function.
///
/// For in-calls (that is, calls from the engine to host code) `Params` will implement [`InParamTuple`] and `Ret`
/// will implement [`ToGodot`].
///
/// For out-calls (that is, calls from host code to the engine) `Params` will implement [`OutParamTuple`] and `Ret`
/// will implement [`FromGodot`].
#[doc(hidden)]
pub struct Signature<Params, Ret> {
    _p: PhantomData<Params>,
    _r: PhantomData<Ret>,
}

/// In-calls:
///
/// Calls going from the engine to host code.
impl<Params: InParamTuple, Ret: ToGodot> Signature<Params, Ret> {
    /// Receive a ptrcall from the engine, and write the return value to `ret`.
    ///
    /// A panic in parameter conversion or in `func` is caught and reported. The return slot then receives the
    /// default value of the return type, so the engine never reads uninitialized memory.
    ///
    /// # Safety
    /// A call to this function must be caused by the engine making a ptrcall with parameters `Params` and return
    /// type `Ret`.
    pub unsafe fn in_ptrcall(
        call_ctx: &CallContext,
        args_ptr: *const sys::GDExtensionConstTypePtr,
        ret: sys::GDExtensionTypePtr,
        call_type: sys::PtrcallType,
        func: impl FnOnce(Params) -> Ret,
    ) where
        Ret::Via: Default,
    {
        sys::out!("in_ptrcall: {call_ctx}");

        #[cfg(feature = "trace")]
        trace::push(true, true, call_ctx);

        let outcome = std::panic::catch_unwind(AssertUnwindSafe(|| {
            let params = match Params::from_ptrcall_args(args_ptr, call_type) {
                Ok(params) => params,
                Err((index, err)) => panic!("{}", CallError::failed_param_conversion(call_ctx, index, err)),
            };

            func(params).to_godot()
        }));

        let value = match outcome {
            Ok(value) => value,
            Err(err) => {
                crate::private::report_panic(call_ctx, err);
                <Ret::Via as Default>::default()
            }
        };

        value.move_return_ptr(ret, call_type);
    }
}

/// Out-calls:
///
/// Calls going from host code to the engine.
impl<Params: OutParamTuple, Ret: FromGodot> Signature<Params, Ret> {
    /// Make a ptrcall to the engine for a class method, identified by its index in the method table.
    ///
    /// # Panics
    /// If the return value cannot be converted to `Ret`, or (with call checks enabled) if `Params`/`Ret` do not
    /// match the bind.
    ///
    /// # Safety
    /// `object_ptr` must be a live instance of the bind's class.
    pub unsafe fn out_class_ptrcall(method_index: usize, object_ptr: sys::GDExtensionObjectPtr, args: Params) -> Ret {
        let entry = sys::method_table().by_index(method_index);
        let call_ctx = CallContext::outbound(entry.class_name(), entry.method_name());
        sys::out!("out_class_ptrcall: {call_ctx}");

        #[cfg(feature = "trace")]
        trace::push(false, true, &call_ctx);

        let via = args.ptrcall_class::<Ret::Via>(entry, object_ptr);
        Self::finish_ptrcall(via, &call_ctx)
    }

    /// Make a ptrcall to the engine, validating the signature before the call regardless of configuration.
    ///
    /// A mismatch is returned as a [`CallError`] and nothing crosses the boundary.
    ///
    /// # Safety
    /// `object_ptr` must be a live instance of the bind's class.
    pub unsafe fn out_class_ptrcall_checked(
        entry: &MethodBindEntry,
        object_ptr: sys::GDExtensionObjectPtr,
        args: Params,
    ) -> Result<Ret, CallError> {
        let call_ctx = CallContext::outbound(entry.class_name(), entry.method_name());

        #[cfg(feature = "trace")]
        trace::push(false, true, &call_ctx);

        let via = args
            .try_ptrcall_class::<Ret::Via>(entry, object_ptr)
            .map_err(|mismatch| CallError::signature_mismatch(&call_ctx, mismatch))?;

        Ret::try_from_godot(via).map_err(|err| CallError::failed_return_conversion(&call_ctx, err))
    }

    /// Make a varcall to the engine for a class method, with explicit arguments followed by `varargs`.
    ///
    /// # Safety
    /// `object_ptr` must be a live instance of the bind's class.
    pub unsafe fn out_class_varcall(
        method_index: usize,
        object_ptr: sys::GDExtensionObjectPtr,
        args: Params,
        varargs: &[Variant],
    ) -> Result<Ret, CallError> {
        let entry = sys::method_table().by_index(method_index);
        let call_ctx = CallContext::outbound(entry.class_name(), entry.method_name());
        sys::out!("out_class_varcall: {call_ctx}");

        #[cfg(feature = "trace")]
        trace::push(false, false, &call_ctx);

        let explicit_args = args.to_variant_array();

        let mut variant_ptrs = Vec::with_capacity(explicit_args.len() + varargs.len());
        variant_ptrs.extend(explicit_args.iter().map(Variant::var_sys));
        variant_ptrs.extend(varargs.iter().map(Variant::var_sys));

        let class_fn = sys::interface_fn!(object_method_bind_call);
        let mut err = sys::default_call_error();

        let ret = Variant::new_with_var_uninit(|return_ptr| {
            class_fn(
                entry.bind(),
                object_ptr,
                variant_ptrs.as_ptr(),
                variant_ptrs.len() as i64,
                return_ptr,
                &mut err,
            )
        });

        CallError::check_out_varcall(&call_ctx, err, &explicit_args, varargs)?;
        Ret::try_from_variant(&ret).map_err(|err| CallError::failed_return_conversion(&call_ctx, err))
    }

    /// Make a ptrcall to the engine for a builtin method.
    ///
    /// # Safety
    /// `builtin_fn` must expect `args` and return `Ret`; `type_ptr` must point to a live value of its type.
    pub unsafe fn out_builtin_ptrcall(
        builtin_fn: sys::BuiltinMethodBind,
        // Separate parameters to keep call sites short.
        class_name: &'static str,
        method_name: &'static str,
        type_ptr: sys::GDExtensionTypePtr,
        args: Params,
    ) -> Ret {
        let call_ctx = CallContext::outbound(class_name, method_name);
        sys::out!("out_builtin_ptrcall: {call_ctx}");

        let via = args.ptrcall_builtin::<Ret::Via>(builtin_fn, type_ptr);
        Self::finish_ptrcall(via, &call_ctx)
    }

    fn finish_ptrcall(via: <Ret as GodotConvert>::Via, call_ctx: &CallContext) -> Ret {
        Ret::try_from_godot(via).unwrap_or_else(|err| return_error::<Ret>(call_ctx, err))
    }
}

fn return_error<R>(call_ctx: &CallContext, err: ConvertError) -> ! {
    let return_ty = std::any::type_name::<R>();
    panic!("in function `{call_ctx}` at return type {return_ty}: {err}");
}

// ----------------------------------------------------------------------------------------------------------------------------------------------

// Lazy Display, so we don't create tens of thousands of extra string literals.
#[derive(Clone, Debug)]
#[doc(hidden)]
pub struct CallContext<'a> {
    pub(crate) class_name: &'a str,
    pub(crate) function_name: &'a str,
}

impl<'a> CallContext<'a> {
    /// Call from the engine into a host function, e.g. a virtual method override.
    pub const fn func(class_name: &'a str, function_name: &'a str) -> Self {
        Self {
            class_name,
            function_name,
        }
    }

    /// Call from the engine into a custom callable.
    pub const fn custom_callable(function_name: &'a str) -> Self {
        Self {
            class_name: "<Callable>",
            function_name,
        }
    }

    /// Outbound call from the host into the engine.
    pub const fn outbound(class_name: &'a str, function_name: &'a str) -> Self {
        Self {
            class_name,
            function_name,
        }
    }
}

impl fmt::Display for CallContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.class_name, self.function_name)
    }
}

#[cfg(feature = "trace")]
pub mod trace {
    use std::cell::Cell;

    use crate::meta::CallContext;

    /// Stores information about the current call for diagnostic purposes.
    #[derive(Clone, Debug)]
    pub struct CallReport {
        pub class: String,
        pub method: String,
        pub is_inbound: bool,
        pub is_ptrcall: bool,
    }

    /// Takes the report of the most recent call on this thread.
    ///
    /// # Panics
    /// If no call has been recorded since the last `pop()`.
    pub fn pop() -> CallReport {
        let report = TRACE.take();
        report.unwrap_or_else(|| panic!("trace::pop() had no prior call stored"))
    }

    pub(crate) fn push(inbound: bool, ptrcall: bool, call_ctx: &CallContext) {
        let report = CallReport {
            class: call_ctx.class_name.to_string(),
            method: call_ctx.function_name.to_string(),
            is_inbound: inbound,
            is_ptrcall: ptrcall,
        };

        TRACE.set(Some(report));
    }

    thread_local! {
        static TRACE: Cell<Option<CallReport>> = Cell::default();
    }
}
