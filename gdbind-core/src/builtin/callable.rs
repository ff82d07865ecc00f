/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, ptr};

use crate::builtin::{Array, Variant};
use crate::meta::{CallContext, Signature};
use crate::sys;
use sys::{interface_fn, EngineFfi, VariantType};

/// A `Callable` represents a function in the engine.
///
/// Usually a callable is a reference to an `Object` and a method name. Callables created with
/// [`from_fn()`](Self::from_fn) instead wrap a Rust closure, which the engine invokes through a custom-callable hook.
#[repr(C, align(8))]
pub struct Callable {
    opaque: sys::OpaqueCallable,
}

impl Callable {
    /// Create a callable representing a Rust function.
    ///
    /// The closure receives the arguments as variants. Returning `Err(())` reports an invalid-method call to the
    /// caller; a panic is caught, printed and reported the same way. In both cases the call yields `nil`.
    pub fn from_fn<F, S>(name: S, rust_function: F) -> Self
    where
        F: 'static + FnMut(&[&Variant]) -> Result<Variant, ()>,
        S: Into<String>,
    {
        let userdata = FnWrapper {
            rust_function,
            name: name.into(),
        };

        let mut info = sys::GDExtensionCallableCustomInfo {
            callable_userdata: Box::into_raw(Box::new(userdata)) as *mut std::ffi::c_void,
            library: sys::get_library(),
            call_func: Some(rust_callable_call_fn::<F>),
            free_func: Some(rust_callable_destroy::<F>),
        };

        // SAFETY: `info` is complete; the engine takes ownership of the userdata and frees it via `free_func`.
        unsafe {
            <Self as EngineFfi>::new_with_uninit(|type_ptr| interface_fn!(callable_custom_create)(type_ptr, &mut info))
        }
    }

    /// Creates an invalid/empty object that cannot be called.
    pub fn invalid() -> Self {
        Self::default()
    }

    /// Calls the method represented by this callable, with arguments taken from an array.
    ///
    /// Returns `nil` if the callable is invalid or the call fails.
    pub fn callv(&self, arguments: &Array) -> Variant {
        // SAFETY: builtin `Callable::callv` takes one Array and returns a Variant.
        unsafe {
            Signature::<(&Array,), Variant>::out_builtin_ptrcall(
                sys::builtin_fn!(callable_callv),
                "Callable",
                "callv",
                sys::force_mut_ptr(self.sys()),
                (arguments,),
            )
        }
    }

    /// Calls the method represented by this callable.
    pub fn call(&self, arguments: &[Variant]) -> Variant {
        let array: Array = arguments.iter().collect();
        self.callv(&array)
    }

    /// Returns `true` if the callable has a target that can be invoked.
    pub fn is_valid(&self) -> bool {
        // SAFETY: builtin `Callable::is_valid` takes no arguments and returns bool.
        unsafe {
            Signature::<(), bool>::out_builtin_ptrcall(
                sys::builtin_fn!(callable_is_valid),
                "Callable",
                "is_valid",
                sys::force_mut_ptr(self.sys()),
                (),
            )
        }
    }

    fn from_opaque(opaque: sys::OpaqueCallable) -> Self {
        Self { opaque }
    }
}

impl_builtin_ffi!(Callable, VariantType::Callable);
impl_builtin_lifecycle!(Callable, VariantType::Callable);

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let valid = if self.is_valid() { "valid" } else { "invalid" };
        write!(f, "Callable({valid})")
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Custom callable plumbing

struct FnWrapper<F> {
    rust_function: F,
    name: String,
}

unsafe extern "C" fn rust_callable_call_fn<F>(
    callable_userdata: *mut std::ffi::c_void,
    p_args: *const sys::GDExtensionConstVariantPtr,
    p_argument_count: sys::GDExtensionInt,
    r_return: sys::GDExtensionVariantPtr,
    r_error: *mut sys::GDExtensionCallError,
) where
    F: FnMut(&[&Variant]) -> Result<Variant, ()>,
{
    let arg_refs: &[&Variant] = Variant::borrow_ref_slice(p_args, p_argument_count as usize);

    let wrapper = &mut *(callable_userdata as *mut FnWrapper<F>);
    let ctx = CallContext::custom_callable(&wrapper.name);

    let result = crate::private::handle_panic(
        || ctx.clone(),
        std::panic::AssertUnwindSafe(|| (wrapper.rust_function)(arg_refs)),
    );

    let value = match result {
        Some(Ok(value)) => value,
        Some(Err(())) | None => {
            (*r_error).error = sys::GDEXTENSION_CALL_ERROR_INVALID_METHOD;
            Variant::nil()
        }
    };

    // The engine passes an uninitialized return slot.
    ptr::write(r_return as *mut Variant, value);
}

unsafe extern "C" fn rust_callable_destroy<F>(callable_userdata: *mut std::ffi::c_void) {
    let rust_ptr = callable_userdata as *mut FnWrapper<F>;
    let _drop = Box::from_raw(rust_ptr);
}
