/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Items used by generated and macro-expanded code. Not part of the public API.

use std::any::Any;
use std::fmt;
use std::panic::UnwindSafe;

pub use crate::gen::classes::class_macros;
pub use crate::registry::{callbacks, ClassPlugin, PluginItem};
pub use crate::storage::{as_storage, InstanceStorage};
pub use gdbind_ffi::out;

use crate::meta::{CallContext, InParamTuple, Signature, ToGodot};
use crate::obj::bounds::DeclUser;
use crate::obj::{Bounds, GodotClass};
use crate::{log, sys};

// If someone forgets #[godot_api], this causes a compile error, rather than virtual functions not being called at runtime.
#[allow(non_camel_case_types)]
pub trait You_forgot_the_attribute__godot_api {}

sys::plugin_registry!(pub __GDBIND_PLUGIN_REGISTRY: ClassPlugin);

pub(crate) fn iterate_plugins(visitor: impl FnMut(&ClassPlugin)) {
    sys::plugin_foreach!(__GDBIND_PLUGIN_REGISTRY; visitor);
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Panic handling

/// Executes `code`. If a panic is thrown, it is caught and an error message is printed to the engine.
///
/// Returns `None` if a panic occurred, and `Some(result)` with the result of `code` otherwise.
pub fn handle_panic<E, F, R, S>(error_context: E, code: F) -> Option<R>
where
    E: FnOnce() -> S,
    F: FnOnce() -> R + UnwindSafe,
    S: fmt::Display,
{
    match std::panic::catch_unwind(code) {
        Ok(result) => Some(result),
        Err(err) => {
            // Flush, so that prior output (e.g. test announcements) appears before the error.
            flush_stdout();
            report_panic(&error_context(), err);
            None
        }
    }
}

/// Prints a caught panic payload to the engine, together with the context it occurred in.
pub(crate) fn report_panic(context: &dyn fmt::Display, err: Box<dyn Any + Send>) {
    log::godot_error!("Rust function panicked. Context: {context}");

    let msg = extract_panic_message(&*err);
    let lbegin = "\n  ";
    let indented = msg.replace('\n', lbegin);

    if indented.len() != msg.len() {
        log::godot_error!("Panic msg:{lbegin}{indented}");
    } else {
        log::godot_error!("Panic msg:  {msg}");
    }
}

pub(crate) fn extract_panic_message(err: &(dyn Any + Send)) -> String {
    if let Some(s) = err.downcast_ref::<&'static str>() {
        s.to_string()
    } else if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else {
        format!("(panic of type ID {:?})", err.type_id())
    }
}

pub fn flush_stdout() {
    use std::io::Write;
    // Nothing sensible to do if stdout is gone.
    let _ = std::io::stdout().flush();
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Virtual method trampolines

/// Body of a generated trampoline for a virtual method taking `&mut self`.
///
/// Resolves the instance storage, exclusively binds the host object, converts the arguments and writes the return value.
/// Panics (including a failed bind) are caught by [`Signature::in_ptrcall`].
///
/// # Safety
/// `instance` must be the storage of a live `C` instance; `args` and `ret` must match the signature `(P) -> R`.
pub unsafe fn virtual_ptrcall_mut<C, P, R>(
    call_ctx: &CallContext,
    instance: sys::GDExtensionClassInstancePtr,
    args: *const sys::GDExtensionConstTypePtr,
    ret: sys::GDExtensionTypePtr,
    func: impl FnOnce(&mut C, P) -> R,
) where
    C: GodotClass + Bounds<Declarer = DeclUser>,
    P: InParamTuple,
    R: ToGodot,
    R::Via: Default,
{
    let storage = as_storage::<C>(instance);

    Signature::<P, R>::in_ptrcall(call_ctx, args, ret, sys::PtrcallType::Virtual, |params| {
        let mut instance = storage.get_mut();
        func(&mut *instance, params)
    });
}

/// Like [`virtual_ptrcall_mut`], for virtual methods taking `&self`. Shared binds may coexist.
///
/// # Safety
/// See [`virtual_ptrcall_mut`].
pub unsafe fn virtual_ptrcall_ref<C, P, R>(
    call_ctx: &CallContext,
    instance: sys::GDExtensionClassInstancePtr,
    args: *const sys::GDExtensionConstTypePtr,
    ret: sys::GDExtensionTypePtr,
    func: impl FnOnce(&C, P) -> R,
) where
    C: GodotClass + Bounds<Declarer = DeclUser>,
    P: InParamTuple,
    R: ToGodot,
    R::Via: Default,
{
    let storage = as_storage::<C>(instance);

    Signature::<P, R>::in_ptrcall(call_ctx, args, ret, sys::PtrcallType::Virtual, |params| {
        let instance = storage.get();
        func(&*instance, params)
    });
}
