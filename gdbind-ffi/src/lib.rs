/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Low level bindings to the engine's C interface.
//!
//! All raw-pointer and layout-dependent code lives in this crate: the function table, call frames, method bind
//! resolution and the process-wide binding state. Higher layers talk to the engine only through these typed APIs.

#![cfg_attr(test, allow(unused))]

mod binding;
mod builtin_table;
mod call_frame;
mod engine_ffi;
mod interface;
mod method_table;
mod opaque;
mod plugins;
mod toolbox;
mod variant_type;

// See https://github.com/dtolnay/paste/issues/69#issuecomment-962418430
// and https://users.rust-lang.org/t/proc-macros-using-third-party-crate/42465/4
#[doc(hidden)]
pub use paste;

pub use binding::*;
pub use builtin_table::{
    BuiltinLifecycleTable, BuiltinMethodBind, BuiltinMethodTable, FromVariantFn, PtrConstructorFn, PtrDestructorFn,
    ToVariantFn,
};
pub use call_frame::{CallFrame, SLOT_SIZE};
pub use engine_ffi::{EngineFfi, EngineNullableFfi, PtrcallType};
pub use interface::*;
pub use method_table::{BindError, MethodBindEntry, MethodSpec, MethodTable, SignatureMismatch};
pub use opaque::*;
pub use plugins::PluginRegistry;
pub use toolbox::*;
pub use variant_type::{ArgKind, VariantType};

// The impls only compile if those are different types.
trait Distinct {}
impl Distinct for GDExtensionTypePtr {}
impl Distinct for GDExtensionConstTypePtr {}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Macros to access low-level function tables

/// Retrieves a function from the engine interface.
///
/// All functions are validated at [`initialize`], so this never yields null once the binding is up.
///
/// # Panics
/// If the binding has not been initialized.
#[macro_export]
macro_rules! interface_fn {
    ($name:ident) => {{
        // SAFETY: `initialize()` refuses to complete unless every interface function is present.
        unsafe { $crate::get_interface().$name.unwrap_unchecked() }
    }};
}

/// Retrieves a method of a builtin type, by its field in [`BuiltinMethodTable`].
#[macro_export]
macro_rules! builtin_fn {
    ($name:ident) => {
        $crate::builtin_method_table().$name
    };
}

/// Retrieves a lifecycle function of a builtin type, e.g. `builtin_lifecycle!(destructor, VariantType::String)`.
#[macro_export]
macro_rules! builtin_lifecycle {
    ($op:ident, $ty:expr) => {
        $crate::builtin_lifecycle_api().$op($ty)
    };
}
