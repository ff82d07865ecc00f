/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! In-process stand-in for the engine, implementing its C interface in Rust.
//!
//! The mock provides every entry point of [`GDExtensionInterface`](gdbind_ffi::GDExtensionInterface) through
//! [`get_proc_address`], a small native class hierarchy matching the bundled class database, and an audit API that
//! lets tests observe object lifetimes, reference counts and printed errors.
//!
//! ```ignore
//! gdbind_mock::load_extension(Some(gdbind_init)).expect("extension loads");
//!
//! let node = Node::new_alloc();
//! let id = node.instance_id().to_u64();
//! gdbind_mock::process(id, 0.016);
//! assert_eq!(gdbind_mock::native_default_calls(id, "_process"), 1);
//! ```
//!
//! State is process-wide. Tests running in parallel share one engine, so assertions should be made about objects
//! the test created itself.

/// Runs `$body` with `$T` bound to the element type of the packed array type `$ty`.
macro_rules! dispatch_packed {
    ($ty:expr, |$T:ident| $body:expr) => {
        match $ty {
            ::gdbind_ffi::VariantType::PackedByteArray => {
                type $T = u8;
                $body
            }
            ::gdbind_ffi::VariantType::PackedInt32Array => {
                type $T = i32;
                $body
            }
            ::gdbind_ffi::VariantType::PackedInt64Array => {
                type $T = i64;
                $body
            }
            ::gdbind_ffi::VariantType::PackedFloat32Array => {
                type $T = f32;
                $body
            }
            ::gdbind_ffi::VariantType::PackedFloat64Array => {
                type $T = f64;
                $body
            }
            ::gdbind_ffi::VariantType::PackedStringArray => {
                type $T = $crate::variant::GStr;
                $body
            }
            ::gdbind_ffi::VariantType::PackedVector2Array => {
                type $T = [f32; 2];
                $body
            }
            other => unreachable!("{} is not a packed array type", other.name()),
        }
    };
}

mod audit;
mod builtins;
mod extension;
mod interface;
mod methods;
mod objects;
mod variant;

pub use audit::{
    destroy_count, is_alive, native_default_calls, printed_errors, printed_warnings, reference_count, PrintedMessage,
};
pub use extension::{
    call_virtual, configure, is_loaded, load_extension, process, ready, unload_extension, MockConfig, MockError,
    VirtualDispatch,
};
pub use interface::get_proc_address;
