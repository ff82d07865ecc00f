/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// Implements `EngineFfi` for an opaque, engine-managed builtin.
///
/// Arguments of inbound calls are borrowed from the engine, so `from_arg_ptr` goes through the copy constructor.
macro_rules! impl_builtin_ffi {
    ($Type:ty, $variant_type:expr) => {
        // SAFETY: the opaque field has the engine's size for this type; the engine reads and writes exactly those bytes.
        unsafe impl sys::EngineFfi for $Type {
            const VARIANT_TYPE: sys::VariantType = $variant_type;

            sys::ffi_methods! { type sys::GDExtensionTypePtr = *mut Opaque; .. }

            unsafe fn from_arg_ptr(ptr: sys::GDExtensionConstTypePtr, _call_type: sys::PtrcallType) -> Self {
                <Self as sys::EngineFfi>::new_with_uninit(|dst| {
                    let ctor = sys::builtin_lifecycle!(copy_constructor, $variant_type);
                    let args = [ptr];
                    ctor(dst, args.as_ptr());
                })
            }
        }
    };
}

/// Implements `Clone`, `Drop` and `Default` through the engine's lifecycle table.
macro_rules! impl_builtin_lifecycle {
    ($Type:ty, $variant_type:expr) => {
        impl Clone for $Type {
            fn clone(&self) -> Self {
                let ctor = sys::builtin_lifecycle!(copy_constructor, $variant_type);
                let args = [<Self as sys::EngineFfi>::sys(self)];

                // SAFETY: copy constructor fully initializes the destination from a live value.
                unsafe { <Self as sys::EngineFfi>::new_with_uninit(|dst| ctor(dst, args.as_ptr())) }
            }
        }

        impl Drop for $Type {
            fn drop(&mut self) {
                let dtor = sys::builtin_lifecycle!(destructor, $variant_type);

                // SAFETY: value is initialized and destroyed exactly once.
                unsafe { dtor(<Self as sys::EngineFfi>::sys_mut(self)) }
            }
        }

        impl Default for $Type {
            fn default() -> Self {
                let ctor = sys::builtin_lifecycle!(default_constructor, $variant_type);

                // SAFETY: default constructor takes no arguments and fully initializes the destination.
                unsafe { <Self as sys::EngineFfi>::new_with_uninit(|dst| ctor(dst, std::ptr::null())) }
            }
        }
    };
}
