/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate as sys;

/// Types that can directly and fully represent some engine type.
///
/// Adds methods to convert from and to engine FFI pointers.
/// See [crate::ffi_methods] for ergonomic implementation.
///
/// # Safety
///
/// - `ARG_KIND.native_size()` bytes starting at [`sys()`](EngineFfi::sys) must be the exact native encoding of the value.
/// - [`from_arg_ptr`](EngineFfi::from_arg_ptr) and [`move_return_ptr`](EngineFfi::move_return_ptr)
///   must properly initialize and clean up values given the [`PtrcallType`] provided by the caller.
#[doc(hidden)] // shows up in implementors otherwise
pub unsafe trait EngineFfi {
    const VARIANT_TYPE: sys::VariantType;
    const ARG_KIND: sys::ArgKind = sys::ArgKind::of(Self::VARIANT_TYPE);

    /// Construct from engine opaque pointer.
    ///
    /// This is a bitwise read: ownership of whatever the pointee holds is taken over by the result.
    ///
    /// # Safety
    /// `ptr` must be a valid _type ptr_: it must follow the engine's convention to encode `Self`.
    unsafe fn new_from_sys(ptr: sys::GDExtensionConstTypePtr) -> Self;

    /// Construct uninitialized opaque data, then initialize it with `init_fn` function.
    ///
    /// # Safety
    /// `init_fn` must be a function that correctly constructs a value into a (possibly-uninitialized) _type ptr_.
    unsafe fn new_with_uninit(init_fn: impl FnOnce(sys::GDExtensionUninitializedTypePtr)) -> Self;

    /// Return engine opaque pointer, for an immutable operation.
    fn sys(&self) -> sys::GDExtensionConstTypePtr;

    /// Return engine opaque pointer, for a mutable operation.
    fn sys_mut(&mut self) -> sys::GDExtensionTypePtr;

    /// Construct from a pointer to an argument in an inbound call.
    ///
    /// Arguments are borrowed from the engine: implementations owning engine memory must copy, not adopt.
    ///
    /// # Safety
    /// `ptr` must encode `Self` according to the given `call_type`'s encoding of argument values.
    unsafe fn from_arg_ptr(ptr: sys::GDExtensionConstTypePtr, call_type: PtrcallType) -> Self;

    /// Move self into the uninitialized return slot `dst`.
    ///
    /// # Safety
    /// `dst` must be able to accept a value of type `Self` encoded according to the given `call_type`'s encoding of return values.
    unsafe fn move_return_ptr(self, dst: sys::GDExtensionTypePtr, call_type: PtrcallType);
}

/// Types that can represent null-values.
///
/// Used to blanket implement various conversions over `Option<T>`.
pub trait EngineNullableFfi: Sized + EngineFfi {
    fn null() -> Self;
    fn is_null(&self) -> bool;

    fn flatten_option(opt: Option<Self>) -> Self {
        opt.unwrap_or_else(Self::null)
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------

/// An indication of what type of pointer call is being made.
#[derive(Default, Copy, Clone, Eq, PartialEq, Debug)]
pub enum PtrcallType {
    /// Standard pointer call, originating from host code calling into the engine.
    ///
    /// Every argument is passed in as a pointer to a value of that type, and the return value is constructed
    /// into the return pointer.
    #[default]
    Standard,

    /// Virtual pointer call, originating from the engine calling a host override.
    ///
    /// Behaves like [`PtrcallType::Standard`], except that object arguments are borrowed for the duration of the call
    /// and must be referenced again if the host keeps them.
    Virtual,
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Macros to choose a certain implementation of `EngineFfi` trait for GDExtensionTypePtr.
// See doc comment of `ffi_methods!` for information

#[macro_export]
#[doc(hidden)]
macro_rules! ffi_methods_one {
    // type $Ptr = *mut Opaque
    (OpaquePtr; new_from_sys) => {
        unsafe fn new_from_sys(ptr: $crate::GDExtensionConstTypePtr) -> Self {
            let opaque = std::ptr::read(ptr as *const _);
            Self::from_opaque(opaque)
        }
    };
    (OpaquePtr; new_with_uninit) => {
        unsafe fn new_with_uninit(init: impl FnOnce($crate::GDExtensionUninitializedTypePtr)) -> Self {
            let mut raw = std::mem::MaybeUninit::uninit();
            init(raw.as_mut_ptr() as $crate::GDExtensionUninitializedTypePtr);

            Self::from_opaque(raw.assume_init())
        }
    };
    (OpaquePtr; sys) => {
        fn sys(&self) -> $crate::GDExtensionConstTypePtr {
            std::ptr::addr_of!(self.opaque) as $crate::GDExtensionConstTypePtr
        }
    };
    (OpaquePtr; sys_mut) => {
        fn sys_mut(&mut self) -> $crate::GDExtensionTypePtr {
            std::ptr::addr_of_mut!(self.opaque) as $crate::GDExtensionTypePtr
        }
    };
    (OpaquePtr; move_return_ptr) => {
        unsafe fn move_return_ptr(self, dst: $crate::GDExtensionTypePtr, _call_type: $crate::PtrcallType) {
            let this = std::mem::ManuallyDrop::new(self);
            std::ptr::write(dst as *mut _, this.opaque)
        }
    };

    // type $Ptr = *mut Self
    (SelfPtr; new_from_sys) => {
        unsafe fn new_from_sys(ptr: $crate::GDExtensionConstTypePtr) -> Self {
            std::ptr::read(ptr as *const Self)
        }
    };
    (SelfPtr; new_with_uninit) => {
        unsafe fn new_with_uninit(init: impl FnOnce($crate::GDExtensionUninitializedTypePtr)) -> Self {
            let mut raw = std::mem::MaybeUninit::<Self>::uninit();
            init(raw.as_mut_ptr() as $crate::GDExtensionUninitializedTypePtr);

            raw.assume_init()
        }
    };
    (SelfPtr; sys) => {
        fn sys(&self) -> $crate::GDExtensionConstTypePtr {
            self as *const Self as $crate::GDExtensionConstTypePtr
        }
    };
    (SelfPtr; sys_mut) => {
        fn sys_mut(&mut self) -> $crate::GDExtensionTypePtr {
            self as *mut Self as $crate::GDExtensionTypePtr
        }
    };
    (SelfPtr; from_arg_ptr) => {
        unsafe fn from_arg_ptr(ptr: $crate::GDExtensionConstTypePtr, _call_type: $crate::PtrcallType) -> Self {
            std::ptr::read(ptr as *const Self)
        }
    };
    (SelfPtr; move_return_ptr) => {
        unsafe fn move_return_ptr(self, dst: $crate::GDExtensionTypePtr, _call_type: $crate::PtrcallType) {
            std::ptr::write(dst as *mut Self, self)
        }
    };
}

/// Provides "sys" style methods for FFI and ptrcall integration with the engine.
///
/// The generated implementations follow one of two patterns:
///
/// * `*mut Opaque`<br>
///   Implements FFI methods for a type with `Opaque` data that stores an engine-managed value (e.g. `GString`).
///   The **address of** the `Opaque` field is used as the sys pointer.
///   Expects a `from_opaque()` constructor and an `opaque` field. `from_arg_ptr` is not generated, since copying
///   engine-managed values requires the copy constructor.
///
/// * `*mut Self`<br>
///   Implements FFI methods for a type implemented with standard Rust fields (not opaque), e.g. `Vector2`.
///   The address of `Self` is directly reinterpreted as the sys pointer.
///
/// Methods are listed explicitly, or `..` selects all that the layout can provide.
#[macro_export]
macro_rules! ffi_methods {
    ( type $Ptr:ty = *mut Opaque; .. ) => {
        $crate::ffi_methods_one!(OpaquePtr; new_from_sys);
        $crate::ffi_methods_one!(OpaquePtr; new_with_uninit);
        $crate::ffi_methods_one!(OpaquePtr; sys);
        $crate::ffi_methods_one!(OpaquePtr; sys_mut);
        $crate::ffi_methods_one!(OpaquePtr; move_return_ptr);
    };
    ( type $Ptr:ty = *mut Self; .. ) => {
        $crate::ffi_methods_one!(SelfPtr; new_from_sys);
        $crate::ffi_methods_one!(SelfPtr; new_with_uninit);
        $crate::ffi_methods_one!(SelfPtr; sys);
        $crate::ffi_methods_one!(SelfPtr; sys_mut);
        $crate::ffi_methods_one!(SelfPtr; from_arg_ptr);
        $crate::ffi_methods_one!(SelfPtr; move_return_ptr);
    };
    ( type $Ptr:ty = *mut Opaque; $( fn $method:ident; )* ) => {
        $( $crate::ffi_methods_one!(OpaquePtr; $method); )*
    };
    ( type $Ptr:ty = *mut Self; $( fn $method:ident; )* ) => {
        $( $crate::ffi_methods_one!(SelfPtr; $method); )*
    };
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Implementations for common types

macro_rules! impl_engine_ffi_as_self {
    ($T:ty: $variant_type:ident) => {
        unsafe impl EngineFfi for $T {
            const VARIANT_TYPE: sys::VariantType = sys::VariantType::$variant_type;

            ffi_methods! { type sys::GDExtensionTypePtr = *mut Self; .. }
        }
    };
}

impl_engine_ffi_as_self!(bool: Bool);
impl_engine_ffi_as_self!(i64: Int);
impl_engine_ffi_as_self!(f64: Float);

unsafe impl EngineFfi for () {
    const VARIANT_TYPE: sys::VariantType = sys::VariantType::Nil;

    unsafe fn new_from_sys(_ptr: sys::GDExtensionConstTypePtr) -> Self {}

    unsafe fn new_with_uninit(init: impl FnOnce(sys::GDExtensionUninitializedTypePtr)) -> Self {
        // Engine is not expected to write anything for a void return.
        init(std::ptr::null_mut());
    }

    fn sys(&self) -> sys::GDExtensionConstTypePtr {
        std::ptr::null()
    }

    fn sys_mut(&mut self) -> sys::GDExtensionTypePtr {
        std::ptr::null_mut()
    }

    unsafe fn from_arg_ptr(_ptr: sys::GDExtensionConstTypePtr, _call_type: PtrcallType) -> Self {}

    unsafe fn move_return_ptr(self, _dst: sys::GDExtensionTypePtr, _call_type: PtrcallType) {}
}

macro_rules! impl_engine_ffi_for_pointer {
    ($T:ty) => {
        unsafe impl EngineFfi for $T {
            const VARIANT_TYPE: sys::VariantType = sys::VariantType::Int;
            const ARG_KIND: sys::ArgKind = sys::ArgKind::Pointer;

            ffi_methods! { type sys::GDExtensionTypePtr = *mut Self; .. }
        }
    };
}

impl_engine_ffi_for_pointer!(*mut f32);
impl_engine_ffi_for_pointer!(*const f32);
impl_engine_ffi_for_pointer!(*mut f64);
impl_engine_ffi_for_pointer!(*const f64);
impl_engine_ffi_for_pointer!(*mut i32);
impl_engine_ffi_for_pointer!(*const i32);
impl_engine_ffi_for_pointer!(*mut i64);
impl_engine_ffi_for_pointer!(*const i64);
impl_engine_ffi_for_pointer!(*mut u8);
impl_engine_ffi_for_pointer!(*const u8);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn self_ptr_roundtrip() {
        let value = 42_i64;
        let copy = unsafe { i64::new_from_sys(value.sys()) };
        assert_eq!(copy, 42);

        let written = unsafe { f64::new_with_uninit(|ptr| 0.25_f64.move_return_ptr(ptr, PtrcallType::Standard)) };
        assert_eq!(written, 0.25);
    }

    #[test]
    fn kinds() {
        assert_eq!(<bool as EngineFfi>::ARG_KIND, sys::ArgKind::Primitive(sys::VariantType::Bool));
        assert_eq!(<*mut f32 as EngineFfi>::ARG_KIND, sys::ArgKind::Pointer);
        assert_eq!(<() as EngineFfi>::ARG_KIND, sys::ArgKind::Variant);
    }
}
