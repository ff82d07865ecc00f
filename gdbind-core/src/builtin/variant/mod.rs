/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::builtin::GString;
use crate::meta::error::ConvertError;
use crate::meta::{FromGodot, ToGodot};
use crate::sys;
use std::fmt;
use sys::{interface_fn, EngineFfi, VariantType};

/// Dynamically typed value that can hold any engine type.
///
/// The layout is owned by the engine; this type only manages its lifecycle. Use [`to()`](Self::to) and
/// [`try_to()`](Self::try_to) to extract a statically typed value, and [`Variant::from()`] or
/// [`ToGodot::to_variant()`] to create one.
#[repr(C, align(8))]
pub struct Variant {
    opaque: sys::OpaqueVariant,
}

impl Variant {
    /// Create an empty variant (`null` value in GDScript).
    pub fn nil() -> Self {
        // SAFETY: variant_new_nil initializes the destination.
        unsafe { Self::new_with_var_uninit(|variant_ptr| interface_fn!(variant_new_nil)(variant_ptr)) }
    }

    /// Create a variant holding a non-nil value.
    ///
    /// Equivalent to [`value.to_variant()`][ToGodot::to_variant], but consumes the argument.
    pub fn from<T: ToGodot>(value: T) -> Self {
        value.to_variant()
    }

    /// ⚠️ Convert to type `T`, panicking on failure.
    ///
    /// # Panics
    /// When this variant holds a different type, or the value is not representable in `T`.
    pub fn to<T: FromGodot>(&self) -> T {
        T::from_variant(self)
    }

    /// Convert to type `T`, returning `Err` on failure.
    pub fn try_to<T: FromGodot>(&self) -> Result<T, ConvertError> {
        T::try_from_variant(self)
    }

    /// Checks whether the variant is empty (`null` value in GDScript).
    pub fn is_nil(&self) -> bool {
        self.get_type() == VariantType::Nil
    }

    /// Returns the type that is currently held by this variant.
    pub fn get_type(&self) -> VariantType {
        // SAFETY: self is a live variant.
        let raw = unsafe { interface_fn!(variant_get_type)(self.var_sys()) };
        VariantType::from_sys(raw)
    }

    /// Converts this variant to a string, the same way the engine prints it.
    pub fn stringify(&self) -> GString {
        // SAFETY: variant_stringify initializes the string destination.
        unsafe {
            GString::new_with_string_uninit(|string_ptr| interface_fn!(variant_stringify)(self.var_sys(), string_ptr))
        }
    }

    /// Evaluates an operator on two variants; `None` if the engine rejects the operand types.
    pub fn evaluate(&self, rhs: &Variant, op: VariantOperator) -> Option<Variant> {
        let mut is_valid = sys::bool_to_u8(false);

        // SAFETY: both operands are live; the engine always initializes the result (nil on failure).
        let result = unsafe {
            Self::new_with_var_uninit(|variant_ptr| {
                interface_fn!(variant_evaluate)(op.sys(), self.var_sys(), rhs.var_sys(), variant_ptr, &mut is_valid)
            })
        };

        sys::u8_to_bool(is_valid).then_some(result)
    }

    fn from_opaque(opaque: sys::OpaqueVariant) -> Self {
        Self { opaque }
    }

    // ------------------------------------------------------------------------------------------------------------------------------------------
    // Raw pointer access

    /// Initializes a variant through a raw engine function writing to an uninitialized variant pointer.
    ///
    /// # Safety
    /// `init_fn` must fully initialize the variant behind its argument.
    #[doc(hidden)]
    pub unsafe fn new_with_var_uninit(init_fn: impl FnOnce(sys::GDExtensionUninitializedVariantPtr)) -> Self {
        let mut raw = std::mem::MaybeUninit::<sys::OpaqueVariant>::uninit();
        init_fn(raw.as_mut_ptr() as sys::GDExtensionUninitializedVariantPtr);

        Self::from_opaque(raw.assume_init())
    }

    #[doc(hidden)]
    pub fn var_sys(&self) -> sys::GDExtensionConstVariantPtr {
        std::ptr::addr_of!(self.opaque) as sys::GDExtensionConstVariantPtr
    }

    #[doc(hidden)]
    pub fn var_sys_mut(&mut self) -> sys::GDExtensionVariantPtr {
        std::ptr::addr_of_mut!(self.opaque) as sys::GDExtensionVariantPtr
    }

    /// Reinterprets an engine-owned variant as a reference.
    ///
    /// # Safety
    /// `ptr` must point to a live variant that outlives `'a`.
    #[doc(hidden)]
    pub unsafe fn borrow_var_sys<'a>(ptr: sys::GDExtensionConstVariantPtr) -> &'a Variant {
        &*(ptr as *const Variant)
    }

    /// Reinterprets an engine-owned argument array as a slice of variant references.
    ///
    /// # Safety
    /// `ptr` must point to `len` pointers to live variants, all outliving `'a`. May be null if `len` is 0.
    #[doc(hidden)]
    pub unsafe fn borrow_ref_slice<'a>(ptr: *const sys::GDExtensionConstVariantPtr, len: usize) -> &'a [&'a Variant] {
        if len == 0 {
            return &[];
        }

        sys::static_assert_eq_size!(&Variant, sys::GDExtensionConstVariantPtr);
        std::slice::from_raw_parts(ptr as *const &Variant, len)
    }
}

// SAFETY: the opaque field is the engine's 24-byte variant layout.
unsafe impl EngineFfi for Variant {
    const VARIANT_TYPE: VariantType = VariantType::Nil;

    sys::ffi_methods! { type sys::GDExtensionTypePtr = *mut Opaque; .. }

    unsafe fn from_arg_ptr(ptr: sys::GDExtensionConstTypePtr, _call_type: sys::PtrcallType) -> Self {
        Self::new_with_var_uninit(|variant_ptr| interface_fn!(variant_new_copy)(variant_ptr, ptr))
    }
}

impl Clone for Variant {
    fn clone(&self) -> Self {
        // SAFETY: self is live; variant_new_copy initializes the destination.
        unsafe { Self::new_with_var_uninit(|variant_ptr| interface_fn!(variant_new_copy)(variant_ptr, self.var_sys())) }
    }
}

impl Drop for Variant {
    fn drop(&mut self) {
        // SAFETY: destroyed exactly once.
        unsafe { interface_fn!(variant_destroy)(self.var_sys_mut()) }
    }
}

impl Default for Variant {
    fn default() -> Self {
        Self::nil()
    }
}

impl PartialEq for Variant {
    fn eq(&self, other: &Self) -> bool {
        self.evaluate(other, VariantOperator::Equal)
            .map(|result| result.to::<bool>())
            .unwrap_or(false)
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.stringify();
        write!(f, "{s}")
    }
}

impl fmt::Debug for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ty = self.get_type();
        if ty == VariantType::Nil {
            return write!(f, "Variant(nil)");
        }

        let s = self.stringify();
        write!(f, "Variant({}: {s})", ty.name())
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------

/// Binary operators supported by [`Variant::evaluate()`].
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum VariantOperator {
    Equal,
    NotEqual,
    Less,
}

impl VariantOperator {
    fn sys(self) -> sys::GDExtensionVariantOperator {
        match self {
            Self::Equal => sys::GDEXTENSION_VARIANT_OP_EQUAL,
            Self::NotEqual => sys::GDEXTENSION_VARIANT_OP_NOT_EQUAL,
            Self::Less => sys::GDEXTENSION_VARIANT_OP_LESS,
        }
    }
}
