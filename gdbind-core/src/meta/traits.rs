/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::builtin::Variant;
use crate::meta::error::ConvertError;
use crate::meta::{FromGodot, GodotConvert, ToGodot};
use crate::sys;
use sys::EngineFfi;

/// Type that is directly representable in the engine's type system.
///
/// These are the types that can appear in method signatures of generated classes, after conversion. Every `GodotType`
/// has a native layout ([`EngineFfi`]).
///
/// This trait cannot be implemented for custom user types; for those, [`GodotConvert`] exists instead.
pub trait GodotType: GodotConvert<Via = Self> + ToGodot + FromGodot + EngineFfi + Sized + 'static {
    /// Name of the type in the class database, used in error messages.
    fn godot_type_name() -> String;

    #[doc(hidden)]
    fn ffi_to_variant(&self) -> Variant;

    #[doc(hidden)]
    fn ffi_from_variant(variant: &Variant) -> Result<Self, ConvertError>;
}

/// Converts through the engine's per-type to-variant constructor.
pub(crate) fn ffi_to_variant_via_table<T: EngineFfi>(value: &T) -> Variant {
    let converter = sys::builtin_lifecycle!(to_variant, T::VARIANT_TYPE);

    // SAFETY: `value` is live for the call; the converter only reads from it and initializes the variant.
    unsafe {
        Variant::new_with_var_uninit(|variant_ptr| converter(variant_ptr, sys::force_mut_ptr(value.sys())))
    }
}

/// Converts through the engine's per-type from-variant constructor, after verifying the variant's type tag.
pub(crate) fn ffi_from_variant_via_table<T: EngineFfi>(variant: &Variant) -> Result<T, ConvertError> {
    let actual = variant.get_type();
    if actual != T::VARIANT_TYPE {
        return Err(ConvertError::bad_type(T::VARIANT_TYPE, actual, variant));
    }

    let converter = sys::builtin_lifecycle!(from_variant, T::VARIANT_TYPE);

    // SAFETY: type tag verified above; the converter initializes a value of that type.
    let value = unsafe {
        T::new_with_uninit(|self_ptr| converter(self_ptr, sys::force_mut_ptr(variant.var_sys())))
    };

    Ok(value)
}
