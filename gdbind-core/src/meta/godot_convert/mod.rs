/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

mod impls;

use crate::builtin::Variant;
use crate::meta::error::ConvertError;
use crate::meta::GodotType;

/// Indicates that a type can be passed to/from the engine, either directly or through an intermediate "via" type.
///
/// The associated type `Via` specifies _how_ this type is passed across the FFI boundary. `Via` itself is one of the
/// engine's types: `i64`, `f64`, `GString`, object handles, etc.
pub trait GodotConvert {
    /// The type through which `Self` is represented in the engine.
    type Via: GodotType;
}

/// Defines the canonical conversion to the engine for a type.
///
/// It is assumed that the conversion is lossless: converting back with [`FromGodot`] yields an equal value.
pub trait ToGodot: Sized + GodotConvert {
    /// Converts this type to the engine type it is represented by.
    fn to_godot(&self) -> Self::Via;

    /// Converts this type to a [Variant].
    fn to_variant(&self) -> Variant {
        self.to_godot().ffi_to_variant()
    }
}

/// Defines the canonical conversion from the engine for a type.
///
/// Conversions are fallible: an engine `int` may not fit into an `i8`, and a variant may hold any type.
pub trait FromGodot: Sized + GodotConvert {
    /// Converts the engine representation to this type, returning `Err` on failure.
    fn try_from_godot(via: Self::Via) -> Result<Self, ConvertError>;

    /// ⚠️ Converts the engine representation to this type.
    ///
    /// # Panics
    /// If the conversion fails.
    fn from_godot(via: Self::Via) -> Self {
        Self::try_from_godot(via).unwrap_or_else(|err| panic!("FromGodot::from_godot() failed: {err}"))
    }

    /// Performs the conversion from a [`Variant`], returning `Err` on failure.
    fn try_from_variant(variant: &Variant) -> Result<Self, ConvertError> {
        let via = Self::Via::ffi_from_variant(variant)?;
        Self::try_from_godot(via)
    }

    /// ⚠️ Performs the conversion from a [`Variant`].
    ///
    /// # Panics
    /// If the conversion fails.
    fn from_variant(variant: &Variant) -> Self {
        Self::try_from_variant(variant).unwrap_or_else(|err| panic!("FromGodot::from_variant() failed: {err}"))
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Blanket impls

impl<T: ToGodot> GodotConvert for &T {
    type Via = T::Via;
}

impl<T: ToGodot> ToGodot for &T {
    fn to_godot(&self) -> Self::Via {
        (*self).to_godot()
    }

    fn to_variant(&self) -> Variant {
        (*self).to_variant()
    }
}
