/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Meta-information about types and conversions between host values and engine values.
//!
//! Conversions go through an intermediate "via" type: a host type `T` declares in [`GodotConvert`] which engine type
//! ([`GodotType`]) represents it across the boundary, and [`ToGodot`]/[`FromGodot`] map between the two. Everything
//! that actually touches memory happens on the `Via` type, through its `EngineFfi` implementation.

pub mod error;

mod godot_convert;
mod param_tuple;
mod signature;
mod traits;

pub use godot_convert::{FromGodot, GodotConvert, ToGodot};
pub use param_tuple::{InParamTuple, OutParamTuple};
pub use signature::*;
pub use traits::GodotType;

pub use error::{CallError, CallErrorKind, ConvertError, ErrorKind};

pub(crate) use traits::{ffi_from_variant_via_table, ffi_to_variant_via_table};
