/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Built-in types like `Vector2`, `GString` and `Variant`.
//!
//! Value types (vectors, colors) are plain Rust structs with the engine's memory layout. Engine-managed types
//! (strings, containers, callables) are opaque buffers whose lifecycle goes through the engine's constructor and
//! destructor tables.

#[macro_use]
mod macros;

mod callable;
mod collections;
mod color;
mod string;
mod variant;
mod vectors;

pub use callable::Callable;
pub use collections::*;
pub use color::Color;
pub use string::GString;
pub use variant::{Variant, VariantOperator};
pub use vectors::{Vector2, Vector3};

pub use crate::sys::VariantType;

/// Floating-point type used by vectors and colors.
#[allow(non_camel_case_types)]
pub type real = f32;
