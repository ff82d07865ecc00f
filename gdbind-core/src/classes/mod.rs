/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Engine classes, generated from the class database.
//!
//! Every class is a `#[repr(C)]` wrapper around one object pointer. Use it through [`Gd<T>`](crate::obj::Gd).
//! Class-specific enums, virtual traits and default-argument builders live in the per-class submodules.

pub use crate::gen::classes::*;
