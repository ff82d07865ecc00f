/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Core of the gdbind bindings: builtin types, object handles, marshaling and class registration.
//!
//! Most users depend on the `gdbind` facade crate instead, which re-exports the public parts of this crate.

mod storage;

pub mod builtin;
pub mod classes;
pub mod global;
pub mod init;
pub mod log;
pub mod meta;
pub mod obj;
pub mod registry;

#[doc(hidden)]
pub mod private;

pub use gdbind_ffi as sys;
#[doc(hidden)]
pub use gdbind_ffi::out;

// Output of generated code. Mimics the file structure, symbols are re-exported.
#[rustfmt::skip]
#[allow(unused_imports, dead_code, non_upper_case_globals, non_snake_case)]
#[allow(clippy::too_many_arguments, clippy::let_and_return, clippy::new_ret_no_self)]
#[allow(clippy::wrong_self_convention)]
#[allow(unreachable_code, unused_unsafe, clippy::unimplemented)]
mod gen;
