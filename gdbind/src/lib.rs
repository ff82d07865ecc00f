/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! The **gdbind** library implements Rust bindings for the native extension interface of the Godot engine.
//!
//! # Type categories
//!
//! The engine and Rust disagree on mutability and lifetimes, so not every type here behaves like a plain Rust value.
//! There are four kinds:
//!
//! 1. **Value types**: `i64`, `f64`, and mathematical types like [`Vector2`][crate::builtin::Vector2] and
//!    [`Color`][crate::builtin::Color]. They are `Copy`, have the engine's memory layout and public fields.
//!
//! 2. **Engine-managed values**: [`GString`][crate::builtin::GString] and the `Packed*Array` types. They act like
//!    `String` and `Vec`: `Clone` produces an independent copy. Construction, copying and destruction go through the
//!    engine.
//!
//! 3. **Shared containers and ref-counted objects**: [`Array`][crate::builtin::Array],
//!    [`Dictionary`][crate::builtin::Dictionary], and [`Gd<T>`][crate::obj::Gd] where `T` inherits from
//!    [`RefCounted`][crate::classes::RefCounted]. Cloning shares the underlying data; the last handle to go away
//!    releases it.
//!
//! 4. **Manually managed objects**: [`Gd<T>`][crate::obj::Gd] where `T` does not inherit from `RefCounted`, e.g.
//!    [`Node`][crate::classes::Node]. Ownership must be handed to the engine (by adding the node to a parent) or the
//!    object must be released with [`Gd::free()`][crate::obj::Gd::free].
//!
//! # Calls into the engine
//!
//! Engine classes are generated from a class database at build time. Their methods go through one of two paths:
//!
//! - **ptrcall**, the fast path for methods with a fixed signature. The arguments are staged in a call frame and
//!   validated against the method bind's recorded signature as long as [`CallChecks`][crate::init::CallChecks] are
//!   enabled (by default in debug builds).
//! - **varcall**, for methods with variable arguments like [`Object::call()`][crate::classes::Object::call]. The
//!   engine validates every argument; the `try_*` variants return a [`CallError`][crate::meta::CallError] instead of
//!   panicking.
//!
//! Errors that the engine reports as return values, such as [`global::Error`][crate::global::Error], are passed
//! through unchanged.
//!
//! # Ergonomics and panics
//!
//! gdbind prefers panics over `Result` where misuse is a programming error: a method bind missing from the running
//! engine, a call on a freed object, or a double `bind_mut()` on the same host object. Panics inside host code that
//! the engine calls (constructors, virtual overrides, callables) are caught at the boundary and printed through the
//! engine; they never unwind into it.
//!
//! # Cargo features
//!
//! * **`codegen-rustfmt`**: formats the generated engine classes with `rustfmt`, which makes them readable in an IDE
//!   but slows down the build.
//! * **`serde`**: implements `Serialize` and `Deserialize` for the vector and color types.

#[doc(inline)]
pub use gdbind_core::{builtin, classes, global, log, meta, obj};

#[doc(hidden)]
pub use gdbind_core::sys;

/// Entry point and initialization levels of an extension library.
pub mod init {
    pub use gdbind_core::init::*;

    // Re-exports
    pub use gdbind_macros::gdextension;
}

/// Register host classes and their virtual method overrides with the engine.
pub mod register {
    pub use gdbind_core::registry::{ClassPlugin, PluginItem};
    pub use gdbind_macros::{godot_api, GodotClass};
}

#[doc(hidden)]
pub use gdbind_core::private;

/// Often-imported symbols.
pub mod prelude;
