/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Types and traits related to objects.
//!
//! The most important symbols in this module are:
//! * [`GodotClass`], which is implemented for every class that the engine can work with (either engine- or host-provided).
//! * [`Gd`], a smart pointer that manages instances of engine classes.

use crate::sys;

mod base;
mod gd;
mod guards;
mod instance_id;
mod object_arg;
mod raw_gd;
mod traits;

pub use base::*;
pub use gd::*;
pub use guards::{GdMut, GdRef};
pub use instance_id::*;
pub use object_arg::ObjectArg;
pub use raw_gd::{Ownership, RawGd};
pub use traits::*;

pub mod bounds;
pub use bounds::private::Bounds;

/// Resolves the type to which a `Gd<T>` dereferences.
///
/// - [`bounds::DeclEngine`]: for all engine-provided classes, `DerefTarget<T>` is `T`.
/// - [`bounds::DeclUser`]: for host-defined classes, `DerefTarget<T>` is `T::Base`.
pub type GdDerefTarget<T> = <<T as Bounds>::Declarer as bounds::Declarer>::DerefTarget<T>;

/// Constructs a new engine object of class `T` and adopts the reference that comes with it.
///
/// The reference counter is not initialized yet; see [`bounds::DynMemory::maybe_init_ref`].
#[doc(hidden)]
pub fn construct_engine_object<T: GodotClass>() -> Gd<T> {
    // SAFETY: the engine returns a fresh object of the named class, or null if the class is unknown or abstract.
    unsafe {
        let object_ptr = sys::interface_fn!(classdb_construct_object)(T::class_name_c().as_ptr());
        assert!(!object_ptr.is_null(), "engine could not construct object of class {}", T::CLASS_NAME);

        Gd::from_obj_sys_transferred(object_ptr)
    }
}
