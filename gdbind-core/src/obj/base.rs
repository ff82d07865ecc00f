/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use crate::obj::{Gd, GodotClass};
use crate::sys;

/// Restricted version of `Gd`, to hold the base instance inside a host struct.
///
/// The handle is borrowed: it does not keep the object alive. Otherwise a ref-counted object would own its own host
/// instance, which owns the base, which owns the object, and nothing would ever be released.
pub struct Base<T: GodotClass> {
    obj: Gd<T>,
}

impl<T: GodotClass> Base<T> {
    /// # Safety
    /// `base_ptr` must point to a live object of class `T`, which outlives this `Base`.
    pub(crate) unsafe fn from_obj_sys(base_ptr: sys::GDExtensionObjectPtr) -> Self {
        assert!(!base_ptr.is_null(), "instance base is null pointer");

        Self {
            obj: Gd::from_obj_sys_borrowed(base_ptr),
        }
    }

    /// Returns a [`Gd`] referencing the same object, holding its own reference.
    ///
    /// Prefer [`WithBaseField::to_gd()`](super::WithBaseField::to_gd) to obtain a handle to the host class itself.
    pub fn to_gd(&self) -> Gd<T> {
        self.obj.clone()
    }

    #[doc(hidden)]
    pub fn as_gd(&self) -> &Gd<T> {
        &self.obj
    }

    #[doc(hidden)]
    pub fn as_gd_mut(&mut self) -> &mut Gd<T> {
        &mut self.obj
    }
}

impl<T: GodotClass> fmt::Debug for Base<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Base {{ id: {} }}", self.obj.instance_id_unchecked())
    }
}
