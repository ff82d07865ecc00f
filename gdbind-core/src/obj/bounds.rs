/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Different ways how bounds of a `GodotClass` can be checked.
//!
//! This module contains three traits that can be used to check the characteristics of a `GodotClass` type:
//!
//! 1. [`Declarer`] tells you whether the class is provided by the engine or user-defined.
//!    - [`DeclEngine`] is used for all classes provided by the engine (e.g. `Node2D`).
//!    - [`DeclUser`] is used for all classes defined by the user, typically through `#[derive(GodotClass)]`.<br><br>
//!
//! 2. [`Memory`] is used to check the memory strategy of the **static** type.
//!    - [`MemRefCounted`] is used for `RefCounted` classes and derived.
//!    - [`MemManual`] is used for `Object` and all inherited classes which are not `RefCounted` (e.g. `Node`).<br><br>
//!
//! 3. [`DynMemory`] is used to check the memory strategy of the **dynamic** type.
//!    - [`MemRefCounted`] and [`MemManual`] as above, except that `Object` is excluded from `MemManual`.
//!    - [`MemDynamic`] is used for `Object` instances. `Gd<Object>` can point to objects of any class, so whether it is
//!      ref-counted is determined at runtime.

use crate::obj::cap::GodotDefault;
use crate::obj::{Gd, GodotClass, RawGd};
use crate::{classes, registry, sys};
use private::{Bounds, Sealed};

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Sealed trait

pub(super) mod private {
    use super::{Declarer, DynMemory, Memory};

    // Bounds trait declared here for code locality; re-exported in crate::obj.

    /// Library-implemented trait to check bounds on `GodotClass` types.
    ///
    /// See also [`bounds`](crate::obj::bounds) module documentation.
    ///
    /// # Safety
    /// Internal. You **must not** implement this trait yourself; the class generator and `#[derive(GodotClass)]` do it.
    pub unsafe trait Bounds {
        /// Defines the memory strategy of the static type.
        type Memory: Memory;

        /// Defines the memory strategy of the instance (at runtime).
        type DynMemory: DynMemory;

        /// Whether this class is provided by the engine, or declared by the user as a Rust struct.
        type Declarer: Declarer;
    }

    pub trait Sealed {}
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Memory bounds

/// Specifies the memory strategy of the static type.
pub trait Memory: Sealed {}

/// Specifies the memory strategy of the dynamic type.
///
/// For `Gd<Object>`, it is determined at runtime whether the instance is manually managed or ref-counted.
pub trait DynMemory: Sealed {
    /// Initialize reference counter of a freshly constructed object.
    #[doc(hidden)]
    fn maybe_init_ref<T: GodotClass>(obj: &RawGd<T>);

    /// If ref-counted, then increment count.
    #[doc(hidden)]
    fn maybe_inc_ref<T: GodotClass>(obj: &RawGd<T>);

    /// If ref-counted, then decrement count. Returns `true` if the count hit 0 and the object must be destroyed.
    ///
    /// # Safety
    /// The caller must give up one reference that it actually holds.
    #[doc(hidden)]
    unsafe fn maybe_dec_ref<T: GodotClass>(obj: &RawGd<T>) -> bool;

    /// Check if ref-counted; `None` if the information is not available (dynamic and object dead).
    #[doc(hidden)]
    fn is_ref_counted<T: GodotClass>(obj: &RawGd<T>) -> Option<bool>;
}

/// Memory managed through the engine's reference counter (always present).
/// This is used for `RefCounted` classes and derived.
pub struct MemRefCounted {}
impl Sealed for MemRefCounted {}
impl Memory for MemRefCounted {}
impl DynMemory for MemRefCounted {
    fn maybe_init_ref<T: GodotClass>(obj: &RawGd<T>) {
        sys::out!("  Stat::init  <{}>", std::any::type_name::<T>());
        if obj.is_null() {
            return;
        }

        let success = with_ref_counted(obj, |refc| refc.init_ref());
        assert!(success, "init_ref() failed");
    }

    fn maybe_inc_ref<T: GodotClass>(obj: &RawGd<T>) {
        sys::out!("  Stat::inc   <{}>", std::any::type_name::<T>());
        if obj.is_null() {
            return;
        }

        let success = with_ref_counted(obj, |refc| refc.reference());
        assert!(success, "reference() failed");
    }

    unsafe fn maybe_dec_ref<T: GodotClass>(obj: &RawGd<T>) -> bool {
        sys::out!("  Stat::dec   <{}>", std::any::type_name::<T>());
        if obj.is_null() {
            return false;
        }

        let is_last = with_ref_counted(obj, |refc| refc.unreference());
        sys::out!("  +-- was last={is_last}");
        is_last
    }

    fn is_ref_counted<T: GodotClass>(_obj: &RawGd<T>) -> Option<bool> {
        Some(true)
    }
}

/// Memory managed through the engine's reference counter, if present; otherwise manual.
/// This is used only for `Object` classes.
pub struct MemDynamic {}
impl MemDynamic {
    /// Asks the engine whether the object inherits `RefCounted`. `None` for null or dead objects.
    fn inherits_ref_counted<T: GodotClass>(obj: &RawGd<T>) -> Option<bool> {
        if obj.is_null() || !obj.is_instance_valid() {
            return None;
        }

        // SAFETY: object is alive; class tag lookup and cast have no preconditions beyond that.
        let cast = unsafe {
            let class_tag = sys::interface_fn!(classdb_get_class_tag)(c"RefCounted".as_ptr());
            sys::interface_fn!(object_cast_to)(obj.obj_sys(), class_tag)
        };

        Some(!cast.is_null())
    }
}
impl Sealed for MemDynamic {}
impl DynMemory for MemDynamic {
    fn maybe_init_ref<T: GodotClass>(obj: &RawGd<T>) {
        sys::out!("  Dyn::init  <{}>", std::any::type_name::<T>());
        if Self::inherits_ref_counted(obj) == Some(true) {
            MemRefCounted::maybe_init_ref(obj)
        }
    }

    fn maybe_inc_ref<T: GodotClass>(obj: &RawGd<T>) {
        sys::out!("  Dyn::inc   <{}>", std::any::type_name::<T>());
        if Self::inherits_ref_counted(obj) == Some(true) {
            MemRefCounted::maybe_inc_ref(obj)
        }
    }

    unsafe fn maybe_dec_ref<T: GodotClass>(obj: &RawGd<T>) -> bool {
        sys::out!("  Dyn::dec   <{}>", std::any::type_name::<T>());
        if Self::inherits_ref_counted(obj) == Some(true) {
            MemRefCounted::maybe_dec_ref(obj)
        } else {
            false
        }
    }

    fn is_ref_counted<T: GodotClass>(obj: &RawGd<T>) -> Option<bool> {
        Self::inherits_ref_counted(obj)
    }
}

/// No memory management, user responsible for not leaking.
/// This is used for all `Object` derivates which are not `RefCounted`. `Object` itself is excluded from `DynMemory`.
pub struct MemManual {}
impl Sealed for MemManual {}
impl Memory for MemManual {}
impl DynMemory for MemManual {
    fn maybe_init_ref<T: GodotClass>(_obj: &RawGd<T>) {}
    fn maybe_inc_ref<T: GodotClass>(_obj: &RawGd<T>) {}
    unsafe fn maybe_dec_ref<T: GodotClass>(_obj: &RawGd<T>) -> bool {
        false
    }
    fn is_ref_counted<T: GodotClass>(_obj: &RawGd<T>) -> Option<bool> {
        Some(false)
    }
}

/// Runs `apply` on a `RefCounted` view of the object.
///
/// The caller guarantees that the object inherits `RefCounted`.
fn with_ref_counted<T: GodotClass, R>(obj: &RawGd<T>, apply: impl FnOnce(&mut classes::RefCounted) -> R) -> R {
    // SAFETY: engine class structs are `#[repr(C)]` wrappers around the object pointer, which is the first field of RawGd.
    // The view is a bitwise copy of that pointer and has no destructor.
    let mut view = unsafe { std::ptr::read(obj as *const RawGd<T> as *const classes::RefCounted) };
    apply(&mut view)
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Declarer bounds

/// Trait that specifies who declares a given `GodotClass`.
pub trait Declarer: Sealed {
    /// The engine class that `Gd<T>` dereferences to.
    type DerefTarget<T: GodotClass>: GodotClass;

    #[doc(hidden)]
    fn create_gd<T>() -> Gd<T>
    where
        T: GodotDefault + Bounds<Declarer = Self>;
}

/// Expresses that a class is declared by the engine.
pub enum DeclEngine {}
impl Sealed for DeclEngine {}
impl Declarer for DeclEngine {
    type DerefTarget<T: GodotClass> = T;

    fn create_gd<T>() -> Gd<T>
    where
        T: GodotDefault + Bounds<Declarer = Self>,
    {
        let gd = crate::obj::construct_engine_object::<T>();
        T::DynMemory::maybe_init_ref(&gd.raw);
        gd
    }
}

/// Expresses that a class is declared by the user.
pub enum DeclUser {}
impl Sealed for DeclUser {}
impl Declarer for DeclUser {
    type DerefTarget<T: GodotClass> = T::Base;

    fn create_gd<T>() -> Gd<T>
    where
        T: GodotDefault + Bounds<Declarer = Self>,
    {
        // SAFETY: `create` either returns a fully initialized object carrying one reference, or null.
        let gd = unsafe {
            let object_ptr = registry::callbacks::create::<T>(std::ptr::null_mut());
            assert!(!object_ptr.is_null(), "{}::init() failed; see error output", T::CLASS_NAME);
            Gd::from_obj_sys_transferred(object_ptr)
        };

        T::DynMemory::maybe_init_ref(&gd.raw);
        gd
    }
}
