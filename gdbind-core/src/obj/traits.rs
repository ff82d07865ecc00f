/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::ffi::CStr;

use crate::obj::bounds::{self, Declarer as _};
use crate::obj::{Base, Bounds, Gd};

/// Makes `T` eligible to be managed by the engine and used as [`Gd<T>`][crate::obj::Gd] parameter.
///
/// Implemented by the class generator for every engine class, and by `#[derive(GodotClass)]` for host classes.
#[diagnostic::on_unimplemented(
    message = "only classes registered with the engine are allowed in this context",
    note = "you can use `#[derive(GodotClass)]` to register your own structs"
)]
pub trait GodotClass: Bounds + 'static
where
    Self: Sized,
{
    /// The immediate superclass of `T`. This is always an engine class.
    type Base: GodotClass;

    /// The name under which the class is known to the engine.
    const CLASS_NAME: &'static str;

    /// [`CLASS_NAME`][Self::CLASS_NAME] as NUL-terminated string, for passing it across the boundary.
    fn class_name_c() -> &'static CStr;

    /// Returns whether `Self` inherits from `Base`.
    ///
    /// This is reflexive, i.e `Self` inherits from itself. See also [`Inherits`] for a trait bound.
    fn inherits<Base: GodotClass>() -> bool {
        if Self::CLASS_NAME == Base::CLASS_NAME {
            true
        } else if Self::Base::CLASS_NAME == NoBase::CLASS_NAME {
            false
        } else {
            Self::Base::inherits::<Base>()
        }
    }
}

/// Type representing the absence of a base class, at the root of the hierarchy.
///
/// `NoBase` is used as the base class for exactly one class: [`Object`][crate::classes::Object].
pub enum NoBase {}

impl GodotClass for NoBase {
    type Base = NoBase;
    const CLASS_NAME: &'static str = "";

    fn class_name_c() -> &'static CStr {
        c""
    }
}

unsafe impl Bounds for NoBase {
    type Memory = bounds::MemManual;
    type DynMemory = bounds::MemManual;
    type Declarer = bounds::DeclEngine;
}

/// Non-strict inheritance relationship in the class hierarchy.
///
/// `Derived: Inherits<Base>` means that either `Derived` is a subclass of `Base`, or the class `Base` itself (hence
/// "non-strict"). Inheritance is transitive: `Node2D` implements `Inherits<Node>` and `Inherits<Object>`.
///
/// # Safety
/// This trait must only be implemented for subclasses of `Base`. Upcasts rely on it to reinterpret handles.
pub unsafe trait Inherits<Base: GodotClass>: GodotClass {}

// SAFETY: Every class is a subclass of itself.
unsafe impl<T: GodotClass> Inherits<T> for T {}

/// Auto-implemented for all engine-provided enums.
pub trait EngineEnum: Copy {
    fn try_from_ord(ord: i32) -> Option<Self>;

    /// Ordinal value of the enumerator, as specified by the engine. This is not necessarily unique.
    fn ord(self) -> i32;

    fn from_ord(ord: i32) -> Self {
        Self::try_from_ord(ord).unwrap_or_else(|| panic!("ordinal {ord} does not map to any enumerator"))
    }

    /// The name of the enumerator, as it appears in the class database.
    ///
    /// If several enumerators share an ordinal, the first one is returned. Unknown ordinals give the empty string.
    fn as_str(&self) -> &'static str;
}

/// Auto-implemented for all engine-provided bitfields.
pub trait EngineBitfield: Copy {
    fn try_from_ord(ord: u64) -> Option<Self>;

    /// Ordinal value of the bit flag, as specified by the engine.
    fn ord(self) -> u64;

    fn from_ord(ord: u64) -> Self {
        Self::try_from_ord(ord).unwrap_or_else(|| panic!("ordinal {ord} does not map to any valid bit flag"))
    }

    fn is_set(self, flag: Self) -> bool {
        self.ord() & flag.ord() != 0
    }
}

/// Implemented for host classes that contain a `Base<T>` field.
///
/// Gives direct access to the engine object underneath `self`.
#[diagnostic::on_unimplemented(
    message = "Class `{Self}` requires a `Base<T>` field",
    label = "missing field `base: Base<...>` in struct declaration"
)]
pub trait WithBaseField: GodotClass + Bounds<Declarer = bounds::DeclUser> {
    /// Returns a reference to the `Base` stored by this object.
    #[doc(hidden)]
    fn base_field(&self) -> &Base<Self::Base>;

    /// Returns a mutable reference to the `Base` stored by this object.
    #[doc(hidden)]
    fn base_field_mut(&mut self) -> &mut Base<Self::Base>;

    /// Returns the `Gd` pointer containing this object.
    ///
    /// This is intended to be stored or passed to engine methods. You cannot call `bind()` or `bind_mut()` on it while
    /// the method calling `to_gd()` is still running; that would lead to a double borrow panic.
    fn to_gd(&self) -> Gd<Self> {
        let base = self.base_field().as_gd();

        // SAFETY: the base object is alive while `self` is, and its host instance is `Self`. A new reference is acquired.
        unsafe { Gd::from_obj_sys_owned(base.obj_sys()) }
    }

    /// Engine methods of the base class, on `&self`.
    fn base(&self) -> &Gd<Self::Base> {
        self.base_field().as_gd()
    }

    /// Engine methods of the base class, on `&mut self`.
    ///
    /// Calling an engine method that re-enters host code of this object (e.g. by emitting a signal connected to it)
    /// panics with a double borrow, since `self` is already exclusively bound.
    fn base_mut(&mut self) -> &mut Gd<Self::Base> {
        self.base_field_mut().as_gd_mut()
    }
}

/// Extension trait for all reference-counted classes.
pub trait NewGd: GodotClass {
    /// Returns a new, ref-counted `Gd` containing a default-constructed instance.
    ///
    /// `MyClass::new_gd()` is equivalent to `Gd::<MyClass>::default()`.
    ///
    /// # Panics
    /// If `Self` is host-defined and its default constructor `init()` panics.
    fn new_gd() -> Gd<Self>;
}

impl<T> NewGd for T
where
    T: cap::GodotDefault + Bounds<Memory = bounds::MemRefCounted>,
{
    fn new_gd() -> Gd<Self> {
        Gd::default()
    }
}

/// Extension trait for all manually managed classes.
pub trait NewAlloc: GodotClass {
    /// Returns a new, manually managed `Gd` containing a default-constructed instance.
    ///
    /// The result must be managed by the caller, e.g. by attaching it to a parent node or calling `free()`.
    /// Failure to do so leaks the object.
    ///
    /// # Panics
    /// If `Self` is host-defined and its default constructor `init()` panics.
    #[must_use]
    fn new_alloc() -> Gd<Self>;
}

impl<T> NewAlloc for T
where
    T: cap::GodotDefault + Bounds<Memory = bounds::MemManual>,
{
    fn new_alloc() -> Gd<Self> {
        <Self as Bounds>::Declarer::create_gd()
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------

/// Capability traits, providing dedicated functionalities for classes.
pub mod cap {
    use super::*;
    use crate::sys;

    /// Trait for all classes that can be default-constructed.
    ///
    /// Implemented for:
    /// - host classes with `#[class(init)]` or a user-provided `init()`,
    /// - instantiable engine classes.
    #[diagnostic::on_unimplemented(
        message = "Class `{Self}` requires an `init` constructor",
        label = "needs `init`",
        note = "to provide a default constructor, use `#[class(init)]` or implement an `init` method"
    )]
    pub trait GodotDefault: GodotClass {
        /// Only provided for host classes.
        #[doc(hidden)]
        fn __godot_user_init(_base: Base<Self::Base>) -> Self {
            unreachable!("__godot_user_init() called on engine class; must be overridden for host classes")
        }
    }

    /// Implemented by `#[godot_api]` on the `I*` trait impl of a host class.
    pub trait ImplementsGodotVirtual: GodotClass {
        /// Returns the trampoline for the virtual method `name`, or `None` if the class does not override it.
        #[doc(hidden)]
        fn __virtual_call(name: &str) -> sys::GDExtensionClassCallVirtual;
    }
}
