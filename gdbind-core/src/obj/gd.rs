/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;
use std::ops::{Deref, DerefMut};

use crate::builtin::Variant;
use crate::meta::error::{ConvertError, ErrorKind};
use crate::meta::{FromGodot, GodotConvert, ToGodot};
use crate::obj::bounds::{DeclEngine, DeclUser, Declarer, DynMemory, MemManual};
use crate::obj::guards::{GdMut, GdRef};
use crate::obj::raw_gd::Ownership;
use crate::obj::{cap, Bounds, GdDerefTarget, GodotClass, Inherits, InstanceId, RawGd};
use crate::{storage, sys};

/// Smart pointer to objects owned by the engine.
///
/// `Gd<T>` can point to engine classes (`Gd<Node>`, `Gd<RefCounted>`) as well as host classes declared with
/// `#[derive(GodotClass)]`. Its lifetime semantics depend on the class:
///
/// - **Ref-counted** classes: cloning increments the engine's reference counter, dropping decrements it. The object
///   is destroyed when the last reference goes away.
/// - **Manually managed** classes: the object lives until [`free()`][Self::free] is called, or the engine destroys
///   it (e.g. as part of a scene tree). Dropping a `Gd` does nothing.
/// - `Gd<Object>` decides between the two at runtime.
///
/// Handles are deliberately neither `Send` nor `Sync`; the engine expects object graphs to be mutated from one thread.
///
/// Engine methods are available through `Deref`/`DerefMut`. For host classes, the target is the engine base class;
/// access the host struct itself through [`bind()`][Self::bind] and [`bind_mut()`][Self::bind_mut].
#[repr(C)]
pub struct Gd<T: GodotClass> {
    // Never null; `Option<Gd<T>>` expresses nullability.
    pub(crate) raw: RawGd<T>,
}

/// _The methods in this impl block are only available for host-declared `T`, that is, structs with
/// `#[derive(GodotClass)]`._
impl<T> Gd<T>
where
    T: GodotClass + Bounds<Declarer = DeclUser>,
{
    /// Hands out a guard for a shared borrow, through which the host instance can be read.
    ///
    /// # Panics
    /// If there is an ongoing `bind_mut()` on any handle to the same object.
    pub fn bind(&self) -> GdRef<'_, T> {
        self.raw.check_alive("bind");

        // SAFETY: object is alive; host class instances always carry an `InstanceStorage<T>`.
        let storage = unsafe { storage::as_storage::<T>(self.instance_ptr()) };
        GdRef::from_cell(storage.get())
    }

    /// Hands out a guard for an exclusive borrow, through which the host instance can be read and written.
    ///
    /// # Panics
    /// If there is an ongoing `bind()` or `bind_mut()` on any handle to the same object.
    pub fn bind_mut(&mut self) -> GdMut<'_, T> {
        self.raw.check_alive("bind_mut");

        // SAFETY: see bind().
        let storage = unsafe { storage::as_storage::<T>(self.instance_ptr()) };
        GdMut::from_cell(storage.get_mut())
    }

    fn instance_ptr(&self) -> sys::GDExtensionClassInstancePtr {
        // SAFETY: object is alive (checked by callers).
        let instance = unsafe { sys::interface_fn!(object_get_instance)(self.raw.obj_sys()) };
        assert!(
            !instance.is_null(),
            "object of class {} has no host instance attached; it is still being constructed",
            T::CLASS_NAME
        );
        instance
    }
}

/// _The methods in this impl block are available for any `T`._ <br><br>
impl<T: GodotClass> Gd<T> {
    /// Looks up the object with the given instance ID, if it is alive and has class `T`.
    pub fn try_from_instance_id(instance_id: InstanceId) -> Option<Self> {
        // SAFETY: the engine returns null for unknown IDs.
        let ptr = unsafe { sys::interface_fn!(object_get_instance_from_id)(instance_id.to_u64()) };
        if ptr.is_null() {
            return None;
        }

        // SAFETY: non-null pointer to a live object; a new reference is acquired.
        let raw = unsafe { RawGd::<crate::classes::Object>::from_obj_sys_owned(ptr) };
        raw.owned_cast::<T>().ok().map(Self::from_ffi)
    }

    /// ⚠️ Looks up the object with the given instance ID.
    ///
    /// # Panics
    /// If the object is dead or not of class `T`.
    pub fn from_instance_id(instance_id: InstanceId) -> Self {
        Self::try_from_instance_id(instance_id).unwrap_or_else(|| {
            panic!(
                "instance ID {instance_id} does not belong to a valid object of class {}",
                T::CLASS_NAME
            )
        })
    }

    /// ⚠️ Returns the instance ID of this object.
    ///
    /// # Panics
    /// If the object has been freed (only detected when call checks are enabled).
    pub fn instance_id(&self) -> InstanceId {
        self.raw.check_alive("instance_id");
        self.instance_id_unchecked()
    }

    /// Returns the last known instance ID, without checking whether the object is still alive.
    ///
    /// The engine does not reuse IDs, so this is a cheap way to identify an object even after it died.
    pub fn instance_id_unchecked(&self) -> InstanceId {
        match self.raw.instance_id_unchecked() {
            Some(id) => id,
            None => unreachable!("Gd is never null"),
        }
    }

    /// Checks if this handle still points to a live object.
    ///
    /// Returns `false` after the object was freed through this or any other handle, or by the engine.
    pub fn is_instance_valid(&self) -> bool {
        self.raw.is_instance_valid()
    }

    /// Whether dropping this handle releases a reference.
    pub fn ownership(&self) -> Ownership {
        self.raw.ownership()
    }

    /// **Upcast:** converts into a handle to a base class. Never fails.
    ///
    /// The underlying object pointer and reference count are moved over unchanged.
    pub fn upcast<Base>(self) -> Gd<Base>
    where
        Base: GodotClass,
        T: Inherits<Base>,
    {
        // SAFETY: `T: Inherits<Base>` guarantees the object is also a `Base`.
        let raw = unsafe { self.into_raw().into_upcast::<Base>() };
        Gd::from_ffi(raw)
    }

    /// **Upcast shared-ref:** views this handle as an engine base class, without touching the reference count.
    pub fn upcast_ref<Base>(&self) -> &Base
    where
        Base: GodotClass + Bounds<Declarer = DeclEngine>,
        T: Inherits<Base>,
    {
        self.raw.check_alive("upcast_ref");

        // SAFETY: engine class structs are `#[repr(C)]` wrappers around one object pointer, which is also the first field
        // of `RawGd`. The inheritance bound makes the reinterpreted pointer valid for `Base`.
        unsafe { &*(&self.raw as *const RawGd<T> as *const Base) }
    }

    /// **Upcast exclusive-ref:** views this handle as an engine base class, without touching the reference count.
    pub fn upcast_mut<Base>(&mut self) -> &mut Base
    where
        Base: GodotClass + Bounds<Declarer = DeclEngine>,
        T: Inherits<Base>,
    {
        self.raw.check_alive("upcast_mut");

        // SAFETY: see upcast_ref().
        unsafe { &mut *(&mut self.raw as *mut RawGd<T> as *mut Base) }
    }

    /// **Downcast:** tries to convert into a handle to a derived class.
    ///
    /// If the dynamic type of the object is not `Derived` or a subclass, the original handle is returned in `Err`.
    pub fn try_cast<Derived>(self) -> Result<Gd<Derived>, Self>
    where
        Derived: GodotClass + Inherits<T>,
    {
        self.owned_cast()
    }

    /// ⚠️ **Downcast:** converts into a handle to a derived class.
    ///
    /// # Panics
    /// If the dynamic type of the object is not `Derived` or a subclass. Use [`try_cast()`][Self::try_cast] to check.
    pub fn cast<Derived>(self) -> Gd<Derived>
    where
        Derived: GodotClass + Inherits<T>,
    {
        self.owned_cast().unwrap_or_else(|from_obj| {
            panic!(
                "downcast from {from} to {to} failed; instance {from_obj:?}",
                from = T::CLASS_NAME,
                to = Derived::CLASS_NAME,
            )
        })
    }

    fn owned_cast<U: GodotClass>(self) -> Result<Gd<U>, Self> {
        self.into_raw().owned_cast().map(Gd::from_ffi).map_err(Self::from_ffi)
    }

    /// Returns the raw object pointer, e.g. for passing it to engine functions manually.
    #[doc(hidden)]
    pub fn obj_sys(&self) -> sys::GDExtensionObjectPtr {
        self.raw.obj_sys()
    }

    /// Adopts one reference that the caller already holds, e.g. a freshly constructed object.
    ///
    /// # Safety
    /// `ptr` must point to a live object of class `T` (or a subclass).
    #[doc(hidden)]
    pub unsafe fn from_obj_sys_transferred(ptr: sys::GDExtensionObjectPtr) -> Self {
        Self::from_ffi(RawGd::from_obj_sys_transferred(ptr))
    }

    /// Handle that does not own a reference. Dropping it never releases the object.
    ///
    /// # Safety
    /// `ptr` must point to a live object of class `T` which outlives the handle.
    pub(crate) unsafe fn from_obj_sys_borrowed(ptr: sys::GDExtensionObjectPtr) -> Self {
        Self::from_ffi(RawGd::from_obj_sys_borrowed(ptr))
    }

    /// Acquires a new reference to the object.
    ///
    /// # Safety
    /// `ptr` must point to a live object of class `T`.
    pub(crate) unsafe fn from_obj_sys_owned(ptr: sys::GDExtensionObjectPtr) -> Self {
        Self::from_ffi(RawGd::from_obj_sys_owned(ptr))
    }

    /// # Panics
    /// If `raw` is null.
    pub(crate) fn from_ffi(raw: RawGd<T>) -> Self {
        assert!(!raw.is_null(), "Gd::from_ffi(): null object of class {}", T::CLASS_NAME);
        Self { raw }
    }

    pub(crate) fn into_raw(self) -> RawGd<T> {
        let this = std::mem::ManuallyDrop::new(self);

        // SAFETY: `this` is never dropped, so the field is moved out exactly once.
        unsafe { std::ptr::read(&this.raw) }
    }
}

impl<T: GodotClass> Deref for Gd<T> {
    // Always an engine class: T itself, or the base of a host class.
    type Target = GdDerefTarget<T>;

    fn deref(&self) -> &Self::Target {
        self.raw.check_alive("deref");

        // SAFETY: the deref target is an engine class struct, laid out as the object pointer (first field of RawGd).
        // For host classes, the target is the engine base, which the object inherits.
        unsafe { &*(&self.raw as *const RawGd<T> as *const Self::Target) }
    }
}

impl<T: GodotClass> DerefMut for Gd<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.raw.check_alive("deref_mut");

        // SAFETY: see deref().
        unsafe { &mut *(&mut self.raw as *mut RawGd<T> as *mut Self::Target) }
    }
}

/// _The methods in this impl block are only available for manually managed `T`, i.e. anything that is not
/// `RefCounted` or inherited from it._ <br><br>
impl<T> Gd<T>
where
    T: GodotClass + Bounds<Memory = MemManual>,
{
    /// Destroys the manually managed object.
    ///
    /// Consumes this handle and renders all other handles to the same object invalid. Using those afterwards panics
    /// when call checks are enabled; `is_instance_valid()` returns `false` in any case.
    ///
    /// # Panics
    /// - If the object has already been destroyed.
    /// - If this is a `Gd<Object>` which dynamically points to a ref-counted object.
    /// - If the handle is borrowed from the engine, e.g. the `Base` of a host class.
    pub fn free(self) {
        let ref_counted = T::DynMemory::is_ref_counted(&self.raw);
        assert_ne!(
            ref_counted,
            Some(true),
            "called free() on Gd<Object> which points to a RefCounted dynamic type; free() only supported for manually managed types\n\
            object: {self:?}"
        );

        assert!(
            ref_counted == Some(false) && self.is_instance_valid(),
            "called free() on already destroyed object {}",
            self.instance_id_unchecked()
        );

        assert_ne!(
            self.raw.ownership(),
            Ownership::Borrowed,
            "called free() on a borrowed handle; only the owner of {} may free it",
            self.instance_id_unchecked()
        );

        sys::out!("Gd::free      <{}>", std::any::type_name::<T>());

        // SAFETY: object is alive, as checked above. Host instance storage is released by the free callback.
        unsafe { sys::interface_fn!(object_destroy)(self.raw.obj_sys()) };

        std::mem::forget(self);
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Trait impls

impl<T: GodotClass> GodotConvert for Gd<T> {
    type Via = RawGd<T>;
}

impl<T: GodotClass> ToGodot for Gd<T> {
    fn to_godot(&self) -> Self::Via {
        self.raw.clone()
    }
}

impl<T: GodotClass> FromGodot for Gd<T> {
    fn try_from_godot(via: Self::Via) -> Result<Self, ConvertError> {
        if via.is_null() {
            return Err(ConvertError::with_kind(ErrorKind::NullObject));
        }

        Ok(Self::from_ffi(via))
    }
}

impl<T: GodotClass> GodotConvert for Option<Gd<T>> {
    type Via = RawGd<T>;
}

impl<T: GodotClass> ToGodot for Option<Gd<T>> {
    fn to_godot(&self) -> Self::Via {
        match self {
            Some(gd) => gd.raw.clone(),
            None => RawGd::null(),
        }
    }
}

impl<T: GodotClass> FromGodot for Option<Gd<T>> {
    fn try_from_godot(via: Self::Via) -> Result<Self, ConvertError> {
        if via.is_null() {
            Ok(None)
        } else {
            Ok(Some(Gd::from_ffi(via)))
        }
    }
}

impl<T: GodotClass> From<Gd<T>> for Variant {
    fn from(gd: Gd<T>) -> Self {
        gd.to_variant()
    }
}

/// Creates a default-constructed instance of a ref-counted class.
///
/// Manually managed classes are created with `new_alloc()` instead, so that the need to free them stays visible.
impl<T> Default for Gd<T>
where
    T: cap::GodotDefault + Bounds<Memory = crate::obj::bounds::MemRefCounted>,
{
    fn default() -> Self {
        T::Declarer::create_gd()
    }
}

impl<T: GodotClass> Clone for Gd<T> {
    fn clone(&self) -> Self {
        Self {
            raw: self.raw.clone(),
        }
    }
}

/// Handles are equal if they point to the same object, regardless of ownership.
impl<T: GodotClass> PartialEq for Gd<T> {
    fn eq(&self, other: &Self) -> bool {
        self.instance_id_unchecked() == other.instance_id_unchecked()
    }
}

impl<T: GodotClass> Eq for Gd<T> {}

impl<T: GodotClass> fmt::Debug for Gd<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Gd {:?}", self.raw)
    }
}

impl<T: GodotClass> fmt::Display for Gd<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}{}>", T::CLASS_NAME, self.instance_id_unchecked())
    }
}

impl<T: GodotClass> std::panic::UnwindSafe for Gd<T> {}
impl<T: GodotClass> std::panic::RefUnwindSafe for Gd<T> {}
