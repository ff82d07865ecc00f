/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, ptr};

use crate::builtin::Variant;
use crate::meta::error::{ConvertError, ErrorKind};
use crate::meta::{FromGodot, GodotConvert, GodotType, ToGodot};
use crate::obj::bounds::DynMemory;
use crate::obj::{GodotClass, InstanceId};
use crate::{classes, sys};
use sys::{interface_fn, EngineFfi, EngineNullableFfi, PtrcallType, VariantType};

/// Who is responsible for releasing the object behind a handle.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Ownership {
    /// The handle holds a reference: ref-counted objects are unreferenced when it is dropped.
    Owned,

    /// The engine guarantees the object's lifetime. Dropping the handle never releases anything.
    Borrowed,

    /// Adopted from a return value that already carried one reference. Released like [`Owned`](Self::Owned).
    Transferred,
}

/// Low-level bindings for object pointers.
///
/// This should not be used directly, you should either use [`Gd<T>`](super::Gd) or [`Option<Gd<T>>`]
/// depending on whether you need a nullable object pointer or not.
#[repr(C)]
#[doc(hidden)]
pub struct RawGd<T: GodotClass> {
    // First field: engine class structs are layout-compatible with this pointer, which makes upcast views possible.
    pub(super) obj: *mut T,

    // Must not be changed after initialization.
    instance_id: Option<InstanceId>,

    ownership: Ownership,
}

impl<T: GodotClass> RawGd<T> {
    /// The null handle.
    pub(crate) fn null() -> Self {
        Self {
            obj: ptr::null_mut(),
            instance_id: None,
            ownership: Ownership::Borrowed,
        }
    }

    /// Wraps `obj` without touching the reference counter.
    ///
    /// If `obj` is null, the result is the null handle.
    ///
    /// # Safety
    /// `obj` must be a valid object pointer or null.
    unsafe fn from_obj_sys_with(obj: sys::GDExtensionObjectPtr, ownership: Ownership) -> Self {
        if obj.is_null() {
            return Self::null();
        }

        let raw_id = interface_fn!(object_get_instance_id)(obj);
        let instance_id = InstanceId::try_from_u64(raw_id)
            .unwrap_or_else(|| panic!("null instance ID when constructing object; object is dead"));

        Self {
            obj: obj.cast::<T>(),
            instance_id: Some(instance_id),
            ownership,
        }
    }

    /// Handle that the engine keeps alive; never released by the host.
    ///
    /// # Safety
    /// `obj` must be a valid object pointer or null, and outlive the handle.
    pub(crate) unsafe fn from_obj_sys_borrowed(obj: sys::GDExtensionObjectPtr) -> Self {
        Self::from_obj_sys_with(obj, Ownership::Borrowed)
    }

    /// Adopts a reference that was already counted on the engine side, e.g. a ptrcall return value.
    ///
    /// # Safety
    /// `obj` must be a valid object pointer or null, carrying one reference for the caller.
    pub(crate) unsafe fn from_obj_sys_transferred(obj: sys::GDExtensionObjectPtr) -> Self {
        Self::from_obj_sys_with(obj, Ownership::Transferred)
    }

    /// Acquires a new reference.
    ///
    /// # Safety
    /// `obj` must be a valid object pointer or null.
    pub(crate) unsafe fn from_obj_sys_owned(obj: sys::GDExtensionObjectPtr) -> Self {
        Self::from_obj_sys_with(obj, Ownership::Borrowed).with_inc_refcount()
    }

    /// Returns `self` as an owned handle, with the reference counter incremented.
    pub(crate) fn with_inc_refcount(mut self) -> Self {
        T::DynMemory::maybe_inc_ref(&self);
        self.ownership = Ownership::Owned;
        self
    }

    /// Returns `true` if the object is null.
    ///
    /// This does not check if the object is dead. For that, use [`is_instance_valid()`](Self::is_instance_valid).
    pub(crate) fn is_null(&self) -> bool {
        self.obj.is_null() || self.instance_id.is_none()
    }

    pub(crate) fn instance_id_unchecked(&self) -> Option<InstanceId> {
        self.instance_id
    }

    pub(crate) fn ownership(&self) -> Ownership {
        self.ownership
    }

    pub(crate) fn is_instance_valid(&self) -> bool {
        self.instance_id.is_some_and(InstanceId::lookup_validity)
    }

    pub(crate) fn obj_sys(&self) -> sys::GDExtensionObjectPtr {
        self.obj as sys::GDExtensionObjectPtr
    }

    /// Verifies that the object is non-null and, when call checks are enabled, still alive.
    #[track_caller]
    pub(crate) fn check_alive(&self, what: &str) {
        assert!(!self.is_null(), "{what}: cannot access null object of class {}", T::CLASS_NAME);

        if sys::config().call_checks.enabled() && !self.is_instance_valid() {
            let id = self.instance_id.map(|id| id.to_string()).unwrap_or_default();
            panic!("{what}: object {id} of class {} used after it was freed", T::CLASS_NAME);
        }
    }

    /// Returns `Ok(cast_obj)` on success, `Err(self)` on error.
    ///
    /// Ownership and reference count move over unchanged.
    pub(crate) fn owned_cast<U: GodotClass>(self) -> Result<RawGd<U>, Self> {
        if self.is_null() {
            // Null can be cast to anything.
            return Ok(RawGd::null());
        }

        self.check_alive("cast");

        // SAFETY: object is alive; the engine returns null if the class does not match.
        let cast_ptr = unsafe {
            let class_tag = interface_fn!(classdb_get_class_tag)(U::class_name_c().as_ptr());
            if class_tag.is_null() {
                return Err(self);
            }
            interface_fn!(object_cast_to)(self.obj_sys(), class_tag)
        };

        if cast_ptr.is_null() {
            return Err(self);
        }

        let cast = RawGd {
            obj: cast_ptr.cast::<U>(),
            instance_id: self.instance_id,
            ownership: self.ownership,
        };

        // The reference is now held by `cast`.
        std::mem::forget(self);
        Ok(cast)
    }

    /// Reinterprets the handle as one of a base class, moving ownership over.
    ///
    /// # Safety
    /// `U` must be `T` or one of its ancestors.
    pub(crate) unsafe fn into_upcast<U: GodotClass>(self) -> RawGd<U> {
        let upcast = RawGd {
            obj: self.obj.cast::<U>(),
            instance_id: self.instance_id,
            ownership: self.ownership,
        };

        std::mem::forget(self);
        upcast
    }
}

// SAFETY:
// - `sys()` is the address of the object pointer, which is how the engine passes objects through ptrcalls.
// - from_arg_ptr takes a new reference; move_return_ptr hands one reference over.
unsafe impl<T: GodotClass> EngineFfi for RawGd<T> {
    const VARIANT_TYPE: VariantType = VariantType::Object;

    unsafe fn new_from_sys(ptr: sys::GDExtensionConstTypePtr) -> Self {
        let obj = ptr::read(ptr as *const sys::GDExtensionObjectPtr);
        Self::from_obj_sys_borrowed(obj)
    }

    unsafe fn new_with_uninit(init: impl FnOnce(sys::GDExtensionUninitializedTypePtr)) -> Self {
        let mut obj: sys::GDExtensionObjectPtr = ptr::null_mut();
        init(ptr::addr_of_mut!(obj) as sys::GDExtensionUninitializedTypePtr);

        Self::from_obj_sys_transferred(obj)
    }

    fn sys(&self) -> sys::GDExtensionConstTypePtr {
        ptr::addr_of!(self.obj) as sys::GDExtensionConstTypePtr
    }

    fn sys_mut(&mut self) -> sys::GDExtensionTypePtr {
        ptr::addr_of_mut!(self.obj) as sys::GDExtensionTypePtr
    }

    unsafe fn from_arg_ptr(ptr: sys::GDExtensionConstTypePtr, _call_type: PtrcallType) -> Self {
        // Arguments are borrowed from the engine; a handle that may outlive the call needs its own reference.
        let obj = ptr::read(ptr as *const sys::GDExtensionObjectPtr);
        Self::from_obj_sys_owned(obj)
    }

    unsafe fn move_return_ptr(self, dst: sys::GDExtensionTypePtr, _call_type: PtrcallType) {
        // The receiver adopts one reference. A borrowed handle does not hold one, so acquire it first.
        let this = if self.ownership == Ownership::Borrowed {
            self.with_inc_refcount()
        } else {
            self
        };

        ptr::write(dst as *mut sys::GDExtensionObjectPtr, this.obj_sys());
        std::mem::forget(this);
    }
}

impl<T: GodotClass> EngineNullableFfi for RawGd<T> {
    fn null() -> Self {
        RawGd::null()
    }

    fn is_null(&self) -> bool {
        RawGd::is_null(self)
    }
}

impl<T: GodotClass> GodotConvert for RawGd<T> {
    type Via = Self;
}

impl<T: GodotClass> ToGodot for RawGd<T> {
    fn to_godot(&self) -> Self::Via {
        self.clone()
    }
}

impl<T: GodotClass> FromGodot for RawGd<T> {
    fn try_from_godot(via: Self::Via) -> Result<Self, ConvertError> {
        Ok(via)
    }
}

impl<T: GodotClass> GodotType for RawGd<T> {
    fn godot_type_name() -> String {
        T::CLASS_NAME.to_string()
    }

    fn ffi_to_variant(&self) -> Variant {
        if self.is_null() {
            return Variant::nil();
        }

        let converter = sys::builtin_lifecycle!(to_variant, VariantType::Object);

        // SAFETY: the engine reads the object pointer and takes its own reference for the variant.
        unsafe { Variant::new_with_var_uninit(|variant_ptr| converter(variant_ptr, sys::force_mut_ptr(self.sys()))) }
    }

    fn ffi_from_variant(variant: &Variant) -> Result<Self, ConvertError> {
        match variant.get_type() {
            VariantType::Nil => return Ok(Self::null()),
            VariantType::Object => {}
            actual => return Err(ConvertError::bad_type(VariantType::Object, actual, variant)),
        }

        let converter = sys::builtin_lifecycle!(from_variant, VariantType::Object);

        // SAFETY: type tag checked above. The variant keeps the object alive until the handle holds its own reference.
        // The static class is not verified yet, so the reference goes through `Object`'s dynamic memory strategy.
        let object = unsafe {
            let mut obj: sys::GDExtensionObjectPtr = ptr::null_mut();
            converter(
                ptr::addr_of_mut!(obj) as sys::GDExtensionUninitializedTypePtr,
                sys::force_mut_ptr(variant.var_sys()),
            );

            RawGd::<classes::Object>::from_obj_sys_borrowed(obj)
        };

        if object.is_null() {
            return Err(ConvertError::with_kind(ErrorKind::DeadObject));
        }

        object
            .with_inc_refcount()
            .owned_cast::<T>()
            .map_err(|_| ConvertError::with_kind(ErrorKind::WrongClass { expected: T::CLASS_NAME }))
    }
}

impl<T: GodotClass> Default for RawGd<T> {
    fn default() -> Self {
        Self::null()
    }
}

impl<T: GodotClass> Drop for RawGd<T> {
    fn drop(&mut self) {
        if self.is_null() || self.ownership == Ownership::Borrowed {
            return;
        }

        // A dead object has nothing left to release.
        if !self.is_instance_valid() {
            return;
        }

        sys::out!("RawGd::drop   <{}>", std::any::type_name::<T>());

        // SAFETY: this handle holds one reference, which is given up here.
        let is_last = unsafe { T::DynMemory::maybe_dec_ref(self) };
        if is_last {
            // SAFETY: the last reference is gone; the engine does not destroy ref-counted objects on its own.
            unsafe { interface_fn!(object_destroy)(self.obj_sys()) };
        }
    }
}

impl<T: GodotClass> Clone for RawGd<T> {
    fn clone(&self) -> Self {
        if self.is_null() {
            return Self::null();
        }

        self.check_alive("clone");

        let copy = RawGd {
            obj: self.obj,
            instance_id: self.instance_id,
            ownership: Ownership::Borrowed,
        };

        copy.with_inc_refcount()
    }
}

impl<T: GodotClass> fmt::Debug for RawGd<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.instance_id {
            None => write!(f, "{} {{ null }}", T::CLASS_NAME),
            Some(id) => write!(f, "{} {{ id: {}, ownership: {:?} }}", T::CLASS_NAME, id.to_i64(), self.ownership),
        }
    }
}
