/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::marker::PhantomData;
use std::{fmt, ptr};

use crate::builtin::Variant;
use crate::meta::error::ConvertError;
use crate::meta::{FromGodot, GodotConvert, GodotType, ToGodot};
use crate::obj::{Gd, GodotClass, Inherits};
use crate::sys;
use sys::{EngineFfi, EngineNullableFfi, PtrcallType, VariantType};

/// View of an object, passed as argument to an engine method.
///
/// Objects passed as arguments are borrowed by the engine, so this carries only the pointer and never touches the
/// reference count. The generated code creates it from a `&Gd<U>` right before the call, which keeps the object alive.
#[doc(hidden)]
pub struct ObjectArg<T: GodotClass> {
    obj: sys::GDExtensionObjectPtr,
    _marker: PhantomData<*mut T>,
}

impl<T: GodotClass> ObjectArg<T> {
    /// Borrows the object behind `gd`, viewed as base class `T`.
    pub fn from_gd<U: Inherits<T>>(gd: &Gd<U>) -> Self {
        gd.raw.check_alive("object argument");

        Self {
            obj: gd.obj_sys(),
            _marker: PhantomData,
        }
    }

    /// Borrows the object behind `gd`, or passes null.
    pub fn from_option<U: Inherits<T>>(gd: Option<&Gd<U>>) -> Self {
        gd.map_or_else(Self::null, Self::from_gd)
    }

    pub fn null() -> Self {
        Self {
            obj: ptr::null_mut(),
            _marker: PhantomData,
        }
    }

    pub fn is_null(&self) -> bool {
        self.obj.is_null()
    }
}

impl<T: GodotClass> Clone for ObjectArg<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: GodotClass> Copy for ObjectArg<T> {}

impl<T: GodotClass> Default for ObjectArg<T> {
    fn default() -> Self {
        Self::null()
    }
}

impl<T: GodotClass> fmt::Debug for ObjectArg<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "ObjectArg<{}> {{ null }}", T::CLASS_NAME)
        } else {
            write!(f, "ObjectArg<{}> {{ {:p} }}", T::CLASS_NAME, self.obj)
        }
    }
}

// SAFETY: the pointer is passed by address, exactly like `RawGd`. Ownership is never transferred in either direction:
// inbound arguments are borrowed, and this type is never used as a return value.
unsafe impl<T: GodotClass> EngineFfi for ObjectArg<T> {
    const VARIANT_TYPE: VariantType = VariantType::Object;

    unsafe fn new_from_sys(ptr: sys::GDExtensionConstTypePtr) -> Self {
        Self {
            obj: ptr::read(ptr as *const sys::GDExtensionObjectPtr),
            _marker: PhantomData,
        }
    }

    unsafe fn new_with_uninit(init: impl FnOnce(sys::GDExtensionUninitializedTypePtr)) -> Self {
        let mut obj: sys::GDExtensionObjectPtr = ptr::null_mut();
        init(ptr::addr_of_mut!(obj) as sys::GDExtensionUninitializedTypePtr);

        Self {
            obj,
            _marker: PhantomData,
        }
    }

    fn sys(&self) -> sys::GDExtensionConstTypePtr {
        ptr::addr_of!(self.obj) as sys::GDExtensionConstTypePtr
    }

    fn sys_mut(&mut self) -> sys::GDExtensionTypePtr {
        ptr::addr_of_mut!(self.obj) as sys::GDExtensionTypePtr
    }

    unsafe fn from_arg_ptr(ptr: sys::GDExtensionConstTypePtr, _call_type: PtrcallType) -> Self {
        Self::new_from_sys(ptr)
    }

    unsafe fn move_return_ptr(self, dst: sys::GDExtensionTypePtr, _call_type: PtrcallType) {
        ptr::write(dst as *mut sys::GDExtensionObjectPtr, self.obj);
    }
}

impl<T: GodotClass> EngineNullableFfi for ObjectArg<T> {
    fn null() -> Self {
        ObjectArg::null()
    }

    fn is_null(&self) -> bool {
        ObjectArg::is_null(self)
    }
}

impl<T: GodotClass> GodotConvert for ObjectArg<T> {
    type Via = Self;
}

impl<T: GodotClass> ToGodot for ObjectArg<T> {
    fn to_godot(&self) -> Self::Via {
        *self
    }
}

impl<T: GodotClass> FromGodot for ObjectArg<T> {
    fn try_from_godot(via: Self::Via) -> Result<Self, ConvertError> {
        Ok(via)
    }
}

impl<T: GodotClass> GodotType for ObjectArg<T> {
    fn godot_type_name() -> String {
        T::CLASS_NAME.to_string()
    }

    fn ffi_to_variant(&self) -> Variant {
        if self.is_null() {
            return Variant::nil();
        }

        let converter = sys::builtin_lifecycle!(to_variant, VariantType::Object);

        // SAFETY: the object is kept alive by the `Gd` this argument was created from. The variant takes its own reference.
        unsafe { Variant::new_with_var_uninit(|variant_ptr| converter(variant_ptr, sys::force_mut_ptr(self.sys()))) }
    }

    fn ffi_from_variant(_variant: &Variant) -> Result<Self, ConvertError> {
        // Would produce a pointer that nothing keeps alive.
        Err(ConvertError::new("ObjectArg cannot be converted from Variant; use Gd<T> instead"))
    }
}
