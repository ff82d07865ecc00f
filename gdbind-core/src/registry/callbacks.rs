/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Callbacks that are passed as function pointers to the engine upon class registration.
//!
//! Re-exported to `crate::private`.
#![allow(clippy::missing_safety_doc)]

use std::ffi::CStr;

use crate::log::godot_error;
use crate::obj::{cap, Base, GodotClass};
use crate::private::handle_panic;
use crate::storage::{destroy_storage, InstanceStorage};
use crate::sys;
use sys::interface_fn;

/// Engine-facing default constructor.
///
/// If the `init()` constructor panics, null is returned and the base object is destroyed again.
pub unsafe extern "C" fn create<T: cap::GodotDefault>(_class_userdata: *mut std::ffi::c_void) -> sys::GDExtensionObjectPtr {
    create_custom(T::__godot_user_init).unwrap_or(std::ptr::null_mut())
}

pub(crate) fn create_custom<T, F>(make_user_instance: F) -> Option<sys::GDExtensionObjectPtr>
where
    T: GodotClass,
    F: FnOnce(Base<T::Base>) -> T,
{
    // SAFETY: the base class is an engine class that was registered before any host class.
    let base_ptr = unsafe { interface_fn!(classdb_construct_object)(T::Base::class_name_c().as_ptr()) };
    if base_ptr.is_null() {
        godot_error!(
            "engine could not construct base class {} of {}",
            T::Base::CLASS_NAME,
            T::CLASS_NAME
        );
        return None;
    }

    // SAFETY: the base object was just created and lives as long as the host instance attached to it.
    let base = unsafe { Base::from_obj_sys(base_ptr) };

    // User constructor init() can panic, which must not unwind into the engine.
    let context = || format!("panic during {}::init() constructor", T::CLASS_NAME);
    let code = || make_user_instance(base);

    let Some(user_instance) = handle_panic(context, std::panic::AssertUnwindSafe(code)) else {
        // SAFETY: `base_ptr` was created above and nothing else refers to it.
        unsafe { interface_fn!(object_destroy)(base_ptr) };
        return None;
    };

    let instance_ptr = InstanceStorage::<T>::construct(user_instance).into_raw() as sys::GDExtensionClassInstancePtr;

    // SAFETY: from now on the engine owns the storage and releases it through `free::<T>`.
    unsafe { interface_fn!(object_set_instance)(base_ptr, T::class_name_c().as_ptr(), instance_ptr) };

    sys::out!("create callback: {} at {base_ptr:?}", T::CLASS_NAME);
    Some(base_ptr)
}

pub unsafe extern "C" fn free<T: GodotClass>(
    _class_userdata: *mut std::ffi::c_void,
    instance: sys::GDExtensionClassInstancePtr,
) {
    sys::out!("free callback: {}", T::CLASS_NAME);
    destroy_storage::<T>(instance);
}

/// Looks up the trampoline for a virtual method.
///
/// Returns null if `T` does not override `name`. The engine then runs the native default of its own class chain.
pub unsafe extern "C" fn get_virtual<T: cap::ImplementsGodotVirtual>(
    _class_userdata: *mut std::ffi::c_void,
    name: *const std::ffi::c_char,
) -> sys::GDExtensionClassCallVirtual {
    if name.is_null() {
        return None;
    }

    // This string is not ours; it is only borrowed for the duration of the call.
    let Ok(method_name) = CStr::from_ptr(name).to_str() else {
        return None;
    };

    T::__virtual_call(method_name)
}
