/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::any::type_name;
use std::cell::{Ref, RefCell, RefMut};

use crate::log::godot_error;
use crate::obj::GodotClass;
use crate::sys;

/// Manages storage and lifecycle of host class instances.
///
/// The engine holds a pointer to this struct as the object's extension instance. Trampolines and `Gd::bind*()`
/// reach the host struct through it.
pub struct InstanceStorage<T: GodotClass> {
    user_instance: RefCell<T>,
}

impl<T: GodotClass> InstanceStorage<T> {
    pub fn construct(user_instance: T) -> Self {
        sys::out!("    Storage::construct             <{}>", type_name::<T>());

        Self {
            user_instance: RefCell::new(user_instance),
        }
    }

    pub(crate) fn is_bound(&self) -> bool {
        // Needs to borrow mutably, otherwise it succeeds if shared borrows are alive.
        self.user_instance.try_borrow_mut().is_err()
    }

    pub fn get(&self) -> Ref<'_, T> {
        self.user_instance.try_borrow().unwrap_or_else(|_e| {
            panic!(
                "Gd<T>::bind() failed, already bound; T = {}.\n  \
                 Make sure there is no &mut T live at the time.\n  \
                 This often occurs when an engine callback re-enters host code of the same object.",
                type_name::<T>()
            )
        })
    }

    pub fn get_mut(&self) -> RefMut<'_, T> {
        self.user_instance.try_borrow_mut().unwrap_or_else(|_e| {
            panic!(
                "Gd<T>::bind_mut() failed, already bound; T = {}.\n  \
                 Make sure there is no &T or &mut T live at the time.\n  \
                 This often occurs when an engine callback re-enters host code of the same object.",
                type_name::<T>()
            )
        })
    }

    pub(crate) fn into_raw(self) -> *mut Self {
        Box::into_raw(Box::new(self))
    }
}

impl<T: GodotClass> Drop for InstanceStorage<T> {
    fn drop(&mut self) {
        sys::out!("    Storage::drop                  <{}>", type_name::<T>());
    }
}

/// Interprets an opaque extension instance pointer as the storage of `T`.
///
/// # Safety
/// `instance_ptr` must have been created by [`InstanceStorage::into_raw`] for the same `T`, and not yet destroyed.
pub unsafe fn as_storage<'u, T: GodotClass>(instance_ptr: sys::GDExtensionClassInstancePtr) -> &'u InstanceStorage<T> {
    &*(instance_ptr as *mut InstanceStorage<T>)
}

/// Releases the storage and with it the host instance.
///
/// If a `bind()`/`bind_mut()` guard is still alive, the host instance is leaked instead of dropped, and an error is
/// printed. References handed out by the guard stay valid that way.
///
/// # Safety
/// `instance_ptr` must point to a valid storage of `T`. This function must only be invoked once for a pointer.
pub unsafe fn destroy_storage<T: GodotClass>(instance_ptr: sys::GDExtensionClassInstancePtr) {
    let raw = instance_ptr as *mut InstanceStorage<T>;

    // Panicking is not an option, since this runs inside an engine callback.
    if (*raw).is_bound() {
        godot_error!(
            "Destroyed an object of class {} while a bind() or bind_mut() call was active; leaking its host instance.\n  \
             Make sure objects are not destroyed while you still hold a reference to them, or use Gd::free().",
            T::CLASS_NAME
        );
        return;
    }

    drop(Box::from_raw(raw));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::obj::bounds::{DeclUser, MemManual};
    use crate::obj::{Bounds, GodotClass, NoBase};

    // Not registered with any engine; storage never touches the binding.
    struct Counter {
        value: i32,
    }

    impl GodotClass for Counter {
        type Base = NoBase;
        const CLASS_NAME: &'static str = "Counter";

        fn class_name_c() -> &'static std::ffi::CStr {
            c"Counter"
        }
    }

    unsafe impl Bounds for Counter {
        type Memory = MemManual;
        type DynMemory = MemManual;
        type Declarer = DeclUser;
    }

    #[test]
    fn shared_binds_coexist() {
        let storage = InstanceStorage::construct(Counter { value: 3 });

        let a = storage.get();
        let b = storage.get();
        assert_eq!(a.value + b.value, 6);
        assert!(storage.is_bound());
    }

    #[test]
    fn exclusive_bind_releases() {
        let storage = InstanceStorage::construct(Counter { value: 3 });

        storage.get_mut().value += 1;
        assert!(!storage.is_bound());
        assert_eq!(storage.get().value, 4);
    }

    #[test]
    #[should_panic(expected = "bind_mut() failed, already bound")]
    fn exclusive_while_shared_panics() {
        let storage = InstanceStorage::construct(Counter { value: 3 });

        let _shared = storage.get();
        let _exclusive = storage.get_mut();
    }
}
