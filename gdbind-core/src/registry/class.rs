/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::collections::HashMap;
use std::ffi::CString;
use std::ptr;
use std::sync::{Mutex, MutexGuard, TryLockError};

use crate::log::godot_error;
use crate::registry::plugin::{ClassPlugin, CreateFn, FreeFn, PluginItem};
use crate::sys;
use sys::{interface_fn, out};

// Needed for class unregistering. The engine registers and unregisters on its main thread; the mutex only makes the
// static safe. Concurrent access is a bug and panics instead of blocking.
static LOADED_CLASSES: Mutex<Vec<LoadedClass>> = Mutex::new(Vec::new());

/// A class that is currently registered with the engine.
struct LoadedClass {
    name: CString,
}

#[derive(Debug)]
struct ClassRegistrationInfo {
    class_name: &'static str,
    parent_class_name: Option<&'static str>,
    create_fn: Option<CreateFn>,
    free_fn: Option<FreeFn>,
    user_virtual_fn: sys::GDExtensionClassGetVirtual,
}

impl ClassRegistrationInfo {
    fn new(class_name: &'static str) -> Self {
        Self {
            class_name,
            parent_class_name: None,
            create_fn: None,
            free_fn: None,
            user_virtual_fn: None,
        }
    }
}

/// Lets the engine know about all classes that have self-registered through the plugin system.
pub fn auto_register_classes() {
    out!("Auto-register classes...");

    let mut map = HashMap::<&'static str, ClassRegistrationInfo>::new();
    let mut order = Vec::new();

    crate::private::iterate_plugins(|elem: &ClassPlugin| {
        let name = elem.class_name;
        let class_info = map.entry(name).or_insert_with(|| {
            order.push(name);
            ClassRegistrationInfo::new(name)
        });

        fill_class_info(elem.item.clone(), class_info);
    });

    // Host classes derive from engine classes only; a host parent would need its own storage type in every trampoline.
    for info in map.values() {
        if let Some(parent) = info.parent_class_name {
            assert!(
                !map.contains_key(parent),
                "class `{}` inherits host class `{parent}`; host classes must derive from an engine class",
                info.class_name
            );
        }
    }

    let mut loaded_classes = global_loaded_classes();
    for name in order {
        let Some(info) = map.remove(name) else {
            continue;
        };

        out!("Register class:   {name}");
        if let Some(loaded) = register_class_raw(info) {
            loaded_classes.push(loaded);
        }
    }

    out!("All classes auto-registered.");
}

/// Unregisters all classes, in reverse order of registration.
pub fn unregister_classes() {
    let mut loaded_classes = global_loaded_classes();

    out!("Unregistering {} classes...", loaded_classes.len());
    for class in loaded_classes.drain(..).rev() {
        unregister_class_raw(class);
    }
}

fn global_loaded_classes() -> MutexGuard<'static, Vec<LoadedClass>> {
    match LOADED_CLASSES.try_lock() {
        Ok(guard) => guard,
        Err(TryLockError::Poisoned(_)) => {
            panic!("global lock for loaded classes poisoned; class registration or deregistration may have panicked")
        }
        Err(TryLockError::WouldBlock) => panic!("unexpected concurrent access to global lock for loaded classes"),
    }
}

/// Populate `c` with all the relevant data from `item` (depending on item type).
fn fill_class_info(item: PluginItem, c: &mut ClassRegistrationInfo) {
    let class_name = c.class_name;

    match item {
        PluginItem::Struct {
            base_class_name,
            generated_create_fn,
            free_fn,
        } => {
            c.parent_class_name = Some(base_class_name);
            c.free_fn = Some(free_fn);
            fill_into(&mut c.create_fn, generated_create_fn)
                .unwrap_or_else(|_| panic!("`{class_name}`: #[class(init)] combined with user-defined init()"));
        }

        PluginItem::ITraitImpl {
            user_virtual_fn,
            user_create_fn,
        } => {
            c.user_virtual_fn = user_virtual_fn;
            fill_into(&mut c.create_fn, user_create_fn)
                .unwrap_or_else(|_| panic!("`{class_name}`: #[class(init)] combined with user-defined init()"));
        }
    }
}

/// If `src` is occupied, it moves the value into `dst`, while ensuring that no previous value is present in `dst`.
fn fill_into<T>(dst: &mut Option<T>, src: Option<T>) -> Result<(), ()> {
    match (dst, src) {
        (dst @ None, src) => *dst = src,
        (Some(_), Some(_)) => return Err(()),
        (Some(_), None) => { /* do nothing */ }
    }
    Ok(())
}

/// Registers a class with the dynamic type information `info`. Returns `None` if the engine rejected it.
fn register_class_raw(info: ClassRegistrationInfo) -> Option<LoadedClass> {
    let class_name = info.class_name;

    let Some(parent_class_name) = info.parent_class_name else {
        panic!("class `{class_name}` has a #[godot_api] impl, but no #[derive(GodotClass)]");
    };

    let name = c_string(class_name);
    let parent = c_string(parent_class_name);

    let creation_info = sys::GDExtensionClassCreationInfo {
        is_virtual: sys::bool_to_u8(false),
        // Without a constructor, the engine cannot instantiate the class.
        is_abstract: sys::bool_to_u8(info.create_fn.is_none()),
        create_instance_func: info.create_fn,
        free_instance_func: info.free_fn,
        get_virtual_func: info.user_virtual_fn,
        class_userdata: ptr::null_mut(),
    };

    // SAFETY: strings and creation info outlive the call; the engine copies what it keeps.
    let registration_failed = unsafe {
        interface_fn!(classdb_register_extension_class)(
            sys::get_library(),
            name.as_ptr(),
            parent.as_ptr(),
            ptr::addr_of!(creation_info),
        );

        // The registration above does not report errors (apart from console output), so verify it.
        interface_fn!(classdb_get_class_tag)(name.as_ptr()).is_null()
    };

    // Do not panic here; otherwise the lock is poisoned and the whole extension becomes unusable.
    if registration_failed {
        godot_error!("Failed to register class `{class_name}`; check preceding engine error messages");
        return None;
    }

    Some(LoadedClass { name })
}

fn unregister_class_raw(class: LoadedClass) {
    out!("Unregister class: {:?}", class.name);

    // SAFETY: the class was registered by this library.
    unsafe { interface_fn!(classdb_unregister_extension_class)(sys::get_library(), class.name.as_ptr()) };
}

fn c_string(name: &'static str) -> CString {
    CString::new(name).unwrap_or_else(|_| panic!("class name `{name}` contains a NUL byte"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_into_rejects_duplicates() {
        let mut dst = None;
        assert_eq!(fill_into(&mut dst, Some(1)), Ok(()));
        assert_eq!(fill_into(&mut dst, None), Ok(()));
        assert_eq!(fill_into(&mut dst, Some(2)), Err(()));
        assert_eq!(dst, Some(1));
    }
}
