/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Loading an extension, running its initialization levels, and driving virtual methods.

use std::ffi::CString;
use std::fmt;
use std::ptr;

use gdbind_ffi as sys;
use parking_lot::Mutex;

use crate::audit::report_error;
use crate::interface::{self, get_proc_address};
use crate::objects::{self, ObjPtr};

/// Engine behavior that tests can vary.
#[derive(Clone, Debug)]
pub struct MockConfig {
    /// Version reported by `get_godot_version`.
    pub version: (u32, u32, u32),

    /// Interface functions that `get_proc_address` does not provide.
    pub hidden_functions: Vec<&'static str>,

    /// `(class, method)` pairs for which `classdb_get_method_bind` returns null.
    pub hidden_method_binds: Vec<(&'static str, &'static str)>,

    /// Whether the editor initialization level runs.
    pub editor: bool,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            version: (4, 3, 0),
            hidden_functions: vec![],
            hidden_method_binds: vec![],
            editor: false,
        }
    }
}

static CONFIG: Mutex<Option<MockConfig>> = Mutex::new(None);

/// Replaces the engine configuration. Takes effect for subsequent interface lookups and loads.
pub fn configure(config: MockConfig) {
    *CONFIG.lock() = Some(config);
}

pub(crate) fn config() -> MockConfig {
    CONFIG.lock().clone().unwrap_or_default()
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Loading

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum MockError {
    /// The library exports no entry point.
    NullEntryPoint,
    AlreadyLoaded,
    NotLoaded,
    /// The entry point returned `false`.
    EntryPointFailed,
    /// The entry point succeeded but left `initialize` or `deinitialize` unset.
    MissingInitCallbacks,
}

impl fmt::Display for MockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Self::NullEntryPoint => "entry point is null",
            Self::AlreadyLoaded => "an extension is already loaded",
            Self::NotLoaded => "no extension is loaded",
            Self::EntryPointFailed => "entry point reported failure",
            Self::MissingInitCallbacks => "entry point did not provide initialization callbacks",
        };

        f.write_str(message)
    }
}

impl std::error::Error for MockError {}

struct LoadedExtension {
    init: sys::GDExtensionInitialization,
    max_level: sys::GDExtensionInitializationLevel,
}

// SAFETY: the userdata is only handed back to the extension's own callbacks.
unsafe impl Send for LoadedExtension {}

static LOADED: Mutex<Option<LoadedExtension>> = Mutex::new(None);

/// Loads an extension through its entry point and runs every initialization level up to `Scene`, or `Editor` if
/// [`MockConfig::editor`] is set.
///
/// The load lock is held while the extension initializes; calling [`load_extension`] or [`unload_extension`] from
/// initialization code deadlocks.
pub fn load_extension(entry: sys::GDExtensionInitializationFunction) -> Result<(), MockError> {
    let entry = entry.ok_or(MockError::NullEntryPoint)?;

    let mut loaded = LOADED.lock();
    if loaded.is_some() {
        return Err(MockError::AlreadyLoaded);
    }

    let mut init = sys::GDExtensionInitialization {
        minimum_initialization_level: sys::GDEXTENSION_INITIALIZATION_CORE,
        userdata: ptr::null_mut(),
        initialize: None,
        deinitialize: None,
    };

    // SAFETY: `init` is valid for writes; the entry point follows the engine's loading protocol.
    let success = unsafe { entry(Some(get_proc_address), interface::library(), &mut init) };
    if success == 0 {
        return Err(MockError::EntryPointFailed);
    }

    let (Some(initialize), Some(_)) = (init.initialize, init.deinitialize) else {
        return Err(MockError::MissingInitCallbacks);
    };

    let max_level = if config().editor {
        sys::GDEXTENSION_INITIALIZATION_EDITOR
    } else {
        sys::GDEXTENSION_INITIALIZATION_SCENE
    };

    for level in init.minimum_initialization_level..=max_level {
        // SAFETY: callback and userdata come from the same entry point call.
        unsafe { initialize(init.userdata, level) };
    }

    *loaded = Some(LoadedExtension { init, max_level });
    Ok(())
}

/// Runs the extension's deinitialization levels in reverse order.
pub fn unload_extension() -> Result<(), MockError> {
    let mut loaded = LOADED.lock();
    let extension = loaded.take().ok_or(MockError::NotLoaded)?;
    let init = extension.init;

    if let Some(deinitialize) = init.deinitialize {
        for level in (init.minimum_initialization_level..=extension.max_level).rev() {
            // SAFETY: callback and userdata come from the same entry point call.
            unsafe { deinitialize(init.userdata, level) };
        }
    }

    Ok(())
}

pub fn is_loaded() -> bool {
    LOADED.lock().is_some()
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Virtual methods

/// Who answered a virtual call.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum VirtualDispatch {
    /// An extension class returned an implementation from `get_virtual`.
    Override,
    /// No extension implementation; the native class ran its default.
    NativeDefault,
    /// Neither an override nor a native default exists, or the object is not alive.
    Unhandled,
}

/// Calls a virtual method as the engine does: extension overrides first, most derived class first, then the
/// native default.
///
/// # Safety
/// `args` must point to native values matching the method's parameters, and `ret` must be null or writable for
/// its return type.
pub unsafe fn call_virtual(
    instance_id: u64,
    method: &str,
    args: &[sys::GDExtensionConstTypePtr],
    ret: sys::GDExtensionTypePtr,
) -> VirtualDispatch {
    let obj = objects::lookup_id(instance_id);
    if obj.is_null() {
        report_error(format!("call_virtual: object #{instance_id} is not alive"));
        return VirtualDispatch::Unhandled;
    }

    dispatch_virtual(obj, method, args, ret)
}

pub(crate) unsafe fn dispatch_virtual(
    obj: ObjPtr,
    method: &str,
    args: &[sys::GDExtensionConstTypePtr],
    ret: sys::GDExtensionTypePtr,
) -> VirtualDispatch {
    let Some(targets) = objects::virtual_targets(obj) else {
        return VirtualDispatch::Unhandled;
    };

    let Ok(method_c) = CString::new(method) else {
        return VirtualDispatch::Unhandled;
    };

    for (get_virtual, userdata) in targets.overrides {
        if let Some(call) = get_virtual(userdata, method_c.as_ptr()) {
            call(targets.instance, args.as_ptr(), ret);
            return VirtualDispatch::Override;
        }
    }

    for native in targets.natives {
        if run_native_default(native, method, args, ret) {
            objects::count_default_call(obj, method);
            return VirtualDispatch::NativeDefault;
        }
    }

    VirtualDispatch::Unhandled
}

/// Native implementations of virtual methods. Returns whether `class` provides `method`.
unsafe fn run_native_default(
    class: &str,
    method: &str,
    args: &[sys::GDExtensionConstTypePtr],
    ret: sys::GDExtensionTypePtr,
) -> bool {
    match (class, method) {
        ("Node", "_process") | ("Node", "_ready") | ("Resource", "_setup_local_to_scene") => true,
        ("Vector2Sum", "_combine") => {
            let (a, b) = (*(args[0] as *const f64), *(args[1] as *const f64));
            if !ret.is_null() {
                ptr::write(ret as *mut f64, a + b);
            }
            true
        }
        _ => false,
    }
}

/// Runs `_process(delta)` on a node.
pub fn process(instance_id: u64, delta: f64) -> VirtualDispatch {
    let args = [&delta as *const f64 as sys::GDExtensionConstTypePtr];

    // SAFETY: `_process` takes one `float` and returns nothing.
    unsafe { call_virtual(instance_id, "_process", &args, ptr::null_mut()) }
}

/// Runs `_ready()` on a node.
pub fn ready(instance_id: u64) -> VirtualDispatch {
    // SAFETY: `_ready` takes no arguments and returns nothing.
    unsafe { call_virtual(instance_id, "_ready", &[], ptr::null_mut()) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn native_default_runs_without_extension() {
        let node = objects::construct("Node2D");
        let id = objects::instance_id(node);

        assert_eq!(process(id, 0.016), VirtualDispatch::NativeDefault);
        assert_eq!(ready(id), VirtualDispatch::NativeDefault);
        assert_eq!(crate::native_default_calls(id, "_process"), 1);

        objects::destroy(node);
        assert_eq!(process(id, 0.016), VirtualDispatch::Unhandled);
    }

    #[test]
    fn unknown_virtual_is_unhandled() {
        let obj = objects::construct("Object");
        let id = objects::instance_id(obj);

        assert_eq!(ready(id), VirtualDispatch::Unhandled);
        objects::destroy(obj);
    }

    #[test]
    fn null_entry_point_is_rejected() {
        assert_eq!(load_extension(None), Err(MockError::NullEntryPoint));
    }
}
