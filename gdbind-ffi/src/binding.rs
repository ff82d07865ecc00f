/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Process-wide binding state, written once during initialization and read-only afterwards.

use crate as sys;
use crate::{
    BuiltinLifecycleTable, BuiltinMethodTable, CallFrame, EngineFfi, GDExtensionInterface, MethodBindEntry,
    MethodSpec, MethodTable, SignatureMismatch,
};
use std::sync::OnceLock;

/// Whether outbound ptrcalls are validated against the bind's recorded signature.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum CallChecks {
    /// Trust the generated code entirely.
    Unchecked,

    /// Validate in builds with `debug_assertions` only.
    #[default]
    DebugOnly,

    /// Validate always, including release builds.
    Always,
}

impl CallChecks {
    pub fn enabled(self) -> bool {
        match self {
            CallChecks::Unchecked => false,
            CallChecks::DebugOnly => cfg!(debug_assertions),
            CallChecks::Always => true,
        }
    }
}

/// Engine API version the bindings were generated against.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ApiVersion {
    pub major: u32,
    pub minor: u32,
}

#[derive(Copy, Clone, Debug, Default)]
pub struct BindingConfig {
    pub call_checks: CallChecks,

    /// If set, the running engine must report this major/minor version.
    pub api_version: Option<ApiVersion>,
}

/// Version reported by the running engine.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EngineVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub string: String,
}

// ----------------------------------------------------------------------------------------------------------------------------------------------

struct EngineBinding {
    interface: GDExtensionInterface,
    library: ClassLibraryPtr,
    lifecycle: BuiltinLifecycleTable,
    builtin_methods: BuiltinMethodTable,
    class_methods: OnceLock<MethodTable>,
    config: BindingConfig,
    version: EngineVersion,
}

/// Newtype around `GDExtensionClassLibraryPtr` so it can live in a `static`.
struct ClassLibraryPtr(sys::GDExtensionClassLibraryPtr);

// SAFETY: the library pointer is an opaque token that is only passed back to the engine, never dereferenced on the host side.
unsafe impl Sync for ClassLibraryPtr {}
// SAFETY: see `Sync` impl.
unsafe impl Send for ClassLibraryPtr {}

static BINDING: OnceLock<EngineBinding> = OnceLock::new();

#[track_caller]
fn binding() -> &'static EngineBinding {
    match BINDING.get() {
        Some(binding) => binding,
        None => panic!("engine binding not initialized; call `initialize()` first"),
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Initialization

/// Loads the interface and the builtin tables, and makes them available process-wide.
///
/// # Panics
/// - If the engine lacks any interface function or builtin function.
/// - If the engine version does not match `config.api_version`.
/// - If the binding has already been initialized.
///
/// # Safety
/// `get_proc_address` and `library` must be the values the engine passed to the extension entry point.
pub unsafe fn initialize(
    get_proc_address: sys::GDExtensionInterfaceGetProcAddress,
    library: sys::GDExtensionClassLibraryPtr,
    config: BindingConfig,
) {
    let Some(get_proc_address) = get_proc_address else {
        panic!("engine passed a null get_proc_address");
    };

    let interface = GDExtensionInterface::load(get_proc_address);
    let missing = interface.missing_functions();
    if !missing.is_empty() {
        panic!(
            "engine interface lacks {} function(s): {}.{}",
            missing.len(),
            missing.join(", "),
            sys::toolbox::COMPAT_INFO
        );
    }

    let version = query_version(&interface);
    sys::out!("Engine version: {}", version.string);

    if let Some(expected) = config.api_version {
        if (version.major, version.minor) != (expected.major, expected.minor) {
            panic!(
                "bindings were generated for engine {}.{}, but running engine is {}.{}.{}.{}",
                expected.major,
                expected.minor,
                version.major,
                version.minor,
                version.patch,
                sys::toolbox::COMPAT_INFO
            );
        }
    }

    let lifecycle = BuiltinLifecycleTable::load(&interface);
    let builtin_methods = BuiltinMethodTable::load(&interface);

    let binding = EngineBinding {
        interface,
        library: ClassLibraryPtr(library),
        lifecycle,
        builtin_methods,
        class_methods: OnceLock::new(),
        config,
        version,
    };

    if BINDING.set(binding).is_err() {
        panic!("engine binding initialized twice");
    }
}

unsafe fn query_version(interface: &GDExtensionInterface) -> EngineVersion {
    let mut raw = sys::GDExtensionGodotVersion {
        major: 0,
        minor: 0,
        patch: 0,
        string: std::ptr::null(),
    };

    let get_version = crate::builtin_table::validate(interface.get_godot_version, "get_godot_version");
    get_version(&mut raw);

    EngineVersion {
        major: raw.major,
        minor: raw.minor,
        patch: raw.patch,
        string: sys::string_from_c(raw.string),
    }
}

/// Resolves all class method binds. Must run exactly once, after [`initialize`].
///
/// # Panics
/// If a bind is missing (version skew between bindings and engine), or if called twice.
pub fn load_class_methods(specs: &[MethodSpec]) {
    let binding = binding();
    let get_method_bind = crate::builtin_table::validate(binding.interface.classdb_get_method_bind, "classdb_get_method_bind");

    let table = MethodTable::load(specs, |spec| {
        // SAFETY: interface loaded; names are NUL-terminated by construction of `CStr`.
        unsafe { get_method_bind(spec.class.as_ptr(), spec.method.as_ptr(), spec.hash) }
    });

    let table = match table {
        Ok(table) => table,
        Err(err) => panic!("{err}"),
    };

    sys::out!("Loaded {} class method binds.", table.len());

    if binding.class_methods.set(table).is_err() {
        panic!("class method table loaded twice");
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Accessors

pub fn is_initialized() -> bool {
    BINDING.get().is_some()
}

#[inline]
pub fn get_interface() -> &'static GDExtensionInterface {
    &binding().interface
}

#[inline]
pub fn get_library() -> sys::GDExtensionClassLibraryPtr {
    binding().library.0
}

#[inline]
pub fn builtin_lifecycle_api() -> &'static BuiltinLifecycleTable {
    &binding().lifecycle
}

#[inline]
pub fn builtin_method_table() -> &'static BuiltinMethodTable {
    &binding().builtin_methods
}

#[inline]
pub fn method_table() -> &'static MethodTable {
    match binding().class_methods.get() {
        Some(table) => table,
        None => panic!("class method table not loaded; scene init level has not run yet"),
    }
}

pub fn config() -> BindingConfig {
    binding().config
}

pub fn engine_version() -> &'static EngineVersion {
    &binding().version
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Calls

/// Outbound ptrcall through a class method bind.
///
/// When checks are enabled, the frame is validated against the bind before anything crosses the boundary.
///
/// # Panics
/// On a signature mismatch, if checks are enabled.
///
/// # Safety
/// `object` must be a live instance of the bind's class (or a subclass), or null for static methods.
pub unsafe fn class_ptrcall<R: EngineFfi, const N: usize>(
    entry: &MethodBindEntry,
    object: sys::GDExtensionObjectPtr,
    frame: CallFrame<'_, N>,
) -> R {
    if config().call_checks.enabled() {
        if let Err(mismatch) = check_frame::<R, N>(entry, &frame) {
            panic!(
                "binding fault in {}::{}: {mismatch}",
                entry.class_name(),
                entry.method_name()
            );
        }
    }

    raw_class_ptrcall(entry, object, frame)
}

/// Like [`class_ptrcall`], but always validates and reports a mismatch instead of panicking.
///
/// # Safety
/// See [`class_ptrcall`].
pub unsafe fn try_class_ptrcall<R: EngineFfi, const N: usize>(
    entry: &MethodBindEntry,
    object: sys::GDExtensionObjectPtr,
    frame: CallFrame<'_, N>,
) -> Result<R, SignatureMismatch> {
    check_frame::<R, N>(entry, &frame)?;
    Ok(raw_class_ptrcall(entry, object, frame))
}

fn check_frame<R: EngineFfi, const N: usize>(
    entry: &MethodBindEntry,
    frame: &CallFrame<'_, N>,
) -> Result<(), SignatureMismatch> {
    let actual_ret = (std::mem::size_of::<R>() != 0).then_some(R::ARG_KIND);
    entry.check_args(frame.kinds())?;
    entry.check_return(actual_ret)
}

unsafe fn raw_class_ptrcall<R: EngineFfi, const N: usize>(
    entry: &MethodBindEntry,
    object: sys::GDExtensionObjectPtr,
    frame: CallFrame<'_, N>,
) -> R {
    let ptrcall = sys::interface_fn!(object_method_bind_ptrcall);
    frame.ptrcall(|args, ret| ptrcall(entry.bind(), object, args, ret))
}
