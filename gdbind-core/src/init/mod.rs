/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::sys;
use sys::out;

#[doc(hidden)]
pub unsafe fn __gdbind_load_library<E: ExtensionLibrary>(
    get_proc_address: sys::GDExtensionInterfaceGetProcAddress,
    library: sys::GDExtensionClassLibraryPtr,
    init: *mut sys::GDExtensionInitialization,
) -> sys::GDExtensionBool {
    let init_code = || {
        let config = sys::BindingConfig {
            call_checks: E::call_checks(),
            api_version: Some(crate::gen::central::API_VERSION),
        };

        // SAFETY: both values come straight from the engine's call to the entry point.
        unsafe { sys::initialize(get_proc_address, library, config) };

        let godot_init_params = sys::GDExtensionInitialization {
            minimum_initialization_level: E::min_level().to_sys(),
            userdata: std::ptr::null_mut(),
            initialize: Some(ffi_initialize_layer::<E>),
            deinitialize: Some(ffi_deinitialize_layer::<E>),
        };

        // SAFETY: the engine passes a valid output parameter.
        unsafe { *init = godot_init_params };

        sys::bool_to_u8(true)
    };

    let ctx = || "error when loading extension library";
    let is_success = crate::private::handle_panic(ctx, init_code);

    is_success.unwrap_or(0)
}

unsafe extern "C" fn ffi_initialize_layer<E: ExtensionLibrary>(
    _userdata: *mut std::ffi::c_void,
    init_level: sys::GDExtensionInitializationLevel,
) {
    let level = InitLevel::from_sys(init_level);
    let ctx = || format!("failed to initialize extension level `{level:?}`");

    // Swallow panics; the engine has no way to handle them.
    let _ = crate::private::handle_panic(ctx, || {
        gdbind_on_level_init::<E>(level);
        E::on_level_init(level);
    });
}

unsafe extern "C" fn ffi_deinitialize_layer<E: ExtensionLibrary>(
    _userdata: *mut std::ffi::c_void,
    init_level: sys::GDExtensionInitializationLevel,
) {
    let level = InitLevel::from_sys(init_level);
    let ctx = || format!("failed to deinitialize extension level `{level:?}`");

    let _ = crate::private::handle_panic(ctx, || {
        E::on_level_deinit(level);
        gdbind_on_level_deinit::<E>(level);
    });
}

/// Level at which method binds are resolved and host classes registered.
///
/// Never below `Scene`, because host classes derive from scene classes such as `Node`.
fn registration_level<E: ExtensionLibrary>() -> InitLevel {
    E::min_level().max(InitLevel::Scene)
}

/// Internal tasks upon loading an initialization level. Called before user code.
fn gdbind_on_level_init<E: ExtensionLibrary>(level: InitLevel) {
    if level != registration_level::<E>() {
        return;
    }

    out!("Load class method table...");
    sys::load_class_methods(crate::gen::central::METHOD_SPECS);

    crate::registry::class::auto_register_classes();
}

/// Internal tasks upon unloading an initialization level. Called after user code.
///
/// The binding itself stays loaded: method binds are immutable for the lifetime of the process.
fn gdbind_on_level_deinit<E: ExtensionLibrary>(level: InitLevel) {
    if level == registration_level::<E>() {
        crate::registry::class::unregister_classes();
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------

/// Defines the entry point for an extension library.
///
/// Every library should have exactly one implementation of this trait. It is always used in combination with the
/// `#[gdextension]` proc-macro attribute, which emits the C entry point the engine looks up.
///
/// ```ignore
/// struct MyExtension;
///
/// #[gdextension]
/// unsafe impl ExtensionLibrary for MyExtension {}
/// ```
///
/// All classes marked with `#[derive(GodotClass)]` are registered automatically, without needing to mention them in a
/// central list. The order in which classes are registered is not specified.
///
/// # Safety
/// The library cannot enforce any safety guarantees outside Rust code. Other code loaded into the engine must not free
/// objects that Rust handles still point to.
pub unsafe trait ExtensionLibrary {
    /// Determines the initialization level at which the extension is loaded (`Scene` by default).
    fn min_level() -> InitLevel {
        InitLevel::Scene
    }

    /// Custom logic when a certain init-level of the engine is loaded.
    ///
    /// Invoked for levels >= [`Self::min_level()`], in ascending order. Classes are already registered when the
    /// `Scene` level (or `min_level()`, if higher) reaches this function.
    #[allow(unused_variables)]
    fn on_level_init(level: InitLevel) {
        // Nothing by default.
    }

    /// Custom logic when a certain init-level of the engine is unloaded.
    ///
    /// Invoked for levels >= [`Self::min_level()`], in descending order. Classes are still registered at this point.
    #[allow(unused_variables)]
    fn on_level_deinit(level: InitLevel) {
        // Nothing by default.
    }

    /// Whether outbound ptrcalls are validated against the recorded method signatures.
    ///
    /// Defaults to [`CallChecks::DebugOnly`].
    fn call_checks() -> CallChecks {
        CallChecks::default()
    }
}

pub use sys::CallChecks;

// ----------------------------------------------------------------------------------------------------------------------------------------------

/// Stage of the engine initialization process.
///
/// Initialization and deinitialization are split into multiple stages, like a stack. At each level, a different amount
/// of engine functionality is available. Deinitialization happens in reverse order.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum InitLevel {
    /// First level loaded by the engine. Only core types and functions are available.
    Core,

    /// Second level. Server APIs are available.
    Servers,

    /// Third level. Scene classes like `Node` are available; host classes are registered here.
    Scene,

    /// Fourth level, only loaded when the editor runs.
    Editor,
}

impl InitLevel {
    #[doc(hidden)]
    pub fn from_sys(level: sys::GDExtensionInitializationLevel) -> Self {
        match level {
            sys::GDEXTENSION_INITIALIZATION_CORE => Self::Core,
            sys::GDEXTENSION_INITIALIZATION_SERVERS => Self::Servers,
            sys::GDEXTENSION_INITIALIZATION_SCENE => Self::Scene,
            sys::GDEXTENSION_INITIALIZATION_EDITOR => Self::Editor,
            _ => {
                crate::log::godot_warn!("unknown initialization level {level}, treating as Editor");
                Self::Editor
            }
        }
    }

    #[doc(hidden)]
    pub fn to_sys(self) -> sys::GDExtensionInitializationLevel {
        match self {
            Self::Core => sys::GDEXTENSION_INITIALIZATION_CORE,
            Self::Servers => sys::GDEXTENSION_INITIALIZATION_SERVERS,
            Self::Scene => sys::GDEXTENSION_INITIALIZATION_SCENE,
            Self::Editor => sys::GDEXTENSION_INITIALIZATION_EDITOR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_levels_are_ordered() {
        assert!(InitLevel::Core < InitLevel::Servers);
        assert!(InitLevel::Servers < InitLevel::Scene);
        assert!(InitLevel::Scene < InitLevel::Editor);
        assert_eq!(InitLevel::Core.max(InitLevel::Scene), InitLevel::Scene);
    }

    #[test]
    fn init_level_sys_round_trip() {
        for level in [InitLevel::Core, InitLevel::Servers, InitLevel::Scene, InitLevel::Editor] {
            assert_eq!(InitLevel::from_sys(level.to_sys()), level);
        }
    }
}
