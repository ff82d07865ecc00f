/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Class registrations collected while the library is loaded, before the engine calls the entry point.
//!
//! `#[derive(GodotClass)]` and `#[godot_api]` expand to [`plugin_add!`](crate::plugin_add), which places a
//! constructor function in the platform's init section. The loader runs it, and it pushes one registration record
//! into a [`PluginRegistry`]. The extension walks that registry once the engine reaches the class-registration level.

use std::sync::{Mutex, PoisonError};

/// Append-only list of registration records of one kind.
pub struct PluginRegistry<T> {
    entries: Mutex<Vec<T>>,
}

impl<T> PluginRegistry<T> {
    pub const fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
        }
    }

    /// Called from init-section constructors. A constructor that panicked must not hide the other records.
    pub fn push(&self, entry: T) {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).push(entry);
    }

    /// Visits records in load order, which differs between platforms and linkers.
    pub fn for_each(&self, mut visitor: impl FnMut(&T)) {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.iter().for_each(|entry| visitor(entry));
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for PluginRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Declares the static registry `$registry`, holding records of type `$Type`.
#[doc(hidden)]
#[macro_export]
macro_rules! plugin_registry {
    ($vis:vis $registry:ident: $Type:ty) => {
        $crate::paste::paste! {
            #[used]
            #[allow(non_upper_case_globals)]
            #[doc(hidden)]
            $vis static [< __gdbind_plugin_ $registry >]: $crate::PluginRegistry<$Type> = $crate::PluginRegistry::new();
        }
    };
}

// Link sections cannot be checked by the compiler; the constructor signature must match what the loader calls.
#[doc(hidden)]
#[macro_export]
#[cfg_attr(rustfmt, rustfmt::skip)]
macro_rules! plugin_add_inner {
    ($registry:ident; $plugin:expr; $( $path_tt:tt )* ) => {
        const _: () = {
            #[allow(non_upper_case_globals)]
            #[used]
            #[cfg_attr(target_os = "windows", link_section = ".CRT$XCU")]
            #[cfg_attr(any(target_os = "macos", target_os = "ios"), link_section = "__DATA,__mod_init_func")]
            #[cfg_attr(
                any(
                    target_os = "linux",
                    target_os = "android",
                    target_os = "freebsd",
                    target_os = "netbsd",
                    target_os = "openbsd"
                ),
                link_section = ".init_array"
            )]
            static __gdbind_register: extern "C" fn() = {
                #[cfg_attr(any(target_os = "linux", target_os = "android"), link_section = ".text.startup")]
                extern "C" fn __gdbind_register_fn() {
                    $crate::paste::paste!( $( $path_tt )* [< __gdbind_plugin_ $registry >] ).push($plugin);
                }
                __gdbind_register_fn
            };
        };
    };
}

/// Adds `$plugin` to a registry declared with [`plugin_registry!`](crate::plugin_registry), optionally in another
/// module (`REGISTRY in path::to::module; plugin`).
#[doc(hidden)]
#[macro_export]
macro_rules! plugin_add {
    ( $registry:ident; $plugin:expr ) => {
        $crate::plugin_add_inner!($registry; $plugin; );
    };

    ( $registry:ident in $path:path; $plugin:expr ) => {
        $crate::plugin_add_inner!($registry; $plugin; $path ::);
    };
}

/// Passes each record of a registry to `$visitor`.
#[doc(hidden)]
#[macro_export]
macro_rules! plugin_foreach {
    ( $registry:ident; $visitor:expr ) => {
        $crate::paste::paste!( [< __gdbind_plugin_ $registry >] ).for_each($visitor)
    };

    ( $registry:ident in $path:path; $visitor:expr ) => {
        $crate::paste::paste!( $path :: [< __gdbind_plugin_ $registry >] ).for_each($visitor)
    };
}

// ----------------------------------------------------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::PluginRegistry;

    #[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
    struct ClassPlugin {
        class_name: &'static str,
        base: &'static str,
    }

    plugin_registry!(CLASSES: ClassPlugin);

    plugin_add!(CLASSES; ClassPlugin { class_name: "Player", base: "Node2D" });
    plugin_add!(CLASSES; ClassPlugin { class_name: "Inventory", base: "RefCounted" });
    plugin_add!(CLASSES; ClassPlugin { class_name: "Hud", base: "Node" });

    mod nested {
        use super::ClassPlugin;

        plugin_add!(CLASSES in super; ClassPlugin { class_name: "Minimap", base: "Control" });
    }

    #[test]
    fn records_are_present_before_main() {
        let mut actual = HashSet::new();

        plugin_foreach!(CLASSES; |e: &ClassPlugin| {
            actual.insert((e.class_name, e.base));
        });

        let expected = HashSet::from([
            ("Player", "Node2D"),
            ("Inventory", "RefCounted"),
            ("Hud", "Node"),
            ("Minimap", "Control"),
        ]);
        assert_eq!(actual, expected);
        assert_eq!(__gdbind_plugin_CLASSES.len(), 4);
    }

    #[test]
    fn registry_survives_poisoning() {
        let registry = std::sync::Arc::new(PluginRegistry::new());
        registry.push(1);

        let poisoner = std::sync::Arc::clone(&registry);
        let _ = std::thread::spawn(move || {
            poisoner.for_each(|_: &i32| panic!("visitor fails"));
        })
        .join();

        registry.push(2);
        let mut seen = vec![];
        registry.for_each(|&e| seen.push(e));
        assert_eq!(seen, [1, 2]);
    }
}
