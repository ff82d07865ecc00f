/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Initialization levels from loading to unloading. Runs in its own binary, since the extension is loaded only once.

use std::sync::Mutex;

use gdbind::init::{gdextension, CallChecks, ExtensionLibrary, InitLevel};
use gdbind::prelude::*;
use gdbind_mock::MockConfig;

static EVENTS: Mutex<Vec<String>> = Mutex::new(Vec::new());

fn record(event: String) {
    EVENTS.lock().unwrap().push(event);
}

struct LevelExtension;

#[gdextension]
unsafe impl ExtensionLibrary for LevelExtension {
    fn min_level() -> InitLevel {
        InitLevel::Core
    }

    fn on_level_init(level: InitLevel) {
        if level == InitLevel::Scene {
            // Classes are registered by the time user code sees the registration level.
            let marker = LevelMarker::new_gd();
            record(format!("init {level:?} ({})", marker.get_class()));
        } else {
            record(format!("init {level:?}"));
        }
    }

    fn on_level_deinit(level: InitLevel) {
        record(format!("deinit {level:?}"));
    }

    fn call_checks() -> CallChecks {
        CallChecks::Always
    }
}

#[derive(GodotClass)]
#[class(init)]
struct LevelMarker {
    base: Base<RefCounted>,
}

#[test]
fn levels_run_in_order_and_reverse() {
    gdbind_mock::configure(MockConfig {
        editor: true,
        ..Default::default()
    });

    gdbind_mock::load_extension(Some(gdbind_init)).expect("extension loads");
    assert!(gdbind_mock::is_loaded());
    assert!(gdbind::sys::is_initialized());
    assert_eq!(gdbind::sys::config().call_checks, CallChecks::Always);
    assert_eq!(gdbind::sys::engine_version().major, 4);

    assert_eq!(
        *EVENTS.lock().unwrap(),
        ["init Core", "init Servers", "init Scene (LevelMarker)", "init Editor"]
    );

    EVENTS.lock().unwrap().clear();
    gdbind_mock::unload_extension().expect("extension unloads");

    assert_eq!(
        *EVENTS.lock().unwrap(),
        ["deinit Editor", "deinit Scene", "deinit Servers", "deinit Core"]
    );

    // Unregistration found no leftover instances, and the binding stays usable for the rest of the process.
    assert!(!gdbind_mock::is_loaded());
    assert!(gdbind::sys::is_initialized());
    assert!(!gdbind_mock::printed_errors().iter().any(|e| e.contains("unregister_extension_class")));

    let mut node = Node::new_alloc();
    node.set_name(GString::from("after_unload"));
    assert_eq!(node.get_name(), "after_unload");
    node.free();
}
