/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Engines that cannot host the extension. The binding is initialized at most once per process, so the scenarios run
//! in sequence inside a single test, failing loads first.

use gdbind::init::{gdextension, ExtensionLibrary};
use gdbind_mock::{MockConfig, MockError};

struct FailingExtension;

#[gdextension]
unsafe impl ExtensionLibrary for FailingExtension {}

fn has_printed_error(needle: &str) -> bool {
    gdbind_mock::printed_errors().iter().any(|e| e.contains(needle))
}

#[test]
fn load_failures_are_reported() {
    // Interface function missing: the entry point refuses to load.
    gdbind_mock::configure(MockConfig {
        hidden_functions: vec!["object_method_bind_ptrcall"],
        ..Default::default()
    });
    assert_eq!(gdbind_mock::load_extension(Some(gdbind_init)), Err(MockError::EntryPointFailed));
    assert!(!gdbind_mock::is_loaded());
    assert!(!gdbind::sys::is_initialized());

    // Engine older than the API the bindings were generated from.
    gdbind_mock::configure(MockConfig {
        version: (4, 2, 0),
        ..Default::default()
    });
    assert_eq!(gdbind_mock::load_extension(Some(gdbind_init)), Err(MockError::EntryPointFailed));
    assert!(!gdbind::sys::is_initialized());

    // A single missing method bind does not stop the load, but is reported with its class and method.
    gdbind_mock::configure(MockConfig {
        hidden_method_binds: vec![("Vector2Sum", "join")],
        ..Default::default()
    });
    assert_eq!(gdbind_mock::load_extension(Some(gdbind_init)), Ok(()));
    assert!(gdbind::sys::is_initialized());
    assert!(has_printed_error("Vector2Sum::join"));
}
