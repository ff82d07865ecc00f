/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Shared setup: every test binary that includes this module loads the same extension into the mock engine.

#![allow(dead_code)]

use std::sync::OnceLock;

use gdbind::init::{gdextension, CallChecks, ExtensionLibrary};

pub struct TestExtension;

#[gdextension]
unsafe impl ExtensionLibrary for TestExtension {
    fn call_checks() -> CallChecks {
        CallChecks::Always
    }
}

/// Loads the extension once per test binary. Safe to call from every test.
pub fn setup() {
    static LOADED: OnceLock<()> = OnceLock::new();

    LOADED.get_or_init(|| {
        gdbind_mock::load_extension(Some(gdbind_init)).expect("extension loads into mock engine");
    });
}

/// Whether an error containing `needle` has been printed through the engine.
pub fn has_printed_error(needle: &str) -> bool {
    gdbind_mock::printed_errors().iter().any(|e| e.contains(needle))
}
