/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Observations for tests: object lifetimes, reference counts, native fallbacks and printed messages.

use parking_lot::Mutex;

use crate::objects;

/// Error or warning received through `print_error` / `print_warning`, or raised by the mock itself.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PrintedMessage {
    pub description: String,
    pub function: String,
    pub file: String,
    pub line: i32,
}

static ERRORS: Mutex<Vec<PrintedMessage>> = Mutex::new(Vec::new());
static WARNINGS: Mutex<Vec<PrintedMessage>> = Mutex::new(Vec::new());

pub(crate) fn record_error(message: PrintedMessage) {
    eprintln!("ERROR: {}\n   at: {} ({}:{})", message.description, message.function, message.file, message.line);
    ERRORS.lock().push(message);
}

pub(crate) fn record_warning(message: PrintedMessage) {
    eprintln!("WARNING: {}\n   at: {} ({}:{})", message.description, message.function, message.file, message.line);
    WARNINGS.lock().push(message);
}

/// Error detected by the engine itself, e.g. a call on a freed object.
pub(crate) fn report_error(description: impl Into<String>) {
    record_error(PrintedMessage {
        description: description.into(),
        function: String::new(),
        file: "gdbind-mock".to_string(),
        line: 0,
    });
}

/// Descriptions of all errors printed so far, in order.
pub fn printed_errors() -> Vec<String> {
    ERRORS.lock().iter().map(|m| m.description.clone()).collect()
}

/// All warnings printed so far, in order.
pub fn printed_warnings() -> Vec<PrintedMessage> {
    WARNINGS.lock().clone()
}

/// Whether the object with this instance ID exists and has not been freed.
pub fn is_alive(instance_id: u64) -> bool {
    objects::audit_alive(instance_id)
}

/// How often `object_destroy` was called for the object, including invalid repeated calls.
pub fn destroy_count(instance_id: u64) -> u32 {
    objects::audit_destroy_count(instance_id)
}

/// Current reference count, or `None` if the object is not reference-counted or no longer alive.
pub fn reference_count(instance_id: u64) -> Option<u32> {
    objects::audit_reference_count(instance_id)
}

/// How often the native implementation of a virtual method (e.g. `"_process"`) ran for the object.
pub fn native_default_calls(instance_id: u64, method: &str) -> u32 {
    objects::audit_default_calls(instance_id, method)
}
