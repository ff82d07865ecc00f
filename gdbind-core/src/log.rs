/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Printing to the engine's output.
//!
//! Errors and warnings go through the engine's print functions, so they show up in the editor's output panel. Before
//! the binding is initialized (or after a failed initialization), they fall back to stderr.

use crate::sys;
use std::ffi::CString;
use std::fmt;

/// Pushes an error message to the engine's output, like `eprintln!` but with source location.
#[macro_export]
macro_rules! godot_error {
    ($($args:tt)*) => {
        $crate::log::print_error(format_args!($($args)*), file!(), line!())
    };
}

/// Pushes a warning message to the engine's output.
#[macro_export]
macro_rules! godot_warn {
    ($($args:tt)*) => {
        $crate::log::print_warning(format_args!($($args)*), file!(), line!())
    };
}

/// Prints to stdout, like `println!`.
#[macro_export]
macro_rules! godot_print {
    ($($args:tt)*) => {
        $crate::log::print_message(format_args!($($args)*))
    };
}

pub use crate::{godot_error, godot_print, godot_warn};

#[derive(Copy, Clone)]
enum Severity {
    Error,
    Warning,
}

#[doc(hidden)]
pub fn print_error(message: fmt::Arguments, file: &'static str, line: u32) {
    print_severity(Severity::Error, message, file, line);
}

#[doc(hidden)]
pub fn print_warning(message: fmt::Arguments, file: &'static str, line: u32) {
    print_severity(Severity::Warning, message, file, line);
}

#[doc(hidden)]
pub fn print_message(message: fmt::Arguments) {
    println!("{message}");
}

fn print_severity(severity: Severity, message: fmt::Arguments, file: &'static str, line: u32) {
    let message = message.to_string();

    if !sys::is_initialized() {
        let prefix = match severity {
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
        };
        eprintln!("{prefix}: {message}\n   at {file}:{line}");
        return;
    }

    // Interior NULs would truncate the message on the engine side.
    let description = CString::new(message.replace('\0', "\\0")).unwrap_or_default();
    let file = CString::new(file).unwrap_or_default();
    let line = i32::try_from(line).unwrap_or(i32::MAX);

    // SAFETY: all strings are NUL-terminated and outlive the call.
    unsafe {
        let print = match severity {
            Severity::Error => sys::interface_fn!(print_error),
            Severity::Warning => sys::interface_fn!(print_warning),
        };
        print(
            description.as_ptr(),
            c"<function unset>".as_ptr(),
            file.as_ptr(),
            line,
            sys::bool_to_u8(false),
        );
    }
}
