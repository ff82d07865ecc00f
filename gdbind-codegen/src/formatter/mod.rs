/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Optional formatting of generated files.
//!
//! Without the `codegen-rustfmt` feature, files are written as a single line per token stream, which compiles just the
//! same. With it, `rustfmt` runs once over all written files; a missing `rustfmt` only prints a warning.

use std::path::PathBuf;

#[cfg(feature = "codegen-rustfmt")]
pub fn format_files(files: &[PathBuf]) {
    if files.is_empty() {
        return;
    }

    let output = std::process::Command::new("rustfmt")
        .arg("--edition=2021")
        .args(files)
        .output();

    match output {
        Ok(output) if output.status.success() => {}
        Ok(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            println!("cargo:warning=rustfmt failed on generated files: {stderr}");
        }
        Err(err) => println!("cargo:warning=could not run rustfmt on generated files: {err}"),
    }
}

#[cfg(not(feature = "codegen-rustfmt"))]
pub fn format_files(_files: &[PathBuf]) {}
