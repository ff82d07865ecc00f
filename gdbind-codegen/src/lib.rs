/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Build-time generator of the engine class wrappers.
//!
//! Pipeline: JSON class database -> [`models::json`] -> validated [`models::domain`] -> token streams -> files.

mod context;
mod conv;
mod formatter;
mod generator;
mod models;
mod util;

#[cfg(test)]
mod tests;

use std::path::{Path, PathBuf};

use gdbind_bindings::StopWatch;
use proc_macro2::TokenStream;

use crate::context::Context;
use crate::generator::{central_files, classes};
use crate::models::domain::ExtensionApi;
use crate::models::json::parse_extension_api;

pub use crate::models::CodegenError;

pub type SubmitFn<'a> = dyn FnMut(PathBuf, TokenStream) + 'a;

fn write_file(path: &Path, contents: String) {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .unwrap_or_else(|e| panic!("failed to create directory {};\n\t{}", dir.display(), e));
    }

    std::fs::write(path, contents)
        .unwrap_or_else(|e| panic!("failed to write code file to {};\n\t{}", path.display(), e));
}

/// Generates all files of `gdbind-core/src/gen` from the class database `json`.
///
/// # Panics
/// If the class database is malformed. The message names the offending entry.
pub fn generate_core_files(json: &str, gen_path: &Path, watch: &mut StopWatch) {
    let api = map_extension_api(json, watch).unwrap_or_else(|err| panic!("cannot generate bindings: {err}"));

    let mut written = Vec::new();
    let mut submit_fn = |path: PathBuf, tokens: TokenStream| {
        write_file(&path, tokens.to_string());
        written.push(path);
    };

    generate_from_api(&api, gen_path, &mut submit_fn, watch);

    formatter::format_files(&written);
    watch.record("format_files");
}

/// Parses and validates the class database.
fn map_extension_api(json: &str, watch: &mut StopWatch) -> Result<ExtensionApi, CodegenError> {
    let json_api = parse_extension_api(json)?;
    watch.record("parse_json");

    let ctx = Context::build_from_api(&json_api)?;
    watch.record("build_context");

    let api = ExtensionApi::from_json(&json_api, &ctx)?;
    watch.record("map_domain_models");

    Ok(api)
}

fn generate_from_api(api: &ExtensionApi, gen_path: &Path, submit_fn: &mut SubmitFn<'_>, watch: &mut StopWatch) {
    submit_fn(gen_path.join("mod.rs"), central_files::make_gen_mod_code());

    submit_fn(gen_path.join("central.rs"), central_files::make_core_central_code(api));
    watch.record("generate_central_file");

    submit_fn(gen_path.join("global_enums.rs"), central_files::make_global_enums_code(api));
    watch.record("generate_global_enums_file");

    classes::generate_class_files(api, &gen_path.join("classes"), submit_fn);
    watch.record("generate_class_files");
}
