/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::path::Path;

fn main() {
    // Generated inside the crate directory, so IDEs can resolve the symbols.
    let gen_path = Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/src/gen"));

    let mut watch = gdbind_bindings::StopWatch::start();
    gdbind_bindings::clear_dir(gen_path, &mut watch);

    let json = gdbind_bindings::load_class_db_json(&mut watch);
    gdbind_codegen::generate_core_files(&json, gen_path, &mut watch);

    watch.write_stats_to(&gen_path.join("codegen-stats.txt"));
    println!("cargo:rerun-if-changed=build.rs");
}
