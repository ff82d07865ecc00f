/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Locates the engine class database and provides helpers for build scripts.

pub(crate) mod watch;

use std::path::{Path, PathBuf};

pub use watch::StopWatch;

/// Environment variable that overrides the bundled class database.
pub const CLASS_DB_ENV: &str = "GDBIND_CLASS_DB";

/// Path of the class database that ships with this crate.
pub fn bundled_class_db_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("res").join("class_db.json")
}

/// Path of the class database to generate from: `GDBIND_CLASS_DB` if set, otherwise the bundled one.
///
/// Emits `rerun-if` directives, so this is meant to be called from build scripts.
pub fn class_db_path() -> PathBuf {
    println!("cargo:rerun-if-env-changed={CLASS_DB_ENV}");

    let path = match std::env::var_os(CLASS_DB_ENV) {
        Some(custom) => PathBuf::from(custom),
        None => bundled_class_db_path(),
    };

    println!("cargo:rerun-if-changed={}", path.display());
    path
}

/// Reads the class database JSON.
pub fn load_class_db_json(watch: &mut StopWatch) -> String {
    let path = class_db_path();
    let json = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read class database {}: {e}", path.display()));

    watch.record("read_class_db");
    json
}

/// Deletes and re-creates `dir`.
pub fn clear_dir(dir: &Path, watch: &mut StopWatch) {
    if dir.exists() {
        remove_dir_all_reliable(dir);
        watch.record("delete_gen_dir");
    }
    std::fs::create_dir_all(dir).unwrap_or_else(|e| panic!("failed to create dir: {e}"));
}

/// Removes a directory, retrying a few times on transient file-system errors.
pub fn remove_dir_all_reliable(path: &Path) {
    let mut retry_count = 0;

    while path.exists() {
        match std::fs::remove_dir_all(path) {
            Ok(_) => break,
            Err(err) => {
                assert_ne!(
                    retry_count,
                    5,
                    "cannot remove directory: {path_display} after 5 tries with error: {err}",
                    path_display = path.display()
                );
                retry_count += 1;
                std::thread::sleep(std::time::Duration::from_millis(10));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_db_exists() {
        let path = bundled_class_db_path();
        assert!(path.is_file(), "missing {}", path.display());

        let json = std::fs::read_to_string(path).expect("readable");
        assert!(json.contains("\"classes\""));
    }

    #[test]
    fn clear_dir_recreates() {
        let dir = std::env::temp_dir().join(format!("gdbind-clear-dir-{}", std::process::id()));
        std::fs::create_dir_all(dir.join("nested")).expect("create");
        std::fs::write(dir.join("nested").join("stale.rs"), "// stale").expect("write");

        let mut watch = StopWatch::start();
        clear_dir(&dir, &mut watch);

        assert!(dir.is_dir());
        assert!(!dir.join("nested").exists());
        remove_dir_all_reliable(&dir);
    }
}
