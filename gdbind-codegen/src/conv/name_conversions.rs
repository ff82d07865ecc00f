/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Identifier renamings (engine -> Rust)

use heck::{ToShoutySnakeCase, ToSnakeCase};

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Case conversions

pub fn to_snake_case(class_name: &str) -> String {
    class_name
        .replace("1D", "_1d")
        .replace("2D", "_2d")
        .replace("3D", "_3d")
        .to_snake_case()
}

/// Module of a class, e.g. `node_2d` for `Node2D`.
pub fn to_module_name(class_name: &str) -> String {
    to_snake_case(class_name)
}

/// Name of the virtual trait, e.g. `INode2D`.
pub fn to_virtual_trait_name(class_name: &str) -> String {
    format!("I{class_name}")
}

/// Rust name of a virtual method: the engine prefixes them with `_`, Rust does not.
pub fn to_virtual_method_name(godot_name: &str) -> &str {
    godot_name.strip_prefix('_').unwrap_or(godot_name)
}

/// Constant in `central::method_index`, e.g. `Node__add_child`.
pub fn to_method_index_name(class_name: &str, rust_method_name: &str) -> String {
    format!("{class_name}__{rust_method_name}")
}

/// Name of the default-parameter builder, e.g. `ExAddChild` for `add_child`.
pub fn to_builder_name(rust_method_name: &str) -> String {
    use heck::ToPascalCase;

    format!("Ex{}", rust_method_name.to_pascal_case())
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Enum conversions

/// Shortens enumerator names by removing the prefix they share.
///
/// The preferred prefix is the enum name itself (`PROCESS_MODE_` for `ProcessMode`). Otherwise, the longest prefix of
/// whole `_`-separated segments that all enumerators share is removed. The result never starts with a digit and is
/// never empty; if it would be, the names are left untouched.
pub fn make_enumerator_names(enum_name: &str, enumerators: &[&str]) -> Vec<String> {
    let own_prefix = format!("{}_", enum_name.to_shouty_snake_case());

    if let Some(stripped) = try_strip_prefix(enumerators, &own_prefix) {
        return stripped;
    }

    let common = common_segment_prefix(enumerators);
    if !common.is_empty() {
        if let Some(stripped) = try_strip_prefix(enumerators, &common) {
            return stripped;
        }
    }

    enumerators.iter().map(|s| s.to_string()).collect()
}

fn try_strip_prefix(enumerators: &[&str], prefix: &str) -> Option<Vec<String>> {
    enumerators
        .iter()
        .map(|name| {
            let rest = name.strip_prefix(prefix)?;
            let valid = rest.chars().next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
            valid.then(|| rest.to_string())
        })
        .collect()
}

/// Longest prefix of whole segments (including the trailing `_`) that all names share. Needs at least two names.
fn common_segment_prefix(names: &[&str]) -> String {
    if names.len() < 2 {
        return String::new();
    }

    let split: Vec<Vec<&str>> = names.iter().map(|name| name.split('_').collect()).collect();
    let shortest = split.iter().map(Vec::len).min().unwrap_or(0);

    let mut prefix = String::new();
    // The last segment of the shortest name must stay, otherwise that name would be consumed entirely.
    for i in 0..shortest.saturating_sub(1) {
        let segment = split[0][i];
        if split.iter().all(|parts| parts[i] == segment) {
            prefix.push_str(segment);
            prefix.push('_');
        } else {
            break;
        }
    }

    prefix
}
