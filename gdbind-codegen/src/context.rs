/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::collections::{HashMap, HashSet};

use crate::conv;
use crate::models::json::JsonExtensionApi;
use crate::models::CodegenError;

/// Lookup tables over the whole class database, built before any class is mapped.
#[derive(Default)]
pub struct Context {
    /// Class name -> parent class name (`None` for the root).
    inheritance: HashMap<String, Option<String>>,
    refcounted: HashSet<String>,

    /// `(class name, enum name)` -> is_bitfield. Global enums use `None` as class.
    enums: HashMap<(Option<String>, String), bool>,
}

impl Context {
    pub fn build_from_api(api: &JsonExtensionApi) -> Result<Self, CodegenError> {
        let mut ctx = Context::default();

        for class in api.classes.iter() {
            if ctx.inheritance.insert(class.name.clone(), class.inherits.clone()).is_some() {
                return Err(CodegenError::DuplicateClass { class: class.name.clone() });
            }

            if class.is_refcounted {
                ctx.refcounted.insert(class.name.clone());
            }

            for e in class.enums.iter().flatten() {
                ctx.enums.insert((Some(class.name.clone()), e.name.clone()), e.is_bitfield);
            }
        }

        for e in api.global_enums.iter().flatten() {
            ctx.enums.insert((None, e.name.clone()), e.is_bitfield);
        }

        // Every parent must exist, and walking up must terminate at a root.
        for class in api.classes.iter() {
            if let Some(parent) = &class.inherits {
                if !ctx.is_class(parent) {
                    return Err(CodegenError::UnknownParent {
                        class: class.name.clone(),
                        parent: parent.clone(),
                    });
                }
            }

            ctx.inheritance_chain(&class.name)?;
        }

        Ok(ctx)
    }

    pub fn is_class(&self, class_name: &str) -> bool {
        self.inheritance.contains_key(class_name)
    }

    pub fn is_refcounted(&self, class_name: &str) -> bool {
        self.refcounted.contains(class_name)
    }

    /// Finds an enum, returning the module in which it is declared (empty for global enums).
    ///
    /// Fails if the enum does not exist or if it is a bitfield while an enum was requested, or vice versa.
    pub fn find_enum(&self, class_name: Option<&str>, enum_name: &str, is_bitfield: bool) -> Option<String> {
        let key = (class_name.map(str::to_string), enum_name.to_string());
        let found_bitfield = *self.enums.get(&key)?;

        if found_bitfield != is_bitfield {
            return None;
        }

        Some(class_name.map(conv::to_module_name).unwrap_or_default())
    }

    /// All ancestors of a class, starting with the direct parent and ending with the root.
    pub fn collect_all_bases(&self, class_name: &str) -> Vec<String> {
        // Validated during construction; cannot fail anymore.
        self.inheritance_chain(class_name).unwrap_or_default()
    }

    fn inheritance_chain(&self, class_name: &str) -> Result<Vec<String>, CodegenError> {
        let mut bases = Vec::new();
        let mut current = class_name;

        while let Some(Some(parent)) = self.inheritance.get(current) {
            if parent == class_name || bases.len() > self.inheritance.len() {
                return Err(CodegenError::InheritanceCycle {
                    class: class_name.to_string(),
                });
            }

            bases.push(parent.clone());
            current = parent;
        }

        Ok(bases)
    }
}
