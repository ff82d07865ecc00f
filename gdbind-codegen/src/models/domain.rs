/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Domain models: the class database after validation, with all types resolved to Rust.
//!
//! Generators only ever see these models. Everything that can go wrong with the input has been reported while
//! mapping from JSON, see `domain_mapping`.

use proc_macro2::{Ident, TokenStream};

use crate::conv::RustTy;

pub struct ExtensionApi {
    pub version: ApiVersion,
    pub classes: Vec<Class>,
    pub global_enums: Vec<Enum>,
}

impl ExtensionApi {
    /// All non-virtual methods, in method table order.
    pub fn table_methods(&self) -> impl Iterator<Item = (&Class, &ClassMethod)> {
        self.classes
            .iter()
            .flat_map(|class| class.methods.iter().map(move |method| (class, method)))
    }
}

#[derive(Clone, Debug)]
pub struct ApiVersion {
    pub major: u8,
    pub minor: u8,
    pub patch: u8,
    pub full_name: String,
}

// ----------------------------------------------------------------------------------------------------------------------------------------------

pub struct Class {
    /// Name in the engine, which is also the Rust type name.
    pub name: String,
    pub mod_name: String,
    pub inherits: Option<String>,

    /// Ancestors, from the direct parent to the root.
    pub all_bases: Vec<String>,
    pub is_refcounted: bool,
    pub is_instantiable: bool,

    pub constants: Vec<Constant>,
    pub enums: Vec<Enum>,
    pub methods: Vec<ClassMethod>,
    pub virtual_methods: Vec<VirtualMethod>,
    pub signals: Vec<Signal>,
}

impl Class {
    pub fn name_ident(&self) -> Ident {
        crate::util::ident(&self.name)
    }

    pub fn is_root(&self) -> bool {
        self.inherits.is_none()
    }
}

pub struct Constant {
    pub name: String,
    pub value: i64,
}

pub struct Enum {
    pub name: String,
    pub is_bitfield: bool,
    pub enumerators: Vec<Enumerator>,
}

pub struct Enumerator {
    /// Original name, e.g. `PROCESS_MODE_INHERIT`.
    pub godot_name: String,

    /// Shortened name, e.g. `INHERIT`.
    pub rust_name: String,
    pub value: i64,
}

// ----------------------------------------------------------------------------------------------------------------------------------------------

pub struct ClassMethod {
    pub godot_name: String,

    /// Differs from `godot_name` for the non-const half of a const/non-const pair, or for Rust keywords.
    pub rust_name: String,
    pub hash: i64,
    pub is_const: bool,
    pub is_vararg: bool,
    pub is_static: bool,
    pub params: Vec<FnParam>,
    pub return_ty: Option<RustTy>,

    /// Position in the method table.
    pub table_index: usize,
}

impl ClassMethod {
    /// Methods with raw pointer parameters or return values are `unsafe fn`.
    pub fn is_unsafe(&self) -> bool {
        self.params.iter().any(|p| p.ty.is_pointer()) || self.return_ty.as_ref().is_some_and(RustTy::is_pointer)
    }

    /// Whether a default-parameter builder is generated.
    pub fn uses_default_params(&self) -> bool {
        !self.is_vararg && !self.is_static && !self.is_unsafe() && self.params.iter().any(|p| p.default_value.is_some())
    }
}

pub struct VirtualMethod {
    pub godot_name: String,

    /// Without the leading `_`.
    pub rust_name: String,
    pub is_const: bool,
    pub params: Vec<FnParam>,
    pub return_ty: Option<RustTy>,
}

pub struct Signal {
    pub name: String,
    pub params: Vec<FnParam>,
}

#[derive(Clone)]
pub struct FnParam {
    pub name: Ident,
    pub ty: RustTy,

    /// Expression of type `ty.owned_ty()`.
    pub default_value: Option<TokenStream>,
}
