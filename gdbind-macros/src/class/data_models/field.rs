/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use proc_macro2::{Ident, TokenStream};
use quote::quote;

use crate::util::bail;
use crate::ParseResult;

pub struct Field {
    pub name: Ident,
    pub ty: venial::TypeExpr,
    pub default_val: Option<TokenStream>,
}

impl Field {
    pub fn new(field: &venial::NamedField) -> Self {
        Self {
            name: field.name.clone(),
            ty: field.ty.clone(),
            default_val: None,
        }
    }

    /// Initializer expression used by `#[class(init)]`.
    pub fn init_expr(&self) -> TokenStream {
        match &self.default_val {
            Some(val) => quote! { #val },
            None => {
                let ty = &self.ty;
                quote! { <#ty as ::std::default::Default>::default() }
            }
        }
    }
}

pub struct Fields {
    /// All fields except `base_field`.
    pub all_fields: Vec<Field>,

    /// The field with type `Base<T>`, if available.
    pub base_field: Option<Field>,
}

/// Fetches all named fields of a struct.
///
/// Errors if `class` is a tuple struct.
pub fn named_fields(class: &venial::Struct) -> ParseResult<Vec<venial::NamedField>> {
    match &class.fields {
        venial::Fields::Unit => Ok(vec![]),
        venial::Fields::Tuple(_) => bail!(
            &class.fields,
            "#[derive(GodotClass)] is not supported for tuple structs",
        ),
        venial::Fields::Named(fields) => Ok(fields
            .fields
            .inner
            .iter()
            .map(|(field, _punct)| field.clone())
            .collect()),
    }
}
