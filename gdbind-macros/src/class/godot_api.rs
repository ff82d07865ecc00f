/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use proc_macro2::TokenStream;

use crate::class::transform_trait_impl;
use crate::util::{bail, remove_attributes, KvParser};
use crate::ParseResult;

pub fn attribute_godot_api(input_item: venial::Item) -> ParseResult<TokenStream> {
    let mut decl = match input_item {
        venial::Item::Impl(decl) => decl,
        _ => bail!(
            input_item,
            "#[godot_api] can only be applied on impl blocks",
        )?,
    };

    if let Some(parser) = KvParser::parse(&decl.attributes, "godot_api")? {
        parser.finish()?;
    }
    remove_attributes(&mut decl.attributes, "godot_api");

    if decl.impl_generic_params.is_some() {
        return bail!(
            &decl,
            "#[godot_api] currently does not support generic parameters",
        );
    }

    if decl.trait_ty.is_none() {
        return bail!(
            &decl,
            "#[godot_api] only overrides virtual methods; use it on `impl INode for MyClass` blocks",
        );
    }

    transform_trait_impl(decl)
}
