/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use proc_macro2::{Ident, TokenStream};
use quote::quote;

use crate::conv;
use crate::models::domain::{Class, ExtensionApi, VirtualMethod};
use crate::util::{ident, safe_ident};

/// Whether `class` gets an `I*` trait: it declares virtual methods, or one of its ancestors does.
pub fn has_virtual_trait(class: &Class, api: &ExtensionApi) -> bool {
    !collect_virtuals(class, api).is_empty()
}

/// The `I*` trait of `class`, or nothing.
///
/// Host classes implement it through `#[godot_api]`, which registers exactly the methods that are overridden. The
/// default bodies are never called.
pub fn make_virtual_methods_trait(class: &Class, api: &ExtensionApi) -> TokenStream {
    let virtuals = collect_virtuals(class, api);
    if virtuals.is_empty() {
        return TokenStream::new();
    }

    let trait_name = virtual_trait_ident(&class.name);
    let doc = format!(
        "Virtual methods of `{}` and its base classes, to override in a host class with `#[godot_api]`.",
        class.name
    );

    let methods = virtuals.iter().map(|m| make_virtual_method(m));

    quote! {
        #[doc = #doc]
        #[allow(unused_variables)]
        pub trait #trait_name: crate::obj::GodotClass + crate::private::You_forgot_the_attribute__godot_api {
            /// Default constructor of the host class, receiving the handle to its engine base.
            fn init(base: crate::obj::Base<Self::Base>) -> Self
            where
                Self: Sized,
            {
                unimplemented!()
            }

            #( #methods )*
        }
    }
}

pub fn virtual_trait_ident(class_name: &str) -> Ident {
    ident(&conv::to_virtual_trait_name(class_name))
}

fn make_virtual_method(method: &VirtualMethod) -> TokenStream {
    let fn_name = safe_ident(&method.rust_name);
    let receiver = if method.is_const {
        quote! { &self }
    } else {
        quote! { &mut self }
    };

    let params = method.params.iter().map(|p| {
        let name = &p.name;
        let ty = p.ty.owned_ty();
        quote! { #name: #ty }
    });

    let return_decl = method.return_ty.as_ref().map(|ty| {
        let ty = ty.owned_ty();
        quote! { -> #ty }
    });

    let doc = format!("Override of the engine's `{}`.", method.godot_name);

    quote! {
        #[doc = #doc]
        fn #fn_name(#receiver, #( #params ),*) #return_decl {
            unimplemented!()
        }
    }
}

/// Own virtuals of `class`, followed by those of its ancestors (nearest first). Overridden ones appear once.
fn collect_virtuals<'a>(class: &'a Class, api: &'a ExtensionApi) -> Vec<&'a VirtualMethod> {
    let mut result: Vec<&VirtualMethod> = class.virtual_methods.iter().collect();

    for base_name in class.all_bases.iter() {
        let Some(base) = api.classes.iter().find(|c| &c.name == base_name) else {
            continue;
        };

        for method in base.virtual_methods.iter() {
            if !result.iter().any(|m| m.rust_name == method.rust_name) {
                result.push(method);
            }
        }
    }

    result
}
