/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use proc_macro2::TokenStream;
use quote::quote;

use crate::class::{into_signature_info, make_virtual_callback};
use crate::{util, ParseResult};

/// Codegen for `#[godot_api] impl ISomething for MyType`.
pub fn transform_trait_impl(original_impl: venial::Impl) -> ParseResult<TokenStream> {
    let (class_name, trait_path) = util::validate_trait_impl_virtual(&original_impl, "godot_api")?;

    let mut godot_init_impl = TokenStream::new();
    let mut virtual_method_names = vec![];
    let mut virtual_methods = vec![];

    let prv = quote! { ::gdbind::private };

    for item in original_impl.body_items.iter() {
        let venial::ImplMember::AssocFunction(method) = item else {
            continue;
        };

        let method_name = method.name.to_string();
        match method_name.as_str() {
            "init" => {
                godot_init_impl = quote! {
                    impl ::gdbind::obj::cap::GodotDefault for #class_name {
                        fn __godot_user_init(base: ::gdbind::obj::Base<Self::Base>) -> Self {
                            <Self as #trait_path>::init(base)
                        }
                    }
                };
            }

            // Other virtual methods, like ready, process etc.
            _ => {
                let signature_info = into_signature_info(method, &class_name)?;
                let callback = make_virtual_callback(&class_name, &trait_path, &signature_info);

                // Engine virtuals carry a `_` prefix, which the Rust trait drops.
                virtual_method_names.push(format!("_{method_name}"));
                virtual_methods.push(callback);
            }
        }
    }

    let interface_item = if godot_init_impl.is_empty() {
        quote! { #prv::PluginItem::new_interface_impl::<#class_name>() }
    } else {
        quote! { #prv::PluginItem::new_interface_impl_with_init::<#class_name>() }
    };

    let result = quote! {
        #original_impl
        #godot_init_impl

        impl #prv::You_forgot_the_attribute__godot_api for #class_name {}

        impl ::gdbind::obj::cap::ImplementsGodotVirtual for #class_name {
            fn __virtual_call(name: &str) -> ::gdbind::sys::GDExtensionClassCallVirtual {
                match name {
                    #(
                        #virtual_method_names => #virtual_methods,
                    )*
                    _ => None,
                }
            }
        }

        ::gdbind::sys::plugin_add!(__GDBIND_PLUGIN_REGISTRY in #prv; #prv::ClassPlugin::new::<#class_name>(
            #interface_item
        ));
    };

    Ok(result)
}
