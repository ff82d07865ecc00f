/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use proc_macro2::{Literal, TokenStream};
use quote::quote;

use crate::conv;
use crate::generator::enums;
use crate::models::domain::ExtensionApi;
use crate::util::{c_str_literal, ident};

/// `central.rs`: version, method specs and class names.
pub fn make_core_central_code(api: &ExtensionApi) -> TokenStream {
    let major = Literal::u32_unsuffixed(u32::from(api.version.major));
    let minor = Literal::u32_unsuffixed(u32::from(api.version.minor));
    let full_name = &api.version.full_name;

    let mut specs = Vec::new();
    let mut indices = Vec::new();

    for (class, method) in api.table_methods() {
        let class_cstr = c_str_literal(&class.name);
        let method_cstr = c_str_literal(&method.godot_name);
        let hash = Literal::i64_unsuffixed(method.hash);
        let params = method.params.iter().map(|p| p.ty.native_kind());
        let ret = match &method.return_ty {
            Some(ty) => {
                let kind = ty.native_kind();
                quote! { Some(#kind) }
            }
            None => quote! { None },
        };
        let is_vararg = method.is_vararg;
        let is_const = method.is_const;

        specs.push(quote! {
            sys::MethodSpec {
                class: #class_cstr,
                method: #method_cstr,
                hash: #hash,
                params: &[ #( #params ),* ],
                ret: #ret,
                is_vararg: #is_vararg,
                is_const: #is_const,
            }
        });

        let index_name = ident(&conv::to_method_index_name(&class.name, &method.rust_name));
        let index = Literal::usize_unsuffixed(method.table_index);
        indices.push(quote! {
            pub const #index_name: usize = #index;
        });
    }

    let class_names = api.classes.iter().map(|c| &c.name);

    quote! {
        use crate::sys;

        /// Version of the class database that the bindings were generated from.
        pub const API_VERSION: sys::ApiVersion = sys::ApiVersion {
            major: #major,
            minor: #minor,
        };

        pub const API_VERSION_FULL_NAME: &str = #full_name;

        /// Every non-virtual engine method, in method table order.
        pub static METHOD_SPECS: &[sys::MethodSpec] = &[
            #( #specs, )*
        ];

        /// Positions of methods in [`METHOD_SPECS`] and the method table built from it.
        pub mod method_index {
            #( #indices )*
        }

        /// All engine classes, in class database order.
        pub static CLASS_NAMES: &[&str] = &[
            #( #class_names, )*
        ];
    }
}

/// `global_enums.rs`: enums that do not belong to a class.
pub fn make_global_enums_code(api: &ExtensionApi) -> TokenStream {
    let enums = enums::make_enums(&api.global_enums);

    quote! {
        #enums
    }
}

/// `mod.rs` of the generated directory.
pub fn make_gen_mod_code() -> TokenStream {
    quote! {
        pub mod central;
        pub mod classes;
        pub mod global_enums;
    }
}
