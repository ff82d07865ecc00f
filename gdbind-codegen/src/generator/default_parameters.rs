/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use crate::conv;
use crate::generator::functions_common::{self, FnReceiver};
use crate::models::domain::{Class, ClassMethod, FnParam};
use crate::util::{ident, safe_ident};

/// Generates the short form, the `_ex` form and the internal full form of a method with default parameters, plus the
/// builder struct returned by the `_ex` form.
///
/// Static and unsafe methods are excluded in [`ClassMethod::uses_default_params`], so there is always a surrounding
/// object and every parameter can be stored in the builder.
pub fn make_method_with_defaults(class: &Class, method: &ClassMethod) -> (TokenStream, TokenStream) {
    let (default_params, required_params): (Vec<&FnParam>, Vec<&FnParam>) =
        method.params.iter().partition(|p| p.default_value.is_some());

    let simple_fn_name = safe_ident(&method.rust_name);
    let extended_fn_name = format_ident!("{}_ex", method.rust_name);
    let full_fn_name = format_ident!("{}_full", method.rust_name);
    let builder_ty = ident(&conv::to_builder_name(&method.rust_name));

    let class_name = class.name_ident();
    let FnReceiver { param: receiver, object_ptr } = functions_common::make_receiver(method);
    let (return_decl, return_ty) = functions_common::make_return(method.return_ty.as_ref());
    let method_index = functions_common::make_method_index(class, method);

    // Full form: all parameters already converted to tuple elements.
    let (full_params, full_sig_tys): (Vec<_>, Vec<_>) = method
        .params
        .iter()
        .map(|p| {
            let name = &p.name;
            let ty = p.ty.call_sig_ty();
            (quote! { #name: #ty }, ty)
        })
        .unzip();
    let full_args = method.params.iter().map(|p| &p.name);

    let (required_decls, _, required_args) = functions_common::make_params_exprs(required_params.iter().copied());
    let required_names: Vec<_> = required_params.iter().map(|p| &p.name).collect();

    // Builder.
    let lifetime = quote! { 'a };
    let ex_receiver = if method.is_const {
        quote! { &'a self, }
    } else {
        quote! { &'a mut self, }
    };
    let ex_decls = required_params.iter().map(|p| {
        let name = &p.name;
        let decl = p.ty.param_decl_with_lifetime(&lifetime);
        quote! { #name: #decl }
    });
    let surround_ty = if method.is_const {
        quote! { &'a #class_name }
    } else {
        quote! { &'a mut #class_name }
    };

    let required_fields = required_params.iter().map(|p| {
        let name = &p.name;
        let ty = p.ty.call_sig_ty_with_lifetime(&lifetime);
        quote! { #name: #ty }
    });

    let default_fields = default_params.iter().map(|p| {
        let name = &p.name;
        let ty = p.ty.owned_ty();
        quote! { #name: #ty }
    });

    let default_inits = default_params.iter().map(|p| {
        let name = &p.name;
        let value = p.default_value.as_ref();
        quote! { #name: #value }
    });

    let setters = default_params.iter().map(|p| {
        let name = &p.name;
        let decl = p.ty.param_decl();
        let value = p.ty.to_owned_expr(name);
        let doc = format!("Overrides the default of `{}`.", p.name);

        quote! {
            #[doc = #doc]
            pub fn #name(self, #name: #decl) -> Self {
                Self {
                    #name: #value,
                    ..self
                }
            }
        }
    });

    let all_fields = method.params.iter().map(|p| &p.name);
    let done_args = method.params.iter().map(|p| {
        let name = &p.name;
        if p.default_value.is_some() {
            p.ty.owned_to_call_arg(&quote! { #name })
        } else {
            quote! { #name }
        }
    });

    let doc = format!("Calls `{}::{}`, with default arguments.", class.name, method.godot_name);
    let ex_doc = format!(
        "Calls `{}::{}`; the returned builder allows overriding default arguments before [`{builder_ty}::done()`].",
        class.name, method.godot_name
    );
    let builder_doc = format!("Default-parameter builder for [`{class_name}::{extended_fn_name}()`].");

    let functions = quote! {
        #[doc = #doc]
        pub fn #simple_fn_name(#receiver #( #required_decls ),*) #return_decl {
            self.#extended_fn_name(#( #required_names ),*).done()
        }

        #[doc = #ex_doc]
        pub fn #extended_fn_name<'a>(#ex_receiver #( #ex_decls ),*) -> #builder_ty<'a> {
            #builder_ty::new(self, #( #required_args ),*)
        }

        fn #full_fn_name(#receiver #( #full_params ),*) #return_decl {
            unsafe {
                Signature::<( #( #full_sig_tys, )* ), #return_ty>::out_class_ptrcall(
                    #method_index,
                    #object_ptr,
                    ( #( #full_args, )* ),
                )
            }
        }
    };

    let required_params_plain = required_params.iter().map(|p| {
        let name = &p.name;
        let ty = p.ty.call_sig_ty_with_lifetime(&lifetime);
        quote! { #name: #ty }
    });

    // #[allow] exceptions:
    // - redundant_field_names:     'value: value' is a possible initialization pattern
    // - needless_update:           '..self' has nothing left to change if there is a single default
    let builder = quote! {
        #[doc = #builder_doc]
        #[must_use]
        pub struct #builder_ty<'a> {
            surround_object: #surround_ty,
            #( #required_fields, )*
            #( #default_fields, )*
        }

        #[allow(clippy::redundant_field_names, clippy::needless_update)]
        impl<'a> #builder_ty<'a> {
            fn new(surround_object: #surround_ty, #( #required_params_plain ),*) -> Self {
                Self {
                    surround_object,
                    #( #required_names, )*
                    #( #default_inits, )*
                }
            }

            #( #setters )*

            /// Performs the call.
            pub fn done(self) #return_decl {
                let Self { surround_object, #( #all_fields ),* } = self;
                surround_object.#full_fn_name(#( #done_args ),*)
            }
        }
    };

    (functions, builder)
}
