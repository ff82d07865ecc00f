/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};

use crate::conv;
use crate::generator::default_parameters;
use crate::models::domain::{Class, ClassMethod, FnParam};
use crate::util::{ident, safe_ident};

pub struct FnReceiver {
    /// `&self,` or `&mut self,`; empty for static methods.
    pub param: TokenStream,

    /// Object pointer passed to the bind; null for static methods.
    pub object_ptr: TokenStream,
}

pub fn make_receiver(method: &ClassMethod) -> FnReceiver {
    if method.is_static {
        FnReceiver {
            param: TokenStream::new(),
            object_ptr: quote! { std::ptr::null_mut() },
        }
    } else if method.is_const {
        FnReceiver {
            param: quote! { &self, },
            object_ptr: quote! { self.object_ptr },
        }
    } else {
        FnReceiver {
            param: quote! { &mut self, },
            object_ptr: quote! { self.object_ptr },
        }
    }
}

/// `-> T` and `T`, or nothing and `()` for void.
pub fn make_return(method_return: Option<&conv::RustTy>) -> (TokenStream, TokenStream) {
    match method_return {
        Some(ty) => {
            let owned = ty.owned_ty();
            (quote! { -> #owned }, owned)
        }
        None => (TokenStream::new(), quote! { () }),
    }
}

pub fn make_method_index(class: &Class, method: &ClassMethod) -> TokenStream {
    let index = ident(&conv::to_method_index_name(&class.name, &method.rust_name));
    quote! { crate::gen::central::method_index::#index }
}

/// Parameter declarations, tuple element types and tuple elements for `params`.
pub fn make_params_exprs<'a>(
    params: impl IntoIterator<Item = &'a FnParam>,
) -> (Vec<TokenStream>, Vec<TokenStream>, Vec<TokenStream>) {
    let mut decls = vec![];
    let mut sig_tys = vec![];
    let mut args = vec![];

    for param in params {
        let name = &param.name;
        let decl = param.ty.param_decl();

        decls.push(quote! { #name: #decl });
        sig_tys.push(param.ty.call_sig_ty());
        args.push(param.ty.call_arg(name));
    }

    (decls, sig_tys, args)
}

// ----------------------------------------------------------------------------------------------------------------------------------------------

/// Generates the method itself, plus a builder struct if the method has default parameters.
pub fn make_class_method(class: &Class, method: &ClassMethod) -> (TokenStream, TokenStream) {
    if method.is_vararg {
        (make_vararg_method(class, method), TokenStream::new())
    } else if method.uses_default_params() {
        default_parameters::make_method_with_defaults(class, method)
    } else {
        (make_ptrcall_method(class, method), TokenStream::new())
    }
}

fn make_ptrcall_method(class: &Class, method: &ClassMethod) -> TokenStream {
    let fn_name = safe_ident(&method.rust_name);
    let FnReceiver { param, object_ptr } = make_receiver(method);
    let (return_decl, return_ty) = make_return(method.return_ty.as_ref());
    let method_index = make_method_index(class, method);
    let (decls, sig_tys, args) = make_params_exprs(&method.params);

    let unsafe_kw = method.is_unsafe().then(|| quote! { unsafe });
    let safety_doc = method.is_unsafe().then(|| {
        quote! {
            #[doc = ""]
            #[doc = "# Safety"]
            #[doc = "Raw pointers must be valid for the number of elements the engine reads or writes."]
        }
    });
    let doc = format!("Calls `{}::{}`.", class.name, method.godot_name);

    quote! {
        #[doc = #doc]
        #safety_doc
        pub #unsafe_kw fn #fn_name(#param #( #decls ),*) #return_decl {
            unsafe {
                Signature::<( #( #sig_tys, )* ), #return_ty>::out_class_ptrcall(
                    #method_index,
                    #object_ptr,
                    ( #( #args, )* ),
                )
            }
        }
    }
}

fn make_vararg_method(class: &Class, method: &ClassMethod) -> TokenStream {
    let fn_name = safe_ident(&method.rust_name);
    let try_fn_name = format_ident!("try_{}", method.rust_name);
    let FnReceiver { param, object_ptr } = make_receiver(method);
    let (return_decl, return_ty) = make_return(method.return_ty.as_ref());
    let method_index = make_method_index(class, method);
    let (decls, sig_tys, args) = make_params_exprs(&method.params);
    let arg_names = method.params.iter().map(|p| &p.name);

    let call_prefix = if method.is_static {
        quote! { Self:: }
    } else {
        quote! { self. }
    };

    let doc = format!(
        "Calls `{}::{}` with additional variant arguments.\n\n# Panics\nIf the call fails; see [`Self::{try_fn_name}()`] for a non-panicking version.",
        class.name, method.godot_name
    );

    quote! {
        #[doc = #doc]
        pub fn #fn_name(#param #( #decls, )* varargs: &[Variant]) #return_decl {
            #call_prefix #try_fn_name(#( #arg_names, )* varargs).unwrap_or_else(|err| panic!("{err}"))
        }

        #[doc = "Like the panicking version, but returns the failure as [`CallError`](crate::meta::CallError)."]
        pub fn #try_fn_name(#param #( #decls, )* varargs: &[Variant]) -> Result<#return_ty, crate::meta::CallError> {
            unsafe {
                Signature::<( #( #sig_tys, )* ), #return_ty>::out_class_varcall(
                    #method_index,
                    #object_ptr,
                    ( #( #args, )* ),
                    varargs,
                )
            }
        }
    }
}
