/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};

use crate::util::{bail, map_self_to_class_name, safe_ident};
use crate::ParseResult;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum ReceiverType {
    Ref,
    Mut,
}

#[derive(Debug)]
pub struct SignatureInfo {
    pub method_name: Ident,
    pub receiver_type: ReceiverType,
    pub param_idents: Vec<Ident>,
    pub param_types: Vec<venial::TypeExpr>,
    pub ret_type: TokenStream,
}

impl SignatureInfo {
    /// Tuple of parameter types, as expected by `InParamTuple`.
    pub fn params_tuple_type(&self) -> TokenStream {
        let types = &self.param_types;
        quote! { ( #( #types, )* ) }
    }
}

/// Extracts receiver, parameters and return type of a virtual method override.
pub(crate) fn into_signature_info(
    signature: &venial::Function,
    class_name: &Ident,
) -> ParseResult<SignatureInfo> {
    let method_name = signature.name.clone();
    let mut receiver_type = None;

    let num_params = signature.params.inner.len();
    let mut param_idents = Vec::with_capacity(num_params);
    let mut param_types = Vec::with_capacity(num_params);
    let ret_type = match &signature.return_ty {
        None => quote! { () },
        Some(ty) => map_self_to_class_name(ty.tokens.clone(), class_name),
    };

    let mut next_unnamed_index = 0;
    for (arg, _) in signature.params.inner.iter() {
        match arg {
            venial::FnParam::Receiver(recv) => {
                receiver_type = if recv.tk_ref.is_none() {
                    return bail!(recv, "virtual methods take `self` by reference, not by value");
                } else if recv.tk_mut.is_some() {
                    Some(ReceiverType::Mut)
                } else {
                    Some(ReceiverType::Ref)
                };
            }
            venial::FnParam::Typed(arg) => {
                let ident = maybe_rename_parameter(arg.name.clone(), &mut next_unnamed_index);
                let ty = venial::TypeExpr {
                    tokens: map_self_to_class_name(arg.ty.tokens.clone(), class_name),
                };

                param_types.push(ty);
                param_idents.push(ident);
            }
        }
    }

    let Some(receiver_type) = receiver_type else {
        return bail!(
            &signature.name,
            "virtual method `{method_name}` needs a `&self` or `&mut self` receiver"
        );
    };

    Ok(SignatureInfo {
        method_name,
        receiver_type,
        param_idents,
        param_types,
        ret_type,
    })
}

pub(crate) fn maybe_rename_parameter(param_ident: Ident, next_unnamed_index: &mut i32) -> Ident {
    // Parameters are forwarded to the instance, so `_` needs a name.
    let param_str = param_ident.to_string();

    if param_str == "_" {
        let ident = format_ident!("__unnamed_{next_unnamed_index}");
        *next_unnamed_index += 1;
        ident
    } else if let Some(remain) = param_str.strip_prefix('_') {
        // Unused parameters keep their actual name; "used-ness" is an implementation detail.
        safe_ident(remain)
    } else {
        param_ident
    }
}

/// Block expression evaluating to `sys::GDExtensionClassCallVirtual`: a trampoline that binds the instance, decodes
/// the arguments and forwards to `<Class as Trait>::method`.
pub fn make_virtual_callback(
    class_name: &Ident,
    trait_path: &venial::TypeExpr,
    signature_info: &SignatureInfo,
) -> TokenStream {
    let method_name = &signature_info.method_name;
    let class_name_str = class_name.to_string();
    let method_name_str = method_name.to_string();

    let params = &signature_info.param_idents;
    let params_ty = signature_info.params_tuple_type();
    let ret_ty = &signature_info.ret_type;

    let ptrcall_fn = match signature_info.receiver_type {
        ReceiverType::Ref => quote! { virtual_ptrcall_ref },
        ReceiverType::Mut => quote! { virtual_ptrcall_mut },
    };

    quote! {
        {
            use ::gdbind::sys;

            unsafe extern "C" fn virtual_fn(
                instance_ptr: sys::GDExtensionClassInstancePtr,
                args_ptr: *const sys::GDExtensionConstTypePtr,
                ret: sys::GDExtensionTypePtr,
            ) {
                let call_ctx = ::gdbind::meta::CallContext::func(#class_name_str, #method_name_str);

                // SAFETY: the engine only calls this for instances of the class, with arguments of the virtual's signature.
                unsafe {
                    ::gdbind::private::#ptrcall_fn::<#class_name, #params_ty, #ret_ty>(
                        &call_ctx,
                        instance_ptr,
                        args_ptr,
                        ret,
                        |instance, ( #( #params, )* )| <#class_name as #trait_path>::#method_name(instance, #( #params ),*),
                    );
                }
            }

            Some(virtual_fn)
        }
    }
}
