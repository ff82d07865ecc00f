/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use crate::generator::functions_common;
use crate::models::domain::{Class, ClassMethod, ExtensionApi};

/// Return types of `Object::connect` and `Object::emit_signal`, which the signal helpers forward to.
pub struct SignalSupport {
    connect_return: TokenStream,
    emit_return: TokenStream,
}

impl SignalSupport {
    /// `None` if the root class lacks `connect` or `emit_signal`; then no helpers are generated.
    pub fn find(api: &ExtensionApi) -> Option<Self> {
        let root = api.classes.iter().find(|c| c.is_root())?;
        let find = |name: &str| -> Option<&ClassMethod> {
            root.methods.iter().find(|m| m.rust_name == name && !m.is_static)
        };

        let required = |m: &ClassMethod| m.params.iter().filter(|p| p.default_value.is_none()).count();

        // connect(signal, callable, ...defaults) and emit_signal(signal, ...varargs).
        let connect = find("connect").filter(|m| !m.is_vararg && required(m) == 2)?;
        let emit = find("emit_signal").filter(|m| m.is_vararg && required(m) == 1)?;

        Some(Self {
            connect_return: functions_common::make_return(connect.return_ty.as_ref()).0,
            emit_return: functions_common::make_return(emit.return_ty.as_ref()).0,
        })
    }
}

/// Separate impl block with `connect_*` and `emit_*` helpers for each signal declared by `class`.
pub fn make_signal_helpers(class: &Class, support: Option<&SignalSupport>) -> TokenStream {
    let Some(support) = support else {
        return TokenStream::new();
    };

    if class.signals.is_empty() {
        return TokenStream::new();
    }

    let class_name = class.name_ident();
    let SignalSupport {
        connect_return,
        emit_return,
    } = support;

    let helpers = class.signals.iter().map(|signal| {
        let signal_name = &signal.name;
        let connect_fn = format_ident!("connect_{}", signal.name);
        let emit_fn = format_ident!("emit_{}", signal.name);

        let params = signal.params.iter().map(|p| {
            let name = &p.name;
            let decl = p.ty.param_decl();
            quote! { #name: #decl }
        });
        let variants = signal.params.iter().map(|p| p.ty.to_variant_expr(&p.name));

        let connect_doc = format!("Connects `callable` to the signal `{signal_name}`.");
        let emit_doc = format!("Emits the signal `{signal_name}`.");

        quote! {
            #[doc = #connect_doc]
            pub fn #connect_fn(&mut self, callable: &Callable) #connect_return {
                self.connect(#signal_name, callable)
            }

            #[doc = #emit_doc]
            pub fn #emit_fn(&mut self, #( #params ),*) #emit_return {
                self.emit_signal(#signal_name, &[ #( #variants ),* ])
            }
        }
    });

    quote! {
        /// Signals.
        impl #class_name {
            #( #helpers )*
        }
    }
}
