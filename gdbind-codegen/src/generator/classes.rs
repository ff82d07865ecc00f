/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::path::Path;

use proc_macro2::{Ident, Literal, TokenStream};
use quote::{format_ident, quote};

use crate::generator::signals::SignalSupport;
use crate::generator::{enums, functions_common, signals, virtual_traits};
use crate::models::domain::{Class, ExtensionApi};
use crate::util::{c_str_literal, ident, make_imports};
use crate::{conv, SubmitFn};

pub fn generate_class_files(api: &ExtensionApi, gen_path: &Path, submit_fn: &mut SubmitFn<'_>) {
    let signal_support = SignalSupport::find(api);

    for class in api.classes.iter() {
        let code = make_class(class, api, signal_support.as_ref());
        let out_path = gen_path.join(format!("{}.rs", class.mod_name));

        submit_fn(out_path, code);
    }

    let mod_code = make_module_file(api);
    submit_fn(gen_path.join("mod.rs"), mod_code);
}

// ----------------------------------------------------------------------------------------------------------------------------------------------

fn make_class(class: &Class, api: &ExtensionApi, signal_support: Option<&SignalSupport>) -> TokenStream {
    let class_name = class.name_ident();
    let class_name_str = &class.name;
    let class_name_cstr = c_str_literal(&class.name);
    let imports = make_imports();

    let base_ty = match &class.inherits {
        Some(parent) => {
            let parent = ident(parent);
            quote! { crate::classes::#parent }
        }
        None => quote! { crate::obj::NoBase },
    };

    let (memory, dyn_memory) = if class.is_root() {
        (quote! { MemManual }, quote! { MemDynamic })
    } else if class.is_refcounted {
        (quote! { MemRefCounted }, quote! { MemRefCounted })
    } else {
        (quote! { MemManual }, quote! { MemManual })
    };

    let constants = class.constants.iter().map(|c| {
        let name = ident(&c.name);
        let value = Literal::i64_unsuffixed(c.value);
        quote! { pub const #name: i64 = #value; }
    });

    let (methods, builders): (Vec<_>, Vec<_>) = class
        .methods
        .iter()
        .map(|method| functions_common::make_class_method(class, method))
        .unzip();

    let deref_impls = make_deref_impls(class);
    let inherits_impls = make_inherits_impls(class);
    let upcasts = make_upcast_accessors(class);
    let inherit_macro = make_inherit_macro(class);
    let default_impl = class.is_instantiable.then(|| {
        quote! { impl crate::obj::cap::GodotDefault for #class_name {} }
    });

    let signals = signals::make_signal_helpers(class, signal_support);
    let virtual_trait = virtual_traits::make_virtual_methods_trait(class, api);
    let enums = enums::make_enums(&class.enums);

    let doc = format!("Engine class `{class_name_str}`.");

    quote! {
        #imports

        #[doc = #doc]
        #[derive(Debug)]
        #[repr(C)]
        pub struct #class_name {
            object_ptr: sys::GDExtensionObjectPtr,
        }

        impl #class_name {
            #( #constants )*

            #( #methods )*

            #upcasts
        }

        #signals

        impl crate::obj::GodotClass for #class_name {
            type Base = #base_ty;
            const CLASS_NAME: &'static str = #class_name_str;

            fn class_name_c() -> &'static std::ffi::CStr {
                #class_name_cstr
            }
        }

        unsafe impl crate::obj::Bounds for #class_name {
            type Memory = crate::obj::bounds::#memory;
            type DynMemory = crate::obj::bounds::#dyn_memory;
            type Declarer = crate::obj::bounds::DeclEngine;
        }

        #( #inherits_impls )*
        #deref_impls
        #default_impl

        #inherit_macro
        #virtual_trait

        #( #builders )*
        #enums
    }
}

fn make_deref_impls(class: &Class) -> TokenStream {
    let Some(parent) = &class.inherits else {
        return TokenStream::new();
    };

    let class_name = class.name_ident();
    let parent = ident(parent);

    quote! {
        impl std::ops::Deref for #class_name {
            type Target = crate::classes::#parent;

            fn deref(&self) -> &Self::Target {
                // SAFETY: all engine class structs are `#[repr(C)]` wrappers around the same object pointer.
                unsafe { &*(self as *const Self as *const Self::Target) }
            }
        }

        impl std::ops::DerefMut for #class_name {
            fn deref_mut(&mut self) -> &mut Self::Target {
                // SAFETY: see `deref()`.
                unsafe { &mut *(self as *mut Self as *mut Self::Target) }
            }
        }
    }
}

fn make_inherits_impls(class: &Class) -> Vec<TokenStream> {
    let class_name = class.name_ident();

    class
        .all_bases
        .iter()
        .map(|base| {
            let base = ident(base);
            quote! {
                unsafe impl crate::obj::Inherits<crate::classes::#base> for #class_name {}
            }
        })
        .collect()
}

/// `as_node()` / `as_node_mut()` views for every ancestor.
fn make_upcast_accessors(class: &Class) -> TokenStream {
    let accessors = class.all_bases.iter().map(|base| {
        let snake = conv::to_snake_case(base);
        let as_ref = format_ident!("as_{}", snake);
        let as_mut = format_ident!("as_{}_mut", snake);
        let base = ident(base);
        let doc = format!("View of this object as its base class `{base}`.");

        quote! {
            #[doc = #doc]
            pub fn #as_ref(&self) -> &crate::classes::#base {
                // SAFETY: layout-compatible wrapper, see `Deref`.
                unsafe { &*(self as *const Self as *const crate::classes::#base) }
            }

            #[doc = #doc]
            pub fn #as_mut(&mut self) -> &mut crate::classes::#base {
                // SAFETY: layout-compatible wrapper, see `Deref`.
                unsafe { &mut *(self as *mut Self as *mut crate::classes::#base) }
            }
        }
    });

    quote! { #( #accessors )* }
}

/// Exported macro that implements `Inherits` for a host class deriving from this class, transitively.
fn make_inherit_macro(class: &Class) -> TokenStream {
    let macro_name = inherit_macro_ident(&class.name);
    let all = std::iter::once(&class.name).chain(class.all_bases.iter()).map(|c| ident(c));

    quote! {
        #[doc(hidden)]
        #[macro_export]
        macro_rules! #macro_name {
            ($Class:ty) => {
                #( unsafe impl ::gdbind::obj::Inherits<::gdbind::classes::#all> for $Class {} )*
            };
        }
    }
}

pub fn inherit_macro_ident(class_name: &str) -> Ident {
    format_ident!("inherit_from_{}__gdbind", class_name)
}

// ----------------------------------------------------------------------------------------------------------------------------------------------

fn make_module_file(api: &ExtensionApi) -> TokenStream {
    let decls = api.classes.iter().map(|class| {
        let module = ident(&class.mod_name);
        let class_name = class.name_ident();

        let virtual_trait = virtual_traits::has_virtual_trait(class, api).then(|| {
            let trait_name = virtual_traits::virtual_trait_ident(&class.name);
            quote! { , #trait_name }
        });

        quote! {
            pub mod #module;
            pub use #module::{#class_name #virtual_trait};
        }
    });

    let macro_names = api.classes.iter().map(|c| inherit_macro_ident(&c.name));

    quote! {
        #( #decls )*

        #[doc(hidden)]
        pub mod class_macros {
            pub use crate::*;
            #( pub use #macro_names; )*
        }
    }
}
