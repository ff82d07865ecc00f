/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use proc_macro2::TokenStream;
use quote::quote;

use crate::util::{bail, ident, remove_attributes, validate_self, KvParser};
use crate::ParseResult;

pub fn attribute_gdextension(item: venial::Item) -> ParseResult<TokenStream> {
    let mut impl_decl = match item {
        venial::Item::Impl(impl_) => impl_,
        _ => {
            return bail!(
                &item,
                "#[gdextension] can only be applied to trait impls of ExtensionLibrary",
            )
        }
    };

    validate_self(&impl_decl, "gdextension")?;
    if impl_decl.tk_unsafe.is_none() {
        return bail!(
            &impl_decl.tk_impl,
            "`impl ExtensionLibrary` must be marked unsafe, to confirm your understanding of the extension library's safety rules",
        );
    }

    let entry_point = match KvParser::parse(&impl_decl.attributes, "gdextension")? {
        Some(mut parser) => {
            let entry_point = parser.handle_ident("entry_point")?;
            parser.finish()?;
            entry_point
        }
        None => None,
    };
    let entry_point = entry_point.unwrap_or_else(|| ident("gdbind_init"));

    remove_attributes(&mut impl_decl.attributes, "gdextension");
    let impl_ty = &impl_decl.self_ty;

    Ok(quote! {
        #impl_decl

        #[no_mangle]
        unsafe extern "C" fn #entry_point(
            get_proc_address: ::gdbind::sys::GDExtensionInterfaceGetProcAddress,
            library: ::gdbind::sys::GDExtensionClassLibraryPtr,
            init: *mut ::gdbind::sys::GDExtensionInitialization,
        ) -> ::gdbind::sys::GDExtensionBool {
            // SAFETY: arguments are passed through unchanged from the engine.
            unsafe {
                ::gdbind::init::__gdbind_load_library::<#impl_ty>(
                    get_proc_address,
                    library,
                    init,
                )
            }
        }

        // Ensures the entry point has exactly the signature the engine expects.
        const _: ::gdbind::sys::GDExtensionInitializationFunction = Some(#entry_point);
    })
}
