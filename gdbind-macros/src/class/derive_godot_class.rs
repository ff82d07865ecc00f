/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};

use crate::class::{named_fields, Field, Fields};
use crate::util::{bail, ident, path_is_single, KvParser};
use crate::{util, ParseResult};

pub fn derive_godot_class(item: venial::Item) -> ParseResult<TokenStream> {
    let class = match &item {
        venial::Item::Struct(class) => class,
        _ => return bail!(&item, "#[derive(GodotClass)] can only be applied on structs"),
    };

    if class.generic_params.is_some() {
        return bail!(
            &class.name,
            "#[derive(GodotClass)] does not support generic classes"
        );
    }

    let struct_cfg = parse_struct_attributes(class)?;
    let fields = parse_fields(class)?;

    let class_name = &class.name;
    let class_name_str = class_name.to_string();
    let class_name_cstr = util::c_str(&class_name_str);

    let base_ty = &struct_cfg.base_ty;
    let base_class = quote! { ::gdbind::classes::#base_ty };
    let inherits_macro = format_ident!("inherit_from_{}__gdbind", base_ty);

    let prv = quote! { ::gdbind::private };

    let godot_withbase_impl = match &fields.base_field {
        Some(Field { name, .. }) => quote! {
            impl ::gdbind::obj::WithBaseField for #class_name {
                fn base_field(&self) -> &::gdbind::obj::Base<<Self as ::gdbind::obj::GodotClass>::Base> {
                    &self.#name
                }

                fn base_field_mut(&mut self) -> &mut ::gdbind::obj::Base<<Self as ::gdbind::obj::GodotClass>::Base> {
                    &mut self.#name
                }
            }
        },
        None => TokenStream::new(),
    };

    let (godot_init_impl, struct_item) = if struct_cfg.has_generated_init {
        (
            make_godot_init_impl(class_name, &fields),
            quote! { #prv::PluginItem::new_struct_with_init::<#class_name> },
        )
    } else {
        (
            TokenStream::new(),
            quote! { #prv::PluginItem::new_struct::<#class_name> },
        )
    };

    Ok(quote! {
        impl ::gdbind::obj::GodotClass for #class_name {
            type Base = #base_class;
            const CLASS_NAME: &'static str = #class_name_str;

            fn class_name_c() -> &'static ::std::ffi::CStr {
                #class_name_cstr
            }
        }

        unsafe impl ::gdbind::obj::Bounds for #class_name {
            type Memory = <#base_class as ::gdbind::obj::Bounds>::Memory;
            type DynMemory = <#base_class as ::gdbind::obj::Bounds>::DynMemory;
            type Declarer = ::gdbind::obj::bounds::DeclUser;
        }

        #godot_init_impl
        #godot_withbase_impl

        ::gdbind::sys::plugin_add!(__GDBIND_PLUGIN_REGISTRY in #prv; #prv::ClassPlugin::new::<#class_name>(
            #struct_item(<#base_class as ::gdbind::obj::GodotClass>::CLASS_NAME)
        ));

        #prv::class_macros::#inherits_macro!(#class_name);
    })
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// General helpers

struct ClassAttributes {
    base_ty: Ident,
    has_generated_init: bool,
}

fn make_godot_init_impl(class_name: &Ident, fields: &Fields) -> TokenStream {
    let base_init = match &fields.base_field {
        Some(Field { name, .. }) => quote! { #name: base, },
        None => quote! {},
    };

    let rest_init = fields.all_fields.iter().map(|field| {
        let field_name = &field.name;
        let value_expr = field.init_expr();
        quote! { #field_name: #value_expr, }
    });

    // A class without base field drops the handle; the engine object is still reachable through `Gd`.
    quote! {
        impl ::gdbind::obj::cap::GodotDefault for #class_name {
            #[allow(unused_variables)]
            fn __godot_user_init(base: ::gdbind::obj::Base<<#class_name as ::gdbind::obj::GodotClass>::Base>) -> Self {
                Self {
                    #( #rest_init )*
                    #base_init
                }
            }
        }
    }
}

/// Returns the name of the base and the default mode.
fn parse_struct_attributes(class: &venial::Struct) -> ParseResult<ClassAttributes> {
    let mut base_ty = ident("RefCounted");
    let mut has_generated_init = false;

    // #[class] attribute on struct
    if let Some(mut parser) = KvParser::parse(&class.attributes, "class")? {
        if let Some(base) = parser.handle_ident("base")? {
            base_ty = base;
        }

        if parser.handle_alone("init")? {
            has_generated_init = true;
        }

        parser.finish()?;
    }

    Ok(ClassAttributes {
        base_ty,
        has_generated_init,
    })
}

/// Returns field names and one base field, if available.
fn parse_fields(class: &venial::Struct) -> ParseResult<Fields> {
    let mut all_fields = vec![];
    let mut base_field = Option::<Field>::None;

    for named_field in named_fields(class)? {
        let mut field = Field::new(&named_field);

        // #[base] or a `Base<T>` type
        let is_base = named_field
            .attributes
            .iter()
            .any(|attr| path_is_single(&attr.path, "base"))
            || util::is_base_type(&named_field.ty);

        // #[init]
        if let Some(mut parser) = KvParser::parse(&named_field.attributes, "init")? {
            match parser.handle_expr("val")? {
                Some(default) => field.default_val = Some(default),
                None => {
                    return bail!(
                        parser.span(),
                        "#[init] requires a value, e.g. `#[init(val = 42)]`"
                    )
                }
            }

            parser.finish()?;
        }

        if is_base {
            if let Some(prev_base) = base_field.as_ref() {
                return bail!(
                    &named_field.name,
                    "at most one `Base<T>` field allowed; `{}` is already the base field",
                    prev_base.name
                );
            }

            if field.default_val.is_some() {
                return bail!(
                    &named_field.name,
                    "the base field is initialized by the engine and cannot have #[init]"
                );
            }

            base_field = Some(field);
        } else {
            all_fields.push(field);
        }
    }

    Ok(Fields {
        all_fields,
        base_field,
    })
}
