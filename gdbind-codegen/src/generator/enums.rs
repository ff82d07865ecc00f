/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Engine enums and bitfields are newtypes over their ordinal, not Rust enums: the engine may pass values that are
//! not listed in the class database, and several enumerators may share one ordinal.

use std::collections::HashSet;

use proc_macro2::{Literal, TokenStream};
use quote::quote;

use crate::models::domain::{Enum, Enumerator};
use crate::util::{ident, safe_ident};

pub fn make_enums(enums: &[Enum]) -> TokenStream {
    let definitions = enums.iter().map(make_enum_definition);

    quote! {
        #( #definitions )*
    }
}

pub fn make_enum_definition(enum_: &Enum) -> TokenStream {
    if enum_.is_bitfield {
        make_bitfield(enum_)
    } else {
        make_enum(enum_)
    }
}

fn make_enum(enum_: &Enum) -> TokenStream {
    let name = ident(&enum_.name);
    let name_str = &enum_.name;

    let constants = enum_.enumerators.iter().map(|e| {
        let rust_name = safe_ident(&e.rust_name);
        let ord = Literal::i32_unsuffixed(e.value as i32);
        let alias = make_alias_doc(e);

        quote! {
            #alias
            pub const #rust_name: #name = #name { ord: #ord };
        }
    });

    // Only the first enumerator per ordinal; later ones would be unreachable patterns.
    let unique = unique_by_ord(enum_);
    let ords: Vec<Literal> = unique.iter().map(|(ord, ..)| Literal::i32_unsuffixed(*ord as i32)).collect();
    let godot_names = unique.iter().map(|(_, godot, _)| godot);
    let rust_names = unique.iter().map(|(.., rust)| rust);

    let valid_ords = if ords.is_empty() {
        TokenStream::new()
    } else {
        quote! { #( #ords )|* => Some(Self { ord }), }
    };

    quote! {
        #[repr(transparent)]
        #[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
        pub struct #name {
            ord: i32,
        }

        impl #name {
            #( #constants )*
        }

        impl std::fmt::Debug for #name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                let enumerator = match self.ord {
                    #( #ords => #rust_names, )*
                    _ => return f.debug_struct(#name_str).field("ord", &self.ord).finish(),
                };

                f.write_str(enumerator)
            }
        }

        impl crate::obj::EngineEnum for #name {
            fn try_from_ord(ord: i32) -> Option<Self> {
                match ord {
                    #valid_ords
                    _ => None,
                }
            }

            fn ord(self) -> i32 {
                self.ord
            }

            fn as_str(&self) -> &'static str {
                match self.ord {
                    #( #ords => #godot_names, )*
                    _ => "",
                }
            }
        }

        impl crate::meta::GodotConvert for #name {
            type Via = i64;
        }

        impl crate::meta::ToGodot for #name {
            fn to_godot(&self) -> i64 {
                i64::from(self.ord)
            }
        }

        impl crate::meta::FromGodot for #name {
            fn try_from_godot(via: i64) -> Result<Self, crate::meta::ConvertError> {
                i32::try_from(via)
                    .ok()
                    .and_then(<Self as crate::obj::EngineEnum>::try_from_ord)
                    .ok_or_else(|| {
                        crate::meta::ConvertError::with_kind_value(
                            crate::meta::ErrorKind::BadEnumOrdinal { enum_name: #name_str },
                            via,
                        )
                    })
            }
        }
    }
}

/// Aliases make the engine spelling searchable; rustdoc rejects an alias equal to the item name.
fn make_alias_doc(e: &Enumerator) -> TokenStream {
    if e.godot_name == e.rust_name {
        return TokenStream::new();
    }

    let godot_name = &e.godot_name;
    let doc = format!("Engine enumerator name: `{godot_name}`");
    quote! {
        #[doc(alias = #godot_name)]
        #[doc = #doc]
    }
}

fn make_bitfield(enum_: &Enum) -> TokenStream {
    let name = ident(&enum_.name);
    let name_str = &enum_.name;

    let constants = enum_.enumerators.iter().map(|e| {
        let rust_name = safe_ident(&e.rust_name);
        let ord = Literal::u64_unsuffixed(e.value as u64);
        let alias = make_alias_doc(e);

        quote! {
            #alias
            pub const #rust_name: #name = #name { ord: #ord };
        }
    });

    let flag_names = enum_.enumerators.iter().map(|e| &e.rust_name);
    let flag_consts = enum_.enumerators.iter().map(|e| safe_ident(&e.rust_name));

    quote! {
        #[repr(transparent)]
        #[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
        pub struct #name {
            ord: u64,
        }

        impl #name {
            #( #constants )*
        }

        impl std::fmt::Debug for #name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                let set_flags: Vec<&str> = [ #( (#flag_names, Self::#flag_consts) ),* ]
                    .into_iter()
                    .filter(|(_, flag)| flag.ord != 0 && self.ord & flag.ord == flag.ord)
                    .map(|(name, _)| name)
                    .collect();

                write!(f, "{}({})", #name_str, set_flags.join(" | "))
            }
        }

        impl crate::obj::EngineBitfield for #name {
            fn try_from_ord(ord: u64) -> Option<Self> {
                Some(Self { ord })
            }

            fn ord(self) -> u64 {
                self.ord
            }
        }

        impl std::ops::BitOr for #name {
            type Output = Self;

            fn bitor(self, rhs: Self) -> Self::Output {
                Self { ord: self.ord | rhs.ord }
            }
        }

        impl std::ops::BitOrAssign for #name {
            fn bitor_assign(&mut self, rhs: Self) {
                *self = *self | rhs;
            }
        }

        impl crate::meta::GodotConvert for #name {
            type Via = i64;
        }

        impl crate::meta::ToGodot for #name {
            fn to_godot(&self) -> i64 {
                self.ord as i64
            }
        }

        impl crate::meta::FromGodot for #name {
            fn try_from_godot(via: i64) -> Result<Self, crate::meta::ConvertError> {
                Ok(Self { ord: via as u64 })
            }
        }
    }
}

fn unique_by_ord(enum_: &Enum) -> Vec<(i64, &str, &str)> {
    let mut seen = HashSet::new();

    enum_
        .enumerators
        .iter()
        .filter(|e| seen.insert(e.value))
        .map(|e| (e.value, e.godot_name.as_str(), e.rust_name.as_str()))
        .collect()
}
