/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Mapping of class database types to Rust types, and of default values to Rust expressions.

use std::sync::OnceLock;

use proc_macro2::{Ident, TokenStream};
use quote::{quote, ToTokens};
use regex::Regex;

use crate::context::Context;
use crate::util::ident;

/// How a value occupies a call frame slot. Mirrors `sys::ArgKind`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum NativeKind {
    Primitive(&'static str),
    Builtin(&'static str),
    PackedArray(&'static str),
    Object,
    Variant,
    Pointer,
}

impl ToTokens for NativeKind {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let kind = match self {
            Self::Primitive(ty) => {
                let ty = ident(ty);
                quote! { sys::ArgKind::Primitive(sys::VariantType::#ty) }
            }
            Self::Builtin(ty) => {
                let ty = ident(ty);
                quote! { sys::ArgKind::Builtin(sys::VariantType::#ty) }
            }
            Self::PackedArray(ty) => {
                let ty = ident(ty);
                quote! { sys::ArgKind::PackedArray(sys::VariantType::#ty) }
            }
            Self::Object => quote! { sys::ArgKind::Object },
            Self::Variant => quote! { sys::ArgKind::Variant },
            Self::Pointer => quote! { sys::ArgKind::Pointer },
        };

        kind.to_tokens(tokens);
    }
}

/// A type from the class database, resolved to its Rust representation.
#[derive(Clone, Debug)]
pub enum RustTy {
    /// Passed and returned by value: `bool`, numbers, vectors, `Color`.
    Value { ty: TokenStream, variant_type: &'static str },

    /// `String` in the engine. Parameters accept anything convertible into a `GString`.
    GString,

    /// Engine-managed value passed by reference: `Array`, `Dictionary`, `Callable`, packed arrays, `Variant`.
    Managed { ty: TokenStream, kind: NativeKind },

    /// Engine enum or bitfield, e.g. `crate::classes::node::ProcessMode`.
    EngineEnum { path: TokenStream, is_bitfield: bool },

    /// Engine class, e.g. `Node`.
    EngineClass { class: Ident },

    /// Raw native pointer for in/out parameters, e.g. `float*`.
    RawPointer { pointee: TokenStream, is_const: bool },
}

impl RustTy {
    pub fn native_kind(&self) -> NativeKind {
        match self {
            Self::Value { variant_type, .. } => NativeKind::Primitive(*variant_type),
            Self::GString => NativeKind::Builtin("String"),
            Self::Managed { kind, .. } => *kind,
            Self::EngineEnum { .. } => NativeKind::Primitive("Int"),
            Self::EngineClass { .. } => NativeKind::Object,
            Self::RawPointer { .. } => NativeKind::Pointer,
        }
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self, Self::RawPointer { .. })
    }

    /// Type of a parameter in a generated method.
    pub fn param_decl(&self) -> TokenStream {
        match self {
            Self::Value { ty, .. } => ty.clone(),
            Self::GString => quote! { impl Into<GString> },
            Self::Managed { ty, .. } => quote! { &#ty },
            Self::EngineEnum { path, .. } => path.clone(),
            Self::EngineClass { class } => quote! { &Gd<impl Inherits<crate::classes::#class>> },
            Self::RawPointer { .. } => self.pointer_ty(),
        }
    }

    /// Expression turning the parameter `name` into the value that goes into the parameter tuple.
    pub fn call_arg(&self, name: &Ident) -> TokenStream {
        match self {
            Self::GString => quote! { #name.into() },
            Self::EngineClass { .. } => quote! { ObjectArg::from_gd(#name) },
            _ => quote! { #name },
        }
    }

    /// Element type of the parameter tuple in `Signature<Params, Ret>`, matching [`Self::call_arg`].
    pub fn call_sig_ty(&self) -> TokenStream {
        match self {
            Self::EngineClass { class } => quote! { ObjectArg<crate::classes::#class> },
            _ => self.param_decl_owned_or_ref(),
        }
    }

    /// Owned Rust type. Used for return values, builder fields and virtual method parameters.
    pub fn owned_ty(&self) -> TokenStream {
        match self {
            Self::Value { ty, .. } => ty.clone(),
            Self::GString => quote! { GString },
            Self::Managed { ty, .. } => ty.clone(),
            Self::EngineEnum { path, .. } => path.clone(),
            Self::EngineClass { class } => quote! { Option<Gd<crate::classes::#class>> },
            Self::RawPointer { .. } => self.pointer_ty(),
        }
    }

    /// Expression converting the parameter `name` (declared with [`Self::param_decl`]) into a `Variant`.
    pub fn to_variant_expr(&self, name: &Ident) -> TokenStream {
        match self {
            Self::GString => quote! { { let #name: GString = #name.into(); #name.to_variant() } },
            _ => quote! { #name.to_variant() },
        }
    }

    /// Expression converting the parameter `name` (declared with [`Self::param_decl`]) into [`Self::owned_ty`].
    pub fn to_owned_expr(&self, name: &Ident) -> TokenStream {
        match self {
            Self::GString => quote! { #name.into() },
            Self::Managed { .. } => quote! { #name.clone() },
            _ => quote! { #name },
        }
    }

    /// Like [`Self::call_sig_ty`], with references bound to `lifetime`.
    pub fn call_sig_ty_with_lifetime(&self, lifetime: &TokenStream) -> TokenStream {
        match self {
            Self::Managed { ty, .. } => quote! { &#lifetime #ty },
            _ => self.call_sig_ty(),
        }
    }

    /// Like [`Self::param_decl`], with references tied to `lifetime`.
    pub fn param_decl_with_lifetime(&self, lifetime: &TokenStream) -> TokenStream {
        match self {
            Self::Managed { ty, .. } => quote! { &#lifetime #ty },
            Self::EngineClass { class } => quote! { &#lifetime Gd<impl Inherits<crate::classes::#class>> },
            _ => self.param_decl(),
        }
    }

    /// Expression passing an owned value `expr` where [`Self::call_sig_ty`] is expected.
    pub fn owned_to_call_arg(&self, expr: &TokenStream) -> TokenStream {
        match self {
            Self::Managed { .. } => quote! { &#expr },
            _ => expr.clone(),
        }
    }

    fn param_decl_owned_or_ref(&self) -> TokenStream {
        match self {
            Self::GString => quote! { GString },
            _ => self.param_decl(),
        }
    }

    fn pointer_ty(&self) -> TokenStream {
        match self {
            Self::RawPointer { pointee, is_const: true } => quote! { *const #pointee },
            Self::RawPointer { pointee, is_const: false } => quote! { *mut #pointee },
            _ => unreachable!("not a pointer type"),
        }
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Type mapping

/// Resolves a type of the class database. `None` if the type is unknown.
pub fn to_rust_type(ty: &str, meta: Option<&str>, ctx: &Context) -> Option<RustTy> {
    if let Some(pointee) = ty.strip_suffix('*') {
        return to_pointer_type(pointee.trim());
    }

    if let Some(enum_name) = ty.strip_prefix("enum::") {
        return to_enum_type(enum_name, false, ctx);
    }

    if let Some(enum_name) = ty.strip_prefix("bitfield::") {
        return to_enum_type(enum_name, true, ctx);
    }

    let value = |ty: TokenStream, variant_type| Some(RustTy::Value { ty, variant_type });
    let managed = |ty: TokenStream, kind| Some(RustTy::Managed { ty, kind });

    match ty {
        "bool" => value(quote! { bool }, "Bool"),
        "int" => value(to_int_type(meta)?, "Int"),
        "float" => value(to_float_type(meta)?, "Float"),
        "Vector2" => value(quote! { Vector2 }, "Vector2"),
        "Vector3" => value(quote! { Vector3 }, "Vector3"),
        "Color" => value(quote! { Color }, "Color"),
        "String" => Some(RustTy::GString),
        "Callable" => managed(quote! { Callable }, NativeKind::Builtin("Callable")),
        "Array" => managed(quote! { Array }, NativeKind::Builtin("Array")),
        "Dictionary" => managed(quote! { Dictionary }, NativeKind::Builtin("Dictionary")),
        "Variant" => managed(quote! { Variant }, NativeKind::Variant),
        "PackedByteArray" | "PackedInt32Array" | "PackedInt64Array" | "PackedFloat32Array" | "PackedFloat64Array"
        | "PackedStringArray" | "PackedVector2Array" => {
            let (ty, variant_type) = packed_array_names(ty)?;
            let ty = ident(ty);
            managed(quote! { #ty }, NativeKind::PackedArray(variant_type))
        }
        class if ctx.is_class(class) => Some(RustTy::EngineClass { class: ident(class) }),
        _ => None,
    }
}

fn to_int_type(meta: Option<&str>) -> Option<TokenStream> {
    let ty = match meta {
        None | Some("int64") => quote! { i64 },
        Some("int8") => quote! { i8 },
        Some("int16") => quote! { i16 },
        Some("int32") => quote! { i32 },
        Some("uint8") => quote! { u8 },
        Some("uint16") => quote! { u16 },
        Some("uint32") => quote! { u32 },
        Some("uint64") => quote! { u64 },
        Some(_) => return None,
    };

    Some(ty)
}

fn to_float_type(meta: Option<&str>) -> Option<TokenStream> {
    match meta {
        None | Some("double") => Some(quote! { f64 }),
        Some("float") => Some(quote! { f32 }),
        Some(_) => None,
    }
}

fn to_pointer_type(pointee: &str) -> Option<RustTy> {
    let (is_const, pointee) = match pointee.strip_prefix("const ") {
        Some(rest) => (true, rest.trim()),
        None => (false, pointee),
    };

    let pointee = match pointee {
        "float" => quote! { f32 },
        "double" => quote! { f64 },
        "int32_t" => quote! { i32 },
        "int" | "int64_t" => quote! { i64 },
        "uint8_t" => quote! { u8 },
        _ => return None,
    };

    Some(RustTy::RawPointer { pointee, is_const })
}

fn to_enum_type(qualified_name: &str, is_bitfield: bool, ctx: &Context) -> Option<RustTy> {
    let path = match qualified_name.split_once('.') {
        Some((class_name, enum_name)) => {
            let mod_name = ident(&ctx.find_enum(Some(class_name), enum_name, is_bitfield)?);
            let enum_ident = ident(enum_name);
            quote! { crate::classes::#mod_name::#enum_ident }
        }
        None => {
            ctx.find_enum(None, qualified_name, is_bitfield)?;
            let enum_ident = ident(qualified_name);
            quote! { crate::global::#enum_ident }
        }
    };

    Some(RustTy::EngineEnum { path, is_bitfield })
}

/// Rust alias and variant type of a packed array.
fn packed_array_names(ty: &str) -> Option<(&'static str, &'static str)> {
    let names = match ty {
        "PackedByteArray" => ("PackedByteArray", "PackedByteArray"),
        "PackedInt32Array" => ("PackedInt32Array", "PackedInt32Array"),
        "PackedInt64Array" => ("PackedInt64Array", "PackedInt64Array"),
        "PackedFloat32Array" => ("PackedFloat32Array", "PackedFloat32Array"),
        "PackedFloat64Array" => ("PackedFloat64Array", "PackedFloat64Array"),
        "PackedStringArray" => ("PackedStringArray", "PackedStringArray"),
        "PackedVector2Array" => ("PackedVector2Array", "PackedVector2Array"),
        _ => return None,
    };

    Some(names)
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Default values

/// Rust expression of type [`RustTy::owned_ty`] for a default value of the class database. `None` if unparseable.
pub fn to_rust_expr(default_value: &str, ty: &RustTy) -> Option<TokenStream> {
    let expr = match ty {
        RustTy::Value { ty: rust_ty, variant_type } => match *variant_type {
            "Bool" => match default_value {
                "true" => quote! { true },
                "false" => quote! { false },
                _ => return None,
            },
            "Int" => {
                let value: i64 = default_value.parse().ok()?;
                let lit = proc_macro2::Literal::i64_unsuffixed(value);
                quote! { #lit as #rust_ty }
            }
            "Float" => {
                let value: f64 = default_value.parse().ok()?;
                let lit = proc_macro2::Literal::f64_unsuffixed(value);
                quote! { #lit as #rust_ty }
            }
            "Vector2" => {
                let [x, y] = parse_ctor_args::<2>("Vector2", default_value)?;
                quote! { Vector2::new(#x, #y) }
            }
            "Vector3" => {
                let [x, y, z] = parse_ctor_args::<3>("Vector3", default_value)?;
                quote! { Vector3::new(#x, #y, #z) }
            }
            "Color" => {
                let [r, g, b, a] = parse_ctor_args::<4>("Color", default_value)?;
                quote! { Color::from_rgba(#r, #g, #b, #a) }
            }
            _ => return None,
        },
        RustTy::GString => {
            let inner = default_value.strip_prefix('"')?.strip_suffix('"')?;
            quote! { GString::from(#inner) }
        }
        RustTy::Managed { ty: rust_ty, kind } => match (kind, default_value) {
            (NativeKind::Builtin("Array"), "[]") => quote! { Array::new() },
            (NativeKind::Builtin("Dictionary"), "{}") => quote! { Dictionary::new() },
            (NativeKind::Variant, "null") => quote! { Variant::nil() },
            (NativeKind::PackedArray(_), value) if value.ends_with("()") => quote! { #rust_ty::new() },
            _ => return None,
        },
        RustTy::EngineEnum { path, is_bitfield } => {
            let value: i64 = default_value.parse().ok()?;
            if *is_bitfield {
                let lit = proc_macro2::Literal::u64_unsuffixed(value as u64);
                quote! { <#path as crate::obj::EngineBitfield>::from_ord(#lit) }
            } else {
                let lit = proc_macro2::Literal::i32_unsuffixed(i32::try_from(value).ok()?);
                quote! { <#path as crate::obj::EngineEnum>::from_ord(#lit) }
            }
        }
        RustTy::EngineClass { .. } | RustTy::RawPointer { .. } => return None,
    };

    Some(expr)
}

/// Parses `Name(a, b, ...)` into `N` float literals.
fn parse_ctor_args<const N: usize>(ctor_name: &str, value: &str) -> Option<[proc_macro2::Literal; N]> {
    static CTOR: OnceLock<Regex> = OnceLock::new();
    let regex = CTOR.get_or_init(|| {
        Regex::new(r"^(?<name>[A-Za-z0-9]+)\((?<args>[^()]*)\)$").unwrap_or_else(|e| panic!("invalid regex: {e}"))
    });

    let captures = regex.captures(value)?;
    if &captures["name"] != ctor_name {
        return None;
    }

    let parsed: Vec<proc_macro2::Literal> = captures["args"]
        .split(',')
        .map(|arg| arg.trim().parse::<f32>().ok().map(proc_macro2::Literal::f32_suffixed))
        .collect::<Option<_>>()?;

    parsed.try_into().ok()
}
