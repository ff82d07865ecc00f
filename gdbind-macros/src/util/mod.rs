/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

// Note: some code duplication with codegen crate

mod kv_parser;

use std::ffi::CString;

use proc_macro2::{Group, Ident, Literal, TokenStream, TokenTree};
use quote::spanned::Spanned;
use quote::format_ident;

use crate::ParseResult;

pub(crate) use kv_parser::KvParser;

pub fn ident(s: &str) -> Ident {
    format_ident!("{}", s)
}

/// Like [`ident`], but escapes keywords as raw identifiers.
pub fn safe_ident(s: &str) -> Ident {
    match s {
        "type" | "fn" | "match" | "loop" | "in" | "impl" | "mod" | "use" | "ref" | "move" | "where" => {
            format_ident!("r#{}", s)
        }
        _ => ident(s),
    }
}

pub fn c_str(s: &str) -> Literal {
    let c_string = CString::new(s).unwrap_or_else(|_| panic!("name `{s}` contains a NUL byte"));
    Literal::c_string(&c_string)
}

/// Returns `Err(venial::Error)` spanning `$tokens`, with a formatted message.
macro_rules! bail {
    ($tokens:expr, $format_string:literal $($rest:tt)*) => {
        $crate::util::bail_fn(format!($format_string $($rest)*), $tokens)
    }
}

/// Creates a `venial::Error` spanning `$tokens`, with a formatted message.
macro_rules! error {
    ($tokens:expr, $format_string:literal $($rest:tt)*) => {
        $crate::util::error_fn(format!($format_string $($rest)*), $tokens)
    }
}

pub(crate) use bail;
pub(crate) use error;

pub fn bail_fn<R, T>(msg: impl AsRef<str>, tokens: T) -> ParseResult<R>
where
    T: Spanned,
{
    Err(error_fn(msg, tokens))
}

pub fn error_fn<T>(msg: impl AsRef<str>, tokens: T) -> venial::Error
where
    T: Spanned,
{
    venial::Error::new_at_span(tokens.__span(), msg.as_ref())
}

pub(crate) fn is_punct(tt: &TokenTree, c: char) -> bool {
    match tt {
        TokenTree::Punct(punct) => punct.as_char() == c,
        _ => false,
    }
}

pub(crate) fn path_is_single(path: &[TokenTree], expected: &str) -> bool {
    path.len() == 1 && path[0].to_string() == expected
}

/// Removes all attributes `#[name]` / `#[name(...)]`, e.g. the one re-attached by `translate_meta()`.
pub(crate) fn remove_attributes(attributes: &mut Vec<venial::Attribute>, name: &str) {
    attributes.retain(|attr| !path_is_single(&attr.path, name));
}

/// Replaces every `Self` in `tokens` (also inside groups) with the class name.
pub(crate) fn map_self_to_class_name<In, Out>(tokens: In, class_name: &Ident) -> Out
where
    In: IntoIterator<Item = TokenTree>,
    Out: FromIterator<TokenTree>,
{
    tokens
        .into_iter()
        .map(|tt| match tt {
            TokenTree::Ident(ident) if ident == "Self" => TokenTree::Ident(class_name.clone()),
            TokenTree::Group(group) => {
                let stream: TokenStream = map_self_to_class_name(group.stream(), class_name);
                let mut mapped = Group::new(group.delimiter(), stream);
                mapped.set_span(group.span());
                TokenTree::Group(mapped)
            }
            tt => tt,
        })
        .collect()
}

/// Whether the type is `Base<...>`, possibly qualified (`gdbind::obj::Base<...>`).
pub(crate) fn is_base_type(ty: &venial::TypeExpr) -> bool {
    extract_typename(ty).is_some_and(|segment| segment.ident == "Base" && segment.generic_args.is_some())
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Validation for trait/impl

/// Validates that the declaration is of the form `impl ITrait for SomeType`, where the trait name is `I` followed by
/// an engine class name.
///
/// Returns the class name and the trait path as written by the user.
pub(crate) fn validate_trait_impl_virtual(
    original_impl: &venial::Impl,
    attr: &str,
) -> ParseResult<(Ident, venial::TypeExpr)> {
    let Some(trait_path) = original_impl.trait_ty.as_ref() else {
        return bail!(
            original_impl,
            "#[{attr}] requires a trait impl, e.g. `impl INode for MyClass`"
        );
    };

    let is_virtual_trait = extract_typename(trait_path).is_some_and(|segment| {
        let name = segment.ident.to_string();
        let mut chars = name.chars();
        chars.next() == Some('I') && chars.next().is_some_and(|c| c.is_ascii_uppercase())
    });

    if !is_virtual_trait {
        return bail!(
            trait_path,
            "#[{attr}] requires a virtual method trait (trait name should be `I` followed by the class, e.g. `INode`)"
        );
    }

    let class_name = validate_self(original_impl, attr)?;
    Ok((class_name, trait_path.clone()))
}

pub(crate) fn validate_self(original_impl: &venial::Impl, attr: &str) -> ParseResult<Ident> {
    if let Some(segment) = extract_typename(&original_impl.self_ty) {
        if segment.generic_args.is_none() {
            Ok(segment.ident)
        } else {
            bail!(
                original_impl,
                "#[{attr}] does currently not support generic arguments",
            )
        }
    } else {
        bail!(
            original_impl,
            "#[{attr}] requires Self type to be a simple path",
        )
    }
}

/// Gets the right-most type name in the path.
pub(crate) fn extract_typename(ty: &venial::TypeExpr) -> Option<venial::PathSegment> {
    match ty.as_path() {
        Some(mut path) => path.segments.pop(),
        _ => None,
    }
}
