/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::ffi::CString;

use proc_macro2::{Ident, Literal, TokenStream};
use quote::{format_ident, quote};

pub fn ident(s: &str) -> Ident {
    format_ident!("{}", s)
}

/// Identifier that is safe to use even if `s` is a Rust keyword; keywords get a trailing underscore.
pub fn safe_ident(s: &str) -> Ident {
    // See also: https://doc.rust-lang.org/reference/keywords.html
    match s {
        // Lexer
        "as" | "break" | "const" | "continue" | "crate" | "else" | "enum" | "extern" | "false" | "fn" | "for" | "if"
        | "impl" | "in" | "let" | "loop" | "match" | "mod" | "move" | "mut" | "pub" | "ref" | "return" | "self"
        | "Self" | "static" | "struct" | "super" | "trait" | "true" | "type" | "unsafe" | "use" | "where"
        | "while"

        // Lexer 2018+
        | "async" | "await" | "dyn"

        // Reserved
        | "abstract" | "become" | "box" | "do" | "final" | "macro" | "override" | "priv" | "typeof" | "unsized"
        | "virtual" | "yield"

        // Reserved 2018+
        | "try" | "gen" => format_ident!("{}_", s),

        _ => ident(s),
    }
}

/// C string literal `c"..."` for a name that crosses the boundary.
pub fn c_str_literal(s: &str) -> Literal {
    let c_string = CString::new(s).unwrap_or_else(|_| panic!("name `{s}` contains a NUL byte"));
    Literal::c_string(&c_string)
}

/// Imports at the top of every generated class file.
pub fn make_imports() -> TokenStream {
    quote! {
        use crate::builtin::*;
        use crate::meta::{Signature, ToGodot};
        use crate::obj::{Gd, Inherits, ObjectArg};
        use crate::sys;
    }
}
