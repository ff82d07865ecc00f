/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Procedural macros of gdbind. Use them through the `gdbind` crate, which re-exports them.

mod class;
mod gdextension;
mod util;

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;

use crate::util::ident;

// Below intra-doc link to the trait only works as HTML, not as symbol link.
/// Derive macro for [`GodotClass`](../obj/trait.GodotClass.html) on structs.
///
/// You must use this macro; manual implementations of the `GodotClass` trait are not supported.
///
/// # Construction
///
/// To generate a constructor that the engine can call, add `#[class(init)]`. Every field is then initialized with
/// its `Default` value, or with the expression given in `#[init(val = ...)]`:
///
/// ```no_run
/// # use gdbind::prelude::*;
/// #[derive(GodotClass)]
/// #[class(init, base = Node)]
/// struct MyNode {
///     #[init(val = 100)]
///     hitpoints: i64,
///     name: GString,
///
///     base: Base<Node>,
/// }
/// ```
///
/// Alternatively, implement `init()` in the `#[godot_api]` block of the class's `I*` trait. Both at once are an error.
/// Classes without any constructor can still be instantiated from Rust, by handing an existing object to them.
///
/// # Inheritance
///
/// `#[class(base = Class)]` selects the engine class to inherit from. Without it, the base is `RefCounted`.
///
/// Inheriting from another host class is not supported; the base must always be an engine class.
///
/// A field of type `Base<T>` gives access to the engine part of the object. `T` must match the class in
/// `#[class(base = ...)]`. The field is detected by its type name; it does not need to be called `base`.
///
/// ```no_run
/// # use gdbind::prelude::*;
/// #[derive(GodotClass)]
/// #[class(init, base = Node2D)]
/// struct Player {
///     speed: f64,
///     base: Base<Node2D>,
/// }
///
/// impl Player {
///     fn teleport(&mut self, x: f32) {
///         let pos = Vector2::new(x, 0.0);
///         self.base_mut().set_position(pos);
///     }
/// }
/// ```
#[proc_macro_derive(GodotClass, attributes(class, init, base))]
pub fn derive_godot_class(input: TokenStream) -> TokenStream {
    translate(input, class::derive_godot_class)
}

/// Proc-macro attribute to be used with `impl` blocks of `I*` traits.
///
/// Each method inside the block overrides the engine virtual method of the same name, prefixed with `_`. The engine
/// only calls the methods that are implemented here; all others fall through to the engine's own behavior.
///
/// ```no_run
/// # use gdbind::prelude::*;
/// #[derive(GodotClass)]
/// #[class(base = Node)]
/// struct Ticker {
///     ticks: u64,
///     base: Base<Node>,
/// }
///
/// #[godot_api]
/// impl INode for Ticker {
///     fn init(base: Base<Node>) -> Self {
///         Self { ticks: 0, base }
///     }
///
///     fn process(&mut self, _delta: f64) {
///         self.ticks += 1;
///     }
/// }
/// ```
///
/// Methods keep the receiver of the trait declaration: `&self` for const engine methods, `&mut self` otherwise.
/// While a `&mut self` override runs, the object is exclusively bound; re-entrant calls into the same object fail
/// with a panic that is reported to the engine.
#[proc_macro_attribute]
pub fn godot_api(meta: TokenStream, input: TokenStream) -> TokenStream {
    translate_meta("godot_api", meta, input, class::attribute_godot_api)
}

/// Proc-macro attribute to be used in combination with the `ExtensionLibrary` trait.
///
/// Emits the C entry point that the engine looks up when loading the library. Its name is `gdbind_init` by default;
/// it can be changed with `#[gdextension(entry_point = my_name)]`.
///
/// ```no_run
/// # use gdbind::init::*;
/// # use gdbind::prelude::*;
/// struct MyExtension;
///
/// #[gdextension(entry_point = my_extension_init)]
/// unsafe impl ExtensionLibrary for MyExtension {}
/// ```
#[proc_macro_attribute]
pub fn gdextension(meta: TokenStream, input: TokenStream) -> TokenStream {
    translate_meta("gdextension", meta, input, gdextension::attribute_gdextension)
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Implementation

type ParseResult<T> = Result<T, venial::Error>;

fn translate<F>(input: TokenStream, transform: F) -> TokenStream
where
    F: FnOnce(venial::Item) -> ParseResult<TokenStream2>,
{
    let input2 = TokenStream2::from(input);

    let result2 = venial::parse_item(input2)
        .and_then(transform)
        .unwrap_or_else(|e| e.to_compile_error());

    TokenStream::from(result2)
}

fn translate_meta<F>(
    self_name: &str,
    meta: TokenStream,
    input: TokenStream,
    transform: F,
) -> TokenStream
where
    F: FnOnce(venial::Item) -> ParseResult<TokenStream2>,
{
    let self_name = ident(self_name);
    let input2 = TokenStream2::from(input);
    let meta2 = TokenStream2::from(meta);

    // venial cannot parse the meta of an attribute on its own, so it is re-attached to the item.
    let input = quote! {
        #[#self_name(#meta2)]
        #input2
    };

    let result2 = venial::parse_item(input)
        .and_then(transform)
        .unwrap_or_else(|e| e.to_compile_error());

    TokenStream::from(result2)
}
