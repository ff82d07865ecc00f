/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::collections::HashMap;

use proc_macro2::{Ident, Span, TokenStream, TokenTree};

use super::{bail, error, ident, is_punct, path_is_single};
use crate::ParseResult;

pub(crate) type KvMap = HashMap<Ident, Option<KvValue>>;

/// Struct to parse attributes like `#[attr(key, key2 = value, key3 = 123)]` in a very user-friendly way.
pub(crate) struct KvParser {
    map: KvMap,
    span: Span,
}

impl KvParser {
    /// Create a new parser which checks for presence of an `#[expected]` attribute.
    ///
    /// Returns `Ok(None)` if the attribute is not present.
    pub fn parse(attributes: &[venial::Attribute], expected: &str) -> ParseResult<Option<Self>> {
        let mut found_attr: Option<Self> = None;

        for attr in attributes.iter() {
            let path = &attr.path;
            if path_is_single(path, expected) {
                if found_attr.is_some() {
                    return bail!(attr, "only a single #[{expected}] attribute allowed");
                }

                let attr_name = expected.to_string();
                found_attr = Some(Self {
                    span: attr.tk_brackets.span,
                    map: ParserState::parse(attr_name, &attr.value)?,
                });
            }
        }

        Ok(found_attr)
    }

    pub fn span(&self) -> Span {
        self.span
    }

    /// - For missing keys, returns `None`.
    /// - For a key with no value, returns `Some(None)`.
    /// - For a key with a value, returns `Some(value)`.
    pub fn handle_any(&mut self, key: &str) -> Option<Option<KvValue>> {
        self.map.remove(&ident(key))
    }

    /// Handles a key that can only occur without a value, e.g. `#[attr(toggle)]`. Returns whether
    /// the key is present.
    pub fn handle_alone(&mut self, key: &str) -> ParseResult<bool> {
        match self.handle_any(key) {
            None => Ok(false),
            Some(None) => Ok(true),
            Some(Some(value)) => bail!(&value.tokens[0], "key `{key}` should not have a value"),
        }
    }

    /// Handles an optional key that can only occur with an identifier as the value.
    pub fn handle_ident(&mut self, key: &str) -> ParseResult<Option<Ident>> {
        match self.map.remove_entry(&ident(key)) {
            None => Ok(None),
            // The `key` that was removed from the map has the correct span.
            Some((key, value)) => match value {
                None => bail!(key, "expected `{key}` to be followed by `= identifier`"),
                Some(value) => Ok(Some(value.ident()?)),
            },
        }
    }

    /// Handles an optional key that can occur with arbitrary tokens as the value.
    pub fn handle_expr(&mut self, key: &str) -> ParseResult<Option<TokenStream>> {
        match self.map.remove_entry(&ident(key)) {
            None => Ok(None),
            Some((key, value)) => match value {
                None => bail!(key, "expected `{key}` to be followed by `= expression`"),
                Some(value) => Ok(Some(value.expr())),
            },
        }
    }

    /// Explicit "pre-destructor" that must be called, and checks that all map entries have been
    /// consumed.
    pub fn finish(self) -> ParseResult<()> {
        let mut errors = self
            .map
            .keys()
            .map(|ident| error!(ident, "unrecognized key `{ident}`"));

        match errors.next() {
            None => Ok(()),
            Some(first) => Err(errors.fold(first, |mut a, b| {
                a.combine(b);
                a
            })),
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct KvValue {
    /// Tokens comprising this value. Guaranteed to be nonempty.
    tokens: Vec<TokenTree>,
}

impl KvValue {
    fn new(tokens: Vec<TokenTree>) -> Self {
        assert!(!tokens.is_empty());
        Self { tokens }
    }

    pub fn expr(self) -> TokenStream {
        self.tokens.into_iter().collect()
    }

    pub fn ident(self) -> ParseResult<Ident> {
        if self.tokens.len() > 1 {
            return bail!(&self.tokens[1], "expected a single identifier, not an expression");
        }

        match &self.tokens[0] {
            TokenTree::Ident(ident) => Ok(ident.clone()),
            tt => bail!(tt, "expected identifier"),
        }
    }
}

struct ParserState<'a> {
    attr_name: String,
    tokens: std::slice::Iter<'a, TokenTree>,
    prev: Option<&'a TokenTree>,
    cur: Option<&'a TokenTree>,
}

impl<'a> ParserState<'a> {
    pub fn parse(attr_name: String, attr_value: &'a venial::AttributeValue) -> ParseResult<KvMap> {
        let mut tokens = match attr_value {
            venial::AttributeValue::Equals(punct, _tokens) => {
                return bail!(punct, "expected `(` or `]`");
            }
            _ => attr_value.get_value_tokens().iter(),
        };
        let cur = tokens.next();

        let parser = Self {
            attr_name,
            tokens,
            prev: None,
            cur,
        };

        parser.parse_map()
    }

    fn parse_map(mut self) -> ParseResult<KvMap> {
        let mut map: KvMap = HashMap::new();
        // Whether the previous expression might be missing parentheses. Only used for error hints.
        let mut prev_expr_complex = false;

        while let Some(cur) = self.cur {
            match cur {
                TokenTree::Ident(key) => {
                    self.next();
                    let value = self.parse_opt_value(key, prev_expr_complex)?;
                    if map.contains_key(key) {
                        return bail!(key, "duplicate key `{key}`");
                    }
                    prev_expr_complex = match &value {
                        None => false,
                        Some(value) => value.tokens.len() > 1,
                    };
                    map.insert(key.clone(), value);
                }
                _ => {
                    let parens_hint = if prev_expr_complex {
                        let attr = &self.attr_name;
                        format!("\nnote: the preceding `,` is interpreted as a separator between arguments to `#[{attr}]`; if you meant the `,` as part of an expression, surround the expression with parentheses")
                    } else {
                        String::new()
                    };
                    return bail!(cur, "expected identifier{parens_hint}");
                }
            }
        }

        Ok(map)
    }

    fn parse_opt_value(
        &mut self,
        key: &Ident,
        prev_expr_complex: bool,
    ) -> ParseResult<Option<KvValue>> {
        let value = match self.cur {
            // End of input directly after a key.
            None => None,
            // Comma following key.
            Some(tt) if is_punct(tt, ',') => {
                self.next();
                None
            }
            // Equals sign following key.
            Some(tt) if is_punct(tt, '=') => {
                self.next();
                Some(self.parse_value()?)
            }
            Some(tt) => {
                let parens_hint = if prev_expr_complex {
                    let attr = &self.attr_name;
                    format!("\nnote: `{key}` is interpreted as the next argument to `#[{attr}]`; if you meant it as part of an expression, surround the expression with parentheses")
                } else {
                    String::new()
                };
                return bail!(
                    tt,
                    "expected next argument, or `= value` following `{key}`{parens_hint}"
                );
            }
        };
        Ok(value)
    }

    fn parse_value(&mut self) -> ParseResult<KvValue> {
        let mut tokens = Vec::new();
        while let Some(cur) = self.cur {
            if is_punct(cur, ',') {
                self.next();
                break;
            }
            tokens.push(cur.clone());
            self.next();
        }

        if tokens.is_empty() {
            // `cur` might be `None` here, so point at the `=` (or the `,` directly after it).
            return match self.prev {
                Some(prev) => bail!(prev, "expected value after `=`"),
                None => bail!(Span::call_site(), "expected value after `=`"),
            };
        }

        Ok(KvValue::new(tokens))
    }

    fn next(&mut self) {
        self.prev = self.cur;
        self.cur = self.tokens.next();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quote::quote;

    fn attributes_of(attr: TokenStream) -> Vec<venial::Attribute> {
        let item = venial::parse_item(quote! { #attr fn marked(); }).expect("item");
        item.as_function().expect("fn").attributes.clone()
    }

    /// Parses a single `#[attr(...)]` into `key -> stringified value` pairs.
    fn parse_pairs(attr: TokenStream) -> ParseResult<Vec<(String, Option<String>)>> {
        let attrs = attributes_of(attr);
        let map = ParserState::parse("attr".to_owned(), &attrs[0].value)?;

        let mut pairs: Vec<_> = map
            .into_iter()
            .map(|(key, value)| (key.to_string(), value.map(|v| v.expr().to_string())))
            .collect();
        pairs.sort();
        Ok(pairs)
    }

    fn pair(key: &str, value: Option<TokenStream>) -> (String, Option<String>) {
        (key.to_string(), value.map(|v| v.to_string()))
    }

    #[test]
    fn keys_with_and_without_values() {
        let cases = [
            (quote! { #[attr(init)] }, vec![pair("init", None)]),
            (quote! { #[attr(base = Node)] }, vec![pair("base", Some(quote! { Node }))]),
            (quote! { #[attr(base = Node,)] }, vec![pair("base", Some(quote! { Node }))]),
            (
                quote! { #[attr(init, base = Node2D, entry_point)] },
                vec![pair("base", Some(quote! { Node2D })), pair("entry_point", None), pair("init", None)],
            ),
        ];

        for (attr, expected) in cases {
            let description = attr.to_string();
            assert_eq!(parse_pairs(attr).expect("parse"), expected, "{description}");
        }
    }

    #[test]
    fn values_are_whole_expressions() {
        let pairs = parse_pairs(quote! {
            #[attr(
                neg = -10,
                label = "ticker",
                sum = 2 + 3,
                vec = Vector2::new(1.0, -1.0e2),
                // Inner commas need parentheses.
                list = (vec![1, 2]),
            )]
        })
        .expect("parse");

        assert_eq!(
            pairs,
            vec![
                pair("label", Some(quote! { "ticker" })),
                pair("list", Some(quote! { (vec![1, 2]) })),
                pair("neg", Some(quote! { -10 })),
                pair("sum", Some(quote! { 2 + 3 })),
                pair("vec", Some(quote! { Vector2::new(1.0, -1.0e2) })),
            ]
        );
    }

    #[test]
    fn malformed_lists_are_rejected() {
        assert!(parse_pairs(quote! { #[attr(val = )] }).is_err());
        assert!(parse_pairs(quote! { #[attr(init, init)] }).is_err());
        assert!(parse_pairs(quote! { #[attr(10)] }).is_err());
        assert!(parse_pairs(quote! { #[attr(base Node)] }).is_err());
    }

    #[test]
    fn class_attribute_is_consumed_by_handlers() {
        let attrs = attributes_of(quote! { #[class(init, base = Node, tool)] });
        let mut parser = KvParser::parse(&attrs, "class").expect("parse").expect("present");

        assert!(parser.handle_alone("init").expect("alone"));
        assert!(!parser.handle_alone("hidden").expect("absent"));
        assert_eq!(
            parser.handle_ident("base").expect("ident").map(|i| i.to_string()),
            Some("Node".to_string())
        );

        // `tool` was never handled.
        assert!(parser.finish().is_err());
    }

    #[test]
    fn other_attributes_are_ignored() {
        let attrs = attributes_of(quote! { #[init(val = 10)] });
        assert!(KvParser::parse(&attrs, "class").expect("parse").is_none());

        let mut init = KvParser::parse(&attrs, "init").expect("parse").expect("present");
        assert_eq!(init.handle_expr("val").expect("expr").map(|e| e.to_string()), Some("10".to_string()));
        assert!(init.finish().is_ok());
    }

    #[test]
    fn value_kind_mismatch_is_an_error() {
        let attrs = attributes_of(quote! { #[class(init = true, base)] });
        let mut parser = KvParser::parse(&attrs, "class").expect("parse").expect("present");

        assert!(parser.handle_alone("init").is_err());
        assert!(parser.handle_ident("base").is_err());
        assert!(parser.finish().is_ok());
    }
}
