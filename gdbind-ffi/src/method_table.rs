/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate as sys;
use crate::ArgKind;
use std::collections::HashMap;
use std::ffi::CStr;
use std::fmt;

/// Static description of one engine class method, as emitted by the code generator.
#[derive(Copy, Clone, Debug)]
pub struct MethodSpec {
    pub class: &'static CStr,
    pub method: &'static CStr,
    pub hash: i64,
    pub params: &'static [ArgKind],
    pub ret: Option<ArgKind>,
    pub is_vararg: bool,
    pub is_const: bool,
}

impl MethodSpec {
    pub fn class_name(&self) -> &'static str {
        self.class.to_str().unwrap_or("<non-utf8>")
    }

    pub fn method_name(&self) -> &'static str {
        self.method.to_str().unwrap_or("<non-utf8>")
    }
}

/// Bind pointer that can be shared across threads.
///
/// The engine keeps method binds alive for the whole process; the pointer itself is never written to.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct BindPtr(sys::GDExtensionMethodBindPtr);

// SAFETY: only the address is shared; every call through it goes through the engine's own synchronization.
unsafe impl Sync for BindPtr {}
// SAFETY: see `Sync` impl.
unsafe impl Send for BindPtr {}

/// One resolved method bind.
#[derive(Debug)]
pub struct MethodBindEntry {
    spec: MethodSpec,
    bind: BindPtr,
}

impl MethodBindEntry {
    pub fn class_name(&self) -> &'static str {
        self.spec.class_name()
    }

    pub fn method_name(&self) -> &'static str {
        self.spec.method_name()
    }

    pub fn bind(&self) -> sys::GDExtensionMethodBindPtr {
        self.bind.0
    }

    pub fn params(&self) -> &'static [ArgKind] {
        self.spec.params
    }

    pub fn ret(&self) -> Option<ArgKind> {
        self.spec.ret
    }

    pub fn is_vararg(&self) -> bool {
        self.spec.is_vararg
    }

    pub fn is_const(&self) -> bool {
        self.spec.is_const
    }

    /// Compares the argument kinds of a frame against this bind's parameters.
    ///
    /// Vararg methods accept extra trailing arguments.
    pub fn check_args(&self, actual: &[ArgKind]) -> Result<(), SignatureMismatch> {
        let expected = self.spec.params;

        let arity_ok = if self.spec.is_vararg {
            actual.len() >= expected.len()
        } else {
            actual.len() == expected.len()
        };

        if !arity_ok {
            return Err(SignatureMismatch::Arity {
                expected: expected.len(),
                actual: actual.len(),
            });
        }

        for (index, (&expected, &actual)) in expected.iter().zip(actual.iter()).enumerate() {
            if expected != actual {
                return Err(SignatureMismatch::Kind {
                    index,
                    expected,
                    actual,
                });
            }
        }

        Ok(())
    }

    /// Compares the kind the caller reads back against the bind's return kind (`None` for void).
    pub fn check_return(&self, actual: Option<ArgKind>) -> Result<(), SignatureMismatch> {
        if self.spec.ret == actual {
            Ok(())
        } else {
            Err(SignatureMismatch::Return {
                expected: self.spec.ret,
                actual,
            })
        }
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------

/// Table of all class method binds; resolved once, immutable afterwards.
pub struct MethodTable {
    entries: Box<[MethodBindEntry]>,
    by_name: HashMap<&'static str, HashMap<&'static str, usize>>,
}

impl MethodTable {
    /// Resolves every spec through `resolver`, which receives class, method and hash.
    ///
    /// Fails on the first spec the engine does not know.
    pub fn load<F>(specs: &[MethodSpec], mut resolver: F) -> Result<Self, BindError>
    where
        F: FnMut(&MethodSpec) -> sys::GDExtensionMethodBindPtr,
    {
        let mut entries = Vec::with_capacity(specs.len());
        let mut by_name: HashMap<&'static str, HashMap<&'static str, usize>> = HashMap::new();

        for (index, spec) in specs.iter().enumerate() {
            sys::out!("Load class method {}::{} (hash {})...", spec.class_name(), spec.method_name(), spec.hash);

            let bind = resolver(spec);
            if bind.is_null() {
                return Err(BindError::Missing {
                    class: spec.class_name().to_string(),
                    method: spec.method_name().to_string(),
                    hash: spec.hash,
                });
            }

            by_name
                .entry(spec.class_name())
                .or_default()
                .insert(spec.method_name(), index);
            entries.push(MethodBindEntry {
                spec: *spec,
                bind: BindPtr(bind),
            });
        }

        Ok(Self {
            entries: entries.into_boxed_slice(),
            by_name,
        })
    }

    pub fn lookup(&self, class: &str, method: &str) -> Option<&MethodBindEntry> {
        self.index_of(class, method).map(|index| &self.entries[index])
    }

    /// Position usable with [`by_index`](Self::by_index).
    pub fn index_of(&self, class: &str, method: &str) -> Option<usize> {
        self.by_name.get(class)?.get(method).copied()
    }

    /// Entry at the position of its spec in the slice passed to [`load`](Self::load).
    #[inline]
    pub fn by_index(&self, index: usize) -> &MethodBindEntry {
        &self.entries[index]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Errors

/// Method bind could not be resolved; the bindings and the running engine disagree.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BindError {
    Missing { class: String, method: String, hash: i64 },
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindError::Missing { class, method, hash } => {
                write!(
                    f,
                    "failed to load class method {class}::{method} (hash {hash}).{}",
                    sys::toolbox::COMPAT_INFO
                )
            }
        }
    }
}

impl std::error::Error for BindError {}

/// Arguments staged for a call do not match the bind's signature.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SignatureMismatch {
    Arity {
        expected: usize,
        actual: usize,
    },
    Kind {
        index: usize,
        expected: ArgKind,
        actual: ArgKind,
    },
    Return {
        expected: Option<ArgKind>,
        actual: Option<ArgKind>,
    },
}

impl fmt::Display for SignatureMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignatureMismatch::Arity { expected, actual } => {
                write!(f, "expected {expected} arguments, got {actual}")
            }
            SignatureMismatch::Kind {
                index,
                expected,
                actual,
            } => write!(f, "argument #{index}: expected {expected:?}, got {actual:?}"),
            SignatureMismatch::Return { expected, actual } => {
                write!(f, "return: expected {expected:?}, got {actual:?}")
            }
        }
    }
}

impl std::error::Error for SignatureMismatch {}

// ----------------------------------------------------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::VariantType;

    const FLOAT: ArgKind = ArgKind::Primitive(VariantType::Float);

    static SPECS: &[MethodSpec] = &[
        MethodSpec {
            class: c"Vector2Sum",
            method: c"add",
            hash: 11,
            params: &[FLOAT, FLOAT],
            ret: Some(FLOAT),
            is_vararg: false,
            is_const: true,
        },
        MethodSpec {
            class: c"Object",
            method: c"call",
            hash: 22,
            params: &[ArgKind::Builtin(VariantType::String)],
            ret: Some(ArgKind::Variant),
            is_vararg: true,
            is_const: false,
        },
    ];

    fn fake_resolver(spec: &MethodSpec) -> sys::GDExtensionMethodBindPtr {
        // Any distinct non-null address works as a bind.
        spec.hash as usize as sys::GDExtensionMethodBindPtr
    }

    #[test]
    fn lookup_is_stable() {
        let table = MethodTable::load(SPECS, fake_resolver).expect("all binds present");
        assert_eq!(table.len(), 2);

        let first = table.lookup("Vector2Sum", "add").expect("entry");
        let second = table.lookup("Vector2Sum", "add").expect("entry");
        assert!(std::ptr::eq(first, second));
        assert!(std::ptr::eq(first, table.by_index(0)));
        assert_eq!(first.bind() as usize, 11);

        assert!(table.lookup("Vector2Sum", "sub").is_none());
        assert!(table.lookup("Object", "add").is_none());

        assert_eq!(table.index_of("Object", "call"), Some(1));
        assert_eq!(table.index_of("Object", "add"), None);
    }

    #[test]
    fn missing_bind_is_reported() {
        let err = MethodTable::load(SPECS, |spec| {
            if spec.method_name() == "call" {
                std::ptr::null()
            } else {
                fake_resolver(spec)
            }
        })
        .err()
        .expect("must fail");

        assert_eq!(
            err,
            BindError::Missing {
                class: "Object".to_string(),
                method: "call".to_string(),
                hash: 22,
            }
        );
        assert!(err.to_string().contains("Object::call (hash 22)"));
    }

    #[test]
    fn check_args_detects_mismatch() {
        let table = MethodTable::load(SPECS, fake_resolver).expect("all binds present");
        let add = table.by_index(0);

        assert_eq!(add.check_args(&[FLOAT, FLOAT]), Ok(()));
        assert_eq!(
            add.check_args(&[FLOAT]),
            Err(SignatureMismatch::Arity { expected: 2, actual: 1 })
        );
        assert_eq!(
            add.check_args(&[FLOAT, ArgKind::Primitive(VariantType::Int)]),
            Err(SignatureMismatch::Kind {
                index: 1,
                expected: FLOAT,
                actual: ArgKind::Primitive(VariantType::Int),
            })
        );
        assert_eq!(add.check_return(Some(FLOAT)), Ok(()));
        assert!(add.check_return(None).is_err());
    }

    #[test]
    fn vararg_accepts_extra_args() {
        let table = MethodTable::load(SPECS, fake_resolver).expect("all binds present");
        let call = table.lookup("Object", "call").expect("entry");

        let string = ArgKind::Builtin(VariantType::String);
        assert_eq!(call.check_args(&[string, ArgKind::Variant, ArgKind::Variant]), Ok(()));
        assert!(call.check_args(&[]).is_err());
    }

    #[test]
    fn concurrent_readers() {
        static TABLE: std::sync::OnceLock<MethodTable> = std::sync::OnceLock::new();
        let table = TABLE.get_or_init(|| MethodTable::load(SPECS, fake_resolver).expect("all binds present"));
        let expected = table.lookup("Vector2Sum", "add").expect("entry") as *const MethodBindEntry as usize;

        let handles: Vec<_> = (0..8)
            .map(|_| {
                std::thread::spawn(move || {
                    let table = TABLE.get().expect("initialized");
                    (0..100)
                        .map(|_| table.lookup("Vector2Sum", "add").expect("entry") as *const _ as usize)
                        .all(|addr| addr == expected)
                })
            })
            .collect();

        for handle in handles {
            assert!(handle.join().expect("thread panicked"));
        }
    }
}
