/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use super::array::to_usize;
use crate::builtin::{Array, Variant};
use crate::meta::{Signature, ToGodot};
use crate::sys;
use sys::{interface_fn, EngineFfi, VariantType};

/// Engine dictionary, mapping `Variant` keys to `Variant` values.
///
/// Keys keep their insertion order. Like [`Array`], dictionaries are shared on clone.
#[repr(C, align(8))]
pub struct Dictionary {
    opaque: sys::OpaqueDictionary,
}

impl Dictionary {
    /// Constructs an empty dictionary.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        // SAFETY: builtin `Dictionary::size` takes no arguments and returns int.
        let len = unsafe {
            Signature::<(), i64>::out_builtin_ptrcall(
                sys::builtin_fn!(dictionary_size),
                "Dictionary",
                "size",
                self.sys_const_as_mut(),
                (),
            )
        };

        to_usize(len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a copy of the value for `key`, or `None` if there is no such entry.
    pub fn get(&self, key: impl ToGodot) -> Option<Variant> {
        let key = key.to_variant();
        if !self.contains_key_variant(&key) {
            return None;
        }

        // SAFETY: entry exists, so operator_index yields a pointer to its value without inserting.
        let value = unsafe { (*self.ptr(&key)).clone() };
        Some(value)
    }

    /// Inserts or overwrites the value for `key`.
    pub fn set(&mut self, key: impl ToGodot, value: impl ToGodot) {
        let key = key.to_variant();

        // SAFETY: operator_index inserts a nil entry if absent; assignment drops the previous value.
        unsafe { *self.ptr(&key) = value.to_variant() }
    }

    /// Returns `true` if the dictionary contains `key`.
    pub fn contains_key(&self, key: impl ToGodot) -> bool {
        self.contains_key_variant(&key.to_variant())
    }

    /// Removes the entry for `key`, returning its value if there was one.
    pub fn remove(&mut self, key: impl ToGodot) -> Option<Variant> {
        let key = key.to_variant();
        let old_value = self.get(&key);

        if old_value.is_some() {
            // SAFETY: builtin `Dictionary::erase` takes one Variant and returns bool.
            unsafe {
                Signature::<(Variant,), bool>::out_builtin_ptrcall(
                    sys::builtin_fn!(dictionary_erase),
                    "Dictionary",
                    "erase",
                    self.sys_mut(),
                    (key,),
                );
            }
        }

        old_value
    }

    /// Returns all keys, in insertion order.
    pub fn keys_array(&self) -> Array {
        // SAFETY: builtin `Dictionary::keys` takes no arguments and returns an Array.
        unsafe {
            Signature::<(), Array>::out_builtin_ptrcall(
                sys::builtin_fn!(dictionary_keys),
                "Dictionary",
                "keys",
                self.sys_const_as_mut(),
                (),
            )
        }
    }

    /// Removes all entries.
    pub fn clear(&mut self) {
        // SAFETY: builtin `Dictionary::clear` takes no arguments and returns nothing.
        unsafe {
            Signature::<(), ()>::out_builtin_ptrcall(
                sys::builtin_fn!(dictionary_clear),
                "Dictionary",
                "clear",
                self.sys_mut(),
                (),
            )
        }
    }

    /// Iterates over copies of `(key, value)` pairs, in insertion order.
    ///
    /// Keys are snapshotted when the iterator is created; entries removed in the meantime are skipped.
    pub fn iter_shared(&self) -> impl Iterator<Item = (Variant, Variant)> + '_ {
        let keys = self.keys_array();

        (0..keys.len()).filter_map(move |i| {
            let key = keys.get(i)?;
            let value = self.get(&key)?;
            Some((key, value))
        })
    }

    fn contains_key_variant(&self, key: &Variant) -> bool {
        // SAFETY: builtin `Dictionary::has` takes one Variant and returns bool.
        unsafe {
            Signature::<(&Variant,), bool>::out_builtin_ptrcall(
                sys::builtin_fn!(dictionary_has),
                "Dictionary",
                "has",
                self.sys_const_as_mut(),
                (key,),
            )
        }
    }

    fn ptr(&self, key: &Variant) -> *mut Variant {
        // SAFETY: both the dictionary and the key are live.
        let ptr = unsafe { interface_fn!(dictionary_operator_index)(self.sys_const_as_mut(), key.var_sys()) };
        assert!(!ptr.is_null(), "dictionary lookup yielded null value pointer");

        ptr as *mut Variant
    }

    fn sys_const_as_mut(&self) -> sys::GDExtensionTypePtr {
        sys::force_mut_ptr(self.sys())
    }

    fn from_opaque(opaque: sys::OpaqueDictionary) -> Self {
        Self { opaque }
    }
}

impl_builtin_ffi!(Dictionary, VariantType::Dictionary);
impl_builtin_lifecycle!(Dictionary, VariantType::Dictionary);

impl<K: ToGodot, V: ToGodot> FromIterator<(K, V)> for Dictionary {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut dict = Dictionary::new();
        for (key, value) in iter {
            dict.set(key, value);
        }
        dict
    }
}

impl fmt::Debug for Dictionary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter_shared()).finish()
    }
}
