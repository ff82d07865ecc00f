/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use crate::builtin::Variant;
use crate::meta::{Signature, ToGodot};
use crate::sys;
use sys::{interface_fn, EngineFfi, VariantType};

/// Untyped engine array, holding `Variant` elements.
///
/// # Reference semantics
/// Arrays are reference-counted on the engine side. [`Clone`] yields a second handle to the **same** array: modifications
/// through one handle are visible through the other.
///
/// # Panics
/// Mutating methods panic on out-of-bounds indices, mirroring slice indexing.
#[repr(C, align(8))]
pub struct Array {
    opaque: sys::OpaqueArray,
}

impl Array {
    /// Constructs an empty array.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of elements in the array.
    pub fn len(&self) -> usize {
        // SAFETY: builtin `Array::size` takes no arguments and returns int.
        let len = unsafe {
            Signature::<(), i64>::out_builtin_ptrcall(
                sys::builtin_fn!(array_size),
                "Array",
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

    /// Returns a copy of the element at `index`, or `None` if out of bounds.
    pub fn get(&self, index: usize) -> Option<Variant> {
        (index < self.len()).then(|| {
            // SAFETY: index checked above.
            unsafe { (*self.ptr(index)).clone() }
        })
    }

    /// Sets the element at `index`.
    ///
    /// # Panics
    /// If `index` is out of bounds.
    pub fn set(&mut self, index: usize, value: impl ToGodot) {
        self.check_bounds(index);

        // SAFETY: index checked above; assignment drops the previous element.
        unsafe { *self.ptr(index) = value.to_variant() }
    }

    /// Appends an element to the end of the array.
    pub fn push(&mut self, value: impl ToGodot) {
        let value = value.to_variant();

        // SAFETY: builtin `Array::push_back` takes one Variant and returns nothing.
        unsafe {
            Signature::<(Variant,), ()>::out_builtin_ptrcall(
                sys::builtin_fn!(array_push_back),
                "Array",
                "push_back",
                self.sys_mut(),
                (value,),
            )
        }
    }

    /// Removes and returns the last element, or `None` if the array is empty.
    pub fn pop(&mut self) -> Option<Variant> {
        if self.is_empty() {
            return None;
        }

        // SAFETY: builtin `Array::pop_back` takes no arguments and returns a Variant.
        let value = unsafe {
            Signature::<(), Variant>::out_builtin_ptrcall(
                sys::builtin_fn!(array_pop_back),
                "Array",
                "pop_back",
                self.sys_mut(),
                (),
            )
        };

        Some(value)
    }

    /// Removes all elements.
    pub fn clear(&mut self) {
        // SAFETY: builtin `Array::clear` takes no arguments and returns nothing.
        unsafe {
            Signature::<(), ()>::out_builtin_ptrcall(
                sys::builtin_fn!(array_clear),
                "Array",
                "clear",
                self.sys_mut(),
                (),
            )
        }
    }

    /// Iterates over copies of the elements.
    ///
    /// The array is shared: if it is modified through another handle during iteration, the iterator sees the change.
    pub fn iter_shared(&self) -> Iter<'_> {
        Iter { array: self, next: 0 }
    }

    fn ptr(&self, index: usize) -> *mut Variant {
        // SAFETY: the engine returns a pointer into the array's storage for in-bounds indices.
        let ptr = unsafe { interface_fn!(array_operator_index)(self.sys_const_as_mut(), index as i64) };
        assert!(!ptr.is_null(), "array index {index} yielded null element pointer");

        ptr as *mut Variant
    }

    fn check_bounds(&self, index: usize) {
        let len = self.len();
        assert!(index < len, "Array index {index} is out of bounds: length is {len}");
    }

    fn sys_const_as_mut(&self) -> sys::GDExtensionTypePtr {
        sys::force_mut_ptr(self.sys())
    }

    fn from_opaque(opaque: sys::OpaqueArray) -> Self {
        Self { opaque }
    }
}

impl_builtin_ffi!(Array, VariantType::Array);
impl_builtin_lifecycle!(Array, VariantType::Array);

impl<T: ToGodot> FromIterator<T> for Array {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut array = Array::new();
        array.extend(iter);
        array
    }
}

impl<T: ToGodot> Extend<T> for Array {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push(value);
        }
    }
}

impl PartialEq for Array {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter_shared().zip(other.iter_shared()).all(|(a, b)| a == b)
    }
}

impl fmt::Debug for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter_shared()).finish()
    }
}

/// Iterator over copies of an [`Array`]'s elements.
pub struct Iter<'a> {
    array: &'a Array,
    next: usize,
}

impl Iterator for Iter<'_> {
    type Item = Variant;

    fn next(&mut self) -> Option<Self::Item> {
        let value = self.array.get(self.next)?;
        self.next += 1;
        Some(value)
    }
}

pub(super) fn to_usize(len: i64) -> usize {
    usize::try_from(len).unwrap_or_else(|_| panic!("engine reported negative container length {len}"))
}
