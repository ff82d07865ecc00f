/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;
use std::marker::PhantomData;

use super::array::to_usize;
use crate::builtin::{GString, Vector2};
use crate::meta::Signature;
use crate::sys;
use sys::{interface_fn, EngineFfi, VariantType};

/// Element type of a [`PackedArray`].
///
/// Implemented for the element types the engine has packed arrays for; cannot be implemented outside this crate.
pub trait PackedArrayElement: Clone + fmt::Debug + PartialEq + 'static + sealed::Sealed {
    /// Variant type of the packed array holding this element type.
    #[doc(hidden)]
    const ARRAY_TYPE: VariantType;

    #[doc(hidden)]
    fn size_fn() -> sys::BuiltinMethodBind;

    #[doc(hidden)]
    fn resize_fn() -> sys::BuiltinMethodBind;

    /// # Safety
    /// `array` must point to a live packed array of this element type; `index` must be in bounds.
    #[doc(hidden)]
    unsafe fn element_ptr(array: sys::GDExtensionTypePtr, index: i64) -> *mut Self;
}

mod sealed {
    pub trait Sealed {}
}

macro_rules! impl_packed_element {
    ($T:ty, $Alias:ident, $size:ident, $resize:ident, $index:ident) => {
        impl sealed::Sealed for $T {}

        impl PackedArrayElement for $T {
            const ARRAY_TYPE: VariantType = VariantType::$Alias;

            fn size_fn() -> sys::BuiltinMethodBind {
                sys::builtin_fn!($size)
            }

            fn resize_fn() -> sys::BuiltinMethodBind {
                sys::builtin_fn!($resize)
            }

            unsafe fn element_ptr(array: sys::GDExtensionTypePtr, index: i64) -> *mut Self {
                interface_fn!($index)(array, index) as *mut Self
            }
        }

        #[doc = concat!("Packed array of `", stringify!($T), "` elements.")]
        pub type $Alias = PackedArray<$T>;
    };
}

impl_packed_element!(u8, PackedByteArray, packed_byte_array_size, packed_byte_array_resize, packed_byte_array_operator_index);
impl_packed_element!(i32, PackedInt32Array, packed_int32_array_size, packed_int32_array_resize, packed_int32_array_operator_index);
impl_packed_element!(i64, PackedInt64Array, packed_int64_array_size, packed_int64_array_resize, packed_int64_array_operator_index);
impl_packed_element!(f32, PackedFloat32Array, packed_float32_array_size, packed_float32_array_resize, packed_float32_array_operator_index);
impl_packed_element!(f64, PackedFloat64Array, packed_float64_array_size, packed_float64_array_resize, packed_float64_array_operator_index);
impl_packed_element!(GString, PackedStringArray, packed_string_array_size, packed_string_array_resize, packed_string_array_operator_index);
impl_packed_element!(Vector2, PackedVector2Array, packed_vector2_array_size, packed_vector2_array_resize, packed_vector2_array_operator_index);

// ----------------------------------------------------------------------------------------------------------------------------------------------

/// Contiguous engine array of one element type.
///
/// Unlike [`Array`](crate::builtin::Array), packed arrays are copy-on-write: [`Clone`] produces an independent value.
/// Elements live in engine memory and can be viewed as a slice.
#[repr(C, align(8))]
pub struct PackedArray<T: PackedArrayElement> {
    opaque: sys::OpaquePackedArray,
    _marker: PhantomData<T>,
}

impl<T: PackedArrayElement> PackedArray<T> {
    /// Constructs an empty packed array.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        // SAFETY: builtin `size` takes no arguments and returns int.
        let len = unsafe {
            Signature::<(), i64>::out_builtin_ptrcall(
                T::size_fn(),
                T::ARRAY_TYPE.name(),
                "size",
                sys::force_mut_ptr(self.sys()),
                (),
            )
        };

        to_usize(len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns a copy of the element at `index`, or `None` if out of bounds.
    pub fn get(&self, index: usize) -> Option<T> {
        self.as_slice().get(index).cloned()
    }

    /// Replaces the element at `index`.
    ///
    /// # Panics
    /// If `index` is out of bounds.
    pub fn set(&mut self, index: usize, value: T) {
        let len = self.len();
        assert!(index < len, "{} index {index} is out of bounds: length is {len}", T::ARRAY_TYPE.name());

        // SAFETY: index checked above; assignment drops the previous element.
        unsafe { *T::element_ptr(self.sys_mut(), index as i64) = value }
    }

    /// Appends an element.
    pub fn push(&mut self, value: T) {
        let len = self.len();
        self.resize(len + 1);
        self.set(len, value);
    }

    /// Changes the length. New elements are default-initialized by the engine (zero, empty string).
    pub fn resize(&mut self, new_len: usize) {
        let new_len = i64::try_from(new_len).unwrap_or_else(|_| panic!("packed array length {new_len} too large"));

        // SAFETY: builtin `resize` takes one int and returns an error code.
        let err = unsafe {
            Signature::<(i64,), i64>::out_builtin_ptrcall(
                T::resize_fn(),
                T::ARRAY_TYPE.name(),
                "resize",
                self.sys_mut(),
                (new_len,),
            )
        };

        assert_eq!(err, 0, "{}::resize({new_len}) failed with error {err}", T::ARRAY_TYPE.name());
    }

    /// Views the elements as a slice. Empty arrays yield an empty slice without touching engine storage.
    pub fn as_slice(&self) -> &[T] {
        let len = self.len();
        if len == 0 {
            return &[];
        }

        // SAFETY: elements are contiguous in engine memory; the slice borrows `self`, so no resize can happen meanwhile.
        unsafe {
            let first = T::element_ptr(sys::force_mut_ptr(self.sys()), 0);
            std::slice::from_raw_parts(first, len)
        }
    }

    /// Views the elements as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        let len = self.len();
        if len == 0 {
            return &mut [];
        }

        // SAFETY: see `as_slice()`; exclusive access through `&mut self`.
        unsafe {
            let first = T::element_ptr(self.sys_mut(), 0);
            std::slice::from_raw_parts_mut(first, len)
        }
    }

    /// Copies the elements into a `Vec`.
    pub fn to_vec(&self) -> Vec<T> {
        self.as_slice().to_vec()
    }

    fn from_opaque(opaque: sys::OpaquePackedArray) -> Self {
        Self {
            opaque,
            _marker: PhantomData,
        }
    }
}

// SAFETY: the opaque field has the engine's packed array layout.
unsafe impl<T: PackedArrayElement> EngineFfi for PackedArray<T> {
    const VARIANT_TYPE: VariantType = T::ARRAY_TYPE;

    sys::ffi_methods! { type sys::GDExtensionTypePtr = *mut Opaque; .. }

    unsafe fn from_arg_ptr(ptr: sys::GDExtensionConstTypePtr, _call_type: sys::PtrcallType) -> Self {
        Self::new_with_uninit(|dst| {
            let ctor = sys::builtin_lifecycle!(copy_constructor, T::ARRAY_TYPE);
            let args = [ptr];
            ctor(dst, args.as_ptr());
        })
    }
}

impl<T: PackedArrayElement> Clone for PackedArray<T> {
    fn clone(&self) -> Self {
        let ctor = sys::builtin_lifecycle!(copy_constructor, T::ARRAY_TYPE);
        let args = [self.sys()];

        // SAFETY: copy constructor fully initializes the destination from a live value.
        unsafe { Self::new_with_uninit(|dst| ctor(dst, args.as_ptr())) }
    }
}

impl<T: PackedArrayElement> Drop for PackedArray<T> {
    fn drop(&mut self) {
        let dtor = sys::builtin_lifecycle!(destructor, T::ARRAY_TYPE);

        // SAFETY: destroyed exactly once.
        unsafe { dtor(self.sys_mut()) }
    }
}

impl<T: PackedArrayElement> Default for PackedArray<T> {
    fn default() -> Self {
        let ctor = sys::builtin_lifecycle!(default_constructor, T::ARRAY_TYPE);

        // SAFETY: default constructor takes no arguments and fully initializes the destination.
        unsafe { Self::new_with_uninit(|dst| ctor(dst, std::ptr::null())) }
    }
}

impl<T: PackedArrayElement> From<&[T]> for PackedArray<T> {
    fn from(slice: &[T]) -> Self {
        let mut array = Self::new();
        if slice.is_empty() {
            return array;
        }

        array.resize(slice.len());
        array.as_mut_slice().clone_from_slice(slice);
        array
    }
}

impl<T: PackedArrayElement, const N: usize> From<[T; N]> for PackedArray<T> {
    fn from(elements: [T; N]) -> Self {
        Self::from(&elements[..])
    }
}

impl<T: PackedArrayElement> FromIterator<T> for PackedArray<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let elements: Vec<T> = iter.into_iter().collect();
        Self::from(elements.as_slice())
    }
}

impl<T: PackedArrayElement> PartialEq for PackedArray<T> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: PackedArrayElement> fmt::Debug for PackedArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}
