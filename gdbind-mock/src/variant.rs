/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Engine-side storage of builtin values, and the variant layout shared with the bindings.
//!
//! Native representations, as seen through `GDExtensionTypePtr`:
//!
//! | Type               | Bytes | Content                                          |
//! |--------------------|-------|--------------------------------------------------|
//! | `bool`             | 1     | `0` or `1`                                       |
//! | `int`, `float`     | 8     | `i64`, `f64`                                     |
//! | vectors, `Color`   | 8-16  | `f32` components                                 |
//! | `String`           | 8     | `*mut String`                                    |
//! | `Array`, `Dictionary` | 8  | `Arc` raw pointer; copies share the contents     |
//! | `Callable`         | 16    | `Arc<CallableData>` raw pointer or null, padding |
//! | packed arrays      | 16    | `*mut Vec<T>`, padding; copies are deep          |
//! | `Object`           | 8     | object pointer                                   |
//!
//! A variant is a 4-byte type tag, 4 bytes of padding and 16 bytes of payload. Objects inside variants store the
//! pointer and the instance ID, so a freed object is still recognized as such.

use std::ffi::c_void;
use std::fmt;
use std::mem::ManuallyDrop;
use std::ptr;
use std::sync::Arc;

use gdbind_ffi as sys;
use parking_lot::Mutex;
use sys::VariantType;

use crate::objects::{self, ObjPtr};

/// Bit-level variant. Has no lifecycle of its own; see [`Var`].
#[repr(C)]
#[derive(Copy, Clone, Debug)]
pub(crate) struct RawVariant {
    tag: i32,
    pad: u32,
    data: [u64; 2],
}

const _: () = assert!(std::mem::size_of::<RawVariant>() == 24);

impl RawVariant {
    const fn with_bits(ty: VariantType, data: [u64; 2]) -> Self {
        Self {
            tag: ty as i32,
            pad: 0,
            data,
        }
    }

    fn ty(&self) -> VariantType {
        VariantType::try_from_sys(self.tag).unwrap_or(VariantType::Nil)
    }

    fn payload(&self) -> *const c_void {
        self.data.as_ptr() as *const c_void
    }

    fn payload_mut(&mut self) -> *mut c_void {
        self.data.as_mut_ptr() as *mut c_void
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Owned variant

/// Variant owned by the engine side. Cloning and dropping follow the engine's variant lifecycle.
#[repr(transparent)]
pub(crate) struct Var(RawVariant);

impl Var {
    pub fn nil() -> Self {
        Self(RawVariant::with_bits(VariantType::Nil, [0, 0]))
    }

    pub fn bool(value: bool) -> Self {
        Self(RawVariant::with_bits(VariantType::Bool, [value as u64, 0]))
    }

    pub fn int(value: i64) -> Self {
        Self(RawVariant::with_bits(VariantType::Int, [value as u64, 0]))
    }

    pub fn float(value: f64) -> Self {
        Self(RawVariant::with_bits(VariantType::Float, [value.to_bits(), 0]))
    }

    pub fn string(value: &str) -> Self {
        Self(RawVariant::with_bits(VariantType::String, [GStr::new(value).into_bits(), 0]))
    }

    pub fn vector2(value: [f32; 2]) -> Self {
        // SAFETY: `value` is a valid native Vector2.
        unsafe { Self::from_native(VariantType::Vector2, value.as_ptr() as *const c_void) }
    }

    pub fn object(obj: ObjPtr) -> Self {
        // SAFETY: the slot holds an object pointer, as the native Object representation demands.
        unsafe { Self::from_native(VariantType::Object, &obj as *const ObjPtr as *const c_void) }
    }

    pub fn array(items: Vec<Var>) -> Self {
        Self(RawVariant::with_bits(VariantType::Array, [new_array(items), 0]))
    }

    pub fn packed<T: PackedElem>(items: Vec<T>) -> Self {
        Self(RawVariant::with_bits(T::TYPE, [new_packed(items), 0]))
    }

    /// Copies a native value of type `ty` into a new variant.
    ///
    /// # Safety
    /// `src` must point to a live native value of type `ty`.
    pub unsafe fn from_native(ty: VariantType, src: *const c_void) -> Self {
        let mut raw = RawVariant::with_bits(ty, [0, 0]);

        match ty {
            VariantType::Nil => {}
            VariantType::Object => {
                let obj = *(src as *const ObjPtr);
                if !obj.is_null() {
                    raw.data = [obj as u64, objects::instance_id(obj)];
                    objects::variant_acquire(obj);
                }
            }
            _ => copy_native(ty, raw.payload_mut(), src),
        }

        Self(raw)
    }

    /// Reinterprets a variant owned by someone else.
    ///
    /// # Safety
    /// `ptr` must point to a live variant that outlives `'a`.
    pub unsafe fn borrow<'a>(ptr: *const c_void) -> &'a Var {
        &*(ptr as *const Var)
    }

    /// Moves the variant into uninitialized memory.
    ///
    /// # Safety
    /// `dst` must be valid for writing 24 bytes.
    pub unsafe fn write_into(self, dst: *mut c_void) {
        ptr::write(dst as *mut Var, self)
    }

    /// Copies the payload into an uninitialized native slot of the variant's type.
    ///
    /// An object that has been freed is written as null.
    ///
    /// # Safety
    /// `dst` must be valid for writing the native representation.
    pub unsafe fn write_native(&self, dst: *mut c_void) {
        match self.ty() {
            VariantType::Nil => {}
            VariantType::Object => {
                let obj = self.as_object().unwrap_or(ptr::null_mut());
                ptr::write(dst as *mut ObjPtr, obj);
            }
            ty => copy_native(ty, dst, self.0.payload()),
        }
    }

    pub fn ty(&self) -> VariantType {
        self.0.ty()
    }

    pub fn as_bool(&self) -> Option<bool> {
        (self.ty() == VariantType::Bool).then_some(self.0.data[0] != 0)
    }

    pub fn as_int(&self) -> Option<i64> {
        (self.ty() == VariantType::Int).then_some(self.0.data[0] as i64)
    }

    /// Float value, with implicit conversion from `int`.
    pub fn as_float(&self) -> Option<f64> {
        match self.ty() {
            VariantType::Float => Some(f64::from_bits(self.0.data[0])),
            VariantType::Int => Some(self.0.data[0] as i64 as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        // SAFETY: a String variant holds a valid string handle.
        (self.ty() == VariantType::String).then(|| unsafe { string_at(self.0.payload()) })
    }

    /// The object pointer, or `None` for other types and freed objects. `Some(null)` for a null object.
    pub fn as_object(&self) -> Option<ObjPtr> {
        if self.ty() != VariantType::Object {
            return None;
        }

        let obj = self.0.data[0] as ObjPtr;
        if obj.is_null() || objects::is_alive_id(self.0.data[1]) {
            Some(obj)
        } else {
            None
        }
    }

    fn object_id(&self) -> u64 {
        self.0.data[1]
    }

    fn is_null_like(&self) -> bool {
        match self.ty() {
            VariantType::Nil => true,
            VariantType::Object => self.0.data[0] == 0,
            _ => false,
        }
    }

    fn floats<const N: usize>(&self) -> [f32; N] {
        // SAFETY: called only for vector and color variants, whose payload holds at least N floats.
        unsafe { ptr::read(self.0.payload() as *const [f32; N]) }
    }
}

impl Clone for Var {
    fn clone(&self) -> Self {
        let mut raw = self.0;
        match self.ty() {
            VariantType::Object => {
                let obj = raw.data[0] as ObjPtr;
                if !obj.is_null() {
                    objects::variant_acquire(obj);
                }
            }
            // SAFETY: the payload is a live native value of the tagged type.
            ty => unsafe { copy_native(ty, raw.payload_mut(), self.0.payload()) },
        }

        Self(raw)
    }
}

impl fmt::Debug for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Var({:?})", self.ty())
    }
}

impl Drop for Var {
    fn drop(&mut self) {
        match self.ty() {
            VariantType::Object => {
                let obj = self.0.data[0] as ObjPtr;
                if !obj.is_null() {
                    objects::variant_release(obj);
                }
            }
            // SAFETY: the payload is a live native value of the tagged type, and is not used afterwards.
            ty => unsafe { destroy_native(ty, self.0.payload_mut()) },
        }

        self.0 = RawVariant::with_bits(VariantType::Nil, [0, 0]);
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Native lifecycle

/// Size of the native representation, without padding.
pub(crate) fn native_size(ty: VariantType) -> usize {
    match ty {
        VariantType::Nil => 0,
        VariantType::Bool => 1,
        VariantType::Int
        | VariantType::Float
        | VariantType::String
        | VariantType::Vector2
        | VariantType::Object
        | VariantType::Dictionary
        | VariantType::Array => 8,
        VariantType::Vector3 => 12,
        _ => 16,
    }
}

/// Copy-constructs a native value into uninitialized memory.
///
/// # Safety
/// `src` must point to a live native value of type `ty`; `dst` must be writable for its size.
pub(crate) unsafe fn copy_native(ty: VariantType, dst: *mut c_void, src: *const c_void) {
    match ty {
        VariantType::String => {
            let copy = GStr::new(string_at(src));
            ptr::write(dst as *mut u64, copy.into_bits());
        }
        VariantType::Array => {
            let handle = *(src as *const *const ArrayData);
            if !handle.is_null() {
                Arc::increment_strong_count(handle);
            }
            ptr::write(dst as *mut *const ArrayData, handle);
        }
        VariantType::Dictionary => {
            let handle = *(src as *const *const DictData);
            if !handle.is_null() {
                Arc::increment_strong_count(handle);
            }
            ptr::write(dst as *mut *const DictData, handle);
        }
        VariantType::Callable => {
            let handle = *(src as *const *const CallableData);
            if !handle.is_null() {
                Arc::increment_strong_count(handle);
            }
            ptr::write(dst as *mut [u64; 2], [handle as u64, 0]);
        }
        ty if ty.is_packed_array() => dispatch_packed!(ty, |T| {
            let copy = packed_at::<T>(src).clone();
            ptr::write(dst as *mut [u64; 2], [new_packed(copy), 0]);
        }),
        _ => ptr::copy_nonoverlapping(src as *const u8, dst as *mut u8, native_size(ty)),
    }
}

/// Destroys a native value; the memory must not be used as that value afterwards.
///
/// # Safety
/// `ptr` must point to a live native value of type `ty`, or to zeroed memory.
pub(crate) unsafe fn destroy_native(ty: VariantType, ptr: *mut c_void) {
    match ty {
        VariantType::String => {
            drop(GStr::from_bits(*(ptr as *const u64)));
            ptr::write(ptr as *mut u64, 0);
        }
        VariantType::Array => {
            let handle = *(ptr as *const *const ArrayData);
            ptr::write(ptr as *mut u64, 0);
            if !handle.is_null() {
                drop(Arc::from_raw(handle));
            }
        }
        VariantType::Dictionary => {
            let handle = *(ptr as *const *const DictData);
            ptr::write(ptr as *mut u64, 0);
            if !handle.is_null() {
                drop(Arc::from_raw(handle));
            }
        }
        VariantType::Callable => {
            let handle = *(ptr as *const *const CallableData);
            ptr::write(ptr as *mut [u64; 2], [0, 0]);
            if !handle.is_null() {
                drop(Arc::from_raw(handle));
            }
        }
        ty if ty.is_packed_array() => dispatch_packed!(ty, |T| {
            let handle = *(ptr as *const *mut Vec<T>);
            ptr::write(ptr as *mut [u64; 2], [0, 0]);
            if !handle.is_null() {
                drop(Box::from_raw(handle));
            }
        }),
        _ => {}
    }
}

/// Default-constructs a native value into uninitialized memory: empty containers, zero numbers, null objects.
///
/// # Safety
/// `dst` must be writable for the native size of `ty`.
pub(crate) unsafe fn default_native(ty: VariantType, dst: *mut c_void) {
    match ty {
        VariantType::String => ptr::write(dst as *mut u64, GStr::new("").into_bits()),
        VariantType::Array => ptr::write(dst as *mut u64, new_array(vec![])),
        VariantType::Dictionary => ptr::write(dst as *mut u64, new_dictionary()),
        ty if ty.is_packed_array() => dispatch_packed!(ty, |T| {
            ptr::write(dst as *mut [u64; 2], [new_packed(Vec::<T>::new()), 0]);
        }),
        _ => ptr::write_bytes(dst as *mut u8, 0, native_size(ty)),
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Strings

/// Engine string handle, 8 bytes. Also the element type of `PackedStringArray`.
#[repr(transparent)]
pub(crate) struct GStr(*mut String);

impl GStr {
    pub fn new(s: &str) -> Self {
        Self(Box::into_raw(Box::new(s.to_owned())))
    }

    pub fn as_str(&self) -> &str {
        if self.0.is_null() {
            ""
        } else {
            // SAFETY: non-null handles come from `Box::into_raw` and are owned by `self`.
            unsafe { (*self.0).as_str() }
        }
    }

    fn into_bits(self) -> u64 {
        ManuallyDrop::new(self).0 as u64
    }

    /// # Safety
    /// `bits` must be zero or come from [`Self::into_bits`], and must not be used again.
    unsafe fn from_bits(bits: u64) -> Self {
        Self(bits as *mut String)
    }
}

impl Clone for GStr {
    fn clone(&self) -> Self {
        Self::new(self.as_str())
    }
}

impl Default for GStr {
    fn default() -> Self {
        Self::new("")
    }
}

impl PartialEq for GStr {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Drop for GStr {
    fn drop(&mut self) {
        if !self.0.is_null() {
            // SAFETY: handle came from `Box::into_raw` and is exclusively owned.
            drop(unsafe { Box::from_raw(self.0) });
        }
    }
}

/// Reads the string behind a native string pointer.
///
/// # Safety
/// `ptr` must point to a live string handle that outlives `'a`.
pub(crate) unsafe fn string_at<'a>(ptr: *const c_void) -> &'a str {
    (*(ptr as *const GStr)).as_str()
}

/// Writes a new string into an uninitialized native string slot.
///
/// # Safety
/// `dst` must be writable for 8 bytes.
pub(crate) unsafe fn write_string(dst: *mut c_void, s: &str) {
    ptr::write(dst as *mut GStr, GStr::new(s));
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Arrays and dictionaries

pub(crate) type ArrayData = Mutex<Vec<Var>>;

/// Entries in insertion order.
pub(crate) type DictData = Mutex<Vec<(Var, Var)>>;

pub(crate) fn new_array(items: Vec<Var>) -> u64 {
    Arc::into_raw(Arc::new(Mutex::new(items))) as u64
}

pub(crate) fn new_dictionary() -> u64 {
    Arc::into_raw(Arc::new(DictData::new(Vec::new()))) as u64
}

/// # Safety
/// `ptr` must point to a live native array that outlives `'a`.
pub(crate) unsafe fn array_at<'a>(ptr: *const c_void) -> &'a ArrayData {
    &**(ptr as *const *const ArrayData)
}

/// # Safety
/// `ptr` must point to a live native dictionary that outlives `'a`.
pub(crate) unsafe fn dictionary_at<'a>(ptr: *const c_void) -> &'a DictData {
    &**(ptr as *const *const DictData)
}

/// Position of `key` in a dictionary's entries. Keys of different types never match, so `1` and `1.0` are distinct.
pub(crate) fn find_key(entries: &[(Var, Var)], key: &Var) -> Option<usize> {
    entries
        .iter()
        .position(|(k, _)| k.ty() == key.ty() && variant_eq(k, key))
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Callables

/// Target of a custom callable. The extension's `free_func` runs when the last copy is dropped.
pub(crate) struct CallableData {
    info: sys::GDExtensionCallableCustomInfo,
}

// SAFETY: the userdata is only handed back to the extension that created it; the mock never dereferences it.
unsafe impl Send for CallableData {}
unsafe impl Sync for CallableData {}

impl CallableData {
    /// Invokes the extension's `call_func`.
    ///
    /// # Safety
    /// Every pointer in `args` must point to a live variant.
    pub unsafe fn call(&self, args: &[*const c_void]) -> Result<Var, sys::GDExtensionCallError> {
        let Some(call_func) = self.info.call_func else {
            return Err(crate::methods::call_error(sys::GDEXTENSION_CALL_ERROR_INVALID_METHOD, 0, 0));
        };

        let mut error = crate::methods::call_error(sys::GDEXTENSION_CALL_OK, 0, 0);
        let mut ret = std::mem::MaybeUninit::<Var>::uninit();
        call_func(
            self.info.callable_userdata,
            args.as_ptr(),
            args.len() as i64,
            ret.as_mut_ptr() as sys::GDExtensionVariantPtr,
            &mut error,
        );

        // The extension always initializes the return slot.
        let ret = ret.assume_init();
        if error.error == sys::GDEXTENSION_CALL_OK {
            Ok(ret)
        } else {
            Err(error)
        }
    }
}

impl Drop for CallableData {
    fn drop(&mut self) {
        if let Some(free_func) = self.info.free_func {
            // SAFETY: the userdata was handed over in `callable_custom_create` and is freed exactly once.
            unsafe { free_func(self.info.callable_userdata) };
        }
    }
}

pub(crate) fn new_callable(info: sys::GDExtensionCallableCustomInfo) -> [u64; 2] {
    [Arc::into_raw(Arc::new(CallableData { info })) as u64, 0]
}

/// Shares the target of a native callable, or `None` if it is invalid.
///
/// # Safety
/// `ptr` must point to a live native callable.
pub(crate) unsafe fn callable_at(ptr: *const c_void) -> Option<Arc<CallableData>> {
    let handle = *(ptr as *const *const CallableData);
    if handle.is_null() {
        return None;
    }

    Arc::increment_strong_count(handle);
    Some(Arc::from_raw(handle))
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Packed arrays

/// Element of a packed array.
pub(crate) trait PackedElem: Clone + Default + PartialEq + 'static {
    const TYPE: VariantType;

    fn to_var(&self) -> Var;
}

macro_rules! impl_packed_elem {
    ($($T:ty => $Variant:ident, |$v:ident| $to_var:expr;)*) => {
        $(
            impl PackedElem for $T {
                const TYPE: VariantType = VariantType::$Variant;

                fn to_var(&self) -> Var {
                    let $v = self;
                    $to_var
                }
            }
        )*
    };
}

impl_packed_elem! {
    u8 => PackedByteArray, |v| Var::int(*v as i64);
    i32 => PackedInt32Array, |v| Var::int(*v as i64);
    i64 => PackedInt64Array, |v| Var::int(*v);
    f32 => PackedFloat32Array, |v| Var::float(*v as f64);
    f64 => PackedFloat64Array, |v| Var::float(*v);
    GStr => PackedStringArray, |v| Var::string(v.as_str());
    [f32; 2] => PackedVector2Array, |v| Var::vector2(*v);
}

pub(crate) fn new_packed<T: PackedElem>(items: Vec<T>) -> u64 {
    Box::into_raw(Box::new(items)) as u64
}

/// # Safety
/// `ptr` must point to a live packed array of element type `T`, and no other reference to its contents may exist
/// while the returned one is used.
#[allow(clippy::mut_from_ref)]
pub(crate) unsafe fn packed_at<'a, T: PackedElem>(ptr: *const c_void) -> &'a mut Vec<T> {
    &mut **(ptr as *const *mut Vec<T>)
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Operators

/// Engine `==`. Numbers compare across `int`/`float`; containers compare by content.
pub(crate) fn variant_eq(a: &Var, b: &Var) -> bool {
    use VariantType as T;

    match (a.ty(), b.ty()) {
        (T::Int, T::Float) | (T::Float, T::Int) => a.as_float() == b.as_float(),
        (T::Nil, T::Object) | (T::Object, T::Nil) => a.is_null_like() && b.is_null_like(),
        (ta, tb) if ta != tb => false,

        (T::Nil, _) => true,
        (T::Bool, _) | (T::Int, _) => a.0.data[0] == b.0.data[0],
        (T::Float, _) => a.as_float() == b.as_float(),
        (T::String, _) => a.as_str() == b.as_str(),
        (T::Vector2, _) => a.floats::<2>() == b.floats::<2>(),
        (T::Vector3, _) => a.floats::<3>() == b.floats::<3>(),
        (T::Color, _) => a.floats::<4>() == b.floats::<4>(),
        (T::Object, _) => a.0.data[0] == b.0.data[0] && a.object_id() == b.object_id(),
        (T::Callable, _) => a.0.data[0] == b.0.data[0],
        (T::Array, _) => {
            if a.0.data[0] == b.0.data[0] {
                return true;
            }

            // Snapshots avoid holding two array locks at once.
            let (lhs, rhs) = unsafe { (snapshot_array(a), snapshot_array(b)) };
            lhs.len() == rhs.len() && lhs.iter().zip(&rhs).all(|(x, y)| variant_eq(x, y))
        }
        (T::Dictionary, _) => {
            if a.0.data[0] == b.0.data[0] {
                return true;
            }

            let (lhs, rhs) = unsafe { (snapshot_dictionary(a), snapshot_dictionary(b)) };
            lhs.len() == rhs.len()
                && lhs.iter().all(|(key, value)| {
                    find_key(&rhs, key).is_some_and(|index| variant_eq(value, &rhs[index].1))
                })
        }
        // SAFETY: both payloads are live packed arrays of the same type.
        (ty, _) => dispatch_packed!(ty, |P| unsafe {
            packed_at::<P>(a.0.payload()) == packed_at::<P>(b.0.payload())
        }),
    }
}

/// Engine `<`, or `None` if the types are not ordered.
pub(crate) fn variant_less(a: &Var, b: &Var) -> Option<bool> {
    use VariantType as T;

    match (a.ty(), b.ty()) {
        (T::Int, T::Int) => Some((a.0.data[0] as i64) < (b.0.data[0] as i64)),
        (T::Int | T::Float, T::Int | T::Float) => Some(a.as_float()? < b.as_float()?),
        (T::Bool, T::Bool) => Some(a.0.data[0] < b.0.data[0]),
        (T::String, T::String) => Some(a.as_str()? < b.as_str()?),
        _ => None,
    }
}

unsafe fn snapshot_array(var: &Var) -> Vec<Var> {
    array_at(var.0.payload()).lock().clone()
}

unsafe fn snapshot_dictionary(var: &Var) -> Vec<(Var, Var)> {
    dictionary_at(var.0.payload()).lock().clone()
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Stringification

/// Text representation, as the engine's `str()` produces it.
pub(crate) fn stringify(var: &Var) -> String {
    use VariantType as T;

    match var.ty() {
        T::Nil => "<null>".to_string(),
        T::Bool => (var.0.data[0] != 0).to_string(),
        T::Int => (var.0.data[0] as i64).to_string(),
        T::Float => format_float(f64::from_bits(var.0.data[0])),
        T::String => var.as_str().unwrap_or_default().to_string(),
        T::Vector2 => format_floats(&var.floats::<2>()),
        T::Vector3 => format_floats(&var.floats::<3>()),
        T::Color => format_floats(&var.floats::<4>()),
        T::Object => {
            if var.0.data[0] == 0 {
                "<null>".to_string()
            } else if let Some(class) = objects::class_name_of_id(var.object_id()) {
                format!("<{class}#{}>", var.object_id())
            } else {
                "<Freed Object>".to_string()
            }
        }
        T::Callable => {
            if var.0.data[0] == 0 {
                "null::null".to_string()
            } else {
                "<CustomCallable>".to_string()
            }
        }
        T::Array => {
            // SAFETY: payload is a live array.
            let items = unsafe { snapshot_array(var) };
            format_list(items.iter())
        }
        T::Dictionary => {
            // SAFETY: payload is a live dictionary.
            let entries = unsafe { snapshot_dictionary(var) };
            if entries.is_empty() {
                return "{  }".to_string();
            }

            let parts: Vec<String> = entries
                .iter()
                .map(|(k, v)| format!("{}: {}", stringify_nested(k), stringify_nested(v)))
                .collect();
            format!("{{ {} }}", parts.join(", "))
        }
        // SAFETY: payload is a live packed array of the tagged type.
        ty => dispatch_packed!(ty, |P| unsafe {
            let items: Vec<Var> = packed_at::<P>(var.0.payload()).iter().map(P::to_var).collect();
            format_list(items.iter())
        }),
    }
}

/// Strings nested inside containers are quoted.
fn stringify_nested(var: &Var) -> String {
    match var.as_str() {
        Some(s) => format!("\"{s}\""),
        None => stringify(var),
    }
}

fn format_list<'a>(items: impl Iterator<Item = &'a Var>) -> String {
    let parts: Vec<String> = items.map(stringify_nested).collect();
    format!("[{}]", parts.join(", "))
}

fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

fn format_floats(values: &[f32]) -> String {
    let parts: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    format!("({})", parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_shows_type_tag() {
        assert_eq!(format!("{:?}", Var::int(3)), "Var(Int)");
        assert_eq!(format!("{:?}", Var::nil()), "Var(Nil)");
    }

    #[test]
    fn string_copies_are_independent() {
        let a = Var::string("hello");
        let b = a.clone();
        drop(a);

        assert_eq!(b.as_str(), Some("hello"));
    }

    #[test]
    fn arrays_share_contents() {
        let a = Var::array(vec![Var::int(1)]);
        let b = a.clone();

        unsafe { array_at(b.0.payload()).lock().push(Var::int(2)) };
        assert_eq!(stringify(&a), "[1, 2]");
    }

    #[test]
    fn packed_copies_are_deep() {
        let a = Var::packed(vec![1i64, 2, 3]);
        let b = a.clone();

        unsafe { packed_at::<i64>(b.0.payload()).push(4) };
        assert_eq!(stringify(&a), "[1, 2, 3]");
        assert_eq!(stringify(&b), "[1, 2, 3, 4]");
        assert!(!variant_eq(&a, &b));
    }

    #[test]
    fn numbers_compare_across_types() {
        assert!(variant_eq(&Var::int(2), &Var::float(2.0)));
        assert!(!variant_eq(&Var::int(2), &Var::string("2")));
        assert_eq!(variant_less(&Var::int(1), &Var::float(1.5)), Some(true));
        assert_eq!(variant_less(&Var::nil(), &Var::int(0)), None);
    }

    #[test]
    fn dictionary_keys_are_typed() {
        let entries = vec![(Var::int(1), Var::string("int")), (Var::float(1.0), Var::string("float"))];

        assert_eq!(find_key(&entries, &Var::float(1.0)), Some(1));
        assert_eq!(find_key(&entries, &Var::int(1)), Some(0));
        assert_eq!(find_key(&entries, &Var::bool(true)), None);
    }

    #[test]
    fn stringify_formats() {
        assert_eq!(stringify(&Var::float(2.0)), "2.0");
        assert_eq!(stringify(&Var::float(0.25)), "0.25");
        assert_eq!(stringify(&Var::vector2([1.0, 2.5])), "(1, 2.5)");
        assert_eq!(
            stringify(&Var::array(vec![Var::string("a"), Var::nil(), Var::bool(true)])),
            "[\"a\", <null>, true]"
        );
    }
}
