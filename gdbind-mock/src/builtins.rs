/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Builtin type entry points: variant conversions, constructors, destructors, builtin methods and indexing.

use std::ffi::c_void;
use std::ptr;

use gdbind_ffi as sys;
use sys::VariantType;

use crate::audit::report_error;
use crate::methods::{PtrArgs, PtrRet};
use crate::objects;
use crate::variant::{self, GStr, PackedElem, Var};

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Lifecycle

unsafe extern "C" fn to_variant<const TY: i32>(r_dest: sys::GDExtensionUninitializedVariantPtr, p_src: sys::GDExtensionTypePtr) {
    Var::from_native(VariantType::from_sys(TY), p_src).write_into(r_dest);
}

unsafe extern "C" fn from_variant<const TY: i32>(
    r_dest: sys::GDExtensionUninitializedTypePtr,
    p_src: sys::GDExtensionVariantPtr,
) {
    let ty = VariantType::from_sys(TY);
    let src = Var::borrow(p_src);

    match (src.ty(), ty) {
        (actual, expected) if actual == expected => src.write_native(r_dest),
        (VariantType::Int, VariantType::Float) => ptr::write(r_dest as *mut f64, src.as_float().unwrap_or_default()),
        (VariantType::Nil, VariantType::Object) => ptr::write(r_dest as *mut objects::ObjPtr, ptr::null_mut()),
        (actual, expected) => {
            report_error(format!(
                "variant_to_type: cannot convert {} to {}",
                actual.name(),
                expected.name()
            ));
            variant::default_native(expected, r_dest);
        }
    }
}

unsafe extern "C" fn construct_default<const TY: i32>(
    p_base: sys::GDExtensionUninitializedTypePtr,
    _p_args: *const sys::GDExtensionConstTypePtr,
) {
    variant::default_native(VariantType::from_sys(TY), p_base);
}

unsafe extern "C" fn construct_copy<const TY: i32>(
    p_base: sys::GDExtensionUninitializedTypePtr,
    p_args: *const sys::GDExtensionConstTypePtr,
) {
    variant::copy_native(VariantType::from_sys(TY), p_base, *p_args);
}

unsafe extern "C" fn destroy<const TY: i32>(p_base: sys::GDExtensionTypePtr) {
    variant::destroy_native(VariantType::from_sys(TY), p_base);
}

pub(crate) struct Lifecycle {
    pub to_variant: sys::GDExtensionVariantFromTypeConstructorFunc,
    pub from_variant: sys::GDExtensionTypeFromVariantConstructorFunc,
    pub construct_default: sys::GDExtensionPtrConstructor,
    pub construct_copy: sys::GDExtensionPtrConstructor,
    pub destroy: sys::GDExtensionPtrDestructor,
}

const fn lifecycle<const TY: i32>(managed: bool) -> Lifecycle {
    Lifecycle {
        to_variant: Some(to_variant::<TY>),
        from_variant: Some(from_variant::<TY>),
        construct_default: if managed { Some(construct_default::<TY>) } else { None },
        construct_copy: if managed { Some(construct_copy::<TY>) } else { None },
        destroy: if managed { Some(destroy::<TY>) } else { None },
    }
}

macro_rules! lifecycle_match {
    ($ty:expr; $( $Variant:ident ),* $(,)?) => {
        match $ty {
            VariantType::Nil => None,
            $(
                VariantType::$Variant => Some(lifecycle::<{ VariantType::$Variant as i32 }>(
                    VariantType::$Variant.has_managed_memory(),
                )),
            )*
        }
    };
}

/// Lifecycle functions of a builtin type; `None` for `Nil`. Constructors and destructors are only provided for
/// types with managed memory, matching what the engine exposes.
pub(crate) fn lifecycle_of(ty: VariantType) -> Option<Lifecycle> {
    lifecycle_match!(ty;
        Bool, Int, Float, String, Vector2, Vector3, Color, Object, Callable, Dictionary, Array,
        PackedByteArray, PackedInt32Array, PackedInt64Array, PackedFloat32Array, PackedFloat64Array,
        PackedStringArray, PackedVector2Array,
    )
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Builtin methods

type BuiltinFn = unsafe extern "C" fn(
    p_base: sys::GDExtensionTypePtr,
    p_args: *const sys::GDExtensionConstTypePtr,
    r_return: sys::GDExtensionTypePtr,
    p_argument_count: i32,
);

unsafe extern "C" fn array_size(base: sys::GDExtensionTypePtr, _args: *const sys::GDExtensionConstTypePtr, ret: sys::GDExtensionTypePtr, _argc: i32) {
    let len = variant::array_at(base).lock().len();
    ptr::write(ret as *mut i64, len as i64);
}

unsafe extern "C" fn array_push_back(base: sys::GDExtensionTypePtr, args: *const sys::GDExtensionConstTypePtr, _ret: sys::GDExtensionTypePtr, _argc: i32) {
    let value = Var::borrow(*args).clone();
    variant::array_at(base).lock().push(value);
}

unsafe extern "C" fn array_pop_back(base: sys::GDExtensionTypePtr, _args: *const sys::GDExtensionConstTypePtr, ret: sys::GDExtensionTypePtr, _argc: i32) {
    let popped = variant::array_at(base).lock().pop();
    if popped.is_none() {
        report_error("Array::pop_back: can't pop an element from an empty array");
    }

    popped.unwrap_or_else(Var::nil).write_into(ret);
}

unsafe extern "C" fn array_clear(base: sys::GDExtensionTypePtr, _args: *const sys::GDExtensionConstTypePtr, _ret: sys::GDExtensionTypePtr, _argc: i32) {
    // Elements may hold the last reference to an object; they are released after the lock.
    let items = std::mem::take(&mut *variant::array_at(base).lock());
    drop(items);
}

unsafe extern "C" fn dictionary_size(base: sys::GDExtensionTypePtr, _args: *const sys::GDExtensionConstTypePtr, ret: sys::GDExtensionTypePtr, _argc: i32) {
    let len = variant::dictionary_at(base).lock().len();
    ptr::write(ret as *mut i64, len as i64);
}

unsafe extern "C" fn dictionary_has(base: sys::GDExtensionTypePtr, args: *const sys::GDExtensionConstTypePtr, ret: sys::GDExtensionTypePtr, _argc: i32) {
    let key = Var::borrow(*args);
    let found = variant::find_key(&variant::dictionary_at(base).lock(), key).is_some();
    ptr::write(ret as *mut u8, found as u8);
}

unsafe extern "C" fn dictionary_erase(base: sys::GDExtensionTypePtr, args: *const sys::GDExtensionConstTypePtr, ret: sys::GDExtensionTypePtr, _argc: i32) {
    let key = Var::borrow(*args);
    let removed = {
        let mut entries = variant::dictionary_at(base).lock();
        variant::find_key(&entries, key).map(|index| entries.remove(index))
    };

    ptr::write(ret as *mut u8, removed.is_some() as u8);
}

unsafe extern "C" fn dictionary_keys(base: sys::GDExtensionTypePtr, _args: *const sys::GDExtensionConstTypePtr, ret: sys::GDExtensionTypePtr, _argc: i32) {
    let keys: Vec<Var> = variant::dictionary_at(base)
        .lock()
        .iter()
        .map(|(key, _)| key.clone())
        .collect();

    ptr::write(ret as *mut u64, variant::new_array(keys));
}

unsafe extern "C" fn dictionary_clear(base: sys::GDExtensionTypePtr, _args: *const sys::GDExtensionConstTypePtr, _ret: sys::GDExtensionTypePtr, _argc: i32) {
    let entries = std::mem::take(&mut *variant::dictionary_at(base).lock());
    drop(entries);
}

unsafe extern "C" fn string_length(base: sys::GDExtensionTypePtr, _args: *const sys::GDExtensionConstTypePtr, ret: sys::GDExtensionTypePtr, _argc: i32) {
    let chars = variant::string_at(base).chars().count();
    ptr::write(ret as *mut i64, chars as i64);
}

unsafe extern "C" fn callable_callv(base: sys::GDExtensionTypePtr, args: *const sys::GDExtensionConstTypePtr, ret: sys::GDExtensionTypePtr, _argc: i32) {
    let Some(callable) = variant::callable_at(base) else {
        report_error("Callable::callv: can't call an invalid callable");
        Var::nil().write_into(ret);
        return;
    };

    // Snapshot, so the callee may modify the array it was called with.
    let call_args: Vec<Var> = variant::array_at(*args).lock().clone();
    let arg_ptrs: Vec<*const c_void> = call_args.iter().map(|v| v as *const Var as *const c_void).collect();

    let result = match callable.call(&arg_ptrs) {
        Ok(value) => value,
        Err(err) => {
            report_error(format!("Callable::callv: call failed with call error {}", err.error));
            Var::nil()
        }
    };

    result.write_into(ret);
}

unsafe extern "C" fn callable_is_valid(base: sys::GDExtensionTypePtr, _args: *const sys::GDExtensionConstTypePtr, ret: sys::GDExtensionTypePtr, _argc: i32) {
    let valid = !(*(base as *const *const c_void)).is_null();
    ptr::write(ret as *mut u8, valid as u8);
}

unsafe extern "C" fn packed_size<T: PackedElem>(base: sys::GDExtensionTypePtr, _args: *const sys::GDExtensionConstTypePtr, ret: sys::GDExtensionTypePtr, _argc: i32) {
    let len = variant::packed_at::<T>(base).len();
    ptr::write(ret as *mut i64, len as i64);
}

/// Returns an engine `Error` code: `ERR_INVALID_PARAMETER` for negative sizes.
unsafe extern "C" fn packed_resize<T: PackedElem>(base: sys::GDExtensionTypePtr, args: *const sys::GDExtensionConstTypePtr, ret: sys::GDExtensionTypePtr, _argc: i32) {
    let new_size = PtrArgs::new(args).int(0);

    let code = match usize::try_from(new_size) {
        Ok(new_size) => {
            variant::packed_at::<T>(base).resize(new_size, T::default());
            objects::OK
        }
        Err(_) => {
            report_error(format!("{}::resize: size {new_size} is negative", T::TYPE.name()));
            objects::ERR_INVALID_PARAMETER
        }
    };

    PtrRet::new(ret).int(code);
}

struct BuiltinMethod {
    ty: VariantType,
    name: &'static str,
    hash: i64,
    func: BuiltinFn,
}

macro_rules! builtin_methods {
    ( $( $Type:ident . $name:literal, $hash:literal => $func:expr; )* ) => {
        &[ $( BuiltinMethod { ty: VariantType::$Type, name: $name, hash: $hash, func: $func }, )* ]
    };
}

static BUILTIN_METHODS: &[BuiltinMethod] = builtin_methods! {
    Array."size", 3173160232 => array_size;
    Array."push_back", 3316032543 => array_push_back;
    Array."pop_back", 1321915136 => array_pop_back;
    Array."clear", 3218959716 => array_clear;

    Dictionary."size", 3173160232 => dictionary_size;
    Dictionary."has", 3680194679 => dictionary_has;
    Dictionary."erase", 1776646889 => dictionary_erase;
    Dictionary."keys", 4144163970 => dictionary_keys;
    Dictionary."clear", 3218959716 => dictionary_clear;

    String."length", 3173160232 => string_length;

    Callable."callv", 413578926 => callable_callv;
    Callable."is_valid", 3918633141 => callable_is_valid;

    PackedByteArray."size", 3173160232 => packed_size::<u8>;
    PackedByteArray."resize", 848867239 => packed_resize::<u8>;
    PackedInt32Array."size", 3173160232 => packed_size::<i32>;
    PackedInt32Array."resize", 848867239 => packed_resize::<i32>;
    PackedInt64Array."size", 3173160232 => packed_size::<i64>;
    PackedInt64Array."resize", 848867239 => packed_resize::<i64>;
    PackedFloat32Array."size", 3173160232 => packed_size::<f32>;
    PackedFloat32Array."resize", 848867239 => packed_resize::<f32>;
    PackedFloat64Array."size", 3173160232 => packed_size::<f64>;
    PackedFloat64Array."resize", 848867239 => packed_resize::<f64>;
    PackedStringArray."size", 3173160232 => packed_size::<GStr>;
    PackedStringArray."resize", 848867239 => packed_resize::<GStr>;
    PackedVector2Array."size", 3173160232 => packed_size::<[f32; 2]>;
    PackedVector2Array."resize", 848867239 => packed_resize::<[f32; 2]>;
};

/// Looks up a builtin method by type, name and hash. A known method with a different hash is reported.
pub(crate) fn find_builtin_method(ty: VariantType, name: &str, hash: i64) -> sys::GDExtensionPtrBuiltInMethod {
    let mut candidates = BUILTIN_METHODS.iter().filter(|m| m.ty == ty && m.name == name).peekable();
    if candidates.peek().is_none() {
        report_error(format!("variant_get_ptr_builtin_method: {}::{name} does not exist", ty.name()));
        return None;
    }

    match candidates.find(|m| m.hash == hash) {
        Some(method) => Some(method.func),
        None => {
            report_error(format!(
                "variant_get_ptr_builtin_method: {}::{name} has no variant with hash {hash}",
                ty.name()
            ));
            None
        }
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Indexing

/// Resolves a possibly negative index; reports and returns `None` if out of bounds.
fn resolve_index(what: &str, index: i64, len: usize) -> Option<usize> {
    let len_i = len as i64;
    let resolved = if index < 0 { index + len_i } else { index };

    if (0..len_i).contains(&resolved) {
        Some(resolved as usize)
    } else {
        report_error(format!("{what}: index {index} is out of bounds (size {len})"));
        None
    }
}

pub(crate) unsafe fn array_index(base: sys::GDExtensionTypePtr, index: i64) -> sys::GDExtensionVariantPtr {
    let mut items = variant::array_at(base).lock();
    match resolve_index("Array::operator[]", index, items.len()) {
        // Element addresses stay valid as long as the array is not resized.
        Some(i) => &mut items[i] as *mut Var as sys::GDExtensionVariantPtr,
        None => ptr::null_mut(),
    }
}

/// Returns the value slot for `key`, inserting `nil` if the key is absent.
pub(crate) unsafe fn dictionary_index(
    base: sys::GDExtensionTypePtr,
    key: sys::GDExtensionConstVariantPtr,
) -> sys::GDExtensionVariantPtr {
    let key = Var::borrow(key);
    let mut entries = variant::dictionary_at(base).lock();

    let index = match variant::find_key(&entries, key) {
        Some(index) => index,
        None => {
            entries.push((key.clone(), Var::nil()));
            entries.len() - 1
        }
    };

    &mut entries[index].1 as *mut Var as sys::GDExtensionVariantPtr
}

pub(crate) unsafe fn packed_index<T: PackedElem>(base: sys::GDExtensionTypePtr, index: i64) -> *mut T {
    let items = variant::packed_at::<T>(base);
    let what = format!("{}::operator[]", T::TYPE.name());

    match resolve_index(&what, index, items.len()) {
        Some(i) => &mut items[i] as *mut T,
        None => ptr::null_mut(),
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Callables

pub(crate) unsafe fn callable_custom_create(
    r_callable: sys::GDExtensionUninitializedTypePtr,
    info: *mut sys::GDExtensionCallableCustomInfo,
) {
    if info.is_null() {
        report_error("callable_custom_create: info is null");
        ptr::write(r_callable as *mut [u64; 2], [0, 0]);
        return;
    }

    ptr::write(r_callable as *mut [u64; 2], variant::new_callable(*info));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_matches_managed_memory() {
        assert!(lifecycle_of(VariantType::Nil).is_none());

        let int = lifecycle_of(VariantType::Int).expect("int");
        assert!(int.to_variant.is_some() && int.from_variant.is_some());
        assert!(int.construct_default.is_none() && int.destroy.is_none());

        let packed = lifecycle_of(VariantType::PackedStringArray).expect("packed");
        assert!(packed.construct_default.is_some());
        assert!(packed.construct_copy.is_some());
        assert!(packed.destroy.is_some());
    }

    #[test]
    fn every_table_entry_resolves() {
        for &(ty, name, hash) in sys::BuiltinMethodTable::ENTRIES {
            assert!(find_builtin_method(ty, name, hash).is_some(), "{}::{name}", ty.name());
        }

        assert!(find_builtin_method(VariantType::Array, "size", 1).is_none());
    }

    #[test]
    fn packed_resize_rejects_negative_size() {
        let mut slot = [variant::new_packed(vec![1i64, 2]), 0u64];
        let base = slot.as_mut_ptr() as sys::GDExtensionTypePtr;

        let mut code = 0i64;
        let new_size = -1i64;
        let args = [&new_size as *const i64 as sys::GDExtensionConstTypePtr];
        unsafe {
            packed_resize::<i64>(base, args.as_ptr(), &mut code as *mut i64 as sys::GDExtensionTypePtr, 1);
        }

        assert_eq!(code, objects::ERR_INVALID_PARAMETER);
        assert_eq!(unsafe { variant::packed_at::<i64>(base) }.len(), 2);

        unsafe { variant::destroy_native(VariantType::PackedInt64Array, base) };
    }

    #[test]
    fn dictionary_index_inserts_nil() {
        let mut slot = variant::new_dictionary();
        let base = &mut slot as *mut u64 as sys::GDExtensionTypePtr;
        let key = Var::string("missing");

        let value = unsafe { dictionary_index(base, &key as *const Var as sys::GDExtensionConstVariantPtr) };
        assert_eq!(unsafe { Var::borrow(value) }.ty(), VariantType::Nil);
        assert_eq!(unsafe { variant::dictionary_at(base) }.lock().len(), 1);

        unsafe { variant::destroy_native(VariantType::Dictionary, base) };
    }
}
