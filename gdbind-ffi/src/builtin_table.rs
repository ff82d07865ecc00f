/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Function tables for builtin (non-object) types: lifecycle operations and a fixed set of builtin methods.

use crate as sys;
use crate::{GDExtensionInterface, VariantType};
use std::ffi::c_char;

pub type PtrConstructorFn =
    unsafe extern "C" fn(p_base: sys::GDExtensionUninitializedTypePtr, p_args: *const sys::GDExtensionConstTypePtr);
pub type PtrDestructorFn = unsafe extern "C" fn(p_base: sys::GDExtensionTypePtr);
pub type ToVariantFn = unsafe extern "C" fn(r_dest: sys::GDExtensionUninitializedVariantPtr, p_src: sys::GDExtensionTypePtr);
pub type FromVariantFn =
    unsafe extern "C" fn(r_dest: sys::GDExtensionUninitializedTypePtr, p_src: sys::GDExtensionVariantPtr);
pub type BuiltinMethodBind = unsafe extern "C" fn(
    p_base: sys::GDExtensionTypePtr,
    p_args: *const sys::GDExtensionConstTypePtr,
    r_return: sys::GDExtensionTypePtr,
    p_argument_count: i32,
);

const ORDS: usize = VariantType::MAX_ORD;

/// Per-type constructors, destructors and variant conversions.
///
/// Indexed by variant type ordinal. Constructors and destructors exist only for types with engine-managed memory;
/// variant conversions exist for every type except `Nil`.
pub struct BuiltinLifecycleTable {
    construct_default: [Option<PtrConstructorFn>; ORDS],
    construct_copy: [Option<PtrConstructorFn>; ORDS],
    destroy: [Option<PtrDestructorFn>; ORDS],
    to_variant: [Option<ToVariantFn>; ORDS],
    from_variant: [Option<FromVariantFn>; ORDS],
}

impl BuiltinLifecycleTable {
    /// # Safety
    /// `interface` must be fully loaded (no missing functions).
    pub unsafe fn load(interface: &GDExtensionInterface) -> Self {
        let get_ctor = validate(interface.variant_get_ptr_constructor, "variant_get_ptr_constructor");
        let get_dtor = validate(interface.variant_get_ptr_destructor, "variant_get_ptr_destructor");
        let get_to_variant = validate(
            interface.get_variant_from_type_constructor,
            "get_variant_from_type_constructor",
        );
        let get_from_variant = validate(
            interface.get_variant_to_type_constructor,
            "get_variant_to_type_constructor",
        );

        let mut table = Self {
            construct_default: [None; ORDS],
            construct_copy: [None; ORDS],
            destroy: [None; ORDS],
            to_variant: [None; ORDS],
            from_variant: [None; ORDS],
        };

        for ty in VariantType::ALL {
            if ty == VariantType::Nil {
                continue;
            }

            let name = ty.name();
            let ord = ty.ord();
            table.to_variant[ord] = Some(validate(get_to_variant(ty.sys()), &format!("{name} -> Variant")));
            table.from_variant[ord] = Some(validate(get_from_variant(ty.sys()), &format!("Variant -> {name}")));

            if ty.has_managed_memory() {
                table.construct_default[ord] = Some(validate(get_ctor(ty.sys(), 0), &format!("{name}::new")));
                table.construct_copy[ord] = Some(validate(get_ctor(ty.sys(), 1), &format!("{name}::clone")));
                table.destroy[ord] = Some(validate(get_dtor(ty.sys()), &format!("{name}::drop")));
            }
        }

        table
    }

    #[track_caller]
    pub fn default_constructor(&self, ty: VariantType) -> PtrConstructorFn {
        present(self.construct_default[ty.ord()], ty, "default constructor")
    }

    #[track_caller]
    pub fn copy_constructor(&self, ty: VariantType) -> PtrConstructorFn {
        present(self.construct_copy[ty.ord()], ty, "copy constructor")
    }

    #[track_caller]
    pub fn destructor(&self, ty: VariantType) -> PtrDestructorFn {
        present(self.destroy[ty.ord()], ty, "destructor")
    }

    #[track_caller]
    pub fn to_variant(&self, ty: VariantType) -> ToVariantFn {
        present(self.to_variant[ty.ord()], ty, "to-variant conversion")
    }

    #[track_caller]
    pub fn from_variant(&self, ty: VariantType) -> FromVariantFn {
        present(self.from_variant[ty.ord()], ty, "from-variant conversion")
    }
}

#[track_caller]
fn present<F>(function: Option<F>, ty: VariantType, what: &str) -> F {
    function.unwrap_or_else(|| panic!("builtin type {} has no {what}", ty.name()))
}

pub(crate) fn validate<F>(function: Option<F>, description: &str) -> F {
    function.unwrap_or_else(|| {
        panic!(
            "failed to load builtin function {description}.{}",
            sys::toolbox::COMPAT_INFO
        )
    })
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Builtin methods

macro_rules! builtin_method_table {
    (
        $(
            $field:ident: $Type:ident . $method:literal, $hash:literal;
        )*
    ) => {
        /// Methods on builtin types that the marshaling layer calls directly.
        pub struct BuiltinMethodTable {
            $( pub $field: BuiltinMethodBind, )*
        }

        impl BuiltinMethodTable {
            /// # Safety
            /// `interface` must be fully loaded (no missing functions).
            pub unsafe fn load(interface: &GDExtensionInterface) -> Self {
                let get_method = validate(interface.variant_get_ptr_builtin_method, "variant_get_ptr_builtin_method");

                Self {
                    $(
                        $field: {
                            sys::out!("Load builtin method {}::{} (hash {})...", stringify!($Type), $method, $hash as i64);

                            let name = concat!($method, "\0").as_ptr() as *const c_char;
                            let method = get_method(VariantType::$Type.sys(), name, $hash);
                            validate(method, concat!(stringify!($Type), "::", $method))
                        },
                    )*
                }
            }

            /// `(type, method, hash)` of every entry, in declaration order.
            pub const ENTRIES: &'static [(VariantType, &'static str, i64)] = &[
                $( (VariantType::$Type, $method, $hash), )*
            ];
        }
    };
}

builtin_method_table! {
    array_size: Array."size", 3173160232;
    array_push_back: Array."push_back", 3316032543;
    array_pop_back: Array."pop_back", 1321915136;
    array_clear: Array."clear", 3218959716;

    dictionary_size: Dictionary."size", 3173160232;
    dictionary_has: Dictionary."has", 3680194679;
    dictionary_erase: Dictionary."erase", 1776646889;
    dictionary_keys: Dictionary."keys", 4144163970;
    dictionary_clear: Dictionary."clear", 3218959716;

    string_length: String."length", 3173160232;

    callable_callv: Callable."callv", 413578926;
    callable_is_valid: Callable."is_valid", 3918633141;

    packed_byte_array_size: PackedByteArray."size", 3173160232;
    packed_byte_array_resize: PackedByteArray."resize", 848867239;
    packed_int32_array_size: PackedInt32Array."size", 3173160232;
    packed_int32_array_resize: PackedInt32Array."resize", 848867239;
    packed_int64_array_size: PackedInt64Array."size", 3173160232;
    packed_int64_array_resize: PackedInt64Array."resize", 848867239;
    packed_float32_array_size: PackedFloat32Array."size", 3173160232;
    packed_float32_array_resize: PackedFloat32Array."resize", 848867239;
    packed_float64_array_size: PackedFloat64Array."size", 3173160232;
    packed_float64_array_resize: PackedFloat64Array."resize", 848867239;
    packed_string_array_size: PackedStringArray."size", 3173160232;
    packed_string_array_resize: PackedStringArray."resize", 848867239;
    packed_vector2_array_size: PackedVector2Array."size", 3173160232;
    packed_vector2_array_resize: PackedVector2Array."resize", 848867239;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_are_distinct() {
        let entries = BuiltinMethodTable::ENTRIES;
        for (i, a) in entries.iter().enumerate() {
            for b in &entries[i + 1..] {
                assert!((a.0, a.1) != (b.0, b.1), "duplicate builtin method {}::{}", a.0.name(), a.1);
            }
        }

        assert!(entries.iter().all(|(ty, _, _)| ty.has_managed_memory()));
    }
}
