/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::builtin::*;
use crate::meta::error::{ConvertError, ErrorKind};
use crate::meta::{ffi_from_variant_via_table, ffi_to_variant_via_table, FromGodot, GodotConvert, GodotType, ToGodot};

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Engine types, represented as themselves

macro_rules! impl_godot_as_self {
    ($T:ty, $name:literal) => {
        impl GodotType for $T {
            fn godot_type_name() -> String {
                $name.to_string()
            }

            fn ffi_to_variant(&self) -> Variant {
                ffi_to_variant_via_table(self)
            }

            fn ffi_from_variant(variant: &Variant) -> Result<Self, ConvertError> {
                ffi_from_variant_via_table(variant)
            }
        }

        impl GodotConvert for $T {
            type Via = $T;
        }

        impl ToGodot for $T {
            #[inline]
            fn to_godot(&self) -> Self::Via {
                self.clone()
            }
        }

        impl FromGodot for $T {
            #[inline]
            fn try_from_godot(via: Self::Via) -> Result<Self, ConvertError> {
                Ok(via)
            }
        }
    };
}

impl_godot_as_self!(bool, "bool");
impl_godot_as_self!(i64, "int");
impl_godot_as_self!(f64, "float");
impl_godot_as_self!(GString, "String");
impl_godot_as_self!(Vector2, "Vector2");
impl_godot_as_self!(Vector3, "Vector3");
impl_godot_as_self!(Color, "Color");
impl_godot_as_self!(Callable, "Callable");
impl_godot_as_self!(Array, "Array");
impl_godot_as_self!(Dictionary, "Dictionary");

impl<T: PackedArrayElement> GodotType for PackedArray<T> {
    fn godot_type_name() -> String {
        T::ARRAY_TYPE.name().to_string()
    }

    fn ffi_to_variant(&self) -> Variant {
        ffi_to_variant_via_table(self)
    }

    fn ffi_from_variant(variant: &Variant) -> Result<Self, ConvertError> {
        ffi_from_variant_via_table(variant)
    }
}

impl<T: PackedArrayElement> GodotConvert for PackedArray<T> {
    type Via = Self;
}

impl<T: PackedArrayElement> ToGodot for PackedArray<T> {
    fn to_godot(&self) -> Self::Via {
        self.clone()
    }
}

impl<T: PackedArrayElement> FromGodot for PackedArray<T> {
    fn try_from_godot(via: Self::Via) -> Result<Self, ConvertError> {
        Ok(via)
    }
}

// Variant holds every other type; conversion is a copy.
impl GodotType for Variant {
    fn godot_type_name() -> String {
        "Variant".to_string()
    }

    fn ffi_to_variant(&self) -> Variant {
        self.clone()
    }

    fn ffi_from_variant(variant: &Variant) -> Result<Self, ConvertError> {
        Ok(variant.clone())
    }
}

impl GodotConvert for Variant {
    type Via = Variant;
}

impl ToGodot for Variant {
    fn to_godot(&self) -> Self::Via {
        self.clone()
    }

    fn to_variant(&self) -> Variant {
        self.clone()
    }
}

impl FromGodot for Variant {
    fn try_from_godot(via: Self::Via) -> Result<Self, ConvertError> {
        Ok(via)
    }
}

// Void return of a method.
impl GodotType for () {
    fn godot_type_name() -> String {
        "void".to_string()
    }

    fn ffi_to_variant(&self) -> Variant {
        Variant::nil()
    }

    fn ffi_from_variant(_variant: &Variant) -> Result<Self, ConvertError> {
        Ok(())
    }
}

impl GodotConvert for () {
    type Via = ();
}

impl ToGodot for () {
    fn to_godot(&self) -> Self::Via {}
}

impl FromGodot for () {
    fn try_from_godot(_via: Self::Via) -> Result<Self, ConvertError> {
        Ok(())
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Host types with a different engine representation

macro_rules! impl_godot_as_i64 {
    ($($T:ty),+) => {
        $(
            impl GodotConvert for $T {
                type Via = i64;
            }

            impl ToGodot for $T {
                #[inline]
                fn to_godot(&self) -> Self::Via {
                    i64::from(*self)
                }
            }

            impl FromGodot for $T {
                #[inline]
                fn try_from_godot(via: Self::Via) -> Result<Self, ConvertError> {
                    <$T>::try_from(via).map_err(|_| {
                        ConvertError::with_kind_value(
                            ErrorKind::IntOutOfRange { target: stringify!($T) },
                            via,
                        )
                    })
                }
            }
        )+
    };
}

impl_godot_as_i64!(i8, i16, i32, u8, u16, u32);

// The engine stores 64-bit unsigned values (e.g. instance IDs) as the same bits in a signed integer.
impl GodotConvert for u64 {
    type Via = i64;
}

impl ToGodot for u64 {
    fn to_godot(&self) -> Self::Via {
        *self as i64
    }
}

impl FromGodot for u64 {
    fn try_from_godot(via: Self::Via) -> Result<Self, ConvertError> {
        Ok(via as u64)
    }
}

impl GodotConvert for f32 {
    type Via = f64;
}

impl ToGodot for f32 {
    fn to_godot(&self) -> Self::Via {
        f64::from(*self)
    }
}

impl FromGodot for f32 {
    fn try_from_godot(via: Self::Via) -> Result<Self, ConvertError> {
        Ok(via as f32)
    }
}

// Host strings travel as `GString`.
impl GodotConvert for String {
    type Via = GString;
}

impl ToGodot for String {
    fn to_godot(&self) -> Self::Via {
        GString::from(self.as_str())
    }
}

impl FromGodot for String {
    fn try_from_godot(via: Self::Via) -> Result<Self, ConvertError> {
        Ok(via.to_string())
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Raw pointers of in/out parameters

// Ptrcalls pass the address itself. In variants, the address is stored as an int.
macro_rules! impl_godot_as_pointer {
    ($($Ptr:ty => $name:literal),+ $(,)?) => {
        $(
            impl GodotType for $Ptr {
                fn godot_type_name() -> String {
                    $name.to_string()
                }

                fn ffi_to_variant(&self) -> Variant {
                    (*self as i64).to_variant()
                }

                fn ffi_from_variant(variant: &Variant) -> Result<Self, ConvertError> {
                    let address = i64::ffi_from_variant(variant)?;
                    Ok(address as $Ptr)
                }
            }

            impl GodotConvert for $Ptr {
                type Via = $Ptr;
            }

            impl ToGodot for $Ptr {
                fn to_godot(&self) -> Self::Via {
                    *self
                }
            }

            impl FromGodot for $Ptr {
                fn try_from_godot(via: Self::Via) -> Result<Self, ConvertError> {
                    Ok(via)
                }
            }
        )+
    };
}

impl_godot_as_pointer!(
    *mut f32 => "float*",
    *const f32 => "const float*",
    *mut f64 => "double*",
    *const f64 => "const double*",
    *mut i32 => "int32_t*",
    *const i32 => "const int32_t*",
    *mut i64 => "int64_t*",
    *const i64 => "const int64_t*",
    *mut u8 => "uint8_t*",
    *const u8 => "const uint8_t*",
);

// ----------------------------------------------------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_range_is_checked() {
        assert_eq!(i8::try_from_godot(-128).ok(), Some(i8::MIN));
        assert_eq!(u32::try_from_godot(u32::MAX as i64).ok(), Some(u32::MAX));

        let err = u8::try_from_godot(256).expect_err("256 does not fit into u8");
        assert_eq!(err.kind(), &ErrorKind::IntOutOfRange { target: "u8" });
        assert_eq!(err.to_string(), "integer out of range for u8: 256");

        assert!(i32::try_from_godot(i64::MIN).is_err());
        assert!(u16::try_from_godot(-1).is_err());
    }

    #[test]
    fn u64_keeps_bits() {
        let id = u64::MAX - 5;
        assert_eq!(u64::try_from_godot(id.to_godot()).ok(), Some(id));
    }

    #[test]
    fn f32_widens() {
        assert_eq!(1.5_f32.to_godot(), 1.5_f64);
        assert_eq!(f32::try_from_godot(0.25).ok(), Some(0.25_f32));
    }
}
