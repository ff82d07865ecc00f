/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::GDExtensionVariantType;

/// Dynamic type tag of a `Variant`.
///
/// Discriminants follow the engine's numbering, so gaps are expected.
#[repr(i32)]
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub enum VariantType {
    #[default]
    Nil = 0,
    Bool = 1,
    Int = 2,
    Float = 3,
    String = 4,
    Vector2 = 5,
    Vector3 = 9,
    Color = 20,
    Object = 24,
    Callable = 25,
    Dictionary = 27,
    Array = 28,
    PackedByteArray = 29,
    PackedInt32Array = 30,
    PackedInt64Array = 31,
    PackedFloat32Array = 32,
    PackedFloat64Array = 33,
    PackedStringArray = 34,
    PackedVector2Array = 35,
}

impl VariantType {
    /// Every supported type, in discriminant order.
    pub const ALL: [VariantType; 19] = [
        Self::Nil,
        Self::Bool,
        Self::Int,
        Self::Float,
        Self::String,
        Self::Vector2,
        Self::Vector3,
        Self::Color,
        Self::Object,
        Self::Callable,
        Self::Dictionary,
        Self::Array,
        Self::PackedByteArray,
        Self::PackedInt32Array,
        Self::PackedInt64Array,
        Self::PackedFloat32Array,
        Self::PackedFloat64Array,
        Self::PackedStringArray,
        Self::PackedVector2Array,
    ];

    /// Upper bound (exclusive) for the discriminant; used to size lookup tables.
    pub const MAX_ORD: usize = 38;

    pub fn try_from_sys(ty: GDExtensionVariantType) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.sys() == ty)
    }

    #[track_caller]
    pub fn from_sys(ty: GDExtensionVariantType) -> Self {
        Self::try_from_sys(ty).unwrap_or_else(|| panic!("unknown variant type ordinal {ty}"))
    }

    pub fn sys(self) -> GDExtensionVariantType {
        self as GDExtensionVariantType
    }

    pub fn ord(self) -> usize {
        self as usize
    }

    /// Whether values of this type own engine-side memory, requiring copy constructors and destructors.
    pub fn has_managed_memory(self) -> bool {
        matches!(
            self,
            Self::String
                | Self::Callable
                | Self::Dictionary
                | Self::Array
                | Self::PackedByteArray
                | Self::PackedInt32Array
                | Self::PackedInt64Array
                | Self::PackedFloat32Array
                | Self::PackedFloat64Array
                | Self::PackedStringArray
                | Self::PackedVector2Array
        )
    }

    pub fn is_packed_array(self) -> bool {
        self as i32 >= Self::PackedByteArray as i32
    }

    /// Name as it appears in the class database.
    pub fn name(self) -> &'static str {
        match self {
            Self::Nil => "Nil",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::String => "String",
            Self::Vector2 => "Vector2",
            Self::Vector3 => "Vector3",
            Self::Color => "Color",
            Self::Object => "Object",
            Self::Callable => "Callable",
            Self::Dictionary => "Dictionary",
            Self::Array => "Array",
            Self::PackedByteArray => "PackedByteArray",
            Self::PackedInt32Array => "PackedInt32Array",
            Self::PackedInt64Array => "PackedInt64Array",
            Self::PackedFloat32Array => "PackedFloat32Array",
            Self::PackedFloat64Array => "PackedFloat64Array",
            Self::PackedStringArray => "PackedStringArray",
            Self::PackedVector2Array => "PackedVector2Array",
        }
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------

/// How a value is laid out inside a call-frame slot.
///
/// Recorded for every argument pushed into a [`CallFrame`](crate::CallFrame) and for every parameter of a method bind,
/// so both sides can be compared before a call crosses the boundary.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ArgKind {
    /// Plain value stored inline: `bool`, `int`, `float`, vectors, colors.
    Primitive(VariantType),

    /// Engine-managed opaque value: `String`, `Array`, `Dictionary`, `Callable`.
    Builtin(VariantType),

    PackedArray(VariantType),

    /// Object pointer, possibly null.
    Object,

    /// Full 24-byte `Variant`.
    Variant,

    /// Raw native pointer used by in/out parameters.
    Pointer,
}

impl ArgKind {
    /// Number of bytes the engine reads or writes for this kind.
    pub const fn native_size(self) -> usize {
        match self {
            ArgKind::Primitive(VariantType::Bool) => 1,
            ArgKind::Primitive(VariantType::Vector2) => 8,
            ArgKind::Primitive(VariantType::Vector3) => 12,
            ArgKind::Primitive(VariantType::Color) => 16,
            ArgKind::Primitive(_) => 8,
            ArgKind::Builtin(VariantType::Callable) => 16,
            ArgKind::Builtin(_) => 8,
            ArgKind::PackedArray(_) => 16,
            ArgKind::Object | ArgKind::Pointer => 8,
            ArgKind::Variant => 24,
        }
    }

    /// The variant type a value of this kind converts into; `Nil` for raw pointers.
    pub const fn variant_type(self) -> VariantType {
        match self {
            ArgKind::Primitive(ty) | ArgKind::Builtin(ty) | ArgKind::PackedArray(ty) => ty,
            ArgKind::Object => VariantType::Object,
            ArgKind::Variant | ArgKind::Pointer => VariantType::Nil,
        }
    }

    /// Derives the slot kind from a variant type.
    pub const fn of(ty: VariantType) -> Self {
        match ty {
            VariantType::Nil => ArgKind::Variant,
            VariantType::Bool
            | VariantType::Int
            | VariantType::Float
            | VariantType::Vector2
            | VariantType::Vector3
            | VariantType::Color => ArgKind::Primitive(ty),
            VariantType::String | VariantType::Callable | VariantType::Dictionary | VariantType::Array => {
                ArgKind::Builtin(ty)
            }
            VariantType::Object => ArgKind::Object,
            _ => ArgKind::PackedArray(ty),
        }
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordinals_roundtrip() {
        for ty in VariantType::ALL {
            assert_eq!(VariantType::from_sys(ty.sys()), ty);
            assert!(ty.ord() < VariantType::MAX_ORD);
        }

        assert_eq!(VariantType::try_from_sys(6), None);
        assert_eq!(VariantType::try_from_sys(-1), None);
    }

    #[test]
    fn kinds_follow_types() {
        assert_eq!(ArgKind::of(VariantType::Float), ArgKind::Primitive(VariantType::Float));
        assert_eq!(ArgKind::of(VariantType::String), ArgKind::Builtin(VariantType::String));
        assert_eq!(
            ArgKind::of(VariantType::PackedStringArray),
            ArgKind::PackedArray(VariantType::PackedStringArray)
        );
        assert_eq!(ArgKind::of(VariantType::Nil), ArgKind::Variant);
        assert_eq!(ArgKind::of(VariantType::Object), ArgKind::Object);
    }

    #[test]
    fn native_sizes() {
        assert_eq!(ArgKind::Variant.native_size(), 24);
        assert_eq!(ArgKind::Primitive(VariantType::Bool).native_size(), 1);
        assert_eq!(ArgKind::Primitive(VariantType::Vector3).native_size(), 12);
        assert_eq!(ArgKind::PackedArray(VariantType::PackedByteArray).native_size(), 16);
        assert_eq!(ArgKind::Builtin(VariantType::Callable).native_size(), 16);
    }

    #[test]
    fn managed_memory() {
        assert!(VariantType::String.has_managed_memory());
        assert!(VariantType::PackedVector2Array.has_managed_memory());
        assert!(!VariantType::Vector2.has_managed_memory());
        assert!(!VariantType::Object.has_managed_memory());
        assert!(VariantType::PackedByteArray.is_packed_array());
        assert!(!VariantType::Array.is_packed_array());
    }
}
