/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use crate::builtin::real;
use crate::sys;
use sys::{EngineFfi, VariantType};

type RVec2 = glam::Vec2;
type RVec3 = glam::Vec3;

/// Implements component-wise arithmetic operators between two vectors, and between a vector and a scalar.
macro_rules! impl_vector_operators {
    ($Vector:ty, ($($components:ident),*)) => {
        impl_vector_operators!(@vector $Vector, ($($components),*), Add, add, AddAssign, add_assign);
        impl_vector_operators!(@vector $Vector, ($($components),*), Sub, sub, SubAssign, sub_assign);
        impl_vector_operators!(@vector $Vector, ($($components),*), Mul, mul, MulAssign, mul_assign);
        impl_vector_operators!(@scalar $Vector, ($($components),*), Mul, mul, MulAssign, mul_assign);
        impl_vector_operators!(@scalar $Vector, ($($components),*), Div, div, DivAssign, div_assign);

        impl std::ops::Neg for $Vector {
            type Output = Self;
            fn neg(mut self) -> Self::Output {
                $( self.$components = -self.$components; )*
                self
            }
        }
    };

    (@vector $Vector:ty, ($($components:ident),*), $Operator:ident, $func:ident, $OperatorAssign:ident, $func_assign:ident) => {
        impl std::ops::$Operator for $Vector {
            type Output = Self;
            fn $func(mut self, rhs: $Vector) -> Self::Output {
                $( self.$components = std::ops::$Operator::$func(self.$components, rhs.$components); )*
                self
            }
        }

        impl std::ops::$OperatorAssign for $Vector {
            fn $func_assign(&mut self, rhs: $Vector) {
                *self = std::ops::$Operator::$func(*self, rhs);
            }
        }
    };

    (@scalar $Vector:ty, ($($components:ident),*), $Operator:ident, $func:ident, $OperatorAssign:ident, $func_assign:ident) => {
        impl std::ops::$Operator<real> for $Vector {
            type Output = Self;
            fn $func(mut self, rhs: real) -> Self::Output {
                $( self.$components = std::ops::$Operator::$func(self.$components, rhs); )*
                self
            }
        }

        impl std::ops::$OperatorAssign<real> for $Vector {
            fn $func_assign(&mut self, rhs: real) {
                *self = std::ops::$Operator::$func(*self, rhs);
            }
        }
    };
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Vector2

/// Vector used for 2D math using floating point coordinates.
///
/// Uses 32-bit components, matching the engine's default build; the engine's `float` type is 64-bit regardless.
#[derive(Default, Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(C)]
pub struct Vector2 {
    /// The vector's X component.
    pub x: real,

    /// The vector's Y component.
    pub y: real,
}

impl Vector2 {
    /// Vector with all components set to `0.0`.
    pub const ZERO: Self = Self::splat(0.0);

    /// Vector with all components set to `1.0`.
    pub const ONE: Self = Self::splat(1.0);

    /// Unit vector in -X direction.
    pub const LEFT: Self = Self::new(-1.0, 0.0);

    /// Unit vector in +X direction.
    pub const RIGHT: Self = Self::new(1.0, 0.0);

    /// Unit vector in -Y direction (up in 2D coordinate system).
    pub const UP: Self = Self::new(0.0, -1.0);

    /// Unit vector in +Y direction (down in 2D coordinate system).
    pub const DOWN: Self = Self::new(0.0, 1.0);

    /// Constructs a new `Vector2` from the given `x` and `y`.
    pub const fn new(x: real, y: real) -> Self {
        Self { x, y }
    }

    /// Constructs a new `Vector2` with both components set to `v`.
    pub const fn splat(v: real) -> Self {
        Self::new(v, v)
    }

    pub fn length(self) -> real {
        self.to_glam().length()
    }

    pub fn length_squared(self) -> real {
        self.to_glam().length_squared()
    }

    /// Returns the vector scaled to unit length, or zero if the vector is zero.
    pub fn normalized(self) -> Self {
        Self::from_glam(self.to_glam().normalize_or_zero())
    }

    pub fn dot(self, other: Self) -> real {
        self.to_glam().dot(other.to_glam())
    }

    pub fn distance_to(self, to: Self) -> real {
        self.to_glam().distance(to.to_glam())
    }

    pub fn lerp(self, other: Self, weight: real) -> Self {
        Self::from_glam(self.to_glam().lerp(other.to_glam(), weight))
    }

    /// Returns the result of rotating this vector by `angle` (in radians).
    pub fn rotated(self, angle: real) -> Self {
        Self::from_glam(RVec2::from_angle(angle).rotate(self.to_glam()))
    }

    pub fn is_equal_approx(self, to: Self) -> bool {
        self.to_glam().abs_diff_eq(to.to_glam(), real::EPSILON * 4.0)
    }

    fn from_glam(v: RVec2) -> Self {
        Self::new(v.x, v.y)
    }

    fn to_glam(self) -> RVec2 {
        RVec2::new(self.x, self.y)
    }
}

/// Formats the vector like the engine: `(x, y)`.
impl fmt::Display for Vector2 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl_vector_operators!(Vector2, (x, y));

// SAFETY: represented as `Self` in the engine, so `*mut Self` is sound.
unsafe impl EngineFfi for Vector2 {
    const VARIANT_TYPE: VariantType = VariantType::Vector2;

    sys::ffi_methods! { type sys::GDExtensionTypePtr = *mut Self; .. }
}

impl From<glam::Vec2> for Vector2 {
    fn from(v: glam::Vec2) -> Self {
        Self::from_glam(v)
    }
}

impl From<Vector2> for glam::Vec2 {
    fn from(v: Vector2) -> Self {
        v.to_glam()
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Vector3

/// Vector used for 3D math using floating point coordinates.
#[derive(Default, Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(C)]
pub struct Vector3 {
    pub x: real,
    pub y: real,
    pub z: real,
}

impl Vector3 {
    pub const ZERO: Self = Self::splat(0.0);
    pub const ONE: Self = Self::splat(1.0);
    pub const UP: Self = Self::new(0.0, 1.0, 0.0);
    pub const FORWARD: Self = Self::new(0.0, 0.0, -1.0);

    pub const fn new(x: real, y: real, z: real) -> Self {
        Self { x, y, z }
    }

    pub const fn splat(v: real) -> Self {
        Self::new(v, v, v)
    }

    pub fn length(self) -> real {
        self.to_glam().length()
    }

    pub fn normalized(self) -> Self {
        Self::from_glam(self.to_glam().normalize_or_zero())
    }

    pub fn dot(self, other: Self) -> real {
        self.to_glam().dot(other.to_glam())
    }

    pub fn cross(self, with: Self) -> Self {
        Self::from_glam(self.to_glam().cross(with.to_glam()))
    }

    pub fn lerp(self, other: Self, weight: real) -> Self {
        Self::from_glam(self.to_glam().lerp(other.to_glam(), weight))
    }

    fn from_glam(v: RVec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }

    fn to_glam(self) -> RVec3 {
        RVec3::new(self.x, self.y, self.z)
    }
}

impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl_vector_operators!(Vector3, (x, y, z));

// SAFETY: represented as `Self` in the engine, so `*mut Self` is sound.
unsafe impl EngineFfi for Vector3 {
    const VARIANT_TYPE: VariantType = VariantType::Vector3;

    sys::ffi_methods! { type sys::GDExtensionTypePtr = *mut Self; .. }
}

impl From<glam::Vec3> for Vector3 {
    fn from(v: glam::Vec3) -> Self {
        Self::from_glam(v)
    }
}

impl From<Vector3> for glam::Vec3 {
    fn from(v: Vector3) -> Self {
        v.to_glam()
    }
}

sys::static_assert_eq_size!(Vector2, [f32; 2]);
sys::static_assert_eq_size!(Vector3, [f32; 3]);

// ----------------------------------------------------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic() {
        let a = Vector2::new(1.0, 2.0);
        let b = Vector2::new(0.5, -1.0);

        assert_eq!(a + b, Vector2::new(1.5, 1.0));
        assert_eq!(a - b, Vector2::new(0.5, 3.0));
        assert_eq!(a * 2.0, Vector2::new(2.0, 4.0));
        assert_eq!(-a, Vector2::new(-1.0, -2.0));

        let mut c = a;
        c += b;
        c /= 2.0;
        assert_eq!(c, Vector2::new(0.75, 0.5));
    }

    #[test]
    fn math_through_glam() {
        assert_eq!(Vector2::new(3.0, 4.0).length(), 5.0);
        assert_eq!(Vector2::ZERO.normalized(), Vector2::ZERO);

        let rotated = Vector2::RIGHT.rotated(std::f32::consts::FRAC_PI_2);
        assert!(rotated.is_equal_approx(Vector2::new(0.0, 1.0)));

        assert_eq!(Vector3::new(1.0, 0.0, 0.0).cross(Vector3::UP), Vector3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn display() {
        assert_eq!(Vector2::new(1.5, -2.0).to_string(), "(1.5, -2)");
        assert_eq!(Vector3::ONE.to_string(), "(1, 1, 1)");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_roundtrip() {
        let vector = Vector2::new(1.0, 2.5);
        let json = serde_json::to_string(&vector).expect("serialize");
        assert_eq!(json, "{\"x\":1.0,\"y\":2.5}");

        let back: Vector2 = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, vector);
    }
}
