/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use crate::sys;
use sys::{EngineFfi, VariantType};

/// Color built-in type, in floating-point RGBA format.
///
/// Channel values are _typically_ in the range of 0 to 1, but this is not a requirement, and values outside this
/// range are explicitly allowed for e.g. High Dynamic Range (HDR).
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color {
    /// The color's red component.
    pub r: f32,
    /// The color's green component.
    pub g: f32,
    /// The color's blue component.
    pub b: f32,
    /// The color's alpha component. A value of 0 means that the color is fully transparent.
    pub a: f32,
}

impl Color {
    pub const TRANSPARENT_BLACK: Color = Self::from_rgba(0.0, 0.0, 0.0, 0.0);
    pub const BLACK: Color = Self::from_rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Self::from_rgb(1.0, 1.0, 1.0);
    pub const RED: Color = Self::from_rgb(1.0, 0.0, 0.0);

    /// Constructs a new `Color` with the given components.
    pub const fn from_rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Constructs a new `Color` with the given color components, and the alpha channel set to 1.
    pub const fn from_rgb(r: f32, g: f32, b: f32) -> Self {
        Self::from_rgba(r, g, b, 1.0)
    }

    /// Linearly interpolates all four channels towards `to`.
    pub fn lerp(self, to: Color, weight: f64) -> Self {
        let weight = weight as f32;
        let mix = |a: f32, b: f32| a + (b - a) * weight;
        Self::from_rgba(mix(self.r, to.r), mix(self.g, to.g), mix(self.b, to.b), mix(self.a, to.a))
    }

    /// Returns the color with its RGB channels inverted; alpha is unchanged.
    pub fn inverted(self) -> Self {
        Self::from_rgba(1.0 - self.r, 1.0 - self.g, 1.0 - self.b, self.a)
    }
}

// SAFETY: represented as `Self` in the engine, so `*mut Self` is sound.
unsafe impl EngineFfi for Color {
    const VARIANT_TYPE: VariantType = VariantType::Color;

    sys::ffi_methods! { type sys::GDExtensionTypePtr = *mut Self; .. }
}

/// Formats the color like the engine: `(r, g, b, a)`.
impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

sys::static_assert_eq_size!(Color, [f32; 4]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_and_invert() {
        let mid = Color::BLACK.lerp(Color::WHITE, 0.5);
        assert_eq!(mid, Color::from_rgb(0.5, 0.5, 0.5));

        assert_eq!(Color::RED.inverted(), Color::from_rgb(0.0, 1.0, 1.0));
        assert_eq!(Color::TRANSPARENT_BLACK.to_string(), "(0, 0, 0, 0)");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_roundtrip() {
        let color = Color::from_rgba(0.25, 0.5, 0.75, 1.0);
        let json = serde_json::to_string(&color).expect("serialize");
        let back: Color = serde_json::from_str(&json).expect("deserialize");

        assert_eq!(back, color);
    }
}
