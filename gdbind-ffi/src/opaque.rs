/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// Stores an opaque engine value of a certain size, with very restricted operations.
///
/// Note: due to `align(8)` and not `packed` repr, this type may be bigger than `N` bytes
/// (which is fine since the engine just needs to read/write those `N` bytes reliably).
#[repr(C, align(8))]
#[derive(Copy, Clone)]
pub struct Opaque<const N: usize> {
    storage: [u8; N],
    marker: std::marker::PhantomData<*const u8>, // disable Send/Sync
}

impl<const N: usize> Opaque<N> {
    /// All-zero bit pattern. Only meaningful as a placeholder that is overwritten before being read by the engine.
    pub const fn zeroed() -> Self {
        Self {
            storage: [0; N],
            marker: std::marker::PhantomData,
        }
    }

    pub fn as_bytes(&self) -> &[u8; N] {
        &self.storage
    }
}

impl<const N: usize> std::fmt::Debug for Opaque<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Opaque<{N}>(")?;
        for byte in self.storage.iter() {
            write!(f, "{byte:02x}")?;
        }
        write!(f, ")")
    }
}

pub type OpaqueString = Opaque<8>;
pub type OpaqueArray = Opaque<8>;
pub type OpaqueDictionary = Opaque<8>;
pub type OpaqueCallable = Opaque<16>;
pub type OpaquePackedArray = Opaque<16>;
pub type OpaqueVariant = Opaque<24>;

crate::static_assert_eq_size!(OpaqueVariant, [u64; 3]);
crate::static_assert_eq_size!(OpaquePackedArray, [u64; 2]);
