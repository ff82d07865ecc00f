/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt::{Debug, Display, Formatter, Result as FmtResult};
use std::num::NonZeroU64;

use crate::meta::error::{ConvertError, ErrorKind};
use crate::meta::{FromGodot, GodotConvert, ToGodot};
use crate::sys;

/// Represents a non-zero instance ID.
///
/// This is its own type for type safety and to deal with the inconsistent representation in the engine as both `u64`
/// (native side) and `i64` (scripting side). You can usually treat this as an opaque value.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct InstanceId {
    // Note: in the public API, signed i64 is the canonical representation.
    value: NonZeroU64,
}

impl InstanceId {
    /// Constructs an instance ID from an integer, or `None` if the integer is zero.
    ///
    /// This does *not* check if the instance is valid.
    pub fn try_from_i64(id: i64) -> Option<Self> {
        Self::try_from_u64(id as u64)
    }

    /// ⚠️ Constructs an instance ID from a non-zero integer, or panics.
    ///
    /// # Panics
    /// If `id` is zero.
    pub fn from_i64(id: i64) -> Self {
        Self::try_from_i64(id).unwrap_or_else(|| panic!("expected non-zero instance ID"))
    }

    #[doc(hidden)]
    pub fn try_from_u64(id: u64) -> Option<Self> {
        NonZeroU64::new(id).map(|value| Self { value })
    }

    pub fn to_i64(self) -> i64 {
        self.to_u64() as i64
    }

    #[doc(hidden)]
    pub fn to_u64(self) -> u64 {
        self.value.get()
    }

    /// Asks the engine whether an object with this ID is still alive.
    pub fn lookup_validity(self) -> bool {
        // SAFETY: lookup by ID is valid for any ID; the engine returns null for dead objects.
        let ptr = unsafe { sys::interface_fn!(object_get_instance_from_id)(self.to_u64()) };
        !ptr.is_null()
    }
}

impl Display for InstanceId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "#{}", self.to_i64())
    }
}

impl Debug for InstanceId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "InstanceId({})", self.to_i64())
    }
}

impl GodotConvert for InstanceId {
    type Via = i64;
}

impl ToGodot for InstanceId {
    fn to_godot(&self) -> Self::Via {
        self.to_i64()
    }
}

impl FromGodot for InstanceId {
    fn try_from_godot(via: Self::Via) -> Result<Self, ConvertError> {
        Self::try_from_i64(via).ok_or_else(|| ConvertError::with_kind_value(ErrorKind::NullObject, via))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_rejected() {
        assert_eq!(InstanceId::try_from_i64(0), None);
        assert!(InstanceId::try_from_godot(0).is_err());
    }

    #[test]
    fn signed_representation() {
        let id = InstanceId::try_from_u64(u64::MAX).expect("non-zero");
        assert_eq!(id.to_i64(), -1);
        assert_eq!(id.to_string(), "#-1");
        assert_eq!(InstanceId::from_i64(-1), id);
    }
}
