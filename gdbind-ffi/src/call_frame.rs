/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Stack buffer staging the arguments of one outbound ptrcall.
//!
//! This is the only place where host values are reinterpreted as raw engine argument slots. Everything else marshals
//! through [`EngineFfi`].

use crate as sys;
use crate::{ArgKind, EngineFfi};
use std::marker::PhantomData;

/// Width of one argument slot; large enough for the widest native representation (`Variant`).
pub const SLOT_SIZE: usize = 24;

#[repr(C, align(8))]
#[derive(Copy, Clone)]
struct Slot([u8; SLOT_SIZE]);

/// Fixed-capacity argument frame for one native call.
///
/// Holds `N` zeroed slots on the stack. Each pushed argument is copied bytewise with its exact native width, and its
/// [`ArgKind`] is recorded so the checked call path can compare the frame against a bind's signature.
///
/// Values are borrowed for `'a`: the frame copies their bits without taking ownership, which matches the engine's
/// convention that arguments are borrowed for the duration of a call.
pub struct CallFrame<'a, const N: usize> {
    slots: [Slot; N],
    kinds: [ArgKind; N],
    len: usize,
    _args: PhantomData<&'a ()>,
}

impl<'a, const N: usize> CallFrame<'a, N> {
    pub fn new() -> Self {
        Self {
            slots: [Slot([0; SLOT_SIZE]); N],
            kinds: [ArgKind::Variant; N],
            len: 0,
            _args: PhantomData,
        }
    }

    /// Appends one argument.
    ///
    /// # Panics
    /// If all `N` slots are already taken.
    pub fn push<T: EngineFfi>(&mut self, arg: &'a T) -> &mut Self {
        const { assert!(T::ARG_KIND.native_size() <= SLOT_SIZE, "type too wide for a call frame slot") };

        assert!(
            self.len < N,
            "call frame overflow: capacity {N}, pushing a {:?}",
            T::ARG_KIND
        );

        let size = T::ARG_KIND.native_size();
        let slot = &mut self.slots[self.len];

        // SAFETY: `EngineFfi` guarantees `size` readable bytes behind `sys()`; slot is at least as wide (checked above).
        unsafe {
            std::ptr::copy_nonoverlapping(arg.sys() as *const u8, slot.0.as_mut_ptr(), size);
        }

        self.kinds[self.len] = T::ARG_KIND;
        self.len += 1;
        self
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Kinds of all pushed arguments, in order.
    pub fn kinds(&self) -> &[ArgKind] {
        &self.kinds[..self.len]
    }

    /// Performs the call, reading the result back as `R`.
    ///
    /// `call` receives the argument pointer array and an uninitialized return slot for `R`.
    ///
    /// # Safety
    /// `call` must construct a valid `R` in native encoding into the return slot (or nothing, for `()`),
    /// and must not retain the argument pointers.
    pub unsafe fn ptrcall<R: EngineFfi>(
        self,
        call: impl FnOnce(*const sys::GDExtensionConstTypePtr, sys::GDExtensionTypePtr),
    ) -> R {
        let mut arg_ptrs = [std::ptr::null::<std::ffi::c_void>(); N];
        for (ptr, slot) in arg_ptrs.iter_mut().zip(self.slots[..self.len].iter()) {
            *ptr = slot.0.as_ptr() as sys::GDExtensionConstTypePtr;
        }

        R::new_with_uninit(|ret| call(arg_ptrs.as_ptr(), ret))
    }
}

impl<const N: usize> Default for CallFrame<'_, N> {
    fn default() -> Self {
        Self::new()
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PtrcallType, VariantType};

    #[test]
    fn push_records_kinds() {
        let (a, b, c) = (1.5_f64, true, 7_i64);

        let mut frame = CallFrame::<3>::new();
        frame.push(&a).push(&b).push(&c);

        assert_eq!(frame.len(), 3);
        assert_eq!(
            frame.kinds(),
            &[
                ArgKind::Primitive(VariantType::Float),
                ArgKind::Primitive(VariantType::Bool),
                ArgKind::Primitive(VariantType::Int),
            ]
        );
        assert_eq!(frame.slots[0].0[..8], 1.5_f64.to_ne_bytes());
        assert_eq!(frame.slots[1].0[0], 1);
    }

    #[test]
    #[should_panic(expected = "call frame overflow")]
    fn overflow_panics() {
        let (a, b) = (1_i64, 2_i64);

        let mut frame = CallFrame::<1>::new();
        frame.push(&a);
        frame.push(&b);
    }

    #[test]
    fn ptrcall_reads_return() {
        unsafe extern "C" fn add(args: *const sys::GDExtensionConstTypePtr, ret: sys::GDExtensionTypePtr) {
            let a = *(*args.add(0) as *const f64);
            let b = *(*args.add(1) as *const f64);
            (a + b).move_return_ptr(ret, PtrcallType::Standard);
        }

        let (a, b) = (2.25_f64, 4.0_f64);
        let mut frame = CallFrame::<2>::new();
        frame.push(&a).push(&b);

        let sum: f64 = unsafe { frame.ptrcall(|args, ret| add(args, ret)) };
        assert_eq!(sum, 6.25);
    }

    #[test]
    fn empty_frame_unit_return() {
        let frame = CallFrame::<0>::new();
        assert!(frame.is_empty());

        let mut called = false;
        let () = unsafe {
            frame.ptrcall(|args, ret| {
                assert!(!args.is_null());
                assert!(ret.is_null());
                called = true;
            })
        };
        assert!(called);
    }
}
