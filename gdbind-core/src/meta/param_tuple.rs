/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Parameter lists of calls across the boundary, represented as tuples.

use crate::builtin::Variant;
use crate::meta::error::ConvertError;
use crate::meta::{FromGodot, GodotConvert, GodotType, ToGodot};
use crate::sys;
use sys::{CallFrame, EngineFfi, MethodBindEntry, SignatureMismatch};

/// Parameters of an outbound call, i.e. from the host into the engine.
///
/// Each element is converted to its `Via` type and staged in a [`CallFrame`] sized to the tuple's arity.
pub trait OutParamTuple: Sized {
    /// Number of parameters.
    const LEN: usize;

    /// Ptrcall through a class method bind.
    ///
    /// # Safety
    /// See [`sys::class_ptrcall`].
    #[doc(hidden)]
    unsafe fn ptrcall_class<R: GodotType>(self, entry: &MethodBindEntry, object: sys::GDExtensionObjectPtr) -> R;

    /// Ptrcall through a class method bind, always validating the frame against the bind.
    ///
    /// # Safety
    /// See [`sys::class_ptrcall`].
    #[doc(hidden)]
    unsafe fn try_ptrcall_class<R: GodotType>(
        self,
        entry: &MethodBindEntry,
        object: sys::GDExtensionObjectPtr,
    ) -> Result<R, SignatureMismatch>;

    /// Ptrcall through a builtin method.
    ///
    /// # Safety
    /// `method` must accept these parameters and return `R`; `type_ptr` must point to a live value of its type.
    #[doc(hidden)]
    unsafe fn ptrcall_builtin<R: GodotType>(self, method: sys::BuiltinMethodBind, type_ptr: sys::GDExtensionTypePtr) -> R;

    /// Converts each parameter to a variant, for varcalls.
    fn to_variant_array(&self) -> Vec<Variant>;
}

/// Parameters of an inbound call, i.e. from the engine into the host.
pub trait InParamTuple: Sized {
    /// Number of parameters.
    const LEN: usize;

    /// Reads each parameter from the engine's argument array.
    ///
    /// On failure, returns the index of the offending parameter together with the error.
    ///
    /// # Safety
    /// `args_ptr` must point to `LEN` argument pointers, each encoding the respective parameter's `Via` type
    /// according to `call_type`.
    unsafe fn from_ptrcall_args(
        args_ptr: *const sys::GDExtensionConstTypePtr,
        call_type: sys::PtrcallType,
    ) -> Result<Self, (usize, ConvertError)>;
}

macro_rules! impl_param_tuple {
    ($N:literal; $($P:ident : $p:ident : $n:tt),*) => {
        impl<$($P: ToGodot),*> OutParamTuple for ($($P,)*) {
            const LEN: usize = $N;

            #[allow(unused_variables)]
            unsafe fn ptrcall_class<R: GodotType>(self, entry: &MethodBindEntry, object: sys::GDExtensionObjectPtr) -> R {
                let ($($p,)*) = self;
                $( let $p = $p.to_godot(); )*

                #[allow(unused_mut)]
                let mut frame = CallFrame::<$N>::new();
                $( frame.push(&$p); )*

                sys::class_ptrcall::<R, $N>(entry, object, frame)
            }

            #[allow(unused_variables)]
            unsafe fn try_ptrcall_class<R: GodotType>(
                self,
                entry: &MethodBindEntry,
                object: sys::GDExtensionObjectPtr,
            ) -> Result<R, SignatureMismatch> {
                let ($($p,)*) = self;
                $( let $p = $p.to_godot(); )*

                #[allow(unused_mut)]
                let mut frame = CallFrame::<$N>::new();
                $( frame.push(&$p); )*

                sys::try_class_ptrcall::<R, $N>(entry, object, frame)
            }

            #[allow(unused_variables)]
            unsafe fn ptrcall_builtin<R: GodotType>(
                self,
                method: sys::BuiltinMethodBind,
                type_ptr: sys::GDExtensionTypePtr,
            ) -> R {
                let ($($p,)*) = self;
                $( let $p = $p.to_godot(); )*

                #[allow(unused_mut)]
                let mut frame = CallFrame::<$N>::new();
                $( frame.push(&$p); )*

                frame.ptrcall(|args, ret| method(type_ptr, args, ret, $N))
            }

            fn to_variant_array(&self) -> Vec<Variant> {
                vec![ $( self.$n.to_variant() ),* ]
            }
        }

        impl<$($P: FromGodot),*> InParamTuple for ($($P,)*) {
            const LEN: usize = $N;

            #[allow(unused_variables)]
            unsafe fn from_ptrcall_args(
                args_ptr: *const sys::GDExtensionConstTypePtr,
                call_type: sys::PtrcallType,
            ) -> Result<Self, (usize, ConvertError)> {
                Ok(($(
                    {
                        let via = <<$P as GodotConvert>::Via as EngineFfi>::from_arg_ptr(*args_ptr.add($n), call_type);
                        <$P as FromGodot>::try_from_godot(via).map_err(|err| ($n, err))?
                    },
                )*))
            }
        }
    };
}

impl_param_tuple!(0;);
impl_param_tuple!(1; P0: p0: 0);
impl_param_tuple!(2; P0: p0: 0, P1: p1: 1);
impl_param_tuple!(3; P0: p0: 0, P1: p1: 1, P2: p2: 2);
impl_param_tuple!(4; P0: p0: 0, P1: p1: 1, P2: p2: 2, P3: p3: 3);
impl_param_tuple!(5; P0: p0: 0, P1: p1: 1, P2: p2: 2, P3: p3: 3, P4: p4: 4);
impl_param_tuple!(6; P0: p0: 0, P1: p1: 1, P2: p2: 2, P3: p3: 3, P4: p4: 4, P5: p5: 5);
