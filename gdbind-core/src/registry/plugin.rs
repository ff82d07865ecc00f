/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use crate::obj::{cap, GodotClass};
use crate::registry::callbacks;
use crate::sys;

/// Creates a host class instance together with its engine base object.
pub type CreateFn = unsafe extern "C" fn(class_userdata: *mut std::ffi::c_void) -> sys::GDExtensionObjectPtr;

/// Releases the host part of an instance, after the engine decided to destroy the object.
pub type FreeFn =
    unsafe extern "C" fn(class_userdata: *mut std::ffi::c_void, instance: sys::GDExtensionClassInstancePtr);

/// One piece of registration information about a host class.
///
/// The pieces come from different macro invocations (`#[derive(GodotClass)]`, `#[godot_api]`) and are merged by class
/// name before the class is registered.
#[derive(Debug)]
pub struct ClassPlugin {
    pub(crate) class_name: &'static str,
    pub(crate) item: PluginItem,
}

impl ClassPlugin {
    pub fn new<T: GodotClass>(item: PluginItem) -> Self {
        Self {
            class_name: T::CLASS_NAME,
            item,
        }
    }
}

#[derive(Clone)]
pub enum PluginItem {
    /// Class definition itself, from `#[derive(GodotClass)]`.
    Struct {
        base_class_name: &'static str,

        /// Present if the class has `#[class(init)]`.
        generated_create_fn: Option<CreateFn>,

        free_fn: FreeFn,
    },

    /// Collected from `#[godot_api] impl I... for MyClass`.
    ITraitImpl {
        /// Looks up the trampoline of an overridden virtual method.
        user_virtual_fn: sys::GDExtensionClassGetVirtual,

        /// Present if the impl block contains a user-defined `init()`.
        user_create_fn: Option<CreateFn>,
    },
}

impl PluginItem {
    pub fn new_struct<T: GodotClass>(base_class_name: &'static str) -> Self {
        Self::Struct {
            base_class_name,
            generated_create_fn: None,
            free_fn: callbacks::free::<T>,
        }
    }

    pub fn new_struct_with_init<T: cap::GodotDefault>(base_class_name: &'static str) -> Self {
        Self::Struct {
            base_class_name,
            generated_create_fn: Some(callbacks::create::<T>),
            free_fn: callbacks::free::<T>,
        }
    }

    pub fn new_interface_impl<T: cap::ImplementsGodotVirtual>() -> Self {
        Self::ITraitImpl {
            user_virtual_fn: Some(callbacks::get_virtual::<T>),
            user_create_fn: None,
        }
    }

    pub fn new_interface_impl_with_init<T>() -> Self
    where
        T: cap::ImplementsGodotVirtual + cap::GodotDefault,
    {
        Self::ITraitImpl {
            user_virtual_fn: Some(callbacks::get_virtual::<T>),
            user_create_fn: Some(callbacks::create::<T>),
        }
    }
}

impl fmt::Debug for PluginItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Struct {
                base_class_name,
                generated_create_fn,
                ..
            } => f
                .debug_struct("Struct")
                .field("base_class_name", base_class_name)
                .field("has_init", &generated_create_fn.is_some())
                .finish(),
            Self::ITraitImpl { user_create_fn, .. } => f
                .debug_struct("ITraitImpl")
                .field("has_init", &user_create_fn.is_some())
                .finish(),
        }
    }
}
