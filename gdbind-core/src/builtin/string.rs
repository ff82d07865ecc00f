/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::meta::Signature;
use crate::sys;
use sys::{interface_fn, EngineFfi, VariantType};

/// The engine's reference-counted string type.
///
/// Conversions from and to Rust strings go through UTF-8. Cloning is cheap on the engine side (copy-on-write).
#[repr(C, align(8))]
pub struct GString {
    opaque: sys::OpaqueString,
}

impl GString {
    /// Construct a new empty GString.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of characters (Unicode code points).
    pub fn len(&self) -> usize {
        // SAFETY: builtin `String::length` takes no arguments and returns int.
        let len = unsafe {
            Signature::<(), i64>::out_builtin_ptrcall(
                sys::builtin_fn!(string_length),
                "String",
                "length",
                sys::force_mut_ptr(self.sys()),
                (),
            )
        };

        usize::try_from(len).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Initializes a string through a raw engine function writing to an uninitialized string pointer.
    ///
    /// # Safety
    /// `init_fn` must fully initialize the string behind its argument.
    #[doc(hidden)]
    pub unsafe fn new_with_string_uninit(init_fn: impl FnOnce(sys::GDExtensionUninitializedStringPtr)) -> Self {
        <Self as EngineFfi>::new_with_uninit(init_fn)
    }

    #[doc(hidden)]
    pub fn string_sys(&self) -> sys::GDExtensionConstStringPtr {
        self.sys()
    }

    fn from_opaque(opaque: sys::OpaqueString) -> Self {
        Self { opaque }
    }

    fn to_rust_string(&self) -> String {
        let to_utf8 = interface_fn!(string_to_utf8_chars);

        // SAFETY: with a null buffer, the engine only reports the required length.
        let len = unsafe { to_utf8(self.string_sys(), std::ptr::null_mut(), 0) };
        let len = usize::try_from(len).unwrap_or(0);

        let mut buf = vec![0u8; len];
        if len > 0 {
            // SAFETY: buffer holds exactly `len` bytes; the engine writes at most that many.
            unsafe {
                to_utf8(self.string_sys(), buf.as_mut_ptr() as *mut std::ffi::c_char, len as i64);
            }
        }

        String::from_utf8(buf).unwrap_or_else(|err| String::from_utf8_lossy(err.as_bytes()).into_owned())
    }
}

impl_builtin_ffi!(GString, VariantType::String);
impl_builtin_lifecycle!(GString, VariantType::String);

impl From<&str> for GString {
    fn from(s: &str) -> Self {
        let bytes = s.as_bytes();

        // SAFETY: the engine copies `bytes.len()` bytes of UTF-8 into a freshly initialized string.
        unsafe {
            Self::new_with_string_uninit(|string_ptr| {
                let ctor = interface_fn!(string_new_with_utf8_chars_and_len);
                ctor(string_ptr, bytes.as_ptr() as *const std::ffi::c_char, bytes.len() as i64);
            })
        }
    }
}

impl From<String> for GString {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<&String> for GString {
    fn from(s: &String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<&GString> for GString {
    fn from(s: &GString) -> Self {
        s.clone()
    }
}

impl From<&GString> for String {
    fn from(s: &GString) -> Self {
        s.to_rust_string()
    }
}

impl From<GString> for String {
    fn from(s: GString) -> Self {
        s.to_rust_string()
    }
}

impl fmt::Display for GString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.to_rust_string();
        f.write_str(&s)
    }
}

impl fmt::Debug for GString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.to_rust_string();
        write!(f, "\"{s}\"")
    }
}

impl PartialEq for GString {
    fn eq(&self, other: &Self) -> bool {
        self.to_rust_string() == other.to_rust_string()
    }
}

impl Eq for GString {}

impl PartialEq<&str> for GString {
    fn eq(&self, other: &&str) -> bool {
        self.to_rust_string() == *other
    }
}

impl Hash for GString {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_rust_string().hash(state)
    }
}
