/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! The C entry points handed out through [`get_proc_address`].

use std::borrow::Cow;
use std::ffi::{c_char, c_void, CStr, CString};
use std::ptr;

use gdbind_ffi as sys;
use sys::VariantType;

use crate::audit::{self, report_error, PrintedMessage};
use crate::builtins;
use crate::extension;
use crate::methods::{self, MethodBind};
use crate::objects::{self, ObjPtr};
use crate::variant::{self, GStr, Var};

/// Identifies the loaded library in class registration calls.
static LIBRARY_TOKEN: u8 = 0;

pub(crate) fn library() -> sys::GDExtensionClassLibraryPtr {
    &LIBRARY_TOKEN as *const u8 as sys::GDExtensionClassLibraryPtr
}

fn check_library(function: &str, library: sys::GDExtensionClassLibraryPtr) {
    if library != self::library() {
        report_error(format!("{function}: unknown library token {library:p}"));
    }
}

/// # Safety
/// `ptr` must be null or point to a nul-terminated string.
unsafe fn c_str<'a>(ptr: *const c_char) -> Cow<'a, str> {
    if ptr.is_null() {
        Cow::Borrowed("")
    } else {
        CStr::from_ptr(ptr).to_string_lossy()
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Version and printing

unsafe extern "C" fn get_godot_version(r_godot_version: *mut sys::GDExtensionGodotVersion) {
    let (major, minor, patch) = extension::config().version;
    let string = CString::new(format!("Godot Engine v{major}.{minor}.{patch}.mock")).unwrap_or_default();

    ptr::write(
        r_godot_version,
        sys::GDExtensionGodotVersion {
            major,
            minor,
            patch,
            // Lives until the process ends; the caller may keep the pointer.
            string: string.into_raw(),
        },
    );
}

unsafe fn read_message(description: *const c_char, function: *const c_char, file: *const c_char, line: i32) -> PrintedMessage {
    PrintedMessage {
        description: c_str(description).into_owned(),
        function: c_str(function).into_owned(),
        file: c_str(file).into_owned(),
        line,
    }
}

unsafe extern "C" fn print_error(
    p_description: *const c_char,
    p_function: *const c_char,
    p_file: *const c_char,
    p_line: i32,
    _p_editor_notify: sys::GDExtensionBool,
) {
    audit::record_error(read_message(p_description, p_function, p_file, p_line));
}

unsafe extern "C" fn print_warning(
    p_description: *const c_char,
    p_function: *const c_char,
    p_file: *const c_char,
    p_line: i32,
    _p_editor_notify: sys::GDExtensionBool,
) {
    audit::record_warning(read_message(p_description, p_function, p_file, p_line));
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Variant

unsafe extern "C" fn variant_new_copy(r_dest: sys::GDExtensionUninitializedVariantPtr, p_src: sys::GDExtensionConstVariantPtr) {
    Var::borrow(p_src).clone().write_into(r_dest);
}

unsafe extern "C" fn variant_new_nil(r_dest: sys::GDExtensionUninitializedVariantPtr) {
    Var::nil().write_into(r_dest);
}

unsafe extern "C" fn variant_destroy(p_self: sys::GDExtensionVariantPtr) {
    ptr::drop_in_place(p_self as *mut Var);
}

unsafe extern "C" fn variant_get_type(p_self: sys::GDExtensionConstVariantPtr) -> sys::GDExtensionVariantType {
    Var::borrow(p_self).ty().sys()
}

unsafe extern "C" fn variant_evaluate(
    p_op: sys::GDExtensionVariantOperator,
    p_a: sys::GDExtensionConstVariantPtr,
    p_b: sys::GDExtensionConstVariantPtr,
    r_return: sys::GDExtensionUninitializedVariantPtr,
    r_valid: *mut sys::GDExtensionBool,
) {
    let (a, b) = (Var::borrow(p_a), Var::borrow(p_b));

    let result = match p_op {
        sys::GDEXTENSION_VARIANT_OP_EQUAL => Some(variant::variant_eq(a, b)),
        sys::GDEXTENSION_VARIANT_OP_NOT_EQUAL => Some(!variant::variant_eq(a, b)),
        sys::GDEXTENSION_VARIANT_OP_LESS => variant::variant_less(a, b),
        _ => None,
    };

    match result {
        Some(value) => {
            Var::bool(value).write_into(r_return);
            *r_valid = 1;
        }
        None => {
            Var::nil().write_into(r_return);
            *r_valid = 0;
        }
    }
}

unsafe extern "C" fn variant_stringify(p_self: sys::GDExtensionConstVariantPtr, r_ret: sys::GDExtensionUninitializedStringPtr) {
    let text = variant::stringify(Var::borrow(p_self));
    variant::write_string(r_ret, &text);
}

unsafe extern "C" fn get_variant_from_type_constructor(
    p_type: sys::GDExtensionVariantType,
) -> sys::GDExtensionVariantFromTypeConstructorFunc {
    VariantType::try_from_sys(p_type)
        .and_then(builtins::lifecycle_of)
        .and_then(|lifecycle| lifecycle.to_variant)
}

unsafe extern "C" fn get_variant_to_type_constructor(
    p_type: sys::GDExtensionVariantType,
) -> sys::GDExtensionTypeFromVariantConstructorFunc {
    VariantType::try_from_sys(p_type)
        .and_then(builtins::lifecycle_of)
        .and_then(|lifecycle| lifecycle.from_variant)
}

unsafe extern "C" fn variant_get_ptr_constructor(
    p_type: sys::GDExtensionVariantType,
    p_constructor: i32,
) -> sys::GDExtensionPtrConstructor {
    let lifecycle = VariantType::try_from_sys(p_type).and_then(builtins::lifecycle_of)?;
    match p_constructor {
        0 => lifecycle.construct_default,
        1 => lifecycle.construct_copy,
        _ => None,
    }
}

unsafe extern "C" fn variant_get_ptr_destructor(p_type: sys::GDExtensionVariantType) -> sys::GDExtensionPtrDestructor {
    VariantType::try_from_sys(p_type)
        .and_then(builtins::lifecycle_of)
        .and_then(|lifecycle| lifecycle.destroy)
}

unsafe extern "C" fn variant_get_ptr_builtin_method(
    p_type: sys::GDExtensionVariantType,
    p_method: *const c_char,
    p_hash: sys::GDExtensionInt,
) -> sys::GDExtensionPtrBuiltInMethod {
    let ty = VariantType::try_from_sys(p_type)?;
    builtins::find_builtin_method(ty, &c_str(p_method), p_hash)
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Strings and containers

unsafe extern "C" fn string_new_with_utf8_chars_and_len(
    r_dest: sys::GDExtensionUninitializedStringPtr,
    p_contents: *const c_char,
    p_size: sys::GDExtensionInt,
) {
    let text = if p_contents.is_null() || p_size <= 0 {
        Cow::Borrowed("")
    } else {
        let bytes = std::slice::from_raw_parts(p_contents as *const u8, p_size as usize);
        String::from_utf8_lossy(bytes)
    };

    variant::write_string(r_dest, &text);
}

/// Copies at most `p_max_write_length` bytes, without terminator. Returns the full length in bytes.
unsafe extern "C" fn string_to_utf8_chars(
    p_self: sys::GDExtensionConstStringPtr,
    r_text: *mut c_char,
    p_max_write_length: sys::GDExtensionInt,
) -> sys::GDExtensionInt {
    let bytes = variant::string_at(p_self).as_bytes();

    if !r_text.is_null() {
        let count = bytes.len().min(p_max_write_length.max(0) as usize);
        ptr::copy_nonoverlapping(bytes.as_ptr(), r_text as *mut u8, count);
    }

    bytes.len() as sys::GDExtensionInt
}

unsafe extern "C" fn array_operator_index(p_self: sys::GDExtensionTypePtr, p_index: sys::GDExtensionInt) -> sys::GDExtensionVariantPtr {
    builtins::array_index(p_self, p_index)
}

unsafe extern "C" fn dictionary_operator_index(
    p_self: sys::GDExtensionTypePtr,
    p_key: sys::GDExtensionConstVariantPtr,
) -> sys::GDExtensionVariantPtr {
    builtins::dictionary_index(p_self, p_key)
}

unsafe extern "C" fn packed_byte_array_operator_index(p_self: sys::GDExtensionTypePtr, p_index: sys::GDExtensionInt) -> *mut u8 {
    builtins::packed_index::<u8>(p_self, p_index)
}

unsafe extern "C" fn packed_int32_array_operator_index(p_self: sys::GDExtensionTypePtr, p_index: sys::GDExtensionInt) -> *mut i32 {
    builtins::packed_index::<i32>(p_self, p_index)
}

unsafe extern "C" fn packed_int64_array_operator_index(p_self: sys::GDExtensionTypePtr, p_index: sys::GDExtensionInt) -> *mut i64 {
    builtins::packed_index::<i64>(p_self, p_index)
}

unsafe extern "C" fn packed_float32_array_operator_index(p_self: sys::GDExtensionTypePtr, p_index: sys::GDExtensionInt) -> *mut f32 {
    builtins::packed_index::<f32>(p_self, p_index)
}

unsafe extern "C" fn packed_float64_array_operator_index(p_self: sys::GDExtensionTypePtr, p_index: sys::GDExtensionInt) -> *mut f64 {
    builtins::packed_index::<f64>(p_self, p_index)
}

unsafe extern "C" fn packed_string_array_operator_index(
    p_self: sys::GDExtensionTypePtr,
    p_index: sys::GDExtensionInt,
) -> sys::GDExtensionStringPtr {
    builtins::packed_index::<GStr>(p_self, p_index) as sys::GDExtensionStringPtr
}

unsafe extern "C" fn packed_vector2_array_operator_index(
    p_self: sys::GDExtensionTypePtr,
    p_index: sys::GDExtensionInt,
) -> sys::GDExtensionTypePtr {
    builtins::packed_index::<[f32; 2]>(p_self, p_index) as sys::GDExtensionTypePtr
}

unsafe extern "C" fn callable_custom_create(
    r_callable: sys::GDExtensionUninitializedTypePtr,
    p_callable_custom_info: *mut sys::GDExtensionCallableCustomInfo,
) {
    builtins::callable_custom_create(r_callable, p_callable_custom_info);
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// ClassDB

unsafe extern "C" fn classdb_construct_object(p_classname: *const c_char) -> sys::GDExtensionObjectPtr {
    objects::construct(&c_str(p_classname)) as sys::GDExtensionObjectPtr
}

unsafe extern "C" fn classdb_get_method_bind(
    p_classname: *const c_char,
    p_methodname: *const c_char,
    p_hash: sys::GDExtensionInt,
) -> sys::GDExtensionMethodBindPtr {
    let class = c_str(p_classname);
    let method = c_str(p_methodname);

    let hidden = extension::config()
        .hidden_method_binds
        .iter()
        .any(|&(c, m)| c == class && m == method);
    if hidden {
        return ptr::null();
    }

    match methods::find_bind(&class, &method, p_hash) {
        Ok(bind) => bind as *const MethodBind as sys::GDExtensionMethodBindPtr,
        Err(message) => {
            report_error(format!("classdb_get_method_bind: {message}"));
            ptr::null()
        }
    }
}

unsafe extern "C" fn classdb_get_class_tag(p_classname: *const c_char) -> *mut c_void {
    objects::class_tag(&c_str(p_classname))
}

unsafe extern "C" fn classdb_register_extension_class(
    p_library: sys::GDExtensionClassLibraryPtr,
    p_class_name: *const c_char,
    p_parent_class_name: *const c_char,
    p_extension_funcs: *const sys::GDExtensionClassCreationInfo,
) {
    check_library("classdb_register_extension_class", p_library);

    let name = c_str(p_class_name);
    if p_extension_funcs.is_null() {
        report_error(format!("classdb_register_extension_class: no creation info for '{name}'"));
        return;
    }

    objects::register_extension_class(&name, &c_str(p_parent_class_name), *p_extension_funcs);
}

unsafe extern "C" fn classdb_unregister_extension_class(p_library: sys::GDExtensionClassLibraryPtr, p_class_name: *const c_char) {
    check_library("classdb_unregister_extension_class", p_library);
    objects::unregister_extension_class(&c_str(p_class_name));
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Object

unsafe extern "C" fn object_method_bind_call(
    p_method_bind: sys::GDExtensionMethodBindPtr,
    p_instance: sys::GDExtensionObjectPtr,
    p_args: *const sys::GDExtensionConstVariantPtr,
    p_arg_count: sys::GDExtensionInt,
    r_ret: sys::GDExtensionUninitializedVariantPtr,
    r_error: *mut sys::GDExtensionCallError,
) {
    let bind = &*(p_method_bind as *const MethodBind);

    let args: Vec<&Var> = if p_args.is_null() || p_arg_count <= 0 {
        vec![]
    } else {
        std::slice::from_raw_parts(p_args, p_arg_count as usize)
            .iter()
            .map(|&arg| Var::borrow(arg))
            .collect()
    };

    match methods::varcall(bind, p_instance as ObjPtr, &args) {
        Ok(value) => {
            value.write_into(r_ret);
            *r_error = methods::call_error(sys::GDEXTENSION_CALL_OK, 0, 0);
        }
        Err(err) => {
            Var::nil().write_into(r_ret);
            *r_error = err;
        }
    }
}

unsafe extern "C" fn object_method_bind_ptrcall(
    p_method_bind: sys::GDExtensionMethodBindPtr,
    p_instance: sys::GDExtensionObjectPtr,
    p_args: *const sys::GDExtensionConstTypePtr,
    r_ret: sys::GDExtensionTypePtr,
) {
    let bind = &*(p_method_bind as *const MethodBind);
    methods::ptrcall(bind, p_instance as ObjPtr, p_args, r_ret);
}

unsafe extern "C" fn object_destroy(p_o: sys::GDExtensionObjectPtr) {
    objects::destroy(p_o as ObjPtr);
}

unsafe extern "C" fn object_get_instance_from_id(p_instance_id: sys::GDObjectInstanceID) -> sys::GDExtensionObjectPtr {
    objects::lookup_id(p_instance_id) as sys::GDExtensionObjectPtr
}

unsafe extern "C" fn object_get_instance_id(p_object: sys::GDExtensionConstObjectPtr) -> sys::GDObjectInstanceID {
    objects::instance_id(p_object as ObjPtr)
}

unsafe extern "C" fn object_cast_to(p_object: sys::GDExtensionConstObjectPtr, p_class_tag: *mut c_void) -> sys::GDExtensionObjectPtr {
    objects::cast_to(p_object as ObjPtr, p_class_tag) as sys::GDExtensionObjectPtr
}

/// Writes the class name only if the object is alive.
unsafe extern "C" fn object_get_class_name(
    p_object: sys::GDExtensionConstObjectPtr,
    p_library: sys::GDExtensionClassLibraryPtr,
    r_class_name: sys::GDExtensionUninitializedStringPtr,
) -> sys::GDExtensionBool {
    check_library("object_get_class_name", p_library);

    match objects::class_name_of(p_object as ObjPtr) {
        Some(name) => {
            variant::write_string(r_class_name, &name);
            1
        }
        None => 0,
    }
}

unsafe extern "C" fn object_set_instance(
    p_o: sys::GDExtensionObjectPtr,
    p_classname: *const c_char,
    p_instance: sys::GDExtensionClassInstancePtr,
) {
    objects::set_instance(p_o as ObjPtr, &c_str(p_classname), p_instance);
}

unsafe extern "C" fn object_get_instance(p_o: sys::GDExtensionConstObjectPtr) -> sys::GDExtensionClassInstancePtr {
    objects::get_instance(p_o as ObjPtr)
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Lookup

macro_rules! proc_address_table {
    ($name:expr; $( $function:ident ),* $(,)?) => {
        match $name {
            $( stringify!($function) => Some($function as *const ()), )*
            _ => None,
        }
    };
}

fn lookup(name: &str) -> Option<*const ()> {
    proc_address_table!(name;
        get_godot_version,
        print_error,
        print_warning,
        variant_new_copy,
        variant_new_nil,
        variant_destroy,
        variant_get_type,
        variant_evaluate,
        variant_stringify,
        get_variant_from_type_constructor,
        get_variant_to_type_constructor,
        variant_get_ptr_constructor,
        variant_get_ptr_destructor,
        variant_get_ptr_builtin_method,
        string_new_with_utf8_chars_and_len,
        string_to_utf8_chars,
        array_operator_index,
        dictionary_operator_index,
        packed_byte_array_operator_index,
        packed_int32_array_operator_index,
        packed_int64_array_operator_index,
        packed_float32_array_operator_index,
        packed_float64_array_operator_index,
        packed_string_array_operator_index,
        packed_vector2_array_operator_index,
        callable_custom_create,
        classdb_construct_object,
        classdb_get_method_bind,
        classdb_get_class_tag,
        classdb_register_extension_class,
        classdb_unregister_extension_class,
        object_method_bind_call,
        object_method_bind_ptrcall,
        object_destroy,
        object_get_instance_from_id,
        object_get_instance_id,
        object_cast_to,
        object_get_class_name,
        object_set_instance,
        object_get_instance,
    )
}

/// The engine's `get_proc_address`: resolves an interface function by name.
///
/// Returns null for unknown names and for functions hidden through [`MockConfig::hidden_functions`].
///
/// # Safety
/// `name` must be null or point to a nul-terminated string.
///
/// [`MockConfig::hidden_functions`]: crate::MockConfig::hidden_functions
pub unsafe extern "C" fn get_proc_address(name: *const c_char) -> sys::GDExtensionInterfaceFunctionPtr {
    let name = c_str(name);
    if extension::config().hidden_functions.iter().any(|&hidden| hidden == name) {
        return None;
    }

    let function = lookup(&name)?;

    // SAFETY: every table entry is an `extern "C"` function; the caller casts it back to the signature of `name`.
    Some(std::mem::transmute::<*const (), unsafe extern "C" fn()>(function))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_interface_function_resolves() {
        for name in sys::GDExtensionInterface::FUNCTION_NAMES {
            assert!(lookup(name).is_some(), "missing interface function {name}");
        }
    }

    #[test]
    fn interface_loads_completely() {
        let interface = unsafe { sys::GDExtensionInterface::load(get_proc_address) };
        assert_eq!(interface.missing_functions(), Vec::<&str>::new());
    }

    #[test]
    fn utf8_roundtrip_through_entry_points() {
        let text = "Grüße";
        let mut slot = [0u64; 1];
        let dst = slot.as_mut_ptr() as *mut c_void;

        unsafe {
            string_new_with_utf8_chars_and_len(dst, text.as_ptr() as *const c_char, text.len() as i64);

            assert_eq!(string_to_utf8_chars(dst, ptr::null_mut(), 0), text.len() as i64);

            let mut buffer = vec![0u8; 3];
            string_to_utf8_chars(dst, buffer.as_mut_ptr() as *mut c_char, 3);
            assert_eq!(&buffer, b"Gr\xc3");

            variant::destroy_native(VariantType::String, dst);
        }
    }
}
