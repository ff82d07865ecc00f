/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! C types and the function table exchanged with the engine.
//!
//! The engine hands over a single `get_proc_address` callback; every other entry point is looked up by name
//! and stored in [`GDExtensionInterface`].

#![allow(non_camel_case_types)]

use std::ffi::{c_char, c_void};

pub type GDExtensionBool = u8;
pub type GDExtensionInt = i64;
pub type GDObjectInstanceID = u64;
pub type GDExtensionVariantType = i32;
pub type GDExtensionVariantOperator = i32;
pub type GDExtensionInitializationLevel = i32;
pub type GDExtensionCallErrorType = i32;

pub type GDExtensionObjectPtr = *mut c_void;
pub type GDExtensionConstObjectPtr = *const c_void;
pub type GDExtensionTypePtr = *mut c_void;
pub type GDExtensionConstTypePtr = *const c_void;
pub type GDExtensionUninitializedTypePtr = *mut c_void;
pub type GDExtensionVariantPtr = *mut c_void;
pub type GDExtensionConstVariantPtr = *const c_void;
pub type GDExtensionUninitializedVariantPtr = *mut c_void;
pub type GDExtensionStringPtr = *mut c_void;
pub type GDExtensionConstStringPtr = *const c_void;
pub type GDExtensionUninitializedStringPtr = *mut c_void;
pub type GDExtensionMethodBindPtr = *const c_void;
pub type GDExtensionClassInstancePtr = *mut c_void;
pub type GDExtensionClassLibraryPtr = *mut c_void;

pub const GDEXTENSION_CALL_OK: GDExtensionCallErrorType = 0;
pub const GDEXTENSION_CALL_ERROR_INVALID_METHOD: GDExtensionCallErrorType = 1;
pub const GDEXTENSION_CALL_ERROR_INVALID_ARGUMENT: GDExtensionCallErrorType = 2;
pub const GDEXTENSION_CALL_ERROR_TOO_MANY_ARGUMENTS: GDExtensionCallErrorType = 3;
pub const GDEXTENSION_CALL_ERROR_TOO_FEW_ARGUMENTS: GDExtensionCallErrorType = 4;
pub const GDEXTENSION_CALL_ERROR_INSTANCE_IS_NULL: GDExtensionCallErrorType = 5;
pub const GDEXTENSION_CALL_ERROR_METHOD_NOT_CONST: GDExtensionCallErrorType = 6;

pub const GDEXTENSION_VARIANT_OP_EQUAL: GDExtensionVariantOperator = 0;
pub const GDEXTENSION_VARIANT_OP_NOT_EQUAL: GDExtensionVariantOperator = 1;
pub const GDEXTENSION_VARIANT_OP_LESS: GDExtensionVariantOperator = 2;

pub const GDEXTENSION_INITIALIZATION_CORE: GDExtensionInitializationLevel = 0;
pub const GDEXTENSION_INITIALIZATION_SERVERS: GDExtensionInitializationLevel = 1;
pub const GDEXTENSION_INITIALIZATION_SCENE: GDExtensionInitializationLevel = 2;
pub const GDEXTENSION_INITIALIZATION_EDITOR: GDExtensionInitializationLevel = 3;

/// Outcome of a varcall, written by the callee.
#[repr(C)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct GDExtensionCallError {
    pub error: GDExtensionCallErrorType,
    pub argument: i32,
    pub expected: i32,
}

#[repr(C)]
#[derive(Copy, Clone, Debug)]
pub struct GDExtensionGodotVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub string: *const c_char,
}

pub type GDExtensionClassCallVirtual = Option<
    unsafe extern "C" fn(
        p_instance: GDExtensionClassInstancePtr,
        p_args: *const GDExtensionConstTypePtr,
        r_ret: GDExtensionTypePtr,
    ),
>;
pub type GDExtensionClassCreateInstance =
    Option<unsafe extern "C" fn(p_class_userdata: *mut c_void) -> GDExtensionObjectPtr>;
pub type GDExtensionClassFreeInstance = Option<
    unsafe extern "C" fn(p_class_userdata: *mut c_void, p_instance: GDExtensionClassInstancePtr),
>;
pub type GDExtensionClassGetVirtual = Option<
    unsafe extern "C" fn(
        p_class_userdata: *mut c_void,
        p_name: *const c_char,
    ) -> GDExtensionClassCallVirtual,
>;

#[repr(C)]
#[derive(Copy, Clone, Debug)]
pub struct GDExtensionClassCreationInfo {
    pub is_virtual: GDExtensionBool,
    pub is_abstract: GDExtensionBool,
    pub create_instance_func: GDExtensionClassCreateInstance,
    pub free_instance_func: GDExtensionClassFreeInstance,
    pub get_virtual_func: GDExtensionClassGetVirtual,
    pub class_userdata: *mut c_void,
}

pub type GDExtensionCallableCustomCall = Option<
    unsafe extern "C" fn(
        callable_userdata: *mut c_void,
        p_args: *const GDExtensionConstVariantPtr,
        p_argument_count: GDExtensionInt,
        r_return: GDExtensionVariantPtr,
        r_error: *mut GDExtensionCallError,
    ),
>;
pub type GDExtensionCallableCustomFree = Option<unsafe extern "C" fn(callable_userdata: *mut c_void)>;

#[repr(C)]
#[derive(Copy, Clone, Debug)]
pub struct GDExtensionCallableCustomInfo {
    pub callable_userdata: *mut c_void,
    pub library: GDExtensionClassLibraryPtr,
    pub call_func: GDExtensionCallableCustomCall,
    pub free_func: GDExtensionCallableCustomFree,
}

pub type GDExtensionVariantFromTypeConstructorFunc =
    Option<unsafe extern "C" fn(r_dest: GDExtensionUninitializedVariantPtr, p_src: GDExtensionTypePtr)>;
pub type GDExtensionTypeFromVariantConstructorFunc =
    Option<unsafe extern "C" fn(r_dest: GDExtensionUninitializedTypePtr, p_src: GDExtensionVariantPtr)>;
pub type GDExtensionPtrConstructor = Option<
    unsafe extern "C" fn(p_base: GDExtensionUninitializedTypePtr, p_args: *const GDExtensionConstTypePtr),
>;
pub type GDExtensionPtrDestructor = Option<unsafe extern "C" fn(p_base: GDExtensionTypePtr)>;
pub type GDExtensionPtrBuiltInMethod = Option<
    unsafe extern "C" fn(
        p_base: GDExtensionTypePtr,
        p_args: *const GDExtensionConstTypePtr,
        r_return: GDExtensionTypePtr,
        p_argument_count: i32,
    ),
>;

#[repr(C)]
#[derive(Copy, Clone, Debug)]
pub struct GDExtensionInitialization {
    pub minimum_initialization_level: GDExtensionInitializationLevel,
    pub userdata: *mut c_void,
    pub initialize:
        Option<unsafe extern "C" fn(userdata: *mut c_void, p_level: GDExtensionInitializationLevel)>,
    pub deinitialize:
        Option<unsafe extern "C" fn(userdata: *mut c_void, p_level: GDExtensionInitializationLevel)>,
}

pub type GDExtensionInterfaceFunctionPtr = Option<unsafe extern "C" fn()>;
pub type GDExtensionInterfaceGetProcAddress =
    Option<unsafe extern "C" fn(p_function_name: *const c_char) -> GDExtensionInterfaceFunctionPtr>;
pub type GDExtensionInitializationFunction = Option<
    unsafe extern "C" fn(
        p_get_proc_address: GDExtensionInterfaceGetProcAddress,
        p_library: GDExtensionClassLibraryPtr,
        r_initialization: *mut GDExtensionInitialization,
    ) -> GDExtensionBool,
>;

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Function table

macro_rules! interface_table {
    (
        $(
            $( #[$attr:meta] )*
            fn $name:ident ( $( $param:ident : $ParamTy:ty ),* $(,)? ) $( -> $Ret:ty )? ;
        )*
    ) => {
        /// Entry points of the engine, resolved once by name.
        #[derive(Copy, Clone)]
        pub struct GDExtensionInterface {
            $(
                $( #[$attr] )*
                pub $name: Option<unsafe extern "C" fn( $( $param: $ParamTy ),* ) $( -> $Ret )? >,
            )*
        }

        impl GDExtensionInterface {
            /// Resolves every entry point through `get_proc_address`.
            ///
            /// # Safety
            /// `get_proc_address` must return either null or a function whose signature matches the requested name.
            pub unsafe fn load(
                get_proc_address: unsafe extern "C" fn(*const c_char) -> GDExtensionInterfaceFunctionPtr,
            ) -> Self {
                Self {
                    $(
                        $name: {
                            let fptr = get_proc_address(concat!(stringify!($name), "\0").as_ptr() as *const c_char);
                            std::mem::transmute::<
                                GDExtensionInterfaceFunctionPtr,
                                Option<unsafe extern "C" fn( $( $ParamTy ),* ) $( -> $Ret )? >,
                            >(fptr)
                        },
                    )*
                }
            }

            /// Names of all entry points the engine did not provide.
            pub fn missing_functions(&self) -> Vec<&'static str> {
                let mut missing = vec![];
                $(
                    if self.$name.is_none() {
                        missing.push(stringify!($name));
                    }
                )*
                missing
            }

            /// All entry point names, in declaration order.
            pub const FUNCTION_NAMES: &'static [&'static str] = &[ $( stringify!($name) ),* ];
        }
    };
}

interface_table! {
    fn get_godot_version(r_godot_version: *mut GDExtensionGodotVersion);

    fn print_error(
        p_description: *const c_char,
        p_function: *const c_char,
        p_file: *const c_char,
        p_line: i32,
        p_editor_notify: GDExtensionBool,
    );
    fn print_warning(
        p_description: *const c_char,
        p_function: *const c_char,
        p_file: *const c_char,
        p_line: i32,
        p_editor_notify: GDExtensionBool,
    );

    // Variant
    fn variant_new_copy(r_dest: GDExtensionUninitializedVariantPtr, p_src: GDExtensionConstVariantPtr);
    fn variant_new_nil(r_dest: GDExtensionUninitializedVariantPtr);
    fn variant_destroy(p_self: GDExtensionVariantPtr);
    fn variant_get_type(p_self: GDExtensionConstVariantPtr) -> GDExtensionVariantType;
    fn variant_evaluate(
        p_op: GDExtensionVariantOperator,
        p_a: GDExtensionConstVariantPtr,
        p_b: GDExtensionConstVariantPtr,
        r_return: GDExtensionUninitializedVariantPtr,
        r_valid: *mut GDExtensionBool,
    );
    fn variant_stringify(p_self: GDExtensionConstVariantPtr, r_ret: GDExtensionUninitializedStringPtr);
    fn get_variant_from_type_constructor(p_type: GDExtensionVariantType) -> GDExtensionVariantFromTypeConstructorFunc;
    fn get_variant_to_type_constructor(p_type: GDExtensionVariantType) -> GDExtensionTypeFromVariantConstructorFunc;
    fn variant_get_ptr_constructor(p_type: GDExtensionVariantType, p_constructor: i32) -> GDExtensionPtrConstructor;
    fn variant_get_ptr_destructor(p_type: GDExtensionVariantType) -> GDExtensionPtrDestructor;
    fn variant_get_ptr_builtin_method(
        p_type: GDExtensionVariantType,
        p_method: *const c_char,
        p_hash: GDExtensionInt,
    ) -> GDExtensionPtrBuiltInMethod;

    // Strings and containers
    fn string_new_with_utf8_chars_and_len(
        r_dest: GDExtensionUninitializedStringPtr,
        p_contents: *const c_char,
        p_size: GDExtensionInt,
    );
    fn string_to_utf8_chars(
        p_self: GDExtensionConstStringPtr,
        r_text: *mut c_char,
        p_max_write_length: GDExtensionInt,
    ) -> GDExtensionInt;
    fn array_operator_index(p_self: GDExtensionTypePtr, p_index: GDExtensionInt) -> GDExtensionVariantPtr;
    fn dictionary_operator_index(p_self: GDExtensionTypePtr, p_key: GDExtensionConstVariantPtr) -> GDExtensionVariantPtr;
    fn packed_byte_array_operator_index(p_self: GDExtensionTypePtr, p_index: GDExtensionInt) -> *mut u8;
    fn packed_int32_array_operator_index(p_self: GDExtensionTypePtr, p_index: GDExtensionInt) -> *mut i32;
    fn packed_int64_array_operator_index(p_self: GDExtensionTypePtr, p_index: GDExtensionInt) -> *mut i64;
    fn packed_float32_array_operator_index(p_self: GDExtensionTypePtr, p_index: GDExtensionInt) -> *mut f32;
    fn packed_float64_array_operator_index(p_self: GDExtensionTypePtr, p_index: GDExtensionInt) -> *mut f64;
    fn packed_string_array_operator_index(p_self: GDExtensionTypePtr, p_index: GDExtensionInt) -> GDExtensionStringPtr;
    fn packed_vector2_array_operator_index(p_self: GDExtensionTypePtr, p_index: GDExtensionInt) -> GDExtensionTypePtr;
    fn callable_custom_create(
        r_callable: GDExtensionUninitializedTypePtr,
        p_callable_custom_info: *mut GDExtensionCallableCustomInfo,
    );

    // ClassDB
    fn classdb_construct_object(p_classname: *const c_char) -> GDExtensionObjectPtr;
    fn classdb_get_method_bind(
        p_classname: *const c_char,
        p_methodname: *const c_char,
        p_hash: GDExtensionInt,
    ) -> GDExtensionMethodBindPtr;
    fn classdb_get_class_tag(p_classname: *const c_char) -> *mut c_void;
    fn classdb_register_extension_class(
        p_library: GDExtensionClassLibraryPtr,
        p_class_name: *const c_char,
        p_parent_class_name: *const c_char,
        p_extension_funcs: *const GDExtensionClassCreationInfo,
    );
    fn classdb_unregister_extension_class(p_library: GDExtensionClassLibraryPtr, p_class_name: *const c_char);

    // Object
    fn object_method_bind_call(
        p_method_bind: GDExtensionMethodBindPtr,
        p_instance: GDExtensionObjectPtr,
        p_args: *const GDExtensionConstVariantPtr,
        p_arg_count: GDExtensionInt,
        r_ret: GDExtensionUninitializedVariantPtr,
        r_error: *mut GDExtensionCallError,
    );
    fn object_method_bind_ptrcall(
        p_method_bind: GDExtensionMethodBindPtr,
        p_instance: GDExtensionObjectPtr,
        p_args: *const GDExtensionConstTypePtr,
        r_ret: GDExtensionTypePtr,
    );
    fn object_destroy(p_o: GDExtensionObjectPtr);
    fn object_get_instance_from_id(p_instance_id: GDObjectInstanceID) -> GDExtensionObjectPtr;
    fn object_get_instance_id(p_object: GDExtensionConstObjectPtr) -> GDObjectInstanceID;
    fn object_cast_to(p_object: GDExtensionConstObjectPtr, p_class_tag: *mut c_void) -> GDExtensionObjectPtr;
    fn object_get_class_name(
        p_object: GDExtensionConstObjectPtr,
        p_library: GDExtensionClassLibraryPtr,
        r_class_name: GDExtensionUninitializedStringPtr,
    ) -> GDExtensionBool;
    fn object_set_instance(
        p_o: GDExtensionObjectPtr,
        p_classname: *const c_char,
        p_instance: GDExtensionClassInstancePtr,
    );
    fn object_get_instance(p_o: GDExtensionConstObjectPtr) -> GDExtensionClassInstancePtr;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn function_names_are_unique() {
        let mut names = GDExtensionInterface::FUNCTION_NAMES.to_vec();
        let total = names.len();
        names.sort_unstable();
        names.dedup();

        assert_eq!(names.len(), total);
        assert!(names.contains(&"object_method_bind_ptrcall"));
    }

    #[test]
    fn load_reports_missing_functions() {
        unsafe extern "C" fn only_version(name: *const c_char) -> GDExtensionInterfaceFunctionPtr {
            unsafe extern "C" fn get_version(r_version: *mut GDExtensionGodotVersion) {
                (*r_version).major = 4;
            }

            let name = std::ffi::CStr::from_ptr(name);
            if name.to_bytes() == b"get_godot_version" {
                Some(std::mem::transmute::<*const (), unsafe extern "C" fn()>(
                    get_version as *const (),
                ))
            } else {
                None
            }
        }

        let interface = unsafe { GDExtensionInterface::load(only_version) };
        let missing = interface.missing_functions();

        assert!(interface.get_godot_version.is_some());
        assert_eq!(missing.len(), GDExtensionInterface::FUNCTION_NAMES.len() - 1);
        assert!(!missing.contains(&"get_godot_version"));
    }
}
