/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Method binds of the native classes, with ptrcall and varcall entry points.
//!
//! Each bind records its parameter types, so varcalls are validated and converted the way the engine does it before
//! the ptrcall implementation runs.

use std::ffi::c_void;
use std::ptr;
use std::sync::Arc;

use gdbind_ffi as sys;
use sys::VariantType;

use crate::audit::report_error;
use crate::objects::{self, ObjPtr};
use crate::variant::{self, CallableData, GStr, PackedElem, Var};

/// Maximum number of entries `Vector2Sum::push_value` accepts; matches the class constant `MAX_VALUES`.
const VECTOR2SUM_MAX_VALUES: usize = 64;

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub(crate) enum Ty {
    Of(VariantType),
    Variant,
    /// Raw pointer; only reachable through ptrcall.
    Pointer,
}

#[derive(Copy, Clone, Debug)]
enum DefaultArg {
    Bool(bool),
    Float(f64),
    Int(i64),
    Str(&'static str),
}

impl DefaultArg {
    fn to_var(self) -> Var {
        match self {
            Self::Bool(b) => Var::bool(b),
            Self::Float(f) => Var::float(f),
            Self::Int(i) => Var::int(i),
            Self::Str(s) => Var::string(s),
        }
    }
}

pub(crate) struct Param {
    ty: Ty,
    default: Option<DefaultArg>,
}

type PtrImpl = unsafe fn(obj: ObjPtr, args: &PtrArgs, ret: PtrRet);
type VarargImpl = unsafe fn(obj: ObjPtr, args: &[&Var]) -> Result<Var, sys::GDExtensionCallError>;

enum Imp {
    Ptr(PtrImpl),
    Vararg(VarargImpl),
}

pub(crate) struct MethodBind {
    pub class: &'static str,
    pub name: &'static str,
    hash: i64,
    params: &'static [Param],
    ret: Option<Ty>,
    imp: Imp,
}

const fn p(ty: VariantType) -> Param {
    Param { ty: Ty::Of(ty), default: None }
}

const fn p_default(ty: VariantType, default: DefaultArg) -> Param {
    Param {
        ty: Ty::Of(ty),
        default: Some(default),
    }
}

const fn ret(ty: VariantType) -> Option<Ty> {
    Some(Ty::Of(ty))
}

use VariantType as T;

static METHOD_BINDS: &[MethodBind] = &[
    // Object
    MethodBind { class: "Object", name: "get_class", hash: 201670096, params: &[], ret: ret(T::String), imp: Imp::Ptr(object_get_class) },
    MethodBind { class: "Object", name: "get_instance_id", hash: 2455072627, params: &[], ret: ret(T::Int), imp: Imp::Ptr(object_get_instance_id) },
    MethodBind { class: "Object", name: "has_method", hash: 2619796661, params: &[p(T::String)], ret: ret(T::Bool), imp: Imp::Ptr(object_has_method) },
    MethodBind { class: "Object", name: "call", hash: 3400424181, params: &[], ret: Some(Ty::Variant), imp: Imp::Vararg(object_call) },
    MethodBind { class: "Object", name: "emit_signal", hash: 4047867050, params: &[], ret: ret(T::Int), imp: Imp::Vararg(object_emit_signal) },
    MethodBind {
        class: "Object",
        name: "connect",
        hash: 1518946055,
        params: &[p(T::String), p(T::Callable), p_default(T::Int, DefaultArg::Int(0))],
        ret: ret(T::Int),
        imp: Imp::Ptr(object_connect),
    },
    // RefCounted
    MethodBind { class: "RefCounted", name: "init_ref", hash: 2240911060, params: &[], ret: ret(T::Bool), imp: Imp::Ptr(refcounted_init_ref) },
    MethodBind { class: "RefCounted", name: "reference", hash: 2240911060, params: &[], ret: ret(T::Bool), imp: Imp::Ptr(refcounted_reference) },
    MethodBind { class: "RefCounted", name: "unreference", hash: 2240911060, params: &[], ret: ret(T::Bool), imp: Imp::Ptr(refcounted_unreference) },
    MethodBind { class: "RefCounted", name: "get_reference_count", hash: 3905245786, params: &[], ret: ret(T::Int), imp: Imp::Ptr(refcounted_get_reference_count) },
    // Node
    MethodBind { class: "Node", name: "set_name", hash: 83702148, params: &[p(T::String)], ret: None, imp: Imp::Ptr(set_name) },
    MethodBind { class: "Node", name: "get_name", hash: 2002593661, params: &[], ret: ret(T::String), imp: Imp::Ptr(get_name) },
    MethodBind {
        class: "Node",
        name: "add_child",
        hash: 3863233950,
        params: &[p(T::Object), p_default(T::Bool, DefaultArg::Bool(false))],
        ret: None,
        imp: Imp::Ptr(node_add_child),
    },
    MethodBind { class: "Node", name: "get_child", hash: 541253412, params: &[p(T::Int)], ret: ret(T::Object), imp: Imp::Ptr(node_get_child) },
    MethodBind { class: "Node", name: "get_child_count", hash: 894402480, params: &[], ret: ret(T::Int), imp: Imp::Ptr(node_get_child_count) },
    MethodBind { class: "Node", name: "set_process_mode", hash: 1841290486, params: &[p(T::Int)], ret: None, imp: Imp::Ptr(node_set_process_mode) },
    MethodBind { class: "Node", name: "get_process_mode", hash: 739966102, params: &[], ret: ret(T::Int), imp: Imp::Ptr(node_get_process_mode) },
    // Node2D
    MethodBind { class: "Node2D", name: "set_position", hash: 743155724, params: &[p(T::Vector2)], ret: None, imp: Imp::Ptr(node2d_set_position) },
    MethodBind { class: "Node2D", name: "get_position", hash: 3341600327, params: &[], ret: ret(T::Vector2), imp: Imp::Ptr(node2d_get_position) },
    MethodBind { class: "Node2D", name: "rotate", hash: 373806689, params: &[p(T::Float)], ret: None, imp: Imp::Ptr(node2d_rotate) },
    MethodBind { class: "Node2D", name: "get_rotation", hash: 1740695150, params: &[], ret: ret(T::Float), imp: Imp::Ptr(node2d_get_rotation) },
    // Resource
    MethodBind { class: "Resource", name: "set_name", hash: 83702148, params: &[p(T::String)], ret: None, imp: Imp::Ptr(set_name) },
    MethodBind { class: "Resource", name: "get_name", hash: 201670096, params: &[], ret: ret(T::String), imp: Imp::Ptr(get_name) },
    // Vector2Sum
    MethodBind { class: "Vector2Sum", name: "add", hash: 2421519937, params: &[p(T::Float), p(T::Float)], ret: ret(T::Float), imp: Imp::Ptr(sum_add) },
    MethodBind {
        class: "Vector2Sum",
        name: "add_vectors",
        hash: 2536981235,
        params: &[p(T::Vector2), p(T::Vector2)],
        ret: ret(T::Vector2),
        imp: Imp::Ptr(sum_add_vectors),
    },
    MethodBind {
        class: "Vector2Sum",
        name: "scale",
        hash: 3046346296,
        params: &[p(T::Vector2), p_default(T::Float, DefaultArg::Float(2.0))],
        ret: ret(T::Vector2),
        imp: Imp::Ptr(sum_scale),
    },
    MethodBind {
        class: "Vector2Sum",
        name: "sum_array",
        hash: 2380489151,
        params: &[p(T::PackedFloat64Array)],
        ret: ret(T::Float),
        imp: Imp::Ptr(sum_sum_array),
    },
    MethodBind {
        class: "Vector2Sum",
        name: "join",
        hash: 1304263574,
        params: &[p(T::PackedStringArray), p_default(T::String, DefaultArg::Str(", "))],
        ret: ret(T::String),
        imp: Imp::Ptr(sum_join),
    },
    MethodBind { class: "Vector2Sum", name: "check_positive", hash: 3391281136, params: &[p(T::Int)], ret: ret(T::Int), imp: Imp::Ptr(sum_check_positive) },
    MethodBind {
        class: "Vector2Sum",
        name: "fill_squares",
        hash: 1286410249,
        params: &[Param { ty: Ty::Pointer, default: None }, p(T::Int)],
        ret: None,
        imp: Imp::Ptr(sum_fill_squares),
    },
    MethodBind { class: "Vector2Sum", name: "push_value", hash: 1286410250, params: &[p(T::Int)], ret: None, imp: Imp::Ptr(sum_push_value) },
    MethodBind { class: "Vector2Sum", name: "values", hash: 3995934104, params: &[], ret: ret(T::PackedInt64Array), imp: Imp::Ptr(sum_values) },
    MethodBind { class: "Vector2Sum", name: "values", hash: 2870101100, params: &[], ret: ret(T::PackedInt64Array), imp: Imp::Ptr(sum_values) },
    MethodBind { class: "Vector2Sum", name: "combine", hash: 1012200034, params: &[p(T::Float), p(T::Float)], ret: ret(T::Float), imp: Imp::Ptr(sum_combine) },
];

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Lookup

/// Resolves a bind like `ClassDB::get_method_with_compatibility`: the class and its ancestors are searched, and the
/// hash must match exactly.
pub(crate) fn find_bind(class: &str, method: &str, hash: i64) -> Result<&'static MethodBind, String> {
    let mut candidates = METHOD_BINDS
        .iter()
        .filter(|bind| bind.name == method && class_inherits(class, bind.class))
        .peekable();

    if candidates.peek().is_none() {
        return Err(format!("method '{class}::{method}' does not exist"));
    }

    candidates
        .find(|bind| bind.hash == hash)
        .ok_or_else(|| format!("method '{class}::{method}' has no bind with hash {hash}; the API version differs"))
}

/// Static inheritance among native classes, used before any object exists.
fn class_inherits(class: &str, ancestor: &str) -> bool {
    let parent = |c: &str| match c {
        "RefCounted" | "Node" => Some("Object"),
        "Node2D" => Some("Node"),
        "Resource" | "Vector2Sum" => Some("RefCounted"),
        _ => None,
    };

    std::iter::successors(Some(class), |c| parent(c)).any(|c| c == ancestor)
}

/// First bind named `method` along the object's native class chain.
fn find_bind_by_name(obj: ObjPtr, method: &str) -> Option<&'static MethodBind> {
    objects::native_chain(obj).into_iter().find_map(|class| {
        METHOD_BINDS
            .iter()
            .find(|bind| bind.class == class && bind.name == method)
    })
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Calls

pub(crate) fn call_error(error: sys::GDExtensionCallErrorType, argument: i32, expected: i32) -> sys::GDExtensionCallError {
    sys::GDExtensionCallError {
        error,
        argument,
        expected,
    }
}

/// Writes a default value of the return type, so the caller always finds an initialized return slot.
unsafe fn write_default_return(ty: Option<Ty>, ret: sys::GDExtensionTypePtr) {
    if ret.is_null() {
        return;
    }

    match ty {
        Some(Ty::Of(ty)) => variant::default_native(ty, ret),
        Some(Ty::Variant) => Var::nil().write_into(ret),
        Some(Ty::Pointer) => ptr::write(ret as *mut *mut c_void, ptr::null_mut()),
        None => {}
    }
}

/// Entry point for `object_method_bind_ptrcall`.
pub(crate) unsafe fn ptrcall(
    bind: &'static MethodBind,
    obj: ObjPtr,
    args: *const sys::GDExtensionConstTypePtr,
    ret: sys::GDExtensionTypePtr,
) {
    if let Err(message) = objects::check_receiver(obj, bind.class) {
        report_error(format!("{}::{}: {message}", bind.class, bind.name));
        write_default_return(bind.ret, ret);
        return;
    }

    match bind.imp {
        Imp::Ptr(imp) => imp(obj, &PtrArgs(args), PtrRet(ret)),
        Imp::Vararg(_) => {
            report_error(format!("{}::{}: vararg method cannot be ptrcalled", bind.class, bind.name));
            write_default_return(bind.ret, ret);
        }
    }
}

/// Entry point for `object_method_bind_call`: validates, converts and dispatches.
pub(crate) unsafe fn varcall(
    bind: &'static MethodBind,
    obj: ObjPtr,
    args: &[&Var],
) -> Result<Var, sys::GDExtensionCallError> {
    if let Err(message) = objects::check_receiver(obj, bind.class) {
        report_error(format!("{}::{}: {message}", bind.class, bind.name));
        return Err(call_error(sys::GDEXTENSION_CALL_ERROR_INSTANCE_IS_NULL, 0, 0));
    }

    let imp = match bind.imp {
        Imp::Vararg(imp) => return imp(obj, args),
        Imp::Ptr(imp) => imp,
    };

    let param_count = bind.params.len();
    let required = bind.params.iter().filter(|p| p.default.is_none()).count();
    if args.len() > param_count {
        return Err(call_error(sys::GDEXTENSION_CALL_ERROR_TOO_MANY_ARGUMENTS, 0, param_count as i32));
    }
    if args.len() < required {
        return Err(call_error(sys::GDEXTENSION_CALL_ERROR_TOO_FEW_ARGUMENTS, 0, required as i32));
    }

    let mut slots = vec![[0u64; 3]; param_count];
    for (index, param) in bind.params.iter().enumerate() {
        let slot = slots[index].as_mut_ptr() as *mut c_void;
        let converted = match (args.get(index), param.default) {
            (Some(arg), _) => coerce_into_slot(param.ty, arg, slot),
            (None, Some(default)) => coerce_into_slot(param.ty, &default.to_var(), slot),
            (None, None) => false,
        };

        if !converted {
            for (filled, param) in slots.iter_mut().zip(bind.params).take(index) {
                release_slot(param.ty, filled.as_mut_ptr() as *mut c_void);
            }

            let expected = match param.ty {
                Ty::Of(ty) => ty.sys(),
                Ty::Variant | Ty::Pointer => VariantType::Nil.sys(),
            };
            return Err(call_error(sys::GDEXTENSION_CALL_ERROR_INVALID_ARGUMENT, index as i32, expected));
        }
    }

    let arg_ptrs: Vec<sys::GDExtensionConstTypePtr> =
        slots.iter().map(|slot| slot.as_ptr() as sys::GDExtensionConstTypePtr).collect();

    let mut ret_slot = [0u64; 3];
    let ret_ptr = match bind.ret {
        Some(_) => ret_slot.as_mut_ptr() as sys::GDExtensionTypePtr,
        None => ptr::null_mut(),
    };

    imp(obj, &PtrArgs(arg_ptrs.as_ptr()), PtrRet(ret_ptr));

    for (slot, param) in slots.iter_mut().zip(bind.params) {
        release_slot(param.ty, slot.as_mut_ptr() as *mut c_void);
    }

    let value = match bind.ret {
        Some(Ty::Of(ty)) => {
            let value = Var::from_native(ty, ret_ptr);
            release_slot(Ty::Of(ty), ret_ptr);
            value
        }
        Some(Ty::Variant) => ptr::read(ret_ptr as *const Var),
        Some(Ty::Pointer) | None => Var::nil(),
    };

    Ok(value)
}

/// Converts a variant argument to the native parameter type. `int` converts to `float`, `nil` to a null object.
unsafe fn coerce_into_slot(ty: Ty, arg: &Var, slot: *mut c_void) -> bool {
    match ty {
        Ty::Variant => {
            arg.clone().write_into(slot);
            true
        }
        Ty::Pointer => false,
        Ty::Of(VariantType::Float) if arg.ty() == VariantType::Int => {
            ptr::write(slot as *mut f64, arg.as_float().unwrap_or_default());
            true
        }
        Ty::Of(VariantType::Object) if arg.ty() == VariantType::Nil => {
            ptr::write(slot as *mut ObjPtr, ptr::null_mut());
            true
        }
        Ty::Of(ty) if ty == arg.ty() => {
            arg.write_native(slot);
            true
        }
        Ty::Of(_) => false,
    }
}

unsafe fn release_slot(ty: Ty, slot: *mut c_void) {
    match ty {
        Ty::Of(ty) => variant::destroy_native(ty, slot),
        Ty::Variant => ptr::drop_in_place(slot as *mut Var),
        Ty::Pointer => {}
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Argument access

/// Native arguments of a ptrcall; each entry points to a value of the parameter's type.
pub(crate) struct PtrArgs(*const sys::GDExtensionConstTypePtr);

impl PtrArgs {
    pub fn new(args: *const sys::GDExtensionConstTypePtr) -> Self {
        Self(args)
    }

    unsafe fn at(&self, index: usize) -> *const c_void {
        *self.0.add(index)
    }

    pub unsafe fn int(&self, index: usize) -> i64 {
        *(self.at(index) as *const i64)
    }

    pub unsafe fn float(&self, index: usize) -> f64 {
        *(self.at(index) as *const f64)
    }

    unsafe fn bool(&self, index: usize) -> bool {
        *(self.at(index) as *const u8) != 0
    }

    unsafe fn string(&self, index: usize) -> String {
        variant::string_at(self.at(index)).to_string()
    }

    unsafe fn vector2(&self, index: usize) -> [f32; 2] {
        *(self.at(index) as *const [f32; 2])
    }

    unsafe fn object(&self, index: usize) -> ObjPtr {
        *(self.at(index) as *const ObjPtr)
    }

    unsafe fn callable(&self, index: usize) -> Option<Arc<CallableData>> {
        variant::callable_at(self.at(index))
    }

    unsafe fn packed<T: PackedElem>(&self, index: usize) -> Vec<T> {
        variant::packed_at::<T>(self.at(index)).clone()
    }

    unsafe fn raw_pointer(&self, index: usize) -> *mut c_void {
        *(self.at(index) as *const *mut c_void)
    }
}

/// Uninitialized return slot of a ptrcall; null for methods without return value.
pub(crate) struct PtrRet(sys::GDExtensionTypePtr);

impl PtrRet {
    pub fn new(ret: sys::GDExtensionTypePtr) -> Self {
        Self(ret)
    }

    unsafe fn write<V>(self, value: V) {
        if !self.0.is_null() {
            ptr::write(self.0 as *mut V, value);
        }
    }

    pub unsafe fn int(self, value: i64) {
        self.write(value)
    }

    pub unsafe fn float(self, value: f64) {
        self.write(value)
    }

    unsafe fn bool(self, value: bool) {
        self.write(value as u8)
    }

    unsafe fn string(self, value: &str) {
        self.write(GStr::new(value))
    }

    unsafe fn vector2(self, value: [f32; 2]) {
        self.write(value)
    }

    unsafe fn object(self, value: ObjPtr) {
        self.write(value)
    }

    unsafe fn packed<T: PackedElem>(self, items: Vec<T>) {
        self.write([variant::new_packed(items), 0u64])
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Object

unsafe fn object_get_class(obj: ObjPtr, _args: &PtrArgs, ret: PtrRet) {
    ret.string(&objects::class_name_of(obj).unwrap_or_default());
}

unsafe fn object_get_instance_id(obj: ObjPtr, _args: &PtrArgs, ret: PtrRet) {
    ret.int(objects::instance_id(obj) as i64);
}

unsafe fn object_has_method(obj: ObjPtr, args: &PtrArgs, ret: PtrRet) {
    ret.bool(find_bind_by_name(obj, &args.string(0)).is_some());
}

unsafe fn object_call(obj: ObjPtr, args: &[&Var]) -> Result<Var, sys::GDExtensionCallError> {
    let Some(first) = args.first() else {
        return Err(call_error(sys::GDEXTENSION_CALL_ERROR_TOO_FEW_ARGUMENTS, 0, 1));
    };

    let Some(method) = first.as_str() else {
        return Err(call_error(
            sys::GDEXTENSION_CALL_ERROR_INVALID_ARGUMENT,
            0,
            VariantType::String.sys(),
        ));
    };

    let Some(bind) = find_bind_by_name(obj, method) else {
        return Err(call_error(sys::GDEXTENSION_CALL_ERROR_INVALID_METHOD, 0, 0));
    };

    // Errors count the method name as argument #0.
    varcall(bind, obj, &args[1..]).map_err(|mut err| {
        match err.error {
            sys::GDEXTENSION_CALL_ERROR_INVALID_ARGUMENT => err.argument += 1,
            sys::GDEXTENSION_CALL_ERROR_TOO_MANY_ARGUMENTS | sys::GDEXTENSION_CALL_ERROR_TOO_FEW_ARGUMENTS => {
                err.expected += 1
            }
            _ => {}
        }
        err
    })
}

unsafe fn object_emit_signal(obj: ObjPtr, args: &[&Var]) -> Result<Var, sys::GDExtensionCallError> {
    let Some(first) = args.first() else {
        return Err(call_error(sys::GDEXTENSION_CALL_ERROR_TOO_FEW_ARGUMENTS, 0, 1));
    };

    let Some(signal) = first.as_str() else {
        return Err(call_error(
            sys::GDEXTENSION_CALL_ERROR_INVALID_ARGUMENT,
            0,
            VariantType::String.sys(),
        ));
    };

    Ok(Var::int(emit_signal(obj, signal, &args[1..])))
}

unsafe fn object_connect(obj: ObjPtr, args: &PtrArgs, ret: PtrRet) {
    let code = objects::connect(obj, &args.string(0), args.callable(1), args.int(2));
    ret.int(code);
}

/// Calls every callable connected to `signal`, in connection order. Returns an engine `Error` code.
pub(crate) unsafe fn emit_signal(obj: ObjPtr, signal: &str, args: &[&Var]) -> i64 {
    if !objects::has_signal(obj, signal) {
        report_error(format!("emit_signal: signal '{signal}' does not exist"));
        return objects::ERR_UNAVAILABLE;
    }

    let arg_ptrs: Vec<*const c_void> = args.iter().map(|v| *v as *const Var as *const c_void).collect();
    for callable in objects::take_emission_targets(obj, signal) {
        if let Err(err) = callable.call(&arg_ptrs) {
            report_error(format!(
                "emit_signal: callable connected to '{signal}' failed with call error {}",
                err.error
            ));
        }
    }

    objects::OK
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// RefCounted

unsafe fn refcounted_init_ref(obj: ObjPtr, _args: &PtrArgs, ret: PtrRet) {
    ret.bool(objects::init_ref(obj));
}

unsafe fn refcounted_reference(obj: ObjPtr, _args: &PtrArgs, ret: PtrRet) {
    ret.bool(objects::reference(obj));
}

unsafe fn refcounted_unreference(obj: ObjPtr, _args: &PtrArgs, ret: PtrRet) {
    ret.bool(objects::unreference(obj));
}

unsafe fn refcounted_get_reference_count(obj: ObjPtr, _args: &PtrArgs, ret: PtrRet) {
    ret.int(objects::reference_count_of(obj));
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Node, Node2D, Resource

unsafe fn set_name(obj: ObjPtr, args: &PtrArgs, _ret: PtrRet) {
    let name = args.string(0);
    objects::with_state(obj, |state| state.name = name);
}

unsafe fn get_name(obj: ObjPtr, _args: &PtrArgs, ret: PtrRet) {
    let name = objects::with_state(obj, |state| state.name.clone()).unwrap_or_default();
    ret.string(&name);
}

unsafe fn node_add_child(obj: ObjPtr, args: &PtrArgs, _ret: PtrRet) {
    let child = args.object(0);
    if child.is_null() {
        report_error("Node::add_child: parameter \"node\" is null");
        return;
    }

    if let Err(message) = objects::check_receiver(child, "Node") {
        report_error(format!("Node::add_child: {message}"));
        return;
    }

    match objects::attach_child(obj, child) {
        Ok(()) => {
            let child_var = Var::object(child);
            emit_signal(obj, "child_entered_tree", &[&child_var]);
        }
        Err(message) => report_error(format!("Node::add_child: {message}")),
    }
}

unsafe fn node_get_child(obj: ObjPtr, args: &PtrArgs, ret: PtrRet) {
    match objects::child_at(obj, args.int(0)) {
        Ok(child) => ret.object(child),
        Err(message) => {
            report_error(format!("Node::get_child: {message}"));
            ret.object(ptr::null_mut());
        }
    }
}

unsafe fn node_get_child_count(obj: ObjPtr, _args: &PtrArgs, ret: PtrRet) {
    ret.int(objects::child_count(obj));
}

unsafe fn node_set_process_mode(obj: ObjPtr, args: &PtrArgs, _ret: PtrRet) {
    let mode = args.int(0);
    objects::with_state(obj, |state| state.process_mode = mode);
}

unsafe fn node_get_process_mode(obj: ObjPtr, _args: &PtrArgs, ret: PtrRet) {
    ret.int(objects::with_state(obj, |state| state.process_mode).unwrap_or_default());
}

unsafe fn node2d_set_position(obj: ObjPtr, args: &PtrArgs, _ret: PtrRet) {
    let position = args.vector2(0);
    objects::with_state(obj, |state| state.position = position);
}

unsafe fn node2d_get_position(obj: ObjPtr, _args: &PtrArgs, ret: PtrRet) {
    ret.vector2(objects::with_state(obj, |state| state.position).unwrap_or_default());
}

unsafe fn node2d_rotate(obj: ObjPtr, args: &PtrArgs, _ret: PtrRet) {
    let radians = args.float(0) as f32;
    objects::with_state(obj, |state| state.rotation += radians);
}

unsafe fn node2d_get_rotation(obj: ObjPtr, _args: &PtrArgs, ret: PtrRet) {
    let rotation = objects::with_state(obj, |state| state.rotation).unwrap_or_default();
    ret.float(rotation as f64);
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Vector2Sum

unsafe fn sum_add(_obj: ObjPtr, args: &PtrArgs, ret: PtrRet) {
    ret.float(args.float(0) + args.float(1));
}

unsafe fn sum_add_vectors(_obj: ObjPtr, args: &PtrArgs, ret: PtrRet) {
    let [ax, ay] = args.vector2(0);
    let [bx, by] = args.vector2(1);
    ret.vector2([ax + bx, ay + by]);
}

unsafe fn sum_scale(_obj: ObjPtr, args: &PtrArgs, ret: PtrRet) {
    let [x, y] = args.vector2(0);
    let factor = args.float(1) as f32;
    ret.vector2([x * factor, y * factor]);
}

unsafe fn sum_sum_array(_obj: ObjPtr, args: &PtrArgs, ret: PtrRet) {
    ret.float(args.packed::<f64>(0).iter().sum());
}

unsafe fn sum_join(_obj: ObjPtr, args: &PtrArgs, ret: PtrRet) {
    let parts = args.packed::<GStr>(0);
    let separator = args.string(1);

    let joined = parts.iter().map(GStr::as_str).collect::<Vec<_>>().join(&separator);
    ret.string(&joined);
}

unsafe fn sum_check_positive(_obj: ObjPtr, args: &PtrArgs, ret: PtrRet) {
    let code = if args.int(0) > 0 {
        objects::OK
    } else {
        objects::ERR_INVALID_PARAMETER
    };
    ret.int(code);
}

unsafe fn sum_fill_squares(_obj: ObjPtr, args: &PtrArgs, _ret: PtrRet) {
    let buffer = args.raw_pointer(0) as *mut f32;
    let count = args.int(1);

    if buffer.is_null() {
        report_error("Vector2Sum::fill_squares: buffer is null");
        return;
    }

    for i in 0..count.max(0) {
        *buffer.add(i as usize) = (i * i) as f32;
    }
}

unsafe fn sum_push_value(obj: ObjPtr, args: &PtrArgs, _ret: PtrRet) {
    let value = args.int(0);
    let pushed = objects::with_state(obj, |state| {
        if state.values.len() >= VECTOR2SUM_MAX_VALUES {
            false
        } else {
            state.values.push(value);
            true
        }
    });

    if pushed == Some(false) {
        report_error(format!(
            "Vector2Sum::push_value: capacity of {VECTOR2SUM_MAX_VALUES} values exceeded"
        ));
    }
}

unsafe fn sum_values(obj: ObjPtr, _args: &PtrArgs, ret: PtrRet) {
    let values = objects::with_state(obj, |state| state.values.clone()).unwrap_or_default();
    ret.packed(values);
}

/// Native `combine()`: asks the `_combine` virtual, then emits `summed` with the result.
unsafe fn sum_combine(obj: ObjPtr, args: &PtrArgs, ret: PtrRet) {
    let a = args.float(0);
    let b = args.float(1);
    let mut result = 0.0_f64;

    let virtual_args = [
        &a as *const f64 as sys::GDExtensionConstTypePtr,
        &b as *const f64 as sys::GDExtensionConstTypePtr,
    ];
    crate::extension::dispatch_virtual(
        obj,
        "_combine",
        &virtual_args,
        &mut result as *mut f64 as sys::GDExtensionTypePtr,
    );

    let result_var = Var::float(result);
    emit_signal(obj, "summed", &[&result_var]);
    ret.float(result);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_must_match() {
        assert!(find_bind("Vector2Sum", "add", 2421519937).is_ok());
        assert!(find_bind("Vector2Sum", "add", 1).is_err());
        assert!(find_bind("Vector2Sum", "subtract", 2421519937).is_err());
    }

    #[test]
    fn const_and_mut_overloads_are_distinct() {
        let as_const = find_bind("Vector2Sum", "values", 3995934104).expect("const bind");
        let as_mut = find_bind("Vector2Sum", "values", 2870101100).expect("mut bind");

        assert!(!ptr::eq(as_const, as_mut));
    }

    #[test]
    fn inherited_binds_resolve() {
        let bind = find_bind("Node2D", "set_name", 83702148).expect("inherited bind");
        assert_eq!(bind.class, "Node");
    }

    #[test]
    fn varcall_validates_and_coerces() {
        let obj = objects::construct("Vector2Sum");
        let add = find_bind("Vector2Sum", "add", 2421519937).expect("bind");

        let (one, half) = (Var::int(1), Var::float(0.5));
        let sum = unsafe { varcall(add, obj, &[&one, &half]) }.expect("int coerces to float");
        assert_eq!(sum.as_float(), Some(1.5));

        let text = Var::string("x");
        let err = unsafe { varcall(add, obj, &[&one, &text]) }.expect_err("string is no float");
        assert_eq!(err.error, sys::GDEXTENSION_CALL_ERROR_INVALID_ARGUMENT);
        assert_eq!(err.argument, 1);
        assert_eq!(err.expected, VariantType::Float.sys());

        let err = unsafe { varcall(add, obj, &[&one]) }.expect_err("too few");
        assert_eq!(err.error, sys::GDEXTENSION_CALL_ERROR_TOO_FEW_ARGUMENTS);
        assert_eq!(err.expected, 2);

        objects::destroy(obj);
    }

    #[test]
    fn varcall_fills_defaults() {
        let obj = objects::construct("Vector2Sum");
        let scale = find_bind("Vector2Sum", "scale", 3046346296).expect("bind");

        let v = Var::vector2([1.0, -2.0]);
        let scaled = unsafe { varcall(scale, obj, &[&v]) }.expect("default factor");
        assert!(variant::variant_eq(&scaled, &Var::vector2([2.0, -4.0])));

        objects::destroy(obj);
    }

    #[test]
    fn push_value_reports_overflow() {
        let obj = objects::construct("Vector2Sum");
        let push = find_bind("Vector2Sum", "push_value", 1286410250).expect("bind");

        for i in 0..=VECTOR2SUM_MAX_VALUES as i64 {
            let value = Var::int(i);
            unsafe { varcall(push, obj, &[&value]) }.expect("push");
        }

        let stored = objects::with_state(obj, |state| state.values.len());
        assert_eq!(stored, Some(VECTOR2SUM_MAX_VALUES));
        assert!(crate::printed_errors().iter().any(|e| e.contains("capacity of 64 values exceeded")));

        objects::destroy(obj);
    }
}
