/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Object registry: lifetimes, reference counts, the class hierarchy and per-object native state.
//!
//! Objects are leaked [`ObjectHeader`] allocations. The header only stores the instance ID, which stays readable after
//! the object is freed, so stale pointers are detected instead of dereferenced.
//!
//! The registry lock is never held while extension code runs (instance creation, freeing, virtual calls, callables).

use std::collections::BTreeMap;
use std::ffi::c_void;
use std::mem;
use std::ptr;
use std::sync::Arc;

use gdbind_ffi as sys;
use parking_lot::{Mutex, MutexGuard};

use crate::audit::report_error;
use crate::variant::CallableData;

#[repr(C)]
pub(crate) struct ObjectHeader {
    id: u64,
}

pub(crate) type ObjPtr = *mut ObjectHeader;

pub(crate) type ClassId = usize;

/// Instance IDs start high, so that truncation to 32 bits is noticed.
const FIRST_INSTANCE_ID: u64 = 1 << 33;

/// Bit of the `connect` flags that removes the connection after the first emission.
const CONNECT_ONE_SHOT: i64 = 4;

pub(crate) const OK: i64 = 0;
pub(crate) const ERR_UNAVAILABLE: i64 = 2;
pub(crate) const ERR_INVALID_PARAMETER: i64 = 31;
pub(crate) const ERR_ALREADY_EXISTS: i64 = 32;

pub(crate) fn instance_id(obj: ObjPtr) -> u64 {
    if obj.is_null() {
        0
    } else {
        // SAFETY: headers are never deallocated.
        unsafe { (*obj).id }
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Classes

pub(crate) struct NativeClass {
    pub name: &'static str,
    parent: Option<&'static str>,
    refcounted: bool,
    signals: &'static [&'static str],
}

static NATIVE_CLASSES: [NativeClass; 6] = [
    NativeClass {
        name: "Object",
        parent: None,
        refcounted: false,
        signals: &["script_changed"],
    },
    NativeClass {
        name: "RefCounted",
        parent: Some("Object"),
        refcounted: true,
        signals: &[],
    },
    NativeClass {
        name: "Node",
        parent: Some("Object"),
        refcounted: false,
        signals: &["child_entered_tree"],
    },
    NativeClass {
        name: "Node2D",
        parent: Some("Node"),
        refcounted: false,
        signals: &[],
    },
    NativeClass {
        name: "Resource",
        parent: Some("RefCounted"),
        refcounted: true,
        signals: &[],
    },
    NativeClass {
        name: "Vector2Sum",
        parent: Some("RefCounted"),
        refcounted: true,
        signals: &["summed"],
    },
];

struct ExtensionClass {
    info: sys::GDExtensionClassCreationInfo,
    registered: bool,
}

// SAFETY: the creation info is only handed back to the extension that registered it.
unsafe impl Send for ExtensionClass {}

enum ClassKind {
    Native(&'static NativeClass),
    Extension(ExtensionClass),
}

struct ClassEntry {
    name: String,
    parent: Option<ClassId>,
    kind: ClassKind,
}

impl ClassEntry {
    fn is_registered(&self) -> bool {
        match &self.kind {
            ClassKind::Native(_) => true,
            ClassKind::Extension(ext) => ext.registered,
        }
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Objects

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum Life {
    Alive,
    /// The extension's free callback is running; the object is still reachable.
    Destroying,
    Dead,
}

struct RefCount {
    count: u32,
    /// Set on construction; the first `init_ref` takes over the initial reference instead of adding one.
    init_pending: bool,
}

struct ExtensionInstance {
    class: ClassId,
    instance: usize,
}

struct ObjectRecord {
    ptr: usize,
    class: ClassId,
    extension: Option<ExtensionInstance>,
    life: Life,
    refcount: Option<RefCount>,
    destroy_count: u32,
    state: NativeState,
}

impl ObjectRecord {
    fn is_reachable(&self) -> bool {
        self.life != Life::Dead
    }

    /// Most derived class, including extension classes.
    fn dynamic_class(&self) -> ClassId {
        self.extension.as_ref().map_or(self.class, |ext| ext.class)
    }
}

/// Properties backing the native methods of the mock classes.
#[derive(Default)]
pub(crate) struct NativeState {
    pub name: String,
    pub position: [f32; 2],
    pub rotation: f32,
    pub process_mode: i64,
    pub values: Vec<i64>,
    parent: Option<u64>,
    children: Vec<u64>,
    connections: Vec<Connection>,
    default_calls: BTreeMap<String, u32>,
}

struct Connection {
    signal: String,
    callable: Arc<CallableData>,
    flags: i64,
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Registry

struct Registry {
    next_id: u64,
    classes: Vec<ClassEntry>,
    objects: BTreeMap<u64, ObjectRecord>,
}

static REGISTRY: Mutex<Registry> = Mutex::new(Registry {
    next_id: FIRST_INSTANCE_ID,
    classes: Vec::new(),
    objects: BTreeMap::new(),
});

fn registry() -> MutexGuard<'static, Registry> {
    let mut registry = REGISTRY.lock();
    if registry.classes.is_empty() {
        registry.add_native_classes();
    }

    registry
}

impl Registry {
    fn add_native_classes(&mut self) {
        for native in NATIVE_CLASSES.iter() {
            let parent = native.parent.and_then(|name| self.class_id(name));
            self.classes.push(ClassEntry {
                name: native.name.to_string(),
                parent,
                kind: ClassKind::Native(native),
            });
        }
    }

    fn class_id(&self, name: &str) -> Option<ClassId> {
        self.classes
            .iter()
            .position(|class| class.name == name && class.is_registered())
    }

    /// The class itself, followed by its ancestors.
    fn ancestors(&self, class: ClassId) -> impl Iterator<Item = ClassId> + '_ {
        std::iter::successors(Some(class), move |&c| self.classes[c].parent)
    }

    fn inherits(&self, class: ClassId, ancestor: ClassId) -> bool {
        self.ancestors(class).any(|c| c == ancestor)
    }

    fn native_class(&self, class: ClassId) -> &'static NativeClass {
        self.ancestors(class)
            .find_map(|c| match self.classes[c].kind {
                ClassKind::Native(native) => Some(native),
                ClassKind::Extension(_) => None,
            })
            .unwrap_or(&NATIVE_CLASSES[0])
    }

    fn record(&self, obj: ObjPtr) -> Option<&ObjectRecord> {
        self.objects
            .get(&instance_id(obj))
            .filter(|record| record.ptr == obj as usize)
    }

    fn record_mut(&mut self, obj: ObjPtr) -> Option<&mut ObjectRecord> {
        self.objects
            .get_mut(&instance_id(obj))
            .filter(|record| record.ptr == obj as usize)
    }

    fn reachable(&self, obj: ObjPtr) -> Option<&ObjectRecord> {
        self.record(obj).filter(|record| record.is_reachable())
    }

    fn reachable_mut(&mut self, obj: ObjPtr) -> Option<&mut ObjectRecord> {
        self.record_mut(obj).filter(|record| record.is_reachable())
    }

    fn new_object(&mut self, class: ClassId) -> ObjPtr {
        let id = self.next_id;
        self.next_id += 1;

        let ptr = Box::into_raw(Box::new(ObjectHeader { id }));
        let refcount = self.native_class(class).refcounted.then_some(RefCount {
            count: 1,
            init_pending: true,
        });

        self.objects.insert(
            id,
            ObjectRecord {
                ptr: ptr as usize,
                class,
                extension: None,
                life: Life::Alive,
                refcount,
                destroy_count: 0,
                state: NativeState::default(),
            },
        );

        ptr
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Class DB

pub(crate) fn class_tag(name: &str) -> *mut c_void {
    registry()
        .class_id(name)
        .map_or(ptr::null_mut(), |class| (class + 1) as *mut c_void)
}

pub(crate) fn register_extension_class(name: &str, parent: &str, info: sys::GDExtensionClassCreationInfo) {
    let mut registry = registry();

    if registry.class_id(name).is_some() {
        report_error(format!("register_extension_class: class '{name}' already exists"));
        return;
    }

    let Some(parent_id) = registry.class_id(parent) else {
        report_error(format!(
            "register_extension_class: parent class '{parent}' of '{name}' does not exist"
        ));
        return;
    };

    registry.classes.push(ClassEntry {
        name: name.to_string(),
        parent: Some(parent_id),
        kind: ClassKind::Extension(ExtensionClass { info, registered: true }),
    });
}

pub(crate) fn unregister_extension_class(name: &str) {
    let mut guard = registry();
    let registry = &mut *guard;

    let Some(class) = registry.class_id(name) else {
        report_error(format!("unregister_extension_class: class '{name}' is not registered"));
        return;
    };

    let ClassKind::Extension(ext) = &mut registry.classes[class].kind else {
        report_error(format!("unregister_extension_class: '{name}' is a native class"));
        return;
    };

    let live_instances = registry
        .objects
        .values()
        .filter(|record| record.is_reachable())
        .filter(|record| record.extension.as_ref().is_some_and(|e| e.class == class))
        .count();

    if live_instances > 0 {
        report_error(format!(
            "unregister_extension_class: class '{name}' still has {live_instances} live instance(s)"
        ));
    }

    ext.registered = false;
}

/// Instantiates a native class, or an extension class through its `create_instance` callback.
pub(crate) fn construct(class_name: &str) -> ObjPtr {
    let (create, userdata) = {
        let mut registry = registry();

        let Some(class) = registry.class_id(class_name) else {
            report_error(format!("construct_object: class '{class_name}' does not exist"));
            return ptr::null_mut();
        };

        match &registry.classes[class].kind {
            ClassKind::Native(_) => return registry.new_object(class),
            ClassKind::Extension(ext) => match ext.info.create_instance_func {
                Some(create) if ext.info.is_abstract == 0 => (create, ext.info.class_userdata),
                _ => {
                    report_error(format!("construct_object: class '{class_name}' is abstract"));
                    return ptr::null_mut();
                }
            },
        }
    };

    // SAFETY: callback and userdata were registered together by the extension.
    unsafe { create(userdata) as ObjPtr }
}

/// Frees an object: runs the extension's free callback, drops signal connections and frees child nodes.
///
/// Freeing an object twice is reported, and counted by [`destroy_count`].
pub(crate) fn destroy(obj: ObjPtr) {
    let id = instance_id(obj);

    let free_call = {
        let mut guard = registry();
        let registry = &mut *guard;

        let Some(record) = registry.record_mut(obj) else {
            report_error(format!("object_destroy: {obj:p} is not an object"));
            return;
        };

        if record.life != Life::Alive {
            record.destroy_count += 1;
            report_error(format!("object_destroy: object #{id} was already freed"));
            return;
        }

        record.life = Life::Destroying;
        let extension = record.extension.as_ref().map(|e| (e.class, e.instance));

        extension.and_then(|(class, instance)| match &registry.classes[class].kind {
            ClassKind::Extension(ext) => ext
                .info
                .free_instance_func
                .map(|free| (free, ext.info.class_userdata, instance)),
            ClassKind::Native(_) => None,
        })
    };

    if let Some((free, userdata, instance)) = free_call {
        // SAFETY: instance was attached through `object_set_instance` for this class.
        unsafe { free(userdata, instance as *mut c_void) };
    }

    let (connections, children) = {
        let mut guard = registry();
        let registry = &mut *guard;

        let Some(record) = registry.objects.get_mut(&id) else {
            return;
        };

        record.life = Life::Dead;
        record.destroy_count += 1;
        record.extension = None;

        let connections = mem::take(&mut record.state.connections);
        let children = mem::take(&mut record.state.children);
        let parent = record.state.parent.take();

        if let Some(parent) = parent.and_then(|p| registry.objects.get_mut(&p)) {
            parent.state.children.retain(|&child| child != id);
        }

        let mut live_children = Vec::with_capacity(children.len());
        for child_id in children {
            if let Some(child) = registry.objects.get_mut(&child_id) {
                child.state.parent = None;
                if child.life == Life::Alive {
                    live_children.push(child.ptr as ObjPtr);
                }
            }
        }

        (connections, live_children)
    };

    // Callables may run extension code when released.
    drop(connections);

    for child in children {
        destroy(child);
    }
}

pub(crate) fn lookup_id(id: u64) -> ObjPtr {
    registry()
        .objects
        .get(&id)
        .filter(|record| record.is_reachable())
        .map_or(ptr::null_mut(), |record| record.ptr as ObjPtr)
}

pub(crate) fn is_alive_id(id: u64) -> bool {
    registry().objects.get(&id).is_some_and(|record| record.is_reachable())
}

pub(crate) fn class_name_of(obj: ObjPtr) -> Option<String> {
    let registry = registry();
    let record = registry.reachable(obj)?;
    Some(registry.classes[record.dynamic_class()].name.clone())
}

pub(crate) fn class_name_of_id(id: u64) -> Option<String> {
    class_name_of(lookup_id(id)).filter(|_| id != 0)
}

pub(crate) fn cast_to(obj: ObjPtr, tag: *mut c_void) -> ObjPtr {
    let registry = registry();
    let Some(record) = registry.reachable(obj) else {
        return ptr::null_mut();
    };

    let target = (tag as usize).wrapping_sub(1);
    if target < registry.classes.len() && registry.inherits(record.dynamic_class(), target) {
        obj
    } else {
        ptr::null_mut()
    }
}

pub(crate) fn set_instance(obj: ObjPtr, class_name: &str, instance: *mut c_void) {
    let mut guard = registry();
    let registry = &mut *guard;

    let Some(class) = registry.class_id(class_name) else {
        report_error(format!("object_set_instance: class '{class_name}' is not registered"));
        return;
    };

    if !matches!(registry.classes[class].kind, ClassKind::Extension(_)) {
        report_error(format!("object_set_instance: '{class_name}' is not an extension class"));
        return;
    }

    match registry.reachable_mut(obj) {
        Some(record) => {
            record.extension = Some(ExtensionInstance {
                class,
                instance: instance as usize,
            })
        }
        None => report_error(format!("object_set_instance: {obj:p} is not a live object")),
    }
}

pub(crate) fn get_instance(obj: ObjPtr) -> *mut c_void {
    registry()
        .reachable(obj)
        .and_then(|record| record.extension.as_ref())
        .map_or(ptr::null_mut(), |ext| ext.instance as *mut c_void)
}

/// Checks that `obj` is a live object whose class inherits `class`.
pub(crate) fn check_receiver(obj: ObjPtr, class: &str) -> Result<(), String> {
    if obj.is_null() {
        return Err("instance is null".to_string());
    }

    let registry = registry();
    let Some(record) = registry.record(obj) else {
        return Err(format!("{obj:p} is not an object"));
    };

    if !record.is_reachable() {
        return Err(format!("object #{} was already freed", instance_id(obj)));
    }

    let dynamic = record.dynamic_class();
    match registry.class_id(class) {
        Some(expected) if registry.inherits(dynamic, expected) => Ok(()),
        _ => Err(format!(
            "object of class '{}' does not inherit '{class}'",
            registry.classes[dynamic].name
        )),
    }
}

/// Native classes of the object, most derived first.
pub(crate) fn native_chain(obj: ObjPtr) -> Vec<&'static str> {
    let registry = registry();
    let Some(record) = registry.reachable(obj) else {
        return vec![];
    };

    registry
        .ancestors(record.class)
        .filter_map(|class| match registry.classes[class].kind {
            ClassKind::Native(native) => Some(native.name),
            ClassKind::Extension(_) => None,
        })
        .collect()
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Virtual dispatch

pub(crate) type GetVirtualFn =
    unsafe extern "C" fn(*mut c_void, *const std::ffi::c_char) -> sys::GDExtensionClassCallVirtual;

/// Everything that may answer a virtual call on one object, most derived first.
pub(crate) struct VirtualTargets {
    pub instance: *mut c_void,
    pub overrides: Vec<(GetVirtualFn, *mut c_void)>,
    pub natives: Vec<&'static str>,
}

pub(crate) fn virtual_targets(obj: ObjPtr) -> Option<VirtualTargets> {
    let registry = registry();
    let record = registry.reachable(obj)?;

    let mut targets = VirtualTargets {
        instance: record
            .extension
            .as_ref()
            .map_or(ptr::null_mut(), |ext| ext.instance as *mut c_void),
        overrides: vec![],
        natives: vec![],
    };

    for class in registry.ancestors(record.dynamic_class()) {
        match &registry.classes[class].kind {
            ClassKind::Extension(ext) => {
                if let Some(get_virtual) = ext.info.get_virtual_func {
                    targets.overrides.push((get_virtual, ext.info.class_userdata));
                }
            }
            ClassKind::Native(native) => targets.natives.push(native.name),
        }
    }

    Some(targets)
}

pub(crate) fn count_default_call(obj: ObjPtr, method: &str) {
    with_state(obj, |state| {
        *state.default_calls.entry(method.to_string()).or_default() += 1;
    });
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Reference counting

fn with_refcount<R>(obj: ObjPtr, f: impl FnOnce(&mut RefCount) -> R) -> Option<R> {
    let mut registry = registry();
    let refcount = registry.reachable_mut(obj)?.refcount.as_mut()?;
    Some(f(refcount))
}

pub(crate) fn init_ref(obj: ObjPtr) -> bool {
    with_refcount(obj, |rc| {
        if rc.count == 0 {
            false
        } else if rc.init_pending {
            rc.init_pending = false;
            true
        } else {
            rc.count += 1;
            true
        }
    })
    .unwrap_or(false)
}

pub(crate) fn reference(obj: ObjPtr) -> bool {
    with_refcount(obj, |rc| {
        if rc.count == 0 {
            false
        } else {
            rc.count += 1;
            true
        }
    })
    .unwrap_or(false)
}

/// Returns `true` if this released the last reference. The caller is responsible for destroying the object.
pub(crate) fn unreference(obj: ObjPtr) -> bool {
    with_refcount(obj, |rc| {
        rc.count = rc.count.saturating_sub(1);
        rc.count == 0
    })
    .unwrap_or(false)
}

pub(crate) fn reference_count_of(obj: ObjPtr) -> i64 {
    with_refcount(obj, |rc| rc.count as i64).unwrap_or(0)
}

/// A variant storing a reference-counted object owns one reference.
pub(crate) fn variant_acquire(obj: ObjPtr) {
    init_ref(obj);
}

/// Releases the reference owned by a variant; frees the object if it was the last one.
pub(crate) fn variant_release(obj: ObjPtr) {
    if unreference(obj) {
        destroy(obj);
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Native state, node tree and signals

/// Runs `f` on the native state of a live object. `f` must not call back into the registry.
pub(crate) fn with_state<R>(obj: ObjPtr, f: impl FnOnce(&mut NativeState) -> R) -> Option<R> {
    let mut registry = registry();
    let record = registry.reachable_mut(obj)?;
    Some(f(&mut record.state))
}

pub(crate) fn attach_child(parent: ObjPtr, child: ObjPtr) -> Result<(), String> {
    let mut registry = registry();
    let parent_id = instance_id(parent);
    let child_id = instance_id(child);

    if parent_id == child_id {
        return Err("cannot add a node as child of itself".to_string());
    }

    let child_record = registry
        .reachable_mut(child)
        .ok_or_else(|| format!("child #{child_id} is not a live object"))?;

    if let Some(existing) = child_record.state.parent {
        return Err(format!("node #{child_id} already has parent #{existing}"));
    }

    child_record.state.parent = Some(parent_id);

    match registry.reachable_mut(parent) {
        Some(parent_record) => {
            parent_record.state.children.push(child_id);
            Ok(())
        }
        None => {
            if let Some(child_record) = registry.reachable_mut(child) {
                child_record.state.parent = None;
            }
            Err(format!("parent #{parent_id} is not a live object"))
        }
    }
}

/// Child at `index`; negative indices count from the end.
pub(crate) fn child_at(parent: ObjPtr, index: i64) -> Result<ObjPtr, String> {
    let registry = registry();
    let children = &registry
        .reachable(parent)
        .ok_or_else(|| "node is not a live object".to_string())?
        .state
        .children;

    let len = children.len() as i64;
    let resolved = if index < 0 { index + len } else { index };
    if !(0..len).contains(&resolved) {
        return Err(format!("child index {index} out of bounds (child count {len})"));
    }

    let child_id = children[resolved as usize];
    registry
        .objects
        .get(&child_id)
        .map(|record| record.ptr as ObjPtr)
        .ok_or_else(|| format!("child #{child_id} is not an object"))
}

pub(crate) fn child_count(parent: ObjPtr) -> i64 {
    with_state(parent, |state| state.children.len() as i64).unwrap_or(0)
}

pub(crate) fn has_signal(obj: ObjPtr, signal: &str) -> bool {
    let registry = registry();
    let Some(record) = registry.reachable(obj) else {
        return false;
    };

    let declared = registry.ancestors(record.class).any(|class| match registry.classes[class].kind {
        ClassKind::Native(native) => native.signals.contains(&signal),
        ClassKind::Extension(_) => false,
    });
    declared
}

/// Connects a callable to a signal and returns an engine `Error` code.
pub(crate) fn connect(obj: ObjPtr, signal: &str, callable: Option<Arc<CallableData>>, flags: i64) -> i64 {
    if !has_signal(obj, signal) {
        report_error(format!("connect: signal '{signal}' does not exist"));
        return ERR_INVALID_PARAMETER;
    }

    let Some(callable) = callable else {
        report_error(format!("connect: cannot connect invalid callable to signal '{signal}'"));
        return ERR_INVALID_PARAMETER;
    };

    let outcome = with_state(obj, |state| {
        let duplicate = state
            .connections
            .iter()
            .any(|c| c.signal == signal && Arc::ptr_eq(&c.callable, &callable));

        if duplicate {
            return Err(callable);
        }

        state.connections.push(Connection {
            signal: signal.to_string(),
            callable,
            flags,
        });
        Ok(())
    });

    match outcome {
        Some(Ok(())) => OK,
        Some(Err(callable)) => {
            drop(callable);
            report_error(format!("connect: signal '{signal}' is already connected to this callable"));
            ERR_ALREADY_EXISTS
        }
        None => ERR_INVALID_PARAMETER,
    }
}

/// Callables connected to `signal`, in connection order. One-shot connections are removed.
pub(crate) fn take_emission_targets(obj: ObjPtr, signal: &str) -> Vec<Arc<CallableData>> {
    let (targets, one_shots) = with_state(obj, |state| {
        let targets: Vec<Arc<CallableData>> = state
            .connections
            .iter()
            .filter(|c| c.signal == signal)
            .map(|c| Arc::clone(&c.callable))
            .collect();

        let (one_shots, kept): (Vec<Connection>, Vec<Connection>) = mem::take(&mut state.connections)
            .into_iter()
            .partition(|c| c.signal == signal && c.flags & CONNECT_ONE_SHOT != 0);
        state.connections = kept;

        (targets, one_shots)
    })
    .unwrap_or_default();

    drop(one_shots);
    targets
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Audit

pub(crate) fn audit_alive(id: u64) -> bool {
    is_alive_id(id)
}

pub(crate) fn audit_destroy_count(id: u64) -> u32 {
    registry().objects.get(&id).map_or(0, |record| record.destroy_count)
}

pub(crate) fn audit_reference_count(id: u64) -> Option<u32> {
    let registry = registry();
    let record = registry.objects.get(&id).filter(|record| record.is_reachable())?;
    record.refcount.as_ref().map(|rc| rc.count)
}

pub(crate) fn audit_default_calls(id: u64, method: &str) -> u32 {
    registry()
        .objects
        .get(&id)
        .and_then(|record| record.state.default_calls.get(method).copied())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refcount_starts_with_pending_init() {
        let obj = construct("RefCounted");
        let id = instance_id(obj);

        assert!(init_ref(obj));
        assert_eq!(audit_reference_count(id), Some(1));

        assert!(reference(obj));
        assert_eq!(audit_reference_count(id), Some(2));

        assert!(!unreference(obj));
        assert!(unreference(obj));
        destroy(obj);

        assert!(!audit_alive(id));
        assert_eq!(audit_destroy_count(id), 1);
    }

    #[test]
    fn double_destroy_is_recorded() {
        let obj = construct("Object");
        let id = instance_id(obj);

        destroy(obj);
        destroy(obj);

        assert_eq!(audit_destroy_count(id), 2);
        assert!(lookup_id(id).is_null());
        assert!(crate::printed_errors()
            .iter()
            .any(|e| e.contains(&format!("object #{id} was already freed"))));
    }

    #[test]
    fn cast_walks_native_chain() {
        let obj = construct("Node2D");

        assert_eq!(cast_to(obj, class_tag("Node")), obj);
        assert_eq!(cast_to(obj, class_tag("Object")), obj);
        assert!(cast_to(obj, class_tag("RefCounted")).is_null());
        assert!(class_tag("NoSuchClass").is_null());

        destroy(obj);
        assert!(cast_to(obj, class_tag("Node")).is_null());
    }

    #[test]
    fn freeing_parent_frees_children() {
        let parent = construct("Node");
        let child = construct("Node2D");

        attach_child(parent, child).expect("attach");
        assert_eq!(child_count(parent), 1);
        assert_eq!(child_at(parent, -1), Ok(child));
        assert!(attach_child(parent, child).is_err());

        destroy(parent);
        assert!(!audit_alive(instance_id(child)));
    }
}
