/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Generated engine classes, called end-to-end through the mock engine.

mod common;

use std::cell::RefCell;
use std::rc::Rc;

use gdbind::classes::node::ProcessMode;
use gdbind::classes::Vector2Sum;
use gdbind::global::Error;
use gdbind::init::CallChecks;
use gdbind::meta::{CallErrorKind, Signature};
use gdbind::sys::{ArgKind, SignatureMismatch};
use gdbind::prelude::*;

#[test]
fn vector2sum_add() {
    common::setup();

    let sum = Vector2Sum::new_gd();
    assert_eq!(sum.add(1.5, 2.25), 3.75);
    assert_eq!(sum.add(-1.0, 1.0), 0.0);
}

#[test]
fn vector2sum_value_types() {
    common::setup();

    let sum = Vector2Sum::new_gd();
    let total = sum.add_vectors(Vector2::new(1.0, 2.0), Vector2::new(3.0, -4.0));
    assert_eq!(total, Vector2::new(4.0, -2.0));

    let values = PackedFloat64Array::from([0.5, 1.5, 2.0]);
    assert_eq!(sum.sum_array(&values), 4.0);
    assert_eq!(sum.sum_array(&PackedFloat64Array::new()), 0.0);
}

#[test]
fn default_arguments_and_builder() {
    common::setup();

    let sum = Vector2Sum::new_gd();
    let v = Vector2::new(1.0, -2.0);

    assert_eq!(sum.scale(v), Vector2::new(2.0, -4.0));
    assert_eq!(sum.scale_ex(v).factor(0.5).done(), Vector2::new(0.5, -1.0));
    assert_eq!(sum.scale_ex(v).done(), sum.scale(v));

    let parts = PackedStringArray::from([GString::from("a"), GString::from("b"), GString::from("c")]);
    assert_eq!(sum.join(&parts), "a, b, c");
    assert_eq!(sum.join_ex(&parts).separator("-").done(), "a-b-c");
}

#[test]
fn native_status_codes_pass_through() {
    common::setup();

    let sum = Vector2Sum::new_gd();
    assert_eq!(sum.check_positive(7), Error::OK);
    assert_eq!(sum.check_positive(0), Error::ERR_INVALID_PARAMETER);
    assert_eq!(sum.check_positive(-3), Error::ERR_INVALID_PARAMETER);
}

#[test]
fn in_out_pointer_parameters() {
    common::setup();

    let sum = Vector2Sum::new_gd();
    let mut buffer = [-1.0_f32; 5];

    // SAFETY: the buffer holds `count` elements.
    unsafe { sum.fill_squares(buffer.as_mut_ptr(), 4) };
    assert_eq!(buffer, [0.0, 1.0, 4.0, 9.0, -1.0]);
}

#[test]
fn const_and_mut_overloads() {
    common::setup();

    let mut sum = Vector2Sum::new_gd();
    sum.push_value(3);
    sum.push_value(-8);

    assert_eq!(sum.values().to_vec(), vec![3, -8]);
    assert_eq!(sum.values_mut().to_vec(), vec![3, -8]);
}

#[test]
fn native_errors_are_printed_not_raised() {
    common::setup();

    let mut sum = Vector2Sum::new_gd();
    for i in 0..Vector2Sum::MAX_VALUES {
        sum.push_value(i);
    }
    assert!(!common::has_printed_error("capacity of 64 values exceeded"));

    sum.push_value(1000);
    assert!(common::has_printed_error("capacity of 64 values exceeded"));
    assert_eq!(sum.values().len(), 64);
}

#[test]
fn class_constants_and_enums() {
    common::setup();

    assert_eq!(Vector2Sum::MAX_VALUES, 64);
    assert_eq!(Node::NOTIFICATION_READY, 13);
    assert_eq!(Object::NOTIFICATION_PREDELETE, 1);

    let mut node = Node::new_alloc();
    assert_eq!(node.get_process_mode(), ProcessMode::INHERIT);

    node.set_process_mode(ProcessMode::ALWAYS);
    assert_eq!(node.get_process_mode(), ProcessMode::ALWAYS);
    assert_eq!(ProcessMode::ALWAYS.as_str(), "PROCESS_MODE_ALWAYS");
    assert_eq!(ProcessMode::try_from_ord(99), None);

    node.free();
}

#[test]
fn node_strings_and_inheritance() {
    common::setup();

    let mut node = Node2D::new_alloc();
    node.set_name("Player");
    assert_eq!(node.get_name(), "Player");
    assert_eq!(node.get_class(), "Node2D");
    assert!(node.has_method("rotate"));
    assert!(node.has_method("add_child"));
    assert!(!node.has_method("add"));

    node.set_position(Vector2::new(3.0, 4.0));
    node.rotate(0.25);
    node.rotate(0.5);
    assert_eq!(node.get_position(), Vector2::new(3.0, 4.0));
    assert!((node.get_rotation() - 0.75).abs() < 1e-6);

    node.free();
}

#[test]
fn class_typed_parameters_and_returns() {
    common::setup();

    let mut parent = Node::new_alloc();
    let child = Node2D::new_alloc();

    parent.add_child(&child);
    assert_eq!(parent.get_child_count(), 1);

    let found = parent.get_child(0).expect("child at index 0");
    assert_eq!(found.instance_id(), child.instance_id());

    // Out of range: the engine prints an error and returns null.
    assert!(parent.get_child(5).is_none());

    // Freeing the parent frees its children.
    let child_id = child.instance_id();
    parent.free();
    assert!(!child_id.lookup_validity());
    assert_eq!(gdbind_mock::destroy_count(child_id.to_u64()), 1);
}

#[test]
fn varcall_forwards_arguments() {
    common::setup();

    let mut sum = Vector2Sum::new_gd();

    let result = sum.call("add", &[1.5.to_variant(), 2.0.to_variant()]);
    assert_eq!(result.to::<f64>(), 3.5);

    // Engine-side coercion of int to float.
    let result = sum.call("add", &[1.5.to_variant(), 2i64.to_variant()]);
    assert_eq!(result.to::<f64>(), 3.5);

    // Defaulted parameters may be omitted.
    let scaled = sum.call("scale", &[Vector2::new(1.0, 1.0).to_variant()]);
    assert_eq!(scaled.to::<Vector2>(), Vector2::new(2.0, 2.0));
}

#[test]
fn try_varcall_reports_call_errors() {
    common::setup();

    let mut sum = Vector2Sum::new_gd();

    let err = sum.try_call("does_not_exist", &[]).expect_err("unknown method");
    assert_eq!(err.kind(), &CallErrorKind::InvalidMethod);
    assert_eq!(err.class_name(), "Object");
    assert_eq!(err.method_name(), "call");

    // The method name counts as argument #0.
    let err = sum.try_call("add", &[1.0.to_variant()]).expect_err("too few");
    assert_eq!(err.kind(), &CallErrorKind::TooFewArguments { expected: 3, actual: 2 });

    let err = sum
        .try_call("add", &[1.0.to_variant(), 2.0.to_variant(), 3.0.to_variant()])
        .expect_err("too many");
    assert!(matches!(err.kind(), CallErrorKind::TooManyArguments { actual: 4, .. }));

    let err = sum
        .try_call("add", &[1.0.to_variant(), GString::from("two").to_variant()])
        .expect_err("wrong type");
    assert_eq!(
        err.kind(),
        &CallErrorKind::InvalidArgument {
            index: 2,
            expected: VariantType::Float,
            actual: Some(VariantType::String),
        }
    );
    assert!(err.to_string().contains("cannot convert from String to float"), "{err}");
}

#[test]
fn checked_ptrcall_rejects_mismatched_frame() {
    common::setup();

    let sum = Vector2Sum::new_gd();
    let add = gdbind::sys::method_table()
        .lookup("Vector2Sum", "add")
        .expect("bind for Vector2Sum::add");

    let total = unsafe { Signature::<(f64, f64), f64>::out_class_ptrcall_checked(add, sum.obj_sys(), (1.5, 2.0)) };
    assert_eq!(total.expect("frame matches the bind"), 3.5);

    // Ints where the bind takes floats: nothing reaches the engine.
    let err = unsafe { Signature::<(i64, i64), f64>::out_class_ptrcall_checked(add, sum.obj_sys(), (1, 2)) }
        .expect_err("int frame against float params");
    assert_eq!(err.class_name(), "Vector2Sum");
    assert_eq!(err.method_name(), "add");
    assert_eq!(
        err.kind(),
        &CallErrorKind::SignatureMismatch(SignatureMismatch::Kind {
            index: 0,
            expected: ArgKind::Primitive(VariantType::Float),
            actual: ArgKind::Primitive(VariantType::Int),
        })
    );
    assert!(err.to_string().contains("signature mismatch: argument #0"), "{err}");

    let err = unsafe { Signature::<(f64,), f64>::out_class_ptrcall_checked(add, sum.obj_sys(), (1.0,)) }
        .expect_err("missing argument");
    assert_eq!(
        err.kind(),
        &CallErrorKind::SignatureMismatch(SignatureMismatch::Arity { expected: 2, actual: 1 })
    );
}

#[test]
#[should_panic(expected = "binding fault in Vector2Sum::add")]
fn mismatched_ptrcall_panics_with_checks_enabled() {
    common::setup();
    assert_eq!(gdbind::sys::config().call_checks, CallChecks::Always);

    let sum = Vector2Sum::new_gd();
    let index = gdbind::sys::method_table()
        .index_of("Vector2Sum", "add")
        .expect("bind for Vector2Sum::add");

    unsafe { Signature::<(i64,), f64>::out_class_ptrcall(index, sum.obj_sys(), (1,)) };
}

#[test]
#[should_panic]
fn panicking_varcall_on_error() {
    common::setup();

    let mut sum = Vector2Sum::new_gd();
    sum.call("does_not_exist", &[]);
}

#[test]
fn signals_reach_connected_callables() {
    common::setup();

    let mut parent = Node::new_alloc();
    let child = Node::new_alloc();

    let seen = Rc::new(RefCell::new(Vec::new()));
    let seen_in_callable = seen.clone();
    let callable = Callable::from_fn("on_child_entered", move |args| {
        let node = args[0].to::<Gd<Node>>();
        seen_in_callable.borrow_mut().push(node.instance_id());
        Ok(Variant::nil())
    });

    assert_eq!(parent.connect_child_entered_tree(&callable), Error::OK);
    parent.add_child(&child);

    assert_eq!(*seen.borrow(), vec![child.instance_id()]);
    parent.free();
}

#[test]
fn signal_emit_helpers() {
    common::setup();

    let mut sum = Vector2Sum::new_gd();
    let received = Rc::new(RefCell::new(Vec::new()));
    let received_in_callable = received.clone();
    let callable = Callable::from_fn("on_summed", move |args| {
        received_in_callable.borrow_mut().push(args[0].to::<f64>());
        Ok(Variant::nil())
    });

    assert_eq!(sum.connect_summed(&callable), Error::OK);
    assert_eq!(sum.emit_summed(2.5), Error::OK);
    assert_eq!(sum.emit_signal("summed", &[4.0.to_variant()]), Error::OK);
    assert_eq!(*received.borrow(), vec![2.5, 4.0]);

    // Native combine() emits `summed` with its result.
    assert_eq!(sum.combine(1.0, 2.0), 3.0);
    assert_eq!(*received.borrow(), vec![2.5, 4.0, 3.0]);
}

#[test]
fn unknown_signal_is_reported_by_engine() {
    common::setup();

    let mut obj = RefCounted::new_gd();
    assert_eq!(obj.emit_signal("no_such_signal_here", &[]), Error::ERR_UNAVAILABLE);
    assert!(common::has_printed_error("no_such_signal_here"));
}

#[test]
fn method_bind_resolution_is_idempotent() {
    common::setup();

    let table = gdbind::sys::method_table();
    let first = table.lookup("Vector2Sum", "add").expect("bind for Vector2Sum::add");
    let second = table.lookup("Vector2Sum", "add").expect("bind for Vector2Sum::add");

    assert!(std::ptr::eq(first, second));
    assert_eq!(first.bind(), second.bind());
    assert!(table.lookup("Vector2Sum", "subtract").is_none());

    let expected = first.bind() as usize;
    std::thread::scope(|scope| {
        let workers: Vec<_> = (0..8)
            .map(|_| {
                scope.spawn(|| {
                    let table = gdbind::sys::method_table();
                    (0..100)
                        .map(|_| table.lookup("Vector2Sum", "add").map(|e| e.bind() as usize))
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        for worker in workers {
            let binds = worker.join().expect("reader thread");
            assert!(binds.iter().all(|&bind| bind == Some(expected)));
        }
    });
}

#[test]
fn inherited_methods_resolve_to_declaring_class() {
    common::setup();

    let table = gdbind::sys::method_table();
    let entry = table.lookup("Object", "get_class").expect("bind for Object::get_class");
    assert!(entry.is_const());
    assert!(!entry.is_vararg());

    let call = table.lookup("Object", "call").expect("bind for Object::call");
    assert!(call.is_vararg());
}
