/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Host classes: registration, virtual overrides and their fallthrough to native defaults.

mod common;

use std::cell::RefCell;
use std::rc::Rc;

use gdbind::classes::{IVector2Sum, Vector2Sum};
use gdbind::prelude::*;
use gdbind_mock::{native_default_calls, VirtualDispatch};

#[derive(GodotClass)]
#[class(base = Node)]
struct Ticker {
    deltas: Vec<f64>,
    base: Base<Node>,
}

#[godot_api]
impl INode for Ticker {
    fn init(base: Base<Node>) -> Self {
        Self { deltas: vec![], base }
    }

    fn process(&mut self, delta: f64) {
        self.deltas.push(delta);
    }
}

// Overrides a virtual that Node2D inherits from Node.
#[derive(GodotClass)]
#[class(init, base = Node2D)]
struct Spinner {
    ready_calls: u32,
    base: Base<Node2D>,
}

#[godot_api]
impl INode2D for Spinner {
    fn ready(&mut self) {
        self.ready_calls += 1;
        self.base_mut().rotate(0.5);
    }
}

#[derive(GodotClass)]
#[class(init, base = Node)]
struct Counter {
    #[init(val = 10)]
    start: i64,
    label: GString,
    base: Base<Node>,
}

#[derive(GodotClass)]
#[class(init, base = Vector2Sum)]
struct ProductSum {
    base: Base<Vector2Sum>,
}

#[godot_api]
impl IVector2Sum for ProductSum {
    fn combine(&self, a: f64, b: f64) -> f64 {
        a * b
    }
}

#[derive(GodotClass)]
#[class(init, base = Node)]
struct Faulty {
    base: Base<Node>,
}

#[godot_api]
impl INode for Faulty {
    fn process(&mut self, delta: f64) {
        panic!("Faulty::process gave up at delta {delta}");
    }
}

fn raw_id<T: GodotClass>(obj: &Gd<T>) -> u64 {
    obj.instance_id().to_u64()
}

#[test]
fn override_intercepts_virtual() {
    common::setup();

    let ticker = Ticker::new_alloc();
    let id = raw_id(&ticker);

    assert_eq!(gdbind_mock::process(id, 0.016), VirtualDispatch::Override);
    assert_eq!(ticker.bind().deltas, vec![0.016]);
    assert_eq!(native_default_calls(id, "_process"), 0);

    ticker.free();
}

#[test]
fn missing_override_falls_through_to_native() {
    common::setup();

    let ticker = Ticker::new_alloc();
    let id = raw_id(&ticker);

    // Ticker overrides _process only.
    assert_eq!(gdbind_mock::ready(id), VirtualDispatch::NativeDefault);
    assert_eq!(native_default_calls(id, "_ready"), 1);
    assert!(ticker.bind().deltas.is_empty());

    ticker.free();
}

#[test]
fn plain_engine_object_uses_native_default() {
    common::setup();

    let node = Node::new_alloc();
    let id = raw_id(&node);

    assert_eq!(gdbind_mock::process(id, 0.5), VirtualDispatch::NativeDefault);
    assert_eq!(native_default_calls(id, "_process"), 1);

    node.free();
}

#[test]
fn inherited_virtual_resolves_on_subclass() {
    common::setup();

    let spinner = Spinner::new_alloc();
    let id = raw_id(&spinner);

    assert_eq!(gdbind_mock::ready(id), VirtualDispatch::Override);
    assert_eq!(spinner.bind().ready_calls, 1);
    assert!((spinner.get_rotation() - 0.5).abs() < 1e-6);

    // _process is not overridden; the native default comes from Node, two levels up.
    assert_eq!(gdbind_mock::process(id, 0.1), VirtualDispatch::NativeDefault);
    assert_eq!(native_default_calls(id, "_process"), 1);
    assert_eq!(native_default_calls(id, "_ready"), 0);

    spinner.free();
}

#[test]
fn override_result_flows_back_into_native_code() {
    common::setup();

    let mut product = ProductSum::new_gd();
    let plain = Vector2Sum::new_gd();

    let received = Rc::new(RefCell::new(Vec::new()));
    let received_in_callable = received.clone();
    let callable = Callable::from_fn("on_summed", move |args| {
        received_in_callable.borrow_mut().push(args[0].to::<f64>());
        Ok(Variant::nil())
    });
    product.connect_summed(&callable);

    // Native combine() asks the _combine virtual.
    assert_eq!(product.combine(3.0, 4.0), 12.0);
    assert_eq!(plain.combine(3.0, 4.0), 7.0);

    // Other engine methods of the base class still work.
    assert_eq!(product.add(3.0, 4.0), 7.0);
    assert_eq!(*received.borrow(), vec![12.0]);
    assert_eq!(product.get_class(), "ProductSum");
}

#[test]
fn generated_init_uses_field_defaults() {
    common::setup();

    let counter = Counter::new_alloc();
    {
        let guard = counter.bind();
        assert_eq!(guard.start, 10);
        assert_eq!(guard.label, GString::new());
    }

    counter.free();
}

#[test]
fn host_object_reaches_its_own_handle() {
    common::setup();

    let mut counter = Counter::new_alloc();
    counter.bind_mut().start = 42;

    let handle = counter.bind().to_gd();
    assert_eq!(handle.instance_id(), counter.instance_id());
    assert_eq!(handle.bind().start, 42);

    let base_id = counter.bind().base().instance_id();
    assert_eq!(base_id, counter.instance_id());

    counter.free();
}

#[test]
fn host_class_refcounts_like_its_base() {
    common::setup();

    let product = ProductSum::new_gd();
    let id = raw_id(&product);
    let copy = product.clone();
    assert_eq!(gdbind_mock::reference_count(id), Some(2));

    drop(product);
    assert!(gdbind_mock::is_alive(id));

    drop(copy);
    assert!(!gdbind_mock::is_alive(id));
}

#[test]
fn panic_in_override_is_contained() {
    common::setup();

    let faulty = Faulty::new_alloc();
    let id = raw_id(&faulty);

    assert_eq!(gdbind_mock::process(id, 0.25), VirtualDispatch::Override);
    assert!(common::has_printed_error("Faulty::process gave up at delta 0.25"));

    // The object survives the failed call.
    assert!(faulty.is_instance_valid());
    faulty.free();
}

#[test]
fn reentrant_bind_is_reported() {
    common::setup();

    let mut ticker = Ticker::new_alloc();
    let id = raw_id(&ticker);

    {
        let _guard = ticker.bind_mut();
        assert_eq!(gdbind_mock::process(id, 1.0), VirtualDispatch::Override);
    }

    assert!(common::has_printed_error("Gd<T>::bind_mut() failed, already bound"));
    assert!(ticker.bind().deltas.is_empty());

    ticker.free();
}

#[test]
fn freed_host_object_is_not_dispatched() {
    common::setup();

    let ticker = Ticker::new_alloc();
    let id = raw_id(&ticker);
    ticker.free();

    assert_eq!(gdbind_mock::process(id, 0.016), VirtualDispatch::Unhandled);
}
