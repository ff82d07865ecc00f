/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Handle lifecycle, ownership and casts of engine objects.

mod common;

use std::panic::{self, AssertUnwindSafe};

use gdbind::obj::Ownership;
use gdbind::prelude::*;
use gdbind_mock::{destroy_count, is_alive, reference_count};

fn raw_id<T: GodotClass>(obj: &Gd<T>) -> u64 {
    obj.instance_id().to_u64()
}

#[test]
fn refcounted_shared_handle_is_released_once() {
    common::setup();

    let first = RefCounted::new_gd();
    let id = raw_id(&first);
    assert_eq!(reference_count(id), Some(1));

    let second = first.clone();
    assert_eq!(first, second);
    assert_eq!(reference_count(id), Some(2));

    drop(first);
    assert!(is_alive(id), "object must survive while a handle remains");
    assert_eq!(reference_count(id), Some(1));

    drop(second);
    assert!(!is_alive(id));
    assert_eq!(destroy_count(id), 1);
}

#[test]
fn refcounted_released_on_panic_path() {
    common::setup();

    let resource = Resource::new_gd();
    let id = raw_id(&resource);
    let copy = resource.clone();
    assert_eq!(reference_count(id), Some(2));

    let result = panic::catch_unwind(AssertUnwindSafe(move || {
        let _held = copy;
        panic!("leaving scope early");
    }));

    assert!(result.is_err());
    assert_eq!(reference_count(id), Some(1));

    drop(resource);
    assert_eq!(destroy_count(id), 1);
}

#[test]
fn engine_reference_count_matches_audit() {
    common::setup();

    let obj = RefCounted::new_gd();
    let copies: Vec<_> = (0..4).map(|_| obj.clone()).collect();

    assert_eq!(obj.get_reference_count(), 5);
    assert_eq!(reference_count(raw_id(&obj)), Some(5));

    drop(copies);
    assert_eq!(obj.get_reference_count(), 1);
}

#[test]
fn manual_object_lives_until_freed() {
    common::setup();

    let node = Node::new_alloc();
    let id = raw_id(&node);
    let alias = node.clone();

    drop(alias);
    assert!(is_alive(id), "dropping a manual handle must not free the object");
    assert!(node.is_instance_valid());

    node.free();
    assert!(!is_alive(id));
    assert_eq!(destroy_count(id), 1);
}

#[test]
fn freed_object_is_invalid_through_other_handles() {
    common::setup();

    let node = Node::new_alloc();
    let other = node.clone();
    let id = other.instance_id_unchecked();

    node.free();

    assert!(!other.is_instance_valid());
    assert!(!id.lookup_validity());
    assert!(Gd::<Node>::try_from_instance_id(id).is_none());
    assert_eq!(destroy_count(id.to_u64()), 1);
}

#[test]
#[should_panic(expected = "already destroyed")]
fn double_free_is_caught() {
    common::setup();

    let node = Node::new_alloc();
    let again = node.clone();

    node.free();
    again.free();
}

#[test]
#[should_panic]
fn use_after_free_is_caught() {
    common::setup();

    let node = Node::new_alloc();
    let stale = node.clone();
    node.free();

    // Call checks validate the instance ID before dereferencing.
    let _ = stale.get_name();
}

#[test]
fn returned_objects_are_transferred() {
    common::setup();

    let obj = RefCounted::new_gd();
    assert_eq!(obj.ownership(), Ownership::Transferred);

    let copy = obj.clone();
    assert_eq!(copy.ownership(), Ownership::Owned);
}

#[test]
fn instance_id_lookup() {
    common::setup();

    let node = Node2D::new_alloc();
    let id = node.instance_id();

    assert_eq!(node.get_instance_id(), id.to_u64());
    assert_eq!(InstanceId::from_i64(id.to_i64()), id);

    let found = Gd::<Node>::from_instance_id(id);
    assert_eq!(found.obj_sys(), node.obj_sys());

    // Wrong class.
    assert!(Gd::<Resource>::try_from_instance_id(id).is_none());
    assert!(InstanceId::try_from_i64(0).is_none());

    node.free();
}

#[test]
fn upcast_preserves_handle() {
    common::setup();

    let node2d = Node2D::new_alloc();
    let ptr = node2d.obj_sys();
    let id = node2d.instance_id();

    let node: Gd<Node> = node2d.upcast();
    assert_eq!(node.obj_sys(), ptr);

    let object: Gd<Object> = node.upcast();
    assert_eq!(object.obj_sys(), ptr);
    assert_eq!(object.instance_id(), id);

    let back: Gd<Node2D> = object.cast();
    assert_eq!(back.obj_sys(), ptr);
    assert_eq!(back.as_node().get_instance_id(), id.to_u64());
    assert_eq!(back.upcast_ref::<Object>().get_instance_id(), id.to_u64());

    back.free();
}

#[test]
fn upcast_of_refcounted_keeps_reference_count() {
    common::setup();

    let sum = gdbind::classes::Vector2Sum::new_gd();
    let id = raw_id(&sum);

    let as_refcounted: Gd<RefCounted> = sum.upcast();
    assert_eq!(reference_count(id), Some(1));

    let as_object: Gd<Object> = as_refcounted.upcast();
    assert_eq!(reference_count(id), Some(1));
    assert_eq!(as_object.get_class(), "Vector2Sum");

    drop(as_object);
    assert!(!is_alive(id));
}

#[test]
fn failed_downcast_returns_original() {
    common::setup();

    let object: Gd<Object> = Node::new_alloc().upcast();
    let ptr = object.obj_sys();

    let original = match object.try_cast::<Node2D>() {
        Ok(_) => panic!("Node must not downcast to Node2D"),
        Err(original) => original,
    };

    assert_eq!(original.obj_sys(), ptr);
    original.cast::<Node>().free();
}

#[test]
#[should_panic(expected = "RefCounted")]
fn free_on_dynamic_refcounted_panics() {
    common::setup();

    let object: Gd<Object> = RefCounted::new_gd().upcast();
    object.free();
}
