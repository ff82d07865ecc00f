/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

mod common;

use gdbind::meta::ErrorKind;
use gdbind::prelude::*;
use proptest::prelude::*;

proptest! {
    #[test]
    fn int_roundtrip(value: i64) {
        common::setup();

        let variant = Variant::from(value);
        prop_assert_eq!(variant.get_type(), VariantType::Int);
        prop_assert_eq!(variant.to::<i64>(), value);
    }

    #[test]
    fn bool_roundtrip(value: bool) {
        common::setup();

        prop_assert_eq!(Variant::from(value).to::<bool>(), value);
    }

    #[test]
    fn float_roundtrip(value in -1e12f64..1e12) {
        common::setup();

        let variant = Variant::from(value);
        prop_assert_eq!(variant.get_type(), VariantType::Float);
        prop_assert_eq!(variant.to::<f64>(), value);
    }

    #[test]
    fn string_roundtrip(text in "\\PC{0,32}") {
        common::setup();

        let variant = Variant::from(GString::from(text.as_str()));
        prop_assert_eq!(variant.get_type(), VariantType::String);
        prop_assert_eq!(variant.to::<String>(), text.clone());
        prop_assert_eq!(variant.stringify().to_string(), text);
    }

    #[test]
    fn vector2_roundtrip(x in -1e6f32..1e6, y in -1e6f32..1e6) {
        common::setup();

        let vector = Vector2::new(x, y);
        prop_assert_eq!(Variant::from(vector).to::<Vector2>(), vector);
    }

    #[test]
    fn u64_keeps_its_bits(value: u64) {
        common::setup();

        let variant = Variant::from(value);
        prop_assert_eq!(variant.get_type(), VariantType::Int);
        prop_assert_eq!(variant.to::<i64>(), value as i64);
        prop_assert_eq!(variant.to::<u64>(), value);
    }

    #[test]
    fn narrow_ints_are_range_checked(value: i64) {
        common::setup();

        let result = Variant::from(value).try_to::<i32>();
        match i32::try_from(value) {
            Ok(expected) => prop_assert_eq!(result, Ok(expected)),
            Err(_) => {
                let err = result.expect_err("out-of-range value converts");
                prop_assert_eq!(err.kind(), &ErrorKind::IntOutOfRange { target: "i32" });
            }
        }
    }

    #[test]
    fn array_preserves_elements(values in prop::collection::vec(any::<i64>(), 0..16)) {
        common::setup();

        let array: Array = values.iter().copied().collect();
        prop_assert_eq!(array.len(), values.len());

        let back: Vec<i64> = array.iter_shared().map(|v| v.to::<i64>()).collect();
        prop_assert_eq!(back, values.clone());

        let through_variant = Variant::from(array.clone()).to::<Array>();
        prop_assert_eq!(through_variant, array);
    }

    #[test]
    fn less_agrees_with_host_ordering(a: i64, b: i64) {
        common::setup();

        let less = Variant::from(a).evaluate(&Variant::from(b), VariantOperator::Less);
        prop_assert_eq!(less.map(|v| v.to::<bool>()), Some(a < b));
    }
}

#[test]
fn nil_variant() {
    common::setup();

    let nil = Variant::nil();
    assert!(nil.is_nil());
    assert_eq!(nil.get_type(), VariantType::Nil);
    assert_eq!(nil, Variant::default());
    assert_eq!(nil.stringify(), "<null>");
}

#[test]
fn wrong_type_is_reported() {
    common::setup();

    let err = Variant::from(GString::from("text")).try_to::<i64>().unwrap_err();
    assert_eq!(
        err.kind(),
        &ErrorKind::BadType {
            expected: VariantType::Int,
            actual: VariantType::String,
        }
    );
    assert_eq!(err.value_str(), Some("text"));
}

#[test]
fn mixed_types_compare_unequal() {
    common::setup();

    let int = Variant::from(1_i64);
    let text = Variant::from(GString::from("1"));

    assert_ne!(int, text);
    assert_eq!(int.evaluate(&text, VariantOperator::Less), None);
    assert_eq!(
        int.evaluate(&Variant::from(1_i64), VariantOperator::Equal).map(|v| v.to::<bool>()),
        Some(true)
    );
}

#[test]
fn dictionary_entries() {
    common::setup();

    let mut dict = Dictionary::new();
    dict.set(GString::from("name"), GString::from("Spinner"));
    dict.set(GString::from("speed"), 2.5);
    dict.set(7_i64, true);

    assert_eq!(dict.len(), 3);
    assert!(dict.contains_key(GString::from("speed")));
    assert_eq!(dict.get(GString::from("speed")).map(|v| v.to::<f64>()), Some(2.5));
    assert_eq!(dict.get(7_i64).map(|v| v.to::<bool>()), Some(true));
    assert_eq!(dict.get(GString::from("missing")), None);

    // Overwriting keeps the entry count.
    dict.set(7_i64, false);
    assert_eq!(dict.len(), 3);

    assert_eq!(dict.remove(GString::from("name")).map(|v| v.to::<String>()), Some("Spinner".to_string()));
    assert!(!dict.contains_key(GString::from("name")));

    let keys = dict.keys_array();
    assert_eq!(keys.len(), 2);
    assert_eq!(keys.get(0).map(|v| v.to::<String>()), Some("speed".to_string()));
    assert_eq!(keys.get(1).map(|v| v.to::<i64>()), Some(7));
}

#[test]
fn nested_containers_survive_variant_roundtrip() {
    common::setup();

    let inner: Array = [1_i64, 2, 3].into_iter().collect();
    let dict: Dictionary = [(GString::from("items"), Variant::from(inner.clone()))].into_iter().collect();

    let back = Variant::from(dict).to::<Dictionary>();
    let items = back.get(GString::from("items")).expect("key present").to::<Array>();
    assert_eq!(items, inner);
    assert_eq!(Variant::from(items).stringify(), "[1, 2, 3]");
}

#[test]
fn array_mutation() {
    common::setup();

    let mut array = Array::new();
    array.push(1_i64);
    array.push(GString::from("two"));
    array.push(3.0);
    assert_eq!(array.len(), 3);

    array.set(0, 10_i64);
    assert_eq!(array.get(0).map(|v| v.to::<i64>()), Some(10));
    assert_eq!(array.get(3), None);

    assert_eq!(array.pop().map(|v| v.to::<f64>()), Some(3.0));
    assert_eq!(array.len(), 2);
    assert_eq!(Variant::from(array).stringify(), "[10, \"two\"]");
}

#[test]
fn packed_arrays_hold_host_values() {
    common::setup();

    let packed = PackedFloat64Array::from([0.5, 1.5, 2.5]);
    assert_eq!(packed.len(), 3);

    let back = Variant::from(packed.clone()).to::<PackedFloat64Array>();
    assert_eq!(back.to_vec(), vec![0.5, 1.5, 2.5]);
    assert_eq!(back, packed);
}
