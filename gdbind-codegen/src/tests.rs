/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use gdbind_bindings::StopWatch;
use proc_macro2::TokenStream;

use crate::context::Context;
use crate::conv;
use crate::models::json::parse_extension_api;
use crate::CodegenError;

const FIXTURE: &str = include_str!("../res/test_class_db.json");

/// Runs the whole pipeline in memory. Keys are paths relative to the generated directory.
fn generate(json: &str) -> Result<HashMap<PathBuf, String>, CodegenError> {
    let mut watch = StopWatch::start();
    let api = crate::map_extension_api(json, &mut watch)?;

    let mut files = HashMap::new();
    let mut submit_fn = |path: PathBuf, tokens: TokenStream| {
        files.insert(path, tokens.to_string());
    };

    crate::generate_from_api(&api, Path::new(""), &mut submit_fn, &mut watch);
    Ok(files)
}

fn generate_fixture() -> HashMap<PathBuf, String> {
    generate(FIXTURE).unwrap_or_else(|err| panic!("fixture must be valid: {err}"))
}

/// Whitespace-insensitive containment, since token streams are printed with arbitrary spacing.
#[track_caller]
fn assert_contains_code(haystack: &str, needle: &str) {
    let strip = |s: &str| s.chars().filter(|c| !c.is_whitespace()).collect::<String>();
    assert!(
        strip(haystack).contains(&strip(needle)),
        "generated code does not contain `{needle}`:\n{haystack}"
    );
}

#[track_caller]
fn assert_not_contains_code(haystack: &str, needle: &str) {
    let strip = |s: &str| s.chars().filter(|c| !c.is_whitespace()).collect::<String>();
    assert!(
        !strip(haystack).contains(&strip(needle)),
        "generated code unexpectedly contains `{needle}`"
    );
}

fn file<'a>(files: &'a HashMap<PathBuf, String>, path: &str) -> &'a str {
    files
        .get(Path::new(path))
        .unwrap_or_else(|| panic!("file `{path}` not generated; have: {:?}", files.keys()))
}

/// Replaces `$CLASSES` in a minimal class database with the given class entries.
fn class_db_with(extra_classes: &str) -> String {
    let template = r#"{
        "header": { "version_major": 4, "version_minor": 3, "version_patch": 0, "version_full_name": "test" },
        "classes": [
            { "name": "Object", "is_refcounted": false, "is_instantiable": true }
            $CLASSES
        ]
    }"#;

    template.replace("$CLASSES", extra_classes)
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Names

#[test]
fn test_snake_conversion() {
    #[rustfmt::skip]
    let mappings = [
        ("Node",             "node"),
        ("Node2D",           "node_2d"),
        ("Sprite3D",         "sprite_3d"),
        ("AnimatedSprite3D", "animated_sprite_3d"),
        ("RefCounted",       "ref_counted"),
        ("Curve1D",          "curve_1d"),
    ];

    for (class_name, expected) in mappings {
        assert_eq!(conv::to_module_name(class_name), expected, "module name of {class_name}");
    }
}

#[test]
fn test_enumerator_names() {
    let names = |enum_name: &str, enumerators: &[&str]| conv::make_enumerator_names(enum_name, enumerators);

    // Own prefix.
    assert_eq!(
        names("ProcessMode", &["PROCESS_MODE_INHERIT", "PROCESS_MODE_WHEN_PAUSED"]),
        ["INHERIT", "WHEN_PAUSED"]
    );

    // Common prefix differing from the enum name.
    assert_eq!(names("DrawFlags", &["FLAG_SHADED", "FLAG_DOUBLE_SIDED"]), ["SHADED", "DOUBLE_SIDED"]);

    // Stripping would leave an identifier starting with a digit.
    assert_eq!(names("Axis", &["AXIS_2D", "AXIS_3D"]), ["AXIS_2D", "AXIS_3D"]);

    // Nothing in common.
    assert_eq!(names("Error", &["OK", "FAILED", "ERR_UNAVAILABLE"]), ["OK", "FAILED", "ERR_UNAVAILABLE"]);

    // A single enumerator keeps its name unless the enum name is a prefix.
    assert_eq!(names("Mode", &["MODE_FAST"]), ["FAST"]);
    assert_eq!(names("Mode", &["SLOW"]), ["SLOW"]);
}

#[test]
fn test_virtual_and_builder_names() {
    assert_eq!(conv::to_virtual_method_name("_process"), "process");
    assert_eq!(conv::to_virtual_method_name("tick"), "tick");
    assert_eq!(conv::to_virtual_trait_name("Node2D"), "INode2D");
    assert_eq!(conv::to_builder_name("add_child"), "ExAddChild");
    assert_eq!(conv::to_method_index_name("Node", "add_child"), "Node__add_child");
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Types and defaults

#[test]
fn test_type_mapping() {
    let json = parse_extension_api(FIXTURE).expect("fixture parses");
    let ctx = Context::build_from_api(&json).expect("fixture is consistent");

    #[rustfmt::skip]
    let mappings = [
        // type,                            meta,           param declaration,                                       return type
        ("bool",                            None,           "bool",                                                  "bool"),
        ("int",                             None,           "i64",                                                   "i64"),
        ("int",                             Some("int8"),   "i8",                                                    "i8"),
        ("int",                             Some("uint64"), "u64",                                                   "u64"),
        ("float",                           Some("float"),  "f32",                                                   "f32"),
        ("float",                           Some("double"), "f64",                                                   "f64"),
        ("String",                          None,           "impl Into<GString>",                                    "GString"),
        ("Array",                           None,           "&Array",                                                "Array"),
        ("Variant",                         None,           "&Variant",                                              "Variant"),
        ("PackedVector2Array",              None,           "&PackedVector2Array",                                   "PackedVector2Array"),
        ("Object",                          None,           "&Gd<impl Inherits<crate::classes::Object>>",            "Option<Gd<crate::classes::Object>>"),
        ("enum::Side",                      None,           "crate::global::Side",                                   "crate::global::Side"),
        ("bitfield::Sprite3D.DrawFlags",    None,           "crate::classes::sprite_3d::DrawFlags",                  "crate::classes::sprite_3d::DrawFlags"),
        ("float*",                          None,           "*mut f32",                                              "*mut f32"),
        ("const uint8_t*",                  None,           "*const u8",                                             "*const u8"),
    ];

    let strip = |s: String| s.replace(' ', "");
    for (ty, meta, decl, owned) in mappings {
        let rust_ty = conv::to_rust_type(ty, meta, &ctx).unwrap_or_else(|| panic!("type {ty} should map"));

        assert_eq!(strip(rust_ty.param_decl().to_string()), strip(decl.to_string()), "declaration of {ty}");
        assert_eq!(strip(rust_ty.owned_ty().to_string()), strip(owned.to_string()), "owned type of {ty}");
    }

    for unknown in ["Transform3D", "enum::Nope", "enum::Sprite3D.DrawFlags", "int16_t*", "NotAClass"] {
        assert!(conv::to_rust_type(unknown, None, &ctx).is_none(), "type {unknown} should not map");
    }
    assert!(conv::to_rust_type("int", Some("int128"), &ctx).is_none());
}

#[test]
fn test_default_values() {
    let json = parse_extension_api(FIXTURE).expect("fixture parses");
    let ctx = Context::build_from_api(&json).expect("fixture is consistent");
    let ty = |name: &str, meta: Option<&str>| conv::to_rust_type(name, meta, &ctx).expect("known type");

    #[rustfmt::skip]
    let valid = [
        (ty("bool", None),                  "true",                 "true"),
        (ty("int", Some("int32")),          "-3",                   "-3 as i32"),
        (ty("float", None),                 "2.0",                  "2.0 as f64"),
        (ty("String", None),                "\"a, b\"",             "GString::from(\"a, b\")"),
        (ty("Vector2", None),               "Vector2(0, 1.5)",      "Vector2::new(0f32, 1.5f32)"),
        (ty("Color", None),                 "Color(1, 0, 0, 1)",    "Color::from_rgba(1f32, 0f32, 0f32, 1f32)"),
        (ty("Array", None),                 "[]",                   "Array::new()"),
        (ty("Dictionary", None),            "{}",                   "Dictionary::new()"),
        (ty("PackedByteArray", None),       "PackedByteArray()",    "PackedByteArray::new()"),
        (ty("Variant", None),               "null",                 "Variant::nil()"),
        (ty("enum::Side", None),            "1",                    "<crate::global::Side as crate::obj::EngineEnum>::from_ord(1)"),
    ];

    let strip = |s: String| s.replace(' ', "");
    for (rust_ty, value, expected) in valid {
        let expr = conv::to_rust_expr(value, &rust_ty).unwrap_or_else(|| panic!("default `{value}` should parse"));
        assert_eq!(strip(expr.to_string()), strip(expected.to_string()), "default `{value}`");
    }

    #[rustfmt::skip]
    let invalid = [
        (ty("bool", None),          "yes"),
        (ty("int", None),           "1.5"),
        (ty("Vector2", None),       "Vector3(1, 2, 3)"),
        (ty("Vector2", None),       "Vector2(1)"),
        (ty("String", None),        "unquoted"),
        (ty("Array", None),         "[1, 2]"),
        (ty("Object", None),        "null"),
        (ty("enum::Side", None),    "99999999999"),
    ];

    for (rust_ty, value) in invalid {
        assert!(conv::to_rust_expr(value, &rust_ty).is_none(), "default `{value}` should be rejected");
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Validation

#[test]
fn test_rejects_malformed_json() {
    let err = generate("{ \"header\": 5 }").err().expect("not a class database");
    assert!(matches!(err, CodegenError::Json(_)), "{err}");
}

#[test]
fn test_rejects_unknown_parent() {
    let json = class_db_with(r#", { "name": "Orphan", "is_refcounted": false, "is_instantiable": true, "inherits": "Ghost" }"#);

    let err = generate(&json).err().expect("unknown parent");
    assert_eq!(
        err,
        CodegenError::UnknownParent {
            class: "Orphan".to_string(),
            parent: "Ghost".to_string()
        }
    );
    assert_eq!(err.to_string(), "class `Orphan` inherits unknown class `Ghost`");
}

#[test]
fn test_rejects_unknown_type() {
    let json = class_db_with(
        r#", { "name": "Node", "is_refcounted": false, "is_instantiable": true, "inherits": "Object",
              "methods": [{ "name": "get_transform", "is_const": true, "is_vararg": false, "is_static": false,
                            "is_virtual": false, "hash": 1, "return_value": { "type": "Transform3D" } }] }"#,
    );

    let err = generate(&json).err().expect("unknown type");
    assert_eq!(
        err,
        CodegenError::UnknownType {
            entry: "Node.get_transform".to_string(),
            ty: "Transform3D".to_string()
        }
    );
}

#[test]
fn test_rejects_duplicate_methods() {
    let method = r#"{ "name": "tick", "is_const": false, "is_vararg": false, "is_static": false, "is_virtual": false, "hash": 1 }"#;
    let json = class_db_with(&format!(
        r#", {{ "name": "Node", "is_refcounted": false, "is_instantiable": true, "inherits": "Object",
               "methods": [{method}, {method}] }}"#
    ));

    let err = generate(&json).err().expect("duplicate method");
    assert_eq!(
        err,
        CodegenError::DuplicateMethod {
            entry: "Node.tick".to_string()
        }
    );
}

#[test]
fn test_rejects_mut_name_collision() {
    let json = class_db_with(
        r#", { "name": "Node", "is_refcounted": false, "is_instantiable": true, "inherits": "Object",
              "methods": [
                { "name": "data", "is_const": true, "is_vararg": false, "is_static": false, "is_virtual": false, "hash": 1 },
                { "name": "data", "is_const": false, "is_vararg": false, "is_static": false, "is_virtual": false, "hash": 2 },
                { "name": "data_mut", "is_const": false, "is_vararg": false, "is_static": false, "is_virtual": false, "hash": 3 }
              ] }"#,
    );

    let err = generate(&json).err().expect("colliding _mut name");
    assert!(matches!(err, CodegenError::DuplicateMethod { .. }), "{err}");
}

#[test]
fn test_rejects_bad_default() {
    let json = class_db_with(
        r#", { "name": "Node", "is_refcounted": false, "is_instantiable": true, "inherits": "Object",
              "methods": [{ "name": "move_to", "is_const": false, "is_vararg": false, "is_static": false,
                            "is_virtual": false, "hash": 1,
                            "arguments": [{ "name": "to", "type": "Vector2", "default_value": "Vector2(1, x)" }] }] }"#,
    );

    let err = generate(&json).err().expect("bad default");
    assert_eq!(
        err,
        CodegenError::BadDefault {
            entry: "Node.move_to(to)".to_string(),
            value: "Vector2(1, x)".to_string()
        }
    );
}

#[test]
fn test_rejects_enum_value_out_of_range() {
    let class_with_enum = |is_bitfield: bool, value: i64| {
        class_db_with(&format!(
            r#", {{ "name": "Node", "is_refcounted": false, "is_instantiable": true, "inherits": "Object",
                   "enums": [{{ "name": "Mode", "is_bitfield": {is_bitfield},
                                "values": [{{ "name": "MODE_SMALL", "value": 1 }}, {{ "name": "MODE_HUGE", "value": {value} }}] }}] }}"#
        ))
    };

    let err = generate(&class_with_enum(false, 3_000_000_000)).err().expect("enum ordinal beyond i32");
    assert_eq!(
        err,
        CodegenError::EnumValueOutOfRange {
            entry: "Node.Mode.MODE_HUGE".to_string(),
            value: 3_000_000_000
        }
    );
    assert_eq!(err.to_string(), "`Node.Mode.MODE_HUGE`: value 3000000000 out of range");

    let err = generate(&class_with_enum(false, i64::from(i32::MIN) - 1)).err().expect("enum ordinal below i32");
    assert!(matches!(err, CodegenError::EnumValueOutOfRange { .. }), "{err}");

    // Bitfields are unsigned but may use the full range above i32.
    let err = generate(&class_with_enum(true, -1)).err().expect("negative flag");
    assert!(matches!(err, CodegenError::EnumValueOutOfRange { value: -1, .. }), "{err}");
    assert!(generate(&class_with_enum(true, 3_000_000_000)).is_ok());
    assert!(generate(&class_with_enum(false, i64::from(i32::MIN))).is_ok());
}

#[test]
fn test_rejects_inheritance_cycle() {
    let json = class_db_with(
        r#", { "name": "A", "is_refcounted": false, "is_instantiable": true, "inherits": "B" },
            { "name": "B", "is_refcounted": false, "is_instantiable": true, "inherits": "A" }"#,
    );

    let err = generate(&json).err().expect("cycle");
    assert!(matches!(err, CodegenError::InheritanceCycle { .. }), "{err}");
}

#[test]
#[should_panic(expected = "cannot generate bindings")]
fn test_generate_core_files_panics_on_invalid_input() {
    let mut watch = StopWatch::start();
    let dir = std::env::temp_dir().join("gdbind-codegen-invalid");

    crate::generate_core_files("[]", &dir, &mut watch);
}

#[test]
#[should_panic(expected = "failed to create directory")]
fn test_generate_core_files_reports_unwritable_dir() {
    let mut watch = StopWatch::start();

    // A regular file where the output directory should go.
    let blocker = std::env::temp_dir().join(format!("gdbind-codegen-blocker-{}", std::process::id()));
    std::fs::write(&blocker, "").expect("temp file");

    crate::generate_core_files(FIXTURE, &blocker.join("gen"), &mut watch);
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Generated code

#[test]
fn test_generated_file_set() {
    let files = generate_fixture();

    let mut paths: Vec<_> = files.keys().map(|p| p.to_string_lossy().replace('\\', "/")).collect();
    paths.sort();

    assert_eq!(
        paths,
        [
            "central.rs",
            "classes/animated_sprite_3d.rs",
            "classes/mod.rs",
            "classes/object.rs",
            "classes/ref_counted.rs",
            "classes/sprite_3d.rs",
            "global_enums.rs",
            "mod.rs",
        ]
    );
}

#[test]
fn test_central_method_table() {
    let files = generate_fixture();
    let central = file(&files, "central.rs");

    assert_contains_code(central, "pub const API_VERSION: sys::ApiVersion = sys::ApiVersion { major: 4, minor: 2, };");

    // Sequential indices in class database order; virtual methods are not part of the table.
    assert_contains_code(central, "pub const Object__emit_signal: usize = 0;");
    assert_contains_code(central, "pub const Object__connect: usize = 1;");
    assert_contains_code(central, "pub const RefCounted__init_ref: usize = 2;");
    assert_contains_code(central, "pub const Sprite3D__set_modulate: usize = 3;");
    assert_contains_code(central, "pub const Sprite3D__frames: usize = 4;");
    assert_contains_code(central, "pub const Sprite3D__frames_mut: usize = 5;");
    assert_contains_code(central, "pub const AnimatedSprite3D__play: usize = 9;");
    assert_not_contains_code(central, "draw");

    assert_contains_code(
        central,
        r#"sys::MethodSpec {
            class: c"Object",
            method: c"connect",
            hash: 12,
            params: &[
                sys::ArgKind::Builtin(sys::VariantType::String),
                sys::ArgKind::Builtin(sys::VariantType::Callable),
                sys::ArgKind::Primitive(sys::VariantType::Int)
            ],
            ret: Some(sys::ArgKind::Primitive(sys::VariantType::Int)),
            is_vararg: false,
            is_const: false,
        }"#,
    );

    assert_contains_code(central, "params: &[sys::ArgKind::Pointer, sys::ArgKind::Primitive(sys::VariantType::Int)], ret: None");
}

#[test]
fn test_class_struct_and_bounds() {
    let files = generate_fixture();

    let object = file(&files, "classes/object.rs");
    assert_contains_code(object, "#[repr(C)] pub struct Object { object_ptr: sys::GDExtensionObjectPtr, }");
    assert_contains_code(object, "type Base = crate::obj::NoBase;");
    assert_contains_code(object, "type DynMemory = crate::obj::bounds::MemDynamic;");
    assert_not_contains_code(object, "impl std::ops::Deref");

    let ref_counted = file(&files, "classes/ref_counted.rs");
    assert_contains_code(ref_counted, "type Memory = crate::obj::bounds::MemRefCounted;");
    assert_contains_code(ref_counted, "impl crate::obj::cap::GodotDefault for RefCounted {}");

    let animated = file(&files, "classes/animated_sprite_3d.rs");
    assert_contains_code(animated, "type Base = crate::classes::Sprite3D;");
    assert_contains_code(animated, "unsafe impl crate::obj::Inherits<crate::classes::Sprite3D> for AnimatedSprite3D {}");
    assert_contains_code(animated, "unsafe impl crate::obj::Inherits<crate::classes::Object> for AnimatedSprite3D {}");
    assert_contains_code(animated, "type Target = crate::classes::Sprite3D;");
    assert_contains_code(animated, "pub fn as_sprite_3d(&self) -> &crate::classes::Sprite3D");
    assert_contains_code(animated, "pub fn as_object_mut(&mut self) -> &mut crate::classes::Object");
    assert_contains_code(animated, r#"fn class_name_c() -> &'static std::ffi::CStr { c"AnimatedSprite3D" }"#);

    // Not instantiable.
    let sprite = file(&files, "classes/sprite_3d.rs");
    assert_not_contains_code(sprite, "GodotDefault for Sprite3D");
}

#[test]
fn test_inherit_macro() {
    let files = generate_fixture();
    let animated = file(&files, "classes/animated_sprite_3d.rs");

    assert_contains_code(animated, "macro_rules! inherit_from_AnimatedSprite3D__gdbind");
    assert_contains_code(
        animated,
        "unsafe impl ::gdbind::obj::Inherits<::gdbind::classes::AnimatedSprite3D> for $Class {}
         unsafe impl ::gdbind::obj::Inherits<::gdbind::classes::Sprite3D> for $Class {}
         unsafe impl ::gdbind::obj::Inherits<::gdbind::classes::Object> for $Class {}",
    );

    let module = file(&files, "classes/mod.rs");
    assert_contains_code(module, "pub mod class_macros { pub use crate::*;");
    assert_contains_code(module, "pub use inherit_from_Sprite3D__gdbind;");
    assert_not_contains_code(module, "pub use crate::inherit_from_");
}

#[test]
fn test_methods() {
    let files = generate_fixture();
    let sprite = file(&files, "classes/sprite_3d.rs");

    // Const/non-const pair.
    assert_contains_code(sprite, "pub fn frames(&self,) -> PackedVector2Array");
    assert_contains_code(sprite, "pub fn frames_mut(&mut self,) -> PackedVector2Array");
    assert_contains_code(sprite, "crate::gen::central::method_index::Sprite3D__frames_mut");

    // Static method: no receiver, null object.
    assert_contains_code(sprite, "pub fn default_size() -> Vector2");
    assert_contains_code(sprite, "std::ptr::null_mut()");

    // Pointer parameter: unsafe, and no builder despite the default.
    assert_contains_code(sprite, "pub unsafe fn read_pixels(&self, out: *mut u8, len: i32)");
    assert_not_contains_code(sprite, "ExReadPixels");

    // Enum and bitfield parameters.
    assert_contains_code(
        sprite,
        "pub fn set_flags(&mut self, flags: crate::classes::sprite_3d::DrawFlags) { self.set_flags_ex(flags).done() }",
    );

    let object = file(&files, "classes/object.rs");
    // Vararg: panicking and fallible forms.
    assert_contains_code(
        object,
        "pub fn emit_signal(&mut self, signal: impl Into<GString>, varargs: &[Variant]) -> i64",
    );
    assert_contains_code(
        object,
        "pub fn try_emit_signal(&mut self, signal: impl Into<GString>, varargs: &[Variant]) -> Result<i64, crate::meta::CallError>",
    );
    assert_contains_code(object, "out_class_varcall");
}

#[test]
fn test_default_parameter_builders() {
    let files = generate_fixture();
    let sprite = file(&files, "classes/sprite_3d.rs");

    // Keyword parameter renamed.
    assert_contains_code(sprite, "pub fn type_(self, type_: i8) -> Self");
    assert_contains_code(sprite, "type_: 3 as i8");
    assert_contains_code(sprite, "color: Color::from_rgba(1f32, 1f32, 1f32, 1f32)");
    assert_contains_code(sprite, "pub struct ExSetModulate<'a> { surround_object: &'a mut Sprite3D,");
    assert_contains_code(sprite, "pub fn set_modulate(&mut self,) { self.set_modulate_ex().done() }");
    assert_contains_code(
        sprite,
        "pub fn set_flags_ex<'a>(&'a mut self, flags: crate::classes::sprite_3d::DrawFlags) -> ExSetFlags<'a>",
    );

    // Borrowed required parameters live as long as the builder.
    let object = file(&files, "classes/object.rs");
    assert_contains_code(
        object,
        "pub fn connect_ex<'a>(&'a mut self, signal: impl Into<GString>, callable: &'a Callable) -> ExConnect<'a>",
    );
    assert_contains_code(object, "pub struct ExConnect<'a> { surround_object: &'a mut Object, signal: GString, callable: &'a Callable,");

    let animated = file(&files, "classes/animated_sprite_3d.rs");
    assert_contains_code(animated, "name: GString::from(\"\")");
    assert_contains_code(animated, "pub fn name(self, name: impl Into<GString>) -> Self { Self { name: name.into(), ..self } }");
    assert_contains_code(animated, "pub fn done(self) { let Self { surround_object, name, speed } = self; surround_object.play_full(name, speed) }");
}

#[test]
fn test_signals() {
    let files = generate_fixture();
    let sprite = file(&files, "classes/sprite_3d.rs");

    assert_contains_code(
        sprite,
        r#"pub fn connect_frame_changed(&mut self, callable: &Callable) -> i64 { self.connect("frame_changed", callable) }"#,
    );
    assert_contains_code(
        sprite,
        r#"pub fn emit_frame_changed(&mut self, frame: i32, label: impl Into<GString>) -> i64 {
            self.emit_signal("frame_changed", &[frame.to_variant(), { let label: GString = label.into(); label.to_variant() }])
        }"#,
    );
}

#[test]
fn test_virtual_traits() {
    let files = generate_fixture();

    let sprite = file(&files, "classes/sprite_3d.rs");
    assert_contains_code(
        sprite,
        "pub trait ISprite3D: crate::obj::GodotClass + crate::private::You_forgot_the_attribute__godot_api",
    );
    assert_contains_code(
        sprite,
        "fn draw(&self, target: Option<Gd<crate::classes::Object>>) -> bool { unimplemented!() }",
    );

    // Inherited virtuals.
    let animated = file(&files, "classes/animated_sprite_3d.rs");
    assert_contains_code(animated, "pub trait IAnimatedSprite3D");
    assert_contains_code(animated, "fn draw(&self");

    // No virtuals anywhere in the chain.
    let ref_counted = file(&files, "classes/ref_counted.rs");
    assert_not_contains_code(ref_counted, "pub trait I");

    let module = file(&files, "classes/mod.rs");
    assert_contains_code(module, "pub use sprite_3d::{Sprite3D, ISprite3D};");
    assert_contains_code(module, "pub use ref_counted::{RefCounted};");
}

#[test]
fn test_enums() {
    let files = generate_fixture();

    let global = file(&files, "global_enums.rs");
    assert_contains_code(global, "pub struct Side { ord: i32, }");
    assert_contains_code(
        global,
        "#[doc(alias = \"SIDE_LEFT\")] #[doc = \"Engine enumerator name: `SIDE_LEFT`\"] pub const LEFT: Side = Side { ord: 0 };",
    );
    assert_contains_code(global, "crate::meta::ErrorKind::BadEnumOrdinal { enum_name: \"Side\" }");

    let sprite = file(&files, "classes/sprite_3d.rs");
    assert_contains_code(sprite, "pub struct DrawFlags { ord: u64, }");
    assert_contains_code(sprite, "pub const DOUBLE_SIDED: DrawFlags = DrawFlags { ord: 2 };");
    assert_contains_code(sprite, "impl std::ops::BitOr for DrawFlags");
}

#[test]
fn test_enumerator_alias_only_when_renamed() {
    use crate::generator::enums::make_enum_definition;
    use crate::models::domain::{Enum, Enumerator};

    let enumerator = |godot_name: &str, rust_name: &str, value| Enumerator {
        godot_name: godot_name.to_string(),
        rust_name: rust_name.to_string(),
        value,
    };

    for is_bitfield in [false, true] {
        let enum_ = Enum {
            name: "Corner".to_string(),
            is_bitfield,
            enumerators: vec![enumerator("TOP", "TOP", 1), enumerator("CORNER_BOTTOM", "BOTTOM", 2)],
        };
        let code = make_enum_definition(&enum_).to_string();

        assert_not_contains_code(&code, "#[doc(alias = \"TOP\")]");
        assert_contains_code(&code, "#[doc(alias = \"CORNER_BOTTOM\")]");
    }
}
