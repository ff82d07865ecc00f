/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::collections::HashSet;

use crate::context::Context;
use crate::conv;
use crate::models::domain::*;
use crate::models::json::*;
use crate::models::CodegenError;
use crate::util::safe_ident;

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Top-level

impl ExtensionApi {
    pub fn from_json(json: &JsonExtensionApi, ctx: &Context) -> Result<Self, CodegenError> {
        let mut next_table_index = 0;

        let classes = json
            .classes
            .iter()
            .map(|class| Class::from_json(class, ctx, &mut next_table_index))
            .collect::<Result<Vec<_>, _>>()?;

        let global_enums = json
            .global_enums
            .iter()
            .flatten()
            .map(|enum_| Enum::from_json(enum_, None))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            version: ApiVersion::from_json(&json.header),
            classes,
            global_enums,
        })
    }
}

impl ApiVersion {
    pub fn from_json(json: &JsonHeader) -> Self {
        Self {
            major: json.version_major,
            minor: json.version_minor,
            patch: json.version_patch,
            full_name: json.version_full_name.clone(),
        }
    }
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Classes

impl Class {
    fn from_json(json: &JsonClass, ctx: &Context, next_table_index: &mut usize) -> Result<Self, CodegenError> {
        let class_name = json.name.as_str();

        let constants = json
            .constants
            .iter()
            .flatten()
            .map(|c| Constant {
                name: c.name.clone(),
                value: c.value,
            })
            .collect();

        let enums = json
            .enums
            .iter()
            .flatten()
            .map(|enum_| Enum::from_json(enum_, Some(class_name)))
            .collect::<Result<Vec<_>, _>>()?;

        let (virtuals, regular): (Vec<_>, Vec<_>) = json.methods.iter().flatten().partition(|m| m.is_virtual);

        let rust_names = assign_method_names(class_name, &regular)?;
        let mut methods = Vec::with_capacity(regular.len());
        for (method, rust_name) in regular.into_iter().zip(rust_names) {
            let method = ClassMethod::from_json(method, rust_name, class_name, ctx, *next_table_index)?;
            *next_table_index += 1;
            methods.push(method);
        }

        let virtual_methods = virtuals
            .into_iter()
            .map(|m| VirtualMethod::from_json(m, class_name, ctx))
            .collect::<Result<Vec<_>, _>>()?;

        let signals = json
            .signals
            .iter()
            .flatten()
            .map(|s| Signal::from_json(s, class_name, ctx))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name: json.name.clone(),
            mod_name: conv::to_module_name(class_name),
            inherits: json.inherits.clone(),
            all_bases: ctx.collect_all_bases(class_name),
            is_refcounted: json.is_refcounted,
            is_instantiable: json.is_instantiable,
            constants,
            enums,
            methods,
            virtual_methods,
            signals,
        })
    }
}

/// Rust names for the non-virtual methods of a class.
///
/// A const method and a non-const method of the same name form a pair: the const one keeps the name, the other one
/// gets a `_mut` suffix. Any other name collision is an error.
fn assign_method_names(class_name: &str, methods: &[&JsonClassMethod]) -> Result<Vec<String>, CodegenError> {
    let mut names = Vec::with_capacity(methods.len());

    for method in methods {
        let same_name: Vec<_> = methods.iter().filter(|m| m.name == method.name).collect();

        let rust_name = match same_name.as_slice() {
            [_] => method.name.clone(),
            [a, b] if a.is_const != b.is_const => {
                if method.is_const {
                    method.name.clone()
                } else {
                    format!("{}_mut", method.name)
                }
            }
            _ => {
                return Err(CodegenError::DuplicateMethod {
                    entry: format!("{class_name}.{}", method.name),
                })
            }
        };

        names.push(rust_name);
    }

    // A `_mut` name may collide with an existing method.
    let mut seen = HashSet::new();
    for name in names.iter() {
        if !seen.insert(name.as_str()) {
            return Err(CodegenError::DuplicateMethod {
                entry: format!("{class_name}.{name}"),
            });
        }
    }

    Ok(names)
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Functions

impl ClassMethod {
    fn from_json(
        json: &JsonClassMethod,
        rust_name: String,
        class_name: &str,
        ctx: &Context,
        table_index: usize,
    ) -> Result<Self, CodegenError> {
        let entry = format!("{class_name}.{}", json.name);

        let Some(hash) = json.hash else {
            return Err(CodegenError::MissingHash { entry });
        };

        Ok(Self {
            godot_name: json.name.clone(),
            rust_name,
            hash,
            is_const: json.is_const,
            is_vararg: json.is_vararg,
            is_static: json.is_static,
            params: FnParam::from_json_args(json.arguments.as_deref(), &entry, ctx, true)?,
            return_ty: map_return(json.return_value.as_ref(), &entry, ctx)?,
            table_index,
        })
    }
}

impl VirtualMethod {
    fn from_json(json: &JsonClassMethod, class_name: &str, ctx: &Context) -> Result<Self, CodegenError> {
        let entry = format!("{class_name}.{}", json.name);

        let params = FnParam::from_json_args(json.arguments.as_deref(), &entry, ctx, false)?;
        let return_ty = map_return(json.return_value.as_ref(), &entry, ctx)?;

        // Trampolines only pass owned values.
        let pointer = params.iter().map(|p| &p.ty).chain(return_ty.iter()).find(|ty| ty.is_pointer());
        if pointer.is_some() {
            return Err(CodegenError::UnsupportedParam {
                entry,
                ty: "pointer".to_string(),
            });
        }

        Ok(Self {
            godot_name: json.name.clone(),
            rust_name: conv::to_virtual_method_name(&json.name).to_string(),
            is_const: json.is_const,
            params,
            return_ty,
        })
    }
}

impl Signal {
    fn from_json(json: &JsonSignal, class_name: &str, ctx: &Context) -> Result<Self, CodegenError> {
        let entry = format!("{class_name}.{}", json.name);
        let params = FnParam::from_json_args(json.arguments.as_deref(), &entry, ctx, false)?;

        if let Some(param) = params.iter().find(|p| p.ty.is_pointer()) {
            return Err(CodegenError::UnsupportedParam {
                entry,
                ty: format!("pointer `{}`", param.name),
            });
        }

        Ok(Self {
            name: json.name.clone(),
            params,
        })
    }
}

impl FnParam {
    fn from_json_args(
        args: Option<&[JsonMethodArg]>,
        entry: &str,
        ctx: &Context,
        with_defaults: bool,
    ) -> Result<Vec<Self>, CodegenError> {
        args.unwrap_or_default()
            .iter()
            .map(|arg| Self::from_json(arg, entry, ctx, with_defaults))
            .collect()
    }

    fn from_json(arg: &JsonMethodArg, entry: &str, ctx: &Context, with_default: bool) -> Result<Self, CodegenError> {
        let ty = map_type(&arg.type_, arg.meta.as_deref(), entry, ctx)?;

        let default_value = match arg.default_value.as_deref() {
            Some(value) if with_default => {
                let expr = conv::to_rust_expr(value, &ty).ok_or_else(|| CodegenError::BadDefault {
                    entry: format!("{entry}({})", arg.name),
                    value: value.to_string(),
                })?;
                Some(expr)
            }
            _ => None,
        };

        Ok(Self {
            name: safe_ident(&arg.name),
            ty,
            default_value,
        })
    }
}

fn map_return(ret: Option<&JsonMethodReturn>, entry: &str, ctx: &Context) -> Result<Option<conv::RustTy>, CodegenError> {
    match ret {
        Some(ret) if ret.type_ != "void" => map_type(&ret.type_, ret.meta.as_deref(), entry, ctx).map(Some),
        _ => Ok(None),
    }
}

fn map_type(ty: &str, meta: Option<&str>, entry: &str, ctx: &Context) -> Result<conv::RustTy, CodegenError> {
    conv::to_rust_type(ty, meta, ctx).ok_or_else(|| CodegenError::UnknownType {
        entry: entry.to_string(),
        ty: ty.to_string(),
    })
}

// ----------------------------------------------------------------------------------------------------------------------------------------------
// Enums

impl Enum {
    /// `class` is the surrounding class, or `None` for global enums.
    fn from_json(json: &JsonEnum, class: Option<&str>) -> Result<Self, CodegenError> {
        let names: Vec<&str> = json.values.iter().map(|v| v.name.as_str()).collect();
        let rust_names = conv::make_enumerator_names(&json.name, &names);

        let mut enumerators = Vec::with_capacity(json.values.len());
        for (value, rust_name) in json.values.iter().zip(rust_names) {
            let in_range = if json.is_bitfield {
                value.value >= 0
            } else {
                i32::try_from(value.value).is_ok()
            };

            if !in_range {
                let entry = match class {
                    Some(class) => format!("{class}.{}.{}", json.name, value.name),
                    None => format!("{}.{}", json.name, value.name),
                };
                return Err(CodegenError::EnumValueOutOfRange {
                    entry,
                    value: value.value,
                });
            }

            enumerators.push(Enumerator {
                godot_name: value.name.clone(),
                rust_name,
                value: value.value,
            });
        }

        Ok(Self {
            name: json.name.clone(),
            is_bitfield: json.is_bitfield,
            enumerators,
        })
    }
}
