/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Token generation from the domain model.

pub mod central_files;
pub mod classes;
pub mod default_parameters;
pub mod enums;
pub mod functions_common;
pub mod signals;
pub mod virtual_traits;
