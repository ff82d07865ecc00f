/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Registration of host classes with the engine.

pub mod callbacks;
pub mod class;

mod plugin;

pub use plugin::{ClassPlugin, CreateFn, FreeFn, PluginItem};
