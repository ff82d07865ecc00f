/*
 * Copyright (c) godot-rust; Bromeon and contributors.
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

mod array;
mod dictionary;
mod packed_array;

pub use array::Array;
pub use dictionary::Dictionary;
pub use packed_array::*;
