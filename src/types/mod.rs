// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for smart plug control.
//!
//! - [`PowerState`] - On/Off state of the plug relay
//! - [`PowerOffDelay`] - A power-off delay the plug can schedule on its own

mod delay;
mod power;

pub use delay::PowerOffDelay;
pub use power::PowerState;
