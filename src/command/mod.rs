// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tasmota command definitions used by the bundled plug client.
//!
//! Each command consists of a name (e.g. `"Power"`, `"Backlog"`) and an
//! optional payload (e.g. `"ON"`, `"Delay 50; Power OFF"`).
//!
//! ```
//! use psucontrol_plug::command::{Command, PowerCommand};
//! use psucontrol_plug::types::PowerState;
//!
//! let cmd = PowerCommand::Set(PowerState::On);
//! assert_eq!(cmd.to_http_command(), "Power ON");
//! ```

mod power;

pub use power::{DelayedPowerOffCommand, PowerCommand};

/// A command that can be sent to a Tasmota device.
pub trait Command {
    /// Returns the command name.
    fn name(&self) -> String;

    /// Returns the command payload, if any.
    fn payload(&self) -> Option<String>;

    /// Returns the full command string for HTTP requests.
    ///
    /// Format: `<name> <payload>` or just `<name>` if no payload.
    fn to_http_command(&self) -> String {
        match self.payload() {
            Some(p) => format!("{} {}", self.name(), p),
            None => self.name(),
        }
    }
}
