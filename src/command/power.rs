// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Power control commands.

use crate::command::Command;
use crate::types::{PowerOffDelay, PowerState};

/// Command to query or set the relay state.
///
/// ```
/// use psucontrol_plug::command::{Command, PowerCommand};
/// use psucontrol_plug::types::PowerState;
///
/// assert_eq!(PowerCommand::Get.payload(), None);
/// assert_eq!(PowerCommand::Set(PowerState::On).payload(), Some("ON".to_string()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerCommand {
    /// Query the current power state.
    Get,
    /// Set the power state.
    Set(PowerState),
}

impl Command for PowerCommand {
    fn name(&self) -> String {
        "Power".to_string()
    }

    fn payload(&self) -> Option<String> {
        match self {
            Self::Get => None,
            Self::Set(state) => Some(state.as_str().to_string()),
        }
    }
}

/// Power off after a delay, timed by the device.
///
/// Sent as a `Backlog` so the device keeps counting after the HTTP request
/// has returned.
///
/// ```
/// use psucontrol_plug::command::{Command, DelayedPowerOffCommand};
/// use psucontrol_plug::types::PowerOffDelay;
///
/// let cmd = DelayedPowerOffCommand::new(PowerOffDelay::new(5).unwrap());
/// assert_eq!(cmd.to_http_command(), "Backlog Delay 50; Power OFF");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayedPowerOffCommand {
    delay: PowerOffDelay,
}

impl DelayedPowerOffCommand {
    /// Creates a delayed power-off command.
    #[must_use]
    pub const fn new(delay: PowerOffDelay) -> Self {
        Self { delay }
    }
}

impl Command for DelayedPowerOffCommand {
    fn name(&self) -> String {
        "Backlog".to_string()
    }

    fn payload(&self) -> Option<String> {
        let mut steps: Vec<String> = self
            .delay
            .delay_steps()
            .into_iter()
            .map(|tenths| format!("Delay {tenths}"))
            .collect();
        steps.push(PowerCommand::Set(PowerState::Off).to_http_command());
        Some(steps.join("; "))
    }
}
