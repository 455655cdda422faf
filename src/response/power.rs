// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Power response parsing.

use serde::Deserialize;

use crate::error::ParseError;
use crate::types::PowerState;

/// Response from a Power command.
///
/// Single-relay plugs answer `{"POWER": "ON"}`; some firmwares number the
/// relay and answer `{"POWER1": "ON"}` instead.
///
/// # Examples
///
/// ```
/// use psucontrol_plug::response::PowerResponse;
/// use psucontrol_plug::types::PowerState;
///
/// let response: PowerResponse = serde_json::from_str(r#"{"POWER": "ON"}"#).unwrap();
/// assert_eq!(response.power_state().unwrap(), PowerState::On);
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct PowerResponse {
    #[serde(rename = "POWER", default)]
    power: Option<String>,
    #[serde(rename = "POWER1", default)]
    power1: Option<String>,
}

impl PowerResponse {
    /// Returns the relay state reported by the device.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::MissingField` if the reply carries no power
    /// state, or `ParseError::InvalidValue` if it cannot be parsed.
    pub fn power_state(&self) -> Result<PowerState, ParseError> {
        self.power
            .as_deref()
            .or(self.power1.as_deref())
            .ok_or_else(|| ParseError::MissingField("POWER".to_string()))?
            .parse()
    }
}
