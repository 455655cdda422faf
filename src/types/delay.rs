// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Power-off delay scheduled on the plug itself.
//!
//! Tasmota's `Delay` command pauses a `Backlog` sequence in steps of 0.1
//! second, at most 3600 tenths per step, and a backlog holds at most 30
//! commands. A delayed power-off is therefore a backlog of `Delay` steps
//! followed by `Power OFF`.

use std::fmt;

use crate::error::DeviceError;

/// A power-off delay in whole seconds (1-10440).
///
/// # Examples
///
/// ```
/// use psucontrol_plug::types::PowerOffDelay;
///
/// let delay = PowerOffDelay::new(5).unwrap();
/// assert_eq!(delay.delay_steps(), vec![50]);
///
/// let long = PowerOffDelay::new(400).unwrap();
/// assert_eq!(long.delay_steps(), vec![3600, 400]);
///
/// assert!(PowerOffDelay::new(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PowerOffDelay(u32);

impl PowerOffDelay {
    /// Largest single `Delay` step, in tenths of a second.
    pub const MAX_STEP_TENTHS: u32 = 3600;

    /// Number of `Delay` steps that fit in one backlog next to `Power OFF`.
    pub const MAX_STEPS: u32 = 29;

    /// Minimum delay in seconds.
    pub const MIN: u32 = 1;

    /// Maximum delay in seconds.
    pub const MAX: u32 = Self::MAX_STEP_TENTHS / 10 * Self::MAX_STEPS;

    /// Creates a new delay.
    ///
    /// # Errors
    ///
    /// Returns `DeviceError::InvalidDelay` if `seconds` is outside [1, 10440].
    pub fn new(seconds: u32) -> Result<Self, DeviceError> {
        if !(Self::MIN..=Self::MAX).contains(&seconds) {
            return Err(DeviceError::InvalidDelay {
                seconds,
                max: Self::MAX,
            });
        }
        Ok(Self(seconds))
    }

    /// Returns the delay in seconds.
    #[must_use]
    pub const fn seconds(&self) -> u32 {
        self.0
    }

    /// Splits the delay into `Delay` command arguments, in tenths of a second.
    #[must_use]
    pub fn delay_steps(&self) -> Vec<u32> {
        let mut remaining = self.0 * 10;
        let mut steps = Vec::new();
        while remaining > 0 {
            let step = remaining.min(Self::MAX_STEP_TENTHS);
            steps.push(step);
            remaining -= step;
        }
        steps
    }
}

impl fmt::Display for PowerOffDelay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_bounds() {
        assert!(PowerOffDelay::new(1).is_ok());
        assert!(PowerOffDelay::new(PowerOffDelay::MAX).is_ok());
        assert!(matches!(
            PowerOffDelay::new(PowerOffDelay::MAX + 1),
            Err(DeviceError::InvalidDelay { max: 10_440, .. })
        ));
    }

    #[test]
    fn delay_steps_exact_multiple() {
        let delay = PowerOffDelay::new(720).unwrap();
        assert_eq!(delay.delay_steps(), vec![3600, 3600]);
    }

    #[test]
    fn delay_steps_at_maximum() {
        let delay = PowerOffDelay::new(PowerOffDelay::MAX).unwrap();
        let steps = delay.delay_steps();
        assert_eq!(steps.len(), PowerOffDelay::MAX_STEPS as usize);
        assert!(steps.iter().all(|s| *s == PowerOffDelay::MAX_STEP_TENTHS));
    }

    #[test]
    fn delay_display() {
        assert_eq!(PowerOffDelay::new(5).unwrap().to_string(), "5s");
    }
}
