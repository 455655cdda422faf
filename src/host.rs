// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Interfaces of the PSU-control host.
//!
//! The host polls and switches the power supply through a registered
//! [`PsuProvider`]. Registration goes through a helper the host may or may
//! not expose; older hosts lack it and the plugin then stays unregistered.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;

/// The three operations a PSU-control host calls on a provider.
#[async_trait]
pub trait PsuProvider: Send + Sync {
    /// Switches the power supply on.
    ///
    /// # Errors
    ///
    /// Returns an error if the plug cannot be reached or refuses the command.
    async fn turn_psu_on(&self) -> Result<()>;

    /// Switches the power supply off.
    ///
    /// # Errors
    ///
    /// Returns an error if the plug cannot be reached or refuses the command.
    async fn turn_psu_off(&self) -> Result<()>;

    /// Returns whether the power supply is on.
    ///
    /// # Errors
    ///
    /// Returns an error if no state is known yet and the plug cannot be read.
    async fn get_psu_state(&self) -> Result<bool>;
}

/// Registration helper exposed by the PSU-control host.
pub trait PsuRegistry: Send + Sync {
    /// Registers `provider` as the host's power switch.
    fn register_plugin(&self, provider: Arc<dyn PsuProvider>);
}

/// The host's plugin manager, as far as this plugin needs it.
pub trait PsuControlHost: Send + Sync {
    /// Returns the registration helper, or `None` if this host version does
    /// not support provider plugins.
    fn psu_registry(&self) -> Option<Arc<dyn PsuRegistry>>;
}
