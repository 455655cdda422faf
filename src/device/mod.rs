// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device client seam.
//!
//! A [`Connector`] opens an authenticated handle to one plug; the handle
//! is a [`DeviceClient`]. Handles are shared as `Arc<dyn DeviceClient>`, so
//! a handle dropped by the connection manager stays valid for any task that
//! is still using it.
//!
//! The crate ships [`TasmotaConnector`] (feature `tasmota`). Other plugs
//! plug in by implementing both traits:
//!
//! ```
//! use std::sync::Arc;
//!
//! use async_trait::async_trait;
//! use psucontrol_plug::device::{Connector, DeviceClient};
//! use psucontrol_plug::error::{ConnectionError, DeviceError};
//! use secrecy::SecretString;
//!
//! struct AlwaysOn;
//!
//! #[async_trait]
//! impl DeviceClient for AlwaysOn {
//!     async fn get_status(&self) -> Result<bool, DeviceError> {
//!         Ok(true)
//!     }
//!     async fn set_status(&self, _on: bool) -> Result<(), DeviceError> {
//!         Ok(())
//!     }
//!     async fn set_status_delayed(&self, _seconds: u32) -> Result<(), DeviceError> {
//!         Ok(())
//!     }
//! }
//!
//! struct AlwaysOnConnector;
//!
//! #[async_trait]
//! impl Connector for AlwaysOnConnector {
//!     async fn connect(
//!         &self,
//!         _address: &str,
//!         _username: &str,
//!         _password: &SecretString,
//!     ) -> Result<Arc<dyn DeviceClient>, ConnectionError> {
//!         Ok(Arc::new(AlwaysOn))
//!     }
//! }
//! ```

#[cfg(feature = "tasmota")]
mod tasmota;

#[cfg(feature = "tasmota")]
pub use tasmota::{TasmotaConnector, TasmotaPlug};

use std::sync::Arc;

use async_trait::async_trait;
use secrecy::SecretString;

use crate::error::{ConnectionError, DeviceError};

/// An open, authenticated session with one smart plug.
#[async_trait]
pub trait DeviceClient: Send + Sync {
    /// Reads the relay state; `true` means powered.
    ///
    /// # Errors
    ///
    /// Returns `DeviceError` if the device cannot be queried.
    async fn get_status(&self) -> Result<bool, DeviceError>;

    /// Switches the relay immediately.
    ///
    /// # Errors
    ///
    /// Returns `DeviceError` if the device does not apply the command.
    async fn set_status(&self, on: bool) -> Result<(), DeviceError>;

    /// Asks the device to switch off after `seconds`.
    ///
    /// Returns once the device has accepted the schedule, not once it has
    /// switched off.
    ///
    /// # Errors
    ///
    /// Returns `DeviceError` if the device does not accept the schedule.
    async fn set_status_delayed(&self, seconds: u32) -> Result<(), DeviceError>;
}

/// Opens device handles.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Opens a handle to the plug at `address`.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionError` if the address is invalid, the device is
    /// unreachable or the credentials are rejected.
    async fn connect(
        &self,
        address: &str,
        username: &str,
        password: &SecretString,
    ) -> Result<Arc<dyn DeviceClient>, ConnectionError>;
}
