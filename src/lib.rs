// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `psucontrol_plug` - switch a 3D-printer power supply through a smart plug.
//!
//! A PSU-control host (the printer server) calls three operations on this
//! plugin: turn on, turn off and read the state. The plugin forwards them to
//! one smart plug, keeps the last known state so status polls answer
//! without waiting on the network, and can shut the host machine down once
//! the plug accepted a power off.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use psucontrol_plug::settings::MemorySettings;
//! use psucontrol_plug::{PsuControl, TasmotaConnector};
//!
//! #[tokio::main]
//! async fn main() -> psucontrol_plug::Result<()> {
//!     let settings = MemorySettings::from_json(
//!         r#"{"address": "192.168.1.40", "username": "admin", "password": "secret"}"#,
//!     )
//!     .expect("valid JSON");
//!
//!     let psu = PsuControl::builder(Arc::new(TasmotaConnector::new())).build();
//!     psu.reload_settings(&settings).await;
//!
//!     psu.power_on().await?;
//!     println!("on: {}", psu.get_psu_state().await?);
//!     psu.power_off().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Other plugs
//!
//! The bundled client talks to Tasmota firmware over HTTP (feature
//! `tasmota`, on by default). Any other plug works through the
//! [`Connector`] and [`DeviceClient`] traits.

mod cache;
pub mod command;
pub mod config;
mod connection;
pub mod device;
pub mod error;
pub mod host;
mod plugin;
#[cfg(feature = "tasmota")]
pub mod protocol;
pub mod response;
pub mod settings;
pub mod shutdown;
pub mod types;

pub use cache::{RefreshGuard, StatusCache};
pub use config::{PluginConfig, SETTINGS_VERSION, settings_defaults};
pub use connection::ConnectionManager;
#[cfg(feature = "tasmota")]
pub use device::{TasmotaConnector, TasmotaPlug};
pub use device::{Connector, DeviceClient};
pub use error::{ConnectionError, DeviceError, Error, ParseError, ProtocolError, Result};
pub use host::{PsuControlHost, PsuProvider, PsuRegistry};
pub use plugin::{PsuControl, PsuControlBuilder};
pub use settings::{MemorySettings, Settings};
pub use shutdown::{HostShutdown, SystemShutdown};
pub use types::{PowerOffDelay, PowerState};
