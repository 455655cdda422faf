// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The PSU control service.
//!
//! [`PsuControl`] ties the pieces together: it holds the configuration,
//! opens the plug lazily through a [`ConnectionManager`], caches the last
//! known state in a [`StatusCache`], and answers the host's three calls.
//!
//! # Failure handling
//!
//! Every failed device operation drops the handle so the next call starts
//! a fresh session. Foreground calls (`power_on`, `power_off`, and a
//! status read with nothing cached) log the error and return it to the
//! host. The background status refresh logs its error once as a warning
//! and leaves the cached value as it was.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use psucontrol_plug::{PluginConfig, PsuControl, TasmotaConnector};
//!
//! # async fn example() -> psucontrol_plug::Result<()> {
//! let psu = PsuControl::builder(Arc::new(TasmotaConnector::new()))
//!     .config(PluginConfig::default().with_address("192.168.1.40"))
//!     .build();
//!
//! psu.power_on().await?;
//! assert!(psu.get_psu_state().await?);
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::cache::StatusCache;
use crate::config::PluginConfig;
use crate::connection::ConnectionManager;
use crate::device::{Connector, DeviceClient};
use crate::error::{DeviceError, Error, Result};
use crate::host::{PsuControlHost, PsuProvider};
use crate::settings::Settings;
use crate::shutdown::{HostShutdown, SystemShutdown};

/// Switches the printer power supply through a smart plug.
///
/// Cheap to clone; clones share the same handle, cache and configuration.
#[derive(Clone)]
pub struct PsuControl {
    inner: Arc<Inner>,
}

struct Inner {
    config: RwLock<PluginConfig>,
    connection: ConnectionManager,
    cache: StatusCache,
    shutdown: Arc<dyn HostShutdown>,
}

/// Builder for [`PsuControl`].
pub struct PsuControlBuilder {
    connector: Arc<dyn Connector>,
    config: PluginConfig,
    shutdown: Arc<dyn HostShutdown>,
}

impl PsuControlBuilder {
    /// Sets the initial configuration.
    #[must_use]
    pub fn config(mut self, config: PluginConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the host shutdown hook (defaults to [`SystemShutdown`]).
    #[must_use]
    pub fn shutdown(mut self, shutdown: Arc<dyn HostShutdown>) -> Self {
        self.shutdown = shutdown;
        self
    }

    /// Builds the service. No connection is opened yet.
    #[must_use]
    pub fn build(self) -> PsuControl {
        PsuControl {
            inner: Arc::new(Inner {
                config: RwLock::new(self.config),
                connection: ConnectionManager::new(self.connector),
                cache: StatusCache::new(),
                shutdown: self.shutdown,
            }),
        }
    }
}

impl PsuControl {
    /// Starts building a service that opens plugs through `connector`.
    #[must_use]
    pub fn builder(connector: Arc<dyn Connector>) -> PsuControlBuilder {
        PsuControlBuilder {
            connector,
            config: PluginConfig::default(),
            shutdown: Arc::new(SystemShutdown::default()),
        }
    }

    /// Returns a copy of the current configuration.
    #[must_use]
    pub fn config(&self) -> PluginConfig {
        self.inner.config.read().clone()
    }

    /// Returns the cached plug state without touching the device.
    #[must_use]
    pub fn cached_state(&self) -> Option<bool> {
        self.inner.cache.get()
    }

    /// Returns true while a background status refresh is running.
    #[must_use]
    pub fn refresh_in_flight(&self) -> bool {
        self.inner.cache.is_refreshing()
    }

    /// Returns true if a device handle is open.
    pub async fn is_connected(&self) -> bool {
        self.inner.connection.is_connected().await
    }

    /// Rebuilds the configuration from `settings` and reconnects.
    ///
    /// The old handle is dropped. A failed reconnect is logged only; the
    /// next command retries.
    pub async fn reload_settings(&self, settings: &dyn Settings) {
        let config = PluginConfig::from_settings(settings);
        *self.inner.config.write() = config.clone();
        tracing::info!(address = %config.address, "Settings reloaded");

        self.inner.connection.invalidate().await;
        if let Err(e) = self.inner.connection.ensure_connected(&config).await {
            tracing::error!(error = %e, address = %config.address, "Failed to connect to device");
        }
    }

    /// Called by the host once its settings store is loaded.
    pub async fn on_settings_initialized(&self, settings: &dyn Settings) {
        self.reload_settings(settings).await;
    }

    /// Called by the host after it persisted new settings.
    pub async fn on_settings_save(&self, settings: &dyn Settings) {
        self.reload_settings(settings).await;
    }

    /// Called by the host when stored settings are older than
    /// [`SETTINGS_VERSION`](crate::config::SETTINGS_VERSION).
    ///
    /// Version 1 is the only schema so far; nothing to migrate.
    pub fn on_settings_migrate(&self, target: u32, current: Option<u32>) {
        tracing::debug!(target, ?current, "No settings migration needed");
    }

    /// Registers with the host's PSU-control registry, if it has one.
    pub fn on_startup(&self, host: &dyn PsuControlHost) {
        let Some(registry) = host.psu_registry() else {
            tracing::warn!(
                "The installed PSU control host does not support plugin registration"
            );
            return;
        };

        tracing::debug!("Registering plugin with PSU control host");
        registry.register_plugin(Arc::new(self.clone()));
    }

    /// Switches the plug on.
    ///
    /// # Errors
    ///
    /// Returns `Error::Connection` if no handle can be opened, or
    /// `Error::Device` if the plug does not switch. The handle is dropped
    /// in both cases.
    pub async fn power_on(&self) -> Result<()> {
        self.inner
            .power_on()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to switch PSU on"))
    }

    /// Switches the plug off.
    ///
    /// With a non-zero `power_off_delay` the plug is asked to switch off by
    /// itself after the delay and this returns immediately. Either way the
    /// cached state becomes off once the plug accepted the command, so it
    /// reflects the commanded state rather than the relay. The host shutdown
    /// runs only after the plug accepted the command.
    ///
    /// # Errors
    ///
    /// Returns `Error::Connection` if no handle can be opened, or
    /// `Error::Device` if the plug refuses the command.
    pub async fn power_off(&self) -> Result<()> {
        self.inner
            .power_off()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to switch PSU off"))
    }

    /// Returns the plug state.
    ///
    /// With a cached state this returns it at once and refreshes the cache
    /// in the background for the next call; at most one refresh runs at a
    /// time. With nothing cached it reads the plug and waits for the answer.
    ///
    /// # Errors
    ///
    /// Only the blocking read fails: `Error::Connection` or `Error::Device`.
    pub async fn get_psu_state(&self) -> Result<bool> {
        if let Some(state) = self.inner.cache.get() {
            self.refresh_in_background();
            return Ok(state);
        }
        self.refresh_state().await
    }

    /// Reads the plug now and updates the cache.
    ///
    /// # Errors
    ///
    /// Returns `Error::Connection` or `Error::Device`; the cache is left as
    /// it was.
    pub async fn refresh_state(&self) -> Result<bool> {
        self.inner
            .fetch_state()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to read PSU state"))
    }

    fn refresh_in_background(&self) {
        let Some(guard) = self.inner.cache.try_begin_refresh() else {
            tracing::trace!("Status refresh already in flight");
            return;
        };

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            let _guard = guard;
            if let Err(e) = inner.fetch_state().await {
                tracing::warn!(error = %e, "Background status refresh failed");
            }
        });
    }
}

// Failures are returned unlogged; the caller picks the level.
impl Inner {
    async fn device(&self) -> Result<Arc<dyn DeviceClient>> {
        let config = self.config.read().clone();
        self.connection
            .ensure_connected(&config)
            .await
            .map_err(Error::Connection)
    }

    async fn power_on(&self) -> Result<()> {
        let device = self.device().await?;

        tracing::debug!("Switching PSU on");
        if let Err(e) = device.set_status(true).await {
            return Err(self.discard(e).await);
        }
        self.cache.set(true);
        Ok(())
    }

    async fn power_off(&self) -> Result<()> {
        let config = self.config.read().clone();
        let device = self.device().await?;

        let result = if config.power_off_delay > 0 {
            tracing::debug!(delay = config.power_off_delay, "Switching PSU off after delay");
            device.set_status_delayed(config.power_off_delay).await
        } else {
            tracing::debug!("Switching PSU off");
            device.set_status(false).await
        };
        if let Err(e) = result {
            return Err(self.discard(e).await);
        }

        self.cache.set(false);
        if config.shutdown_on_power_off {
            self.shutdown.shutdown();
        }
        Ok(())
    }

    async fn fetch_state(&self) -> Result<bool> {
        let device = self.device().await?;

        tracing::debug!("Reading PSU state");
        match device.get_status().await {
            Ok(on) => {
                self.cache.set(on);
                Ok(on)
            }
            Err(e) => Err(self.discard(e).await),
        }
    }

    async fn discard(&self, err: DeviceError) -> Error {
        self.connection.invalidate().await;
        Error::Device(err)
    }
}

#[async_trait]
impl PsuProvider for PsuControl {
    async fn turn_psu_on(&self) -> Result<()> {
        self.power_on().await
    }

    async fn turn_psu_off(&self) -> Result<()> {
        self.power_off().await
    }

    async fn get_psu_state(&self) -> Result<bool> {
        PsuControl::get_psu_state(self).await
    }
}

impl fmt::Debug for PsuControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PsuControl")
            .field("config", &*self.inner.config.read())
            .field("connection", &self.inner.connection)
            .field("cache", &self.inner.cache)
            .finish_non_exhaustive()
    }
}
