// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Lazily opened, single device handle.

use std::fmt;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::PluginConfig;
use crate::device::{Connector, DeviceClient};
use crate::error::ConnectionError;

/// Owns at most one live device handle.
///
/// The handle is opened on first use and dropped after any failed
/// operation, so the next caller reconnects. There is no retry here; the
/// host's next command or status poll is the retry.
///
/// Callers get an `Arc` clone of the handle. Invalidating only empties the
/// slot: a task still holding a clone finishes its call on the old session,
/// which at worst fails with a `DeviceError`.
pub struct ConnectionManager {
    connector: Arc<dyn Connector>,
    handle: Mutex<Option<Arc<dyn DeviceClient>>>,
}

impl ConnectionManager {
    /// Creates a manager with no open handle.
    #[must_use]
    pub fn new(connector: Arc<dyn Connector>) -> Self {
        Self {
            connector,
            handle: Mutex::new(None),
        }
    }

    /// Returns the live handle, opening one from `config` if there is none.
    ///
    /// The slot stays locked while connecting so concurrent callers share a
    /// single new handle instead of racing to open several.
    ///
    /// # Errors
    ///
    /// Returns the connector's `ConnectionError`; the slot stays empty.
    pub async fn ensure_connected(
        &self,
        config: &PluginConfig,
    ) -> Result<Arc<dyn DeviceClient>, ConnectionError> {
        let mut slot = self.handle.lock().await;
        if let Some(handle) = slot.as_ref() {
            return Ok(Arc::clone(handle));
        }

        tracing::info!(address = %config.address, "Connecting to device");
        let handle = self
            .connector
            .connect(&config.address, &config.username, &config.password)
            .await?;
        *slot = Some(Arc::clone(&handle));
        Ok(handle)
    }

    /// Drops the live handle, if any.
    pub async fn invalidate(&self) {
        if self.handle.lock().await.take().is_some() {
            tracing::debug!("Dropped device handle");
        }
    }

    /// Returns true if a handle is currently open.
    pub async fn is_connected(&self) -> bool {
        self.handle.lock().await.is_some()
    }
}

impl fmt::Debug for ConnectionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionManager")
            .field(
                "connected",
                &self.handle.try_lock().map(|slot| slot.is_some()).ok(),
            )
            .finish_non_exhaustive()
    }
}
