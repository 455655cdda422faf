// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tasmota plug over HTTP.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::SecretString;

use crate::command::{DelayedPowerOffCommand, PowerCommand};
use crate::device::{Connector, DeviceClient};
use crate::error::{ConnectionError, DeviceError, ProtocolError};
use crate::protocol::{HttpClient, Protocol};
use crate::response::PowerResponse;
use crate::types::{PowerOffDelay, PowerState};

/// Opens [`TasmotaPlug`] handles.
///
/// Connecting sends a `Power` query, so a bad address or rejected
/// credentials fail at connect time rather than on first use. A password
/// with an empty username is sent as user `admin`.
#[derive(Debug, Clone)]
pub struct TasmotaConnector {
    timeout: Duration,
}

impl TasmotaConnector {
    /// Creates a connector with the default request timeout.
    #[must_use]
    pub fn new() -> Self {
        Self {
            timeout: HttpClient::DEFAULT_TIMEOUT,
        }
    }

    /// Sets the request timeout used by opened handles.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for TasmotaConnector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Connector for TasmotaConnector {
    async fn connect(
        &self,
        address: &str,
        username: &str,
        password: &SecretString,
    ) -> Result<Arc<dyn DeviceClient>, ConnectionError> {
        let plug = TasmotaPlug::open(address, username, password.clone(), self.timeout).await?;
        Ok(Arc::new(plug))
    }
}

/// Handle to one Tasmota plug.
#[derive(Debug, Clone)]
pub struct TasmotaPlug {
    client: HttpClient,
}

impl TasmotaPlug {
    /// Builds the HTTP client and checks that the plug answers.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionError::InvalidAddress` for an empty address,
    /// `ConnectionError::AuthenticationFailed` if the plug answers 401, and
    /// `ConnectionError::Unreachable` if the first query fails otherwise.
    pub async fn open(
        address: &str,
        username: &str,
        password: SecretString,
        timeout: Duration,
    ) -> Result<Self, ConnectionError> {
        let client = HttpClient::with_timeout(address, timeout)
            .map_err(|e| match e {
                ProtocolError::InvalidAddress(msg) => ConnectionError::InvalidAddress(msg),
                other => ConnectionError::Protocol(other),
            })?
            .with_credentials(username, password);

        let plug = Self { client };
        match plug.client.send_command(&PowerCommand::Get).await {
            Ok(_) => Ok(plug),
            Err(ProtocolError::AuthenticationFailed) => Err(ConnectionError::AuthenticationFailed),
            Err(e) => Err(ConnectionError::Unreachable(e.to_string())),
        }
    }

    async fn switch(&self, state: PowerState) -> Result<(), DeviceError> {
        let response = self.client.send_command(&PowerCommand::Set(state)).await?;
        let reported = response.parse::<PowerResponse>()?.power_state()?;
        if reported != state {
            return Err(DeviceError::CommandRejected(format!(
                "requested {state}, device reports {reported}"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl DeviceClient for TasmotaPlug {
    async fn get_status(&self) -> Result<bool, DeviceError> {
        let response = self.client.send_command(&PowerCommand::Get).await?;
        Ok(response.parse::<PowerResponse>()?.power_state()?.is_on())
    }

    async fn set_status(&self, on: bool) -> Result<(), DeviceError> {
        self.switch(PowerState::from(on)).await
    }

    async fn set_status_delayed(&self, seconds: u32) -> Result<(), DeviceError> {
        let command = DelayedPowerOffCommand::new(PowerOffDelay::new(seconds)?);
        self.client.send_command(&command).await?;
        Ok(())
    }
}
