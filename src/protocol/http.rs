// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP protocol implementation for Tasmota devices.

use std::time::Duration;

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};

use crate::command::Command;
use crate::error::ProtocolError;
use crate::protocol::{CommandResponse, Protocol};

/// HTTP client for a single Tasmota plug.
///
/// # Examples
///
/// ```no_run
/// use psucontrol_plug::command::PowerCommand;
/// use psucontrol_plug::protocol::{HttpClient, Protocol};
///
/// # async fn example() -> Result<(), psucontrol_plug::error::ProtocolError> {
/// let client = HttpClient::new("192.168.1.100")?.with_credentials("admin", "secret");
/// let response = client.send_command(&PowerCommand::Get).await?;
/// println!("{}", response.body());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    base_url: String,
    client: Client,
    credentials: Option<Credentials>,
}

/// HTTP authentication credentials.
#[derive(Debug, Clone)]
struct Credentials {
    username: String,
    password: SecretString,
}

impl HttpClient {
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Username sent when only a password is configured.
    pub const DEFAULT_USERNAME: &'static str = "admin";

    /// Creates a new HTTP client for the specified host.
    ///
    /// The host may carry an explicit `http://` or `https://` scheme;
    /// plain hosts use `http://`.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::InvalidAddress` for an empty host, or
    /// `ProtocolError::Http` if the HTTP client cannot be created.
    pub fn new(host: impl Into<String>) -> Result<Self, ProtocolError> {
        Self::with_timeout(host, Self::DEFAULT_TIMEOUT)
    }

    /// Creates a new HTTP client with a custom request timeout.
    ///
    /// # Errors
    ///
    /// Same as [`HttpClient::new`].
    pub fn with_timeout(host: impl Into<String>, timeout: Duration) -> Result<Self, ProtocolError> {
        let host = host.into();
        let host = host.trim().trim_end_matches('/');
        if host.is_empty() {
            return Err(ProtocolError::InvalidAddress("host is required".to_string()));
        }

        let base_url = if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("http://{host}")
        };

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ProtocolError::Http)?;

        Ok(Self {
            base_url,
            client,
            credentials: None,
        })
    }

    /// Sets authentication credentials.
    ///
    /// Tasmota's web user is always `admin`, so a password with an empty
    /// username is sent as `admin`. With both empty the client stays
    /// unauthenticated.
    #[must_use]
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<SecretString>,
    ) -> Self {
        let username = username.into();
        let password = password.into();
        self.credentials = match (username.is_empty(), password.expose_secret().is_empty()) {
            (true, true) => None,
            (true, false) => Some(Credentials {
                username: Self::DEFAULT_USERNAME.to_string(),
                password,
            }),
            (false, _) => Some(Credentials { username, password }),
        };
        self
    }

    /// Returns the base URL of the device.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds the URL for a command.
    fn build_url(&self, command: &str) -> String {
        let encoded_command = urlencoding::encode(command);

        match &self.credentials {
            Some(creds) => {
                format!(
                    "{}/cm?user={}&password={}&cmnd={}",
                    self.base_url,
                    urlencoding::encode(&creds.username),
                    urlencoding::encode(creds.password.expose_secret()),
                    encoded_command
                )
            }
            None => {
                format!("{}/cm?cmnd={}", self.base_url, encoded_command)
            }
        }
    }
}

impl Protocol for HttpClient {
    async fn send_command<C: Command + Sync>(
        &self,
        command: &C,
    ) -> Result<CommandResponse, ProtocolError> {
        let command = command.to_http_command();
        let url = self.build_url(&command);

        // The URL carries the password; log the command only.
        tracing::debug!(base_url = %self.base_url, command = %command, "Sending HTTP command");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(ProtocolError::Http)?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ProtocolError::AuthenticationFailed);
        }

        if !response.status().is_success() {
            return Err(ProtocolError::Status {
                status: response.status().as_u16(),
                reason: response
                    .status()
                    .canonical_reason()
                    .unwrap_or("Unknown")
                    .to_string(),
            });
        }

        let body = response.text().await.map_err(ProtocolError::Http)?;

        tracing::debug!(body = %body, "Received HTTP response");

        Ok(CommandResponse::new(body))
    }
}
