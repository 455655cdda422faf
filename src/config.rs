// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Plugin configuration.

use secrecy::SecretString;
use serde_json::{Map, Value, json};

use crate::settings::Settings;

/// Version of the settings schema. Bumped when keys are renamed or retyped.
pub const SETTINGS_VERSION: u32 = 1;

/// Setting keys read by the plugin.
pub mod keys {
    /// Address of the plug.
    pub const ADDRESS: &str = "address";
    /// Username for the plug.
    pub const USERNAME: &str = "username";
    /// Password for the plug.
    pub const PASSWORD: &str = "password";
    /// Delay in seconds before the plug cuts power.
    pub const POWER_OFF_DELAY: &str = "power_off_delay";
    /// Whether the host machine shuts down after power off.
    pub const SHUTDOWN_ON_POWER_OFF: &str = "shutdown_on_power_off";
}

/// Returns the default settings schema, as registered with the host.
///
/// The JSON type of each default is the type the plugin reads the key as.
#[must_use]
pub fn settings_defaults() -> Map<String, Value> {
    let mut map = Map::new();
    map.insert(keys::ADDRESS.to_string(), json!(""));
    map.insert(keys::USERNAME.to_string(), json!(""));
    map.insert(keys::PASSWORD.to_string(), json!(""));
    map.insert(keys::POWER_OFF_DELAY.to_string(), json!(0));
    map.insert(keys::SHUTDOWN_ON_POWER_OFF.to_string(), json!(false));
    map
}

/// Configuration of the plug and of the power-off behavior.
///
/// Rebuilt in full from the host settings on every reload; never patched
/// field by field.
///
/// # Examples
///
/// ```
/// use psucontrol_plug::PluginConfig;
///
/// let config = PluginConfig::default()
///     .with_address("10.0.0.5")
///     .with_credentials("u", "p")
///     .with_power_off_delay(5);
///
/// assert_eq!(config.address, "10.0.0.5");
/// assert_eq!(config.power_off_delay, 5);
/// assert!(!config.shutdown_on_power_off);
/// assert!(!format!("{config:?}").contains("\"p\""));
/// ```
#[derive(Debug, Clone)]
pub struct PluginConfig {
    /// Address of the plug (host name or IP, optionally with scheme).
    pub address: String,
    /// Username for the plug.
    pub username: String,
    /// Password for the plug.
    pub password: SecretString,
    /// Seconds the plug waits before cutting power; 0 cuts immediately.
    pub power_off_delay: u32,
    /// Shut the host machine down after a successful power off.
    pub shutdown_on_power_off: bool,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            address: String::new(),
            username: String::new(),
            password: SecretString::from(String::new()),
            power_off_delay: 0,
            shutdown_on_power_off: false,
        }
    }
}

impl PluginConfig {
    /// Reads the whole configuration from the host settings.
    ///
    /// Unset or mistyped keys fall back to the typed defaults (empty
    /// string, 0, false). A negative delay is treated as 0.
    #[must_use]
    pub fn from_settings(settings: &dyn Settings) -> Self {
        let power_off_delay = match settings.get_int(keys::POWER_OFF_DELAY) {
            Some(delay) if delay < 0 => {
                tracing::warn!(delay, "Negative power-off delay, using 0");
                0
            }
            Some(delay) => u32::try_from(delay).unwrap_or(u32::MAX),
            None => 0,
        };

        let config = Self {
            address: settings.get_string(keys::ADDRESS).unwrap_or_default(),
            username: settings.get_string(keys::USERNAME).unwrap_or_default(),
            password: SecretString::from(settings.get_string(keys::PASSWORD).unwrap_or_default()),
            power_off_delay,
            shutdown_on_power_off: settings
                .get_bool(keys::SHUTDOWN_ON_POWER_OFF)
                .unwrap_or(false),
        };

        tracing::debug!(
            address = %config.address,
            username = %config.username,
            power_off_delay = config.power_off_delay,
            shutdown_on_power_off = config.shutdown_on_power_off,
            "Read settings"
        );

        config
    }

    /// Sets the plug address.
    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    /// Sets the plug credentials.
    #[must_use]
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<SecretString>,
    ) -> Self {
        self.username = username.into();
        self.password = password.into();
        self
    }

    /// Sets the power-off delay in seconds.
    #[must_use]
    pub fn with_power_off_delay(mut self, seconds: u32) -> Self {
        self.power_off_delay = seconds;
        self
    }

    /// Enables or disables the host shutdown after power off.
    #[must_use]
    pub fn with_shutdown_on_power_off(mut self, enabled: bool) -> Self {
        self.shutdown_on_power_off = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use secrecy::ExposeSecret;

    use super::*;
    use crate::settings::MemorySettings;

    #[test]
    fn defaults_schema() {
        let defaults = settings_defaults();
        assert_eq!(defaults.len(), 5);
        assert_eq!(defaults[keys::POWER_OFF_DELAY], json!(0));
        assert_eq!(defaults[keys::SHUTDOWN_ON_POWER_OFF], json!(false));
    }

    #[test]
    fn empty_settings_give_typed_defaults() {
        let config = PluginConfig::from_settings(&MemorySettings::new());
        assert_eq!(config.address, "");
        assert_eq!(config.username, "");
        assert_eq!(config.password.expose_secret(), "");
        assert_eq!(config.power_off_delay, 0);
        assert!(!config.shutdown_on_power_off);
    }

    #[test]
    fn full_settings_are_read() {
        let settings = MemorySettings::from_json(
            r#"{
                "address": "10.0.0.5",
                "username": "u",
                "password": "p",
                "power_off_delay": 5,
                "shutdown_on_power_off": true
            }"#,
        )
        .unwrap();

        let config = PluginConfig::from_settings(&settings);
        assert_eq!(config.address, "10.0.0.5");
        assert_eq!(config.username, "u");
        assert_eq!(config.password.expose_secret(), "p");
        assert_eq!(config.power_off_delay, 5);
        assert!(config.shutdown_on_power_off);
    }

    #[test]
    fn negative_delay_is_zero() {
        let settings = MemorySettings::new();
        settings.set(keys::POWER_OFF_DELAY, -3);
        assert_eq!(PluginConfig::from_settings(&settings).power_off_delay, 0);
    }

    #[test]
    fn debug_hides_password() {
        let config = PluginConfig::default().with_credentials("admin", "hunter2");
        assert!(!format!("{config:?}").contains("hunter2"));
    }
}
