// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Typed key/value settings store provided by the host.
//!
//! The host owns persistence. The plugin only reads typed values through
//! [`Settings`] and rebuilds its [`PluginConfig`](crate::PluginConfig) in
//! full whenever the host reports a save.

use parking_lot::RwLock;
use serde_json::{Map, Value};

/// Read access to the host's settings for this plugin.
///
/// Every getter returns `None` when the key is unset or holds a value of
/// another type; callers fall back to their typed default.
pub trait Settings: Send + Sync {
    /// Reads a string setting.
    fn get_string(&self, key: &str) -> Option<String>;

    /// Reads an integer setting.
    fn get_int(&self, key: &str) -> Option<i64>;

    /// Reads a boolean setting.
    fn get_bool(&self, key: &str) -> Option<bool>;
}

/// In-memory settings backed by a JSON object.
///
/// Useful for hosts that keep settings as JSON, and for tests.
///
/// # Examples
///
/// ```
/// use psucontrol_plug::settings::{MemorySettings, Settings};
///
/// let settings = MemorySettings::from_json(r#"{"address": "10.0.0.5", "power_off_delay": 5}"#)
///     .unwrap();
/// assert_eq!(settings.get_string("address").as_deref(), Some("10.0.0.5"));
/// assert_eq!(settings.get_int("power_off_delay"), Some(5));
/// assert_eq!(settings.get_bool("shutdown_on_power_off"), None);
/// ```
#[derive(Debug, Default)]
pub struct MemorySettings {
    values: RwLock<Map<String, Value>>,
}

impl MemorySettings {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store from a JSON object.
    ///
    /// # Errors
    ///
    /// Returns an error if `json` is not a JSON object.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let values: Map<String, Value> = serde_json::from_str(json)?;
        Ok(Self {
            values: RwLock::new(values),
        })
    }

    /// Sets a single value.
    pub fn set(&self, key: impl Into<String>, value: impl Into<Value>) {
        self.values.write().insert(key.into(), value.into());
    }

    /// Merges `data` into the store, as a host does when saving a settings form.
    pub fn save(&self, data: Map<String, Value>) {
        self.values.write().extend(data);
    }

    /// Returns a copy of the stored values.
    #[must_use]
    pub fn snapshot(&self) -> Map<String, Value> {
        self.values.read().clone()
    }
}

impl Settings for MemorySettings {
    fn get_string(&self, key: &str) -> Option<String> {
        self.values
            .read()
            .get(key)
            .and_then(Value::as_str)
            .map(ToString::to_string)
    }

    fn get_int(&self, key: &str) -> Option<i64> {
        let values = self.values.read();
        match values.get(key)? {
            Value::Number(n) => n.as_i64(),
            // Form posts often deliver numbers as strings.
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    fn get_bool(&self, key: &str) -> Option<bool> {
        let values = self.values.read();
        match values.get(key)? {
            Value::Bool(b) => Some(*b),
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "on" | "1" => Some(true),
                "false" | "no" | "off" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }
}
