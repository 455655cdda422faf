// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the PSU control plugin.
//!
//! Failures are split in two families:
//!
//! - [`ConnectionError`]: a device handle could not be opened (bad address,
//!   rejected credentials, unreachable plug).
//! - [`DeviceError`]: an operation on an already opened handle failed
//!   (network drop, rejected command, unreadable reply).
//!
//! Both surface to the host through [`Error`] when raised by a foreground
//! command. Failures of the background status refresh are logged and never
//! reach the caller.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Opening a device handle failed.
    #[error("connection error: {0}")]
    Connection(#[from] ConnectionError),

    /// An operation on an open device handle failed.
    #[error("device error: {0}")]
    Device(#[from] DeviceError),
}

impl Error {
    /// Returns true if the failure happened while opening the handle.
    #[must_use]
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Returns true if the failure happened on an open handle.
    #[must_use]
    pub fn is_device(&self) -> bool {
        matches!(self, Self::Device(_))
    }
}

/// Errors raised while constructing a device handle.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// The configured address is empty or malformed.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// The device rejected the configured credentials.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// The device could not be reached.
    #[error("device unreachable: {0}")]
    Unreachable(String),

    /// Lower level transport failure during the handshake.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

/// Errors raised by operations on an open device handle.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// Transport failure while talking to the device.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// The device reply could not be understood.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// The device refused or did not apply the command.
    #[error("command rejected: {0}")]
    CommandRejected(String),

    /// The requested power-off delay cannot be scheduled by the device.
    #[error("power-off delay of {seconds}s exceeds the supported maximum of {max}s")]
    InvalidDelay {
        /// The requested delay in seconds.
        seconds: u32,
        /// The largest delay the device accepts.
        max: u32,
    },
}

/// Errors related to HTTP communication with the device.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// HTTP request failed.
    #[cfg(feature = "tasmota")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The device answered with an unexpected HTTP status.
    #[error("unexpected HTTP status {status}: {reason}")]
    Status {
        /// The numeric HTTP status.
        status: u16,
        /// The canonical reason phrase.
        reason: String,
    },

    /// Authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Invalid URL or address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

/// Errors related to parsing device replies.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Expected field is missing from the response.
    #[error("missing field in response: {0}")]
    MissingField(String),

    /// Failed to parse a specific value.
    #[error("failed to parse {field}: {message}")]
    InvalidValue {
        /// The field that failed to parse.
        field: String,
        /// Description of the parsing failure.
        message: String,
    },
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;
