// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host machine shutdown after power off.

use std::io;
use std::process::Stdio;

use tokio::process::{Child, Command};

/// Shuts the host machine down.
///
/// Fire and forget: implementations return once the shutdown has been
/// requested and report nothing back.
pub trait HostShutdown: Send + Sync {
    /// Requests an immediate shutdown.
    fn shutdown(&self);
}

/// Runs the platform's shutdown command.
///
/// POSIX: `sudo shutdown now`. Other platforms: `shutdown -s -t 0`.
/// The command is spawned on the Tokio runtime the caller runs on.
#[derive(Debug, Clone)]
pub struct SystemShutdown {
    program: String,
    args: Vec<String>,
}

impl SystemShutdown {
    /// Returns the program and arguments for this platform.
    #[must_use]
    pub fn command_line() -> (&'static str, &'static [&'static str]) {
        if cfg!(unix) {
            ("sudo", &["shutdown", "now"])
        } else {
            ("shutdown", &["-s", "-t", "0"])
        }
    }

    /// Runs `program` with `args` instead of the platform command.
    #[must_use]
    pub fn with_command<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    fn spawn(&self) -> io::Result<Child> {
        Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .spawn()
    }
}

impl Default for SystemShutdown {
    fn default() -> Self {
        let (program, args) = Self::command_line();
        Self::with_command(program, args.iter().copied())
    }
}

impl HostShutdown for SystemShutdown {
    fn shutdown(&self) {
        tracing::info!(program = %self.program, args = ?self.args, "Shutting down host");

        // The child is never waited on; the machine is going down.
        if let Err(e) = self.spawn() {
            tracing::warn!(error = %e, program = %self.program, "Failed to start shutdown command");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_line_matches_platform() {
        let (program, args) = SystemShutdown::command_line();
        if cfg!(unix) {
            assert_eq!(program, "sudo");
            assert_eq!(args, ["shutdown", "now"]);
        } else {
            assert_eq!(program, "shutdown");
            assert_eq!(args, ["-s", "-t", "0"]);
        }

        let default = SystemShutdown::default();
        assert_eq!(default.program, program);
        assert_eq!(default.args, args);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn spawns_configured_command() {
        let shutdown = SystemShutdown::with_command("sh", ["-c", "exit 3"]);

        let status = shutdown.spawn().unwrap().wait().await.unwrap();
        assert_eq!(status.code(), Some(3));
    }

    #[tokio::test]
    async fn missing_program_is_logged_not_raised() {
        let shutdown = SystemShutdown::with_command("psucontrol-no-such-program", ["now"]);

        assert!(shutdown.spawn().is_err());
        shutdown.shutdown();
    }
}
