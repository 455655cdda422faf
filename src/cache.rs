// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Last observed plug status.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;

/// Last known on/off state plus the in-flight flag of the background refresh.
///
/// `None` means the state has never been observed. Writes from a command
/// and from a refresh are not ordered against each other: a slow refresh
/// may overwrite the state just set by a command until the next refresh.
#[derive(Debug, Default)]
pub struct StatusCache {
    state: RwLock<Option<bool>>,
    refreshing: Arc<AtomicBool>,
}

impl StatusCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached state, if any.
    #[must_use]
    pub fn get(&self) -> Option<bool> {
        *self.state.read()
    }

    /// Stores an observed or commanded state.
    pub fn set(&self, on: bool) {
        *self.state.write() = Some(on);
    }

    /// Claims the single background refresh slot.
    ///
    /// Returns `None` while another refresh holds the slot. The slot is
    /// released when the returned guard is dropped.
    #[must_use]
    pub fn try_begin_refresh(&self) -> Option<RefreshGuard> {
        self.refreshing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| RefreshGuard {
                flag: Arc::clone(&self.refreshing),
            })
    }

    /// Returns true while a background refresh is in flight.
    #[must_use]
    pub fn is_refreshing(&self) -> bool {
        self.refreshing.load(Ordering::Acquire)
    }
}

/// Holds the background refresh slot; releases it on drop.
#[derive(Debug)]
pub struct RefreshGuard {
    flag: Arc<AtomicBool>,
}

impl Drop for RefreshGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
