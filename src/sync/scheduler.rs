// src/sync/scheduler.rs

//! Polling cadence of one live dashboard panel.
//!
//! Two observable states:
//! - `Active`: the panel re-polls every `interval` seconds.
//! - `Suspended`: the interval is a very large sentinel, so periodic refresh
//!   effectively halts while manual refresh keeps working.
//!
//! Only `start()` and `stop()` move between the two. `set_interval()` keeps
//! the current mode and just replaces the interval, so a suspended panel
//! given a short interval reports `Suspended` while polling at that interval.
//!
//! The scheduler only holds the desired interval. It performs no IO; the
//! presentation layer (or [`crate::live`]) reads it before scheduling the
//! next poll.

use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use tokio::sync::Notify;
use tokio::sync::futures::Notified;
use tracing::debug;

use crate::errors::{DashboardError, Result};

/// Interval a panel starts with, and returns to on `start()`.
pub const DEFAULT_SYNC_SECONDS: u64 = 1;

/// Interval meaning "effectively stopped".
pub const SUSPENDED_SYNC_SECONDS: u64 = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncMode {
    Active,
    Suspended,
}

/// Snapshot of a panel's sync state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncState {
    pub interval_seconds: u64,
    pub mode: SyncMode,
}

/// Per-panel interval holder.
///
/// Every mutating call replaces the whole state under one lock, so
/// concurrent calls on the same panel are linearizable; separate panels
/// never share state.
#[derive(Debug)]
pub struct SyncScheduler {
    state: Mutex<SyncState>,
    default_seconds: u64,
    suspended_seconds: u64,
    changed: Notify,
}

impl Default for SyncScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_SYNC_SECONDS, SUSPENDED_SYNC_SECONDS)
    }
}

impl SyncScheduler {
    /// New panel in the `Active` state with `default_seconds`.
    ///
    /// Callers pass validated values (`0 < default_seconds < suspended_seconds`);
    /// out-of-range values are clamped into that shape.
    pub fn new(default_seconds: u64, suspended_seconds: u64) -> Self {
        let default_seconds = default_seconds.max(1);
        let suspended_seconds = suspended_seconds.max(default_seconds + 1);
        Self {
            state: Mutex::new(SyncState {
                interval_seconds: default_seconds,
                mode: SyncMode::Active,
            }),
            default_seconds,
            suspended_seconds,
            changed: Notify::new(),
        }
    }

    /// Resume polling at the default interval.
    pub fn start(&self) {
        self.store(|state| {
            *state = SyncState {
                interval_seconds: self.default_seconds,
                mode: SyncMode::Active,
            }
        });
        debug!(interval = self.default_seconds, "sync started");
    }

    /// Suspend periodic polling.
    pub fn stop(&self) {
        self.store(|state| {
            *state = SyncState {
                interval_seconds: self.suspended_seconds,
                mode: SyncMode::Suspended,
            }
        });
        debug!(interval = self.suspended_seconds, "sync stopped");
    }

    /// Replace the interval, keeping the current mode. Zero is rejected.
    pub fn set_interval(&self, seconds: u64) -> Result<()> {
        if seconds == 0 {
            return Err(DashboardError::invalid_argument(
                "intervalSeconds",
                "0",
                "sync interval must be a positive number of seconds",
            ));
        }
        self.store(|state| state.interval_seconds = seconds);
        debug!(interval = seconds, "sync interval set");
        Ok(())
    }

    /// Parse and apply an interval given in its wire form.
    pub fn set_interval_str(&self, raw: &str) -> Result<()> {
        let seconds = raw.parse::<u64>().map_err(|e| {
            DashboardError::invalid_argument(
                "intervalSeconds",
                raw,
                format!("cannot parse as a positive integer: {e}"),
            )
        })?;
        self.set_interval(seconds)
    }

    pub fn interval_seconds(&self) -> u64 {
        self.state().interval_seconds
    }

    pub fn mode(&self) -> SyncMode {
        self.state().mode
    }

    pub fn state(&self) -> SyncState {
        *self.lock()
    }

    /// Future that resolves after the next mutating call on this panel.
    ///
    /// Changes made after this returns and before it is awaited are not
    /// missed.
    pub fn changed(&self) -> Notified<'_> {
        self.changed.notified()
    }

    fn store(&self, update: impl FnOnce(&mut SyncState)) {
        update(&mut *self.lock());
        self.changed.notify_waiters();
    }

    // SyncState is a plain Copy value, so a poisoned lock still holds a
    // complete state.
    fn lock(&self) -> MutexGuard<'_, SyncState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
