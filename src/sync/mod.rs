// src/sync/mod.rs

//! Live-refresh cadence.
//!
//! - [`scheduler`] is the per-panel interval state machine.
//! - [`session`] groups one scheduler per panel for a dashboard session.

pub mod scheduler;
pub mod session;

pub use scheduler::{
    DEFAULT_SYNC_SECONDS, SUSPENDED_SYNC_SECONDS, SyncMode, SyncScheduler, SyncState,
};
pub use session::{DashboardSession, Panel};
