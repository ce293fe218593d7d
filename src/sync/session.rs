// src/sync/session.rs

//! Per-session state of a dashboard connection.
//!
//! One [`DashboardSession`] exists per active dashboard session. It owns one
//! [`SyncScheduler`] per live panel plus the session's choice of how many
//! recent runs to list. Sessions are independent of each other; nothing here
//! is process-wide.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::Serialize;
use tracing::debug;

use crate::config::DashboardSection;
use crate::dashboard::args::parse_run_count;
use crate::errors::{DashboardError, Result};
use crate::sync::scheduler::{SyncScheduler, SyncState};

/// A live panel of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Panel {
    /// Run/task counters tile.
    Stats,
    /// Recent runs list.
    RunList,
    /// Details of a single run.
    RunDetail,
}

impl Panel {
    pub const ALL: [Panel; 3] = [Panel::Stats, Panel::RunList, Panel::RunDetail];

    pub fn as_str(self) -> &'static str {
        match self {
            Panel::Stats => "stats",
            Panel::RunList => "runs",
            Panel::RunDetail => "run-detail",
        }
    }
}

impl fmt::Display for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Panel {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "stats" => Ok(Panel::Stats),
            "runs" | "run-list" => Ok(Panel::RunList),
            "run-detail" | "run" => Ok(Panel::RunDetail),
            other => Err(DashboardError::invalid_argument(
                "panel",
                other,
                "expected one of \"stats\", \"runs\" or \"run-detail\"",
            )),
        }
    }
}

#[derive(Debug)]
pub struct DashboardSession {
    stats: SyncScheduler,
    run_list: SyncScheduler,
    run_detail: SyncScheduler,
    recent_runs: AtomicUsize,
}

impl DashboardSession {
    pub fn new(settings: &DashboardSection) -> Self {
        let panel = || SyncScheduler::new(settings.sync_seconds, settings.stopped_sync_seconds);
        Self {
            stats: panel(),
            run_list: panel(),
            run_detail: panel(),
            recent_runs: AtomicUsize::new(settings.recent_runs),
        }
    }

    pub fn panel(&self, panel: Panel) -> &SyncScheduler {
        match panel {
            Panel::Stats => &self.stats,
            Panel::RunList => &self.run_list,
            Panel::RunDetail => &self.run_detail,
        }
    }

    pub fn start(&self, panel: Panel) {
        debug!(%panel, "start panel sync");
        self.panel(panel).start();
    }

    pub fn stop(&self, panel: Panel) {
        debug!(%panel, "stop panel sync");
        self.panel(panel).stop();
    }

    pub fn set_interval(&self, panel: Panel, raw_seconds: &str) -> Result<()> {
        self.panel(panel).set_interval_str(raw_seconds)
    }

    pub fn sync_state(&self, panel: Panel) -> SyncState {
        self.panel(panel).state()
    }

    /// Number of runs the run list panel shows.
    pub fn recent_runs(&self) -> usize {
        self.recent_runs.load(Ordering::SeqCst)
    }

    /// Change how many recent runs to list, from its wire form.
    pub fn set_recent_runs(&self, raw: &str) -> Result<usize> {
        let n = parse_run_count(raw)?;
        self.recent_runs.store(n, Ordering::SeqCst);
        debug!(recent_runs = n, "recent runs count updated");
        Ok(n)
    }
}
