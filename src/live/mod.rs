// src/live/mod.rs

//! Async refresh loop for one dashboard panel.
//!
//! The dashboard and the sync scheduler are pure request/response pieces;
//! this module is the IO shell that ties them together. A [`LivePanel`]
//! repeatedly queries the [`Dashboard`], publishes each outcome on an mpsc
//! channel and then sleeps for whatever interval the panel's
//! [`SyncScheduler`](crate::sync::SyncScheduler) currently holds.
//!
//! A failed query is published like any other update and does not end the
//! loop. The loop ends on shutdown, when the receiver goes away, or after a
//! configured number of iterations.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::dag::{RunDetail, RunSummaryRow};
use crate::dashboard::Dashboard;
use crate::errors::Result;
use crate::stats::DashboardStats;
use crate::sync::{DashboardSession, Panel};

/// What a live panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelTarget {
    Stats,
    /// Recent runs; the count is read from the session on every poll.
    RunList,
    RunDetail(i64),
}

impl PanelTarget {
    pub fn panel(&self) -> Panel {
        match self {
            PanelTarget::Stats => Panel::Stats,
            PanelTarget::RunList => Panel::RunList,
            PanelTarget::RunDetail(_) => Panel::RunDetail,
        }
    }
}

/// Payload of a successful poll.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PanelContent {
    Stats(DashboardStats),
    RunList(Vec<RunSummaryRow>),
    RunDetail(Box<RunDetail>),
}

/// One poll result of a live panel.
pub struct PanelUpdate {
    pub panel: Panel,
    /// 1-based poll counter of this panel loop.
    pub sequence: u64,
    pub outcome: Result<PanelContent>,
}

impl fmt::Debug for PanelUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PanelUpdate")
            .field("panel", &self.panel)
            .field("sequence", &self.sequence)
            .field("ok", &self.outcome.is_ok())
            .finish()
    }
}

pub struct LivePanel {
    dashboard: Dashboard,
    session: Arc<DashboardSession>,
    target: PanelTarget,
    updates: mpsc::Sender<PanelUpdate>,
    max_iterations: Option<u64>,
}

impl fmt::Debug for LivePanel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LivePanel")
            .field("target", &self.target)
            .field("max_iterations", &self.max_iterations)
            .finish_non_exhaustive()
    }
}

impl LivePanel {
    pub fn new(
        dashboard: Dashboard,
        session: Arc<DashboardSession>,
        target: PanelTarget,
        updates: mpsc::Sender<PanelUpdate>,
    ) -> Self {
        Self {
            dashboard,
            session,
            target,
            updates,
            max_iterations: None,
        }
    }

    /// Stop after `n` polls instead of running until shutdown.
    pub fn with_max_iterations(mut self, n: u64) -> Self {
        self.max_iterations = Some(n);
        self
    }

    /// Main loop.
    ///
    /// A change to the panel's interval (start, stop, set interval) wakes the
    /// loop early and triggers an immediate poll.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let panel = self.target.panel();
        let scheduler = self.session.panel(panel);
        info!(%panel, "live panel started");

        let mut sequence = 0u64;
        loop {
            if *shutdown.borrow() {
                break;
            }

            let changed = scheduler.changed();
            tokio::pin!(changed);

            let outcome = self.poll().await;
            sequence += 1;
            if let Err(err) = &outcome {
                warn!(%panel, sequence, err = %err, "panel refresh failed");
            }

            let update = PanelUpdate {
                panel,
                sequence,
                outcome,
            };
            if self.updates.send(update).await.is_err() {
                debug!(%panel, "update receiver dropped");
                break;
            }

            if self.max_iterations.is_some_and(|max| sequence >= max) {
                break;
            }

            let wait = Duration::from_secs(scheduler.interval_seconds());
            tokio::select! {
                _ = tokio::time::sleep(wait) => {}
                _ = &mut changed => {
                    debug!(
                        %panel,
                        interval = scheduler.interval_seconds(),
                        "sync interval changed"
                    );
                }
                res = shutdown.changed() => {
                    if res.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!(%panel, polls = sequence, "live panel stopped");
    }

    async fn poll(&self) -> Result<PanelContent> {
        match self.target {
            PanelTarget::Stats => self.dashboard.get_stats().await.map(PanelContent::Stats),
            PanelTarget::RunList => self
                .dashboard
                .list_recent_runs(self.session.recent_runs())
                .await
                .map(PanelContent::RunList),
            PanelTarget::RunDetail(run_id) => self
                .dashboard
                .get_run_detail(run_id)
                .await
                .map(|d| PanelContent::RunDetail(Box::new(d))),
        }
    }
}
