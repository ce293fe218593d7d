// src/dashboard/mod.rs

//! Read operations the presentation layer calls.
//!
//! [`Dashboard`] composes the scheduler query interface with layout, stats
//! aggregation and log windows. It holds no per-request state and caches
//! nothing; every call recomputes from the response it just received.
//!
//! Each operation has a typed form and a `_raw` form taking identifiers as
//! text. The raw forms validate through [`args`] and fail before any
//! scheduler call when an argument is malformed.

use std::sync::Arc;

use tracing::{debug, error};

use crate::dag::{RunDetail, RunSummaryRow, RunTask, layout_run_tasks};
use crate::errors::{DashboardError, Result};
use crate::logs::{LogWindow, WindowBounds, load_task_window};
use crate::stats::DashboardStats;
use crate::types::SchedulerState;
use crate::upstream::SchedulerApi;

pub mod args;

pub use args::{TaskLocator, TaskRef};

/// Settings the facade needs from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardSettings {
    pub max_indent: u32,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            max_indent: crate::dag::DEFAULT_MAX_INDENT,
        }
    }
}

#[derive(Clone)]
pub struct Dashboard {
    api: Arc<dyn SchedulerApi>,
    settings: DashboardSettings,
}

impl std::fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl Dashboard {
    pub fn new(api: Arc<dyn SchedulerApi>, settings: DashboardSettings) -> Self {
        Self { api, settings }
    }

    pub fn settings(&self) -> DashboardSettings {
        self.settings
    }

    /// The `n` most recent runs in the order the scheduler returned them.
    pub async fn list_recent_runs(&self, n: usize) -> Result<Vec<RunSummaryRow>> {
        let rows = self
            .api
            .dagrun_latest(n)
            .await
            .map_err(|e| upstream_failure(format!("latest DAG runs (n = {n})"), e))?;
        debug!(requested = n, received = rows.len(), "listed recent DAG runs");
        Ok(rows.into_iter().map(RunSummaryRow::from).collect())
    }

    pub async fn list_recent_runs_raw(&self, n: &str) -> Result<Vec<RunSummaryRow>> {
        let n = args::parse_run_count(n)?;
        self.list_recent_runs(n).await
    }

    pub async fn get_stats(&self) -> Result<DashboardStats> {
        let stats = self
            .api
            .dagrun_stats()
            .await
            .map_err(|e| upstream_failure("DAG run stats".to_string(), e))?;
        Ok(stats.into())
    }

    /// One run with its tasks in display order.
    pub async fn get_run_detail(&self, run_id: i64) -> Result<RunDetail> {
        let details = self
            .api
            .dagrun_details(run_id)
            .await
            .map_err(|e| upstream_failure(format!("DAG run details (run {run_id})"), e))?;
        debug!(
            run_id,
            status = %details.status,
            tasks = details.tasks.len(),
            "fetched DAG run details"
        );

        let tasks = layout_run_tasks(details.run_id, details.tasks, self.settings.max_indent);
        Ok(RunDetail {
            run_id: details.run_id,
            dag_id: details.dag_id,
            exec_timestamp: details.exec_ts,
            exec_timestamp_raw: details.exec_ts_raw,
            status: details.status,
            duration: details.duration,
            tasks,
        })
    }

    pub async fn get_run_detail_raw(&self, run_id: &str) -> Result<RunDetail> {
        let run_id = args::parse_run_id(run_id)?;
        self.get_run_detail(run_id).await
    }

    /// A single task attempt with freshly loaded logs, rendered with its
    /// log panel open.
    pub async fn get_task_detail(
        &self,
        locator: &TaskLocator,
        bounds: WindowBounds,
    ) -> Result<RunTask> {
        let task = &locator.task;
        let snapshot = load_task_window(self.api.as_ref(), task, bounds).await?;
        // The single-task response carries no started flag; it follows the
        // status the attempt is in now.
        let started = snapshot.status.has_started();

        Ok(RunTask {
            run_id: task.run_id,
            task_id: task.task_id.clone(),
            retry: task.retry,
            position: locator.position.reindented(self.settings.max_indent),
            status: snapshot.status,
            started,
            inserted_at: snapshot.inserted_at,
            duration: if started {
                snapshot.duration
            } else {
                String::new()
            },
            config_snapshot: snapshot.config_snapshot,
            logs: if started {
                snapshot.logs
            } else {
                LogWindow::empty()
            },
            logs_window_open: true,
        })
    }

    pub async fn get_task_detail_raw(
        &self,
        run_id: &str,
        task_id: &str,
        retry: &str,
        position: &str,
        bounds: WindowBounds,
    ) -> Result<RunTask> {
        let locator = TaskLocator::parse(run_id, task_id, retry, position)?;
        self.get_task_detail(&locator, bounds).await
    }

    pub async fn scheduler_state(&self) -> Result<SchedulerState> {
        self.api
            .get_state()
            .await
            .map_err(|e| upstream_failure("scheduler state".to_string(), e))
    }
}

fn upstream_failure(operation: String, err: anyhow::Error) -> DashboardError {
    error!(operation = %operation, err = %err, "scheduler query failed");
    DashboardError::upstream(operation, err)
}
