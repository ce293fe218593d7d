// src/logs/loader.rs

//! Log window loading.
//!
//! Two entry points:
//! - [`default_window`] passes through the small window the scheduler already
//!   attached to a task in a run-details response.
//! - [`load_task_window`] fetches one task's current details and logs on
//!   demand, so a single task panel can be refreshed without reloading the
//!   whole run.

use serde::Serialize;
use tracing::{debug, error};

use crate::dashboard::args::TaskRef;
use crate::errors::{DashboardError, Result};
use crate::logs::window::{LogRecord, LogWindow};
use crate::types::{TaskStatus, Timestamp};
use crate::upstream::{SchedulerApi, UpstreamLogRecord, UpstreamTaskLogs};

/// Which slice of a task's fetched log records to keep.
///
/// `offset` counts from the oldest record; `limit = None` keeps everything
/// from `offset` on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WindowBounds {
    pub offset: usize,
    pub limit: Option<usize>,
}

impl WindowBounds {
    /// The whole log as fetched.
    pub fn full() -> Self {
        Self::default()
    }

    pub fn new(offset: usize, limit: Option<usize>) -> Self {
        Self { offset, limit }
    }
}

/// Fresh view of one task attempt as of a single scheduler query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskLogSnapshot {
    pub inserted_at: Timestamp,
    pub status: TaskStatus,
    pub duration: String,
    pub config_snapshot: String,
    pub logs: LogWindow,
}

/// Window already attached to a task by the scheduler.
pub fn default_window(logs: UpstreamTaskLogs) -> LogWindow {
    if logs.loaded_records != logs.records.len() {
        debug!(
            reported = logs.loaded_records,
            actual = logs.records.len(),
            "scheduler reported a loaded count that differs from the records sent"
        );
    }
    let records = logs.records.into_iter().map(to_log_record).collect();
    LogWindow::new(logs.log_records_count, records)
}

/// Fetch the current state and logs of one task attempt and cut the
/// requested window out of them.
///
/// The reference must already be parsed; see
/// [`TaskRef::parse`](crate::dashboard::args::TaskRef::parse).
pub async fn load_task_window(
    api: &dyn SchedulerApi,
    task: &TaskRef,
    bounds: WindowBounds,
) -> Result<TaskLogSnapshot> {
    let details = api
        .dagrun_task_details(task.run_id, &task.task_id, task.retry)
        .await
        .map_err(|e| {
            error!(
                run_id = task.run_id,
                task = %task.task_id,
                retry = task.retry,
                err = %e,
                "cannot get DAG run task details"
            );
            DashboardError::upstream(
                format!(
                    "task details (run {}, task {}, retry {})",
                    task.run_id, task.task_id, task.retry
                ),
                e,
            )
        })?;

    Ok(TaskLogSnapshot {
        inserted_at: details.insert_ts,
        status: details.status,
        duration: details.duration,
        config_snapshot: details.config,
        logs: window_within(details.task_logs, bounds),
    })
}

/// [`load_task_window`] for identifiers in their wire form. A malformed
/// identifier fails with `InvalidTaskReference` and the scheduler is never
/// called.
pub async fn load_task_window_raw(
    api: &dyn SchedulerApi,
    run_id: &str,
    task_id: &str,
    retry: &str,
    bounds: WindowBounds,
) -> Result<TaskLogSnapshot> {
    let task = TaskRef::parse(run_id, task_id, retry)?;
    load_task_window(api, &task, bounds).await
}

/// Cut `bounds` out of the fetched records. The total stays the scheduler's
/// total so the caller can tell whether more is available.
fn window_within(logs: UpstreamTaskLogs, bounds: WindowBounds) -> LogWindow {
    let total = logs.log_records_count.max(logs.records.len());
    let take = bounds.limit.unwrap_or(usize::MAX);
    let records = logs
        .records
        .into_iter()
        .skip(bounds.offset)
        .take(take)
        .map(to_log_record)
        .collect();
    LogWindow::new(total, records)
}

fn to_log_record(record: UpstreamLogRecord) -> LogRecord {
    LogRecord {
        inserted_at: record.insert_ts,
        level: record.level,
        message: record.message,
        attributes: record.attributes_json,
    }
}
