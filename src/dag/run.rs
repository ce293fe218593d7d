// src/dag/run.rs

//! Display-ready shapes of DAG runs and their tasks.
//!
//! These are what the presentation layer receives. They are built per
//! request from a scheduler response and are never cached.

use serde::Serialize;

use crate::dag::position::TaskPosition;
use crate::logs::LogWindow;
use crate::types::{RunStatus, TaskStatus, Timestamp};
use crate::upstream::UpstreamRunRow;

/// One attempt (`retry`) of one task within a DAG run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunTask {
    pub run_id: i64,
    pub task_id: String,
    pub retry: u32,
    pub position: TaskPosition,
    pub status: TaskStatus,
    pub started: bool,
    pub inserted_at: Timestamp,
    /// Formatted duration, empty when the task has not started.
    pub duration: String,
    pub config_snapshot: String,
    pub logs: LogWindow,
    /// Whether the log panel of this task is expanded.
    pub logs_window_open: bool,
}

/// A DAG run with its tasks in display order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunDetail {
    pub run_id: i64,
    pub dag_id: String,
    pub exec_timestamp: Timestamp,
    /// Execution timestamp exactly as the scheduler formatted it.
    pub exec_timestamp_raw: String,
    pub status: RunStatus,
    pub duration: String,
    pub tasks: Vec<RunTask>,
}

/// A row of the recent runs list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummaryRow {
    pub run_id: i64,
    pub dag_id: String,
    pub exec_timestamp: Timestamp,
    pub inserted_at: Timestamp,
    pub status: RunStatus,
    pub status_update_timestamp: Timestamp,
    pub duration: String,
    pub task_count: u64,
    pub task_completed_count: u64,
}

impl From<UpstreamRunRow> for RunSummaryRow {
    fn from(row: UpstreamRunRow) -> Self {
        Self {
            run_id: row.run_id,
            dag_id: row.dag_id,
            exec_timestamp: row.exec_ts,
            inserted_at: row.insert_ts,
            status: row.status,
            status_update_timestamp: row.status_update_ts,
            duration: row.duration,
            task_count: row.task_num,
            task_completed_count: row.task_completed_num,
        }
    }
}
