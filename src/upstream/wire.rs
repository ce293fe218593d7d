// src/upstream/wire.rs

//! Data shapes exchanged with the scheduler's query interface.
//!
//! These mirror the scheduler's own field layout (PascalCase JSON keys) and are
//! deliberately kept apart from the display types in [`crate::dag::run`], so a
//! change on the scheduler side only touches the conversion code.

use serde::{Deserialize, Serialize};

use crate::types::{LogLevel, RunStatus, TaskStatus, Timestamp};

/// A task the scheduler hands out for execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TaskToExec {
    pub dag_id: String,
    pub exec_ts: String,
    pub task_id: String,
    pub retry: u32,
}

/// Body of a task status report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TaskStatusUpdate {
    pub dag_id: String,
    pub exec_ts: String,
    pub task_id: String,
    pub retry: u32,
    pub status: TaskStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_err_str: Option<String>,
}

impl TaskStatusUpdate {
    pub fn new(task: TaskToExec, status: TaskStatus, task_err: Option<String>) -> Self {
        Self {
            dag_id: task.dag_id,
            exec_ts: task.exec_ts,
            task_id: task.task_id,
            retry: task.retry,
            status,
            task_err_str: task_err,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpstreamStatusCounts {
    pub success: u64,
    pub failed: u64,
    pub scheduled: u64,
    pub running: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpstreamStats {
    pub dagruns: UpstreamStatusCounts,
    pub dagrun_tasks: UpstreamStatusCounts,
    pub dagrun_queue_len: u64,
    pub task_scheduler_queue_len: u64,
    pub goroutines_num: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpstreamRunRow {
    pub run_id: i64,
    pub dag_id: String,
    pub exec_ts: Timestamp,
    pub insert_ts: Timestamp,
    pub status: RunStatus,
    pub status_update_ts: Timestamp,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub task_num: u64,
    #[serde(default)]
    pub task_completed_num: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpstreamRunDetails {
    pub run_id: i64,
    pub dag_id: String,
    pub exec_ts: Timestamp,
    #[serde(default)]
    pub exec_ts_raw: String,
    pub status: RunStatus,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub tasks: Vec<UpstreamRunTask>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpstreamTaskPos {
    pub depth: u32,
    pub width: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpstreamRunTask {
    pub task_id: String,
    pub retry: u32,
    pub insert_ts: Timestamp,
    #[serde(default)]
    pub task_no_started: bool,
    #[serde(default)]
    pub status: TaskStatus,
    pub pos: UpstreamTaskPos,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub config: String,
    #[serde(default)]
    pub task_logs: UpstreamTaskLogs,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpstreamTaskLogs {
    pub log_records_count: usize,
    pub loaded_records: usize,
    #[serde(default)]
    pub records: Vec<UpstreamLogRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpstreamLogRecord {
    pub insert_ts: Timestamp,
    pub level: LogLevel,
    pub message: String,
    #[serde(default)]
    pub attributes_json: String,
}

/// Current state of one task attempt, fetched on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpstreamTaskDetails {
    pub task_id: String,
    pub retry: u32,
    pub insert_ts: Timestamp,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub config: String,
    #[serde(default)]
    pub task_logs: UpstreamTaskLogs,
}
