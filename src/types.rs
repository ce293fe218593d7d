// src/types.rs

use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Point in time as reported by the scheduler, keeping its original offset.
pub type Timestamp = DateTime<FixedOffset>;

/// Status of a single task attempt, as reported by the scheduler.
///
/// The scheduler sends these as upper-case strings (`"SUCCESS"`,
/// `"NO_STATUS"`, ...) and the dashboard passes them on unchanged. Any
/// value not listed here decodes as `Unknown` instead of failing the whole
/// response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Scheduled,
    Queued,
    Ready,
    Running,
    Success,
    Failed,
    UpstreamFailed,
    Skipped,
    #[default]
    NoStatus,
    #[serde(other)]
    Unknown,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Scheduled => "SCHEDULED",
            TaskStatus::Queued => "QUEUED",
            TaskStatus::Ready => "READY",
            TaskStatus::Running => "RUNNING",
            TaskStatus::Success => "SUCCESS",
            TaskStatus::Failed => "FAILED",
            TaskStatus::UpstreamFailed => "UPSTREAM_FAILED",
            TaskStatus::Skipped => "SKIPPED",
            TaskStatus::NoStatus => "NO_STATUS",
            TaskStatus::Unknown => "UNKNOWN",
        }
    }

    /// Whether the attempt has been picked up for execution.
    ///
    /// Waiting states and tasks that were never run (skipped or blocked by
    /// an upstream failure) have not started. Unrecognised statuses count as
    /// started.
    pub fn has_started(self) -> bool {
        !matches!(
            self,
            TaskStatus::NoStatus
                | TaskStatus::Scheduled
                | TaskStatus::Queued
                | TaskStatus::Ready
                | TaskStatus::UpstreamFailed
                | TaskStatus::Skipped
        )
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of a whole DAG run. Unlisted values decode as `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    Scheduled,
    ReadyToSchedule,
    Running,
    Success,
    Failed,
    #[serde(other)]
    Unknown,
}

impl RunStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RunStatus::Scheduled => "SCHEDULED",
            RunStatus::ReadyToSchedule => "READY_TO_SCHEDULE",
            RunStatus::Running => "RUNNING",
            RunStatus::Success => "SUCCESS",
            RunStatus::Failed => "FAILED",
            RunStatus::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity of a task log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
    #[serde(other)]
    Unknown,
}

/// Operational state of the scheduler process itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SchedulerState {
    Started,
    Running,
    Synchronizing,
    Stopping,
    Stopped,
}
