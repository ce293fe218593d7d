// src/logs/window.rs

//! Bounded, paginated view over a task's log records.

use serde::Serialize;

use crate::types::{LogLevel, Timestamp};

/// A single task log record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRecord {
    pub inserted_at: Timestamp,
    pub level: LogLevel,
    pub message: String,
    /// Structured attributes, kept as the JSON text the scheduler sent.
    pub attributes: String,
}

/// A window of log records for one task attempt.
///
/// `loaded_records` always equals `records.len()` and never exceeds
/// `total_records`. Fields are private so the only way to build a window is
/// through [`LogWindow::new`] or [`LogWindow::empty`].
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogWindow {
    total_records: usize,
    loaded_records: usize,
    records: Vec<LogRecord>,
}

impl LogWindow {
    /// Window over `records` out of `total_records` known to exist.
    ///
    /// If the scheduler under-reports the total, the total is raised to the
    /// number of records actually received.
    pub fn new(total_records: usize, records: Vec<LogRecord>) -> Self {
        let loaded_records = records.len();
        Self {
            total_records: total_records.max(loaded_records),
            loaded_records,
            records,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn total_records(&self) -> usize {
        self.total_records
    }

    pub fn loaded_records(&self) -> usize {
        self.loaded_records
    }

    pub fn records(&self) -> &[LogRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether more records exist upstream than are loaded here.
    pub fn has_more(&self) -> bool {
        self.loaded_records < self.total_records
    }
}
