// src/dashboard/args.rs

//! Boundary parsing of the identifiers the presentation layer sends.
//!
//! Everything arrives as text (path segments, CLI arguments). Each parser
//! names the argument it rejects so the caller can show which one was wrong.
//! Nothing in here talks to the scheduler.

use tracing::warn;

use crate::dag::TaskPosition;
use crate::errors::{DashboardError, Result};

/// Run ids are taken verbatim; surrounding whitespace is an error.
pub fn parse_run_id(raw: &str) -> Result<i64> {
    if raw.is_empty() {
        return Err(rejected(DashboardError::invalid_argument(
            "runId",
            raw,
            "run id is empty",
        )));
    }
    raw.parse::<i64>().map_err(|e| {
        rejected(DashboardError::invalid_argument(
            "runId",
            raw,
            format!("cannot cast into integer: {e}"),
        ))
    })
}

/// Task ids are opaque; the only requirement is that they are not blank.
pub fn parse_task_id(raw: &str) -> Result<String> {
    if raw.trim().is_empty() {
        return Err(rejected(DashboardError::invalid_argument(
            "taskId",
            raw,
            "task id is empty",
        )));
    }
    Ok(raw.to_string())
}

pub fn parse_retry(raw: &str) -> Result<u32> {
    if raw.is_empty() {
        return Err(rejected(DashboardError::invalid_argument(
            "retry",
            raw,
            "retry is empty",
        )));
    }
    raw.parse::<u32>().map_err(|e| {
        rejected(DashboardError::invalid_argument(
            "retry",
            raw,
            format!("expected a non-negative integer: {e}"),
        ))
    })
}

/// Number of recent runs to list; must be a positive integer.
pub fn parse_run_count(raw: &str) -> Result<usize> {
    match raw.parse::<usize>() {
        Ok(0) => Err(rejected(DashboardError::invalid_argument(
            "num",
            raw,
            "number of recent runs must be positive",
        ))),
        Ok(n) => Ok(n),
        Err(e) => Err(rejected(DashboardError::invalid_argument(
            "num",
            raw,
            format!("cannot cast into integer: {e}"),
        ))),
    }
}

pub fn parse_position(raw: &str) -> Result<TaskPosition> {
    TaskPosition::decode(raw).map_err(rejected)
}

fn rejected(err: DashboardError) -> DashboardError {
    warn!(
        field = err.invalid_field().unwrap_or("unknown"),
        err = %err,
        "rejected argument"
    );
    err
}

/// Identity of one task attempt within a DAG run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaskRef {
    pub run_id: i64,
    pub task_id: String,
    pub retry: u32,
}

impl TaskRef {
    pub fn new(run_id: i64, task_id: impl Into<String>, retry: u32) -> Self {
        Self {
            run_id,
            task_id: task_id.into(),
            retry,
        }
    }

    /// Parse all three identifiers. Any failure is reported as
    /// [`DashboardError::InvalidTaskReference`] wrapping the argument error.
    pub fn parse(run_id: &str, task_id: &str, retry: &str) -> Result<Self> {
        let wrap = |e| DashboardError::InvalidTaskReference(Box::new(e));
        Ok(Self {
            run_id: parse_run_id(run_id).map_err(wrap)?,
            task_id: parse_task_id(task_id).map_err(wrap)?,
            retry: parse_retry(retry).map_err(wrap)?,
        })
    }
}

/// A task attempt plus the position it is rendered at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskLocator {
    pub task: TaskRef,
    pub position: TaskPosition,
}

impl TaskLocator {
    /// Locator with a zero position, for callers that only know the
    /// identifiers.
    pub fn new(task: TaskRef) -> Self {
        Self {
            task,
            position: TaskPosition::default(),
        }
    }

    pub fn at(mut self, position: TaskPosition) -> Self {
        self.position = position;
        self
    }

    pub fn parse(run_id: &str, task_id: &str, retry: &str, position: &str) -> Result<Self> {
        let task = TaskRef::parse(run_id, task_id, retry)?;
        let position = parse_position(position)
            .map_err(|e| DashboardError::InvalidTaskReference(Box::new(e)))?;
        Ok(Self { task, position })
    }
}
