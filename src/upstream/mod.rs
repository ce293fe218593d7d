// src/upstream/mod.rs

//! Access to the external scheduler's query interface.
//!
//! The dashboard core never talks to the scheduler directly. It goes through
//! the [`SchedulerApi`] capability, which has two implementations selected
//! when the application is wired together:
//!
//! - [`client::HttpSchedulerClient`] talks to a running scheduler over HTTP.
//! - [`mock::MockScheduler`] generates syntactically valid data from a seed,
//!   for offline use and tests.
//!
//! - [`wire`] holds the scheduler-side data shapes.

use std::future::Future;
use std::pin::Pin;

use crate::types::{SchedulerState, TaskStatus};

pub mod client;
pub mod mock;
pub mod wire;

pub use client::HttpSchedulerClient;
pub use mock::MockScheduler;
pub use wire::{
    TaskStatusUpdate, TaskToExec, UpstreamLogRecord, UpstreamRunDetails, UpstreamRunRow,
    UpstreamRunTask, UpstreamStats, UpstreamStatusCounts, UpstreamTaskDetails, UpstreamTaskLogs,
    UpstreamTaskPos,
};

/// Boxed future returned by every [`SchedulerApi`] call.
pub type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = anyhow::Result<T>> + Send + 'a>>;

/// The scheduler's query interface, as the dashboard consumes it.
///
/// Each call is a single request/response. Timeouts and retries, if any,
/// belong to the implementation's transport, not to callers.
pub trait SchedulerApi: Send + Sync {
    /// Pop the next task waiting for execution, if there is one.
    fn get_task(&self) -> ApiFuture<'_, Option<TaskToExec>>;

    /// Report the status of an executed task.
    fn upsert_task_status(
        &self,
        task: TaskToExec,
        status: TaskStatus,
        task_err: Option<String>,
    ) -> ApiFuture<'_, ()>;

    fn get_state(&self) -> ApiFuture<'_, SchedulerState>;

    /// Counts of runs and tasks by status, plus queue lengths.
    fn dagrun_stats(&self) -> ApiFuture<'_, UpstreamStats>;

    /// The `n` most recent DAG runs, most recent first.
    fn dagrun_latest(&self, n: usize) -> ApiFuture<'_, Vec<UpstreamRunRow>>;

    fn dagrun_details(&self, run_id: i64) -> ApiFuture<'_, UpstreamRunDetails>;

    /// Current details and logs of one task attempt within a run.
    fn dagrun_task_details<'a>(
        &'a self,
        run_id: i64,
        task_id: &'a str,
        retry: u32,
    ) -> ApiFuture<'a, UpstreamTaskDetails>;
}
