// src/stats.rs

//! Summary statistics for the dashboard tiles.
//!
//! Pure structural assembly: the scheduler already counts, this module only
//! gives the dashboard a contract that does not follow the scheduler's field
//! layout.

use serde::Serialize;

use crate::upstream::{UpstreamStats, UpstreamStatusCounts};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub success: u64,
    pub failed: u64,
    pub scheduled: u64,
    pub running: u64,
}

impl StatusCounts {
    pub fn total(&self) -> u64 {
        self.success + self.failed + self.scheduled + self.running
    }
}

impl From<UpstreamStatusCounts> for StatusCounts {
    fn from(c: UpstreamStatusCounts) -> Self {
        Self {
            success: c.success,
            failed: c.failed,
            scheduled: c.scheduled,
            running: c.running,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub run_counts: StatusCounts,
    pub task_counts: StatusCounts,
    pub pending_run_queue_length: u64,
    pub pending_task_queue_length: u64,
    pub worker_count: u64,
}

/// Assemble dashboard stats from already-counted pieces.
pub fn aggregate_stats(
    run_counts: StatusCounts,
    task_counts: StatusCounts,
    pending_run_queue_length: u64,
    pending_task_queue_length: u64,
    worker_count: u64,
) -> DashboardStats {
    DashboardStats {
        run_counts,
        task_counts,
        pending_run_queue_length,
        pending_task_queue_length,
        worker_count,
    }
}

impl From<UpstreamStats> for DashboardStats {
    fn from(s: UpstreamStats) -> Self {
        aggregate_stats(
            s.dagruns.into(),
            s.dagrun_tasks.into(),
            s.dagrun_queue_len,
            s.task_scheduler_queue_len,
            s.goroutines_num,
        )
    }
}
