#![allow(dead_code)]

use chrono::{DateTime, Duration};
use dagboard::types::{LogLevel, RunStatus, TaskStatus, Timestamp};
use dagboard::upstream::{
    UpstreamLogRecord, UpstreamRunDetails, UpstreamRunRow, UpstreamRunTask, UpstreamStats,
    UpstreamStatusCounts, UpstreamTaskDetails, UpstreamTaskLogs, UpstreamTaskPos,
};

/// Fixed timestamp all builders count from.
pub fn base_time() -> Timestamp {
    DateTime::parse_from_rfc3339("2024-03-01T12:00:00+00:00").expect("valid RFC 3339 timestamp")
}

pub fn at_seconds(offset: i64) -> Timestamp {
    base_time() + Duration::seconds(offset)
}

/// `n` INFO log records, one second apart, with messages `"line 0"`,
/// `"line 1"` and so on.
pub fn log_records(n: usize) -> Vec<UpstreamLogRecord> {
    (0..n)
        .map(|i| UpstreamLogRecord {
            insert_ts: at_seconds(i as i64),
            level: LogLevel::Info,
            message: format!("line {i}"),
            attributes_json: format!("{{\"line\":{i}}}"),
        })
        .collect()
}

pub fn task_logs(total: usize, loaded: usize) -> UpstreamTaskLogs {
    UpstreamTaskLogs {
        log_records_count: total,
        loaded_records: loaded,
        records: log_records(loaded),
    }
}

/// Builder for one task record of a run-details response.
///
/// Defaults to a started, successful task at `(1, 1)` with no logs.
pub struct UpstreamTaskBuilder {
    task: UpstreamRunTask,
}

impl UpstreamTaskBuilder {
    pub fn new(task_id: &str) -> Self {
        Self {
            task: UpstreamRunTask {
                task_id: task_id.to_string(),
                retry: 0,
                insert_ts: base_time(),
                task_no_started: false,
                status: TaskStatus::Success,
                pos: UpstreamTaskPos { depth: 1, width: 1 },
                duration: "1.5s".to_string(),
                config: "{}".to_string(),
                task_logs: UpstreamTaskLogs::default(),
            },
        }
    }

    pub fn at(mut self, depth: u32, width: u32) -> Self {
        self.task.pos = UpstreamTaskPos { depth, width };
        self
    }

    pub fn retry(mut self, retry: u32) -> Self {
        self.task.retry = retry;
        self
    }

    pub fn status(mut self, status: TaskStatus) -> Self {
        self.task.status = status;
        self
    }

    pub fn duration(mut self, duration: &str) -> Self {
        self.task.duration = duration.to_string();
        self
    }

    /// Mark as not started. Keeps whatever logs and duration were set, so
    /// tests can check they are discarded.
    pub fn not_started(mut self) -> Self {
        self.task.task_no_started = true;
        self.task.status = TaskStatus::NoStatus;
        self
    }

    pub fn logs(mut self, total: usize, loaded: usize) -> Self {
        self.task.task_logs = task_logs(total, loaded);
        self
    }

    pub fn build(self) -> UpstreamRunTask {
        self.task
    }
}

/// Builder for a whole run-details response.
pub struct RunDetailsBuilder {
    details: UpstreamRunDetails,
}

impl RunDetailsBuilder {
    pub fn new(run_id: i64) -> Self {
        Self {
            details: UpstreamRunDetails {
                run_id,
                dag_id: "sample_dag".to_string(),
                exec_ts: base_time(),
                exec_ts_raw: "2024-03-01T12:00:00+00:00".to_string(),
                status: RunStatus::Running,
                duration: "12s".to_string(),
                tasks: Vec::new(),
            },
        }
    }

    pub fn dag_id(mut self, dag_id: &str) -> Self {
        self.details.dag_id = dag_id.to_string();
        self
    }

    pub fn status(mut self, status: RunStatus) -> Self {
        self.details.status = status;
        self
    }

    pub fn task(mut self, task: UpstreamRunTask) -> Self {
        self.details.tasks.push(task);
        self
    }

    pub fn build(self) -> UpstreamRunDetails {
        self.details
    }
}

pub fn task_details(task_id: &str, retry: u32, total: usize, loaded: usize) -> UpstreamTaskDetails {
    UpstreamTaskDetails {
        task_id: task_id.to_string(),
        retry,
        insert_ts: base_time(),
        status: TaskStatus::Running,
        duration: "3s".to_string(),
        config: "{\"timeout\":30}".to_string(),
        task_logs: task_logs(total, loaded),
    }
}

pub fn run_row(run_id: i64, dag_id: &str) -> UpstreamRunRow {
    UpstreamRunRow {
        run_id,
        dag_id: dag_id.to_string(),
        exec_ts: at_seconds(run_id * 60),
        insert_ts: at_seconds(run_id * 60 + 1),
        status: RunStatus::Success,
        status_update_ts: at_seconds(run_id * 60 + 30),
        duration: "29s".to_string(),
        task_num: 4,
        task_completed_num: 4,
    }
}

pub fn stats(run_success: u64, task_success: u64) -> UpstreamStats {
    UpstreamStats {
        dagruns: UpstreamStatusCounts {
            success: run_success,
            failed: 1,
            scheduled: 2,
            running: 3,
        },
        dagrun_tasks: UpstreamStatusCounts {
            success: task_success,
            failed: 4,
            scheduled: 5,
            running: 6,
        },
        dagrun_queue_len: 7,
        task_scheduler_queue_len: 8,
        goroutines_num: 9,
    }
}
