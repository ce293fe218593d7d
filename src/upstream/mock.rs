// src/upstream/mock.rs

//! Deterministic stand-in for the scheduler.
//!
//! Every response is derived from a seed (and from the call's arguments), so
//! the same `MockScheduler` answers `dagrun_details(7)` identically every
//! time. Stats and the recent-runs list also mix in a tick counter so that a
//! live dashboard sees them move.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use anyhow::anyhow;
use chrono::{FixedOffset, Offset, TimeDelta, Utc};
use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;
use tracing::debug;

use super::wire::{
    TaskToExec, UpstreamLogRecord, UpstreamRunDetails, UpstreamRunRow, UpstreamRunTask,
    UpstreamStats, UpstreamStatusCounts, UpstreamTaskDetails, UpstreamTaskLogs, UpstreamTaskPos,
};
use super::{ApiFuture, SchedulerApi};
use crate::types::{LogLevel, RunStatus, SchedulerState, TaskStatus, Timestamp};

const LIST_DAG_IDS: [&str; 3] = ["sample_dag", "mock_dag", "sample_mock_longer_name_dag"];
const DETAIL_DAG_IDS: [&str; 4] = [
    "sample_dag",
    "sample_mock_longer_name_dag",
    "linked_list",
    "complex_dag",
];

/// Edges of the `complex_dag` shape, upstream -> downstream.
const COMPLEX_DAG_EDGES: [(&str, &str); 9] = [
    ("extract", "clean"),
    ("extract", "validate"),
    ("clean", "join"),
    ("validate", "join"),
    ("extract", "enrich"),
    ("enrich", "join"),
    ("join", "aggregate"),
    ("aggregate", "report"),
    ("validate", "report"),
];

const CHARSET: &[u8] =
    b"                 abcdefghijklmnopqrstuvw       xyzABCDEFGH       IJKLMNOPQR  STUVWXYZ0123456789";

/// SplitMix64 stream; small, fast and stable across platforms.
#[derive(Debug, Clone)]
struct SeededRng {
    state: u64,
}

impl SeededRng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform-ish value in `0..n` (0 when `n == 0`).
    fn below(&mut self, n: u64) -> u64 {
        if n == 0 { 0 } else { self.next_u64() % n }
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.below(items.len() as u64) as usize]
    }
}

/// Scheduler mock producing syntactically valid runs, tasks, stats and logs.
#[derive(Debug)]
pub struct MockScheduler {
    seed: u64,
    base_time: Timestamp,
    tick: AtomicU64,
}

impl MockScheduler {
    /// Mock anchored at the current time.
    pub fn new(seed: u64) -> Self {
        Self::with_base_time(seed, Utc::now().fixed_offset())
    }

    /// Mock anchored at a fixed time, fully reproducible.
    pub fn with_base_time(seed: u64, base_time: Timestamp) -> Self {
        Self {
            seed,
            base_time,
            tick: AtomicU64::new(0),
        }
    }

    fn rng_for(&self, key: u64) -> SeededRng {
        SeededRng::new(self.seed ^ key.wrapping_mul(0xD6E8_FEB8_6659_FD93))
    }

    fn next_tick(&self) -> u64 {
        self.tick.fetch_add(1, Ordering::Relaxed)
    }

    fn stats(&self) -> UpstreamStats {
        let mut rng = self.rng_for(0x5747_0000 + self.next_tick());
        UpstreamStats {
            dagruns: random_status_counts(&mut rng, 250),
            dagrun_tasks: random_status_counts(&mut rng, 1000),
            dagrun_queue_len: rng.below(50),
            task_scheduler_queue_len: rng.below(200),
            goroutines_num: rng.below(1000) + 5,
        }
    }

    fn latest(&self, n: usize) -> Vec<UpstreamRunRow> {
        let mut rng = self.rng_for(0x4C41_0000 + self.next_tick());
        let top = n as i64 + 10 + rng.below(1000) as i64;

        (0..n)
            .map(|i| {
                let dag_id = rng.pick(&LIST_DAG_IDS);
                let exec_ts = self.base_time - TimeDelta::minutes(i as i64);
                self.random_run_row(&mut rng, top - i as i64, dag_id, exec_ts)
            })
            .collect()
    }

    fn random_run_row(
        &self,
        rng: &mut SeededRng,
        run_id: i64,
        dag_id: &str,
        exec_ts: Timestamp,
    ) -> UpstreamRunRow {
        let exec_ts = exec_ts.with_timezone(&random_offset(rng));
        let task_num = rng.below(100);
        UpstreamRunRow {
            run_id,
            dag_id: dag_id.to_string(),
            exec_ts,
            insert_ts: exec_ts + TimeDelta::milliseconds(3),
            status: random_run_status(rng),
            status_update_ts: exec_ts + TimeDelta::seconds(3),
            duration: random_duration(rng, 1000),
            task_num,
            task_completed_num: task_num - rng.below(task_num + 1),
        }
    }

    fn details(&self, run_id: i64) -> UpstreamRunDetails {
        let mut rng = self.rng_for(run_id as u64);
        let dag_id = rng.pick(&DETAIL_DAG_IDS);
        let tasks = match dag_id {
            "sample_dag" => self.sample_dag_tasks(&mut rng),
            "linked_list" => {
                let length = rng.below(10) + 3;
                let done = rng.below(length + 1);
                self.linked_list_tasks(&mut rng, length as u32, done as u32)
            }
            "complex_dag" => self.complex_dag_tasks(&mut rng),
            _ => Vec::new(),
        };

        debug!(run_id, dag_id, tasks = tasks.len(), "mock: generated DAG run");

        UpstreamRunDetails {
            run_id,
            dag_id: dag_id.to_string(),
            exec_ts: self.base_time,
            exec_ts_raw: self.base_time.to_rfc3339(),
            status: random_run_status(&mut rng),
            duration: random_duration(&mut rng, 1000),
            tasks,
        }
    }

    fn started_task(
        &self,
        rng: &mut SeededRng,
        task_id: String,
        retry: u32,
        pos: UpstreamTaskPos,
        max_logs: u64,
    ) -> UpstreamRunTask {
        let log_count = rng.below(max_logs) as usize;
        UpstreamRunTask {
            task_id,
            retry,
            insert_ts: self.base_time,
            task_no_started: false,
            status: random_task_status(rng),
            pos,
            duration: random_duration(rng, 10_000),
            config: r#"{"X":10,"Y":"value"}"#.to_string(),
            task_logs: self.random_task_logs(rng, log_count),
        }
    }

    fn pending_task(&self, task_id: String, pos: UpstreamTaskPos) -> UpstreamRunTask {
        UpstreamRunTask {
            task_id,
            retry: 0,
            insert_ts: self.base_time,
            task_no_started: true,
            status: TaskStatus::NoStatus,
            pos,
            duration: String::new(),
            config: String::new(),
            task_logs: UpstreamTaskLogs::default(),
        }
    }

    /// `start` -> `task_2{i}` (fan-out) -> `finish`.
    fn sample_dag_tasks(&self, rng: &mut SeededRng) -> Vec<UpstreamRunTask> {
        let fan_out = rng.below(5) as u32 + 1;
        let mut tasks = Vec::with_capacity(fan_out as usize + 2);

        let mut start = self.started_task(rng, "start".into(), 0, pos(1, 1), 1);
        start.status = TaskStatus::Success;
        tasks.push(start);

        for i in 0..fan_out {
            let task_id = format!("task_2{}", i + 1);
            if i > 2 {
                tasks.push(self.pending_task(task_id, pos(2, i + 1)));
            } else {
                tasks.push(self.started_task(rng, task_id, 0, pos(2, i + 1), 5));
            }
        }

        tasks.push(self.pending_task("finish".into(), pos(3, 1)));
        tasks
    }

    /// A chain `task_1 -> task_2 -> ...`; the first `done` tasks have started.
    fn linked_list_tasks(
        &self,
        rng: &mut SeededRng,
        length: u32,
        done: u32,
    ) -> Vec<UpstreamRunTask> {
        (0..length)
            .map(|i| {
                let task_id = format!("task_{}", i + 1);
                if i < done {
                    self.started_task(rng, task_id, 0, pos(i + 1, 1), 15)
                } else {
                    self.pending_task(task_id, pos(i + 1, 1))
                }
            })
            .collect()
    }

    /// Tasks of [`COMPLEX_DAG_EDGES`], positioned by topological level.
    ///
    /// The first failing task gets a second, successful attempt at the same
    /// position.
    fn complex_dag_tasks(&self, rng: &mut SeededRng) -> Vec<UpstreamRunTask> {
        let positions = complex_dag_positions();
        let mut ordered: Vec<(&str, UpstreamTaskPos)> = positions.into_iter().collect();
        ordered.sort_by_key(|(_, p)| (p.depth, p.width));

        let done = rng.below(ordered.len() as u64 + 1) as usize;
        let mut retried = false;
        let mut tasks = Vec::with_capacity(ordered.len() + 1);

        for (idx, (name, p)) in ordered.into_iter().enumerate() {
            if idx >= done {
                tasks.push(self.pending_task(name.to_string(), p));
                continue;
            }
            let attempt = self.started_task(rng, name.to_string(), 0, p, 8);
            let failed = attempt.status == TaskStatus::Failed;
            tasks.push(attempt);
            if failed && !retried {
                retried = true;
                let mut retry = self.started_task(rng, name.to_string(), 1, p, 8);
                retry.status = TaskStatus::Success;
                tasks.push(retry);
            }
        }
        // Hand the tasks back in scheduler insertion order, not display order.
        tasks.reverse();
        tasks
    }

    fn random_task_logs(&self, rng: &mut SeededRng, length: usize) -> UpstreamTaskLogs {
        let records = (0..length)
            .map(|i| UpstreamLogRecord {
                insert_ts: self.base_time + TimeDelta::milliseconds(i as i64 * 10),
                level: random_log_level(rng),
                message: random_string(rng, 10, 200),
                attributes_json: random_log_attr(rng),
            })
            .collect();
        UpstreamTaskLogs {
            log_records_count: length,
            loaded_records: length,
            records,
        }
    }

    fn task_details(
        &self,
        run_id: i64,
        task_id: &str,
        retry: u32,
    ) -> anyhow::Result<UpstreamTaskDetails> {
        let run = self.details(run_id);
        let task = run
            .tasks
            .into_iter()
            .find(|t| t.task_id == task_id && t.retry == retry)
            .ok_or_else(|| {
                anyhow!("task {task_id} (retry {retry}) not found in DAG run {run_id}")
            })?;

        Ok(UpstreamTaskDetails {
            task_id: task.task_id,
            retry: task.retry,
            insert_ts: task.insert_ts,
            status: task.status,
            duration: task.duration,
            config: task.config,
            task_logs: task.task_logs,
        })
    }
}

impl SchedulerApi for MockScheduler {
    fn get_task(&self) -> ApiFuture<'_, Option<TaskToExec>> {
        Box::pin(async move {
            let mut rng = self.rng_for(0x5441_0000 + self.next_tick());
            anyhow::Ok(Some(TaskToExec {
                dag_id: "mock_dag".to_string(),
                exec_ts: self.base_time.to_rfc3339(),
                task_id: format!("task_{}", rng.below(100) + 1),
                retry: 0,
            }))
        })
    }

    fn upsert_task_status(
        &self,
        task: TaskToExec,
        status: TaskStatus,
        _task_err: Option<String>,
    ) -> ApiFuture<'_, ()> {
        Box::pin(async move {
            debug!(task = %task.task_id, %status, "mock: ignoring task status update");
            anyhow::Ok(())
        })
    }

    fn get_state(&self) -> ApiFuture<'_, SchedulerState> {
        Box::pin(async move { anyhow::Ok(SchedulerState::Running) })
    }

    fn dagrun_stats(&self) -> ApiFuture<'_, UpstreamStats> {
        Box::pin(async move { anyhow::Ok(self.stats()) })
    }

    fn dagrun_latest(&self, n: usize) -> ApiFuture<'_, Vec<UpstreamRunRow>> {
        Box::pin(async move { anyhow::Ok(self.latest(n)) })
    }

    fn dagrun_details(&self, run_id: i64) -> ApiFuture<'_, UpstreamRunDetails> {
        Box::pin(async move { anyhow::Ok(self.details(run_id)) })
    }

    fn dagrun_task_details<'a>(
        &'a self,
        run_id: i64,
        task_id: &'a str,
        retry: u32,
    ) -> ApiFuture<'a, UpstreamTaskDetails> {
        Box::pin(async move { self.task_details(run_id, task_id, retry) })
    }
}

fn pos(depth: u32, width: u32) -> UpstreamTaskPos {
    UpstreamTaskPos { depth, width }
}

/// Depth is the longest path from a root plus one; width is the 1-based
/// ordinal of the task within its depth, by name.
fn complex_dag_positions() -> HashMap<&'static str, UpstreamTaskPos> {
    let mut graph: DiGraphMap<&'static str, ()> = DiGraphMap::new();
    for (from, to) in COMPLEX_DAG_EDGES {
        graph.add_edge(from, to, ());
    }

    let mut depth: HashMap<&'static str, u32> = HashMap::new();
    // The edge list is static and acyclic.
    let order = toposort(&graph, None).unwrap_or_default();
    for node in order {
        let d = graph
            .neighbors_directed(node, petgraph::Direction::Incoming)
            .filter_map(|parent| depth.get(parent))
            .max()
            .map_or(1, |d| d + 1);
        depth.insert(node, d);
    }

    let mut by_level: HashMap<u32, Vec<&'static str>> = HashMap::new();
    for (name, d) in depth {
        by_level.entry(d).or_default().push(name);
    }

    let mut positions = HashMap::new();
    for (d, mut names) in by_level {
        names.sort_unstable();
        for (i, name) in names.into_iter().enumerate() {
            positions.insert(name, pos(d, i as u32 + 1));
        }
    }
    positions
}

fn random_status_counts(rng: &mut SeededRng, interval: u64) -> UpstreamStatusCounts {
    UpstreamStatusCounts {
        success: rng.below(interval + 1) + interval / 4,
        failed: rng.below((interval + 1) / 10),
        scheduled: rng.below(3),
        running: rng.below((interval + 1) / 7),
    }
}

fn random_run_status(rng: &mut SeededRng) -> RunStatus {
    match rng.below(10) {
        9 => RunStatus::Failed,
        8 => RunStatus::Success,
        _ => RunStatus::Running,
    }
}

fn random_task_status(rng: &mut SeededRng) -> TaskStatus {
    match rng.below(10) {
        9 => TaskStatus::Failed,
        7 | 8 => TaskStatus::Running,
        _ => TaskStatus::Success,
    }
}

fn random_log_level(rng: &mut SeededRng) -> LogLevel {
    match rng.below(10) {
        9 => LogLevel::Error,
        7 | 8 => LogLevel::Warn,
        _ => LogLevel::Info,
    }
}

fn random_duration(rng: &mut SeededRng, max_millis: u64) -> String {
    format!("{:?}", Duration::from_micros(rng.below(max_millis * 1000)))
}

fn random_offset(rng: &mut SeededRng) -> FixedOffset {
    let hours = if rng.below(10) > 4 { 0 } else { 2 };
    FixedOffset::east_opt(hours * 3600).unwrap_or_else(|| Utc.fix())
}

fn random_string(rng: &mut SeededRng, min_len: u64, max_len: u64) -> String {
    let len = rng.below(max_len - min_len + 1) + min_len;
    (0..len)
        .map(|_| CHARSET[rng.below(CHARSET.len() as u64) as usize] as char)
        .collect()
}

fn random_log_attr(rng: &mut SeededRng) -> String {
    let mut attrs = serde_json::Map::new();
    for i in 0..rng.below(3) {
        let key = random_string(rng, 1, 10);
        let value = if i % 2 == 0 {
            serde_json::Value::from(rng.below(100))
        } else {
            serde_json::Value::from(random_string(rng, 10, 30))
        };
        attrs.insert(key, value);
    }
    serde_json::Value::Object(attrs).to_string()
}
