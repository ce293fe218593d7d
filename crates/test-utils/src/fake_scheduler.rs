use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use dagboard::types::{SchedulerState, TaskStatus};
use dagboard::upstream::{
    ApiFuture, SchedulerApi, TaskToExec, UpstreamRunDetails, UpstreamRunRow, UpstreamStats,
    UpstreamTaskDetails,
};

/// A scheduler that:
/// - answers from canned responses set up by the test
/// - counts every call it receives
/// - fails every call while `set_failing(true)` is in effect.
#[derive(Default)]
pub struct FakeScheduler {
    calls: AtomicUsize,
    failing: AtomicBool,
    stats: Mutex<UpstreamStats>,
    latest: Mutex<Vec<UpstreamRunRow>>,
    runs: Mutex<HashMap<i64, UpstreamRunDetails>>,
    tasks: Mutex<HashMap<(i64, String, u32), UpstreamTaskDetails>>,
    reported: Mutex<Vec<(TaskToExec, TaskStatus)>>,
}

impl FakeScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stats(self, stats: UpstreamStats) -> Self {
        *self.stats.lock().unwrap() = stats;
        self
    }

    pub fn with_latest(self, rows: Vec<UpstreamRunRow>) -> Self {
        *self.latest.lock().unwrap() = rows;
        self
    }

    pub fn with_run(self, details: UpstreamRunDetails) -> Self {
        self.runs.lock().unwrap().insert(details.run_id, details);
        self
    }

    pub fn with_task(self, run_id: i64, details: UpstreamTaskDetails) -> Self {
        let key = (run_id, details.task_id.clone(), details.retry);
        self.tasks.lock().unwrap().insert(key, details);
        self
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of calls received so far, including failed ones.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn reported(&self) -> Vec<(TaskToExec, TaskStatus)> {
        self.reported.lock().unwrap().clone()
    }

    fn enter(&self, op: &str) -> anyhow::Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            anyhow::bail!("fake scheduler is down ({op})");
        }
        Ok(())
    }
}

impl SchedulerApi for FakeScheduler {
    fn get_task(&self) -> ApiFuture<'_, Option<TaskToExec>> {
        Box::pin(async move {
            self.enter("get_task")?;
            anyhow::Ok(None)
        })
    }

    fn upsert_task_status(
        &self,
        task: TaskToExec,
        status: TaskStatus,
        _task_err: Option<String>,
    ) -> ApiFuture<'_, ()> {
        Box::pin(async move {
            self.enter("upsert_task_status")?;
            self.reported.lock().unwrap().push((task, status));
            anyhow::Ok(())
        })
    }

    fn get_state(&self) -> ApiFuture<'_, SchedulerState> {
        Box::pin(async move {
            self.enter("get_state")?;
            anyhow::Ok(SchedulerState::Running)
        })
    }

    fn dagrun_stats(&self) -> ApiFuture<'_, UpstreamStats> {
        Box::pin(async move {
            self.enter("dagrun_stats")?;
            anyhow::Ok(self.stats.lock().unwrap().clone())
        })
    }

    fn dagrun_latest(&self, n: usize) -> ApiFuture<'_, Vec<UpstreamRunRow>> {
        Box::pin(async move {
            self.enter("dagrun_latest")?;
            anyhow::Ok(self.latest.lock().unwrap().iter().take(n).cloned().collect::<Vec<_>>())
        })
    }

    fn dagrun_details(&self, run_id: i64) -> ApiFuture<'_, UpstreamRunDetails> {
        Box::pin(async move {
            self.enter("dagrun_details")?;
            self.runs
                .lock()
                .unwrap()
                .get(&run_id)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("no DAG run {run_id}"))
        })
    }

    fn dagrun_task_details<'a>(
        &'a self,
        run_id: i64,
        task_id: &'a str,
        retry: u32,
    ) -> ApiFuture<'a, UpstreamTaskDetails> {
        Box::pin(async move {
            self.enter("dagrun_task_details")?;
            self.tasks
                .lock()
                .unwrap()
                .get(&(run_id, task_id.to_string(), retry))
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("no task {task_id} (retry {retry}) in run {run_id}"))
        })
    }
}
