// src/dag/layout.rs

//! Run layout: turns the loosely ordered task records of one DAG run into a
//! stable, renderable tree order.
//!
//! Ordering is by `(depth, width, retry)` ascending. The sort is stable, so
//! two distinct tasks that share all three keys keep their input order. That
//! is tolerated rather than rejected.
//!
//! Every output task gets `indent = min(depth, max_indent)`, whatever indent
//! it arrived with. Tasks that have not started get an empty log window and
//! an empty duration, overriding anything the scheduler sent.

use tracing::{debug, warn};

use crate::dag::position::TaskPosition;
use crate::dag::run::RunTask;
use crate::logs::{LogWindow, default_window};
use crate::upstream::UpstreamRunTask;

/// Sort key of a task in display order.
pub fn layout_key(task: &RunTask) -> (u32, u32, u32) {
    (task.position.depth, task.position.width, task.retry)
}

/// Lay out already-converted tasks: stable sort, recompute indent, blank
/// out unstarted tasks.
pub fn layout_tasks(mut tasks: Vec<RunTask>, max_indent: u32) -> Vec<RunTask> {
    tasks.sort_by_key(layout_key);
    warn_on_shared_keys(&tasks);

    for task in tasks.iter_mut() {
        task.position = task.position.reindented(max_indent);
        if !task.started {
            task.logs = LogWindow::empty();
            task.duration.clear();
        }
        task.logs_window_open = false;
    }
    tasks
}

/// Convert the scheduler's task records for `run_id` and lay them out.
pub fn layout_run_tasks(run_id: i64, tasks: Vec<UpstreamRunTask>, max_indent: u32) -> Vec<RunTask> {
    debug!(run_id, tasks = tasks.len(), max_indent, "laying out DAG run tasks");
    let converted = tasks
        .into_iter()
        .map(|t| to_run_task(run_id, t, max_indent))
        .collect();
    layout_tasks(converted, max_indent)
}

fn to_run_task(run_id: i64, task: UpstreamRunTask, max_indent: u32) -> RunTask {
    let started = !task.task_no_started;
    let logs = if started {
        default_window(task.task_logs)
    } else {
        LogWindow::empty()
    };

    RunTask {
        run_id,
        task_id: task.task_id,
        retry: task.retry,
        position: TaskPosition::new(task.pos.depth, task.pos.width, max_indent),
        status: task.status,
        started,
        inserted_at: task.insert_ts,
        duration: if started { task.duration } else { String::new() },
        config_snapshot: task.config,
        logs,
        logs_window_open: false,
    }
}

fn warn_on_shared_keys(sorted: &[RunTask]) {
    for pair in sorted.windows(2) {
        if layout_key(&pair[0]) == layout_key(&pair[1]) && pair[0].task_id != pair[1].task_id {
            warn!(
                first = %pair[0].task_id,
                second = %pair[1].task_id,
                position = %pair[0].position,
                retry = pair[0].retry,
                "distinct tasks share a position and retry; keeping input order"
            );
        }
    }
}
