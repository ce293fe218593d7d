// tests/dashboard_facade.rs

mod common;
use crate::common::builders::{
    RunDetailsBuilder, UpstreamTaskBuilder, run_row, stats, task_details,
};
use crate::common::{FakeScheduler, dashboard_over, with_timeout};

use std::sync::Arc;

use dagboard::dag::TaskPosition;
use dagboard::dashboard::{Dashboard, DashboardSettings, TaskLocator, TaskRef};
use dagboard::errors::DashboardError;
use dagboard::logs::WindowBounds;
use dagboard::types::{RunStatus, TaskStatus};

fn sample_run(run_id: i64) -> dagboard::upstream::UpstreamRunDetails {
    RunDetailsBuilder::new(run_id)
        .status(RunStatus::Success)
        .task(UpstreamTaskBuilder::new("finish").at(3, 1).build())
        .task(UpstreamTaskBuilder::new("task_22").at(2, 2).build())
        .task(UpstreamTaskBuilder::new("start").at(1, 1).logs(20, 5).build())
        .task(UpstreamTaskBuilder::new("task_21").at(2, 1).build())
        .build()
}

#[tokio::test]
async fn run_detail_is_laid_out() {
    common::init_tracing();
    let fake = Arc::new(FakeScheduler::new().with_run(sample_run(42)));
    let dashboard = dashboard_over(&fake);

    let detail = with_timeout(dashboard.get_run_detail(42)).await.unwrap();

    assert_eq!(detail.run_id, 42);
    assert_eq!(detail.dag_id, "sample_dag");
    assert_eq!(detail.status, RunStatus::Success);
    let ids: Vec<&str> = detail.tasks.iter().map(|t| t.task_id.as_str()).collect();
    assert_eq!(ids, vec!["start", "task_21", "task_22", "finish"]);
    let indents: Vec<u32> = detail.tasks.iter().map(|t| t.position.indent).collect();
    assert_eq!(indents, vec![1, 2, 2, 3]);
    assert_eq!(detail.tasks[0].logs.loaded_records(), 5);
}

#[tokio::test]
async fn run_detail_honours_configured_clamp() {
    let fake = Arc::new(FakeScheduler::new().with_run(sample_run(1)));
    let dashboard = Dashboard::new(fake.clone(), DashboardSettings { max_indent: 2 });
    let detail = dashboard.get_run_detail(1).await.unwrap();
    assert_eq!(detail.tasks.last().unwrap().position.indent, 2);
}

#[tokio::test]
async fn recent_runs_keep_scheduler_order() {
    let rows = vec![run_row(9, "b"), run_row(3, "a"), run_row(5, "c")];
    let fake = Arc::new(FakeScheduler::new().with_latest(rows));
    let dashboard = dashboard_over(&fake);

    let listed = dashboard.list_recent_runs(2).await.unwrap();
    let ids: Vec<i64> = listed.iter().map(|r| r.run_id).collect();
    assert_eq!(ids, vec![9, 3]);
    assert_eq!(listed[0].task_count, 4);
    assert_eq!(listed[0].task_completed_count, 4);
}

#[tokio::test]
async fn stats_are_assembled_field_by_field() {
    let fake = Arc::new(FakeScheduler::new().with_stats(stats(11, 22)));
    let dashboard = dashboard_over(&fake);

    let s = dashboard.get_stats().await.unwrap();
    assert_eq!(s.run_counts.success, 11);
    assert_eq!(s.run_counts.running, 3);
    assert_eq!(s.task_counts.success, 22);
    assert_eq!(s.task_counts.total(), 22 + 4 + 5 + 6);
    assert_eq!(s.pending_run_queue_length, 7);
    assert_eq!(s.pending_task_queue_length, 8);
    assert_eq!(s.worker_count, 9);
}

#[tokio::test]
async fn task_detail_has_fresh_logs_and_open_panel() {
    let fake = Arc::new(FakeScheduler::new().with_task(7, task_details("t1", 0, 3, 3)));
    let dashboard = dashboard_over(&fake);

    let locator = TaskLocator::new(TaskRef::new(7, "t1", 0));
    let task = dashboard
        .get_task_detail(&locator, WindowBounds::full())
        .await
        .unwrap();

    assert_eq!(task.logs.loaded_records(), 3);
    assert_eq!(task.logs.records().len(), 3);
    assert_eq!(task.status, TaskStatus::Running);
    assert!(task.started);
    assert!(task.logs_window_open);
}

#[tokio::test]
async fn task_detail_of_unstarted_task_has_no_duration_or_logs() {
    for status in [TaskStatus::NoStatus, TaskStatus::Scheduled, TaskStatus::Queued] {
        let mut details = task_details("t2", 0, 2, 2);
        details.status = status;
        let fake = Arc::new(FakeScheduler::new().with_task(7, details));
        let dashboard = dashboard_over(&fake);

        let task = dashboard
            .get_task_detail(&TaskLocator::new(TaskRef::new(7, "t2", 0)), WindowBounds::full())
            .await
            .unwrap();

        assert!(!task.started, "{status} should not count as started");
        assert!(task.duration.is_empty());
        assert!(task.logs.is_empty());
        assert!(task.logs_window_open);
    }
}

#[tokio::test]
async fn task_detail_of_finished_task_keeps_logs() {
    let mut details = task_details("t3", 1, 2, 2);
    details.status = TaskStatus::Failed;
    let fake = Arc::new(FakeScheduler::new().with_task(7, details));
    let dashboard = dashboard_over(&fake);

    let task = dashboard
        .get_task_detail(&TaskLocator::new(TaskRef::new(7, "t3", 1)), WindowBounds::full())
        .await
        .unwrap();

    assert!(task.started);
    assert_eq!(task.duration, "3s");
    assert_eq!(task.logs.loaded_records(), 2);
}

#[tokio::test]
async fn task_detail_recomputes_indent_from_depth() {
    let fake = Arc::new(FakeScheduler::new().with_task(7, task_details("t1", 0, 0, 0)));
    let dashboard = dashboard_over(&fake);

    let task = dashboard
        .get_task_detail_raw("7", "t1", "0", "12_1_3", WindowBounds::full())
        .await
        .unwrap();
    assert_eq!(
        task.position,
        TaskPosition {
            depth: 12,
            width: 1,
            indent: 10
        }
    );
}

#[tokio::test]
async fn malformed_arguments_fail_before_any_call() {
    let fake = Arc::new(FakeScheduler::new().with_run(sample_run(1)));
    let dashboard = dashboard_over(&fake);

    for raw in ["abc", " 1 ", "1\n"] {
        let err = dashboard.get_run_detail_raw(raw).await.unwrap_err();
        assert_eq!(err.invalid_field(), Some("runId"));
    }

    let err = dashboard
        .get_task_detail_raw("1", "start", " 0", "1_1_1", WindowBounds::full())
        .await
        .unwrap_err();
    assert_eq!(err.invalid_field(), Some("retry"));

    let err = dashboard
        .get_task_detail_raw("1", "start", "0", "1_1", WindowBounds::full())
        .await
        .unwrap_err();
    assert!(matches!(err, DashboardError::InvalidTaskReference(_)));
    assert_eq!(err.invalid_field(), Some("taskPos"));

    let err = dashboard
        .get_task_detail_raw("1", "  ", "0", "1_1_1", WindowBounds::full())
        .await
        .unwrap_err();
    assert_eq!(err.invalid_field(), Some("taskId"));

    let err = dashboard.list_recent_runs_raw("0").await.unwrap_err();
    assert_eq!(err.invalid_field(), Some("num"));

    assert_eq!(fake.calls(), 0);
}

#[tokio::test]
async fn scheduler_errors_surface_as_upstream_unavailable() {
    common::init_tracing();
    let fake = Arc::new(FakeScheduler::new().with_run(sample_run(1)));
    fake.set_failing(true);
    let dashboard = dashboard_over(&fake);

    let err = dashboard.get_run_detail(1).await.unwrap_err();
    assert!(err.is_upstream());
    assert!(err.to_string().contains("run 1"));

    // The cause is reported once, as the source, not repeated in the message.
    assert!(!err.to_string().contains("fake scheduler is down"));
    let report = format!("{:?}", anyhow::Error::from(err));
    assert_eq!(report.matches("fake scheduler is down").count(), 1);

    assert!(dashboard.get_stats().await.unwrap_err().is_upstream());
    assert!(dashboard.list_recent_runs(5).await.unwrap_err().is_upstream());
    assert!(dashboard.scheduler_state().await.unwrap_err().is_upstream());

    // One call each; nothing is retried.
    assert_eq!(fake.calls(), 4);

    fake.set_failing(false);
    assert!(dashboard.get_run_detail(1).await.is_ok());
}

#[tokio::test]
async fn output_uses_field_names() {
    let fake = Arc::new(FakeScheduler::new().with_run(sample_run(5)));
    let dashboard = dashboard_over(&fake);
    let detail = dashboard.get_run_detail(5).await.unwrap();

    let json = serde_json::to_value(&detail).unwrap();
    assert_eq!(json["runId"], 5);
    assert_eq!(json["tasks"][0]["taskId"], "start");
    assert_eq!(json["tasks"][0]["position"]["indent"], 1);
    assert_eq!(json["tasks"][0]["logs"]["loadedRecords"], 5);
    assert_eq!(json["tasks"][0]["status"], "SUCCESS");
}
