// tests/http_client.rs

mod common;
use crate::common::builders::{RunDetailsBuilder, UpstreamTaskBuilder, stats, task_details};
use crate::common::with_timeout;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use dagboard::dashboard::{Dashboard, DashboardSettings};
use dagboard::types::{LogLevel, RunStatus, SchedulerState, TaskStatus};
use dagboard::upstream::client::UpstreamError;
use dagboard::upstream::{HttpSchedulerClient, SchedulerApi, TaskToExec};

const AWKWARD_TASK_ID: &str = "extract/clean?x=1#frag";

/// Run 3 as the scheduler would send it after gaining states this crate
/// does not list.
fn run_with_unlisted_values() -> String {
    let run = RunDetailsBuilder::new(3)
        .task(UpstreamTaskBuilder::new("load").logs(2, 2).build())
        .build();
    let mut json = serde_json::to_value(&run).unwrap();
    json["Status"] = "RESTARTING".into();
    json["Tasks"][0]["Status"] = "QUEUED".into();
    json["Tasks"][0]["TaskLogs"]["Records"][0]["Level"] = "DEBUG".into();
    json["Tasks"][0]["TaskLogs"]["Records"][1]["Level"] = "TRACE".into();
    json.to_string()
}

/// Canned response for a request path.
fn respond(method: &str, path: &str) -> (u16, String) {
    match (method, path) {
        ("GET", "/ui/dagrun/3") => (200, run_with_unlisted_values()),
        ("GET", "/ui/dagrun/7/extract%2Fclean%3Fx=1%23frag/0") => (
            200,
            serde_json::to_string(&task_details(AWKWARD_TASK_ID, 0, 1, 1)).unwrap(),
        ),
        ("GET", "/state") => (200, "\"RUNNING\"".to_string()),
        ("GET", "/ui/dagrun/stats") => (200, serde_json::to_string(&stats(3, 4)).unwrap()),
        ("GET", "/dag/task/pop") => (204, String::new()),
        ("POST", "/dag/task/update") => (200, String::new()),
        ("GET", "/ui/dagrun/latest/5") => (200, "{not json".to_string()),
        _ => (500, "boom: database is locked".to_string()),
    }
}

type RequestLog = Arc<Mutex<Vec<String>>>;

async fn serve_one(mut stream: TcpStream, requests: RequestLog) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    let header_end = loop {
        let n = match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => n,
        };
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    if let Some(line) = head.lines().next() {
        requests.lock().unwrap().push(line.to_string());
    }
    let mut request_line = head.lines().next().unwrap_or_default().split_whitespace();
    let method = request_line.next().unwrap_or_default().to_string();
    let path = request_line.next().unwrap_or_default().to_string();

    let content_length = head
        .lines()
        .filter_map(|l| l.split_once(':'))
        .find(|(k, _)| k.eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.trim().parse::<usize>().ok())
        .unwrap_or(0);
    while buf.len() < header_end + content_length {
        match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }

    let (status, body) = respond(&method, &path);
    let reason = match status {
        200 => "OK",
        204 => "No Content",
        _ => "Internal Server Error",
    };
    let response = if status == 204 {
        format!("HTTP/1.1 204 {reason}\r\nConnection: close\r\n\r\n")
    } else {
        format!(
            "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
    };
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
}

async fn start_recording_server() -> (String, RequestLog) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = RequestLog::default();
    let log = Arc::clone(&requests);
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            tokio::spawn(serve_one(stream, Arc::clone(&log)));
        }
    });
    (format!("http://{addr}/"), requests)
}

async fn start_server() -> String {
    start_recording_server().await.0
}

fn client(url: &str) -> HttpSchedulerClient {
    HttpSchedulerClient::new(url, Duration::from_secs(5)).unwrap()
}

fn upstream_error(err: &anyhow::Error) -> &UpstreamError {
    err.downcast_ref::<UpstreamError>()
        .unwrap_or_else(|| panic!("expected an UpstreamError, got {err:?}"))
}

#[tokio::test]
async fn decodes_scheduler_responses() {
    common::init_tracing();
    let url = start_server().await;
    let api = client(&url);
    assert_eq!(api.base_url(), url.trim_end_matches('/'));

    let state = with_timeout(api.get_state()).await.unwrap();
    assert_eq!(state, SchedulerState::Running);

    let s = with_timeout(api.dagrun_stats()).await.unwrap();
    assert_eq!(s, stats(3, 4));
}

#[tokio::test]
async fn empty_queue_pops_nothing_and_reports_are_posted() {
    let url = start_server().await;
    let api = client(&url);

    assert_eq!(with_timeout(api.get_task()).await.unwrap(), None);

    let task = TaskToExec {
        dag_id: "sample_dag".to_string(),
        exec_ts: "2024-03-01T12:00:00+00:00".to_string(),
        task_id: "start".to_string(),
        retry: 0,
    };
    with_timeout(api.upsert_task_status(task, TaskStatus::Success, None))
        .await
        .unwrap();
}

#[tokio::test]
async fn non_success_status_keeps_a_body_preview() {
    let url = start_server().await;
    let api = client(&url);

    let err = with_timeout(api.dagrun_details(99)).await.unwrap_err();
    match upstream_error(&err) {
        UpstreamError::Status { status, body, url } => {
            assert_eq!(*status, 500);
            assert!(body.contains("database is locked"));
            assert!(url.ends_with("/ui/dagrun/99"));
        }
        other => panic!("expected a status error, got {other:?}"),
    }
}

#[tokio::test]
async fn invalid_json_is_a_decode_error() {
    let url = start_server().await;
    let api = client(&url);

    let err = with_timeout(api.dagrun_latest(5)).await.unwrap_err();
    assert!(matches!(upstream_error(&err), UpstreamError::Decode { .. }));
}

#[tokio::test]
async fn refused_connection_is_a_connect_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = client(&format!("http://{addr}"));
    let err = with_timeout(api.get_state()).await.unwrap_err();
    assert!(matches!(upstream_error(&err), UpstreamError::Connect { .. }));
}

#[tokio::test]
async fn dashboard_wraps_transport_failures() {
    let url = start_server().await;
    let dashboard = Dashboard::new(Arc::new(client(&url)), DashboardSettings::default());

    let err = with_timeout(dashboard.get_run_detail(1)).await.unwrap_err();
    assert!(err.is_upstream());
    let cause = std::error::Error::source(&err).unwrap().to_string();
    assert!(cause.contains("500"));
}

#[tokio::test]
async fn task_id_is_sent_as_one_encoded_segment() {
    let (url, requests) = start_recording_server().await;
    let api = client(&url);

    let details = with_timeout(api.dagrun_task_details(7, AWKWARD_TASK_ID, 0))
        .await
        .unwrap();
    assert_eq!(details.task_id, AWKWARD_TASK_ID);
    assert_eq!(
        requests.lock().unwrap().as_slice(),
        ["GET /ui/dagrun/7/extract%2Fclean%3Fx=1%23frag/0 HTTP/1.1"]
    );
}

#[tokio::test]
async fn base_path_prefix_is_kept() {
    let (url, requests) = start_recording_server().await;
    let api = client(&format!("{url}scheduler/"));

    // Unknown route, so a 500; only the request line matters here.
    let _ = with_timeout(api.dagrun_latest(3)).await;
    assert_eq!(
        requests.lock().unwrap().as_slice(),
        ["GET /scheduler/ui/dagrun/latest/3 HTTP/1.1"]
    );
}

#[tokio::test]
async fn unlisted_statuses_and_levels_do_not_fail_the_run() {
    let url = start_server().await;
    let api = client(&url);

    let run = with_timeout(api.dagrun_details(3)).await.unwrap();
    assert_eq!(run.status, RunStatus::Unknown);
    assert_eq!(run.tasks[0].status, TaskStatus::Queued);
    let levels: Vec<_> = run.tasks[0]
        .task_logs
        .records
        .iter()
        .map(|r| r.level)
        .collect();
    assert_eq!(levels, [LogLevel::Debug, LogLevel::Unknown]);

    let dashboard = Dashboard::new(Arc::new(api), DashboardSettings::default());
    let detail = with_timeout(dashboard.get_run_detail(3)).await.unwrap();
    assert_eq!(detail.tasks.len(), 1);
    assert_eq!(detail.tasks[0].status, TaskStatus::Queued);
}

#[test]
fn invalid_base_url_is_rejected() {
    assert!(HttpSchedulerClient::new("not a url", Duration::from_secs(1)).is_err());
    assert!(HttpSchedulerClient::new("mailto:ops@example.com", Duration::from_secs(1)).is_err());
}
