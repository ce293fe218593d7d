// src/upstream/client.rs

//! HTTP client for a running scheduler.

use std::time::Duration;

use anyhow::{Context, bail};
use reqwest::{Client, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use super::wire::{
    TaskStatusUpdate, TaskToExec, UpstreamRunDetails, UpstreamRunRow, UpstreamStats,
    UpstreamTaskDetails,
};
use super::{ApiFuture, SchedulerApi};
use crate::types::{SchedulerState, TaskStatus};

const BODY_PREVIEW_LIMIT: usize = 512;

/// Transport-level failure talking to the scheduler.
#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("cannot connect to {url}: {message}")]
    Connect { url: String, message: String },

    #[error("{url} returned status {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    #[error("cannot decode response from {url}: {message}")]
    Decode { url: String, message: String },

    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },
}

impl UpstreamError {
    fn from_reqwest(err: reqwest::Error, url: &str) -> Self {
        let url = url.to_string();
        if err.is_timeout() {
            UpstreamError::Timeout { url }
        } else if err.is_connect() {
            UpstreamError::Connect {
                url,
                message: err.to_string(),
            }
        } else if err.is_decode() {
            UpstreamError::Decode {
                url,
                message: err.to_string(),
            }
        } else {
            UpstreamError::Request {
                url,
                message: err.to_string(),
            }
        }
    }
}

/// [`SchedulerApi`] backed by the scheduler's HTTP endpoints.
#[derive(Debug, Clone)]
pub struct HttpSchedulerClient {
    client: Client,
    base: Url,
    base_url: String,
}

impl HttpSchedulerClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let base = Url::parse(&base_url)
            .with_context(|| format!("invalid scheduler URL {base_url:?}"))?;
        if base.cannot_be_a_base() {
            bail!("scheduler URL {base_url:?} cannot carry a path");
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base,
            base_url,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Endpoint URL below the base; every segment is percent-encoded, so a
    /// `/`, `?` or `#` inside one stays part of that segment.
    fn endpoint(&self, segments: &[&str]) -> String {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url.into()
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, UpstreamError> {
        let url = self.endpoint(segments);
        debug!(%url, "GET scheduler");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| UpstreamError::from_reqwest(e, &url))?;
        let response = check_status(response, &url).await?;

        response
            .json::<T>()
            .await
            .map_err(|e| UpstreamError::from_reqwest(e, &url))
    }

    async fn post_json<B: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<reqwest::Response, UpstreamError> {
        let url = self.endpoint(segments);
        debug!(%url, "POST scheduler");

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| UpstreamError::from_reqwest(e, &url))?;
        check_status(response, &url).await
    }

    async fn pop_task(&self) -> Result<Option<TaskToExec>, UpstreamError> {
        let url = self.endpoint(&["dag", "task", "pop"]);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| UpstreamError::from_reqwest(e, &url))?;

        if response.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        let response = check_status(response, &url).await?;
        let task = response
            .json::<TaskToExec>()
            .await
            .map_err(|e| UpstreamError::from_reqwest(e, &url))?;
        Ok(Some(task))
    }
}

async fn check_status(
    response: reqwest::Response,
    url: &str,
) -> Result<reqwest::Response, UpstreamError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(UpstreamError::Status {
        url: url.to_string(),
        status: status.as_u16(),
        body: preview_body(&body),
    })
}

fn preview_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<empty body>".to_string();
    }
    let mut out: String = trimmed.chars().take(BODY_PREVIEW_LIMIT).collect();
    if trimmed.chars().count() > BODY_PREVIEW_LIMIT {
        out.push_str("...");
    }
    out
}

impl SchedulerApi for HttpSchedulerClient {
    fn get_task(&self) -> ApiFuture<'_, Option<TaskToExec>> {
        Box::pin(async move { self.pop_task().await.map_err(anyhow::Error::from) })
    }

    fn upsert_task_status(
        &self,
        task: TaskToExec,
        status: TaskStatus,
        task_err: Option<String>,
    ) -> ApiFuture<'_, ()> {
        Box::pin(async move {
            let update = TaskStatusUpdate::new(task, status, task_err);
            self.post_json(&["dag", "task", "update"], &update)
                .await
                .map(|_| ())
                .map_err(anyhow::Error::from)
        })
    }

    fn get_state(&self) -> ApiFuture<'_, SchedulerState> {
        Box::pin(async move {
            self.get_json::<SchedulerState>(&["state"])
                .await
                .map_err(anyhow::Error::from)
        })
    }

    fn dagrun_stats(&self) -> ApiFuture<'_, UpstreamStats> {
        Box::pin(async move {
            self.get_json::<UpstreamStats>(&["ui", "dagrun", "stats"])
                .await
                .map_err(anyhow::Error::from)
        })
    }

    fn dagrun_latest(&self, n: usize) -> ApiFuture<'_, Vec<UpstreamRunRow>> {
        Box::pin(async move {
            let n = n.to_string();
            self.get_json::<Vec<UpstreamRunRow>>(&["ui", "dagrun", "latest", n.as_str()])
                .await
                .map_err(anyhow::Error::from)
        })
    }

    fn dagrun_details(&self, run_id: i64) -> ApiFuture<'_, UpstreamRunDetails> {
        Box::pin(async move {
            let run_id = run_id.to_string();
            self.get_json::<UpstreamRunDetails>(&["ui", "dagrun", run_id.as_str()])
                .await
                .map_err(anyhow::Error::from)
        })
    }

    fn dagrun_task_details<'a>(
        &'a self,
        run_id: i64,
        task_id: &'a str,
        retry: u32,
    ) -> ApiFuture<'a, UpstreamTaskDetails> {
        Box::pin(async move {
            let (run_id, retry) = (run_id.to_string(), retry.to_string());
            let segments = ["ui", "dagrun", run_id.as_str(), task_id, retry.as_str()];
            self.get_json::<UpstreamTaskDetails>(&segments)
                .await
                .map_err(anyhow::Error::from)
        })
    }
}
