// src/lib.rs

pub mod cli;
pub mod config;
pub mod dag;
pub mod dashboard;
pub mod errors;
pub mod live;
pub mod logging;
pub mod logs;
pub mod stats;
pub mod sync;
pub mod types;
pub mod upstream;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use serde::Serialize;
use tokio::sync::{mpsc, watch};
use tracing::{error, info};

use crate::cli::{CliArgs, Command, WatchPanel};
use crate::config::{ConfigFile, RawConfigFile, SchedulerSection, load_raw_or_default};
use crate::dashboard::{Dashboard, DashboardSettings, args::parse_run_id};
use crate::errors::DashboardError;
use crate::live::{LivePanel, PanelTarget, PanelUpdate};
use crate::logs::WindowBounds;
use crate::sync::DashboardSession;
use crate::upstream::{HttpSchedulerClient, MockScheduler, SchedulerApi};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading and CLI overrides
/// - the scheduler capability (HTTP client or mock)
/// - the dashboard facade and a per-invocation session
/// - the live refresh loop for `watch`, with Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let raw = load_raw_or_default(args.config.as_deref())?;
    let cfg = ConfigFile::try_from(apply_cli_overrides(raw, &args))?;
    info!(
        version = VERSION,
        mock = cfg.scheduler().mock,
        url = %cfg.scheduler().url,
        "dagboard starting"
    );

    let api = build_scheduler_api(cfg.scheduler())?;
    let dashboard = Dashboard::new(
        api,
        DashboardSettings {
            max_indent: cfg.dashboard().max_indent,
        },
    );
    let session = Arc::new(DashboardSession::new(cfg.dashboard()));

    match args.command {
        Command::Runs { num } => {
            if let Some(raw) = num {
                session.set_recent_runs(&raw)?;
            }
            let rows = dashboard.list_recent_runs(session.recent_runs()).await?;
            print_json(&rows)
        }
        Command::Stats => print_json(&dashboard.get_stats().await?),
        Command::Run { run_id } => print_json(&dashboard.get_run_detail_raw(&run_id).await?),
        Command::Task {
            run_id,
            task_id,
            retry,
            pos,
            offset,
            limit,
        } => {
            let bounds = WindowBounds::new(offset, limit);
            let task = dashboard
                .get_task_detail_raw(&run_id, &task_id, &retry, &pos, bounds)
                .await?;
            print_json(&task)
        }
        Command::State => print_json(&dashboard.scheduler_state().await?),
        Command::Watch {
            panel,
            run_id,
            iterations,
            interval,
        } => {
            let target = watch_target(panel, run_id.as_deref())?;
            if let Some(raw) = interval {
                session.set_interval(target.panel(), &raw)?;
            }
            watch_panel(dashboard, session, target, iterations).await
        }
    }
}

/// Apply `--mock` and `--scheduler-url` on top of the file config.
pub fn apply_cli_overrides(mut raw: RawConfigFile, args: &CliArgs) -> RawConfigFile {
    if args.mock {
        raw.scheduler.mock = true;
    }
    if let Some(url) = &args.scheduler_url {
        raw.scheduler.url = url.clone();
    }
    raw
}

/// Pick the scheduler implementation for this process.
pub fn build_scheduler_api(section: &SchedulerSection) -> Result<Arc<dyn SchedulerApi>> {
    if section.mock {
        info!(seed = section.seed, "using mock scheduler");
        return Ok(Arc::new(MockScheduler::new(section.seed)));
    }
    let client = HttpSchedulerClient::new(&section.url, Duration::from_secs(section.timeout_secs))?;
    Ok(Arc::new(client))
}

fn watch_target(panel: WatchPanel, run_id: Option<&str>) -> Result<PanelTarget> {
    let target = match panel {
        WatchPanel::Stats => PanelTarget::Stats,
        WatchPanel::Runs => PanelTarget::RunList,
        WatchPanel::Run => {
            let raw = run_id.ok_or_else(|| {
                DashboardError::invalid_argument(
                    "runId",
                    "",
                    "--run-id is required to watch a run",
                )
            })?;
            PanelTarget::RunDetail(parse_run_id(raw)?)
        }
    };
    Ok(target)
}

async fn watch_panel(
    dashboard: Dashboard,
    session: Arc<DashboardSession>,
    target: PanelTarget,
    iterations: Option<u64>,
) -> Result<()> {
    let (update_tx, mut update_rx) = mpsc::channel::<PanelUpdate>(16);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // Ctrl-C → graceful shutdown.
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(err = %e, "failed to listen for Ctrl+C");
            return;
        }
        let _ = shutdown_tx.send(true);
    });

    let mut live = LivePanel::new(dashboard, session, target, update_tx);
    if let Some(k) = iterations {
        live = live.with_max_iterations(k);
    }
    let handle = tokio::spawn(live.run(shutdown_rx));

    while let Some(update) = update_rx.recv().await {
        match update.outcome {
            Ok(content) => print_json(&content)?,
            Err(err) => error!(
                panel = %update.panel,
                sequence = update.sequence,
                err = format!("{:#}", anyhow::Error::from(err)),
                "refresh failed; keeping panel alive"
            ),
        }
    }

    handle.await?;
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
