// src/logging.rs

//! Logging setup for `dagboard` using `tracing` + `tracing-subscriber`.
//!
//! Priority for determining the filter:
//! 1. `--log-level` CLI flag (if provided)
//! 2. `DAGBOARD_LOG` environment variable, either a level ("debug") or
//!    per-target directives ("dagboard=debug,reqwest=warn")
//! 3. default to `info`
//!
//! Logs go to STDERR; STDOUT carries only the JSON output.

use anyhow::Result;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt};

use crate::cli::LogLevel;

pub const LOG_ENV_VAR: &str = "DAGBOARD_LOG";

/// Initialise the global logging subscriber. Call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let filter = build_filter(cli_level, std::env::var(LOG_ENV_VAR).ok().as_deref());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install log subscriber: {e}"))?;

    Ok(())
}

/// Filter for the subscriber.
///
/// Without a CLI flag, an env value containing `target=level` directives is
/// used as-is. Anything else goes through [`resolve_level`] and applies to
/// every target; unparsable directives fall back the same way.
pub fn build_filter(cli_level: Option<LogLevel>, env_value: Option<&str>) -> EnvFilter {
    if cli_level.is_none() {
        let directives = env_value.map(str::trim).filter(|v| v.contains('='));
        if let Some(Ok(filter)) = directives.map(EnvFilter::try_new) {
            return filter;
        }
    }
    let level = resolve_level(cli_level, env_value);
    EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .parse_lossy("")
}

/// CLI level wins, then the env value, then `INFO`.
pub fn resolve_level(cli_level: Option<LogLevel>, env_value: Option<&str>) -> tracing::Level {
    match cli_level {
        Some(lvl) => level_from_log_level(lvl),
        None => env_value
            .and_then(parse_level_str)
            .unwrap_or(tracing::Level::INFO),
    }
}

fn level_from_log_level(lvl: LogLevel) -> tracing::Level {
    match lvl {
        LogLevel::Error => tracing::Level::ERROR,
        LogLevel::Warn => tracing::Level::WARN,
        LogLevel::Info => tracing::Level::INFO,
        LogLevel::Debug => tracing::Level::DEBUG,
        LogLevel::Trace => tracing::Level::TRACE,
    }
}

fn parse_level_str(s: &str) -> Option<tracing::Level> {
    match s.trim().to_lowercase().as_str() {
        "error" => Some(tracing::Level::ERROR),
        "warn" | "warning" => Some(tracing::Level::WARN),
        "info" => Some(tracing::Level::INFO),
        "debug" => Some(tracing::Level::DEBUG),
        "trace" => Some(tracing::Level::TRACE),
        _ => None,
    }
}
