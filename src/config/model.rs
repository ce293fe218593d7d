// src/config/model.rs

use serde::Deserialize;

use crate::dag::DEFAULT_MAX_INDENT;
use crate::sync::{DEFAULT_SYNC_SECONDS, SUSPENDED_SYNC_SECONDS};

/// Configuration exactly as read from a TOML file, before validation.
///
/// ```toml
/// [scheduler]
/// url = "http://localhost:9321"
/// mock = false
/// seed = 42
/// timeout_secs = 30
///
/// [dashboard]
/// max_indent = 10
/// recent_runs = 10
/// sync_seconds = 1
/// stopped_sync_seconds = 1000000
/// ```
///
/// All sections and keys are optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub scheduler: SchedulerSection,

    #[serde(default)]
    pub dashboard: DashboardSection,
}

/// Validated configuration. Only obtainable through
/// `ConfigFile::try_from(RawConfigFile)` or [`ConfigFile::default`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    scheduler: SchedulerSection,
    dashboard: DashboardSection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(scheduler: SchedulerSection, dashboard: DashboardSection) -> Self {
        Self {
            scheduler,
            dashboard,
        }
    }

    pub fn scheduler(&self) -> &SchedulerSection {
        &self.scheduler
    }

    pub fn dashboard(&self) -> &DashboardSection {
        &self.dashboard
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self::new_unchecked(SchedulerSection::default(), DashboardSection::default())
    }
}

/// `[scheduler]` section: how to reach the scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchedulerSection {
    /// Base URL of the scheduler's HTTP interface.
    #[serde(default = "default_url")]
    pub url: String,

    /// Use the built-in generator instead of a real scheduler.
    #[serde(default)]
    pub mock: bool,

    /// Seed for the generator when `mock = true`.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Per-request timeout of the HTTP transport.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_url() -> String {
    "http://localhost:9321".to_string()
}

fn default_seed() -> u64 {
    42
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for SchedulerSection {
    fn default() -> Self {
        Self {
            url: default_url(),
            mock: false,
            seed: default_seed(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// `[dashboard]` section: rendering and refresh settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DashboardSection {
    /// Clamp applied to task indentation in run details.
    #[serde(default = "default_max_indent")]
    pub max_indent: u32,

    /// Initial number of runs in the recent runs panel.
    #[serde(default = "default_recent_runs")]
    pub recent_runs: usize,

    /// Interval live panels start with.
    #[serde(default = "default_sync_seconds")]
    pub sync_seconds: u64,

    /// Interval a stopped panel is parked at.
    #[serde(default = "default_stopped_sync_seconds")]
    pub stopped_sync_seconds: u64,
}

fn default_max_indent() -> u32 {
    DEFAULT_MAX_INDENT
}

fn default_recent_runs() -> usize {
    10
}

fn default_sync_seconds() -> u64 {
    DEFAULT_SYNC_SECONDS
}

fn default_stopped_sync_seconds() -> u64 {
    SUSPENDED_SYNC_SECONDS
}

impl Default for DashboardSection {
    fn default() -> Self {
        Self {
            max_indent: default_max_indent(),
            recent_runs: default_recent_runs(),
            sync_seconds: default_sync_seconds(),
            stopped_sync_seconds: default_stopped_sync_seconds(),
        }
    }
}
