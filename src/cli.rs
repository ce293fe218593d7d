// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! Identifiers are kept as raw strings here. They are validated by
//! [`crate::dashboard::args`] so the CLI goes through the same boundary checks
//! as any other front end.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Command-line arguments for `dagboard`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "dagboard",
    version,
    about = "Query and watch DAG runs of a scheduler from the terminal.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Dagboard.toml` in the current working directory if present,
    /// otherwise built-in defaults.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `DAGBOARD_LOG` or a default level will be used.
    #[arg(long, global = true, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Use generated data instead of a running scheduler.
    #[arg(long, global = true)]
    pub mock: bool,

    /// Base URL of the scheduler, overriding the config file.
    #[arg(long, global = true, value_name = "URL")]
    pub scheduler_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List the most recent DAG runs.
    Runs {
        /// How many runs to list (default from config).
        #[arg(short = 'n', long = "num", value_name = "N")]
        num: Option<String>,
    },

    /// Show run and task counters.
    Stats,

    /// Show one DAG run with its tasks in tree order.
    Run {
        #[arg(value_name = "RUN_ID")]
        run_id: String,
    },

    /// Show one task attempt with freshly loaded logs.
    Task {
        #[arg(value_name = "RUN_ID")]
        run_id: String,

        #[arg(value_name = "TASK_ID")]
        task_id: String,

        #[arg(value_name = "RETRY")]
        retry: String,

        /// Position in `depth_width_indent` form.
        #[arg(value_name = "POS")]
        pos: String,

        /// Skip this many of the oldest log records.
        #[arg(long, default_value_t = 0)]
        offset: usize,

        /// Keep at most this many log records.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Keep a panel refreshed, printing each update.
    Watch {
        #[arg(value_enum)]
        panel: WatchPanel,

        /// Run id, required for the `run` panel.
        #[arg(long, value_name = "RUN_ID")]
        run_id: Option<String>,

        /// Stop after this many refreshes (default: until Ctrl-C).
        #[arg(long, value_name = "K")]
        iterations: Option<u64>,

        /// Refresh interval in seconds (default from config).
        #[arg(long, value_name = "SECONDS")]
        interval: Option<String>,
    },

    /// Show the scheduler's state.
    State,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum WatchPanel {
    Stats,
    Runs,
    Run,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
