// src/dag/mod.rs

//! DAG run shapes and their layout for display.
//!
//! - [`position`] defines task coordinates and their `depth_width_indent`
//!   wire form.
//! - [`run`] holds the display types for runs and tasks.
//! - [`layout`] sorts a run's tasks into tree order and derives indentation.

pub mod layout;
pub mod position;
pub mod run;

pub use layout::{layout_run_tasks, layout_tasks};
pub use position::{DEFAULT_MAX_INDENT, TaskPosition, clamp_indent};
pub use run::{RunDetail, RunSummaryRow, RunTask};
