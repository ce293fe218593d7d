// src/logs/mod.rs

//! Task log windows.
//!
//! - [`window`] defines [`LogWindow`] and [`LogRecord`].
//! - [`loader`] builds windows from scheduler responses, either passed
//!   through from a run or fetched on demand for one task.

pub mod loader;
pub mod window;

pub use loader::{
    TaskLogSnapshot, WindowBounds, default_window, load_task_window, load_task_window_raw,
};
pub use window::{LogRecord, LogWindow};
