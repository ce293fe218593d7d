// src/errors.rs

//! Crate-wide error aliases and helpers.
//!
//! Every request into the dashboard core fails independently: none of these
//! errors is fatal to the process, and each carries enough context (which
//! argument, which identifiers, which upstream call) to be shown to a user.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    /// A run id, task id, retry or similar identifier could not be parsed at
    /// the boundary. Never reaches layout or aggregation logic.
    #[error("invalid argument `{field}` ({value:?}): {reason}")]
    InvalidArgument {
        field: &'static str,
        value: String,
        reason: String,
    },

    /// A task position string is not of the form `depth_width_indent`.
    #[error("malformed task position {input:?}: {reason}")]
    MalformedCoordinate { input: String, reason: String },

    /// One of the arguments that identify a single task was invalid.
    #[error("invalid task reference")]
    InvalidTaskReference(#[source] Box<DashboardError>),

    /// The scheduler query interface failed or returned an error.
    #[error("scheduler unavailable during {operation}")]
    UpstreamUnavailable {
        operation: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DashboardError {
    pub fn invalid_argument(
        field: &'static str,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        DashboardError::InvalidArgument {
            field,
            value: value.into(),
            reason: reason.into(),
        }
    }

    pub fn upstream(operation: impl Into<String>, source: impl Into<anyhow::Error>) -> Self {
        DashboardError::UpstreamUnavailable {
            operation: operation.into(),
            source: source.into(),
        }
    }

    /// Name of the offending argument, if this error came from boundary
    /// validation.
    pub fn invalid_field(&self) -> Option<&'static str> {
        match self {
            DashboardError::InvalidArgument { field, .. } => Some(field),
            DashboardError::MalformedCoordinate { .. } => Some("taskPos"),
            DashboardError::InvalidTaskReference(inner) => inner.invalid_field(),
            _ => None,
        }
    }

    /// Whether this failure came from the scheduler rather than from the
    /// caller's input.
    pub fn is_upstream(&self) -> bool {
        matches!(self, DashboardError::UpstreamUnavailable { .. })
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, DashboardError>;
