// src/dag/position.rs

//! Task position coordinates within a DAG run.
//!
//! A position is `(depth, width)`: the topological level of a task (root is
//! depth 1) and its ordinal among siblings on that level. `indent` is a
//! display-only value derived from depth and is never trusted from input.
//!
//! Positions travel to and from the presentation layer as a compact routable
//! string `"{depth}_{width}_{indent}"`.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::{DashboardError, Result};

/// Default clamp applied to rendered indentation.
pub const DEFAULT_MAX_INDENT: u32 = 10;

const WIRE_SEPARATOR: char = '_';
const WIRE_FIELDS: usize = 3;

static SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("segment pattern is valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPosition {
    pub depth: u32,
    pub width: u32,
    pub indent: u32,
}

impl TaskPosition {
    /// Position with `indent` derived from `depth` and the given clamp.
    pub fn new(depth: u32, width: u32, max_indent: u32) -> Self {
        Self {
            depth,
            width,
            indent: clamp_indent(depth, max_indent),
        }
    }

    /// Same coordinates with `indent` recomputed, discarding whatever indent
    /// the value carried before.
    pub fn reindented(self, max_indent: u32) -> Self {
        Self::new(self.depth, self.width, max_indent)
    }

    pub fn encode(&self) -> String {
        format!(
            "{}{sep}{}{sep}{}",
            self.depth,
            self.width,
            self.indent,
            sep = WIRE_SEPARATOR
        )
    }

    /// Decode the `depth_width_indent` wire form.
    ///
    /// The decoded indent is kept as-is; it only matters for routing.
    pub fn decode(input: &str) -> Result<Self> {
        let parts: Vec<&str> = input.split(WIRE_SEPARATOR).collect();
        if parts.len() != WIRE_FIELDS {
            return Err(DashboardError::MalformedCoordinate {
                input: input.to_string(),
                reason: format!(
                    "expected {WIRE_FIELDS} `{WIRE_SEPARATOR}`-separated fields (depth_width_indent), got {}",
                    parts.len()
                ),
            });
        }

        let mut values = [0u32; WIRE_FIELDS];
        for (slot, (name, raw)) in values
            .iter_mut()
            .zip(["depth", "width", "indent"].into_iter().zip(parts))
        {
            *slot = parse_segment(input, name, raw)?;
        }

        Ok(Self {
            depth: values[0],
            width: values[1],
            indent: values[2],
        })
    }
}

fn parse_segment(input: &str, name: &str, raw: &str) -> Result<u32> {
    if !SEGMENT.is_match(raw) {
        return Err(DashboardError::MalformedCoordinate {
            input: input.to_string(),
            reason: format!("{name} ({raw:?}) is not a non-negative integer"),
        });
    }
    raw.parse::<u32>()
        .map_err(|e| DashboardError::MalformedCoordinate {
            input: input.to_string(),
            reason: format!("{name} ({raw:?}) is out of range: {e}"),
        })
}

/// `min(depth, max_indent)`.
pub fn clamp_indent(depth: u32, max_indent: u32) -> u32 {
    depth.min(max_indent)
}

impl fmt::Display for TaskPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for TaskPosition {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self> {
        TaskPosition::decode(s)
    }
}
