//! Composite policy configuration shared by the serial and parallel runners

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Serial composite configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerialConfig {
    /// Check the parent signal after each successful job and report a
    /// cancellation as that job's failure
    #[serde(default = "default_cancel_checkpoints")]
    pub cancel_checkpoints: bool,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            cancel_checkpoints: true,
        }
    }
}

/// Parallel composite configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParallelConfig {
    /// Drop failures caused by the batch's own cancellation instead of
    /// recording them
    #[serde(default = "default_suppress_cancellation")]
    pub suppress_cancellation: bool,
    #[serde(default)]
    pub failure_order: FailureOrder,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            suppress_cancellation: true,
            failure_order: FailureOrder::Completion,
        }
    }
}

/// Order of the records in a parallel aggregate error
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureOrder {
    /// The order jobs finished in; varies between runs
    #[default]
    Completion,
    /// Sorted by job position
    Index,
}

impl FailureOrder {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Completion => "completion",
            Self::Index => "index",
        }
    }
}

impl fmt::Display for FailureOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FailureOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "completion" => Ok(Self::Completion),
            "index" => Ok(Self::Index),
            other => Err(format!(
                "unknown failure order '{other}' (expected 'completion' or 'index')"
            )),
        }
    }
}

// Default value functions for serde
fn default_cancel_checkpoints() -> bool {
    true
}

fn default_suppress_cancellation() -> bool {
    true
}
