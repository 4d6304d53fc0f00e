#![warn(mismatched_lifetime_syntaxes)]
#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Error types for jobrun
//!
//! This crate holds the failure records produced by the serial and parallel
//! composites, the cancellation notification, and the helpers that walk a
//! cause chain (membership test and typed extraction) through any number of
//! wrapping layers, including aggregates of concurrent failures.

use std::borrow::Cow;
use std::fmt;

pub mod cancel;
pub mod chain;
pub mod config;
pub mod parallel;
pub mod serial;

// Re-export all error types at the root
pub use cancel::Cancelled;
pub use chain::{any_cause, contains_message, find, is, is_cancelled, is_only_cancellation};
pub use config::ConfigError;
pub use parallel::{JobFailure, JobPanicked, ParallelError};
pub use serial::SerialError;

/// Boxed cause returned by a job.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Which composite produced a failure record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CompositeKind {
    Serial,
    Parallel,
}

impl CompositeKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Serial => "serial",
            Self::Parallel => "parallel",
        }
    }
}

impl fmt::Display for CompositeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Position marker of a job, optionally prefixed with its display name.
///
/// Renders `serial job #3` or `job:fetch (serial job #3)`.
#[derive(Clone, Copy, Debug)]
pub struct JobLabel<'a> {
    pub kind: CompositeKind,
    pub index: usize,
    pub name: Option<&'a str>,
}

impl<'a> JobLabel<'a> {
    #[must_use]
    pub fn new(kind: CompositeKind, index: usize, name: Option<&'a str>) -> Self {
        Self {
            kind,
            index,
            name: name.filter(|n| !n.is_empty()),
        }
    }
}

impl fmt::Display for JobLabel<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name {
            Some(name) => write!(f, "job:{name} ({} job #{})", self.kind, self.index),
            None => write!(f, "{} job #{}", self.kind, self.index),
        }
    }
}

/// Normalise an optional display name: empty names count as absent.
pub(crate) fn non_empty(name: Option<String>) -> Option<String> {
    name.filter(|n| !n.is_empty())
}

/// Minimal interface for rendering user-facing error information without
/// requiring heavyweight envelopes.
pub trait UserFacingError {
    /// Short message suitable for CLI output.
    fn user_message(&self) -> Cow<'_, str>;

    /// Optional remediation hint.
    fn user_hint(&self) -> Option<&'static str> {
        None
    }

    /// Whether retrying the same operation is likely to succeed.
    fn is_retryable(&self) -> bool {
        false
    }

    /// Stable error code for analytics / structured reporting.
    fn user_code(&self) -> Option<&'static str> {
        None
    }
}
