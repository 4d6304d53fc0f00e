use std::fmt;

use jobrun_errors::{CompositeKind, JobLabel};
use serde::{Deserialize, Serialize};

/// Lifecycle events of jobs driven by a serial or parallel composite
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JobEvent {
    /// A composite began driving its jobs
    CompositeStarted { kind: CompositeKind, jobs: usize },

    JobStarted {
        kind: CompositeKind,
        index: usize,
        name: Option<String>,
    },

    JobSucceeded {
        kind: CompositeKind,
        index: usize,
        name: Option<String>,
    },

    /// A genuine failure, recorded in the composite's error
    JobFailed {
        kind: CompositeKind,
        index: usize,
        name: Option<String>,
        error: String,
    },

    /// A job stopped because a sibling's failure cancelled the batch
    JobCancelled {
        kind: CompositeKind,
        index: usize,
        name: Option<String>,
    },

    /// Every job has returned
    CompositeFinished {
        kind: CompositeKind,
        failures: usize,
        cancelled: bool,
    },
}

impl JobEvent {
    #[must_use]
    pub fn kind(&self) -> CompositeKind {
        match self {
            Self::CompositeStarted { kind, .. }
            | Self::JobStarted { kind, .. }
            | Self::JobSucceeded { kind, .. }
            | Self::JobFailed { kind, .. }
            | Self::JobCancelled { kind, .. }
            | Self::CompositeFinished { kind, .. } => *kind,
        }
    }

    /// Determine the appropriate tracing log level for this event
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        use tracing::Level;

        match self {
            Self::JobFailed { .. } => Level::ERROR,
            Self::CompositeFinished { failures, .. } if *failures > 0 => Level::WARN,
            Self::JobStarted { .. } | Self::JobSucceeded { .. } | Self::JobCancelled { .. } => {
                Level::DEBUG
            }
            _ => Level::INFO,
        }
    }

    /// Get the log target for this event (for structured logging)
    #[must_use]
    pub fn log_target(&self) -> &'static str {
        match self.kind() {
            CompositeKind::Serial => "jobrun::events::serial",
            CompositeKind::Parallel => "jobrun::events::parallel",
        }
    }
}

impl fmt::Display for JobEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CompositeStarted { kind, jobs } => write!(f, "{kind} run started ({jobs} jobs)"),
            Self::JobStarted { kind, index, name } => {
                write!(f, "{} started", JobLabel::new(*kind, *index, name.as_deref()))
            }
            Self::JobSucceeded { kind, index, name } => {
                write!(f, "{} succeeded", JobLabel::new(*kind, *index, name.as_deref()))
            }
            Self::JobFailed {
                kind,
                index,
                name,
                error,
            } => write!(
                f,
                "{} failed: {error}",
                JobLabel::new(*kind, *index, name.as_deref())
            ),
            Self::JobCancelled { kind, index, name } => {
                write!(f, "{} cancelled", JobLabel::new(*kind, *index, name.as_deref()))
            }
            Self::CompositeFinished {
                kind,
                failures,
                cancelled,
            } => {
                write!(f, "{kind} run finished with {failures} failed jobs")?;
                if *cancelled {
                    f.write_str(" (cancelled)")?;
                }
                Ok(())
            }
        }
    }
}
