//! Parallel composite failures

use std::any::Any;
use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;

use crate::{chain, non_empty, BoxError, CompositeKind, JobLabel, UserFacingError};
use thiserror::Error;

/// A parallel job panicked instead of returning.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[error("job panicked: {message}")]
pub struct JobPanicked {
    pub message: String,
}

impl JobPanicked {
    /// Build from the payload captured by `catch_unwind`.
    #[must_use]
    pub fn from_payload(payload: &(dyn Any + Send)) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string());
        Self { message }
    }
}

/// One failed job of a parallel run.
///
/// Renders as `parallel job #<index> failed: <cause>`, or
/// `job:<name> (parallel job #<index>) failed: <cause>` for a named job.
#[derive(Debug)]
pub struct JobFailure {
    index: usize,
    name: Option<String>,
    source: BoxError,
}

impl JobFailure {
    #[must_use]
    pub fn new(index: usize, name: Option<String>, source: impl Into<BoxError>) -> Self {
        Self {
            index,
            name: non_empty(name),
            source: source.into(),
        }
    }

    /// Zero-based position of the job in its composite.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The cause the job returned.
    #[must_use]
    pub fn cause(&self) -> &(dyn StdError + Send + Sync + 'static) {
        &*self.source
    }

    #[must_use]
    pub fn into_cause(self) -> BoxError {
        self.source
    }
}

impl fmt::Display for JobFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = JobLabel::new(CompositeKind::Parallel, self.index, self.name());
        write!(f, "{label} failed: {}", self.source)
    }
}

impl StdError for JobFailure {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        let cause: &(dyn StdError + 'static) = &*self.source;
        Some(cause)
    }
}

/// Every genuine failure collected from one parallel run.
///
/// Never empty. Records are kept in the order the jobs finished unless the
/// composite was configured to sort them by position. Membership tests and
/// typed extraction look at every record; the message and `source()` come
/// from the first one.
#[derive(Debug)]
pub struct ParallelError {
    failures: Vec<JobFailure>,
}

impl ParallelError {
    /// Aggregate `failures`, or `None` when there are none.
    #[must_use]
    pub fn new(failures: Vec<JobFailure>) -> Option<Self> {
        if failures.is_empty() {
            None
        } else {
            Some(Self { failures })
        }
    }

    #[must_use]
    pub fn failures(&self) -> &[JobFailure] {
        &self.failures
    }

    /// Number of recorded failures, always at least one.
    #[must_use]
    pub fn len(&self) -> usize {
        self.failures.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, JobFailure> {
        self.failures.iter()
    }

    #[must_use]
    pub fn into_failures(self) -> Vec<JobFailure> {
        self.failures
    }

    /// The first record in aggregate order.
    #[must_use]
    pub fn first(&self) -> &JobFailure {
        &self.failures[0]
    }

    /// Reorder records by job position.
    pub fn sort_by_index(&mut self) {
        self.failures.sort_by_key(JobFailure::index);
    }

    /// Whether any record's cause chain contains `target`.
    #[must_use]
    pub fn is<T>(&self, target: &T) -> bool
    where
        T: StdError + PartialEq + 'static,
    {
        chain::is(self, target)
    }

    /// The first `T` found walking the records in order.
    #[must_use]
    pub fn find<T>(&self) -> Option<&T>
    where
        T: StdError + 'static,
    {
        chain::find(self)
    }
}

impl<'a> IntoIterator for &'a ParallelError {
    type Item = &'a JobFailure;
    type IntoIter = std::slice::Iter<'a, JobFailure>;

    fn into_iter(self) -> Self::IntoIter {
        self.failures.iter()
    }
}

impl IntoIterator for ParallelError {
    type Item = JobFailure;
    type IntoIter = std::vec::IntoIter<JobFailure>;

    fn into_iter(self) -> Self::IntoIter {
        self.failures.into_iter()
    }
}

impl fmt::Display for ParallelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.first(), f)
    }
}

impl StdError for ParallelError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        let cause: &(dyn StdError + 'static) = self.first().cause();
        Some(cause)
    }
}

impl UserFacingError for ParallelError {
    fn user_message(&self) -> Cow<'_, str> {
        match self.failures.len() {
            1 => Cow::Owned(self.to_string()),
            n => Cow::Owned(format!("{} (and {} more failed jobs)", self, n - 1)),
        }
    }

    fn user_hint(&self) -> Option<&'static str> {
        Some("Remaining jobs were asked to stop after the first failure.")
    }

    fn user_code(&self) -> Option<&'static str> {
        Some("job.parallel_failed")
    }
}
