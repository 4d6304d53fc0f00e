//! Serial composite failure

use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;

use crate::{chain, non_empty, BoxError, CompositeKind, JobLabel, UserFacingError};

/// The first job of a serial run that failed.
///
/// Renders as `serial job #<index> failed: <cause>`, or
/// `job:<name> (serial job #<index>) failed: <cause>` for a named job.
#[derive(Debug)]
pub struct SerialError {
    index: usize,
    name: Option<String>,
    source: BoxError,
}

impl SerialError {
    /// Wrap the failure of the job at zero-based position `index`.
    #[must_use]
    pub fn new(index: usize, name: Option<String>, source: impl Into<BoxError>) -> Self {
        Self {
            index,
            name: non_empty(name),
            source: source.into(),
        }
    }

    /// Zero-based position of the failed job.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Display name of the failed job, if it had one.
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

    /// Whether the job stopped because the cancellation signal fired.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        chain::is_only_cancellation(self.cause())
    }

    fn label(&self) -> JobLabel<'_> {
        JobLabel::new(CompositeKind::Serial, self.index, self.name())
    }
}

impl fmt::Display for SerialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed: {}", self.label(), self.source)
    }
}

impl StdError for SerialError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        let cause: &(dyn StdError + 'static) = &*self.source;
        Some(cause)
    }
}

impl UserFacingError for SerialError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        if self.is_cancelled() {
            Some("The run was cancelled before this job could finish.")
        } else {
            Some("Jobs after the failed one were not started; fix the failure and rerun.")
        }
    }

    fn is_retryable(&self) -> bool {
        self.is_cancelled()
    }

    fn user_code(&self) -> Option<&'static str> {
        Some("job.serial_failed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Cancelled;
    use std::io;

    #[test]
    fn test_serial_error_display() {
        let err = SerialError::new(123, None, "hello world");
        assert_eq!(err.to_string(), "serial job #123 failed: hello world");

        let err = SerialError::new(123, Some("foobar".into()), "hello world");
        assert_eq!(
            err.to_string(),
            "job:foobar (serial job #123) failed: hello world"
        );
    }

    #[test]
    fn test_serial_error_empty_name_is_unnamed() {
        let err = SerialError::new(4, Some(String::new()), "boom");
        assert_eq!(err.name(), None);
        assert_eq!(err.to_string(), "serial job #4 failed: boom");
    }

    #[test]
    fn test_serial_error_display_is_stable() {
        let err = SerialError::new(1, Some("bar".into()), "expected failure");
        assert_eq!(err.to_string(), err.to_string());
    }

    #[test]
    fn test_serial_error_source() {
        let err = SerialError::new(0, None, io::Error::from(io::ErrorKind::UnexpectedEof));
        let source = err.source().expect("source");
        let io_err = source.downcast_ref::<io::Error>().expect("io error");
        assert_eq!(io_err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_serial_error_cancelled() {
        let err = SerialError::new(2, None, Cancelled);
        assert!(err.is_cancelled());
        assert!(err.is_retryable());

        let err = SerialError::new(2, None, "plain failure");
        assert!(!err.is_cancelled());
    }
}
