//! CLI error handling

use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;
use std::io;

use jobrun::{is_only_cancellation, BoxError, Cancelled, ParallelError, SerialError};
use jobrun_errors::{ConfigError, UserFacingError};
use thiserror::Error;

/// Failure of a single shell command job
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to wait for `{command}`: {source}")]
    Wait {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("`{command}` {}", describe_exit(*.code))]
    ExitStatus { command: String, code: Option<i32> },
}

fn describe_exit(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("exited with status {code}"),
        None => "was terminated by a signal".to_string(),
    }
}

impl UserFacingError for CommandError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::Spawn { .. } => Some("Check that `sh` is available on PATH."),
            _ => None,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        Some(match self {
            Self::Spawn { .. } => "command.spawn",
            Self::Wait { .. } => "command.wait",
            Self::ExitStatus { .. } => "command.exit_status",
        })
    }
}

/// CLI-specific error type
#[derive(Debug)]
pub enum CliError {
    /// Configuration error
    Config(ConfigError),
    /// A job run failed
    Job(BoxError),
}

impl CliError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Job(e) if is_only_cancellation(&**e) => 130,
            _ => 1,
        }
    }

    /// The user-facing view of a job error, when it has one
    fn user_facing<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a dyn UserFacingError> {
        if let Some(e) = err.downcast_ref::<SerialError>() {
            return Some(e);
        }
        if let Some(e) = err.downcast_ref::<ParallelError>() {
            return Some(e);
        }
        if let Some(e) = err.downcast_ref::<Cancelled>() {
            return Some(e);
        }
        err.downcast_ref::<CommandError>()
            .map(|e| e as &dyn UserFacingError)
    }

    /// Stable error code, if any
    pub fn code(&self) -> Option<&'static str> {
        match self {
            CliError::Config(e) => e.user_code(),
            CliError::Job(e) => Self::user_facing(&**e).and_then(|user| user.user_code()),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(e) => write!(f, "Configuration error: {e}"),
            CliError::Job(e) => {
                let Some(user) = Self::user_facing(&**e) else {
                    return write!(f, "{e}");
                };
                write!(f, "{}", user.user_message())?;
                if let Some(code) = user.user_code() {
                    write!(f, "\n  Code: {code}")?;
                }
                if let Some(hint) = user.user_hint() {
                    write!(f, "\n  Hint: {hint}")?;
                }
                if user.is_retryable() {
                    write!(f, "\n  Retry: safe to retry this operation.")?;
                }
                Ok(())
            }
        }
    }
}

impl StdError for CliError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::Job(e) => Some(&**e),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobrun::JobFailure;

    #[test]
    fn test_exit_status_message() {
        let err = CommandError::ExitStatus {
            command: "false".to_string(),
            code: Some(1),
        };
        assert_eq!(err.to_string(), "`false` exited with status 1");

        let err = CommandError::ExitStatus {
            command: "sleep 9".to_string(),
            code: None,
        };
        assert_eq!(err.to_string(), "`sleep 9` was terminated by a signal");
    }

    #[test]
    fn test_job_error_rendering() {
        let cause = CommandError::ExitStatus {
            command: "false".to_string(),
            code: Some(1),
        };
        let err = CliError::Job(SerialError::new(0, Some("check".to_string()), cause).into());
        let rendered = err.to_string();
        assert!(rendered.starts_with("job:check (serial job #0) failed: `false` exited"));
        assert!(rendered.contains("Code: job.serial_failed"));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_mixed_aggregate_is_a_real_failure() {
        let records = vec![
            JobFailure::new(0, None, "genuine boom"),
            JobFailure::new(1, None, Cancelled),
        ];
        let err = CliError::Job(ParallelError::new(records).unwrap().into());
        assert_eq!(err.exit_code(), 1);

        let records = vec![JobFailure::new(0, None, Cancelled)];
        let err = CliError::Job(ParallelError::new(records).unwrap().into());
        assert_eq!(err.exit_code(), 130);
    }

    #[test]
    fn test_cancelled_exit_code() {
        let err = CliError::Job(Cancelled.into());
        assert_eq!(err.exit_code(), 130);
        assert_eq!(err.code(), Some("job.cancelled"));
    }
}
