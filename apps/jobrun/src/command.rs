//! Shell commands as jobs

use std::process::Stdio;

use async_trait::async_trait;
use jobrun::{BoxError, Cancelled, CancellationToken, Job};
use tokio::process::Command;
use tracing::debug;

use crate::cli::JobSpec;
use crate::error::CommandError;

/// Runs `sh -c <command>` and kills it when cancelled
pub struct CommandJob {
    name: Option<String>,
    command: String,
    quiet: bool,
}

impl CommandJob {
    pub fn new(spec: JobSpec) -> Self {
        Self {
            name: spec.name,
            command: spec.command,
            quiet: false,
        }
    }

    /// Send the command's stdout to stderr, keeping stdout for JSON output
    #[must_use]
    pub fn quiet_stdout(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }
}

#[async_trait]
impl Job for CommandJob {
    async fn run(&self, cancel: &CancellationToken) -> Result<(), BoxError> {
        let mut command = Command::new("sh");
        command.arg("-c").arg(&self.command).kill_on_drop(true);
        if self.quiet {
            command.stdout(Stdio::from(std::io::stderr()));
        }

        let mut child = command.spawn().map_err(|source| CommandError::Spawn {
            command: self.command.clone(),
            source,
        })?;
        debug!(command = %self.command, pid = ?child.id(), "command started");

        let status = tokio::select! {
            status = child.wait() => Some(status),
            () = cancel.cancelled() => None,
        };

        let Some(status) = status else {
            debug!(command = %self.command, "cancelled, killing command");
            child.kill().await.map_err(|source| CommandError::Wait {
                command: self.command.clone(),
                source,
            })?;
            return Err(Cancelled.into());
        };

        let status = status.map_err(|source| CommandError::Wait {
            command: self.command.clone(),
            source,
        })?;
        if status.success() {
            Ok(())
        } else {
            Err(CommandError::ExitStatus {
                command: self.command.clone(),
                code: status.code(),
            }
            .into())
        }
    }

    fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn job(command: &str) -> CommandJob {
        CommandJob::new(command.parse().unwrap()).quiet_stdout(true)
    }

    #[tokio::test]
    async fn test_successful_command() {
        assert!(job("true").run(&CancellationToken::new()).await.is_ok());
    }

    #[tokio::test]
    async fn test_failing_command_reports_status() {
        let err = job("exit 3").run(&CancellationToken::new()).await.unwrap_err();
        match err.downcast_ref::<CommandError>() {
            Some(CommandError::ExitStatus { code, .. }) => assert_eq!(*code, Some(3)),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_cancel_kills_command() {
        let token = CancellationToken::new();
        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            canceller.cancel();
        });

        let err = tokio::time::timeout(Duration::from_secs(10), job("sleep 30").run(&token))
            .await
            .expect("cancelled command should return promptly")
            .unwrap_err();
        assert!(err.downcast_ref::<Cancelled>().is_some());
    }

    #[test]
    fn test_name_comes_from_job_argument() {
        assert_eq!(job("lint=cargo clippy").name(), Some("lint"));
        assert_eq!(job("cargo clippy").name(), None);
    }
}
