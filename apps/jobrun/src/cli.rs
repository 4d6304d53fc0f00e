//! Command line interface definition

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use clap::{Parser, Subcommand};
use jobrun_config::FailureOrder;

/// jobrun - run shell commands as serial or parallel jobs
#[derive(Parser)]
#[command(name = "jobrun")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Run shell commands as serial or parallel jobs")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Global arguments available for all commands
#[derive(Parser)]
pub struct GlobalArgs {
    /// Print events and the final error as JSON lines
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable debug logging on stderr
    #[arg(long, global = true)]
    pub debug: bool,

    /// Use alternate config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Cancel every job after this many seconds
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Run jobs one after another, stopping at the first failure
    #[command(alias = "s")]
    Serial {
        /// Jobs as `name=command` or a bare shell command
        #[arg(required = true, value_name = "JOB")]
        jobs: Vec<JobSpec>,
    },

    /// Run jobs concurrently, cancelling the rest on the first failure
    #[command(alias = "p")]
    Parallel {
        /// Order of reported failures: completion or index
        #[arg(long, value_name = "ORDER")]
        failure_order: Option<FailureOrder>,

        /// Jobs as `name=command` or a bare shell command
        #[arg(required = true, value_name = "JOB")]
        jobs: Vec<JobSpec>,
    },
}

/// One job given on the command line
///
/// `build=make all` names the job `build`. Anything whose text before the
/// first `=` is not a plain word (letters, digits, `-`, `_`, `.`) is taken
/// as a bare command, so `echo a=b` stays unnamed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSpec {
    pub name: Option<String>,
    pub command: String,
}

fn is_job_name(candidate: &str) -> bool {
    !candidate.is_empty()
        && candidate
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

impl FromStr for JobSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, command) = match s.split_once('=') {
            Some((name, command)) if is_job_name(name) => (Some(name.to_string()), command),
            _ => (None, s),
        };

        if command.trim().is_empty() {
            return Err(format!("job `{s}` has no command"));
        }

        Ok(Self {
            name,
            command: command.to_string(),
        })
    }
}

impl fmt::Display for JobSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{name}={}", self.command),
            None => f.write_str(&self.command),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_job() {
        let spec: JobSpec = "build=make all".parse().unwrap();
        assert_eq!(spec.name.as_deref(), Some("build"));
        assert_eq!(spec.command, "make all");
        assert_eq!(spec.to_string(), "build=make all");
    }

    #[test]
    fn test_bare_job_with_equals_sign() {
        let spec: JobSpec = "echo a=b".parse().unwrap();
        assert_eq!(spec.name, None);
        assert_eq!(spec.command, "echo a=b");
    }

    #[test]
    fn test_empty_command_rejected() {
        assert!("lint=".parse::<JobSpec>().is_err());
        assert!("   ".parse::<JobSpec>().is_err());
    }

    #[test]
    fn test_parse_parallel_command() {
        let cli = Cli::try_parse_from([
            "jobrun",
            "--timeout",
            "5",
            "parallel",
            "--failure-order",
            "index",
            "a=true",
            "false",
        ])
        .unwrap();

        assert_eq!(cli.global.timeout, Some(5));
        match cli.command {
            Commands::Parallel {
                failure_order,
                jobs,
            } => {
                assert_eq!(failure_order, Some(FailureOrder::Index));
                assert_eq!(jobs.len(), 2);
                assert_eq!(jobs[1].command, "false");
            }
            Commands::Serial { .. } => panic!("expected parallel command"),
        }
    }

    #[test]
    fn test_jobs_required() {
        assert!(Cli::try_parse_from(["jobrun", "serial"]).is_err());
    }
}
