//! jobrun - run shell commands as serial or parallel jobs
//!
//! Every JOB argument becomes a shell command job. `serial` runs them in
//! order and stops at the first failure; `parallel` runs them at once and
//! cancels the rest when one fails.

mod cli;
mod command;
mod error;
mod events;
mod logging;

use std::process;
use std::time::Duration;

use clap::Parser;
use jobrun::{CancellationToken, Config, EventReceiver, EventSender, Job, Parallel, Serial};
use tokio::select;
use tracing::{error, info, warn};

use crate::cli::{Cli, Commands};
use crate::command::CommandJob;
use crate::error::CliError;
use crate::events::EventPrinter;

#[tokio::main]
async fn main() {
    // Parse command line arguments first to check for JSON mode
    let cli = Cli::parse();
    let json_mode = cli.global.json;

    logging::init_tracing(json_mode, cli.global.debug);

    if let Err(e) = run(cli).await {
        error!("jobrun failed: {}", e);
        if json_mode {
            println!(
                "{}",
                serde_json::json!({
                    "type": "error",
                    "message": e.to_string(),
                    "code": e.code(),
                })
            );
        } else {
            eprintln!("Error: {e}");
        }
        process::exit(e.exit_code());
    }
}

/// Main application logic
async fn run(cli: Cli) -> Result<(), CliError> {
    info!("Starting jobrun v{}", env!("CARGO_PKG_VERSION"));

    // 1. File config (or defaults), 2. environment, 3. CLI flags
    let mut config = Config::load_or_default(cli.global.config.as_deref()).await?;
    config.merge_env()?;
    apply_cli_config(&mut config, &cli.command);

    let (event_sender, event_receiver) = jobrun::channel();
    let job = build_job(cli.command, &config, event_sender, cli.global.json);

    let cancel = CancellationToken::new();
    watch_for_cancellation(&cancel, cli.global.timeout.map(Duration::from_secs));

    let printer = EventPrinter::new(cli.global.json);
    run_with_events(job.as_ref(), &cancel, event_receiver, &printer).await?;

    info!("All jobs completed successfully");
    Ok(())
}

fn apply_cli_config(config: &mut Config, command: &Commands) {
    if let Commands::Parallel {
        failure_order: Some(order),
        ..
    } = command
    {
        config.parallel.failure_order = *order;
    }
}

fn build_job(
    command: Commands,
    config: &Config,
    events: EventSender,
    json_mode: bool,
) -> Box<dyn Job> {
    let into_job = |spec| CommandJob::new(spec).quiet_stdout(json_mode);
    match command {
        Commands::Serial { jobs } => {
            let mut serial = Serial::new()
                .with_config(config.serial)
                .with_events(events);
            serial.add_all(jobs.into_iter().map(into_job));
            Box::new(serial)
        }
        Commands::Parallel { jobs, .. } => {
            let mut parallel = Parallel::new()
                .with_config(config.parallel)
                .with_events(events);
            parallel.add_all(jobs.into_iter().map(into_job));
            Box::new(parallel)
        }
    }
}

/// Cancel `cancel` on Ctrl-C or once `timeout` has elapsed
fn watch_for_cancellation(cancel: &CancellationToken, timeout: Option<Duration>) {
    let token = cancel.clone();
    tokio::spawn(async move {
        select! {
            () = interrupted() => info!("Interrupt received, cancelling jobs"),
            () = deadline(timeout) => warn!(?timeout, "Timeout reached, cancelling jobs"),
        }
        token.cancel();
    });
}

async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Cannot listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

async fn deadline(timeout: Option<Duration>) {
    match timeout {
        Some(limit) => tokio::time::sleep(limit).await,
        None => std::future::pending::<()>().await,
    }
}

/// Run the job while printing its events
async fn run_with_events(
    job: &dyn Job,
    cancel: &CancellationToken,
    mut event_receiver: EventReceiver,
    printer: &EventPrinter,
) -> Result<(), CliError> {
    let mut job_future = job.run(cancel);

    loop {
        select! {
            // Job completed
            result = &mut job_future => {
                // Drain any remaining events
                while let Ok(event) = event_receiver.try_recv() {
                    printer.handle_event(&event);
                }
                return result.map_err(CliError::Job);
            }

            // Event received
            Some(event) = event_receiver.recv() => printer.handle_event(&event),
        }
    }
}
