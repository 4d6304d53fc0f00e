//! Serial composite: one job at a time, stop at the first failure

use async_trait::async_trait;
use jobrun_config::SerialConfig;
use jobrun_errors::{BoxError, Cancelled, CompositeKind, SerialError};
use jobrun_events::{EventEmitter, EventSender};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::job::{display_name, Job};

const KIND: CompositeKind = CompositeKind::Serial;

/// Runs jobs in order; job `i + 1` starts only after job `i` succeeded
///
/// The first failure is returned as a [`SerialError`] carrying the job's
/// position and name, and the remaining jobs are never started. Every job
/// receives the caller's cancellation signal unchanged.
#[derive(Default)]
pub struct Serial {
    jobs: Vec<Box<dyn Job>>,
    config: SerialConfig,
    event_sender: Option<EventSender>,
}

impl Serial {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(mut self, config: SerialConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the event sender for job lifecycle reporting
    #[must_use]
    pub fn with_events(mut self, sender: EventSender) -> Self {
        self.event_sender = Some(sender);
        self
    }

    /// Append a job
    pub fn add(&mut self, job: impl Job + 'static) -> &mut Self {
        self.jobs.push(Box::new(job));
        self
    }

    /// Append several jobs, keeping their order
    pub fn add_all<I, J>(&mut self, jobs: I) -> &mut Self
    where
        I: IntoIterator<Item = J>,
        J: Job + 'static,
    {
        self.jobs
            .extend(jobs.into_iter().map(|job| Box::new(job) as Box<dyn Job>));
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    async fn run_job(
        &self,
        job: &dyn Job,
        cancel: &CancellationToken,
    ) -> Result<(), BoxError> {
        job.run(cancel).await?;
        if self.config.cancel_checkpoints && cancel.is_cancelled() {
            return Err(Cancelled.into());
        }
        Ok(())
    }
}

impl EventEmitter for Serial {
    fn event_sender(&self) -> Option<&EventSender> {
        self.event_sender.as_ref()
    }
}

#[async_trait]
impl Job for Serial {
    async fn run(&self, cancel: &CancellationToken) -> Result<(), BoxError> {
        self.emit_composite_started(KIND, self.jobs.len());

        for (index, job) in self.jobs.iter().enumerate() {
            let name = display_name(&**job);
            debug!(kind = %KIND, index, job = ?name, "starting job");
            self.emit_job_started(KIND, index, name.as_deref());

            if let Err(source) = self.run_job(&**job, cancel).await {
                let error = SerialError::new(index, name, source);
                warn!(kind = %KIND, index, job = ?error.name(), error = %error.cause(), "job failed");
                self.emit_job_failed(KIND, index, error.name(), error.cause().to_string());
                self.emit_composite_finished(KIND, 1, error.is_cancelled());
                return Err(error.into());
            }

            debug!(kind = %KIND, index, job = ?name, "job succeeded");
            self.emit_job_succeeded(KIND, index, name.as_deref());
        }

        self.emit_composite_finished(KIND, 0, false);
        Ok(())
    }
}
