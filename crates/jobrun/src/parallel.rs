//! Parallel composite: every job at once, cancel the batch on failure

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use jobrun_config::{FailureOrder, ParallelConfig};
use jobrun_errors::{
    is_only_cancellation, BoxError, Cancelled, CompositeKind, JobFailure, JobPanicked,
    ParallelError,
};
use jobrun_events::{EventEmitter, EventSender};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::job::{display_name, Job};

const KIND: CompositeKind = CompositeKind::Parallel;

/// Runs every job concurrently on its own task
///
/// All jobs share one cancellation signal derived from the caller's. The
/// first job to fail on its own cancels that signal so its siblings can wind
/// down; cancelling it never reaches the caller's signal. `run` returns only
/// after every job has returned.
///
/// Failures caused by that cancellation are not recorded. A nested
/// aggregate counts as cancellation only when all of its records do. If any genuine
/// failure remains, the result is a [`ParallelError`] holding all of them.
/// If there is none but the caller's own signal was cancelled, the result is
/// [`Cancelled`].
#[derive(Default)]
pub struct Parallel {
    jobs: Vec<Arc<dyn Job>>,
    config: ParallelConfig,
    event_sender: Option<EventSender>,
}

impl Parallel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(mut self, config: ParallelConfig) -> Self {
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
        self.jobs.push(Arc::new(job));
        self
    }

    /// Append several jobs
    pub fn add_all<I, J>(&mut self, jobs: I) -> &mut Self
    where
        I: IntoIterator<Item = J>,
        J: Job + 'static,
    {
        self.jobs
            .extend(jobs.into_iter().map(|job| Arc::new(job) as Arc<dyn Job>));
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

    /// Whether `err` is noise from the batch's own cancellation
    fn is_suppressed(&self, err: &BoxError) -> bool {
        self.config.suppress_cancellation && is_only_cancellation(&**err)
    }
}

impl EventEmitter for Parallel {
    fn event_sender(&self) -> Option<&EventSender> {
        self.event_sender.as_ref()
    }
}

/// Run one job, turning a panic into a failure
async fn run_isolated(job: &dyn Job, cancel: &CancellationToken) -> Result<(), BoxError> {
    match AssertUnwindSafe(job.run(cancel)).catch_unwind().await {
        Ok(result) => result,
        Err(payload) => Err(JobPanicked::from_payload(&*payload).into()),
    }
}

#[async_trait]
impl Job for Parallel {
    async fn run(&self, cancel: &CancellationToken) -> Result<(), BoxError> {
        let batch = cancel.child_token();
        // Released jobs still see cancellation if this future is dropped early
        let _batch_guard = batch.clone().drop_guard();

        self.emit_composite_started(KIND, self.jobs.len());

        let mut tasks = JoinSet::new();
        for (index, job) in self.jobs.iter().enumerate() {
            let name = display_name(&**job);
            debug!(kind = %KIND, index, job = ?name, "starting job");
            self.emit_job_started(KIND, index, name.as_deref());

            let job = Arc::clone(job);
            let batch = batch.clone();
            let suppress = self.config.suppress_cancellation;
            tasks.spawn(async move {
                let result = run_isolated(&*job, &batch).await;
                if let Err(err) = &result {
                    if !(suppress && is_only_cancellation(&**err)) {
                        batch.cancel();
                    }
                }
                (index, name, result)
            });
        }

        let mut failures = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            let (index, name, result) = match joined {
                Ok(outcome) => outcome,
                Err(join_error) => {
                    // Panics are caught inside the task, so only runtime
                    // shutdown lands here
                    warn!(kind = %KIND, error = %join_error, "job task did not complete");
                    continue;
                }
            };

            match result {
                Ok(()) => {
                    debug!(kind = %KIND, index, job = ?name, "job succeeded");
                    self.emit_job_succeeded(KIND, index, name.as_deref());
                }
                Err(err) if self.is_suppressed(&err) => {
                    debug!(kind = %KIND, index, job = ?name, "job stopped by cancellation");
                    self.emit_job_cancelled(KIND, index, name.as_deref());
                }
                Err(err) => {
                    warn!(kind = %KIND, index, job = ?name, error = %err, "job failed");
                    self.emit_job_failed(KIND, index, name.as_deref(), err.to_string());
                    failures.push(JobFailure::new(index, name, err));
                }
            }
        }

        if self.config.failure_order == FailureOrder::Index {
            failures.sort_by_key(JobFailure::index);
        }

        let parent_cancelled = cancel.is_cancelled();
        self.emit_composite_finished(KIND, failures.len(), parent_cancelled);

        if let Some(error) = ParallelError::new(failures) {
            return Err(error.into());
        }
        if parent_cancelled {
            return Err(Cancelled.into());
        }
        Ok(())
    }
}
