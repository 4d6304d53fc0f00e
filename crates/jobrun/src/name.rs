//! Naming decorator

use std::future::Future;

use async_trait::async_trait;
use jobrun_errors::BoxError;
use tokio_util::sync::CancellationToken;

use crate::job::{job_fn, Job, JobFn};

/// A job carrying a display name
///
/// Failures of a named job render as `job:<name> (serial job #<n>) ...`.
pub struct Named<J> {
    name: String,
    job: J,
}

impl<J> Named<J> {
    #[must_use]
    pub fn into_inner(self) -> J {
        self.job
    }
}

/// Attach a display name to `job`
pub fn named<J: Job>(name: impl Into<String>, job: J) -> Named<J> {
    Named {
        name: name.into(),
        job,
    }
}

/// Attach a display name to a plain function
pub fn named_fn<F, Fut>(name: impl Into<String>, f: F) -> Named<JobFn<F>>
where
    F: Fn(CancellationToken) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), BoxError>> + Send,
{
    named(name, job_fn(f))
}

#[async_trait]
impl<J: Job> Job for Named<J> {
    async fn run(&self, cancel: &CancellationToken) -> Result<(), BoxError> {
        self.job.run(cancel).await
    }

    fn name(&self) -> Option<&str> {
        Some(&self.name)
    }
}
