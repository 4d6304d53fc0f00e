//! The job capability and the function adapter

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use jobrun_errors::BoxError;
use tokio_util::sync::CancellationToken;

/// A unit of work that runs to completion against a cancellation signal
///
/// Jobs are not preempted: a job that wants to stop early must watch
/// `cancel` itself, and should return [`Cancelled`](jobrun_errors::Cancelled)
/// (or an error wrapping it) when it stops because of it.
#[async_trait]
pub trait Job: Send + Sync {
    /// Run the job once
    ///
    /// # Errors
    ///
    /// Returns whatever cause made the job fail. Composites wrap their
    /// members' causes in [`SerialError`](jobrun_errors::SerialError) or
    /// [`ParallelError`](jobrun_errors::ParallelError).
    async fn run(&self, cancel: &CancellationToken) -> Result<(), BoxError>;

    /// Display name used to decorate failure messages
    ///
    /// Plain jobs have none; see [`named`](crate::named).
    fn name(&self) -> Option<&str> {
        None
    }
}

#[async_trait]
impl<J: Job + ?Sized> Job for Box<J> {
    async fn run(&self, cancel: &CancellationToken) -> Result<(), BoxError> {
        (**self).run(cancel).await
    }

    fn name(&self) -> Option<&str> {
        (**self).name()
    }
}

#[async_trait]
impl<J: Job + ?Sized> Job for Arc<J> {
    async fn run(&self, cancel: &CancellationToken) -> Result<(), BoxError> {
        (**self).run(cancel).await
    }

    fn name(&self) -> Option<&str> {
        (**self).name()
    }
}

/// A plain function run as a job
///
/// Built with [`job_fn`]. The function receives its own handle to the
/// cancellation signal so it can move it into the returned future.
#[derive(Clone)]
pub struct JobFn<F> {
    f: F,
}

/// Adapt `f` into a [`Job`]
pub fn job_fn<F, Fut>(f: F) -> JobFn<F>
where
    F: Fn(CancellationToken) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), BoxError>> + Send,
{
    JobFn { f }
}

#[async_trait]
impl<F, Fut> Job for JobFn<F>
where
    F: Fn(CancellationToken) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), BoxError>> + Send,
{
    async fn run(&self, cancel: &CancellationToken) -> Result<(), BoxError> {
        (self.f)(cancel.clone()).await
    }
}

/// Display name of `job`, with empty names treated as absent
pub(crate) fn display_name<J: Job + ?Sized>(job: &J) -> Option<String> {
    job.name().filter(|n| !n.is_empty()).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jobrun_errors::Cancelled;

    #[tokio::test]
    async fn test_job_fn_sees_cancellation() {
        let job = job_fn(|cancel: CancellationToken| async move {
            if cancel.is_cancelled() {
                Err::<(), BoxError>(Cancelled.into())
            } else {
                Ok(())
            }
        });

        let token = CancellationToken::new();
        assert!(job.run(&token).await.is_ok());
        token.cancel();
        let err = job.run(&token).await.unwrap_err();
        assert!(err.downcast_ref::<Cancelled>().is_some());
    }

    #[tokio::test]
    async fn test_boxed_and_shared_jobs_delegate() {
        let boxed: Box<dyn Job> =
            Box::new(job_fn(|_| async { Err::<(), BoxError>("boxed".into()) }));
        let err = boxed.run(&CancellationToken::new()).await.unwrap_err();
        assert_eq!(err.to_string(), "boxed");
        assert_eq!(boxed.name(), None);

        let shared: Arc<dyn Job> = Arc::new(crate::named(
            "shared",
            job_fn(|_| async { Ok::<(), BoxError>(()) }),
        ));
        assert_eq!(shared.name(), Some("shared"));
        assert_eq!(display_name(&shared), Some("shared".to_string()));
    }

    #[test]
    fn test_empty_name_is_absent() {
        let job = crate::named("", job_fn(|_| async { Ok::<(), BoxError>(()) }));
        assert_eq!(display_name(&job), None);
    }
}
