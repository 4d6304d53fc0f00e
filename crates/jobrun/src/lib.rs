#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Serial and parallel job composition for jobrun
//!
//! A [`Job`] is a unit of work run against a [`CancellationToken`]. [`Serial`]
//! runs its jobs one after another and stops at the first failure.
//! [`Parallel`] runs them all at once, cancels the batch on the first genuine
//! failure, waits for every job, and returns each failure it collected.
//! Both composites are jobs themselves, so they nest freely.
//!
//! Failures keep the failing job's position and name, and the original cause
//! stays reachable through [`is`] and [`find`] however deep it is wrapped.

mod job;
mod name;
mod parallel;
mod serial;

pub use job::{job_fn, Job, JobFn};
pub use name::{named, named_fn, Named};
pub use parallel::Parallel;
pub use serial::Serial;

pub use jobrun_config::{Config, FailureOrder, ParallelConfig, SerialConfig};
pub use jobrun_errors::{
    any_cause, contains_message, find, is, is_cancelled, is_only_cancellation, BoxError,
    Cancelled, CompositeKind, JobFailure, JobPanicked, ParallelError, SerialError,
    UserFacingError,
};
pub use jobrun_events::{channel, EventReceiver, EventSender, JobEvent};
pub use tokio_util::sync::CancellationToken;
