#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Event system for jobrun composites
//!
//! Composites report the lifecycle of every job they drive as [`JobEvent`]s
//! on an unbounded channel. Nothing is sent unless a caller attached a sender,
//! and a dropped receiver never affects a run.

pub mod job;
pub use job::JobEvent;

pub use jobrun_errors::CompositeKind;

use tokio::sync::mpsc::UnboundedSender;

/// Type alias for the job event sender
pub type EventSender = UnboundedSender<JobEvent>;

/// Type alias for the job event receiver
pub type EventReceiver = tokio::sync::mpsc::UnboundedReceiver<JobEvent>;

/// Create a new job event channel
#[must_use]
pub fn channel() -> (EventSender, EventReceiver) {
    tokio::sync::mpsc::unbounded_channel()
}

/// The unified trait for emitting job events
///
/// Implemented by raw senders and by anything that optionally holds one.
pub trait EventEmitter {
    /// Get the event sender for this emitter
    fn event_sender(&self) -> Option<&EventSender>;

    /// Emit an event through this emitter
    fn emit(&self, event: JobEvent) {
        if let Some(sender) = self.event_sender() {
            // Ignore send errors - if receiver is dropped, we just continue
            let _ = sender.send(event);
        }
    }

    fn emit_composite_started(&self, kind: CompositeKind, jobs: usize) {
        self.emit(JobEvent::CompositeStarted { kind, jobs });
    }

    fn emit_job_started(&self, kind: CompositeKind, index: usize, name: Option<&str>) {
        self.emit(JobEvent::JobStarted {
            kind,
            index,
            name: name.map(str::to_string),
        });
    }

    fn emit_job_succeeded(&self, kind: CompositeKind, index: usize, name: Option<&str>) {
        self.emit(JobEvent::JobSucceeded {
            kind,
            index,
            name: name.map(str::to_string),
        });
    }

    fn emit_job_failed(
        &self,
        kind: CompositeKind,
        index: usize,
        name: Option<&str>,
        error: impl Into<String>,
    ) {
        self.emit(JobEvent::JobFailed {
            kind,
            index,
            name: name.map(str::to_string),
            error: error.into(),
        });
    }

    /// A job stopped because it observed cancellation; not counted as a failure
    fn emit_job_cancelled(&self, kind: CompositeKind, index: usize, name: Option<&str>) {
        self.emit(JobEvent::JobCancelled {
            kind,
            index,
            name: name.map(str::to_string),
        });
    }

    fn emit_composite_finished(&self, kind: CompositeKind, failures: usize, cancelled: bool) {
        self.emit(JobEvent::CompositeFinished {
            kind,
            failures,
            cancelled,
        });
    }
}

impl EventEmitter for EventSender {
    fn event_sender(&self) -> Option<&EventSender> {
        Some(self)
    }
}

impl EventEmitter for Option<EventSender> {
    fn event_sender(&self) -> Option<&EventSender> {
        self.as_ref()
    }
}
