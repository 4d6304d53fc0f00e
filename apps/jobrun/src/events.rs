//! Event display

use jobrun::JobEvent;
use tracing::{debug, error, info, warn, Level};

/// Prints job events as they arrive
pub struct EventPrinter {
    json: bool,
}

impl EventPrinter {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    /// Handle incoming event
    pub fn handle_event(&self, event: &JobEvent) {
        log_event(event);
        if let Some(line) = self.render(event) {
            println!("{line}");
        }
    }

    fn render(&self, event: &JobEvent) -> Option<String> {
        if self.json {
            return match serde_json::to_string(event) {
                Ok(line) => Some(line),
                Err(e) => {
                    warn!(error = %e, "failed to serialize event");
                    None
                }
            };
        }

        let marker = match event {
            JobEvent::CompositeStarted { .. } | JobEvent::JobStarted { .. } => "==>",
            JobEvent::JobSucceeded { .. } => " ok",
            JobEvent::JobFailed { .. } => "!!!",
            JobEvent::JobCancelled { .. } => " --",
            JobEvent::CompositeFinished { failures, .. } if *failures > 0 => "!!!",
            JobEvent::CompositeFinished { .. } => "==>",
        };
        Some(format!("{marker} {event}"))
    }
}

/// Log a job event at its own level, tagged with its source
fn log_event(event: &JobEvent) {
    let source = event.log_target();
    let level = event.log_level();
    if level == Level::ERROR {
        error!(source, "{event}");
    } else if level == Level::WARN {
        warn!(source, "{event}");
    } else if level == Level::INFO {
        info!(source, "{event}");
    } else {
        debug!(source, "{event}");
    }
}
