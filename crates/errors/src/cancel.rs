//! Cancellation notification

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

/// The cancellation signal was triggered.
///
/// Jobs return this when they stop early because they observed cancellation.
/// The parallel composite uses it to tell a sibling winding down apart from
/// a job that failed on its own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[error("operation cancelled")]
pub struct Cancelled;

impl UserFacingError for Cancelled {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Borrowed("operation cancelled")
    }

    fn user_hint(&self) -> Option<&'static str> {
        Some("The run was interrupted or timed out; rerun it to finish the remaining jobs.")
    }

    fn is_retryable(&self) -> bool {
        true
    }

    fn user_code(&self) -> Option<&'static str> {
        Some("job.cancelled")
    }
}
