//! Causal-chain traversal
//!
//! Jobs often return errors that wrap further detail (an I/O failure inside a
//! path error inside a job failure). These helpers walk `source()` links, and
//! when they meet a [`ParallelError`] they branch into every record in order,
//! so a cause stays reachable however many composites were nested above it.

use std::error::Error as StdError;

use crate::{Cancelled, ParallelError};

/// Whether `pred` holds for any link of the chain starting at `err`.
///
/// `err` itself is tested first. Stops at the first match.
pub fn any_cause<'a>(
    err: &'a (dyn StdError + 'static),
    pred: &mut dyn FnMut(&'a (dyn StdError + 'static)) -> bool,
) -> bool {
    let mut current = Some(err);
    while let Some(link) = current {
        if pred(link) {
            return true;
        }
        if let Some(aggregate) = link.downcast_ref::<ParallelError>() {
            for failure in aggregate.failures() {
                if any_cause(failure, &mut *pred) {
                    return true;
                }
            }
            return false;
        }
        current = link.source();
    }
    false
}

/// Membership test: whether a link of the chain equals `target`.
#[must_use]
pub fn is<T>(err: &(dyn StdError + 'static), target: &T) -> bool
where
    T: StdError + PartialEq + 'static,
{
    any_cause(err, &mut |link| link.downcast_ref::<T>() == Some(target))
}

/// Typed extraction: the first link of the chain that is a `T`.
#[must_use]
pub fn find<'a, T>(err: &'a (dyn StdError + 'static)) -> Option<&'a T>
where
    T: StdError + 'static,
{
    let mut found = None;
    any_cause(err, &mut |link| {
        found = link.downcast_ref::<T>();
        found.is_some()
    });
    found
}

/// Whether a link of the chain renders exactly as `message`.
///
/// Useful for ad-hoc causes built from strings, which have no type to match.
#[must_use]
pub fn contains_message(err: &(dyn StdError + 'static), message: &str) -> bool {
    any_cause(err, &mut |link| link.to_string() == message)
}

/// Whether the chain carries the cancellation notification.
///
/// A plain membership test: an aggregate matches when any of its records
/// does. Use [`is_only_cancellation`] to decide whether a failure is nothing
/// but cancellation.
#[must_use]
pub fn is_cancelled(err: &(dyn StdError + 'static)) -> bool {
    is(err, &Cancelled)
}

/// Whether the failure amounts to cancellation and nothing else.
///
/// Single chains match when they carry [`Cancelled`]. An aggregate matches
/// only when every one of its records does, so a genuine failure inside a
/// nested [`ParallelError`] is never mistaken for cancellation noise.
#[must_use]
pub fn is_only_cancellation(err: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(link) = current {
        if link.is::<Cancelled>() {
            return true;
        }
        if let Some(aggregate) = link.downcast_ref::<ParallelError>() {
            return aggregate
                .failures()
                .iter()
                .all(|failure| is_only_cancellation(failure));
        }
        current = link.source();
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BoxError, JobFailure, SerialError};
    use std::io;
    use thiserror::Error;

    #[derive(Debug, Error, PartialEq, Eq)]
    #[error("{0}")]
    struct Sentinel(&'static str);

    #[derive(Debug, Error)]
    #[error("fetch failed")]
    struct FetchError {
        #[source]
        inner: BoxError,
    }

    fn aggregate(failures: Vec<JobFailure>) -> ParallelError {
        ParallelError::new(failures).expect("non-empty")
    }

    #[test]
    fn test_is_walks_source_links() {
        let err = FetchError {
            inner: Box::new(Sentinel("hello")),
        };
        assert!(is(&err, &Sentinel("hello")));
        assert!(!is(&err, &Sentinel("world")));
    }

    #[test]
    fn test_is_mixed_aggregate() {
        let err = aggregate(vec![
            JobFailure::new(0, None, Sentinel("world")),
            JobFailure::new(1, None, io::Error::from(io::ErrorKind::UnexpectedEof)),
        ]);
        assert!(is(&err, &Sentinel("world")));
        assert!(!is(&err, &Sentinel("hello")));
        let io_err = find::<io::Error>(&err).expect("io error");
        assert_eq!(io_err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_find_misses() {
        let err = aggregate(vec![
            JobFailure::new(0, None, Sentinel("hello")),
            JobFailure::new(1, None, Sentinel("world")),
        ]);
        assert!(find::<io::Error>(&err).is_none());
    }

    #[test]
    fn test_serial_wrapping_aggregate() {
        let inner = aggregate(vec![
            JobFailure::new(0, None, Sentinel("first")),
            JobFailure::new(3, Some("deploy".into()), Sentinel("second")),
        ]);
        let err = SerialError::new(2, None, inner);

        assert!(is(&err, &Sentinel("first")));
        assert!(is(&err, &Sentinel("second")));
        let failure = find::<JobFailure>(&err).expect("job failure");
        assert_eq!(failure.index(), 0);
        assert_eq!(
            err.to_string(),
            "serial job #2 failed: parallel job #0 failed: first"
        );
    }

    #[test]
    fn test_contains_message() {
        let err = SerialError::new(1, Some("bar".into()), "expected failure");
        assert!(contains_message(&err, "expected failure"));
        assert!(!contains_message(&err, "unexpected failure"));
    }

    #[test]
    fn test_is_cancelled() {
        let err = aggregate(vec![
            JobFailure::new(0, None, Sentinel("hello")),
            JobFailure::new(1, None, Cancelled),
        ]);
        assert!(is_cancelled(&err));
        assert!(!is_cancelled(&Sentinel("hello")));
    }

    #[test]
    fn test_only_cancellation_needs_every_record() {
        let mixed = aggregate(vec![
            JobFailure::new(0, None, Sentinel("genuine boom")),
            JobFailure::new(1, None, Cancelled),
        ]);
        assert!(!is_only_cancellation(&mixed));
        assert!(!is_only_cancellation(&SerialError::new(0, None, mixed)));

        let quiet = aggregate(vec![
            JobFailure::new(0, None, Cancelled),
            JobFailure::new(1, None, SerialError::new(2, None, Cancelled)),
        ]);
        assert!(is_only_cancellation(&quiet));
        assert!(is_only_cancellation(&SerialError::new(0, None, Cancelled)));
        assert!(!is_only_cancellation(&Sentinel("hello")));
    }
}
