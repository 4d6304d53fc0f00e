//! Integration tests for error types

#[cfg(test)]
mod tests {
    use jobrun_errors::*;
    use std::io;

    #[test]
    fn test_error_display() {
        let err = SerialError::new(0, Some("fetch".into()), "connection refused");
        assert_eq!(
            err.to_string(),
            "job:fetch (serial job #0) failed: connection refused"
        );

        let err = ConfigError::InvalidValue {
            field: "JOBRUN_FAILURE_ORDER".into(),
            value: "random".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid value for JOBRUN_FAILURE_ORDER: random"
        );
    }

    #[test]
    fn test_box_error_round_trip() {
        let boxed: BoxError = Box::new(SerialError::new(
            3,
            None,
            io::Error::from(io::ErrorKind::PermissionDenied),
        ));
        let serial = boxed.downcast_ref::<SerialError>().expect("serial error");
        assert_eq!(serial.index(), 3);
        let io_err = find::<io::Error>(&*boxed).expect("io error");
        assert_eq!(io_err.kind(), io::ErrorKind::PermissionDenied);
    }

    #[test]
    fn test_nested_aggregates() {
        let inner = ParallelError::new(vec![JobFailure::new(
            1,
            Some("upload".into()),
            JobPanicked {
                message: "index out of bounds".into(),
            },
        )])
        .expect("non-empty");
        let outer = ParallelError::new(vec![
            JobFailure::new(0, None, "disk full"),
            JobFailure::new(2, None, inner),
        ])
        .expect("non-empty");

        let panicked = outer.find::<JobPanicked>().expect("panic record");
        assert_eq!(panicked.message, "index out of bounds");
        assert!(contains_message(&outer, "disk full"));
        assert!(!is_cancelled(&outer));
    }

    #[test]
    fn test_user_facing_codes() {
        let err = ParallelError::new(vec![JobFailure::new(0, None, Cancelled)]).expect("non-empty");
        assert_eq!(err.user_code(), Some("job.parallel_failed"));
        assert_eq!(Cancelled.user_code(), Some("job.cancelled"));
        assert!(SerialError::new(0, None, Cancelled).is_retryable());
    }
}
