//! Integration tests for config

#[cfg(test)]
mod tests {
    use jobrun_config::*;
    use jobrun_errors::ConfigError;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;

    // Mutex to ensure env var tests don't run concurrently
    static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());

    const ALL_VARS: [&str; 3] = [
        constants::ENV_CANCEL_CHECKPOINTS,
        constants::ENV_SUPPRESS_CANCELLATION,
        constants::ENV_FAILURE_ORDER,
    ];

    fn clear_env() {
        for var in ALL_VARS {
            std::env::remove_var(var);
        }
    }

    #[tokio::test]
    async fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[serial]
cancel_checkpoints = false

[parallel]
suppress_cancellation = false
failure_order = "index"
        "#
        )
        .unwrap();

        let config = Config::load_or_default(Some(temp_file.path()))
            .await
            .unwrap();
        assert!(!config.serial.cancel_checkpoints);
        assert!(!config.parallel.suppress_cancellation);
        assert_eq!(config.parallel.failure_order, FailureOrder::Index);
    }

    #[tokio::test]
    async fn test_unknown_order_in_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[parallel]\nfailure_order = \"random\"").unwrap();

        let result = Config::load_from_file(temp_file.path()).await;
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn test_merge_env() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        clear_env();

        std::env::set_var(constants::ENV_SUPPRESS_CANCELLATION, "no");
        std::env::set_var(constants::ENV_FAILURE_ORDER, "index");

        let mut config = Config::default();
        config.merge_env().unwrap();

        assert!(config.serial.cancel_checkpoints);
        assert!(!config.parallel.suppress_cancellation);
        assert_eq!(config.parallel.failure_order, FailureOrder::Index);

        clear_env();
    }

    #[test]
    fn test_invalid_env_value() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        clear_env();

        std::env::set_var(constants::ENV_CANCEL_CHECKPOINTS, "maybe");

        let mut config = Config::default();
        match config.merge_env() {
            Err(ConfigError::InvalidValue { field, value }) => {
                assert_eq!(field, constants::ENV_CANCEL_CHECKPOINTS);
                assert_eq!(value, "maybe");
            }
            other => panic!("unexpected result: {other:?}"),
        }

        clear_env();
    }
}
