//! Fixed names used when locating and overriding configuration

/// Directory under the user config dir holding the config file
pub const CONFIG_DIR_NAME: &str = "jobrun";
pub const CONFIG_FILE_NAME: &str = "config.toml";

pub const ENV_CANCEL_CHECKPOINTS: &str = "JOBRUN_CANCEL_CHECKPOINTS";
pub const ENV_SUPPRESS_CANCELLATION: &str = "JOBRUN_SUPPRESS_CANCELLATION";
pub const ENV_FAILURE_ORDER: &str = "JOBRUN_FAILURE_ORDER";
