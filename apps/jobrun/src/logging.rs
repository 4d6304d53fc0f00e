//! Tracing setup
//!
//! Logs always go to stderr so stdout stays free for events. `RUST_LOG`
//! overrides the default filter.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "warn";
const DEBUG_FILTER: &str = "info,jobrun=debug,jobrun_cli=debug";

fn filter(debug_enabled: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if debug_enabled {
            DEBUG_FILTER
        } else {
            DEFAULT_FILTER
        })
    })
}

/// Install the global subscriber
pub fn init_tracing(json_mode: bool, debug_enabled: bool) {
    let builder = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter(debug_enabled));

    if json_mode {
        // JSON mode: structured lines, quiet unless asked for
        if debug_enabled || std::env::var("RUST_LOG").is_ok() {
            builder.json().init();
        } else {
            tracing_subscriber::fmt()
                .with_writer(std::io::sink)
                .with_env_filter("off")
                .init();
        }
    } else {
        builder.with_target(debug_enabled).compact().init();
    }
}
