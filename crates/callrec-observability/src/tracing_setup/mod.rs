//! Tracing setup: structured logging with span definitions and event types.

pub mod events;
pub mod spans;

use callrec_core::config::ObservabilityConfig;
use tracing_subscriber::EnvFilter;

/// Initialize the tracing subscriber with structured JSON output.
///
/// Respects the `CALLREC_LOG` environment variable for filtering.
/// Defaults to `info` level if not set. Does nothing if a global
/// subscriber is already installed.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env("CALLREC_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .json()
        .try_init();
}

/// Initialize tracing from config. `CALLREC_LOG` still wins over `log_level`.
pub fn init_tracing_with_config(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_env("CALLREC_LOG")
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    let _ = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}

/// Initialize tracing with a custom filter string (for testing or embedding).
pub fn init_tracing_with_filter(filter: &str) {
    let filter = EnvFilter::new(filter);

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .json()
        .try_init();
}
