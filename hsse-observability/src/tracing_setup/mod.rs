//! Tracing setup: subscriber install, span macros, named events.

pub mod events;
pub mod spans;

use tracing_subscriber::EnvFilter;

use hsse_core::config::ObservabilityConfig;

/// Environment variable consulted before the configured level.
pub const LOG_ENV_VAR: &str = "HSSE_LOG";

/// Install the global subscriber.
///
/// Respects `HSSE_LOG` for filtering, falling back to `config.log_level`.
/// Returns `false` when a global subscriber was already installed.
pub fn init_tracing(config: &ObservabilityConfig) -> bool {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let installed = if config.json_logs {
        builder
            .with_file(true)
            .with_line_number(true)
            .json()
            .try_init()
    } else {
        builder.try_init()
    };
    installed.is_ok()
}

/// Initialize tracing with a custom filter string (for testing or embedding).
pub fn init_tracing_with_filter(filter: &str) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(true)
        .with_test_writer()
        .try_init()
        .is_ok()
}
