//! Logging adapter and subscriber setup.

use tracing_subscriber::EnvFilter;

use crate::host::ReviewLogger;

/// Environment variable holding the CLI's log filter.
pub const LOG_ENV: &str = "RATEGATE_LOG";

/// Forwards engine messages to `tracing` at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl ReviewLogger for TracingLogger {
    fn log(&self, message: &str) {
        tracing::info!(target: "rategate::review", "{}", message);
    }
}

/// Install a stderr `fmt` subscriber filtered by `RATEGATE_LOG`.
///
/// `default_level` applies when the variable is unset or invalid. Calling
/// this twice is harmless; the second install is ignored.
pub fn init_tracing(default_level: &str) {
    let filter = std::env::var(LOG_ENV)
        .ok()
        .and_then(|value| EnvFilter::try_new(value).ok())
        .unwrap_or_else(|| {
            EnvFilter::try_new(default_level).unwrap_or_else(|_| EnvFilter::new("warn"))
        });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
}
