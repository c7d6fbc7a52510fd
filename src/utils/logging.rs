//! Diagnostic logging setup.
//!
//! Log lines share stderr with the commentary, so the default filter only lets
//! errors through. Set `PVAI_LOG` (e.g. `PVAI_LOG=debug`) to see per-chunk and
//! per-request events plus the end-of-run transfer summary.

use tracing_subscriber::EnvFilter;

pub const LOG_ENV_VAR: &str = "PVAI_LOG";
pub const DEFAULT_LOG_FILTER: &str = "error";

/// Pick the filter directive from the raw environment value.
pub fn filter_directive(env_value: Option<&str>) -> &str {
    match env_value.map(str::trim) {
        Some(value) if !value.is_empty() => value,
        _ => DEFAULT_LOG_FILTER,
    }
}

/// Install the global `tracing` subscriber writing to stderr.
///
/// Calling this more than once is harmless; later calls are ignored.
pub fn init_logging() {
    let env_value = std::env::var(LOG_ENV_VAR).ok();
    let directive = filter_directive(env_value.as_deref());
    let filter = EnvFilter::try_new(directive).unwrap_or_else(|err| {
        eprintln!("⚠️  Ignoring invalid {LOG_ENV_VAR} value '{directive}': {err}");
        EnvFilter::new(DEFAULT_LOG_FILTER)
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
