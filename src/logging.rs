//! Diagnostics setup for the `dp` binary.
//!
//! Library code only emits `tracing` events; installing a subscriber is left
//! to the binary. Output goes to stderr so stdout stays clean for `--json`.

use tracing_subscriber::EnvFilter;

const LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Effective level: the configured base level raised by one step per `-v`.
/// Unknown configured levels fall back to `warn`.
pub fn effective_level(configured: &str, verbosity: u8) -> &'static str {
    let base = LEVELS
        .iter()
        .position(|l| l.eq_ignore_ascii_case(configured.trim()))
        .unwrap_or(1);
    let idx = (base + verbosity as usize).min(LEVELS.len() - 1);
    LEVELS[idx]
}

/// Install the stderr subscriber. `RUST_LOG`, when set, wins over the
/// computed level. Safe to call more than once; later calls are ignored.
pub fn init(configured: &str, verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("dayplan={}", effective_level(configured, verbosity))));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
