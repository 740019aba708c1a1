//! Tracing subscriber setup.
//!
//! The log level is read from `RUST_LOG` and defaults to `info`, e.g.
//! `RUST_LOG=center_payroll=debug`.

use tracing_subscriber::{EnvFilter, fmt};

/// Installs the global subscriber.
///
/// # Example
///
/// ```no_run
/// center_payroll::logging::init();
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .init();
}

/// Installs a debug-level subscriber that writes through the test harness.
///
/// Safe to call from every test; only the first call installs anything.
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
