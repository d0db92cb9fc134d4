//! Log output for tests and demos.
//!
//! The library only emits `tracing` events; installing a subscriber is up
//! to the binary or test harness.

use tracing_subscriber::{fmt, EnvFilter};

/// Default filter when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "warn";

/// Build the filter from `RUST_LOG`, falling back to [`DEFAULT_FILTER`]
#[must_use]
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install a compact subscriber that writes through the test harness.
///
/// Safe to call from every test; only the first call installs anything.
/// Returns whether this call installed the subscriber.
pub fn init_test_tracing() -> bool {
    fmt()
        .with_env_filter(env_filter())
        .with_test_writer()
        .with_target(false)
        .compact()
        .try_init()
        .is_ok()
}
