// crates/testutils-toolkit/src/logging.rs
// ============================================================================
// Module: Test Logging
// Description: Installs a tracing subscriber that writes through libtest.
// Purpose: Surface helper logs in test output, filtered by environment.
// Dependencies: tracing-subscriber
// ============================================================================

//! ## Overview
//! Helpers log through `tracing`. Call [`init_test_logging`] at the top of a
//! test to see those events; output goes through libtest capture so it only
//! shows for failing tests or with `--nocapture`.

use tracing_subscriber::EnvFilter;

/// Environment variable holding `EnvFilter` directives.
pub const LOG_ENV_VAR: &str = "TESTUTILS_LOG";
/// Filter used when [`LOG_ENV_VAR`] is unset or invalid.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Installs the global test subscriber.
///
/// Returns `false` when a global subscriber is already installed, so repeated
/// calls across tests are harmless.
pub fn init_test_logging() -> bool {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).with_test_writer().try_init().is_ok()
}
