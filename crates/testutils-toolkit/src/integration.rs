// crates/testutils-toolkit/src/integration.rs
// ============================================================================
// Module: Integration Test Gate
// Description: Environment-driven opt-in for slow or external tests.
// Purpose: Skip integration tests unless the environment asks for them.
// Dependencies: serde, tracing
// ============================================================================

//! ## Overview
//! Integration tests run only when `RUN_INTEGRATION_TESTS=true`. libtest has
//! no runtime skip, so [`integration_test`] reports the skip through
//! [`SkippableTest::skip`] and returns `false`; callers return early, which
//! [`skip_unless_integration!`](crate::skip_unless_integration) does for them.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;

use serde::Deserialize;
use serde::Serialize;

use crate::reporter::SkippableTest;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Environment variable enabling integration tests.
pub const RUN_INTEGRATION_TESTS: &str = "RUN_INTEGRATION_TESTS";
/// Value of [`RUN_INTEGRATION_TESTS`] that enables integration tests.
pub const INTEGRATION_ENABLED_VALUE: &str = "true";
/// Skip reason reported when the gate is closed.
pub const INTEGRATION_SKIP_MESSAGE: &str =
    "RUN_INTEGRATION_TESTS environment variable is not set, skipping integration test";

// ============================================================================
// SECTION: Gate
// ============================================================================

/// Names the variable and value that open the gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IntegrationConfig {
    /// Environment variable to read.
    pub env_var: String,
    /// Exact value that enables integration tests.
    pub enabled_value: String,
}

impl Default for IntegrationConfig {
    fn default() -> Self {
        Self {
            env_var: RUN_INTEGRATION_TESTS.to_string(),
            enabled_value: INTEGRATION_ENABLED_VALUE.to_string(),
        }
    }
}

/// Decides whether integration tests run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntegrationGate {
    /// Variable name and enabling value.
    config: IntegrationConfig,
}

impl IntegrationGate {
    /// Creates a gate from configuration.
    #[must_use]
    pub const fn new(config: IntegrationConfig) -> Self {
        Self {
            config,
        }
    }

    /// Returns the gate configuration.
    #[must_use]
    pub const fn config(&self) -> &IntegrationConfig {
        &self.config
    }

    /// Returns the skip reason for this gate.
    #[must_use]
    pub fn skip_message(&self) -> String {
        if self.config.env_var == RUN_INTEGRATION_TESTS {
            INTEGRATION_SKIP_MESSAGE.to_string()
        } else {
            format!(
                "{} environment variable is not set, skipping integration test",
                self.config.env_var
            )
        }
    }

    /// Returns true when `lookup` yields exactly the enabling value.
    pub fn is_enabled_with<F>(&self, lookup: F) -> bool
    where
        F: FnOnce(&str) -> Option<String>,
    {
        lookup(&self.config.env_var).is_some_and(|value| value == self.config.enabled_value)
    }

    /// Returns true when the process environment enables integration tests.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.is_enabled_with(|name| env::var(name).ok())
    }

    /// Skips `t` unless `lookup` opens the gate. Returns whether the test runs.
    pub fn check_with<T, F>(&self, t: &mut T, lookup: F) -> bool
    where
        T: SkippableTest + ?Sized,
        F: FnOnce(&str) -> Option<String>,
    {
        t.helper();
        if self.is_enabled_with(lookup) {
            return true;
        }
        tracing::info!(env_var = %self.config.env_var, "integration tests disabled");
        t.skip(&self.skip_message());
        false
    }

    /// Skips `t` unless the process environment opens the gate.
    pub fn check<T: SkippableTest + ?Sized>(&self, t: &mut T) -> bool {
        self.check_with(t, |name| env::var(name).ok())
    }
}

/// Skips `t` unless `RUN_INTEGRATION_TESTS=true`. Returns whether the test runs.
pub fn integration_test<T: SkippableTest + ?Sized>(t: &mut T) -> bool {
    IntegrationGate::default().check(t)
}

/// Returns from the enclosing test unless integration tests are enabled.
///
/// ```
/// use testutils_toolkit::TestContext;
/// use testutils_toolkit::skip_unless_integration;
///
/// fn talks_to_a_real_server() {
///     let mut t = TestContext::new("talks_to_a_real_server");
///     skip_unless_integration!(t);
///     // Integration-only assertions follow.
/// }
/// # talks_to_a_real_server();
/// ```
#[macro_export]
macro_rules! skip_unless_integration {
    ($t:expr) => {
        if !$crate::integration_test(&mut $t) {
            return;
        }
    };
}
