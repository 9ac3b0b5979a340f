// crates/testutils-toolkit/src/reporter.rs
// ============================================================================
// Module: Test Reporters
// Description: Reporting capability traits plus fake and live reporters.
// Purpose: Let assertion helpers report failures to any test-result consumer.
// Dependencies: tracing
// ============================================================================

//! ## Overview
//! Assertion helpers never panic on their own; they hand a
//! [`FailureReport`] to a [`Reporter`] and, for `require_*` helpers, ask a
//! [`FatalReporter`] to stop the test. Two consumers ship with the crate:
//! - [`FakeTest`] records everything so the helpers themselves can be tested.
//! - [`TestContext`] adapts the traits to a real `#[test]` function.
//!
//! Invariants:
//! - A [`FakeTest`] becomes failed only through [`FatalReporter::fail_now`].
//! - Recorded messages are never removed.
//! - Once failed, a [`FakeTest`] drops further reports.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use crate::failure::FailureReport;

// ============================================================================
// SECTION: Capability Traits
// ============================================================================

/// Marks the caller as a helper frame. Consumers that track frames override it.
pub trait Helper {
    /// Marks the calling function as a test helper.
    fn helper(&mut self) {}
}

/// Receives failure reports from assertion helpers.
pub trait Reporter: Helper {
    /// Records a formatted failure; the test keeps running.
    fn errorf(&mut self, report: FailureReport);
}

/// A [`Reporter`] that can also stop the current test.
pub trait FatalReporter: Reporter {
    /// Marks the test as terminally failed.
    fn fail_now(&mut self);
}

/// A test that can be skipped at runtime.
pub trait SkippableTest: Helper {
    /// Skips the test with the given reason.
    fn skip(&mut self, reason: &str);
}

// ============================================================================
// SECTION: Fake Reporter
// ============================================================================

/// Recording reporter used to test assertion helpers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FakeTest {
    /// Raw templates and arguments, in report order.
    pub error_formats: Vec<FailureReport>,
    /// Rendered messages, parallel to `error_formats`.
    pub error_messages: Vec<String>,
    /// Whether [`FatalReporter::fail_now`] was called.
    pub failed: bool,
    /// Name shown by the `Display` summary.
    pub name: String,
}

impl FakeTest {
    /// Creates a named fake test.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Returns true when the test failed or recorded any message.
    #[must_use]
    pub fn is_failing(&self) -> bool {
        self.failed || !self.error_messages.is_empty()
    }
}

impl Helper for FakeTest {}

impl Reporter for FakeTest {
    fn errorf(&mut self, report: FailureReport) {
        if self.failed {
            return;
        }
        self.error_messages.push(report.render());
        self.error_formats.push(report);
    }
}

impl FatalReporter for FakeTest {
    fn fail_now(&mut self) {
        self.failed = true;
    }
}

impl fmt::Display for FakeTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.is_failing() { "FAIL" } else { "PASS" };
        write!(f, "--- {status}: {}", self.name)
    }
}

// ============================================================================
// SECTION: Live Reporter
// ============================================================================

/// Reporter for real `#[test]` functions.
///
/// `fail_now` panics with every recorded message, and dropping a context that
/// recorded failures panics too, so non-fatal assertions still fail the test.
///
/// ```no_run
/// use testutils_toolkit::TestContext;
/// use testutils_toolkit::require_file_exists;
/// use testutils_vfs::MemFs;
///
/// let mut t = TestContext::new("certificates_are_written");
/// let fs = MemFs::new();
/// require_file_exists(&mut t, &fs, "/certs/tls.crt", None);
/// ```
#[derive(Debug)]
pub struct TestContext {
    /// Test name used in logs and panic messages.
    name: String,
    /// Rendered failure messages.
    messages: Vec<String>,
    /// Skip reason, once skipped.
    skip_reason: Option<String>,
    /// Set before `fail_now` panics.
    failed: bool,
}

impl TestContext {
    /// Creates a context for the named test.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            messages: Vec::new(),
            skip_reason: None,
            failed: false,
        }
    }

    /// Returns the test name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the failure messages recorded so far.
    #[must_use]
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Returns the skip reason when the test was skipped.
    #[must_use]
    pub fn skip_reason(&self) -> Option<&str> {
        self.skip_reason.as_deref()
    }

    /// Returns true once the test was skipped.
    #[must_use]
    pub const fn is_skipped(&self) -> bool {
        self.skip_reason.is_some()
    }

    /// Joins the recorded messages for a panic payload.
    fn summary(&self) -> String {
        format!("--- FAIL: {}\n{}", self.name, self.messages.join("\n"))
    }
}

impl Helper for TestContext {}

impl Reporter for TestContext {
    fn errorf(&mut self, report: FailureReport) {
        let message = report.render();
        tracing::error!(test = %self.name, "{message}");
        self.messages.push(message);
    }
}

impl FatalReporter for TestContext {
    #[allow(clippy::panic, reason = "Stopping a libtest test means unwinding it.")]
    fn fail_now(&mut self) {
        self.failed = true;
        panic!("{}", self.summary());
    }
}

impl SkippableTest for TestContext {
    fn skip(&mut self, reason: &str) {
        tracing::info!(test = %self.name, reason, "skipping test");
        self.skip_reason = Some(reason.to_string());
    }
}

impl Drop for TestContext {
    #[allow(clippy::panic, reason = "Unreported failures must fail the enclosing test.")]
    fn drop(&mut self) {
        if !self.failed && !self.messages.is_empty() && !std::thread::panicking() {
            panic!("{}", self.summary());
        }
    }
}
