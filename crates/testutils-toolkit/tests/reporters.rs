// crates/testutils-toolkit/tests/reporters.rs
// ============================================================================
// Module: Reporter Tests
// Description: Behavior of FakeTest and TestContext.
// Purpose: Verify failure recording, fail-now semantics and summaries.
// Dependencies: testutils-toolkit, proptest
// ============================================================================

//! ## Overview
//! Tests for the recording [`FakeTest`] and the libtest-facing
//! [`TestContext`].

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::panic;

use proptest::prelude::*;
use testutils_toolkit::FailureReport;
use testutils_toolkit::FakeTest;
use testutils_toolkit::FatalReporter;
use testutils_toolkit::Reporter;
use testutils_toolkit::SkippableTest;
use testutils_toolkit::TestContext;
use testutils_toolkit::fail;

// ============================================================================
// SECTION: FakeTest
// ============================================================================

#[test]
fn fake_test_records_template_and_rendered_message() {
    let mut t = FakeTest::default();
    t.errorf(FailureReport::new("value {} is bad", vec!["42".to_string()]));

    assert_eq!(t.error_formats.len(), 1);
    assert_eq!(t.error_formats[0].template, "value {} is bad");
    assert_eq!(t.error_formats[0].args, vec!["42".to_string()]);
    assert_eq!(t.error_messages, vec!["value 42 is bad".to_string()]);
    assert!(!t.failed);
}

#[test]
fn fake_test_ignores_reports_after_fail_now() {
    let mut t = FakeTest::default();
    t.errorf(FailureReport::message("first"));
    t.fail_now();
    t.errorf(FailureReport::message("second"));
    t.fail_now();

    assert!(t.failed);
    assert_eq!(t.error_messages, vec!["first".to_string()]);
    assert_eq!(t.error_formats.len(), 1);
}

#[test]
fn fake_test_display_summarizes_status() {
    let mut t = FakeTest::new("TestSomething");
    assert_eq!(t.to_string(), "--- PASS: TestSomething");

    fail(&mut t, "boom", None);
    assert!(!t.failed);
    assert_eq!(t.to_string(), "--- FAIL: TestSomething");

    let mut fatal = FakeTest::new("TestFatal");
    fatal.fail_now();
    assert_eq!(fatal.to_string(), "--- FAIL: TestFatal");
}

proptest! {
    #[test]
    fn fake_test_message_count_freezes_once_failed(
        before in proptest::collection::vec("[a-z]{1,8}", 0..5),
        after in proptest::collection::vec("[a-z]{1,8}", 0..5),
    ) {
        let mut t = FakeTest::default();
        for message in &before {
            t.errorf(FailureReport::message(message.clone()));
        }
        t.fail_now();
        for message in &after {
            t.errorf(FailureReport::message(message.clone()));
        }
        prop_assert_eq!(&t.error_messages, &before);
        prop_assert_eq!(t.error_formats.len(), before.len());
    }
}

// ============================================================================
// SECTION: TestContext
// ============================================================================

#[test]
fn test_context_records_skip_reason() {
    let mut t = TestContext::new("skippable");
    assert!(!t.is_skipped());
    t.skip("not today");

    assert_eq!(t.name(), "skippable");
    assert!(t.is_skipped());
    assert_eq!(t.skip_reason(), Some("not today"));
}

#[test]
fn test_context_fail_now_panics_with_messages() {
    let result = panic::catch_unwind(|| {
        let mut t = TestContext::new("fatal");
        fail(&mut t, "boom", None);
        t.fail_now();
    });
    let payload = result.unwrap_err();
    let message = payload.downcast_ref::<String>().unwrap();
    assert!(message.starts_with("--- FAIL: fatal"));
    assert!(message.contains("boom"));
}

#[test]
fn test_context_drop_panics_on_unreported_failures() {
    let result = panic::catch_unwind(|| {
        let mut t = TestContext::new("non_fatal");
        fail(&mut t, "recorded but not fatal", None);
        assert_eq!(t.messages().len(), 1);
    });
    assert!(result.is_err());
}

#[test]
fn test_context_drop_is_quiet_without_failures() {
    let result = panic::catch_unwind(|| {
        let t = TestContext::new("clean");
        assert!(t.messages().is_empty());
    });
    assert!(result.is_ok());
}
