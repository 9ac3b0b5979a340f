// crates/testutils-toolkit/tests/logging.rs
// ============================================================================
// Module: Test Logging Tests
// Description: Subscriber installation through the libtest writer.
// Purpose: Verify repeated initialization is harmless.
// Dependencies: testutils-toolkit, testutils-vfs
// ============================================================================

//! ## Overview
//! Tests for [`init_test_logging`].

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

use testutils_toolkit::FakeTest;
use testutils_toolkit::ensure_file_content;
use testutils_toolkit::init_test_logging;
use testutils_toolkit::logging::DEFAULT_LOG_FILTER;
use testutils_toolkit::logging::LOG_ENV_VAR;
use testutils_vfs::MemFs;

#[test]
fn repeated_initialization_is_a_no_op() {
    init_test_logging();
    assert!(!init_test_logging());

    let fs = MemFs::new();
    let mut t = FakeTest::default();
    ensure_file_content(&mut t, &fs, "/logged", "content");
    assert!(!t.is_failing());
    assert_eq!(LOG_ENV_VAR, "TESTUTILS_LOG");
    assert_eq!(DEFAULT_LOG_FILTER, "warn");
}
