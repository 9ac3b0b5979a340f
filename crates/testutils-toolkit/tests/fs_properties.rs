// crates/testutils-toolkit/tests/fs_properties.rs
// ============================================================================
// Module: Filesystem Assertion Properties
// Description: Property tests for content and equivalence assertions.
// Purpose: Check reporting guarantees across generated inputs.
// Dependencies: testutils-toolkit, testutils-vfs, proptest
// ============================================================================

//! ## Overview
//! Property tests: every failing check reports exactly one message, and
//! content checks pass exactly when the texts match.

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

mod common;

use common::mem_fs_with;
use proptest::prelude::*;
use testutils_toolkit::FakeTest;
use testutils_toolkit::assert_file_contents;
use testutils_toolkit::assert_file_exists;
use testutils_toolkit::assert_fs_file_equivalent;
use testutils_vfs::MemFs;

/// Generates absolute paths with one to three short components.
fn path_strategy() -> impl Strategy<Value = String> {
    proptest::collection::vec("[a-z]{1,6}", 1..4).prop_map(|parts| format!("/{}", parts.join("/")))
}

proptest! {
    #[test]
    fn missing_paths_report_once_with_path_and_fs_name(path in path_strategy()) {
        let fs = MemFs::new();
        let mut t = FakeTest::default();

        prop_assert!(!assert_file_exists(&mut t, &fs, &path, None));
        prop_assert_eq!(t.error_messages.len(), 1);
        prop_assert!(t.error_messages[0].contains(&path));
        prop_assert!(t.error_messages[0].contains("MemFs"));
    }

    #[test]
    fn contents_match_iff_equal(expected in "[a-z ]{0,12}", actual in "[a-z ]{0,12}") {
        let fs = mem_fs_with(&[("/file", actual.as_str())]);
        let mut t = FakeTest::default();

        let passed = assert_file_contents(&mut t, &fs, "/file", expected.as_str(), None);
        prop_assert_eq!(passed, expected == actual);
        if passed {
            prop_assert!(t.error_messages.is_empty());
        } else {
            prop_assert_eq!(t.error_messages.len(), 1);
            let expected_quoted = format!("\"{expected}\"");
            let actual_quoted = format!("\"{actual}\"");
            prop_assert!(t.error_messages[0].contains(&expected_quoted));
            prop_assert!(t.error_messages[0].contains(&actual_quoted));
        }
    }

    #[test]
    fn equivalence_between_missing_and_present_reports_once(
        path in path_strategy(),
        content in "[a-z]{0,12}",
        present_on_expected in any::<bool>(),
    ) {
        let present = mem_fs_with(&[(path.as_str(), content.as_str())]);
        let missing = MemFs::new();
        let (expected, actual) =
            if present_on_expected { (&present, &missing) } else { (&missing, &present) };
        let mut t = FakeTest::default();

        prop_assert!(!assert_fs_file_equivalent(&mut t, expected, actual, &path, None));
        prop_assert_eq!(t.error_messages.len(), 1);
    }

    #[test]
    fn same_size_different_bytes_are_not_equivalent(
        left in "[a-z]{1,12}",
        flip in any::<prop::sample::Index>(),
    ) {
        let index = flip.index(left.len());
        let mut right = left.clone().into_bytes();
        right[index] = if right[index] == b'z' { b'a' } else { right[index] + 1 };
        let right = String::from_utf8(right).unwrap();

        let expected = mem_fs_with(&[("/f", left.as_str())]);
        let actual = mem_fs_with(&[("/f", right.as_str())]);
        let mut t = FakeTest::default();

        prop_assert!(!assert_fs_file_equivalent(&mut t, &expected, &actual, "/f", None));
        prop_assert_eq!(t.error_messages.len(), 1);
    }
}
