// crates/testutils-toolkit/tests/common/mod.rs
// ============================================================================
// Module: Common Test Fixtures
// Description: Shared fakes and filesystem fixtures for toolkit tests.
// Purpose: Keep test files focused on the behavior they check.
// Dependencies: testutils-toolkit, testutils-vfs
// ============================================================================

//! ## Overview
//! Fixtures shared by the toolkit integration tests.

#![allow(dead_code, reason = "Shared test helpers may be unused in some cases.")]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;

use testutils_toolkit::FailureReport;
use testutils_toolkit::Helper;
use testutils_toolkit::Reporter;
use testutils_toolkit::SkippableTest;
use testutils_vfs::MemFs;
use testutils_vfs::write_file;

// ============================================================================
// SECTION: Filesystems
// ============================================================================

/// Creates a `MemFs` holding the given `(path, content)` files.
#[must_use]
pub fn mem_fs_with(files: &[(&str, &str)]) -> MemFs {
    let fs = MemFs::new();
    for (path, content) in files {
        write_file(&fs, Path::new(path), content.as_bytes()).expect("seed file");
    }
    fs
}

// ============================================================================
// SECTION: Recording Test
// ============================================================================

/// Skippable test double counting `helper` and `skip` calls.
#[derive(Debug, Default)]
pub struct RecordingTest {
    /// Number of `helper` calls.
    pub helper_calls: usize,
    /// Reasons passed to `skip`, in order.
    pub skip_reasons: Vec<String>,
    /// Rendered failure reports.
    pub reports: Vec<String>,
}

impl Helper for RecordingTest {
    fn helper(&mut self) {
        self.helper_calls += 1;
    }
}

impl SkippableTest for RecordingTest {
    fn skip(&mut self, reason: &str) {
        self.skip_reasons.push(reason.to_string());
    }
}

impl Reporter for RecordingTest {
    fn errorf(&mut self, report: FailureReport) {
        self.reports.push(report.render());
    }
}
