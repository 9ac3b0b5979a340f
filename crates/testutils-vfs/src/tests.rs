// crates/testutils-vfs/src/tests.rs
// ============================================================================
// Module: VFS Unit Tests
// Description: Unit tests for shared error and metadata types.
// Purpose: Pin error rendering and mode formatting used in failure messages.
// Dependencies: testutils-vfs
// ============================================================================

//! ## Overview
//! Unit tests for [`crate::FsError`] and [`crate::FileMode`].

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

use std::io;
use std::path::Path;

use crate::FileMode;
use crate::FsError;

#[test]
fn not_found_renders_operation_and_path() {
    let err = FsError::NotFound {
        op: "open",
        path: "/hello/world".to_string(),
    };
    assert_eq!(err.to_string(), "open /hello/world: file does not exist");
    assert!(err.is_not_found());
}

#[test]
fn from_io_classifies_not_found() {
    let err = FsError::from_io(
        "stat",
        Path::new("/missing"),
        io::Error::new(io::ErrorKind::NotFound, "gone"),
    );
    assert!(matches!(err, FsError::NotFound { op: "stat", .. }));

    let err = FsError::from_io(
        "stat",
        Path::new("/denied"),
        io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
    );
    assert!(!err.is_not_found());
    assert_eq!(err.to_string(), "stat /denied: denied");
}

#[test]
fn file_mode_renders_like_ls() {
    assert_eq!(FileMode::file(0o644).to_string(), "-rw-r--r--");
    assert_eq!(FileMode::dir(0o755).to_string(), "drwxr-xr-x");
    assert_eq!(FileMode::file(0o100_600).permissions(), 0o600);
}

#[test]
fn file_modes_differ_by_type_and_bits() {
    assert_ne!(FileMode::file(0o644), FileMode::dir(0o644));
    assert_ne!(FileMode::file(0o644), FileMode::file(0o600));
    assert_eq!(FileMode::file(0o644), FileMode::file(0o644));
}
