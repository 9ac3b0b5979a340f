// crates/testutils-toolkit/src/files.rs
// ============================================================================
// Module: Filesystem Assertions
// Description: Existence, content and cross-filesystem equivalence checks.
// Purpose: Assert on files written to a virtual filesystem during a test.
// Dependencies: testutils-vfs, serde_yaml, tracing
// ============================================================================

//! ## Overview
//! Every check comes in two tiers:
//! - `assert_*` reports through a [`Reporter`] and returns whether it passed.
//! - `require_*` runs the matching `assert_*` and calls
//!   [`FatalReporter::fail_now`] on failure.
//!
//! Each failing check reports exactly one message. The fixture writers
//! ([`ensure_file_content`], [`ensure_yaml_file_content`]) always abort the
//! test on error.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;

use serde::Serialize;
use testutils_vfs::Fs;
use testutils_vfs::read_file;
use testutils_vfs::write_file;

use crate::failure::fail;
use crate::failure::line_diff;
use crate::failure::no_error;
use crate::failure::not_equal;
use crate::reporter::FatalReporter;
use crate::reporter::Reporter;

// ============================================================================
// SECTION: Expected Content
// ============================================================================

/// Content representations accepted by [`assert_file_contents`].
pub trait FileContent {
    /// Returns true when `actual` equals this content.
    fn equals_bytes(&self, actual: &[u8]) -> bool;

    /// Renders this content for a failure message.
    fn describe(&self) -> String;

    /// Renders file bytes in the same representation as this content.
    fn describe_actual(&self, actual: &[u8]) -> String;

    /// Returns a line diff against `actual` when the representation is textual.
    fn diff(&self, actual: &[u8]) -> Option<String>;
}

impl FileContent for str {
    fn equals_bytes(&self, actual: &[u8]) -> bool {
        self.as_bytes() == actual
    }

    fn describe(&self) -> String {
        format!("\"{}\"", self.escape_debug())
    }

    fn describe_actual(&self, actual: &[u8]) -> String {
        String::from_utf8_lossy(actual).describe()
    }

    fn diff(&self, actual: &[u8]) -> Option<String> {
        Some(line_diff(self, &String::from_utf8_lossy(actual)))
    }
}

impl FileContent for String {
    fn equals_bytes(&self, actual: &[u8]) -> bool {
        self.as_str().equals_bytes(actual)
    }

    fn describe(&self) -> String {
        self.as_str().describe()
    }

    fn describe_actual(&self, actual: &[u8]) -> String {
        self.as_str().describe_actual(actual)
    }

    fn diff(&self, actual: &[u8]) -> Option<String> {
        self.as_str().diff(actual)
    }
}

impl FileContent for [u8] {
    fn equals_bytes(&self, actual: &[u8]) -> bool {
        self == actual
    }

    fn describe(&self) -> String {
        format!("b\"{}\"", self.escape_ascii())
    }

    fn describe_actual(&self, actual: &[u8]) -> String {
        actual.describe()
    }

    fn diff(&self, _actual: &[u8]) -> Option<String> {
        None
    }
}

impl<const N: usize> FileContent for [u8; N] {
    fn equals_bytes(&self, actual: &[u8]) -> bool {
        self.as_slice().equals_bytes(actual)
    }

    fn describe(&self) -> String {
        self.as_slice().describe()
    }

    fn describe_actual(&self, actual: &[u8]) -> String {
        self.as_slice().describe_actual(actual)
    }

    fn diff(&self, actual: &[u8]) -> Option<String> {
        self.as_slice().diff(actual)
    }
}

impl FileContent for Vec<u8> {
    fn equals_bytes(&self, actual: &[u8]) -> bool {
        self.as_slice().equals_bytes(actual)
    }

    fn describe(&self) -> String {
        self.as_slice().describe()
    }

    fn describe_actual(&self, actual: &[u8]) -> String {
        self.as_slice().describe_actual(actual)
    }

    fn diff(&self, actual: &[u8]) -> Option<String> {
        self.as_slice().diff(actual)
    }
}

// ============================================================================
// SECTION: Fixture Writers
// ============================================================================

/// Creates or truncates `path` and writes `content`, aborting the test on error.
pub fn ensure_file_content<T: FatalReporter + ?Sized>(
    t: &mut T,
    fs: &dyn Fs,
    path: impl AsRef<Path>,
    content: &str,
) {
    t.helper();
    let path = path.as_ref();
    if let Err(err) = write_file(fs, path, content.as_bytes()) {
        no_error(t, &err, None);
        t.fail_now();
        return;
    }
    tracing::debug!(fs = fs.name(), path = %path.display(), "wrote fixture file");
}

/// Serializes `content` as YAML into `path`, aborting the test on error.
pub fn ensure_yaml_file_content<T, V>(t: &mut T, fs: &dyn Fs, path: impl AsRef<Path>, content: &V)
where
    T: FatalReporter + ?Sized,
    V: Serialize + ?Sized,
{
    t.helper();
    let path = path.as_ref();
    let yaml = match serde_yaml::to_string(content) {
        Ok(yaml) => yaml,
        Err(err) => {
            no_error(t, &err, None);
            t.fail_now();
            return;
        }
    };
    if let Err(err) = write_file(fs, path, yaml.as_bytes()) {
        no_error(t, &err, None);
        t.fail_now();
        return;
    }
    tracing::debug!(fs = fs.name(), path = %path.display(), "wrote yaml fixture file");
}

// ============================================================================
// SECTION: Existence
// ============================================================================

/// Asserts that `path` exists in `fs`.
///
/// Only a not-found error fails the check; other stat errors are ignored.
pub fn assert_file_exists<T: Reporter + ?Sized>(
    t: &mut T,
    fs: &dyn Fs,
    path: impl AsRef<Path>,
    msg: Option<&str>,
) -> bool {
    t.helper();
    let path = path.as_ref();
    match fs.stat(path) {
        Err(err) if err.is_not_found() => fail(
            t,
            &format!(
                "Expect file path {} to exist in filesystem {}",
                path.display(),
                fs.name()
            ),
            msg,
        ),
        _ => true,
    }
}

/// Requires that `path` exists in `fs`.
pub fn require_file_exists<T: FatalReporter + ?Sized>(
    t: &mut T,
    fs: &dyn Fs,
    path: impl AsRef<Path>,
    msg: Option<&str>,
) {
    t.helper();
    if !assert_file_exists(t, fs, path, msg) {
        t.fail_now();
    }
}

// ============================================================================
// SECTION: Contents
// ============================================================================

/// Asserts that the file at `path` holds exactly `expected`.
pub fn assert_file_contents<T, C>(
    t: &mut T,
    fs: &dyn Fs,
    path: impl AsRef<Path>,
    expected: &C,
    msg: Option<&str>,
) -> bool
where
    T: Reporter + ?Sized,
    C: FileContent + ?Sized,
{
    t.helper();
    let actual = match read_file(fs, path.as_ref()) {
        Ok(actual) => actual,
        Err(err) => return no_error(t, &err, msg),
    };
    if expected.equals_bytes(&actual) {
        return true;
    }
    not_equal(
        t,
        &expected.describe(),
        &expected.describe_actual(&actual),
        expected.diff(&actual),
        msg,
    )
}

/// Requires that the file at `path` holds exactly `expected`.
pub fn require_file_contents<T, C>(
    t: &mut T,
    fs: &dyn Fs,
    path: impl AsRef<Path>,
    expected: &C,
    msg: Option<&str>,
) where
    T: FatalReporter + ?Sized,
    C: FileContent + ?Sized,
{
    t.helper();
    if !assert_file_contents(t, fs, path, expected, msg) {
        t.fail_now();
    }
}

// ============================================================================
// SECTION: Equivalence
// ============================================================================

/// Asserts that `path` is equivalent on two filesystems.
///
/// Equivalence compares availability, then mode, then size, then content.
/// When both sides fail to stat the path the check passes without comparing
/// the errors. Timestamps are never compared.
///
/// ```
/// use testutils_toolkit::FakeTest;
/// use testutils_toolkit::assert_fs_file_equivalent;
/// use testutils_vfs::MemFs;
///
/// let mut t = FakeTest::default();
/// let reference = MemFs::new();
/// let tested = MemFs::new();
/// assert!(assert_fs_file_equivalent(&mut t, &reference, &tested, "/my/path", None));
/// ```
pub fn assert_fs_file_equivalent<T: Reporter + ?Sized>(
    t: &mut T,
    expected: &dyn Fs,
    actual: &dyn Fs,
    path: impl AsRef<Path>,
    msg: Option<&str>,
) -> bool {
    t.helper();
    let path = path.as_ref();
    let (expected_info, actual_info) = match (expected.stat(path), actual.stat(path)) {
        (Err(_), Err(_)) => return true,
        (Err(err), Ok(_)) => {
            return fail(
                t,
                &format!(
                    "Expecting an error {err} when opening file path {} but got nil",
                    path.display()
                ),
                msg,
            );
        }
        (Ok(_), Err(err)) => {
            return fail(
                t,
                &format!(
                    "Expecting no error when opening file path {} but got:\n{err}",
                    path.display()
                ),
                msg,
            );
        }
        (Ok(expected_info), Ok(actual_info)) => (expected_info, actual_info),
    };

    if expected_info.mode != actual_info.mode {
        return not_equal(
            t,
            &expected_info.mode.to_string(),
            &actual_info.mode.to_string(),
            None,
            msg,
        );
    }
    if expected_info.size != actual_info.size {
        return not_equal(
            t,
            &expected_info.size.to_string(),
            &actual_info.size.to_string(),
            None,
            msg,
        );
    }
    if expected_info.is_dir() {
        return true;
    }

    let expected_bytes = match read_file(expected, path) {
        Ok(bytes) => bytes,
        Err(err) => return no_error(t, &err, msg),
    };
    let actual_bytes = match read_file(actual, path) {
        Ok(bytes) => bytes,
        Err(err) => return no_error(t, &err, msg),
    };
    if expected_bytes.equals_bytes(&actual_bytes) {
        return true;
    }
    not_equal(
        t,
        &expected_bytes.describe(),
        &expected_bytes.describe_actual(&actual_bytes),
        None,
        msg,
    )
}

/// Requires that `path` is equivalent on two filesystems.
///
/// See [`assert_fs_file_equivalent`] for the comparison rules.
pub fn require_fs_file_equivalent<T: FatalReporter + ?Sized>(
    t: &mut T,
    expected: &dyn Fs,
    actual: &dyn Fs,
    path: impl AsRef<Path>,
    msg: Option<&str>,
) {
    t.helper();
    if !assert_fs_file_equivalent(t, expected, actual, path, msg) {
        t.fail_now();
    }
}
