// crates/testutils-toolkit/src/failure.rs
// ============================================================================
// Module: Failure Reports
// Description: Failure message templates, labeled output and content diffs.
// Purpose: Give every assertion helper one consistent failure rendering.
// Dependencies: std
// ============================================================================

//! ## Overview
//! A [`FailureReport`] is the unit a [`crate::Reporter`] receives: a message
//! template with `{}` placeholders plus its rendered arguments. Assertion
//! helpers build reports through [`fail`], [`no_error`] and the crate-private
//! `not_equal`, which lay the message out as labeled blocks:
//!
//! ```text
//!
//!     Error:      Not equal:
//!                 expected: "hello world"
//!                 actual  : "this is wrong"
//!     Messages:   extra context
//! ```

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::fmt::Write as _;

use crate::reporter::Reporter;

// ============================================================================
// SECTION: Failure Report
// ============================================================================

/// Placeholder substituted by [`FailureReport::render`].
const PLACEHOLDER: &str = "{}";
/// Largest LCS table [`line_diff`] builds for the differing region.
pub(crate) const MAX_DIFF_CELLS: usize = 1 << 20;

/// A message template and its arguments, as recorded by reporters.
///
/// # Invariants
/// - `args` are already rendered; reports never hold live values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureReport {
    /// Message template with `{}` placeholders.
    pub template: String,
    /// Arguments substituted into the template in order.
    pub args: Vec<String>,
}

impl FailureReport {
    /// Creates a report from a template and its arguments.
    #[must_use]
    pub fn new(template: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            template: template.into(),
            args,
        }
    }

    /// Creates a report whose rendered form is exactly `message`.
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self::new(PLACEHOLDER, vec![message.into()])
    }

    /// Renders the template.
    ///
    /// Arguments replace placeholders in order. Surplus arguments are
    /// appended separated by spaces; surplus placeholders are kept verbatim.
    #[must_use]
    pub fn render(&self) -> String {
        let mut rendered = String::with_capacity(self.template.len());
        let mut args = self.args.iter();
        let mut rest = self.template.as_str();
        while let Some(index) = rest.find(PLACEHOLDER) {
            rendered.push_str(&rest[..index]);
            match args.next() {
                Some(arg) => rendered.push_str(arg),
                None => rendered.push_str(PLACEHOLDER),
            }
            rest = &rest[index + PLACEHOLDER.len()..];
        }
        rendered.push_str(rest);
        for extra in args {
            rendered.push(' ');
            rendered.push_str(extra);
        }
        rendered
    }
}

impl fmt::Display for FailureReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

// ============================================================================
// SECTION: Reporting Helpers
// ============================================================================

/// Reports `failure` with an optional extra message. Always returns `false`.
pub fn fail<T: Reporter + ?Sized>(t: &mut T, failure: &str, msg: Option<&str>) -> bool {
    t.helper();
    let mut labels = vec![("Error", failure)];
    if let Some(msg) = msg.filter(|msg| !msg.is_empty()) {
        labels.push(("Messages", msg));
    }
    t.errorf(FailureReport::new("\n{}", vec![labeled_output(&labels)]));
    false
}

/// Reports an unexpected error. Always returns `false`.
pub fn no_error<T: Reporter + ?Sized>(t: &mut T, err: &dyn fmt::Display, msg: Option<&str>) -> bool {
    t.helper();
    fail(t, &format!("Received unexpected error:\n{err}"), msg)
}

/// Reports a value mismatch with an optional diff. Always returns `false`.
pub(crate) fn not_equal<T: Reporter + ?Sized>(
    t: &mut T,
    expected: &str,
    actual: &str,
    diff: Option<String>,
    msg: Option<&str>,
) -> bool {
    t.helper();
    let mut failure = format!("Not equal: \nexpected: {expected}\nactual  : {actual}");
    if let Some(diff) = diff.filter(|diff| !diff.is_empty()) {
        failure.push_str("\n\nDiff:\n");
        failure.push_str(&diff);
    }
    fail(t, &failure, msg)
}

// ============================================================================
// SECTION: Layout
// ============================================================================

/// Lays out `(label, content)` pairs as tab-aligned blocks.
///
/// Continuation lines of multi-line content are indented under the first.
pub(crate) fn labeled_output(labels: &[(&str, &str)]) -> String {
    let width = labels.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    let mut output = String::new();
    for (label, content) in labels {
        let padding = " ".repeat(width - label.len());
        let mut lines = content.trim_end_matches('\n').split('\n');
        let first = lines.next().unwrap_or_default();
        let _ = writeln!(output, "\t{label}:{padding}\t{first}");
        for line in lines {
            let _ = writeln!(output, "\t{}\t{line}", " ".repeat(width + 1));
        }
    }
    output
}

/// Produces a line diff between two texts.
///
/// Lines are prefixed with `-` (expected only), `+` (actual only) or a space
/// (shared). Returns an empty string when the texts are equal or when the
/// differing region would need more than [`MAX_DIFF_CELLS`] table cells.
pub(crate) fn line_diff(expected: &str, actual: &str) -> String {
    if expected == actual {
        return String::new();
    }
    let left: Vec<&str> = expected.split('\n').collect();
    let right: Vec<&str> = actual.split('\n').collect();

    let prefix = left.iter().zip(&right).take_while(|(a, b)| a == b).count();
    let suffix = left[prefix..]
        .iter()
        .rev()
        .zip(right[prefix..].iter().rev())
        .take_while(|(a, b)| a == b)
        .count();
    let old = &left[prefix..left.len() - suffix];
    let new = &right[prefix..right.len() - suffix];
    let cells = (old.len() + 1).saturating_mul(new.len() + 1);
    if cells > MAX_DIFF_CELLS {
        return String::new();
    }

    // Longest common subsequence lengths of suffixes, row-major.
    let width = new.len() + 1;
    let mut table = vec![0_usize; cells];
    for i in (0..old.len()).rev() {
        for j in (0..new.len()).rev() {
            table[i * width + j] = if old[i] == new[j] {
                table[(i + 1) * width + j + 1] + 1
            } else {
                table[(i + 1) * width + j].max(table[i * width + j + 1])
            };
        }
    }

    let mut diff = String::from("--- Expected\n+++ Actual\n");
    for line in &left[..prefix] {
        let _ = writeln!(diff, " {line}");
    }
    let (mut i, mut j) = (0, 0);
    while i < old.len() || j < new.len() {
        if i < old.len() && j < new.len() && old[i] == new[j] {
            let _ = writeln!(diff, " {}", old[i]);
            i += 1;
            j += 1;
        } else if i < old.len()
            && (j == new.len() || table[(i + 1) * width + j] >= table[i * width + j + 1])
        {
            let _ = writeln!(diff, "-{}", old[i]);
            i += 1;
        } else {
            let _ = writeln!(diff, "+{}", new[j]);
            j += 1;
        }
    }
    for line in &left[left.len() - suffix..] {
        let _ = writeln!(diff, " {line}");
    }
    diff
}
