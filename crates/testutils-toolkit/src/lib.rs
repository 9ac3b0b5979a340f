// crates/testutils-toolkit/src/lib.rs
// ============================================================================
// Module: Testutils Toolkit
// Description: Test helpers for filesystems, HTTP, TLS and integration gating.
// Purpose: Share assertion and fixture helpers across test suites.
// Dependencies: testutils-vfs, hyper, rcgen, serde, tracing
// ============================================================================

//! ## Overview
//! Helpers report through small capability traits instead of panicking
//! directly, so they work with any test-result consumer:
//! - [`Reporter`] receives failure reports.
//! - [`FatalReporter`] can also stop the test.
//! - [`SkippableTest`] can skip it.
//!
//! [`FakeTest`] records reports so the helpers can be tested themselves;
//! [`TestContext`] drives real `#[test]` functions.
//!
//! Helper families:
//! - Filesystem fixtures and assertions over a [`testutils_vfs::Fs`].
//! - [`HttpResponseBuilder`] and [`RoundTripperFunc`] for fake HTTP exchanges.
//! - [`new_self_signed_certificate`] for ephemeral TLS assets.
//! - [`integration_test`] and [`skip_unless_integration!`] for opt-in suites.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod certificates;
pub mod config;
pub mod failure;
pub mod files;
pub mod http;
pub mod integration;
pub mod logging;
pub mod reporter;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use certificates::CertificateError;
pub use certificates::CertificateOptions;
pub use certificates::CertificatePaths;
pub use certificates::generate_self_signed_certificate;
pub use certificates::new_self_signed_certificate;
pub use certificates::new_self_signed_certificate_with;
pub use config::ConfigError;
pub use config::TestutilsConfig;
pub use failure::FailureReport;
pub use failure::fail;
pub use failure::no_error;
pub use files::FileContent;
pub use files::assert_file_contents;
pub use files::assert_file_exists;
pub use files::assert_fs_file_equivalent;
pub use files::ensure_file_content;
pub use files::ensure_yaml_file_content;
pub use files::require_file_contents;
pub use files::require_file_exists;
pub use files::require_fs_file_equivalent;
pub use http::HttpResponseBuilder;
pub use http::RoundTripError;
pub use http::RoundTripper;
pub use http::RoundTripperFunc;
pub use http::string_body;
pub use hyper::Request;
pub use hyper::Response;
pub use hyper::StatusCode;
pub use hyper::header;
pub use hyper::header::HeaderMap;
pub use integration::IntegrationConfig;
pub use integration::IntegrationGate;
pub use integration::integration_test;
pub use logging::init_test_logging;
pub use reporter::FakeTest;
pub use reporter::FatalReporter;
pub use reporter::Helper;
pub use reporter::Reporter;
pub use reporter::SkippableTest;
pub use reporter::TestContext;
