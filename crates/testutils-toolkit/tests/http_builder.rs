// crates/testutils-toolkit/tests/http_builder.rs
// ============================================================================
// Module: HTTP Builder Tests
// Description: Response builder and round-tripper behavior.
// Purpose: Verify status, body and header handling of fake responses.
// Dependencies: testutils-toolkit, serde, serde_json
// ============================================================================

//! ## Overview
//! Tests for [`HttpResponseBuilder`] and [`RoundTripperFunc`].

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

use std::collections::BTreeMap;

use serde::Serialize;
use serde::Serializer;
use testutils_toolkit::FakeTest;
use testutils_toolkit::HttpResponseBuilder;
use testutils_toolkit::Request;
use testutils_toolkit::RoundTripError;
use testutils_toolkit::RoundTripper;
use testutils_toolkit::RoundTripperFunc;
use testutils_toolkit::StatusCode;
use testutils_toolkit::header;
use testutils_toolkit::header::HeaderValue;
use testutils_toolkit::string_body;

/// Value whose serialization always fails.
struct Unserializable;

impl Serialize for Unserializable {
    fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
        Err(serde::ser::Error::custom("refusing to serialize"))
    }
}

// ============================================================================
// SECTION: Response Builder
// ============================================================================

#[test]
fn builder_defaults_to_empty_ok_response() {
    let response = HttpResponseBuilder::new().build();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.body().is_empty());
    assert!(response.headers().is_empty());
}

#[test]
fn builder_sets_status_code() {
    let mut t = FakeTest::default();
    let response = HttpResponseBuilder::new()
        .with_reporter(&mut t)
        .with_status_code(StatusCode::BAD_GATEWAY)
        .build();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert!(!t.is_failing());
}

#[test]
fn builder_serializes_json_body() {
    let mut t = FakeTest::default();
    let mut body = BTreeMap::new();
    body.insert("hello", "world");
    let response = HttpResponseBuilder::new().with_reporter(&mut t).with_json_body(&body).build();

    let decoded: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
    assert_eq!(decoded, serde_json::json!({"hello": "world"}));
    assert!(response.body().ends_with(b"\n"));
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap().to_str().unwrap(),
        "application/json"
    );
    assert!(!t.is_failing());
}

#[test]
fn builder_reports_json_serialization_failure() {
    let mut t = FakeTest::default();
    let response =
        HttpResponseBuilder::new().with_reporter(&mut t).with_json_body(&Unserializable).build();

    assert!(response.body().is_empty());
    assert!(!t.failed);
    assert_eq!(t.error_messages.len(), 1);
    assert!(t.error_messages[0].contains("refusing to serialize"));
}

#[test]
fn builder_without_reporter_tolerates_serialization_failure() {
    let response = HttpResponseBuilder::new().with_json_body(&Unserializable).build();
    assert!(response.body().is_empty());
}

#[test]
fn builder_sets_body_and_replaces_headers() {
    let response = HttpResponseBuilder::new()
        .with_body(string_body("plain text"))
        .with_header(header::CONTENT_TYPE, HeaderValue::from_static("text/html"))
        .with_header(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"))
        .build();

    assert_eq!(response.body().as_ref(), b"plain text");
    let values: Vec<_> = response.headers().get_all(header::CONTENT_TYPE).iter().collect();
    assert_eq!(values, vec![&HeaderValue::from_static("text/plain")]);
}

// ============================================================================
// SECTION: Round Tripper
// ============================================================================

#[test]
fn round_tripper_func_answers_requests() {
    let tripper = RoundTripperFunc::new(|request: Request<bytes::Bytes>| {
        let status = if request.uri().path() == "/health" {
            StatusCode::NO_CONTENT
        } else {
            StatusCode::NOT_FOUND
        };
        Ok(HttpResponseBuilder::new().with_status_code(status).build())
    });

    let health = Request::builder().uri("/health").body(bytes::Bytes::new()).unwrap();
    assert_eq!(tripper.round_trip(health).unwrap().status(), StatusCode::NO_CONTENT);
    let other = Request::builder().uri("/other").body(bytes::Bytes::new()).unwrap();
    assert_eq!(tripper.round_trip(other).unwrap().status(), StatusCode::NOT_FOUND);
}

#[test]
fn round_tripper_func_propagates_errors() {
    let tripper =
        RoundTripperFunc::new(|_| Err(RoundTripError::Failed("connection refused".to_string())));
    let request = Request::new(bytes::Bytes::new());
    let err = tripper.round_trip(request).unwrap_err();
    assert_eq!(err.to_string(), "round trip failed: connection refused");
}

#[test]
fn unset_round_tripper_fails() {
    let request = Request::new(bytes::Bytes::new());
    let err = RoundTripperFunc::unset().round_trip(request).unwrap_err();
    assert!(matches!(err, RoundTripError::Unset));
    assert_eq!(err.to_string(), "round-tripper function is not set");
    assert!(RoundTripperFunc::default().round_trip(Request::new(bytes::Bytes::new())).is_err());
}
