// crates/testutils-toolkit/src/http.rs
// ============================================================================
// Module: HTTP Test Doubles
// Description: Fluent response builder and closure-backed round-tripper.
// Purpose: Fake HTTP responses in tests without running a server.
// Dependencies: hyper, bytes, serde_json, thiserror
// ============================================================================

//! ## Overview
//! [`HttpResponseBuilder`] accumulates a status code, body and headers and
//! hands back the [`Response`] untouched by [`HttpResponseBuilder::build`].
//! [`RoundTripperFunc`] turns a closure into a [`RoundTripper`] so code under
//! test can be given canned responses.

// ============================================================================
// SECTION: Imports
// ============================================================================

use bytes::Bytes;
use hyper::Request;
use hyper::Response;
use hyper::StatusCode;
use hyper::header::CONTENT_TYPE;
use hyper::header::HeaderName;
use hyper::header::HeaderValue;
use serde::Serialize;
use thiserror::Error;

use crate::failure::no_error;
use crate::reporter::Reporter;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Content type set by [`HttpResponseBuilder::with_json_body`].
pub const JSON_CONTENT_TYPE: &str = "application/json";

// ============================================================================
// SECTION: Response Builder
// ============================================================================

/// Wraps a string as a response body.
#[must_use]
pub fn string_body(body: &str) -> Bytes {
    Bytes::copy_from_slice(body.as_bytes())
}

/// Fluent builder for test HTTP responses.
///
/// ```
/// use hyper::StatusCode;
/// use testutils_toolkit::HttpResponseBuilder;
///
/// let response = HttpResponseBuilder::new().with_status_code(StatusCode::BAD_GATEWAY).build();
/// assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
/// ```
pub struct HttpResponseBuilder<'t> {
    /// Response under construction.
    response: Response<Bytes>,
    /// Optional reporter receiving serialization failures.
    reporter: Option<&'t mut dyn Reporter>,
}

impl HttpResponseBuilder<'static> {
    /// Creates a builder for an empty `200 OK` response.
    #[must_use]
    pub fn new() -> Self {
        Self {
            response: Response::new(Bytes::new()),
            reporter: None,
        }
    }
}

impl Default for HttpResponseBuilder<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'t> HttpResponseBuilder<'t> {
    /// Attaches a reporter that receives body serialization failures.
    #[must_use]
    pub fn with_reporter<'r>(self, reporter: &'r mut dyn Reporter) -> HttpResponseBuilder<'r> {
        HttpResponseBuilder {
            response: self.response,
            reporter: Some(reporter),
        }
    }

    /// Sets the status code.
    #[must_use]
    pub fn with_status_code(mut self, status: StatusCode) -> Self {
        *self.response.status_mut() = status;
        self
    }

    /// Replaces the body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        *self.response.body_mut() = body.into();
        self
    }

    /// Sets a header, replacing any previous value.
    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.response.headers_mut().insert(name, value);
        self
    }

    /// Serializes `body` as JSON, sets it as the body and marks the content type.
    ///
    /// The encoded body ends with a newline. Serialization failures are
    /// reported through the attached reporter, or logged when none is attached,
    /// and leave an empty body.
    #[must_use]
    pub fn with_json_body<V: Serialize + ?Sized>(mut self, body: &V) -> Self {
        let encoded = match serde_json::to_vec(body) {
            Ok(mut encoded) => {
                encoded.push(b'\n');
                Bytes::from(encoded)
            }
            Err(err) => {
                if let Some(reporter) = self.reporter.as_deref_mut() {
                    reporter.helper();
                    no_error(reporter, &err, None);
                } else {
                    tracing::warn!(error = %err, "json response body serialization failed");
                }
                Bytes::new()
            }
        };
        *self.response.body_mut() = encoded;
        self.response.headers_mut().insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
        self
    }

    /// Returns the accumulated response as-is.
    #[must_use]
    pub fn build(self) -> Response<Bytes> {
        self.response
    }
}

// ============================================================================
// SECTION: Round Tripper
// ============================================================================

/// Errors returned by [`RoundTripper`] implementations.
#[derive(Debug, Error)]
pub enum RoundTripError {
    /// The round-tripper has no function to call.
    #[error("round-tripper function is not set")]
    Unset,
    /// The round trip failed.
    #[error("round trip failed: {0}")]
    Failed(String),
}

/// Executes a single HTTP exchange.
pub trait RoundTripper {
    /// Sends `request` and returns its response.
    ///
    /// # Errors
    ///
    /// Returns [`RoundTripError`] when no response can be produced.
    fn round_trip(&self, request: Request<Bytes>) -> Result<Response<Bytes>, RoundTripError>;
}

/// Function signature wrapped by [`RoundTripperFunc`].
type RoundTripFn =
    dyn Fn(Request<Bytes>) -> Result<Response<Bytes>, RoundTripError> + Send + Sync;

/// A [`RoundTripper`] backed by a closure.
#[derive(Default)]
pub struct RoundTripperFunc {
    /// Closure answering requests; `None` fails every request.
    func: Option<Box<RoundTripFn>>,
}

impl RoundTripperFunc {
    /// Wraps `func`.
    #[must_use]
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(Request<Bytes>) -> Result<Response<Bytes>, RoundTripError> + Send + Sync + 'static,
    {
        Self {
            func: Some(Box::new(func)),
        }
    }

    /// Creates a round-tripper without a function.
    #[must_use]
    pub const fn unset() -> Self {
        Self {
            func: None,
        }
    }
}

impl RoundTripper for RoundTripperFunc {
    fn round_trip(&self, request: Request<Bytes>) -> Result<Response<Bytes>, RoundTripError> {
        match &self.func {
            Some(func) => func(request),
            None => Err(RoundTripError::Unset),
        }
    }
}
