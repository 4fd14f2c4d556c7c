//! Raw responses and their classification.
//!
//! [`RawResponse`] is what a [`Transport`](crate::Transport) hands back: any
//! status code, headers, the final URL and the body bytes. [`classify`] turns
//! it into a [`ResponseOutcome`], the two-state result the dispatcher routes on.

use crate::{Error, Result};
use http::{HeaderMap, StatusCode};
use serde_json::Value;

/// A response as produced by the transport, before classification.
///
/// # Examples
///
/// ```
/// # use kofetch::RawResponse;
/// # use http::{HeaderMap, StatusCode, HeaderValue};
/// let mut headers = HeaderMap::new();
/// headers.insert("content-type", HeaderValue::from_static("application/json"));
///
/// let response = RawResponse::new(StatusCode::OK, headers, "http://localhost/a", b"{}".to_vec());
///
/// assert_eq!(response.header("content-type"), Some("application/json"));
/// assert_eq!(response.status_text, "OK");
/// assert!(response.is_json());
/// ```
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// The HTTP status code of the response.
    pub status: StatusCode,

    /// The response headers.
    pub headers: HeaderMap,

    /// The URL the response was served from, after any redirects.
    pub url: String,

    /// The status phrase. Empty for codes without a canonical reason.
    pub status_text: String,

    /// The response body.
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Creates a new `RawResponse`, deriving the status text from the code.
    pub fn new(status: StatusCode, headers: HeaderMap, url: impl Into<String>, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            url: url.into(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            body,
        }
    }

    /// Returns a reference to a header value by name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }

    /// Returns `true` if `Content-Type` contains `application/json`.
    pub fn is_json(&self) -> bool {
        self.header(http::header::CONTENT_TYPE.as_str())
            .is_some_and(|ct| ct.contains("application/json"))
    }

    /// Returns the body as text, replacing invalid UTF-8.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// The classified result of a single response.
///
/// Transient: built and consumed within one call.
#[derive(Debug)]
pub enum ResponseOutcome {
    /// Status in `200..=299`, body parsed as JSON.
    Success(Value),
    /// Any other status. Normalized later by [`NormalizedError::from_response`](crate::NormalizedError::from_response).
    HttpFailure(RawResponse),
}

/// Classifies a response by its status code alone.
///
/// Success bodies are parsed strictly as JSON whatever the declared content
/// type; a body that does not parse fails with
/// [`Error::DeserializationFailed`].
pub fn classify(response: RawResponse) -> Result<ResponseOutcome> {
    let status = response.status;

    if !status.is_success() {
        if status.is_client_error() {
            tracing::error!(status = status.as_u16(), url = %response.url, "Client error (4xx)");
        } else if status.is_server_error() {
            tracing::warn!(status = status.as_u16(), url = %response.url, "Server error (5xx)");
        } else {
            tracing::warn!(status = status.as_u16(), url = %response.url, "Unexpected status");
        }
        return Ok(ResponseOutcome::HttpFailure(response));
    }

    match serde_json::from_slice::<Value>(&response.body) {
        Ok(data) => Ok(ResponseOutcome::Success(data)),
        Err(e) => {
            let raw_response = response.text();
            tracing::error!(
                error = %e,
                raw_response = %raw_response,
                "Failed to deserialize response"
            );

            Err(Error::DeserializationFailed {
                raw_response,
                serde_error: e.to_string(),
                status,
            })
        }
    }
}
