//! Error types for HTTP API calls.
//!
//! A call can fail in two ways that matter to the pipeline: the transport never
//! produced a response ([`TransportFault`]), or a response arrived with a status
//! outside `200..=299` ([`NormalizedError`]). Both are carried by [`Error`],
//! alongside the handful of local failures (serialization, configuration) that
//! happen before or after the round trip.

use crate::response::RawResponse;
use http::{HeaderMap, StatusCode};
use serde_json::Value;
use std::fmt;

/// The main error type for HTTP API calls.
///
/// # Examples
///
/// ```no_run
/// use kofetch::{Client, Error};
///
/// # async fn example() -> Result<(), Error> {
/// let client = Client::builder()
///     .base_url("https://api.example.com")
///     .build()?;
///
/// match client.get::<serde_json::Value>("/endpoint", None, None).await {
///     Ok(value) => println!("Success: {value}"),
///     Err(Error::Http(err)) => {
///         eprintln!("{} ({}): {:?}", err.name, err.message, err.response_body);
///     }
///     Err(Error::Transport(fault)) => eprintln!("No response: {fault}"),
///     Err(e) => eprintln!("Other error: {e}"),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The transport failed before any response existed.
    #[error("Transport error: {0}")]
    Transport(#[from] TransportFault),

    /// The server answered with a status outside the success range.
    #[error("{0}")]
    Http(Box<NormalizedError>),

    /// A successful response carried a body that is not valid JSON.
    ///
    /// # Fields
    ///
    /// * `raw_response` - The raw response body as a string
    /// * `serde_error` - The error message from serde
    /// * `status` - The HTTP status code
    #[error("Failed to deserialize response (status {status}): {serde_error}")]
    DeserializationFailed {
        /// The raw response body that failed to deserialize
        raw_response: String,
        /// The serde error message
        serde_error: String,
        /// The HTTP status code
        status: StatusCode,
    },

    /// The resolved value could not be converted into the requested type.
    #[error("Failed to convert resolved value: {0}")]
    Conversion(String),

    /// Failed to serialize the request body.
    #[error("Failed to serialize request: {0}")]
    SerializationFailed(String),

    /// Invalid configuration was provided, such as a malformed header.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// A failure raised by an interceptor hook.
    #[error("Interceptor error: {0}")]
    Hook(String),
}

impl Error {
    /// Creates an [`Error::Hook`] from any message.
    ///
    /// Hooks that want a call to keep failing can either return the error they
    /// were handed or build one of these.
    pub fn hook(message: impl Into<String>) -> Self {
        Error::Hook(message.into())
    }

    /// Returns the HTTP status code if this error has one.
    ///
    /// Transport faults never carry a status.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Http(err) => StatusCode::from_u16(err.status_code).ok(),
            Error::DeserializationFailed { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the normalized HTTP failure, if this is one.
    pub fn normalized(&self) -> Option<&NormalizedError> {
        match self {
            Error::Http(err) => Some(err),
            _ => None,
        }
    }

    /// Returns the transport fault, if this is one.
    pub fn transport_fault(&self) -> Option<&TransportFault> {
        match self {
            Error::Transport(fault) => Some(fault),
            _ => None,
        }
    }
}

impl From<NormalizedError> for Error {
    fn from(err: NormalizedError) -> Self {
        Error::Http(Box::new(err))
    }
}

/// A specialized `Result` type for HTTP API calls.
pub type Result<T> = std::result::Result<T, Error>;

/// The broad class of a [`TransportFault`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// Connection could not be established (DNS, refused, TLS).
    Connect,
    /// The underlying client gave up waiting.
    Timeout,
    /// The request was rejected before it left, e.g. an unparseable URL.
    InvalidRequest,
    /// Anything else, including failures while reading the body.
    Other,
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            FaultKind::Connect => "connect",
            FaultKind::Timeout => "timeout",
            FaultKind::InvalidRequest => "invalid request",
            FaultKind::Other => "other",
        };
        f.write_str(kind)
    }
}

/// A failure raised by the transport before any response existed.
///
/// It has no status code and no body.
#[derive(thiserror::Error, Debug)]
#[error("{kind}: {message}")]
pub struct TransportFault {
    kind: FaultKind,
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl TransportFault {
    /// Creates a fault with no underlying source.
    pub fn new(kind: FaultKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Attaches the error that caused this fault.
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// The class of failure.
    pub fn kind(&self) -> FaultKind {
        self.kind
    }

    /// A human-readable description.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<reqwest::Error> for TransportFault {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            FaultKind::Timeout
        } else if err.is_connect() {
            FaultKind::Connect
        } else if err.is_builder() {
            FaultKind::InvalidRequest
        } else {
            FaultKind::Other
        };
        TransportFault::new(kind, err.to_string()).with_source(err)
    }
}

/// The body of a failed response.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// The response declared `application/json` and parsed.
    Json(Value),
    /// Any other content type, kept verbatim.
    Text(String),
}

impl ResponseBody {
    /// Returns the JSON value, if the body was JSON.
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ResponseBody::Json(value) => Some(value),
            ResponseBody::Text(_) => None,
        }
    }

    /// Returns the text, if the body was not JSON.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ResponseBody::Json(_) => None,
            ResponseBody::Text(text) => Some(text),
        }
    }
}

/// The uniform record for a response whose status is outside `200..=299`.
///
/// Only ever built from a [`RawResponse`]; a transport fault never produces one.
#[derive(thiserror::Error, Debug, Clone)]
#[error("{name} {message}")]
pub struct NormalizedError {
    /// The HTTP status code.
    pub status_code: u16,
    /// Always `"Response failed: <status_code>"`.
    pub name: String,
    /// Parsed JSON when the response declared it, raw text otherwise.
    pub response_body: ResponseBody,
    /// The URL the response came from.
    pub request_url: String,
    /// Headers as observed on the response.
    pub request_headers: HeaderMap,
    /// The HTTP status phrase.
    pub message: String,
}

impl NormalizedError {
    /// Builds the normalized record for a failed response.
    ///
    /// The body is parsed as JSON only when `Content-Type` contains
    /// `application/json`. A body that claims JSON but does not parse is kept
    /// as text.
    pub fn from_response(response: RawResponse) -> Self {
        let response_body = if response.is_json() {
            match serde_json::from_slice(&response.body) {
                Ok(value) => ResponseBody::Json(value),
                Err(e) => {
                    tracing::debug!(error = %e, "Failure body declared JSON but did not parse");
                    ResponseBody::Text(response.text())
                }
            }
        } else {
            ResponseBody::Text(response.text())
        };

        Self {
            status_code: response.status.as_u16(),
            name: format!("Response failed: {}", response.status.as_u16()),
            response_body,
            request_url: response.url,
            request_headers: response.headers,
            message: response.status_text,
        }
    }
}
