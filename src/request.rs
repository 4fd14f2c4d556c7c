//! Per-call request options and the outgoing request shape.

use crate::query::{QueryParams, QueryValue};
use crate::{Error, Result};
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use serde::Serialize;

/// Metadata for an individual HTTP request.
///
/// Holds everything that varies per call apart from the body: method, path,
/// header overrides and query parameters.
///
/// # Examples
///
/// ```
/// use kofetch::request::RequestMetadata;
/// use http::Method;
///
/// # fn example() -> Result<(), kofetch::Error> {
/// let metadata = RequestMetadata::new(Method::GET, "/search")
///     .with_header("Accept-Language", "ko")?
///     .with_query_param("q", "rust")
///     .with_query_param("page", 2);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RequestMetadata {
    /// The HTTP method.
    pub method: Method,

    /// The request path, appended verbatim to the base URL.
    pub path: String,

    /// Header overrides for this request.
    pub headers: HeaderMap,

    /// Query parameters for this request. `None` means no `?` is appended.
    pub query_params: Option<QueryParams>,
}

impl RequestMetadata {
    /// Creates a new `RequestMetadata` with the given method and path.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
            query_params: None,
        }
    }

    /// Adds a header override to the request.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn with_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        let (name, value) = parse_header(name.as_ref(), value.as_ref())?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Replaces the header overrides wholesale.
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Adds a query parameter to the request.
    pub fn with_query_param(mut self, key: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.query_params
            .get_or_insert_with(QueryParams::new)
            .insert(key, value);
        self
    }

    /// Sets all query parameters at once.
    pub fn with_query_params(mut self, params: QueryParams) -> Self {
        self.query_params = Some(params);
        self
    }
}

impl Default for RequestMetadata {
    fn default() -> Self {
        Self::new(Method::GET, "")
    }
}

/// The final outgoing request, ready for a [`Transport`](crate::Transport).
///
/// Built fresh for every call and handed to the transport by value.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    /// The HTTP method.
    pub method: Method,
    /// The full target URL including any query string.
    pub url: String,
    /// The headers to send, after merging and the before-request hook.
    pub headers: HeaderMap,
    /// JSON text of the body, if there is one.
    pub body: Option<String>,
}

/// Parses a header name/value pair, mapping failures to configuration errors.
pub(crate) fn parse_header(name: &str, value: &str) -> Result<(HeaderName, HeaderValue)> {
    let name = HeaderName::try_from(name)
        .map_err(|e| Error::ConfigurationError(format!("Invalid header name: {}", e)))?;
    let value = HeaderValue::try_from(value)
        .map_err(|e| Error::ConfigurationError(format!("Invalid header value: {}", e)))?;
    Ok((name, value))
}

/// Merges `overrides` on top of `defaults`.
///
/// Header names compare case-insensitively. Every value an override carries for
/// a name replaces all default values for that name; names only present in
/// `defaults` are kept.
pub fn merge_headers(defaults: &HeaderMap, overrides: &HeaderMap) -> HeaderMap {
    let mut merged = defaults.clone();
    for name in overrides.keys() {
        merged.remove(name);
        for value in overrides.get_all(name) {
            merged.append(name.clone(), value.clone());
        }
    }
    merged
}

/// Builds the target URL by plain concatenation of base, path and query.
pub fn build_url(base_url: &str, path: &str, query: Option<&QueryParams>) -> String {
    match query {
        Some(params) => format!("{}{}?{}", base_url, path, params.to_query_string()),
        None => format!("{}{}", base_url, path),
    }
}

/// Serializes the request body to JSON text.
///
/// A body that serializes to `null` is treated as absent.
pub fn serialize_body<B>(body: Option<&B>) -> Result<Option<String>>
where
    B: Serialize + ?Sized,
{
    let Some(body) = body else {
        return Ok(None);
    };
    let value =
        serde_json::to_value(body).map_err(|e| Error::SerializationFailed(e.to_string()))?;
    if value.is_null() {
        return Ok(None);
    }
    serde_json::to_string(&value)
        .map(Some)
        .map_err(|e| Error::SerializationFailed(e.to_string()))
}
