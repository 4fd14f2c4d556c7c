//! HTTP client with interceptor hooks and normalized errors.
//!
//! The [`Client`] type is the main entry point for making HTTP requests.
//! Use [`ClientBuilder`] to configure and create clients, or [`Client::new`]
//! with a plain [`ClientConfig`].

use crate::{
    error::NormalizedError,
    interceptor::{Interceptors, Outcome},
    query::QueryParams,
    request::{build_url, merge_headers, parse_header, serialize_body, RequestDescriptor, RequestMetadata},
    response::{classify, ResponseOutcome},
    transport::{ReqwestTransport, Transport},
    Error, Result,
};
use http::{HeaderMap, Method};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

/// Everything a client is constructed from.
///
/// Captured once at construction and shared, read-only, by every call.
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    /// Prefix for every request path. Concatenated as-is, so an empty string
    /// means paths must be absolute URLs.
    pub base_url: String,

    /// Headers sent with every request unless overridden per call.
    pub default_headers: HeaderMap,

    /// Hooks run for every call.
    pub interceptors: Interceptors,
}

/// An HTTP client that runs every call through one pipeline: build, send,
/// classify, then at most one interceptor hook.
///
/// The client is cheap to clone; clones share configuration and transport.
///
/// # Examples
///
/// ```no_run
/// use kofetch::{Client, QueryParams};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize)]
/// struct CreateUser {
///     name: String,
/// }
///
/// #[derive(Deserialize)]
/// struct User {
///     id: u64,
///     name: String,
/// }
///
/// # async fn example() -> Result<(), kofetch::Error> {
/// let client = Client::builder()
///     .base_url("https://api.example.com")
///     .default_header("Content-Type", "application/json")?
///     .build()?;
///
/// // GET request with query parameters
/// let params = QueryParams::new().with("page", 1);
/// let users: Vec<User> = client.get("/users", Some(&params), None).await?;
///
/// // POST request
/// let new_user = CreateUser { name: "Alice".to_string() };
/// let created: User = client.post("/users", &new_user, None).await?;
/// println!("Created user with ID: {}", created.id);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    transport: Box<dyn Transport>,
    config: ClientConfig,
}

impl fmt::Debug for ClientInner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientInner")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a new `ClientBuilder` for configuring a client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Creates a client from a configuration record, using the default
    /// `reqwest` transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self> {
        ClientBuilder::from_config(config).build()
    }

    /// The base URL every path is appended to.
    pub fn base_url(&self) -> &str {
        &self.inner.config.base_url
    }

    /// The headers sent with every request.
    pub fn default_headers(&self) -> &HeaderMap {
        &self.inner.config.default_headers
    }

    /// Runs one call through the pipeline and returns the resolved value.
    ///
    /// Every verb method funnels into this. The value is the parsed success
    /// body, or whatever the applicable hook returned.
    ///
    /// # Errors
    ///
    /// * [`Error::Transport`] when no response was obtained and no
    ///   `on_request_fail` hook is set.
    /// * [`Error::Http`] when the status is outside `200..=299` and no
    ///   `on_response_fail` hook is set.
    /// * Whatever error a hook returns.
    /// * [`Error::DeserializationFailed`] when a 2xx body is not JSON, an
    ///   empty `204` included. This outcome never reaches a hook: neither
    ///   `on_success` nor `on_response_fail` runs, and the call fails with it
    ///   directly.
    /// * [`Error::SerializationFailed`] when the body cannot be serialized.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use kofetch::{Client, request::RequestMetadata};
    /// use http::Method;
    ///
    /// # async fn example() -> Result<(), kofetch::Error> {
    /// let client = Client::builder()
    ///     .base_url("https://api.example.com")
    ///     .build()?;
    ///
    /// let metadata = RequestMetadata::new(Method::POST, "/search")
    ///     .with_header("X-Trace", "abc")?
    ///     .with_query_param("limit", 10);
    ///
    /// let value = client.call(metadata, Some(&serde_json::json!({"q": "rust"}))).await?;
    /// println!("{value}");
    /// # Ok(())
    /// # }
    /// ```
    pub async fn call<B>(&self, metadata: RequestMetadata, body: Option<&B>) -> Result<Value>
    where
        B: Serialize + ?Sized,
    {
        let request = self.build_request(metadata, body)?;
        let outcome = self.execute(request).await?;
        self.inner.config.interceptors.dispatch(outcome).await
    }

    /// Builds the outgoing request: merge headers, run `before_request`,
    /// assemble the URL and serialize the body.
    fn build_request<B>(&self, metadata: RequestMetadata, body: Option<&B>) -> Result<RequestDescriptor>
    where
        B: Serialize + ?Sized,
    {
        let body = serialize_body(body)?;
        let config = &self.inner.config;
        let merged = merge_headers(&config.default_headers, &metadata.headers);
        let headers = config.interceptors.apply_before_request(merged);
        let url = build_url(&config.base_url, &metadata.path, metadata.query_params.as_ref());

        Ok(RequestDescriptor {
            method: metadata.method,
            url,
            headers,
            body,
        })
    }

    /// Sends the request and classifies the result into an [`Outcome`].
    async fn execute(&self, request: RequestDescriptor) -> Result<Outcome> {
        let method = request.method.clone();
        let url = request.url.clone();
        let start_time = Instant::now();

        tracing::debug!(method = %method, url = %url, "Executing HTTP request");

        let response = match self.inner.transport.execute(request).await {
            Ok(response) => response,
            Err(fault) => {
                tracing::warn!(
                    error = %fault,
                    method = %method,
                    url = %url,
                    "Request failed before a response was received"
                );
                return Ok(Outcome::TransportFault(fault));
            }
        };

        tracing::info!(
            status = response.status.as_u16(),
            latency_ms = start_time.elapsed().as_millis(),
            method = %method,
            url = %url,
            "Received HTTP response"
        );

        Ok(match classify(response)? {
            ResponseOutcome::Success(body) => Outcome::Success(body),
            ResponseOutcome::HttpFailure(response) => {
                Outcome::HttpFailure(Box::new(NormalizedError::from_response(response)))
            }
        })
    }

    /// Runs a call and converts the resolved value into `T`.
    async fn call_typed<B, T>(&self, metadata: RequestMetadata, body: Option<&B>) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let value = self.call(metadata, body).await?;
        serde_json::from_value(value).map_err(|e| Error::Conversion(e.to_string()))
    }

    /// Makes a GET request, optionally with query parameters and header
    /// overrides.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use kofetch::{Client, QueryParams};
    ///
    /// # async fn example() -> Result<(), kofetch::Error> {
    /// let client = Client::builder()
    ///     .base_url("https://api.example.com")
    ///     .build()?;
    ///
    /// let params = QueryParams::new().with("q", "rust").with("page", 2);
    /// let results: serde_json::Value = client.get("/search", Some(&params), None).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get<T>(
        &self,
        path: impl Into<String>,
        query: Option<&QueryParams>,
        headers: Option<&HeaderMap>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let mut metadata = with_overrides(RequestMetadata::new(Method::GET, path), headers);
        metadata.query_params = query.cloned();
        self.call_typed::<(), T>(metadata, None).await
    }

    /// Makes a POST request with a JSON body.
    pub async fn post<B, T>(&self, path: impl Into<String>, body: &B, headers: Option<&HeaderMap>) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let metadata = with_overrides(RequestMetadata::new(Method::POST, path), headers);
        self.call_typed(metadata, Some(body)).await
    }

    /// Makes a PUT request with a JSON body.
    pub async fn put<B, T>(&self, path: impl Into<String>, body: &B, headers: Option<&HeaderMap>) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let metadata = with_overrides(RequestMetadata::new(Method::PUT, path), headers);
        self.call_typed(metadata, Some(body)).await
    }

    /// Makes a PATCH request with a JSON body.
    pub async fn patch<B, T>(&self, path: impl Into<String>, body: &B, headers: Option<&HeaderMap>) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let metadata = with_overrides(RequestMetadata::new(Method::PATCH, path), headers);
        self.call_typed(metadata, Some(body)).await
    }

    /// Makes a DELETE request.
    pub async fn delete<T>(&self, path: impl Into<String>, headers: Option<&HeaderMap>) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let metadata = with_overrides(RequestMetadata::new(Method::DELETE, path), headers);
        self.call_typed::<(), T>(metadata, None).await
    }
}

fn with_overrides(metadata: RequestMetadata, headers: Option<&HeaderMap>) -> RequestMetadata {
    match headers {
        Some(headers) => metadata.with_headers(headers.clone()),
        None => metadata,
    }
}

/// Builder for configuring and creating a [`Client`].
///
/// # Examples
///
/// ```no_run
/// use kofetch::{ClientBuilder, Interceptors};
///
/// # async fn example() -> Result<(), kofetch::Error> {
/// let client = ClientBuilder::new()
///     .base_url("https://api.example.com")
///     .default_header("User-Agent", "my-app/1.0")?
///     .interceptors(
///         Interceptors::builder()
///             .on_response_fail(|err| async move { Ok(err.status_code.into()) })
///             .build(),
///     )
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct ClientBuilder {
    config: ClientConfig,
    transport: Option<Box<dyn Transport>>,
}

impl fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("config", &self.config)
            .field("custom_transport", &self.transport.is_some())
            .finish()
    }
}

impl ClientBuilder {
    /// Creates a new `ClientBuilder` with an empty base URL, no default
    /// headers and no hooks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an existing configuration record.
    pub fn from_config(config: ClientConfig) -> Self {
        Self {
            config,
            transport: None,
        }
    }

    /// Sets the base URL for all requests.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Adds a default header that will be included in all requests.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn default_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        let (name, value) = parse_header(name.as_ref(), value.as_ref())?;
        self.config.default_headers.insert(name, value);
        Ok(self)
    }

    /// Replaces all default headers.
    pub fn default_headers(mut self, headers: HeaderMap) -> Self {
        self.config.default_headers = headers;
        self
    }

    /// Sets the interceptor hooks.
    pub fn interceptors(mut self, interceptors: Interceptors) -> Self {
        self.config.interceptors = interceptors;
        self
    }

    /// Uses a custom transport instead of the default `reqwest` one.
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Box::new(transport));
        self
    }

    /// Uses a preconfigured `reqwest` client as the transport.
    pub fn http_client(self, client: reqwest::Client) -> Self {
        self.transport(ReqwestTransport::new(client))
    }

    /// Builds the configured `Client`.
    ///
    /// # Errors
    ///
    /// Returns an error if the default HTTP client cannot be built.
    pub fn build(self) -> Result<Client> {
        let transport = match self.transport {
            Some(transport) => transport,
            None => {
                let http_client = reqwest::Client::builder().build().map_err(|e| {
                    Error::ConfigurationError(format!("Failed to build HTTP client: {}", e))
                })?;
                Box::new(ReqwestTransport::new(http_client))
            }
        };

        Ok(Client {
            inner: Arc::new(ClientInner {
                transport,
                config: self.config,
            }),
        })
    }
}
