//! Interceptor hooks and the dispatcher that routes a call's outcome to them.
//!
//! There are four hook points, all optional:
//!
//! 1. `before_request(HeaderMap) -> HeaderMap`, synchronous, runs before dispatch.
//!    Its return value replaces the merged headers outright.
//! 2. `on_success(Value) -> Result<Value>`, after a 2xx response was parsed.
//! 3. `on_request_fail(TransportFault) -> Result<Value>`, when no response exists.
//! 4. `on_response_fail(NormalizedError) -> Result<Value>`, after a non-2xx response.
//!
//! Hooks 2 to 4 are async. At most one of them runs per call. When the hook for
//! a failure branch is absent, that failure reaches the caller unchanged. When
//! it is present, whatever it returns is the call's result.

use crate::error::{NormalizedError, TransportFault};
use crate::{Error, Result};
use http::HeaderMap;
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// A boxed future returned by the async hooks.
pub type HookFuture = Pin<Box<dyn Future<Output = Result<Value>> + Send>>;

type BeforeRequestFn = dyn Fn(HeaderMap) -> HeaderMap + Send + Sync;
type OnSuccessFn = dyn Fn(Value) -> HookFuture + Send + Sync;
type OnRequestFailFn = dyn Fn(TransportFault) -> HookFuture + Send + Sync;
type OnResponseFailFn = dyn Fn(NormalizedError) -> HookFuture + Send + Sync;

/// The set of hooks a client runs for every call.
///
/// Immutable once built; cloning is cheap and shares the hooks.
///
/// # Examples
///
/// ```
/// use kofetch::{Interceptors, ResponseBody};
/// use http::HeaderValue;
///
/// let interceptors = Interceptors::builder()
///     .before_request(|mut headers| {
///         headers.insert("x-request-source", HeaderValue::from_static("kofetch"));
///         headers
///     })
///     .on_success(|body| async move { Ok(body["data"].clone()) })
///     .on_response_fail(|err| async move {
///         match err.response_body {
///             ResponseBody::Json(value) => Ok(value),
///             ResponseBody::Text(text) => Ok(text.into()),
///         }
///     })
///     .build();
///
/// assert!(interceptors.has_before_request());
/// assert!(!interceptors.has_on_request_fail());
/// ```
#[derive(Clone, Default)]
pub struct Interceptors {
    before_request: Option<Arc<BeforeRequestFn>>,
    on_success: Option<Arc<OnSuccessFn>>,
    on_request_fail: Option<Arc<OnRequestFailFn>>,
    on_response_fail: Option<Arc<OnResponseFailFn>>,
}

impl fmt::Debug for Interceptors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interceptors")
            .field("before_request", &self.before_request.is_some())
            .field("on_success", &self.on_success.is_some())
            .field("on_request_fail", &self.on_request_fail.is_some())
            .field("on_response_fail", &self.on_response_fail.is_some())
            .finish()
    }
}

impl Interceptors {
    /// Creates a builder with no hooks set.
    pub fn builder() -> InterceptorsBuilder {
        InterceptorsBuilder::default()
    }

    /// Returns `true` if a before-request hook is set.
    pub fn has_before_request(&self) -> bool {
        self.before_request.is_some()
    }

    /// Returns `true` if a success hook is set.
    pub fn has_on_success(&self) -> bool {
        self.on_success.is_some()
    }

    /// Returns `true` if a transport-fault hook is set.
    pub fn has_on_request_fail(&self) -> bool {
        self.on_request_fail.is_some()
    }

    /// Returns `true` if an HTTP-failure hook is set.
    pub fn has_on_response_fail(&self) -> bool {
        self.on_response_fail.is_some()
    }

    /// Runs the before-request hook, if any.
    ///
    /// With a hook, its return value is the full header set for the request.
    pub fn apply_before_request(&self, headers: HeaderMap) -> HeaderMap {
        match &self.before_request {
            Some(hook) => {
                tracing::debug!("Running before_request hook");
                hook(headers)
            }
            None => headers,
        }
    }

    /// Routes a call outcome to the matching hook and returns the call result.
    ///
    /// The hook is chosen by the outcome tag alone: a transport fault can only
    /// reach `on_request_fail`, an HTTP failure only `on_response_fail`.
    pub async fn dispatch(&self, outcome: Outcome) -> Result<Value> {
        match outcome {
            Outcome::Success(body) => match &self.on_success {
                Some(hook) => {
                    tracing::debug!("Running on_success hook");
                    hook(body).await
                }
                None => Ok(body),
            },
            Outcome::TransportFault(fault) => match &self.on_request_fail {
                Some(hook) => {
                    tracing::debug!(fault = %fault, "Running on_request_fail hook");
                    hook(fault).await
                }
                None => Err(Error::Transport(fault)),
            },
            Outcome::HttpFailure(err) => match &self.on_response_fail {
                Some(hook) => {
                    tracing::debug!(status = err.status_code, "Running on_response_fail hook");
                    hook(*err).await
                }
                None => Err(Error::Http(err)),
            },
        }
    }
}

/// The terminal state of a single call, before hooks run.
#[derive(Debug)]
pub enum Outcome {
    /// A 2xx response with its parsed body.
    Success(Value),
    /// The transport produced no response.
    TransportFault(TransportFault),
    /// A response outside 2xx, already normalized.
    HttpFailure(Box<NormalizedError>),
}

/// Builder for [`Interceptors`]. Each hook is independently optional.
#[derive(Default)]
pub struct InterceptorsBuilder {
    inner: Interceptors,
}

impl InterceptorsBuilder {
    /// Sets the hook that receives the merged headers and returns the headers
    /// to send.
    pub fn before_request<F>(mut self, hook: F) -> Self
    where
        F: Fn(HeaderMap) -> HeaderMap + Send + Sync + 'static,
    {
        self.inner.before_request = Some(Arc::new(hook));
        self
    }

    /// Sets the hook that receives the parsed body of a 2xx response.
    pub fn on_success<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value>> + Send + 'static,
    {
        self.inner.on_success = Some(Arc::new(move |body: Value| Box::pin(hook(body)) as HookFuture));
        self
    }

    /// Sets the hook that handles transport faults.
    pub fn on_request_fail<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(TransportFault) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value>> + Send + 'static,
    {
        self.inner.on_request_fail =
            Some(Arc::new(move |fault: TransportFault| Box::pin(hook(fault)) as HookFuture));
        self
    }

    /// Sets the hook that handles responses outside 2xx.
    pub fn on_response_fail<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(NormalizedError) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value>> + Send + 'static,
    {
        self.inner.on_response_fail =
            Some(Arc::new(move |err: NormalizedError| Box::pin(hook(err)) as HookFuture));
        self
    }

    /// Finishes the set.
    pub fn build(self) -> Interceptors {
        self.inner
    }
}
