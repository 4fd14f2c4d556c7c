//! The network boundary.
//!
//! A [`Transport`] executes one [`RequestDescriptor`] and reports either a
//! [`RawResponse`] (whatever its status) or a [`TransportFault`]. It does not
//! retry and applies no timeout of its own; both belong to the transport's own
//! configuration or to a hook.

use crate::error::{FaultKind, TransportFault};
use crate::request::RequestDescriptor;
use crate::response::RawResponse;
use async_trait::async_trait;
use url::Url;

/// Performs a single HTTP round trip.
///
/// Implement this to swap the HTTP backend, or to script responses in tests.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use kofetch::{FaultKind, RawResponse, RequestDescriptor, Transport, TransportFault};
///
/// struct Offline;
///
/// #[async_trait]
/// impl Transport for Offline {
///     async fn execute(&self, _request: RequestDescriptor) -> Result<RawResponse, TransportFault> {
///         Err(TransportFault::new(FaultKind::Connect, "network unreachable"))
///     }
/// }
/// ```
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends the request and returns the response, or the reason no response
    /// exists.
    async fn execute(&self, request: RequestDescriptor) -> Result<RawResponse, TransportFault>;
}

/// The default transport, backed by `reqwest`.
///
/// Pass a preconfigured [`reqwest::Client`] through [`ReqwestTransport::new`]
/// to control timeouts, proxies or connection pooling.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Wraps an existing `reqwest` client.
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: RequestDescriptor) -> Result<RawResponse, TransportFault> {
        let url = Url::parse(&request.url).map_err(|e| {
            TransportFault::new(
                FaultKind::InvalidRequest,
                format!("Invalid URL {:?}: {}", request.url, e),
            )
            .with_source(e)
        })?;

        let mut builder = self
            .client
            .request(request.method, url)
            .headers(request.headers);

        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;

        let status = response.status();
        let headers = response.headers().clone();
        let url = response.url().to_string();
        let body = response.bytes().await?;

        Ok(RawResponse::new(status, headers, url, body.to_vec()))
    }
}
