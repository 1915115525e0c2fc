//! HTTP transport used by the client
//!
//! The client hands fully resolved requests (absolute URL, headers, body) to an
//! [`HttpTransport`]. [`ReqwestTransport`] is the default; tests plug in their
//! own implementation.

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Client, ClientBuilder, Method, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use ticktrader_core::{Result, TickTraderError};
use tracing::{debug, error};

const USER_AGENT: &str = concat!("ticktrader-web/", env!("CARGO_PKG_VERSION"));

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// A request ready to go on the wire
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<String>,
}

/// Successful (2xx) response, body left as received
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Deserialize the body
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.body)?)
    }

    pub fn text(&self) -> &str {
        &self.body
    }
}

#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send a request. Non-2xx answers come back as `TickTraderError::Server`.
    async fn send(&self, request: HttpRequest) -> Result<ApiResponse>;
}

// ============================================================================
// reqwest
// ============================================================================

/// Transport backed by a `reqwest::Client`
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

fn client_builder(timeout: Duration) -> ClientBuilder {
    Client::builder().user_agent(USER_AGENT).timeout(timeout)
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = client_builder(timeout)
            .build()
            .map_err(|e| TickTraderError::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Wrap an existing client, e.g. one with custom TLS settings
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<ApiResponse> {
        debug!("{} {}", request.method, request.url);

        let mut builder = self
            .client
            .request(request.method.clone(), &request.url)
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| {
            TickTraderError::network(format!("{} {} failed: {}", request.method, request.url, e))
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TickTraderError::network(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            error!(
                "TickTrader Web API error ({}) for {} {}: {}",
                status, request.method, request.url, body
            );
            return Err(TickTraderError::server(status.as_u16(), body));
        }

        Ok(ApiResponse::new(status, body))
    }
}

impl std::fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestTransport").finish_non_exhaustive()
    }
}
