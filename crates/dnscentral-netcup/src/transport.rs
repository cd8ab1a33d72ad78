//! Transport seam between the session client and the JSON-RPC endpoint

use async_trait::async_trait;
use dnscentral_core::config::{DEFAULT_ENDPOINT, DEFAULT_HTTP_TIMEOUT};
use dnscentral_core::{Error, Result};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Sends one request body to the provider endpoint
///
/// Implementations perform exactly one request per call: no retries, no
/// caching.
#[async_trait]
pub trait RpcTransport: Send + Sync {
    /// POST `body` and return the decoded response body
    ///
    /// # Returns
    ///
    /// - `Err(Error::Transport)`: network failure
    /// - `Err(Error::Http)`: non-2xx status
    /// - `Err(Error::Json)`: body is not valid JSON
    async fn post(&self, body: &Value) -> Result<Value>;
}

#[async_trait]
impl<T: RpcTransport + ?Sized> RpcTransport for Arc<T> {
    async fn post(&self, body: &Value) -> Result<Value> {
        (**self).post(body).await
    }
}

/// reqwest-backed transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport for `endpoint` with a per-request timeout
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }

    /// Transport for the public CCP endpoint with the default timeout
    pub fn with_defaults() -> Result<Self> {
        Self::new(DEFAULT_ENDPOINT, DEFAULT_HTTP_TIMEOUT)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl RpcTransport for HttpTransport {
    async fn post(&self, body: &Value) -> Result<Value> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(body)
            .send()
            .await
            .map_err(|e| Error::transport(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            tracing::debug!("Endpoint answered {}", status);
            return Err(Error::http(status.as_u16(), error_text));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::transport(format!("Failed to read response: {}", e)))?;

        Ok(serde_json::from_slice(&bytes)?)
    }
}
