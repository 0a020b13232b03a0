//! HTTP transport for prediction calls

use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

use crate::auth::AccessToken;
use crate::error::Result;

/// Status and body of a completed HTTP exchange
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one authenticated JSON POST
pub trait Transport: Send + Sync {
    fn post_json(
        &self,
        url: &str,
        token: &AccessToken,
        body: &Value,
    ) -> impl Future<Output = Result<TransportResponse>> + Send;
}

/// `reqwest`-backed transport
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl ReqwestTransport {
    /// Build a transport, optionally bounding each request
    pub fn new(request_timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }

    async fn send(&self, url: &str, token: &AccessToken, body: &Value) -> Result<TransportResponse> {
        let response = self
            .client
            .post(url)
            .bearer_auth(token.secret())
            .json(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        debug!("POST {} -> {}", url, status);

        Ok(TransportResponse { status, body })
    }
}

impl Transport for ReqwestTransport {
    fn post_json(
        &self,
        url: &str,
        token: &AccessToken,
        body: &Value,
    ) -> impl Future<Output = Result<TransportResponse>> + Send {
        self.send(url, token, body)
    }
}
