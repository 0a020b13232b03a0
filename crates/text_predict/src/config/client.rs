//! Client settings for prediction requests

use lazy_static::lazy_static;
use std::env;
use std::time::Duration;

/// Region used when none is given
pub const DEFAULT_LOCATION: &str = "us-central1";

/// Base model used when none is given
pub const DEFAULT_MODEL_NAME: &str = "text-bison@001";

/// Settings that shape how a request is sent, not what it asks for
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Upper bound for the credential helper subprocess
    pub token_timeout: Duration,
    /// HTTP request timeout; `None` leaves it to the transport
    pub request_timeout: Option<Duration>,
    /// Overrides `https://{location}-aiplatform.googleapis.com`
    pub api_endpoint: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            token_timeout: Duration::from_secs(
                env::var("PREDICT_TOKEN_TIMEOUT")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(30),
            ),
            request_timeout: env::var("PREDICT_REQUEST_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs),
            api_endpoint: env::var("PREDICT_API_ENDPOINT")
                .ok()
                .filter(|v| !v.trim().is_empty()),
        }
    }
}

impl ClientConfig {
    /// Set the credential helper timeout
    pub fn with_token_timeout(mut self, timeout: Duration) -> Self {
        self.token_timeout = timeout;
        self
    }

    /// Set the HTTP request timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Send requests to a different API host
    pub fn with_api_endpoint(mut self, api_endpoint: impl Into<String>) -> Self {
        self.api_endpoint = Some(api_endpoint.into());
        self
    }

    /// Scheme and host for a regional endpoint, without a trailing slash
    pub fn api_base(&self, location: &str) -> String {
        match &self.api_endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => format!("https://{}-aiplatform.googleapis.com", location),
        }
    }
}

lazy_static! {
    /// Global client configuration instance
    pub static ref CLIENT_CONFIG: ClientConfig = ClientConfig::default();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare() -> ClientConfig {
        ClientConfig {
            token_timeout: Duration::from_secs(30),
            request_timeout: None,
            api_endpoint: None,
        }
    }

    #[test]
    fn test_api_base_regional() {
        assert_eq!(
            bare().api_base("europe-west4"),
            "https://europe-west4-aiplatform.googleapis.com"
        );
    }

    #[test]
    fn test_api_base_override_strips_slash() {
        let config = bare().with_api_endpoint("http://127.0.0.1:8080/");
        assert_eq!(config.api_base("us-central1"), "http://127.0.0.1:8080");
    }

    #[test]
    fn test_builder() {
        let config = bare()
            .with_token_timeout(Duration::from_secs(5))
            .with_request_timeout(Duration::from_secs(60));
        assert_eq!(config.token_timeout, Duration::from_secs(5));
        assert_eq!(config.request_timeout, Some(Duration::from_secs(60)));
    }
}
