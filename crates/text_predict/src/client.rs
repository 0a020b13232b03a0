//! Prediction client for hosted text-generation models

use serde_json::Value;
use std::io::Write;
use tracing::{debug, info, warn};

use crate::auth::{GcloudTokenProvider, TokenProvider};
use crate::config::{ClientConfig, CLIENT_CONFIG};
use crate::error::{PredictError, Result};
use crate::model::{ModelTarget, PredictionRequest, PredictionResponse};
use crate::transport::{ReqwestTransport, Transport, TransportResponse};

/// Issues one prediction call per `predict` invocation
pub struct PredictionClient<P = GcloudTokenProvider, T = ReqwestTransport> {
    config: ClientConfig,
    tokens: P,
    transport: T,
}

impl PredictionClient {
    /// Client using the gcloud identity and the global configuration
    pub fn from_environment() -> Result<Self> {
        let config = CLIENT_CONFIG.clone();
        let tokens = GcloudTokenProvider::new().with_timeout(config.token_timeout);
        let transport = ReqwestTransport::new(config.request_timeout)?;
        Ok(Self::new(config, tokens, transport))
    }
}

impl<P: TokenProvider, T: Transport> PredictionClient<P, T> {
    pub fn new(config: ClientConfig, tokens: P, transport: T) -> Self {
        Self {
            config,
            tokens,
            transport,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send `request` to its model and return the generated text
    pub async fn predict(&self, request: &PredictionRequest) -> Result<PredictionResponse> {
        if request.content.is_empty() {
            return Err(PredictError::InvalidArgument(
                "Prompt content must not be empty".to_string(),
            ));
        }

        let target = ModelTarget::resolve(request)?;
        let url = target.predict_url(&self.config.api_base(target.location()));

        let token = self.tokens.access_token().await?;

        debug!("Sending prediction to {}", url);
        let response = self
            .transport
            .post_json(&url, &token, &request.to_body())
            .await?;

        if !response.is_success() {
            let err = status_error(&response);
            warn!("Prediction failed: {}", err);
            return Err(err);
        }

        let prediction = PredictionResponse::from_payload(&response.body)?;
        if let Some(usage) = prediction.usage {
            info!(
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                "Prediction complete"
            );
        }
        if prediction.is_blocked {
            warn!("Prediction was blocked by the service's safety filter");
        }
        Ok(prediction)
    }

    /// Predict and write the response line to `out`; nothing is written on failure
    pub async fn predict_to<W: Write>(
        &self,
        request: &PredictionRequest,
        out: &mut W,
    ) -> Result<PredictionResponse> {
        let response = self.predict(request).await?;
        writeln!(out, "{}", response)
            .map_err(|e| PredictError::service(format!("Failed to write response: {}", e)))?;
        Ok(response)
    }
}

/// Map a non-2xx response onto the error kinds callers distinguish
fn status_error(response: &TransportResponse) -> PredictError {
    let message = service_message(&response.body)
        .unwrap_or_else(|| format!("HTTP {}: {}", response.status, response.body.trim()));

    match response.status {
        400 => PredictError::InvalidArgument(message),
        401 | 403 => PredictError::Authentication(message),
        status => PredictError::service_status(status, message),
    }
}

/// `error.message` from a Google API error body, if present
fn service_message(body: &str) -> Option<String> {
    let v: Value = serde_json::from_str(body).ok()?;
    v["error"]["message"].as_str().map(|s| s.to_string())
}
