//! Prediction response and payload parsing

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{PredictError, Result};

/// Token counts reported by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

/// Generated output of a single prediction
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionResponse {
    /// Raw generated text, no post-processing
    pub text: String,
    /// Output was withheld by the service's safety filter
    pub is_blocked: bool,
    /// Safety category -> score
    pub safety_attributes: BTreeMap<String, f64>,
    pub usage: Option<TokenUsage>,
}

impl fmt::Display for PredictionResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Response from Model: {}", self.text)
    }
}

#[derive(Debug, Deserialize)]
struct PredictPayload {
    #[serde(default)]
    predictions: Vec<Prediction>,
    metadata: Option<PayloadMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Prediction {
    content: Option<String>,
    safety_attributes: Option<SafetyAttributes>,
}

#[derive(Debug, Default, Deserialize)]
struct SafetyAttributes {
    #[serde(default)]
    blocked: bool,
    #[serde(default)]
    categories: Vec<String>,
    #[serde(default)]
    scores: Vec<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PayloadMetadata {
    token_metadata: Option<TokenMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenMetadata {
    input_token_count: Option<TokenCount>,
    output_token_count: Option<TokenCount>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenCount {
    #[serde(default)]
    total_tokens: u64,
}

impl PredictionResponse {
    /// Parse a successful `:predict` response body
    pub fn from_payload(body: &str) -> Result<Self> {
        let payload: PredictPayload = serde_json::from_str(body)?;

        let prediction = payload
            .predictions
            .into_iter()
            .next()
            .ok_or_else(|| PredictError::service("Response contained no predictions"))?;

        let safety = prediction.safety_attributes.unwrap_or_default();
        let is_blocked = safety.blocked;

        let text = match prediction.content {
            Some(text) => text,
            // Blocked predictions come back without content
            None if is_blocked => String::new(),
            None => {
                return Err(PredictError::service(
                    "Prediction is missing generated content",
                ))
            }
        };

        let safety_attributes = safety
            .categories
            .into_iter()
            .zip(safety.scores)
            .collect::<BTreeMap<_, _>>();

        let usage = payload
            .metadata
            .and_then(|m| m.token_metadata)
            .map(|t| TokenUsage {
                input_tokens: t.input_token_count.map(|c| c.total_tokens).unwrap_or(0),
                output_tokens: t.output_token_count.map(|c| c.total_tokens).unwrap_or(0),
            });

        Ok(Self {
            text,
            is_blocked,
            safety_attributes,
            usage,
        })
    }
}
