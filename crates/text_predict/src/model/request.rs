//! Prediction request built by callers and serialized onto the wire

use serde_json::{json, Value};

use crate::config::{DEFAULT_LOCATION, DEFAULT_MODEL_NAME};

/// Sampling controls sent with every request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplingParameters {
    pub temperature: f64,
    pub max_decode_steps: u32,
    pub top_k: u32,
    pub top_p: f64,
}

impl Default for SamplingParameters {
    fn default() -> Self {
        Self {
            temperature: 0.2,
            max_decode_steps: 256,
            top_k: 40,
            top_p: 0.8,
        }
    }
}

/// A single prediction call: where to send it and what to ask
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionRequest {
    pub project_id: String,
    pub location: String,
    pub model_name: String,
    /// Empty means "use the base model"
    pub tuned_model_name: String,
    pub content: String,
    pub parameters: SamplingParameters,
}

impl PredictionRequest {
    /// Create a request against the default base model and region
    pub fn new(project_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            location: DEFAULT_LOCATION.to_string(),
            model_name: DEFAULT_MODEL_NAME.to_string(),
            tuned_model_name: String::new(),
            content: content.into(),
            parameters: SamplingParameters::default(),
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_model_name(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = model_name.into();
        self
    }

    pub fn with_tuned_model_name(mut self, tuned_model_name: impl Into<String>) -> Self {
        self.tuned_model_name = tuned_model_name.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.parameters.temperature = temperature;
        self
    }

    pub fn with_max_decode_steps(mut self, max_decode_steps: u32) -> Self {
        self.parameters.max_decode_steps = max_decode_steps;
        self
    }

    pub fn with_top_k(mut self, top_k: u32) -> Self {
        self.parameters.top_k = top_k;
        self
    }

    pub fn with_top_p(mut self, top_p: f64) -> Self {
        self.parameters.top_p = top_p;
        self
    }

    /// JSON body for the `:predict` call
    pub fn to_body(&self) -> Value {
        json!({
            "instances": [
                { "prompt": self.content }
            ],
            "parameters": {
                "temperature": self.parameters.temperature,
                "maxOutputTokens": self.parameters.max_decode_steps,
                "topK": self.parameters.top_k,
                "topP": self.parameters.top_p,
            }
        })
    }
}
