//! Prediction request and response types
//!
//! This module provides:
//! - `request`: `PredictionRequest` and its wire body
//! - `response`: `PredictionResponse` and payload parsing
//! - `target`: base vs. tuned model resolution

mod request;
mod response;
mod target;

pub use request::{PredictionRequest, SamplingParameters};
pub use response::{PredictionResponse, TokenUsage};
pub use target::ModelTarget;
