//! text_predict: client for hosted text-generation prediction endpoints
//!
//! This library sends a single prompt to a Vertex AI text model and returns
//! the generated text:
//! - Request/response types with the service's wire format
//! - Base or tuned model targeting
//! - Bearer credentials from the ambient gcloud identity
//! - One HTTP call per prediction, no retries
//!
//! # Example
//!
//! ```no_run
//! use text_predict::{PredictionClient, PredictionRequest};
//!
//! #[tokio::main]
//! async fn main() -> text_predict::Result<()> {
//!     let client = PredictionClient::from_environment()?;
//!     let request = PredictionRequest::new("my-project", "What is the meaning of 42?")
//!         .with_temperature(0.2)
//!         .with_max_decode_steps(256);
//!
//!     let response = client.predict(&request).await?;
//!     println!("{}", response.text);
//!     Ok(())
//! }
//! ```

// Core modules
pub mod error;

// Configuration module
pub mod config;

// Core functionality
pub mod auth;
pub mod client;
pub mod model;
pub mod transport;

pub use error::{PredictError, Result};

pub use config::{ClientConfig, CLIENT_CONFIG, DEFAULT_LOCATION, DEFAULT_MODEL_NAME};

pub use auth::{AccessToken, GcloudTokenProvider, StaticTokenProvider, TokenProvider};

pub use model::{ModelTarget, PredictionRequest, PredictionResponse, SamplingParameters, TokenUsage};

pub use transport::{ReqwestTransport, Transport, TransportResponse};

pub use client::PredictionClient;
