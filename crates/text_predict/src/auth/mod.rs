//! Credential lookup for the ambient cloud identity
//!
//! This module provides:
//! - `token`: `AccessToken`, the `TokenProvider` seam and a static provider
//! - `gcloud`: tokens from `gcloud auth print-access-token`

mod gcloud;
mod token;

pub use gcloud::GcloudTokenProvider;
pub use token::{AccessToken, StaticTokenProvider, TokenProvider};
