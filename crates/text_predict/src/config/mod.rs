//! Configuration module for text_predict
//!
//! This module contains:
//! - `client`: Client settings (timeouts, API host) with environment overrides

mod client;

pub use client::{ClientConfig, CLIENT_CONFIG, DEFAULT_LOCATION, DEFAULT_MODEL_NAME};
