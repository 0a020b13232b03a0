//! Bearer tokens and the providers that hand them out

use std::fmt;
use std::future::Future;

use crate::error::{PredictError, Result};

/// OAuth bearer token. Never printed in full.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wrap a raw token, rejecting blank input
    pub fn new(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(PredictError::Authentication(
                "Access token is empty".to_string(),
            ));
        }
        if trimmed.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(PredictError::Authentication(
                "Access token contains whitespace".to_string(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// Source of the bearer credential attached to each request
pub trait TokenProvider: Send + Sync {
    fn access_token(&self) -> impl Future<Output = Result<AccessToken>> + Send;
}

/// A token handed in by the caller, e.g. from `PREDICT_ACCESS_TOKEN`
#[derive(Debug, Clone)]
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl TokenProvider for StaticTokenProvider {
    fn access_token(&self) -> impl Future<Output = Result<AccessToken>> + Send {
        let token = AccessToken::new(self.token.clone());
        async move { token }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_trimmed() {
        let token = AccessToken::new("ya29.abc\n").unwrap();
        assert_eq!(token.secret(), "ya29.abc");
    }

    #[test]
    fn test_debug_is_redacted() {
        let token = AccessToken::new("ya29.secret").unwrap();
        assert!(!format!("{:?}", token).contains("secret"));
    }

    #[test]
    fn test_blank_token_rejected() {
        assert!(AccessToken::new("  \n").unwrap_err().is_authentication());
        assert!(AccessToken::new("two words").unwrap_err().is_authentication());
    }

    #[tokio::test]
    async fn test_static_provider() {
        let provider = StaticTokenProvider::new("ya29.static");
        let token = provider.access_token().await.unwrap();
        assert_eq!(token.secret(), "ya29.static");

        let empty = StaticTokenProvider::new("");
        assert!(empty.access_token().await.unwrap_err().is_authentication());
    }
}
