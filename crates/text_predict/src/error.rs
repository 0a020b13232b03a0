/// Error types for prediction requests
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Service error{}: {message}", status_suffix(.status))]
    Service {
        status: Option<u16>,
        message: String,
    },
}

impl PredictError {
    pub fn service(message: impl Into<String>) -> Self {
        Self::Service {
            status: None,
            message: message.into(),
        }
    }

    pub fn service_status(status: u16, message: impl Into<String>) -> Self {
        Self::Service {
            status: Some(status),
            message: message.into(),
        }
    }

    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication(_))
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    pub fn is_service(&self) -> bool {
        matches!(self, Self::Service { .. })
    }
}

impl From<reqwest::Error> for PredictError {
    fn from(err: reqwest::Error) -> Self {
        Self::Service {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for PredictError {
    fn from(err: serde_json::Error) -> Self {
        Self::service(format!("Malformed response payload: {}", err))
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {})", s)).unwrap_or_default()
}

pub type Result<T> = std::result::Result<T, PredictError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_display_with_status() {
        let err = PredictError::service_status(503, "backend unavailable");
        assert_eq!(err.to_string(), "Service error (HTTP 503): backend unavailable");
        assert!(err.is_service());
    }

    #[test]
    fn test_service_display_without_status() {
        let err = PredictError::service("connection reset");
        assert_eq!(err.to_string(), "Service error: connection reset");
    }

    #[test]
    fn test_json_error_is_service() {
        let err: PredictError = serde_json::from_str::<serde_json::Value>("{not json")
            .unwrap_err()
            .into();
        assert!(err.is_service());
        assert!(!err.is_authentication());
    }
}
