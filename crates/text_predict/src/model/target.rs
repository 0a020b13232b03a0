//! Resolve which model a request is sent to

use lazy_static::lazy_static;
use regex::Regex;

use super::PredictionRequest;
use crate::error::{PredictError, Result};

lazy_static! {
    static ref ENDPOINT_RESOURCE: Regex =
        Regex::new(r"^projects/([^/]+)/locations/([^/]+)/endpoints/([^/]+)$").unwrap();
    static ref ENDPOINT_ID: Regex = Regex::new(r"^[A-Za-z0-9_-]+$").unwrap();
}

/// The model a prediction call is routed to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelTarget {
    /// A publisher model, e.g. `text-bison@001`
    Base {
        project_id: String,
        location: String,
        model_name: String,
    },
    /// A tuned model served from its own endpoint
    Tuned {
        project_id: String,
        location: String,
        endpoint_id: String,
    },
}

impl ModelTarget {
    /// Pick the tuned model when one is named, otherwise the base model
    pub fn resolve(request: &PredictionRequest) -> Result<Self> {
        let tuned = request.tuned_model_name.trim();
        if tuned.is_empty() {
            return Ok(Self::Base {
                project_id: request.project_id.clone(),
                location: request.location.clone(),
                model_name: request.model_name.clone(),
            });
        }

        if let Some(caps) = ENDPOINT_RESOURCE.captures(tuned) {
            return Ok(Self::Tuned {
                project_id: caps[1].to_string(),
                location: caps[2].to_string(),
                endpoint_id: caps[3].to_string(),
            });
        }

        if ENDPOINT_ID.is_match(tuned) {
            return Ok(Self::Tuned {
                project_id: request.project_id.clone(),
                location: request.location.clone(),
                endpoint_id: tuned.to_string(),
            });
        }

        Err(PredictError::InvalidArgument(format!(
            "Tuned model must name its deployed endpoint (an endpoint id or \
             projects/{{p}}/locations/{{l}}/endpoints/{{id}}); model resource names \
             like projects/{{p}}/locations/{{l}}/models/{{id}} are not accepted, got '{}'",
            tuned
        )))
    }

    pub fn location(&self) -> &str {
        match self {
            Self::Base { location, .. } | Self::Tuned { location, .. } => location,
        }
    }

    /// Resource path relative to the API version, ending in `:predict`
    pub fn predict_path(&self) -> String {
        match self {
            Self::Base {
                project_id,
                location,
                model_name,
            } => format!(
                "projects/{}/locations/{}/publishers/google/models/{}:predict",
                project_id, location, model_name
            ),
            Self::Tuned {
                project_id,
                location,
                endpoint_id,
            } => format!(
                "projects/{}/locations/{}/endpoints/{}:predict",
                project_id, location, endpoint_id
            ),
        }
    }

    /// Full URL under the given API base
    pub fn predict_url(&self, api_base: &str) -> String {
        format!("{}/v1/{}", api_base, self.predict_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_model_url() {
        let request = PredictionRequest::new("wandb-growth", "hi");
        let target = ModelTarget::resolve(&request).unwrap();
        assert_eq!(
            target.predict_url("https://us-central1-aiplatform.googleapis.com"),
            "https://us-central1-aiplatform.googleapis.com/v1/projects/wandb-growth/locations/us-central1/publishers/google/models/text-bison@001:predict"
        );
    }

    #[test]
    fn test_tuned_endpoint_id() {
        let request = PredictionRequest::new("proj", "hi").with_tuned_model_name("1234567890");
        let target = ModelTarget::resolve(&request).unwrap();
        assert_eq!(
            target.predict_path(),
            "projects/proj/locations/us-central1/endpoints/1234567890:predict"
        );
    }

    #[test]
    fn test_tuned_resource_name_overrides_location() {
        let request = PredictionRequest::new("proj", "hi")
            .with_tuned_model_name("projects/other/locations/europe-west4/endpoints/77");
        let target = ModelTarget::resolve(&request).unwrap();
        assert_eq!(target.location(), "europe-west4");
        assert_eq!(
            target.predict_path(),
            "projects/other/locations/europe-west4/endpoints/77:predict"
        );
    }

    #[test]
    fn test_blank_tuned_name_uses_base() {
        let request = PredictionRequest::new("proj", "hi").with_tuned_model_name("   ");
        assert!(matches!(
            ModelTarget::resolve(&request).unwrap(),
            ModelTarget::Base { .. }
        ));
    }

    #[test]
    fn test_malformed_tuned_name() {
        let request =
            PredictionRequest::new("proj", "hi").with_tuned_model_name("projects/x/models/y");
        let err = ModelTarget::resolve(&request).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_model_resource_name_points_to_endpoint() {
        let request = PredictionRequest::new("proj", "hi")
            .with_tuned_model_name("projects/proj/locations/us-central1/models/123");
        let message = ModelTarget::resolve(&request).unwrap_err().to_string();
        assert!(message.contains("model resource names"), "{}", message);
        assert!(message.contains("endpoint id"), "{}", message);
    }
}
