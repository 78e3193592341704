mod client;
mod input;

pub use client::ReplicateClient;
pub use input::PredictionInput;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{fmt, str::FromStr};
use thiserror::Error;

/// A `name:version` reference to a hosted model, e.g.
/// `owner/portrait-lora:3f1c…`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRef {
    pub name: String,
    pub version: String,
}

#[derive(Error, Debug)]
pub enum ModelRefError {
    #[error("model reference must be `name:version`, got `{0}`")]
    MissingVersion(String),
}

impl FromStr for ModelRef {
    type Err = ModelRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((name, version)) if !name.is_empty() && !version.is_empty() => Ok(Self {
                name: name.to_string(),
                version: version.to_string(),
            }),
            _ => Err(ModelRefError::MissingVersion(s.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionStatus {
    Starting,
    Processing,
    Succeeded,
    Failed,
    Canceled,
}

impl PredictionStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Canceled)
    }
}

impl fmt::Display for PredictionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Starting => "starting",
            Self::Processing => "processing",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::Canceled => "canceled",
        };
        write!(f, "{s}")
    }
}

/// One remote inference job, as returned by the prediction API.
/// `output` stays dynamic: the service returns a list of URLs, a single
/// value, or null depending on the model.
#[derive(Debug, Clone, Deserialize)]
pub struct Prediction {
    pub id: String,
    pub status: PredictionStatus,
    #[serde(default)]
    pub output: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
}

impl Prediction {
    /// First URL in the output list, if there is one.
    pub fn first_output_url(&self) -> Option<String> {
        match &self.output {
            Some(Value::Array(items)) => items
                .first()
                .and_then(|v| v.as_str())
                .map(|s| s.to_string()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn model_ref_splits_on_colon() {
        let model: ModelRef = "owner/portrait:abc123".parse().unwrap();
        assert_eq!(model.name, "owner/portrait");
        assert_eq!(model.version, "abc123");
    }

    #[test]
    fn model_ref_without_version_is_rejected() {
        assert!("owner/portrait".parse::<ModelRef>().is_err());
        assert!(":abc".parse::<ModelRef>().is_err());
        assert!("owner/portrait:".parse::<ModelRef>().is_err());
    }

    #[test]
    fn only_succeeded_failed_canceled_are_terminal() {
        assert!(!PredictionStatus::Starting.is_terminal());
        assert!(!PredictionStatus::Processing.is_terminal());
        assert!(PredictionStatus::Succeeded.is_terminal());
        assert!(PredictionStatus::Failed.is_terminal());
        assert!(PredictionStatus::Canceled.is_terminal());
    }

    #[test]
    fn status_deserializes_from_wire_names() {
        let status: PredictionStatus = serde_json::from_value(json!("processing")).unwrap();
        assert_eq!(status, PredictionStatus::Processing);
    }

    #[test]
    fn first_output_url_takes_head_of_list() {
        let prediction: Prediction = serde_json::from_value(json!({
            "id": "p1",
            "status": "succeeded",
            "output": ["https://out.test/1.png", "https://out.test/2.png"]
        }))
        .unwrap();
        assert_eq!(
            prediction.first_output_url().as_deref(),
            Some("https://out.test/1.png")
        );
    }

    #[test]
    fn empty_or_missing_output_yields_none() {
        let empty: Prediction = serde_json::from_value(json!({
            "id": "p1", "status": "succeeded", "output": []
        }))
        .unwrap();
        assert!(empty.first_output_url().is_none());

        let null: Prediction = serde_json::from_value(json!({
            "id": "p1", "status": "succeeded", "output": null
        }))
        .unwrap();
        assert!(null.first_output_url().is_none());

        let missing: Prediction = serde_json::from_value(json!({
            "id": "p1", "status": "succeeded"
        }))
        .unwrap();
        assert!(missing.first_output_url().is_none());
    }
}
