//! Prediction request/response payloads shared by provider clients.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Request body for creating a prediction.
#[derive(Debug, Clone, Serialize)]
pub struct CreatePredictionRequest {
    /// Model version hash. Required by the generic `/v1/predictions`
    /// endpoint, omitted for model-scoped paths.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub input: PredictionInput,
}

#[derive(Debug, Clone, Serialize)]
pub struct PredictionInput {
    pub prompt: String,
    pub num_outputs: u32,
    pub aspect_ratio: String,
    pub output_format: String,
    pub output_quality: u8,
    /// Model-specific knobs merged into the input object.
    #[serde(flatten)]
    pub tuning: Map<String, Value>,
}

/// Provider lifecycle state. Unknown values are kept as-is and treated as
/// still running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Starting,
    Processing,
    Succeeded,
    Failed,
    Canceled,
    Other(String),
}

impl JobStatus {
    pub fn parse(status: &str) -> Self {
        match status {
            "starting" => JobStatus::Starting,
            "processing" => JobStatus::Processing,
            "succeeded" => JobStatus::Succeeded,
            "failed" => JobStatus::Failed,
            "canceled" => JobStatus::Canceled,
            other => JobStatus::Other(other.to_string()),
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Succeeded | JobStatus::Failed | JobStatus::Canceled
        )
    }
}

/// `output` is a bare URL for single-image models and a list otherwise.
///
/// Variant order matters for `#[serde(untagged)]` decoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PredictionOutput {
    Many(Vec<String>),
    Single(String),
}

impl PredictionOutput {
    pub fn into_urls(self) -> Vec<String> {
        match self {
            PredictionOutput::Many(urls) => urls,
            PredictionOutput::Single(url) => vec![url],
        }
    }
}

/// A prediction as reported by the provider, on creation or when polled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub output: Option<PredictionOutput>,
    #[serde(default)]
    pub error: Option<String>,
}

impl Prediction {
    pub fn job_status(&self) -> JobStatus {
        JobStatus::parse(&self.status)
    }

    pub fn with_status(id: &str, status: &str) -> Self {
        Self {
            id: id.to_string(),
            status: status.to_string(),
            output: None,
            error: None,
        }
    }

    pub fn processing(id: &str) -> Self {
        Self::with_status(id, "processing")
    }

    pub fn succeeded(id: &str, output: PredictionOutput) -> Self {
        Self {
            output: Some(output),
            ..Self::with_status(id, "succeeded")
        }
    }

    pub fn failed(id: &str, error: Option<&str>) -> Self {
        Self {
            error: error.map(str::to_string),
            ..Self::with_status(id, "failed")
        }
    }

    pub fn canceled(id: &str) -> Self {
        Self::with_status(id, "canceled")
    }
}
