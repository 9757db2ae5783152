use super::types::{CreatePredictionRequest, Prediction, PredictionInput};
use super::PredictionService;
use crate::config::ProviderConfig;
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde_json::{Map, Value};
use std::time::Duration;

/// Creation may block server-side while `Prefer: wait` is honoured.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(90);

/// HTTP client for a Replicate-style predictions API.
pub struct PredictionClient {
    client: Client,
    config: ProviderConfig,
    tuning: Map<String, Value>,
}

fn default_tuning() -> Map<String, Value> {
    let mut tuning = Map::new();
    tuning.insert("safety_tolerance".to_string(), Value::from(2));
    tuning.insert("prompt_upsampling".to_string(), Value::from(true));
    tuning
}

impl PredictionClient {
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self::new_with_client(config, client))
    }

    pub fn new_with_client(config: ProviderConfig, client: Client) -> Self {
        Self {
            client,
            config,
            tuning: default_tuning(),
        }
    }

    fn authorized(&self, request: RequestBuilder) -> Result<RequestBuilder> {
        let token = self.config.api_token.as_deref().ok_or_else(|| {
            tracing::error!("PROVIDER_API_TOKEN is not configured");
            Error::Configuration("Provider API token not configured".to_string())
        })?;

        Ok(request.header(
            "Authorization",
            self.config.auth_scheme.header_value(token),
        ))
    }

    async fn send(&self, request: RequestBuilder) -> Result<Prediction> {
        let response = self.authorized(request)?.send().await.map_err(|e| {
            tracing::error!("Failed to send request to provider: {}", e);
            e
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            tracing::error!("Provider API error (status {}): {}", status, error_text);
            return Err(Error::Provider(format!(
                "API error (status {}): {}",
                status, error_text
            )));
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!("Failed to parse provider response: {}\nBody: {}", e, body);
            Error::Provider(format!("Failed to parse provider response: {}", e))
        })
    }
}

#[async_trait]
impl PredictionService for PredictionClient {
    async fn create_prediction(&self, prompt: &str, num_outputs: u32) -> Result<Prediction> {
        let url = format!("{}{}", self.config.base_url, self.config.create_path);
        tracing::debug!("Creating prediction at {}", url);

        let body = CreatePredictionRequest {
            version: self.config.model_version.clone(),
            input: PredictionInput {
                prompt: prompt.to_string(),
                num_outputs,
                aspect_ratio: "16:9".to_string(),
                output_format: "png".to_string(),
                output_quality: self.config.output_quality,
                tuning: self.tuning.clone(),
            },
        };

        self.send(
            self.client
                .post(&url)
                .header("Prefer", "wait")
                .json(&body),
        )
        .await
    }

    async fn get_prediction(&self, id: &str) -> Result<Prediction> {
        let url = format!("{}/v1/predictions/{}", self.config.base_url, id);
        tracing::debug!("Fetching prediction {}", id);

        self.send(self.client.get(&url)).await
    }
}
