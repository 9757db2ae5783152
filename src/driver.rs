//! Drives one external prediction from submission to a terminal state.
//!
//! ```text
//! SUBMITTED -> {PROCESSING}* -> SUCCEEDED | FAILED | CANCELED | TIMED_OUT
//! ```
//!
//! Only "still running" causes another poll. Any error while fetching the
//! status ends the run immediately.

use crate::config::PollPolicy;
use crate::provider::{JobStatus, Prediction, PredictionService};
use crate::{Error, Result};
use tracing::{debug, info, warn};

const FALLBACK_FAILURE_MESSAGE: &str = "Thumbnail generation failed";

pub struct JobDriver {
    provider: Box<dyn PredictionService>,
    poll: PollPolicy,
}

impl JobDriver {
    pub fn new(provider: Box<dyn PredictionService>, poll: PollPolicy) -> Self {
        Self { provider, poll }
    }

    /// Create a prediction. Rejects empty prompts and zero outputs without
    /// touching the network.
    pub async fn submit(&self, prompt: &str, num_outputs: u32) -> Result<Prediction> {
        if prompt.trim().is_empty() {
            return Err(Error::Validation(
                "Missing required field: prompt is required".to_string(),
            ));
        }
        if num_outputs == 0 {
            return Err(Error::Validation(
                "At least one output must be requested".to_string(),
            ));
        }

        info!("Submitting prediction for {} output(s)", num_outputs);
        debug!("Prompt: {}", prompt);

        let prediction = self.provider.create_prediction(prompt, num_outputs).await?;

        if let Some(message) = prediction.error.as_deref() {
            warn!("Provider rejected prediction: {}", message);
            return Err(Error::Provider(message.to_string()));
        }
        if prediction.id.is_empty() {
            return Err(Error::Provider(
                "Provider response missing prediction id".to_string(),
            ));
        }

        info!(
            "Prediction {} created (status: {})",
            prediction.id, prediction.status
        );
        Ok(prediction)
    }

    /// Poll `job_id` until it reaches a terminal state or the attempt ceiling.
    pub async fn await_completion(&self, job_id: &str) -> Result<Vec<String>> {
        let max_attempts = self.poll.max_attempts;

        for attempt in 1..=max_attempts {
            let prediction = self.provider.get_prediction(job_id).await.map_err(|e| {
                warn!("[{}] Status check {} failed: {}", job_id, attempt, e);
                match e {
                    Error::Provider(message) => Error::Provider(message),
                    other => Error::Provider(other.to_string()),
                }
            })?;

            if let Some(urls) = resolve_terminal(job_id, &prediction)? {
                info!(
                    "[{}] Succeeded after {} status check(s) with {} image(s)",
                    job_id,
                    attempt,
                    urls.len()
                );
                return Ok(urls);
            }

            debug!(
                "[{}] Status '{}' (check {}/{})",
                job_id, prediction.status, attempt, max_attempts
            );

            if attempt < max_attempts {
                tokio::time::sleep(self.poll.interval).await;
            }
        }

        warn!(
            "[{}] No terminal state after {} status checks",
            job_id, max_attempts
        );
        Err(Error::Timeout {
            attempts: max_attempts,
        })
    }

    /// Submit a prompt and wait for its images.
    pub async fn run_generation(&self, prompt: &str, num_outputs: u32) -> Result<Vec<String>> {
        let prediction = self.submit(prompt, num_outputs).await?;

        // The provider may already have finished while honouring `Prefer: wait`.
        if let Some(urls) = resolve_terminal(&prediction.id, &prediction)? {
            return Ok(urls);
        }

        self.await_completion(&prediction.id).await
    }
}

/// `Ok(Some(urls))` on success, `Ok(None)` while still running, and the
/// matching error for failed or canceled jobs.
fn resolve_terminal(job_id: &str, prediction: &Prediction) -> Result<Option<Vec<String>>> {
    let status = prediction.job_status();
    if !status.is_terminal() {
        return Ok(None);
    }

    match status {
        JobStatus::Succeeded => {
            let urls = prediction
                .output
                .clone()
                .map(|output| output.into_urls())
                .unwrap_or_default();
            if urls.is_empty() {
                return Err(Error::Provider(format!(
                    "Prediction {} succeeded without output",
                    job_id
                )));
            }
            Ok(Some(urls))
        }
        JobStatus::Failed => {
            let message = prediction
                .error
                .clone()
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| FALLBACK_FAILURE_MESSAGE.to_string());
            warn!("[{}] Generation failed: {}", job_id, message);
            Err(Error::GenerationFailed(message))
        }
        JobStatus::Canceled => {
            warn!("[{}] Generation was canceled", job_id);
            Err(Error::GenerationCanceled)
        }
        JobStatus::Starting | JobStatus::Processing | JobStatus::Other(_) => Ok(None),
    }
}
