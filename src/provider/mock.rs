use super::types::Prediction;
use super::PredictionService;
use crate::{Error, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

enum ScriptedPoll {
    Respond(Prediction),
    Fail(String),
}

/// Scripted stand-in for a prediction provider.
///
/// Poll responses are served in order; once the script runs out every poll
/// reports `processing`.
#[derive(Clone)]
pub struct MockPredictionClient {
    create_response: Arc<Mutex<Option<Prediction>>>,
    poll_script: Arc<Mutex<VecDeque<ScriptedPoll>>>,
    prompts: Arc<Mutex<Vec<String>>>,
    create_count: Arc<Mutex<usize>>,
    poll_count: Arc<Mutex<usize>>,
    missing_token: bool,
}

impl MockPredictionClient {
    pub fn new() -> Self {
        Self {
            create_response: Arc::new(Mutex::new(None)),
            poll_script: Arc::new(Mutex::new(VecDeque::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
            create_count: Arc::new(Mutex::new(0)),
            poll_count: Arc::new(Mutex::new(0)),
            missing_token: false,
        }
    }

    pub fn with_create_response(self, prediction: Prediction) -> Self {
        *self.create_response.lock().unwrap() = Some(prediction);
        self
    }

    pub fn with_poll_response(self, prediction: Prediction) -> Self {
        self.poll_script
            .lock()
            .unwrap()
            .push_back(ScriptedPoll::Respond(prediction));
        self
    }

    pub fn with_poll_error(self, message: &str) -> Self {
        self.poll_script
            .lock()
            .unwrap()
            .push_back(ScriptedPoll::Fail(message.to_string()));
        self
    }

    /// Behave as if the provider credential had not been configured.
    pub fn with_missing_token(mut self) -> Self {
        self.missing_token = true;
        self
    }

    pub fn get_create_count(&self) -> usize {
        *self.create_count.lock().unwrap()
    }

    pub fn get_poll_count(&self) -> usize {
        *self.poll_count.lock().unwrap()
    }

    pub fn get_call_count(&self) -> usize {
        self.get_create_count() + self.get_poll_count()
    }

    /// Prompts received by `create_prediction`, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Default for MockPredictionClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PredictionService for MockPredictionClient {
    async fn create_prediction(&self, prompt: &str, _num_outputs: u32) -> Result<Prediction> {
        if self.missing_token {
            return Err(Error::Configuration(
                "Provider API token not configured".to_string(),
            ));
        }

        let mut count = self.create_count.lock().unwrap();
        *count += 1;
        self.prompts.lock().unwrap().push(prompt.to_string());

        let scripted = self.create_response.lock().unwrap().clone();
        Ok(scripted.unwrap_or_else(|| {
            Prediction::with_status(&format!("mock-prediction-{}", *count), "starting")
        }))
    }

    async fn get_prediction(&self, id: &str) -> Result<Prediction> {
        *self.poll_count.lock().unwrap() += 1;

        match self.poll_script.lock().unwrap().pop_front() {
            Some(ScriptedPoll::Respond(prediction)) => Ok(prediction),
            Some(ScriptedPoll::Fail(message)) => Err(Error::Provider(message)),
            None => Ok(Prediction::processing(id)),
        }
    }
}
