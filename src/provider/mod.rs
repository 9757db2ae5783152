//! Prediction provider integration
//!
//! The provider owns the actual image model. This crate only creates
//! predictions and reads their status back, so the boundary is a small
//! trait with an HTTP implementation and a scripted mock.

pub mod client;
pub mod mock;
pub mod types;

pub use client::PredictionClient;
pub use mock::MockPredictionClient;
pub use types::{JobStatus, Prediction, PredictionOutput};

use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait PredictionService: Send + Sync {
    /// Create a prediction for `prompt` producing `num_outputs` images.
    async fn create_prediction(&self, prompt: &str, num_outputs: u32) -> Result<Prediction>;

    /// Fetch the current state of an existing prediction.
    async fn get_prediction(&self, id: &str) -> Result<Prediction>;
}
