//! Session state for one user: the last request, the current thumbnails,
//! and which one is selected for refinement.
//!
//! Every operation that starts a job takes `&mut self`, so a session can
//! never have two jobs in flight.

use crate::driver::JobDriver;
use crate::models::{GenerationRequest, RefinementRequest};
use crate::{prompts, Error, Result};
use tracing::info;
use uuid::Uuid;

pub const DEFAULT_NUM_OUTPUTS: u32 = 3;

pub struct Session {
    id: Uuid,
    driver: JobDriver,
    num_outputs: u32,
    last_request: Option<GenerationRequest>,
    thumbnails: Vec<String>,
    selected: Option<usize>,
}

impl Session {
    pub fn new(driver: JobDriver) -> Self {
        Self {
            id: Uuid::new_v4(),
            driver,
            num_outputs: DEFAULT_NUM_OUTPUTS,
            last_request: None,
            thumbnails: Vec::new(),
            selected: None,
        }
    }

    pub fn with_num_outputs(mut self, num_outputs: u32) -> Self {
        self.num_outputs = num_outputs;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn thumbnails(&self) -> &[String] {
        &self.thumbnails
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn last_request(&self) -> Option<&GenerationRequest> {
        self.last_request.as_ref()
    }

    /// Run a fresh generation, replacing any previous thumbnails.
    pub async fn generate(&mut self, request: GenerationRequest) -> Result<&[String]> {
        request.validate()?;

        self.thumbnails.clear();
        self.selected = None;

        let prompt = prompts::compose(&request);
        info!(session = %self.id, "Generating thumbnails");
        self.last_request = Some(request);

        self.thumbnails = self.driver.run_generation(&prompt, self.num_outputs).await?;
        info!(session = %self.id, "Generated {} thumbnail(s)", self.thumbnails.len());
        Ok(&self.thumbnails)
    }

    /// Pick one of the current thumbnails (0-based) for refinement.
    pub fn select(&mut self, index: usize) -> Result<&str> {
        let url = self.thumbnails.get(index).ok_or_else(|| {
            Error::Validation(format!(
                "Thumbnail {} does not exist ({} available)",
                index + 1,
                self.thumbnails.len()
            ))
        })?;
        self.selected = Some(index);
        Ok(url)
    }

    /// Refine the selected thumbnail. On success the new candidates replace
    /// the old ones and the selection is cleared; on failure both are kept.
    pub async fn refine(&mut self, note: &str) -> Result<&[String]> {
        let original = match (self.selected, &self.last_request) {
            (Some(_), Some(original)) => original,
            _ => {
                return Err(Error::Validation(
                    "Select a thumbnail before refining".to_string(),
                ))
            }
        };

        let refinement = RefinementRequest::from_original(note, original);
        refinement.validate()?;

        let prompt = prompts::compose_refinement(&refinement);
        info!(session = %self.id, "Refining thumbnail {:?}", self.selected.map(|i| i + 1));

        let urls = self.driver.run_generation(&prompt, self.num_outputs).await?;
        self.thumbnails = urls;
        self.selected = None;
        info!(session = %self.id, "Refinement produced {} thumbnail(s)", self.thumbnails.len());
        Ok(&self.thumbnails)
    }
}
