//! Error handling and custom error types
//!
//! Provides unified error handling across the generator using thiserror.
//! Every failure of the prompt/driver pipeline is returned to the caller as
//! one of these variants; nothing is retried automatically.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    #[error("Generation was canceled")]
    GenerationCanceled,

    #[error("Generation timed out after {attempts} status checks")]
    Timeout { attempts: u32 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
