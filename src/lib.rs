//! Thumbnail generator - composes prompts and drives hosted image-generation jobs
//!
//! A request (main text, optional style preset, context and reference video
//! URL) is turned into a single prompt, submitted to an asynchronous
//! prediction provider, and polled until the provider reports a terminal
//! state. A [`session::Session`] keeps the last request around so a chosen
//! thumbnail can be refined in further rounds.

pub mod config;
pub mod download;
pub mod driver;
pub mod error;
pub mod mime;
pub mod models;
pub mod prompts;
pub mod provider;
pub mod session;

pub use error::{Error, Result};
