//! deepvista - A small chat backend that grounds LLM answers in YouTube transcripts
//!
//! Forwards chat messages to a completion API and, once a video has been
//! processed, answers them against that video's caption track.

pub mod cli;
pub mod config;
pub mod conversation;
pub mod llm;
pub mod server;
pub mod youtube;

use thiserror::Error;

use crate::youtube::TranscriptError;

/// Main error type for deepvista
#[derive(Error, Debug)]
pub enum DeepvistaError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    Validation(String),

    #[error("AI provider not available")]
    ProviderUnavailable,

    #[error("Error generating response: {0}")]
    Provider(String),

    #[error(transparent)]
    Transcript(#[from] TranscriptError),
}

pub type Result<T> = std::result::Result<T, DeepvistaError>;
