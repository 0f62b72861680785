//! Shared state handed to every request handler

use anyhow::Result;
use std::sync::Arc;

use crate::config::Settings;
use crate::conversation::{new_shared_context, SharedContext};
use crate::llm::CompletionClient;
use crate::youtube::{TranscriptSource, YouTubeTranscriptClient};

#[derive(Clone)]
pub struct AppState {
    pub completion: Arc<CompletionClient>,
    pub transcripts: Arc<dyn TranscriptSource>,
    pub context: SharedContext,
    pub summary_char_limit: usize,
}

impl AppState {
    pub fn new(
        completion: CompletionClient,
        transcripts: Arc<dyn TranscriptSource>,
        summary_char_limit: usize,
    ) -> Self {
        Self {
            completion: Arc::new(completion),
            transcripts,
            context: new_shared_context(),
            summary_char_limit,
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let completion = CompletionClient::from_settings(settings);
        let transcripts = Arc::new(YouTubeTranscriptClient::from_settings(settings)?);

        Ok(Self::new(
            completion,
            transcripts,
            settings.youtube.summary_char_limit,
        ))
    }
}
