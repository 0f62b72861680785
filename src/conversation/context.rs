//! Transcript context that grounds chat turns

use std::sync::Arc;
use tokio::sync::RwLock;

use crate::llm::prompts::build_grounded_prompt;

/// Holds at most one transcript; empty means chat is not grounded.
#[derive(Debug, Default)]
pub struct ConversationContext {
    transcript: Option<String>,
}

impl ConversationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the stored transcript. Blank text leaves the context empty.
    pub fn set_context(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.transcript = if text.trim().is_empty() {
            None
        } else {
            Some(text)
        };
    }

    pub fn clear_context(&mut self) {
        self.transcript = None;
    }

    pub fn transcript(&self) -> Option<&str> {
        self.transcript.as_deref()
    }

    pub fn is_grounded(&self) -> bool {
        self.transcript.is_some()
    }

    /// Prompt for a chat turn: grounded in the transcript when one is stored,
    /// otherwise the message itself.
    pub fn build_prompt(&self, user_message: &str) -> String {
        match &self.transcript {
            Some(transcript) => build_grounded_prompt(transcript, user_message),
            None => user_message.to_string(),
        }
    }
}

/// Context shared by the request handlers
pub type SharedContext = Arc<RwLock<ConversationContext>>;

/// Create an empty shared context
pub fn new_shared_context() -> SharedContext {
    Arc::new(RwLock::new(ConversationContext::new()))
}
