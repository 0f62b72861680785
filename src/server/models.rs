//! Request and response bodies

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::{DeepvistaError, Result};

/// Longest accepted chat message, in characters.
pub const MAX_MESSAGE_LENGTH: usize = 1000;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub ai_provider: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

impl ChatRequest {
    /// Check the length bounds on the raw message and return it trimmed.
    pub fn validated_message(&self) -> Result<&str> {
        let length = self.message.chars().count();
        if length == 0 {
            return Err(DeepvistaError::Validation(
                "Message must contain at least 1 character".to_string(),
            ));
        }
        if length > MAX_MESSAGE_LENGTH {
            return Err(DeepvistaError::Validation(format!(
                "Message must contain at most {} characters",
                MAX_MESSAGE_LENGTH
            )));
        }

        let trimmed = self.message.trim();
        if trimmed.is_empty() {
            return Err(DeepvistaError::Validation(
                "Message cannot be empty".to_string(),
            ));
        }
        Ok(trimmed)
    }
}

#[derive(Debug, Deserialize)]
pub struct VideoRequest {
    pub url: String,
}

/// Body returned by `/chat` and `/process-youtube-video`.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub timestamp: String,
}

impl ChatResponse {
    pub fn now(response: String) -> Self {
        Self {
            response,
            timestamp: timestamp(),
        }
    }
}

/// Current UTC time in RFC 3339.
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
