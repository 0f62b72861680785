use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::llm::client::LlmProvider;
use crate::llm::prompts::SYSTEM_PROMPT;

const DEFAULT_OPENAI_ENDPOINT: &str = "https://api.openai.com/v1";
const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";

pub struct OpenAiClient {
    http: Client,
    api_key: String,
    model: String,
    endpoint: String,
    max_tokens: u32,
    temperature: f64,
}

impl OpenAiClient {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let api_key = settings.llm.api_key.trim().to_string();
        if api_key.is_empty() {
            anyhow::bail!(
                "OpenAI API key is missing. Set llm.api_key in config or OPENAI_API_KEY."
            );
        }

        let model = if settings.llm.model.trim().is_empty() {
            DEFAULT_OPENAI_MODEL.to_string()
        } else {
            settings.llm.model.trim().to_string()
        };

        let endpoint = if settings.llm.endpoint.trim().is_empty() {
            DEFAULT_OPENAI_ENDPOINT.to_string()
        } else {
            settings
                .llm
                .endpoint
                .trim()
                .trim_end_matches('/')
                .to_string()
        };

        Ok(Self {
            http: Client::builder()
                .timeout(std::time::Duration::from_secs(45))
                .build()
                .context("Failed to build OpenAI HTTP client")?,
            api_key,
            model,
            endpoint,
            max_tokens: settings.llm.max_tokens,
            temperature: settings.llm.temperature,
        })
    }

    fn request_url(&self) -> String {
        format!("{}/chat/completions", self.endpoint)
    }

    fn request_body<'a>(&'a self, prompt: &'a str) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let response = self
            .http
            .post(self.request_url())
            .bearer_auth(&self.api_key)
            .json(&self.request_body(prompt))
            .send()
            .await
            .context("OpenAI request failed")?;

        let response = response
            .error_for_status()
            .context("OpenAI returned an error status")?;

        let payload: ChatCompletionResponse = response
            .json()
            .await
            .context("Failed to parse OpenAI response")?;

        payload
            .first_content()
            .context("OpenAI response did not contain any message content")
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

impl ChatCompletionResponse {
    fn first_content(&self) -> Option<String> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
    }
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}
