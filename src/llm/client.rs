use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::config::Settings;
use crate::llm::gemini::GeminiClient;
use crate::llm::openai::OpenAiClient;
use crate::DeepvistaError;

#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Produce a completion for a single user prompt.
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Build an LLM provider from runtime settings.
pub fn build_provider(settings: &Settings) -> Result<Box<dyn LlmProvider>> {
    match settings.llm.provider.trim().to_lowercase().as_str() {
        "openai" => Ok(Box::new(OpenAiClient::from_settings(settings)?)),
        "gemini" => Ok(Box::new(GeminiClient::from_settings(settings)?)),
        other => anyhow::bail!(
            "Unsupported llm.provider '{}'. Supported providers: openai, gemini",
            other
        ),
    }
}

/// Completion client used by the request handlers.
///
/// A provider that could not be configured leaves the client disabled rather
/// than stopping the server; calls then fail with
/// [`DeepvistaError::ProviderUnavailable`].
pub struct CompletionClient {
    provider_name: String,
    provider: Option<Arc<dyn LlmProvider>>,
}

impl CompletionClient {
    pub fn new(provider_name: impl Into<String>, provider: Option<Arc<dyn LlmProvider>>) -> Self {
        Self {
            provider_name: provider_name.into(),
            provider,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let name = settings.llm.provider.trim().to_lowercase();
        let provider: Option<Arc<dyn LlmProvider>> = match build_provider(settings) {
            Ok(provider) => {
                info!("{} provider initialized", name);
                Some(Arc::from(provider))
            }
            Err(e) => {
                warn!("AI provider disabled: {}", e);
                None
            }
        };

        Self::new(name, provider)
    }

    /// Configured provider name, reported by `/health`.
    pub fn provider_name(&self) -> &str {
        &self.provider_name
    }

    pub fn is_enabled(&self) -> bool {
        self.provider.is_some()
    }

    pub async fn generate(&self, prompt: &str) -> crate::Result<String> {
        let provider = self
            .provider
            .as_ref()
            .ok_or(DeepvistaError::ProviderUnavailable)?;

        info!("Generating response for prompt: {}...", preview(prompt));

        match provider.generate(prompt).await {
            Ok(text) => {
                info!("Response generated successfully: {}...", preview(&text));
                Ok(text)
            }
            Err(e) => {
                error!("Error generating response: {:#}", e);
                Err(DeepvistaError::Provider(format!("{:#}", e)))
            }
        }
    }
}

/// First 50 characters, for log lines.
fn preview(text: &str) -> String {
    text.chars().take(50).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;

    struct Echo;

    #[async_trait]
    impl LlmProvider for Echo {
        async fn generate(&self, prompt: &str) -> Result<String> {
            Ok(format!("echo: {}", prompt))
        }
    }

    struct Broken;

    #[async_trait]
    impl LlmProvider for Broken {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            anyhow::bail!("quota exceeded")
        }
    }

    #[test]
    fn unsupported_provider_returns_error() {
        let mut settings = Settings::default();
        settings.llm.provider = "unknown".to_string();

        let err = match build_provider(&settings) {
            Ok(_) => panic!("expected provider creation to fail"),
            Err(e) => e.to_string(),
        };
        assert!(err.contains("Unsupported llm.provider"));
    }

    #[test]
    fn openai_provider_requires_api_key() {
        let settings = Settings::default();

        let err = match build_provider(&settings) {
            Ok(_) => panic!("expected provider creation to fail"),
            Err(e) => e.to_string(),
        };
        assert!(err.contains("OpenAI API key is missing"));
    }

    #[test]
    fn gemini_provider_requires_api_key() {
        let mut settings = Settings::default();
        settings.llm.provider = "gemini".to_string();

        let err = match build_provider(&settings) {
            Ok(_) => panic!("expected provider creation to fail"),
            Err(e) => e.to_string(),
        };
        assert!(err.contains("Gemini API key is missing"));
    }

    #[test]
    fn missing_key_leaves_client_disabled() {
        let client = CompletionClient::from_settings(&Settings::default());
        assert!(!client.is_enabled());
        assert_eq!(client.provider_name(), "openai");
    }

    #[test]
    fn provider_name_is_normalized() {
        let mut settings = Settings::default();
        settings.llm.provider = " OpenAI ".to_string();

        let client = CompletionClient::from_settings(&settings);
        assert_eq!(client.provider_name(), "openai");
    }

    #[tokio::test]
    async fn disabled_client_reports_unavailable() {
        let client = CompletionClient::new("openai", None);
        let err = client.generate("hi").await.unwrap_err();
        assert!(matches!(err, DeepvistaError::ProviderUnavailable));
    }

    #[tokio::test]
    async fn provider_failure_keeps_message() {
        let client = CompletionClient::new("openai", Some(Arc::new(Broken)));
        match client.generate("hi").await {
            Err(DeepvistaError::Provider(msg)) => assert!(msg.contains("quota exceeded")),
            other => panic!("expected provider error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn enabled_client_returns_provider_output() {
        let client = CompletionClient::new("openai", Some(Arc::new(Echo)));
        assert_eq!(client.generate("hi").await.unwrap(), "echo: hi");
    }
}
