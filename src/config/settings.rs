//! Application settings management

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Number of transcript characters sent to the model when summarizing a video.
pub const SUMMARY_CHAR_LIMIT: usize = 4000;

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerSettings,

    /// LLM settings
    #[serde(default)]
    pub llm: LlmSettings,

    /// YouTube transcript settings
    #[serde(default)]
    pub youtube: YouTubeSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Address to bind
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Allowed CORS origins (empty = any origin)
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    /// LLM provider (openai, gemini)
    #[serde(default = "default_llm_provider")]
    pub provider: String,

    /// API key
    #[serde(default)]
    pub api_key: String,

    /// Model name (empty = provider default)
    #[serde(default)]
    pub model: String,

    /// API endpoint (empty = provider default)
    #[serde(default)]
    pub endpoint: String,

    /// Maximum tokens per completion
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YouTubeSettings {
    /// Base URL for watch pages and the player API
    #[serde(default = "default_youtube_endpoint")]
    pub endpoint: String,

    /// Caption languages to look for, in order of preference
    #[serde(default = "default_languages")]
    pub languages: Vec<String>,

    /// Transcript characters included in the summary prompt
    #[serde(default = "default_summary_char_limit")]
    pub summary_char_limit: usize,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

// Default value functions

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_llm_provider() -> String {
    "openai".to_string()
}

fn default_max_tokens() -> u32 {
    1000
}

fn default_temperature() -> f64 {
    0.7
}

fn default_youtube_endpoint() -> String {
    "https://www.youtube.com".to_string()
}

fn default_languages() -> Vec<String> {
    vec!["en".to_string()]
}

fn default_summary_char_limit() -> usize {
    SUMMARY_CHAR_LIMIT
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: default_llm_provider(),
            api_key: String::new(),
            model: String::new(),
            endpoint: String::new(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
        }
    }
}

impl Default for YouTubeSettings {
    fn default() -> Self {
        Self {
            endpoint: default_youtube_endpoint(),
            languages: default_languages(),
            summary_char_limit: default_summary_char_limit(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings::default(),
            llm: LlmSettings::default(),
            youtube: YouTubeSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from the configuration file
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            tracing::info!("No config file found, using defaults");
            let mut settings = Self::default();
            settings.apply_env_overrides(|key| std::env::var(key).ok());
            return Ok(settings);
        }

        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let mut settings = Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

        settings.apply_env_overrides(|key| std::env::var(key).ok());

        Ok(settings)
    }

    /// Parse settings from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply environment variable overrides.
    ///
    /// `AI_PROVIDER`, `HOST` and `PORT` always win over the file. The API key
    /// variable matching the provider only fills an empty `llm.api_key`.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(provider) = var("AI_PROVIDER") {
            self.llm.provider = provider.trim().to_lowercase();
        }

        if self.llm.api_key.trim().is_empty() {
            let key_var = match self.llm.provider.to_lowercase().as_str() {
                "gemini" => "GEMINI_API_KEY",
                _ => "OPENAI_API_KEY",
            };
            if let Some(key) = var(key_var) {
                self.llm.api_key = key;
            }
        }

        if let Some(host) = var("HOST") {
            self.server.host = host;
        }

        if let Some(port) = var("PORT") {
            match port.trim().parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!("Ignoring invalid PORT value: {}", port),
            }
        }
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("com", "deepvista", "deepvista")
            .context("Could not determine config directory")?;

        let config_dir = dirs.config_dir();
        Ok(config_dir.join("config.toml"))
    }

    /// Write default configuration to a file
    pub fn write_default(path: &PathBuf) -> Result<()> {
        let settings = Self::default();
        let content = toml::to_string_pretty(&settings)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Socket address string the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
