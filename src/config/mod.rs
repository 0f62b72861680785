//! Configuration module for deepvista
//!
//! Handles loading settings from a TOML file, `.env` and the environment.

mod settings;

pub use settings::{LlmSettings, ServerSettings, Settings, YouTubeSettings, SUMMARY_CHAR_LIMIT};
