//! LLM module for deepvista
//!
//! Completion providers (OpenAI, Gemini) and the prompts sent to them.

mod client;
mod gemini;
mod openai;
pub mod prompts;

pub use client::{build_provider, CompletionClient, LlmProvider};
pub use gemini::GeminiClient;
pub use openai::OpenAiClient;
