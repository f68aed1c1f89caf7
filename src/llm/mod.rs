//! Text completion against a local Ollama server.

mod client;
mod types;

pub use client::{CompletionError, OllamaClient};
pub use types::*;

use std::time::Duration;

use async_trait::async_trait;

/// Model used when nothing else is configured.
pub const DEFAULT_MODEL: &str = "dolphin-llama3:8b";
/// Default generate endpoint.
pub const DEFAULT_GENERATE_URL: &str = "http://localhost:11434/api/generate";
/// Default model-listing endpoint.
pub const DEFAULT_TAGS_URL: &str = "http://localhost:11434/api/tags";
/// Default attempt budget for a single completion.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(300);
const DEFAULT_AVAILABILITY_TIMEOUT: Duration = Duration::from_secs(10);

/// Something that turns a prompt into text.
///
/// Implementations absorb every transport and content failure: the result is
/// either a non-empty trimmed string or `None`.
#[async_trait]
pub trait Completer: Send + Sync {
    async fn complete(&self, prompt: &str, max_retries: u32) -> Option<String>;
}

/// Sampling options sent with every generate request.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct SamplingOptions {
    pub temperature: f32,
    pub top_p: f32,
    pub num_ctx: u32,
    pub repeat_penalty: f32,
}

impl Default for SamplingOptions {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.9,
            num_ctx: 4096,
            repeat_penalty: 1.1,
        }
    }
}

/// Immutable client configuration, fixed for the lifetime of an [`OllamaClient`].
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    pub model: String,
    pub generate_url: String,
    pub tags_url: String,
    /// Overall limit for one generate attempt.
    pub request_timeout: Duration,
    /// Limit for the model-listing query.
    pub availability_timeout: Duration,
    pub options: SamplingOptions,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            generate_url: DEFAULT_GENERATE_URL.to_string(),
            tags_url: DEFAULT_TAGS_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            availability_timeout: DEFAULT_AVAILABILITY_TIMEOUT,
            options: SamplingOptions::default(),
        }
    }
}
