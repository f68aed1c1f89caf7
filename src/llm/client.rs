//! HTTP client for the Ollama generate and tags endpoints.
//!
//! One generate call is made per attempt. Every failure mode (timeout,
//! connection error, error status, undecodable envelope, empty text) is retried
//! immediately until the attempt budget runs out, then reported as `None`.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use thiserror::Error;

use super::{
    Completer, CompletionConfig, GenerateRequest, GenerateResponse, TagsResponse,
};

/// Why a single attempt failed.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("request timed out")]
    Timeout,

    #[error("error connecting to Ollama: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Ollama returned {0}")]
    Status(StatusCode),

    #[error("failed to parse JSON response: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("empty response from model")]
    Empty,
}

impl From<reqwest::Error> for CompletionError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else {
            Self::Transport(e)
        }
    }
}

/// Client for a local Ollama server.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    config: CompletionConfig,
    client: Client,
}

impl OllamaClient {
    pub fn new(config: CompletionConfig) -> Result<Self, CompletionError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(CompletionError::Transport)?;
        Ok(Self { config, client })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Generate a completion, making at most `max_retries` attempts (minimum one).
    ///
    /// Returns the trimmed, non-empty text of the first successful attempt.
    pub async fn complete(&self, prompt: &str, max_retries: u32) -> Option<String> {
        let max_retries = max_retries.max(1);
        let request = GenerateRequest {
            model: &self.config.model,
            prompt,
            stream: false,
            options: self.config.options,
        };

        for attempt in 1..=max_retries {
            tracing::info!(
                "Querying {}... (attempt {}/{})",
                self.config.model,
                attempt,
                max_retries
            );

            match self.generate_once(&request).await {
                Ok(text) => return Some(text),
                Err(e) => tracing::warn!("Attempt {} failed: {}", attempt, e),
            }

            if attempt < max_retries {
                tracing::info!("Retrying...");
            }
        }

        tracing::error!("All {} attempts failed", max_retries);
        self.log_guidance();
        None
    }

    /// Check whether the configured model is installed.
    ///
    /// Best effort: any failure to reach or decode the tags endpoint counts as
    /// unavailable.
    pub async fn check_availability(&self) -> bool {
        let installed = match self.list_models().await {
            Ok(models) => models,
            Err(e) => {
                tracing::error!("Error checking model availability: {}", e);
                tracing::error!("Please ensure Ollama is running: ollama serve");
                return false;
            }
        };

        if installed.iter().any(|name| name == &self.config.model) {
            tracing::info!("Model {} is available", self.config.model);
            true
        } else {
            tracing::warn!("Model {} not found", self.config.model);
            tracing::warn!("Available models: {}", installed.join(", "));
            tracing::warn!("To install: ollama pull {}", self.config.model);
            false
        }
    }

    /// Names of all installed models.
    pub async fn list_models(&self) -> Result<Vec<String>, CompletionError> {
        let response = self
            .client
            .get(&self.config.tags_url)
            .timeout(self.config.availability_timeout)
            .send()
            .await?;
        let body = Self::success_body(response).await?;
        let tags: TagsResponse = serde_json::from_str(&body)?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    /// One generate attempt.
    async fn generate_once(&self, request: &GenerateRequest<'_>) -> Result<String, CompletionError> {
        let response = self
            .client
            .post(&self.config.generate_url)
            .json(request)
            .send()
            .await?;
        let body = Self::success_body(response).await?;
        let envelope: GenerateResponse = serde_json::from_str(&body)?;

        let text = envelope.response.trim();
        if text.is_empty() {
            return Err(CompletionError::Empty);
        }
        Ok(text.to_string())
    }

    /// Read the body of a successful response, rejecting error statuses.
    async fn success_body(response: reqwest::Response) -> Result<String, CompletionError> {
        let status = response.status();
        if !status.is_success() {
            return Err(CompletionError::Status(status));
        }
        Ok(response.text().await?)
    }

    fn log_guidance(&self) {
        tracing::error!("Please ensure:");
        tracing::error!("1. Ollama is running: ollama serve");
        tracing::error!("2. Model is available: ollama pull {}", self.config.model);
        tracing::error!("3. Model is running: ollama run {}", self.config.model);
    }
}

#[async_trait]
impl Completer for OllamaClient {
    async fn complete(&self, prompt: &str, max_retries: u32) -> Option<String> {
        OllamaClient::complete(self, prompt, max_retries).await
    }
}
