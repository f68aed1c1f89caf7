//! Wire types for the Ollama generate and tags endpoints.

use serde::{Deserialize, Serialize};

use super::SamplingOptions;

/// Body of `POST /api/generate`.
#[derive(Debug, Serialize)]
pub struct GenerateRequest<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub stream: bool,
    pub options: SamplingOptions,
}

/// Envelope returned by `POST /api/generate` with streaming disabled.
///
/// Other fields (timings, context) are ignored.
#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub response: String,
}

/// Body returned by `GET /api/tags`.
#[derive(Debug, Deserialize)]
pub struct TagsResponse {
    #[serde(default)]
    pub models: Vec<ModelTag>,
}

/// One installed model.
#[derive(Debug, Deserialize)]
pub struct ModelTag {
    pub name: String,
}
