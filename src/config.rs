//! User configuration: a JSON file in the platform config directory, overridden
//! by environment variables and then by command-line flags.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::llm::{
    CompletionConfig, DEFAULT_GENERATE_URL, DEFAULT_MAX_RETRIES, DEFAULT_MODEL, DEFAULT_TAGS_URL,
};
use crate::models::{AuthorContext, DraftMode};

const APP_NAME: &str = "ghostwriter";
const CONFIG_FILE: &str = "config.json";

const ENV_MODEL: &str = "GHOSTWRITER_MODEL";
const ENV_GENERATE_URL: &str = "GHOSTWRITER_GENERATE_URL";
const ENV_TAGS_URL: &str = "GHOSTWRITER_TAGS_URL";
const ENV_MAX_RETRIES: &str = "GHOSTWRITER_MAX_RETRIES";

const GENERATE_PATH: &str = "/api/generate";
const TAGS_PATH: &str = "/api/tags";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Ollama model name, e.g. `dolphin-llama3:8b`.
    pub model: String,
    /// Generate endpoint.
    pub generate_url: String,
    /// Model-listing endpoint used by `--check-model`.
    pub tags_url: String,
    /// Per-attempt limit for a completion, in seconds.
    pub request_timeout_secs: u64,
    /// Attempts per completion (minimum 1).
    pub max_retries: u32,
    pub draft_mode: DraftMode,
    pub author: AuthorContext,
}

impl Default for AppConfig {
    fn default() -> Self {
        let completion = CompletionConfig::default();
        Self {
            model: DEFAULT_MODEL.to_string(),
            generate_url: DEFAULT_GENERATE_URL.to_string(),
            tags_url: DEFAULT_TAGS_URL.to_string(),
            request_timeout_secs: completion.request_timeout.as_secs(),
            max_retries: DEFAULT_MAX_RETRIES,
            draft_mode: DraftMode::default(),
            author: AuthorContext::default(),
        }
    }
}

impl AppConfig {
    /// Load from `path`, or from the user's config directory when `None`.
    /// Returns defaults if the file doesn't exist or fails to parse.
    pub fn load(path: Option<&Path>) -> Self {
        let path = match path {
            Some(path) => Ok(path.to_path_buf()),
            None => default_config_path(),
        };
        match path.and_then(|p| Self::try_load(&p)) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Failed to load config, using defaults: {:#}", e);
                Self::default()
            }
        }
    }

    fn try_load(path: &Path) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", path.display()))
            }
        };

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Use `url` for generation. When it ends in `/api/generate`, the tags
    /// endpoint moves to the same host.
    pub fn set_generate_url(&mut self, url: impl Into<String>) {
        let url = url.into();
        if let Some(base) = url.trim_end_matches('/').strip_suffix(GENERATE_PATH) {
            self.tags_url = format!("{base}{TAGS_PATH}");
        }
        self.generate_url = url;
    }

    /// Apply `GHOSTWRITER_*` environment overrides.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(model) = var(ENV_MODEL) {
            self.model = model;
        }
        if let Some(url) = var(ENV_GENERATE_URL) {
            self.set_generate_url(url);
        }
        if let Some(url) = var(ENV_TAGS_URL) {
            self.tags_url = url;
        }
        if let Some(raw) = var(ENV_MAX_RETRIES) {
            match raw.parse() {
                Ok(n) => self.max_retries = n,
                Err(_) => tracing::warn!("Ignoring invalid {}={}", ENV_MAX_RETRIES, raw),
            }
        }
    }

    /// Client configuration derived from this file.
    pub fn completion_config(&self) -> CompletionConfig {
        CompletionConfig {
            model: self.model.clone(),
            generate_url: self.generate_url.clone(),
            tags_url: self.tags_url.clone(),
            request_timeout: self.request_timeout(),
            ..CompletionConfig::default()
        }
    }

    fn request_timeout(&self) -> Duration {
        if self.request_timeout_secs == 0 {
            tracing::warn!("request_timeout_secs is 0; using 1 second");
        }
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

pub fn default_config_path() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("", "", APP_NAME)
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    Ok(dirs.config_dir().join(CONFIG_FILE))
}
