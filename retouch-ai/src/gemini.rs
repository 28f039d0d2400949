//! Blocking HTTP client for the Gemini image model.

use std::env;
use std::time::{Duration, Instant};

use reqwest::blocking::Client as HttpClient;
use reqwest::header::CONTENT_TYPE;
use retouch_core::{Artifact, Hotspot};
use tracing::{debug, info, warn};

use crate::response::{GenerateRequest, GenerateResponse};
use crate::{prompts, EditKind, EditService, ServiceError};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image-preview";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Environment variables searched for the API key, in order.
pub const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub api_base: String,
    pub timeout: Duration,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Read the key from the environment; everything else takes defaults.
    pub fn from_env() -> Result<Self, ServiceError> {
        API_KEY_VARS
            .iter()
            .filter_map(|name| env::var(name).ok())
            .map(|value| value.trim().to_string())
            .find(|value| !value.is_empty())
            .map(Self::new)
            .ok_or(ServiceError::MissingApiKey)
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.api_base.trim().trim_end_matches('/'),
            self.model.trim()
        )
    }
}

pub struct GeminiClient {
    config: GeminiConfig,
    http: HttpClient,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, ServiceError> {
        if config.api_key.trim().is_empty() {
            return Err(ServiceError::MissingApiKey);
        }
        let http = HttpClient::builder().timeout(config.timeout).build()?;
        info!("Gemini client ready (model {})", config.model);
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn generate(&self, kind: EditKind, image: &Artifact, prompt: String) -> Result<Artifact, ServiceError> {
        let started = Instant::now();
        let body = GenerateRequest::image_with_prompt(image, prompt);
        debug!(
            "Sending {} request for {} ({} bytes)",
            kind.noun(),
            image.name(),
            image.len()
        );

        let response = self
            .http
            .post(self.config.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .header(CONTENT_TYPE, "application/json")
            .json(&body)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            warn!("{} request failed with HTTP {}", kind.noun(), status.as_u16());
            return Err(ServiceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response.json()?;
        let artifact = parsed.into_artifact(kind)?;
        info!(
            "{} finished in {:.1}s -> {}",
            kind.noun(),
            started.elapsed().as_secs_f32(),
            artifact.name()
        );
        Ok(artifact)
    }
}

impl EditService for GeminiClient {
    fn edit(&self, image: &Artifact, instruction: &str, hotspot: Hotspot) -> Result<Artifact, ServiceError> {
        self.generate(EditKind::Edit, image, prompts::localized_edit(instruction, hotspot))
    }

    fn filter(&self, image: &Artifact, instruction: &str) -> Result<Artifact, ServiceError> {
        self.generate(EditKind::Filter, image, prompts::filter(instruction))
    }

    fn adjust(&self, image: &Artifact, instruction: &str) -> Result<Artifact, ServiceError> {
        self.generate(EditKind::Adjustment, image, prompts::adjustment(instruction))
    }
}
