use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info, warn};

pub const FALLBACK_EMPTY: &str = "Sorry, I couldn't generate a response.";
pub const FALLBACK_UPSTREAM: &str =
    "I'm having trouble connecting to the AI model. Please try again.";
pub const FALLBACK_TIMEOUT: &str = "The request took too long. Please try a simpler question.";
pub const FALLBACK_GENERIC: &str = "An error occurred while processing your request.";

/// Banner Ollama serves on its root path.
const OLLAMA_BANNER: &str = "Ollama is running";

#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("inference request timed out")]
    Timeout,
    #[error("inference endpoint returned {0}")]
    Status(reqwest::StatusCode),
    #[error("inference request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("malformed inference response: {0}")]
    Decode(String),
}

impl InferenceError {
    fn from_reqwest(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            InferenceError::Timeout
        } else {
            InferenceError::Transport(e)
        }
    }

    /// Timeouts and connection failures may succeed on another attempt.
    fn is_retryable(&self) -> bool {
        matches!(self, InferenceError::Timeout | InferenceError::Transport(_))
    }
}

/// A text-completion backend.
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    /// Generate a completion for `prompt`. An empty string is a valid success.
    async fn generate(&self, prompt: &str) -> Result<String, InferenceError>;

    /// Cheap liveness probe.
    async fn is_available(&self) -> bool;

    fn model(&self) -> &str;
}

/// Run `prompt` through `backend`, turning every failure into a fixed reply.
pub async fn generate_or_fallback(backend: &dyn InferenceBackend, prompt: &str) -> String {
    match backend.generate(prompt).await {
        Ok(text) => {
            let text = text.trim();
            if text.is_empty() {
                FALLBACK_EMPTY.to_string()
            } else {
                text.to_string()
            }
        }
        Err(InferenceError::Timeout) => {
            error!("Inference request timeout");
            FALLBACK_TIMEOUT.to_string()
        }
        Err(InferenceError::Status(status)) => {
            error!(%status, "Inference API error");
            FALLBACK_UPSTREAM.to_string()
        }
        Err(e) => {
            error!("Error querying inference endpoint: {}", e);
            FALLBACK_GENERIC.to_string()
        }
    }
}

/// Sampling options forwarded verbatim to the generate endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationOptions {
    pub temperature: f32,
    pub top_p: f32,
    pub num_predict: u32,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.9,
            num_predict: 150,
        }
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<&'a GenerationOptions>,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelTag>,
}

#[derive(Deserialize)]
struct ModelTag {
    #[serde(default)]
    name: String,
}

/// Client for a local Ollama server.
pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    options: GenerationOptions,
    max_retries: u32,
}

impl OllamaClient {
    pub fn new(
        base_url: &str,
        model: &str,
        timeout: Duration,
        max_retries: u32,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            options: GenerationOptions::default(),
            max_retries,
        })
    }

    fn generate_url(&self) -> String {
        format!("{}/api/generate", self.base_url)
    }

    async fn generate_once(
        &self,
        prompt: &str,
        options: Option<&GenerationOptions>,
        timeout: Option<Duration>,
    ) -> Result<String, InferenceError> {
        let body = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options,
        };

        let mut req = self.client.post(self.generate_url()).json(&body);
        if let Some(t) = timeout {
            req = req.timeout(t);
        }

        let resp = req.send().await.map_err(InferenceError::from_reqwest)?;
        let status = resp.status();
        if !status.is_success() {
            return Err(InferenceError::Status(status));
        }

        let text = resp.text().await.map_err(InferenceError::from_reqwest)?;
        let parsed: GenerateResponse =
            serde_json::from_str(&text).map_err(|e| InferenceError::Decode(e.to_string()))?;
        Ok(parsed.response)
    }

    /// Names of the models the server has pulled.
    pub async fn list_models(&self) -> Result<Vec<String>> {
        let resp = self
            .client
            .get(format!("{}/api/tags", self.base_url))
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .context("Failed to query model tags")?
            .error_for_status()
            .context("Model tags request rejected")?;
        let tags: TagsResponse = resp.json().await.context("Failed to parse model tags")?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }

    /// Startup diagnostics: liveness, model presence, then a short test
    /// generation. Only logs; never fails startup.
    pub async fn log_startup_probe(&self) {
        if !self.is_available().await {
            error!(base_url = %self.base_url, "Cannot connect to Ollama");
            error!("   Please ensure 'ollama serve' is running");
            return;
        }
        info!("Ollama server is running");

        let models = match self.list_models().await {
            Ok(models) => models,
            Err(e) => {
                error!("Error checking models: {:#}", e);
                return;
            }
        };
        if !has_model(&models, &self.model) {
            error!(model = %self.model, available = ?models, "Model not found");
            error!("   Run: ollama pull {}", self.model);
            return;
        }
        info!(model = %self.model, "Model is available");

        match self
            .generate_once("hi", None, Some(Duration::from_secs(15)))
            .await
        {
            Ok(_) => info!(model = %self.model, "Ollama connected successfully"),
            Err(e) => warn!("Model test failed: {}", e),
        }
    }
}

/// Tags carry a variant suffix ("llama2:7b-chat"), so a substring is enough.
fn has_model(models: &[String], model: &str) -> bool {
    models.iter().any(|name| name.contains(model))
}

#[async_trait]
impl InferenceBackend for OllamaClient {
    async fn generate(&self, prompt: &str) -> Result<String, InferenceError> {
        let mut attempt = 0u32;
        loop {
            match self.generate_once(prompt, Some(&self.options), None).await {
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    let backoff = 250u64 * 2u64.pow(attempt.min(6)) + fastrand::u64(0..250);
                    warn!(attempt, backoff_ms = backoff, "Inference attempt failed: {}", e);
                    tokio::time::sleep(Duration::from_millis(backoff)).await;
                    attempt += 1;
                }
                other => return other,
            }
        }
    }

    async fn is_available(&self) -> bool {
        let resp = self
            .client
            .get(format!("{}/", self.base_url))
            .timeout(Duration::from_secs(3))
            .send()
            .await;
        match resp {
            Ok(r) if r.status() == reqwest::StatusCode::OK => r
                .text()
                .await
                .map(|body| body.contains(OLLAMA_BANNER))
                .unwrap_or(false),
            _ => false,
        }
    }

    fn model(&self) -> &str {
        &self.model
    }
}
