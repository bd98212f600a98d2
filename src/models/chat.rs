//! Chat completion client
//!
//! Non-streaming generation against the Ollama API:
//! - Endpoint: POST /api/generate
//! - The pipeline performs no retries; retry policy, if any, lives here or
//!   in the server, never in the orchestration layer.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::ModelConfig;
use crate::errors::{QaError, Result};

/// Capability interface for answer generation
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Produce the model's text output for one prompt
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Request body for /api/generate
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
}

/// Response body for /api/generate with stream=false
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Ollama-backed chat model
#[derive(Debug, Clone)]
pub struct OllamaChatModel {
    client: Client,
    endpoint: String,
    model: String,
    temperature: f32,
}

impl OllamaChatModel {
    /// Create a client from model connection parameters
    pub fn new(config: &ModelConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.chat_model.clone(),
            temperature: config.temperature,
        })
    }

    /// Configured model name
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl ChatModel for OllamaChatModel {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/api/generate", self.endpoint);
        let body = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: self.temperature,
            },
        };

        let response = self.client.post(&url).json(&body).send().await?;

        if !response.status().is_success() {
            return Err(QaError::Generation(format!(
                "model API returned {} for model '{}'",
                response.status(),
                self.model
            )));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| QaError::Generation(format!("undecodable model response: {e}")))?;

        Ok(parsed.response)
    }
}
