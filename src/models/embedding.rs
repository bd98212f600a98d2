//! Embedding client
//!
//! Query-time embeddings against the Ollama API:
//! - Endpoint: POST /api/embeddings
//!
//! Only queries are embedded here; passage embeddings were computed by the
//! indexing tooling and live in the vector snapshot.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::ModelConfig;
use crate::errors::{QaError, Result};

/// Capability interface for query embedding
#[async_trait]
pub trait EmbeddingModel: Send + Sync {
    /// Embed one query string
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

/// Request body for /api/embeddings
#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

/// Response body for /api/embeddings
#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}

/// Ollama-backed embedding model
#[derive(Debug, Clone)]
pub struct OllamaEmbeddings {
    client: Client,
    endpoint: String,
    model: String,
}

impl OllamaEmbeddings {
    /// Create a client from model connection parameters
    pub fn new(config: &ModelConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.embedding_model.clone(),
        })
    }

    /// Configured model name
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl EmbeddingModel for OllamaEmbeddings {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let url = format!("{}/api/embeddings", self.endpoint);
        let body = EmbeddingRequest {
            model: &self.model,
            prompt: text,
        };

        let response = self.client.post(&url).json(&body).send().await?;

        if !response.status().is_success() {
            return Err(QaError::Retrieval(format!(
                "embedding API returned {} for model '{}'",
                response.status(),
                self.model
            )));
        }

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| QaError::Retrieval(format!("undecodable embedding response: {e}")))?;

        if parsed.embedding.is_empty() {
            return Err(QaError::Retrieval(format!(
                "embedding model '{}' returned an empty vector",
                self.model
            )));
        }

        Ok(parsed.embedding)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_construction() {
        let model = OllamaEmbeddings::new(&ModelConfig::default()).unwrap();
        assert_eq!(model.model(), "nomic-embed-text");
    }

    #[test]
    fn test_request_body_shape() {
        let body = EmbeddingRequest {
            model: "m",
            prompt: "what is this about",
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "m");
        assert_eq!(json["prompt"], "what is this about");
    }

    #[tokio::test]
    #[ignore] // Requires a running model server
    async fn test_embed_integration() {
        let model = OllamaEmbeddings::new(&ModelConfig::default()).unwrap();
        let vector = model.embed("hello").await;
        assert!(vector.is_ok());
    }
}
