//! Pipeline configuration
//!
//! All connection parameters are passed in explicitly; there is no
//! environment or config-file fallback. A `QaConfig` is immutable for the
//! lifetime of a pipeline instance unless replaced wholesale, which rebuilds
//! the components derived from it.

use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::PathBuf;

use crate::errors::{QaError, Result};

/// Default model endpoint
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:11434";

/// Default chat model
pub const DEFAULT_CHAT_MODEL: &str = "qwen2.5:7b-instruct";

/// Default embedding model
pub const DEFAULT_EMBEDDING_MODEL: &str = "nomic-embed-text";

/// Default prompt template
pub const DEFAULT_PROMPT_TEMPLATE: &str =
    "Answer the following question: \"{{question}}\". The context is: \n{{context}}\nAnswer: ";

/// Model connection parameters shared by the chat and embedding clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Base URL of the model API
    pub endpoint: String,

    /// Chat model name
    pub chat_model: String,

    /// Embedding model name
    pub embedding_model: String,

    /// Sampling temperature for answer generation
    pub temperature: f32,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            temperature: 0.0,
            timeout_secs: 60,
        }
    }
}

impl ModelConfig {
    /// Cache key over the fields the chat client is derived from
    pub fn chat_key(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.endpoint.hash(&mut hasher);
        self.chat_model.hash(&mut hasher);
        self.temperature.to_bits().hash(&mut hasher);
        self.timeout_secs.hash(&mut hasher);
        hasher.finish()
    }

    /// Cache key over the fields the embedding client is derived from
    pub fn embedding_key(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.endpoint.hash(&mut hasher);
        self.embedding_model.hash(&mut hasher);
        self.timeout_secs.hash(&mut hasher);
        hasher.finish()
    }
}

/// Question-answering pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QaConfig {
    /// Root directory holding persisted collections
    pub storage_root: PathBuf,

    /// Source file names; together they address the persisted collection
    pub file_names: Vec<String>,

    /// Maximum number of passages retrieved per query
    pub retrieval_top_k: usize,

    /// Model connection parameters
    pub model: ModelConfig,

    /// Prompt template with `question` and `context` placeholders
    pub prompt_template: String,
}

impl Default for QaConfig {
    fn default() -> Self {
        Self {
            storage_root: PathBuf::from("./storage"),
            file_names: Vec::new(),
            retrieval_top_k: 3,
            model: ModelConfig::default(),
            prompt_template: DEFAULT_PROMPT_TEMPLATE.to_string(),
        }
    }
}

impl QaConfig {
    /// Create a configuration for the given storage root and file set
    pub fn new(storage_root: impl Into<PathBuf>, file_names: Vec<String>) -> Self {
        Self {
            storage_root: storage_root.into(),
            file_names,
            ..Default::default()
        }
    }

    /// Set the retrieval top-k
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.retrieval_top_k = top_k;
        self
    }

    /// Set the model connection parameters
    pub fn with_model(mut self, model: ModelConfig) -> Self {
        self.model = model;
        self
    }

    /// Set the prompt template
    pub fn with_prompt_template(mut self, template: impl Into<String>) -> Self {
        self.prompt_template = template.into();
        self
    }

    /// Validate construction-time invariants
    pub fn validate(&self) -> Result<()> {
        if self.retrieval_top_k < 1 {
            return Err(QaError::Config(
                "retrieval_top_k must be at least 1".to_string(),
            ));
        }
        if self.file_names.is_empty() {
            return Err(QaError::Config(
                "file_names must name at least one source file".to_string(),
            ));
        }
        if self.model.endpoint.trim().is_empty() {
            return Err(QaError::Config("model endpoint must not be empty".to_string()));
        }
        Ok(())
    }

    /// Cache key over the fields the retrieval engine is derived from
    pub fn retrieval_key(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.storage_root.hash(&mut hasher);
        let mut names = self.file_names.clone();
        names.sort();
        names.hash(&mut hasher);
        self.model.embedding_key().hash(&mut hasher);
        hasher.finish()
    }
}
