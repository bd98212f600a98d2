//! Error types for the docqa pipeline
//!
//! One enum covers the whole taxonomy: construction-time failures
//! (configuration, missing collections, snapshot loading) and per-invocation
//! failures (retrieval, templating, generation, agent delegation).

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the question-answering pipeline
#[derive(Error, Debug)]
pub enum QaError {
    /// Invalid pipeline configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// No persisted collection exists for the configured file-name set
    #[error("Missing collection '{collection}' under {path}")]
    MissingCollection { collection: String, path: PathBuf },

    /// A store snapshot could not be read or decoded
    #[error("Failed to load snapshot {path}: {source}")]
    SnapshotLoad {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    /// Retrieval backend failure during a run
    #[error("Retrieval failed: {0}")]
    Retrieval(String),

    /// Prompt template failure (unresolved placeholder, syntax error)
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    /// Chat model failure during answer generation
    #[error("Generation failed: {0}")]
    Generation(String),

    /// Failure inside the delegated reasoning agent, propagated unchanged
    #[error("Agent run failed: {0}")]
    Agent(#[source] anyhow::Error),

    /// HTTP client errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, QaError>;
