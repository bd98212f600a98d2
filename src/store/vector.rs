//! In-memory vector index hydrated from a JSON snapshot
//!
//! Brute-force cosine search. Collections addressed by this crate are
//! per-document-set and small enough that a scan beats maintaining an ANN
//! structure.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::errors::{QaError, Result};

/// One embedded passage in the vector snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorRecord {
    /// Stable identifier, shared with the document snapshot
    pub id: String,

    /// Embedding produced at indexing time
    pub embedding: Vec<f32>,
}

/// Vector index backed by a snapshot loaded fully into memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryVectorStore {
    records: Vec<VectorRecord>,
}

impl InMemoryVectorStore {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Hydrate the index from a `vectors.json` snapshot
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| QaError::SnapshotLoad {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
        let records: Vec<VectorRecord> =
            serde_json::from_str(&contents).map_err(|e| QaError::SnapshotLoad {
                path: path.to_path_buf(),
                source: e.into(),
            })?;

        Ok(Self { records })
    }

    /// Return the ids of the `top_k` records most similar to `query`,
    /// with cosine scores, relevance-descending.
    pub fn query(&self, query: &[f32], top_k: usize) -> Vec<(String, f32)> {
        let mut scored: Vec<(String, f32)> = self
            .records
            .iter()
            .map(|record| (record.id.clone(), cosine_similarity(query, &record.embedding)))
            .collect();

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);
        scored
    }

    /// Number of indexed records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the index holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Cosine similarity of two embeddings; 0.0 for mismatched or zero vectors
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}
