//! In-memory document store hydrated from a JSON snapshot

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::errors::{QaError, Result};

/// A stored passage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Stable identifier, shared with the vector snapshot
    pub id: String,

    /// Passage text
    pub text: String,

    /// Free-form metadata carried through retrieval
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

/// Document store backed by a snapshot loaded fully into memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocumentStore {
    documents: HashMap<String, Document>,
}

impl InMemoryDocumentStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Hydrate the store from a `documents.json` snapshot
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| QaError::SnapshotLoad {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
        let documents: Vec<Document> =
            serde_json::from_str(&contents).map_err(|e| QaError::SnapshotLoad {
                path: path.to_path_buf(),
                source: e.into(),
            })?;

        Ok(Self {
            documents: documents.into_iter().map(|d| (d.id.clone(), d)).collect(),
        })
    }

    /// Look up one document by id
    pub fn get(&self, id: &str) -> Option<&Document> {
        self.documents.get(id)
    }

    /// Resolve a batch of ids, skipping ids the snapshot does not contain
    pub fn get_many(&self, ids: &[String]) -> Vec<Document> {
        ids.iter().filter_map(|id| self.get(id).cloned()).collect()
    }

    /// Number of stored documents
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the store holds no documents
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
