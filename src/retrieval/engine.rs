//! Retrieval engine backed by a hydrated collection

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

use crate::errors::{QaError, Result};
use crate::models::EmbeddingModel;
use crate::store::{InMemoryDocumentStore, InMemoryVectorStore, DOCUMENTS_FILE, VECTORS_FILE};

/// A passage returned by retrieval, relevance-descending within its batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedDocument {
    /// Stable passage identifier
    pub id: String,

    /// Passage text
    pub text: String,

    /// Cosine similarity against the query
    pub score: f32,

    /// Metadata carried over from the document snapshot
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

/// Capability interface consumed by the QA orchestration and the agent tool.
///
/// Constraints: `top_k >= 1`; at most `top_k` results; an empty result is
/// valid when the index has nothing relevant.
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Retrieve the passages most relevant to `query`
    async fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<RetrievedDocument>>;
}

/// Retrieval engine over an in-memory vector index and document store
pub struct RetrievalEngine {
    vector_store: InMemoryVectorStore,
    doc_store: InMemoryDocumentStore,
    embedding: Arc<dyn EmbeddingModel>,
}

impl RetrievalEngine {
    /// Assemble an engine from already-hydrated stores
    pub fn new(
        vector_store: InMemoryVectorStore,
        doc_store: InMemoryDocumentStore,
        embedding: Arc<dyn EmbeddingModel>,
    ) -> Self {
        Self {
            vector_store,
            doc_store,
            embedding,
        }
    }

    /// Hydrate an engine from a persisted collection directory.
    ///
    /// A directory that does not exist means no index was ever built for
    /// this file set: fatal, not retried.
    pub fn load(collection_dir: &Path, embedding: Arc<dyn EmbeddingModel>) -> Result<Self> {
        if !collection_dir.is_dir() {
            let collection = collection_dir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            return Err(QaError::MissingCollection {
                collection,
                path: collection_dir
                    .parent()
                    .unwrap_or(collection_dir)
                    .to_path_buf(),
            });
        }

        let vector_store = InMemoryVectorStore::load(&collection_dir.join(VECTORS_FILE))?;
        let doc_store = InMemoryDocumentStore::load(&collection_dir.join(DOCUMENTS_FILE))?;

        Ok(Self::new(vector_store, doc_store, embedding))
    }

    /// Number of indexed passages
    pub fn len(&self) -> usize {
        self.vector_store.len()
    }

    /// Whether the collection is empty
    pub fn is_empty(&self) -> bool {
        self.vector_store.is_empty()
    }
}

#[async_trait]
impl Retriever for RetrievalEngine {
    async fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<RetrievedDocument>> {
        let query_embedding = self.embedding.embed(query).await?;
        let hits = self.vector_store.query(&query_embedding, top_k);

        let mut documents = Vec::with_capacity(hits.len());
        for (id, score) in hits {
            let doc = self.doc_store.get(&id).ok_or_else(|| {
                QaError::Retrieval(format!(
                    "collection snapshots disagree: vector id '{id}' has no document"
                ))
            })?;
            documents.push(RetrievedDocument {
                id,
                text: doc.text.clone(),
                score,
                metadata: doc.metadata.clone(),
            });
        }

        Ok(documents)
    }
}
