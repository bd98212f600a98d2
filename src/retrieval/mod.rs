//! Retrieval pipeline
//!
//! Semantic retrieval over a persisted collection: embed the query, search
//! the vector index, resolve passages through the document store.

pub mod engine;

pub use engine::{RetrievalEngine, RetrievedDocument, Retriever};
