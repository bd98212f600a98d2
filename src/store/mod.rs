//! Persisted collection stores
//!
//! A collection directory holds two JSON snapshots produced by the indexing
//! tooling: `vectors.json` (id + embedding records) and `documents.json`
//! (id + passage text + metadata). This crate only hydrates them; it never
//! writes them.

pub mod document;
pub mod vector;

pub use document::{Document, InMemoryDocumentStore};
pub use vector::{InMemoryVectorStore, VectorRecord};

/// File name of the vector snapshot inside a collection directory
pub const VECTORS_FILE: &str = "vectors.json";

/// File name of the document snapshot inside a collection directory
pub const DOCUMENTS_FILE: &str = "documents.json";
