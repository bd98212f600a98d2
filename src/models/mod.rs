//! Model clients
//!
//! Chat completion and embedding providers behind trait seams. The concrete
//! implementations speak the Ollama HTTP API; tests substitute stubs.

pub mod chat;
pub mod embedding;

pub use chat::{ChatModel, OllamaChatModel};
pub use embedding::{EmbeddingModel, OllamaEmbeddings};
