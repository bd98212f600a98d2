//! Question-answering orchestration
//!
//! Two variants of one capability: the fixed retrieve/assemble/generate
//! pipeline and the agent-delegated loop. Both answer a question with a
//! complete string or fail the invocation outright.

use async_trait::async_trait;

use crate::errors::Result;

pub mod agent;
pub mod derived;
pub mod pipeline;

pub use agent::{AgentOutput, AgentQaPipeline, ReasoningAgent};
pub use derived::DerivedCell;
pub use pipeline::QuestionAnsweringPipeline;

/// Common contract of both pipeline variants
#[async_trait]
pub trait QuestionAnswerer: Send + Sync {
    /// Answer one question; a complete answer or a fatal error, never a
    /// partial result
    async fn answer(&self, question: &str) -> Result<String>;
}
