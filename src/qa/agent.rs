//! Agent-augmented question answering
//!
//! The fixed pipeline is replaced by a delegated reasoning loop: the agent
//! decides whether, how many times, and with what sub-queries to invoke the
//! registered retrieval tool before synthesizing a final answer. The loop
//! internals are a collaborator concern; this layer owns only the boundary
//! contract and the one-time tool registration.

use async_trait::async_trait;
use std::sync::Arc;

use crate::context::ContextFormatter;
use crate::errors::{QaError, Result};
use crate::qa::{QuestionAnswerer, QuestionAnsweringPipeline};
use crate::retrieval::Retriever;
use crate::tools::{SearchTool, SEARCH_TOOL_NAME};

/// Final product of a delegated agent run
#[derive(Debug, Clone)]
pub struct AgentOutput {
    /// The agent's final answer text
    pub output: String,
}

impl AgentOutput {
    /// Wrap a final answer
    pub fn new(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
        }
    }
}

/// Boundary contract for a reasoning agent.
///
/// The agent consumes a question and its registered plugin set and returns a
/// final output. Iteration budgets, tool dispatch and failure recovery are
/// the implementation's own business; errors that escape it are surfaced to
/// the caller unchanged.
#[async_trait]
pub trait ReasoningAgent: Send + Sync {
    /// Tools currently registered with the agent
    fn plugins(&self) -> &[SearchTool];

    /// Register one tool. Callers are responsible for deduplication.
    fn add_plugin(&mut self, tool: SearchTool);

    /// Run the reasoning loop to completion for one question
    async fn run(&self, question: &str) -> anyhow::Result<AgentOutput>;
}

/// QA pipeline that delegates control to a reasoning agent.
///
/// Holds, rather than inherits, the retrieval capability and formatter of
/// the fixed pipeline; the agent reaches them only through the registered
/// tool.
pub struct AgentQaPipeline {
    agent: Box<dyn ReasoningAgent>,
    retriever: Arc<dyn Retriever>,
    formatter: ContextFormatter,
    file_names: Vec<String>,
    top_k: usize,
}

impl AgentQaPipeline {
    /// Compose an agent pipeline from its parts
    pub fn new(
        agent: Box<dyn ReasoningAgent>,
        retriever: Arc<dyn Retriever>,
        file_names: Vec<String>,
        top_k: usize,
    ) -> Self {
        Self {
            agent,
            retriever,
            formatter: ContextFormatter::new(),
            file_names,
            top_k,
        }
    }

    /// Compose an agent pipeline sharing a fixed pipeline's retrieval stack
    pub fn from_pipeline(
        pipeline: &QuestionAnsweringPipeline,
        agent: Box<dyn ReasoningAgent>,
    ) -> Result<Self> {
        Ok(Self::new(
            agent,
            pipeline.retriever()?,
            pipeline.config().file_names.clone(),
            pipeline.config().retrieval_top_k,
        ))
    }

    /// Register the document search tool with the agent.
    ///
    /// One-time setup, idempotent: registering an already-present tool
    /// (same name, same underlying retrieval component) is a no-op, so
    /// repeated setup calls cannot duplicate plugin entries.
    pub fn add_search_tool(&mut self) {
        let formatter = self.formatter.clone();
        let description = format!(
            "A vector store that searches for similar and related content \
             in a document: {}. The result is a huge chunk of text related \
             to your search but can also contain irrelevant info.",
            self.file_names.join(" ")
        );

        let tool = SearchTool::new(
            SEARCH_TOOL_NAME,
            description,
            self.retriever.clone(),
            self.top_k,
        )
        .with_postprocessor(Arc::new(move |docs| formatter.format(docs)));

        if !self.agent.plugins().contains(&tool) {
            self.agent.add_plugin(tool);
        }
    }

    /// Registered plugin set
    pub fn plugins(&self) -> &[SearchTool] {
        self.agent.plugins()
    }

    /// Answer one question by delegating to the agent.
    ///
    /// The agent's final output string is returned unchanged; any failure
    /// inside the loop is fatal for this invocation and propagated as-is.
    pub async fn run(&self, question: &str) -> Result<String> {
        let result = self.agent.run(question).await.map_err(QaError::Agent)?;
        Ok(result.output)
    }
}

#[async_trait]
impl QuestionAnswerer for AgentQaPipeline {
    async fn answer(&self, question: &str) -> Result<String> {
        self.run(question).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retrieval::RetrievedDocument;

    struct StubRetriever;

    #[async_trait]
    impl Retriever for StubRetriever {
        async fn retrieve(&self, _query: &str, top_k: usize) -> Result<Vec<RetrievedDocument>> {
            Ok(vec![RetrievedDocument {
                id: "p0".to_string(),
                text: "A passage\nwith a break.".to_string(),
                score: 0.9,
                metadata: serde_json::Map::new(),
            }]
            .into_iter()
            .take(top_k)
            .collect())
        }
    }

    /// Agent that answers by calling its first tool once
    struct SingleLookupAgent {
        plugins: Vec<SearchTool>,
        fail: bool,
    }

    impl SingleLookupAgent {
        fn new() -> Self {
            Self {
                plugins: Vec::new(),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                plugins: Vec::new(),
                fail: true,
            }
        }
    }

    #[async_trait]
    impl ReasoningAgent for SingleLookupAgent {
        fn plugins(&self) -> &[SearchTool] {
            &self.plugins
        }

        fn add_plugin(&mut self, tool: SearchTool) {
            self.plugins.push(tool);
        }

        async fn run(&self, question: &str) -> anyhow::Result<AgentOutput> {
            if self.fail {
                anyhow::bail!("iteration budget exhausted");
            }
            let evidence = match self.plugins.first() {
                Some(tool) => tool.call(question).await?,
                None => String::new(),
            };
            Ok(AgentOutput::new(format!("final: {evidence}")))
        }
    }

    fn pipeline(agent: SingleLookupAgent) -> AgentQaPipeline {
        AgentQaPipeline::new(
            Box::new(agent),
            Arc::new(StubRetriever),
            vec!["doc1.pdf".to_string()],
            3,
        )
    }

    #[test]
    fn test_tool_registration_is_idempotent() {
        let mut qa = pipeline(SingleLookupAgent::new());

        qa.add_search_tool();
        qa.add_search_tool();

        let matching: Vec<_> = qa
            .plugins()
            .iter()
            .filter(|tool| tool.name() == SEARCH_TOOL_NAME)
            .collect();
        assert_eq!(matching.len(), 1);
    }

    #[test]
    fn test_tool_description_names_the_documents() {
        let mut qa = pipeline(SingleLookupAgent::new());
        qa.add_search_tool();
        assert!(qa.plugins()[0].description().contains("doc1.pdf"));
    }

    #[tokio::test]
    async fn test_run_returns_agent_output_unchanged() {
        let mut qa = pipeline(SingleLookupAgent::new());
        qa.add_search_tool();

        let answer = qa.run("what does the doc say?").await.unwrap();

        // The tool postprocessor flattened the passage onto one line.
        assert_eq!(answer, "final: A passage with a break.");
    }

    #[tokio::test]
    async fn test_agent_failure_propagates_as_fatal() {
        let qa = pipeline(SingleLookupAgent::failing());
        let result = qa.run("q?").await;
        assert!(matches!(result, Err(QaError::Agent(_))));
    }
}
