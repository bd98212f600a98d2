//! Tool adaptation of the retrieval pipeline
//!
//! Wraps a `Retriever` as a named, described callable a reasoning agent can
//! invoke. The description carries the document identity so the agent can
//! judge whether the tool is relevant to a sub-query.

use std::fmt;
use std::sync::Arc;

use crate::errors::Result;
use crate::retrieval::{RetrievedDocument, Retriever};

/// Default name of the document search tool
pub const SEARCH_TOOL_NAME: &str = "search_doc";

/// Postprocessor applied to raw retrieval output before it reaches the agent
pub type Postprocessor = Arc<dyn Fn(&[RetrievedDocument]) -> String + Send + Sync>;

/// A retrieval capability exposed to a reasoning agent.
///
/// Equality is name + underlying component identity, which makes repeated
/// registration of the same adapter a no-op at the plugin-set level.
#[derive(Clone)]
pub struct SearchTool {
    name: String,
    description: String,
    component: Arc<dyn Retriever>,
    top_k: usize,
    postprocessor: Option<Postprocessor>,
}

impl SearchTool {
    /// Wrap a retriever as a callable tool
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        component: Arc<dyn Retriever>,
        top_k: usize,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            component,
            top_k,
            postprocessor: None,
        }
    }

    /// Attach a postprocessor flattening raw results for the agent
    pub fn with_postprocessor(mut self, postprocessor: Postprocessor) -> Self {
        self.postprocessor = Some(postprocessor);
        self
    }

    /// Tool name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Human-readable description, mentioning the searched documents
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Top-k the bound retrieval call uses
    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Invoke the bound retrieval and postprocess its output.
    ///
    /// Without a postprocessor the raw passage texts are joined
    /// line-by-line.
    pub async fn call(&self, query: &str) -> Result<String> {
        let documents = self.component.retrieve(query, self.top_k).await?;
        let output = match &self.postprocessor {
            Some(postprocess) => postprocess(&documents),
            None => documents
                .iter()
                .map(|doc| doc.text.as_str())
                .collect::<Vec<_>>()
                .join("\n"),
        };
        Ok(output)
    }
}

impl PartialEq for SearchTool {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && Arc::ptr_eq(&self.component, &other.component)
    }
}

impl fmt::Debug for SearchTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchTool")
            .field("name", &self.name)
            .field("top_k", &self.top_k)
            .field("has_postprocessor", &self.postprocessor.is_some())
            .finish()
    }
}
