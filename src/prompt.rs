//! Prompt assembly
//!
//! Thin wrapper over minijinja with strict undefined behavior: a template
//! that references a variable the pipeline did not supply fails the run
//! instead of rendering an empty hole.

use minijinja::{context, Environment, UndefinedBehavior};

use crate::config::DEFAULT_PROMPT_TEMPLATE;
use crate::errors::Result;

/// A question-answering prompt template.
///
/// The pipeline substitutes exactly two variables, `question` and `context`.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    source: String,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            source: DEFAULT_PROMPT_TEMPLATE.to_string(),
        }
    }
}

impl PromptTemplate {
    /// Create a template from source, rejecting malformed syntax up front
    pub fn new(source: impl Into<String>) -> Result<Self> {
        let source = source.into();
        let env = Self::environment();
        env.template_from_str(&source)?;
        Ok(Self { source })
    }

    /// Template source text
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Substitute `question` and `context` into the template.
    ///
    /// Pure string work, no I/O. An unresolved placeholder is a
    /// configuration defect and surfaces as `QaError::Template`.
    pub fn populate(&self, question: &str, context: &str) -> Result<String> {
        let env = Self::environment();
        let rendered = env.render_str(
            &self.source,
            context! { question => question, context => context },
        )?;
        Ok(rendered)
    }

    fn environment<'env>() -> Environment<'env> {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::QaError;

    #[test]
    fn test_default_template_populates() {
        let template = PromptTemplate::default();
        let prompt = template
            .populate("What is the capital of France?", "Paris is the capital.")
            .unwrap();
        assert!(prompt.contains("What is the capital of France?"));
        assert!(prompt.contains("Paris is the capital."));
        assert!(prompt.ends_with("Answer: "));
    }

    #[test]
    fn test_empty_context_still_renders() {
        let template = PromptTemplate::default();
        let prompt = template.populate("Anything?", "").unwrap();
        assert!(prompt.contains("Anything?"));
    }

    #[test]
    fn test_unresolved_placeholder_is_an_error() {
        let template = PromptTemplate::new("Q: {{question}} Sources: {{sources}}").unwrap();
        let result = template.populate("q", "c");
        assert!(matches!(result, Err(QaError::Template(_))));
    }

    #[test]
    fn test_malformed_syntax_rejected_at_construction() {
        assert!(PromptTemplate::new("{{question").is_err());
    }
}
