//! Context formatter for retrieved passages
//!
//! Normalizes a ranked document list into the single text block that is
//! substituted into the prompt template and handed to the agent tool as
//! flattened output.

use crate::retrieval::RetrievedDocument;

/// Formats retrieved passages into one context block.
///
/// Each passage is rendered on one logical line (embedded line breaks become
/// single spaces) and passages are joined with a blank line, preserving the
/// relevance order of the input.
#[derive(Debug, Clone, Default)]
pub struct ContextFormatter;

impl ContextFormatter {
    /// Create a new formatter
    pub fn new() -> Self {
        Self
    }

    /// Flatten one passage onto a single logical line
    pub fn normalize_passage(&self, text: &str) -> String {
        text.replace('\n', " ")
    }

    /// Build the context block from ranked documents.
    ///
    /// An empty document list yields an empty string; the pipeline still
    /// sends a prompt in that case, just without context.
    pub fn format(&self, documents: &[RetrievedDocument]) -> String {
        documents
            .iter()
            .map(|doc| self.normalize_passage(&doc.text))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    fn doc(text: &str) -> RetrievedDocument {
        RetrievedDocument {
            id: "d".to_string(),
            text: text.to_string(),
            score: 1.0,
            metadata: serde_json::Map::new(),
        }
    }

    #[test]
    fn test_empty_input_yields_empty_string() {
        let formatter = ContextFormatter::new();
        assert_eq!(formatter.format(&[]), "");
    }

    #[test]
    fn test_passages_render_on_single_lines() {
        let formatter = ContextFormatter::new();
        let docs = vec![
            doc("Paris is the capital\nof France."),
            doc("France is in Europe."),
        ];
        assert_eq!(
            formatter.format(&docs),
            "Paris is the capital of France.\n\nFrance is in Europe."
        );
    }

    #[test]
    fn test_relevance_order_is_preserved() {
        let formatter = ContextFormatter::new();
        let docs = vec![doc("first"), doc("second"), doc("third")];
        let rendered = formatter.format(&docs);
        let first = rendered.find("first").unwrap();
        let second = rendered.find("second").unwrap();
        let third = rendered.find("third").unwrap();
        assert!(first < second && second < third);
    }

    #[quickcheck]
    fn prop_no_line_breaks_within_a_passage(texts: Vec<String>) -> bool {
        let formatter = ContextFormatter::new();
        let docs: Vec<RetrievedDocument> = texts.iter().map(|t| doc(t)).collect();
        // The blank-line separator is the only place a newline may appear.
        formatter
            .format(&docs)
            .split("\n\n")
            .all(|passage| !passage.contains('\n'))
    }
}
