//! Prompt templating for the "stuff" summarization strategy: every document
//! is concatenated into a single `{text}` slot.

use crate::loader::Document;
use crate::summarize::error::{SummarizeError, SummarizeResult};

/// Placeholder replaced with the document text.
pub const TEXT_PLACEHOLDER: &str = "{text}";

/// Default summary length in words.
pub const DEFAULT_SUMMARY_WORDS: usize = 300;

/// Separator between stuffed documents.
const DOCUMENT_SEPARATOR: &str = "\n\n";

/// A prompt with a single `{text}` slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    /// Create a template.
    ///
    /// # Errors
    /// Returns an error if the template has no `{text}` placeholder.
    pub fn new(template: impl Into<String>) -> SummarizeResult<Self> {
        let template = template.into();
        if !template.contains(TEXT_PLACEHOLDER) {
            return Err(SummarizeError::Template(format!(
                "template must contain {TEXT_PLACEHOLDER}"
            )));
        }
        Ok(Self { template })
    }

    /// The summary prompt asking for `words` words.
    #[must_use]
    pub fn summary(words: usize) -> Self {
        Self {
            template: format!(
                "\nProvide a summary of the following content in {words} words:\nContent: {TEXT_PLACEHOLDER}\n"
            ),
        }
    }

    /// Fill the placeholder with `text`.
    #[must_use]
    pub fn render(&self, text: &str) -> String {
        self.template.replace(TEXT_PLACEHOLDER, text)
    }

    /// Fill the placeholder with all documents, separated by blank lines.
    #[must_use]
    pub fn render_documents(&self, documents: &[Document]) -> String {
        self.render(&stuff_documents(documents))
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::summary(DEFAULT_SUMMARY_WORDS)
    }
}

/// Concatenate document contents for a single prompt.
#[must_use]
pub fn stuff_documents(documents: &[Document]) -> String {
    documents
        .iter()
        .map(|doc| doc.page_content.as_str())
        .collect::<Vec<_>>()
        .join(DOCUMENT_SEPARATOR)
}
