//! Summarization of loaded documents with a hosted LLM.

pub mod error;
pub mod groq;
pub mod model;
pub mod prompt;

pub use error::{SummarizeError, SummarizeResult};
pub use groq::GroqProvider;
pub use model::{ModelProvider, SummaryModel};
pub use prompt::PromptTemplate;

use std::sync::Arc;

use tracing::{debug, info};

use crate::loader::Document;

/// Sends documents through the prompt template to a model built per call.
#[derive(Clone)]
pub struct Summarizer {
    prompt: PromptTemplate,
    provider: Arc<dyn ModelProvider>,
}

impl Summarizer {
    /// Create a summarizer.
    #[must_use]
    pub fn new(prompt: PromptTemplate, provider: Arc<dyn ModelProvider>) -> Self {
        Self { prompt, provider }
    }

    /// Name of the model summaries are requested from.
    #[must_use]
    pub fn model_name(&self) -> &str {
        self.provider.model_name()
    }

    /// Summarize `documents` with a model authenticated by `api_key`.
    ///
    /// # Errors
    /// Returns an error if the key is blank, the model cannot be built, the
    /// call fails, or the answer is empty.
    pub async fn summarize(&self, api_key: &str, documents: &[Document]) -> SummarizeResult<String> {
        if api_key.trim().is_empty() {
            return Err(SummarizeError::MissingApiKey);
        }

        let model = self.provider.model_for(api_key)?;
        let prompt = self.prompt.render_documents(documents);
        debug!(
            "Summarizing {} document(s) with {}",
            documents.len(),
            model.name()
        );

        let output = model.complete(&prompt).await?;
        let summary = output.trim();
        if summary.is_empty() {
            return Err(SummarizeError::EmptyResponse);
        }

        info!(
            "Summary ready: {} words from {}",
            summary.split_whitespace().count(),
            model.name()
        );
        Ok(summary.to_string())
    }
}
