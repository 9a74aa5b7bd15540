//! Seams between the summarizer and a hosted model.

use async_trait::async_trait;

use crate::summarize::error::SummarizeResult;

/// A chat/completion model that answers one prompt with text.
#[async_trait]
pub trait SummaryModel: Send + Sync {
    /// Model name, for logs and responses.
    fn name(&self) -> &str;

    /// Send `prompt` and return the text of the answer.
    async fn complete(&self, prompt: &str) -> SummarizeResult<String>;
}

/// Builds a model bound to a user-supplied credential.
pub trait ModelProvider: Send + Sync {
    /// Model name the provider will build.
    fn model_name(&self) -> &str;

    /// Build a model that authenticates with `api_key`.
    ///
    /// # Errors
    /// Returns an error if the client cannot be created.
    fn model_for(&self, api_key: &str) -> SummarizeResult<Box<dyn SummaryModel>>;
}
