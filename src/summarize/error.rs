//! Error types for summarization.

use thiserror::Error;

/// Errors raised while producing a summary.
#[derive(Debug, Error)]
pub enum SummarizeError {
    /// No API credential was supplied.
    #[error("missing API key")]
    MissingApiKey,
    /// The prompt template is unusable.
    #[error("invalid prompt template: {0}")]
    Template(String),
    /// HTTP client error from Rig.
    #[error("http client error: {0}")]
    HttpClient(#[from] rig::http_client::Error),
    /// Completion error.
    #[error("completion error: {0}")]
    Completion(#[from] rig::completion::CompletionError),
    /// The model answered with no text.
    #[error("the model returned an empty summary")]
    EmptyResponse,
}

/// Convenience result alias for summarization.
pub type SummarizeResult<T> = Result<T, SummarizeError>;
