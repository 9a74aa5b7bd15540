//! Error types for user input handling.

use thiserror::Error;

/// Errors raised while checking what the user typed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// The URL field was empty or whitespace only.
    #[error("Please provide the URL to get started")]
    EmptyUrl,

    /// The URL could not be accepted.
    #[error("Please enter a valid URL. It can be a YT video URL or website URL")]
    InvalidUrl(String),

    /// No API credential has been entered.
    #[error("Please provide the Groq API key to proceed.")]
    MissingApiKey,
}

impl InputError {
    /// Internal reason behind the error, for logs.
    #[must_use]
    pub fn reason(&self) -> &str {
        match self {
            Self::EmptyUrl => "empty url",
            Self::InvalidUrl(reason) => reason,
            Self::MissingApiKey => "missing api key",
        }
    }
}
