//! Error types for the loader module.

use thiserror::Error;

/// Errors that can occur while loading content from a URL.
#[derive(Debug, Error)]
pub enum LoadError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// HTTP client configuration error.
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    /// Remote answered with a non-success status.
    #[error("{url} returned HTTP status {status}")]
    HttpStatus {
        /// Requested URL.
        url: String,
        /// Status code received.
        status: u16,
    },

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON parsing error.
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Regex error.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// Content type not supported.
    #[error("Unsupported content type: {0}")]
    UnsupportedContentType(String),

    /// Body larger than the configured limit.
    #[error("Content too large: {0} bytes")]
    ContentTooLarge(u64),

    /// No video id could be found in the URL.
    #[error("Could not determine a video id from {0}")]
    VideoIdNotFound(String),

    /// The watch page did not embed a player response.
    #[error("No player response found for video {0}")]
    PlayerResponseMissing(String),

    /// The video cannot be played (private, removed, age-gated, ...).
    #[error("Video {video_id} is unavailable: {reason}")]
    VideoUnavailable {
        /// Video id.
        video_id: String,
        /// Reason reported by YouTube.
        reason: String,
    },

    /// Captions are turned off for this video.
    #[error("Transcripts are disabled for video {0}")]
    TranscriptsDisabled(String),

    /// No caption track in any requested language.
    #[error(
        "No transcript found for video {video_id} in {requested:?} (available: {available:?})"
    )]
    NoTranscript {
        /// Video id.
        video_id: String,
        /// Languages that were asked for.
        requested: Vec<String>,
        /// Languages the video offers.
        available: Vec<String>,
    },
}

impl LoadError {
    /// Whether the error came from the remote side rather than from the URL.
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::HttpRequest(_)
                | Self::HttpStatus { .. }
                | Self::PlayerResponseMissing(_)
                | Self::VideoUnavailable { .. }
        )
    }
}
