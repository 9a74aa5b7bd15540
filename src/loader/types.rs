//! Core types for loaded content.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Marker that routes a URL to the video loader.
const VIDEO_HOST_MARKER: &str = "youtube.com";

/// Kind of source a URL points to.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// A YouTube video.
    Video,
    /// Any other web page.
    Website,
}

impl SourceKind {
    /// Classify a normalized URL by substring match.
    #[must_use]
    pub fn classify(url: &str) -> Self {
        if url.contains(VIDEO_HOST_MARKER) {
            Self::Video
        } else {
            Self::Website
        }
    }

    /// Short label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Website => "website",
        }
    }

    /// Progress note shown when loading starts.
    #[must_use]
    pub const fn detection_note(self) -> &'static str {
        match self {
            Self::Video => "Detected YouTube URL. Attempting to load video...",
            Self::Website => "Detected website URL. Attempting to load...",
        }
    }
}

/// A unit of loaded text.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Document {
    /// Extracted text.
    pub page_content: String,
    /// Where the text came from.
    pub metadata: DocumentMetadata,
}

impl Document {
    /// Create a document with default metadata for `source`.
    #[must_use]
    pub fn new(page_content: impl Into<String>, source: impl Into<String>, kind: SourceKind) -> Self {
        let page_content = page_content.into();
        let mut metadata = DocumentMetadata::new(source, kind);
        metadata.word_count = page_content.split_whitespace().count();
        Self {
            page_content,
            metadata,
        }
    }

    /// True when the content is empty or whitespace only.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.page_content.trim().is_empty()
    }

    /// First `max_chars` characters of the content.
    #[must_use]
    pub fn preview(&self, max_chars: usize) -> String {
        if self.page_content.chars().count() <= max_chars {
            self.page_content.clone()
        } else {
            let mut preview = self.page_content.chars().take(max_chars).collect::<String>();
            preview.push_str("...");
            preview
        }
    }
}

/// Metadata attached to a [`Document`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// URL the content was loaded from.
    pub source: String,
    /// Source kind.
    pub kind: SourceKind,
    /// Page or video title.
    pub title: Option<String>,
    /// Meta description or video description.
    pub description: Option<String>,
    /// Author or channel name.
    pub author: Option<String>,
    /// Content language.
    pub language: Option<String>,
    /// Publication date.
    pub published_at: Option<DateTime<Utc>>,
    /// Video view count.
    pub view_count: Option<u64>,
    /// Video length in seconds.
    pub length_seconds: Option<u32>,
    /// Thumbnail URL.
    pub thumbnail_url: Option<String>,
    /// Word count of the content.
    pub word_count: usize,
    /// When the content was loaded.
    pub loaded_at: DateTime<Utc>,
}

impl DocumentMetadata {
    /// Empty metadata for `source`.
    #[must_use]
    pub fn new(source: impl Into<String>, kind: SourceKind) -> Self {
        Self {
            source: source.into(),
            kind,
            title: None,
            description: None,
            author: None,
            language: None,
            published_at: None,
            view_count: None,
            length_seconds: None,
            thumbnail_url: None,
            word_count: 0,
            loaded_at: Utc::now(),
        }
    }
}
