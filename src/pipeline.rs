//! The submit flow: validate, record, normalize, load, summarize, attach.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::input::{InputError, normalize_url, validate_url};
use crate::loader::{ContentLoader, LoadError, SourceKind};
use crate::session::Session;
use crate::summarize::{SummarizeError, Summarizer};

/// Message shown when nothing usable was loaded.
pub const NO_CONTENT_MESSAGE: &str = "Unable to retrieve content from the provided URL.";

/// Characters of loaded text echoed to debug logs.
const PREVIEW_CHARS: usize = 120;

/// Errors surfaced to the user by [`Pipeline::run`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Bad URL or missing credential.
    #[error(transparent)]
    Input(#[from] InputError),
    /// The loader returned nothing, or only blank text.
    #[error("Unable to retrieve content from the provided URL.")]
    NoContent,
    /// Loading failed.
    #[error(transparent)]
    Load(#[from] LoadError),
    /// Summarization failed.
    #[error(transparent)]
    Summarize(#[from] SummarizeError),
}

impl PipelineError {
    /// Text to display.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Input(err) => err.to_string(),
            Self::NoContent => NO_CONTENT_MESSAGE.to_string(),
            Self::Load(err) => format!("Exception: {err}"),
            Self::Summarize(SummarizeError::MissingApiKey) => {
                InputError::MissingApiKey.to_string()
            }
            Self::Summarize(err) => format!("Exception: {err}"),
        }
    }

    /// True for errors detected before any network call.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Input(_) | Self::Summarize(SummarizeError::MissingApiKey)
        )
    }
}

/// Outcome of one successful submission.
#[derive(Clone, Debug, Serialize)]
pub struct SummaryReport {
    /// History entry the summary was attached to.
    pub entry_id: Uuid,
    /// URL as submitted.
    pub url: String,
    /// URL actually loaded.
    pub normalized_url: String,
    /// Source classification.
    pub kind: SourceKind,
    /// Number of documents loaded.
    pub document_count: usize,
    /// Title of the first document, if known.
    pub title: Option<String>,
    /// Summary text.
    pub summary: String,
    /// Progress notes, in order.
    pub notes: Vec<String>,
}

/// Wires the loader and summarizer to a session.
#[derive(Clone)]
pub struct Pipeline {
    loader: Arc<dyn ContentLoader>,
    summarizer: Summarizer,
}

impl Pipeline {
    /// Create a pipeline.
    #[must_use]
    pub fn new(loader: Arc<dyn ContentLoader>, summarizer: Summarizer) -> Self {
        Self { loader, summarizer }
    }

    /// Drop documents cached by the loader.
    pub fn clear_cache(&self) {
        self.loader.clear_cache();
    }

    /// The summarizer in use.
    #[must_use]
    pub const fn summarizer(&self) -> &Summarizer {
        &self.summarizer
    }

    /// Run one submission against `session`.
    ///
    /// Validation failures return before any network call and leave the
    /// history untouched. Later failures keep the entry with an empty summary.
    ///
    /// # Errors
    /// Returns a [`PipelineError`] describing the first failing step.
    pub async fn run(
        &self,
        session: &RwLock<Session>,
        raw_url: &str,
    ) -> Result<SummaryReport, PipelineError> {
        let url = validate_url(raw_url)?;

        let (entry_id, api_key) = {
            let mut session = session.write().await;
            let api_key = session
                .api_key()
                .map(String::from)
                .ok_or(InputError::MissingApiKey)?;
            (session.record_submission(url.as_str()), api_key)
        };

        let mut notes = vec![format!("Processing URL: {url}")];
        info!("Processing URL: {url}");

        let normalized_url = normalize_url(&url);
        let kind = SourceKind::classify(&normalized_url);
        notes.push(kind.detection_note().to_string());
        info!("{}", kind.detection_note());

        let documents = self.loader.load(&normalized_url, kind).await?;
        if documents.first().is_none_or(|doc| doc.is_blank()) {
            warn!("No content retrieved from {normalized_url}");
            return Err(PipelineError::NoContent);
        }
        notes.push(format!("Retrieved {} documents.", documents.len()));
        if let Some(first) = documents.first() {
            debug!("First document: {}", first.preview(PREVIEW_CHARS));
        }

        let summary = self.summarizer.summarize(&api_key, &documents).await?;

        if !session.write().await.attach_summary(entry_id, summary.as_str()) {
            warn!("History entry {entry_id} was cleared before its summary arrived");
        }

        Ok(SummaryReport {
            entry_id,
            url,
            normalized_url,
            kind,
            document_count: documents.len(),
            title: documents.first().and_then(|doc| doc.metadata.title.clone()),
            summary,
            notes,
        })
    }
}
