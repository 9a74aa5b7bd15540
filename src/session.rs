//! Per-process session: the API credential and the URL history.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::input::{InputError, validate_api_key};

/// A submitted URL and, once ready, its summary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Entry id.
    pub id: Uuid,
    /// URL as submitted.
    pub url: String,
    /// Summary text, empty until attached.
    pub summary: String,
    /// Submission time.
    pub submitted_at: DateTime<Utc>,
}

impl HistoryEntry {
    fn new(url: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            url: url.into(),
            summary: String::new(),
            submitted_at: Utc::now(),
        }
    }

    /// Whether a summary has been attached.
    #[must_use]
    pub fn is_summarized(&self) -> bool {
        !self.summary.is_empty()
    }
}

/// Credential plus history, in submission order.
#[derive(Clone, Default)]
pub struct Session {
    api_key: Option<String>,
    history: Vec<HistoryEntry>,
}

impl Session {
    /// Empty session without a credential.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Session preloaded with a credential; blank keys are ignored.
    #[must_use]
    pub fn with_api_key(api_key: Option<&str>) -> Self {
        Self {
            api_key: api_key.and_then(|key| validate_api_key(key).ok()),
            history: Vec::new(),
        }
    }

    /// Store the credential.
    ///
    /// # Errors
    /// Returns [`InputError::MissingApiKey`] if the key is blank; the
    /// previous key is kept in that case.
    pub fn set_api_key(&mut self, api_key: &str) -> Result<(), InputError> {
        self.api_key = Some(validate_api_key(api_key)?);
        Ok(())
    }

    /// The stored credential.
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// Whether a credential is stored.
    #[must_use]
    pub const fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Append a new entry for `url` and return its id.
    pub fn record_submission(&mut self, url: impl Into<String>) -> Uuid {
        let entry = HistoryEntry::new(url);
        let id = entry.id;
        self.history.push(entry);
        id
    }

    /// Attach a summary to entry `id`.
    ///
    /// Returns `false` if the entry is gone (history cleared meanwhile) or
    /// already has a summary.
    pub fn attach_summary(&mut self, id: Uuid, summary: impl Into<String>) -> bool {
        match self.history.iter_mut().find(|entry| entry.id == id) {
            Some(entry) if !entry.is_summarized() => {
                entry.summary = summary.into();
                true
            }
            _ => false,
        }
    }

    /// Entries, oldest first.
    #[must_use]
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Drop every history entry; the credential stays.
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Drop the credential and the history.
    pub fn reset(&mut self) {
        self.api_key = None;
        self.history.clear();
    }

    /// Serializable snapshot without the credential.
    #[must_use]
    pub fn view(&self) -> SessionView {
        SessionView {
            has_api_key: self.has_api_key(),
            history: self.history.clone(),
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("history", &self.history)
            .finish()
    }
}

/// What the UI is allowed to see of a session.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionView {
    /// Whether a credential is stored.
    pub has_api_key: bool,
    /// Entries, oldest first.
    pub history: Vec<HistoryEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_append_in_order() {
        let mut session = Session::new();
        let first = session.record_submission("https://a.com");
        let second = session.record_submission("https://b.com");

        let urls: Vec<&str> = session.history().iter().map(|e| e.url.as_str()).collect();
        assert_eq!(urls, vec!["https://a.com", "https://b.com"]);
        assert_eq!(session.history()[0].id, first);
        assert_eq!(session.history()[1].id, second);
        assert!(session.history().iter().all(|e| !e.is_summarized()));
    }

    #[test]
    fn test_attach_summary_once() {
        let mut session = Session::new();
        let id = session.record_submission("https://a.com");

        assert!(session.attach_summary(id, "first"));
        assert!(!session.attach_summary(id, "second"));
        assert_eq!(session.history()[0].summary, "first");
        assert!(!session.attach_summary(Uuid::new_v4(), "nobody"));
    }

    #[test]
    fn test_clear_history_keeps_key() {
        let mut session = Session::with_api_key(Some("gsk_1"));
        session.record_submission("https://a.com");
        session.clear_history();

        assert!(session.history().is_empty());
        assert_eq!(session.api_key(), Some("gsk_1"));
    }

    #[test]
    fn test_reset_drops_everything() {
        let mut session = Session::with_api_key(Some("gsk_1"));
        session.record_submission("https://a.com");
        session.reset();

        assert!(session.history().is_empty());
        assert!(!session.has_api_key());
    }

    #[test]
    fn test_api_key_handling() {
        let mut session = Session::with_api_key(Some("   "));
        assert!(!session.has_api_key());

        assert_eq!(session.set_api_key(""), Err(InputError::MissingApiKey));
        assert!(session.set_api_key(" gsk_2 ").is_ok());
        assert_eq!(session.api_key(), Some("gsk_2"));

        assert!(session.set_api_key(" ").is_err());
        assert_eq!(session.api_key(), Some("gsk_2"));
    }

    #[test]
    fn test_debug_and_view_hide_key() {
        let mut session = Session::with_api_key(Some("gsk_secret"));
        session.record_submission("https://a.com");

        assert!(!format!("{session:?}").contains("gsk_secret"));

        let json = serde_json::to_string(&session.view()).unwrap_or_default();
        assert!(!json.contains("gsk_secret"));
        assert!(json.contains("\"has_api_key\":true"));
        assert!(json.contains("https://a.com"));
    }
}
