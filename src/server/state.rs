//! Application state shared across all request handlers.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::AppConfig;
use crate::loader::{ContentLoader, HttpLoader};
use crate::pipeline::Pipeline;
use crate::session::Session;
use crate::summarize::{GroqProvider, ModelProvider, PromptTemplate, Summarizer};

/// Shared application state.
pub struct AppState {
    /// The interactive session.
    pub session: RwLock<Session>,
    /// Submit flow.
    pub pipeline: Pipeline,
    /// Directory served at `/`.
    pub static_dir: PathBuf,
}

impl AppState {
    /// Create the state from configuration, with the HTTP loader and Groq.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: &AppConfig) -> Result<Arc<Self>, Box<dyn std::error::Error + Send + Sync>> {
        let loader = HttpLoader::new(config.loader.clone())
            .map_err(|e| format!("Failed to create loader: {e}"))?;
        let provider = GroqProvider::new(config.llm.clone());
        let summarizer = Summarizer::new(
            PromptTemplate::summary(config.llm.summary_words),
            Arc::new(provider),
        );

        Ok(Self::from_parts(
            Arc::new(loader),
            summarizer,
            Session::with_api_key(config.api_key.as_deref()),
            config.static_dir.clone(),
        ))
    }

    /// Assemble state from already-built parts.
    #[must_use]
    pub fn from_parts(
        loader: Arc<dyn ContentLoader>,
        summarizer: Summarizer,
        session: Session,
        static_dir: PathBuf,
    ) -> Arc<Self> {
        Arc::new(Self {
            session: RwLock::new(session),
            pipeline: Pipeline::new(loader, summarizer),
            static_dir,
        })
    }

    /// Convenience for tests and embedders: any loader, any model provider.
    #[must_use]
    pub fn with_backends(
        loader: Arc<dyn ContentLoader>,
        provider: Arc<dyn ModelProvider>,
        session: Session,
    ) -> Arc<Self> {
        Self::from_parts(
            loader,
            Summarizer::new(PromptTemplate::default(), provider),
            session,
            PathBuf::from("static"),
        )
    }
}
