//! Content loading for submitted URLs.
//!
//! This module turns a URL into text documents:
//! - Source classification (YouTube video or generic website)
//! - Website text extraction
//! - YouTube transcript and video info extraction
//! - Per-URL caching with TTL

pub mod cache;
pub mod config;
pub mod error;
pub mod types;
pub mod web;
pub mod youtube;

pub use cache::DocumentCache;
pub use config::{CacheConfig, LoaderConfig};
pub use error::LoadError;
pub use types::{Document, DocumentMetadata, SourceKind};

use async_trait::async_trait;

/// Something that can fetch the text behind a URL.
#[async_trait]
pub trait ContentLoader: Send + Sync {
    /// Load documents for `url`, which has already been classified as `kind`.
    async fn load(&self, url: &str, kind: SourceKind) -> Result<Vec<Document>, LoadError>;

    /// Forget anything remembered from earlier loads.
    fn clear_cache(&self) {}
}

/// Loader that fetches content over HTTP and dispatches on [`SourceKind`].
pub struct HttpLoader {
    config: LoaderConfig,
    cache: DocumentCache,
    client: reqwest::Client,
}

impl HttpLoader {
    /// Create a new loader with the given configuration.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: LoaderConfig) -> Result<Self, LoadError> {
        let client = Self::build_client(&config)?;
        let cache = DocumentCache::new(config.cache_config.clone());

        Ok(Self {
            config,
            cache,
            client,
        })
    }

    /// Build an HTTP client with browser-like headers.
    fn build_client(config: &LoaderConfig) -> Result<reqwest::Client, LoadError> {
        use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, USER_AGENT};

        let mut headers = HeaderMap::new();

        let ua = config.random_user_agent();
        if let Ok(ua_value) = HeaderValue::from_str(&ua) {
            headers.insert(USER_AGENT, ua_value);
        }

        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,text/plain;q=0.8,*/*;q=0.5",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));

        reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .danger_accept_invalid_certs(!config.verify_tls)
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| LoadError::HttpClient(e.to_string()))
    }
}

#[async_trait]
impl ContentLoader for HttpLoader {
    async fn load(&self, url: &str, kind: SourceKind) -> Result<Vec<Document>, LoadError> {
        if let Some(cached) = self.cache.get(url) {
            tracing::debug!("Cache hit for URL: {url}");
            return Ok(cached);
        }

        tracing::debug!("Loading {} at {url}", kind.label());
        let documents = match kind {
            SourceKind::Video => youtube::load_video(&self.client, url, &self.config).await?,
            SourceKind::Website => web::load_page(&self.client, url, &self.config).await?,
        };

        if documents.iter().any(|doc| !doc.is_blank()) {
            self.cache.set(url, &documents);
            tracing::debug!("Cached {url} ({} entries)", self.cache.len());
        }

        Ok(documents)
    }

    fn clear_cache(&self) {
        self.cache.clear();
    }
}
