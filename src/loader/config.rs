//! Configuration for the content loaders.

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Default origin for watch pages.
pub const DEFAULT_YOUTUBE_BASE_URL: &str = "https://www.youtube.com";

/// Configuration for [`super::HttpLoader`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Request timeout.
    #[serde(with = "duration_serde")]
    pub request_timeout: Duration,
    /// Connection timeout.
    #[serde(with = "duration_serde")]
    pub connect_timeout: Duration,
    /// User agents to rotate.
    pub user_agents: Vec<String>,
    /// Whether TLS certificates are verified for website loads.
    pub verify_tls: bool,
    /// Maximum content length to download (bytes).
    pub max_content_length: usize,
    /// Preferred transcript languages, most preferred first.
    pub transcript_languages: Vec<String>,
    /// Attach title, channel, views and similar to video documents.
    pub add_video_info: bool,
    /// Origin serving YouTube watch pages.
    pub youtube_base_url: String,
    /// Cache configuration.
    pub cache_config: CacheConfig,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            user_agents: default_user_agents(),
            verify_tls: false,
            max_content_length: 10 * 1024 * 1024, // 10 MB
            transcript_languages: vec!["en".to_string()],
            add_video_info: true,
            youtube_base_url: DEFAULT_YOUTUBE_BASE_URL.to_string(),
            cache_config: CacheConfig::default(),
        }
    }
}

impl LoaderConfig {
    /// Set request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Enable or disable TLS certificate verification.
    #[must_use]
    pub const fn with_verify_tls(mut self, verify: bool) -> Self {
        self.verify_tls = verify;
        self
    }

    /// Set preferred transcript languages.
    #[must_use]
    pub fn with_transcript_languages<I, S>(mut self, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.transcript_languages = languages.into_iter().map(Into::into).collect();
        self
    }

    /// Set the download size limit in bytes.
    #[must_use]
    pub const fn with_max_content_length(mut self, max: usize) -> Self {
        self.max_content_length = max;
        self
    }

    /// Fetch watch pages from another origin.
    #[must_use]
    pub fn with_youtube_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.youtube_base_url = base_url.into();
        self
    }

    /// Set the cache configuration.
    #[must_use]
    pub const fn with_cache(mut self, cache: CacheConfig) -> Self {
        self.cache_config = cache;
        self
    }

    /// Get a random user agent from the rotation list.
    #[must_use]
    pub fn random_user_agent(&self) -> String {
        if self.user_agents.is_empty() {
            return default_user_agents()[0].clone();
        }
        let mut rng = rand::thread_rng();
        let idx = rng.gen_range(0..self.user_agents.len());
        self.user_agents[idx].clone()
    }
}

/// Document cache configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Whether caching is enabled.
    pub enabled: bool,
    /// TTL for loaded documents (seconds).
    pub ttl_seconds: u64,
    /// Maximum cache size (number of URLs).
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_seconds: 3600, // 1 hour
            max_entries: 256,
        }
    }
}

impl CacheConfig {
    /// A configuration that never stores anything.
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            enabled: false,
            ttl_seconds: 0,
            max_entries: 0,
        }
    }
}

/// Default user agents for rotation.
fn default_user_agents() -> Vec<String> {
    vec![
        // Chrome on macOS
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 13_5_1) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/116.0.0.0 Safari/537.36".to_string(),
        // Chrome on Windows
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
        // Firefox on Linux
        "Mozilla/5.0 (X11; Linux x86_64; rv:121.0) Gecko/20100101 Firefox/121.0".to_string(),
        // Safari on macOS
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.2 Safari/605.1.15".to_string(),
    ]
}

/// Serde module for Duration serialization.
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
