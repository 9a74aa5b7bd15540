//! TTL cache for loaded documents, keyed by normalized URL.

use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::loader::config::CacheConfig;
use crate::loader::types::Document;

/// Cache entry with TTL.
#[derive(Clone)]
struct CacheEntry {
    documents: Vec<Document>,
    expires_at: Instant,
}

impl CacheEntry {
    fn new(documents: Vec<Document>, ttl: Duration) -> Self {
        Self {
            documents,
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() > self.expires_at
    }
}

/// Thread-safe cache of loaded documents.
pub struct DocumentCache {
    config: CacheConfig,
    entries: DashMap<String, CacheEntry>,
}

impl DocumentCache {
    /// Create a new cache with the given configuration.
    #[must_use]
    pub fn new(config: CacheConfig) -> Self {
        Self {
            config,
            entries: DashMap::new(),
        }
    }

    /// Get cached documents for a URL.
    #[must_use]
    pub fn get(&self, url: &str) -> Option<Vec<Document>> {
        if !self.config.enabled {
            return None;
        }

        self.entries.get(url).and_then(|entry| {
            if entry.is_expired() {
                drop(entry);
                self.entries.remove(url);
                None
            } else {
                Some(entry.documents.clone())
            }
        })
    }

    /// Cache documents for a URL.
    pub fn set(&self, url: &str, documents: &[Document]) {
        if !self.config.enabled || self.config.max_entries == 0 {
            return;
        }

        self.enforce_max_entries();

        let ttl = Duration::from_secs(self.config.ttl_seconds);
        self.entries
            .insert(url.to_string(), CacheEntry::new(documents.to_vec(), ttl));
    }

    /// Number of cached URLs, expired ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Clear the cache.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Remove expired entries.
    pub fn cleanup_expired(&self) {
        self.entries.retain(|_, entry| !entry.is_expired());
    }

    /// Make room for one more entry, dropping expired then soonest-to-expire entries.
    fn enforce_max_entries(&self) {
        if self.entries.len() < self.config.max_entries {
            return;
        }

        self.cleanup_expired();

        while self.entries.len() >= self.config.max_entries {
            let oldest = self
                .entries
                .iter()
                .min_by_key(|entry| entry.expires_at)
                .map(|entry| entry.key().clone());
            match oldest {
                Some(key) => {
                    self.entries.remove(&key);
                }
                None => break,
            }
        }
    }
}
