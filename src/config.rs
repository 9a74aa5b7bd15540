//! Application configuration, read from the environment.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::loader::{CacheConfig, LoaderConfig};
use crate::summarize::prompt::DEFAULT_SUMMARY_WORDS;

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 8501;

/// Default bind address (loopback).
pub const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

/// Default Groq model.
pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";

/// Environment variable names.
pub mod env {
    /// Bind address.
    pub const HOST: &str = "URLSUM_HOST";
    /// HTTP port.
    pub const PORT: &str = "URLSUM_PORT";
    /// Directory served at `/`.
    pub const STATIC_DIR: &str = "URLSUM_STATIC_DIR";
    /// Optional credential preloaded into the session.
    pub const API_KEY: &str = "GROQ_API_KEY";
    /// Groq model name.
    pub const MODEL: &str = "URLSUM_MODEL";
    /// Custom Groq API base URL.
    pub const BASE_URL: &str = "URLSUM_GROQ_BASE_URL";
    /// Sampling temperature.
    pub const TEMPERATURE: &str = "URLSUM_TEMPERATURE";
    /// Completion token cap.
    pub const MAX_TOKENS: &str = "URLSUM_MAX_TOKENS";
    /// Requested summary length in words.
    pub const SUMMARY_WORDS: &str = "URLSUM_SUMMARY_WORDS";
    /// Verify TLS certificates when loading websites.
    pub const VERIFY_TLS: &str = "URLSUM_VERIFY_TLS";
    /// Comma-separated transcript languages.
    pub const TRANSCRIPT_LANGS: &str = "URLSUM_TRANSCRIPT_LANGS";
    /// Document cache TTL in seconds (0 disables the cache).
    pub const CACHE_TTL_SECS: &str = "URLSUM_CACHE_TTL_SECS";
    /// Request timeout in seconds.
    pub const TIMEOUT_SECS: &str = "URLSUM_TIMEOUT_SECS";
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable could not be parsed.
    #[error("invalid value for {name}: {value:?} ({reason})")]
    InvalidValue {
        /// Variable name.
        name: &'static str,
        /// Raw value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
    /// Values are individually fine but out of range.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Completion model settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Groq model name.
    pub model: String,
    /// Temperature for generation.
    pub temperature: f64,
    /// Optional max tokens.
    pub max_tokens: Option<u64>,
    /// Optional custom base URL.
    pub base_url: Option<String>,
    /// Requested summary length in words.
    pub summary_words: usize,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.3,
            max_tokens: None,
            base_url: None,
            summary_words: DEFAULT_SUMMARY_WORDS,
        }
    }
}

/// Top-level configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Bind address.
    pub host: IpAddr,
    /// HTTP port.
    pub port: u16,
    /// Directory holding the UI.
    pub static_dir: PathBuf,
    /// Credential preloaded into the session, if any.
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Model settings.
    pub llm: LlmConfig,
    /// Loader settings.
    pub loader: LoaderConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST,
            port: DEFAULT_PORT,
            static_dir: PathBuf::from("static"),
            api_key: None,
            llm: LlmConfig::default(),
            loader: LoaderConfig::default(),
        }
    }
}

impl AppConfig {
    /// Read configuration from process environment variables.
    ///
    /// # Errors
    /// Returns an error if a variable is set to an unparsable value or the
    /// result fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read configuration through `lookup`, falling back to defaults.
    ///
    /// # Errors
    /// Returns an error if a value is unparsable or the result fails
    /// validation.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let mut config = Self::default();

        if let Some(host) = parse_var(&get, env::HOST)? {
            config.host = host;
        }
        if let Some(port) = parse_var(&get, env::PORT)? {
            config.port = port;
        }
        if let Some(dir) = get(env::STATIC_DIR) {
            config.static_dir = PathBuf::from(dir);
        }
        config.api_key = get(env::API_KEY);

        if let Some(model) = get(env::MODEL) {
            config.llm.model = model;
        }
        config.llm.base_url = get(env::BASE_URL);
        if let Some(temperature) = parse_var(&get, env::TEMPERATURE)? {
            config.llm.temperature = temperature;
        }
        config.llm.max_tokens = parse_var(&get, env::MAX_TOKENS)?;
        if let Some(words) = parse_var(&get, env::SUMMARY_WORDS)? {
            config.llm.summary_words = words;
        }

        let mut loader = config.loader;
        if let Some(verify) = get(env::VERIFY_TLS) {
            loader = loader.with_verify_tls(parse_bool(env::VERIFY_TLS, &verify)?);
        }
        if let Some(langs) = get(env::TRANSCRIPT_LANGS) {
            loader = loader.with_transcript_languages(
                langs.split(',').map(str::trim).filter(|l| !l.is_empty()),
            );
        }
        if let Some(ttl) = parse_var::<u64, _>(&get, env::CACHE_TTL_SECS)? {
            loader = loader.with_cache(if ttl == 0 {
                CacheConfig::disabled()
            } else {
                CacheConfig {
                    ttl_seconds: ttl,
                    ..CacheConfig::default()
                }
            });
        }
        if let Some(secs) = parse_var::<u64, _>(&get, env::TIMEOUT_SECS)? {
            loader = loader.with_timeout(Duration::from_secs(secs));
        }
        config.loader = loader;

        config.validate()?;
        Ok(config)
    }

    /// Socket address the server binds to.
    #[must_use]
    pub const fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Validate configuration invariants.
    ///
    /// # Errors
    /// Returns an error if any values are out of range or invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.llm.model.trim().is_empty() {
            return Err(ConfigError::Invalid("llm.model must not be empty".to_string()));
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(ConfigError::Invalid(
                "llm.temperature must be within 0.0..=2.0".to_string(),
            ));
        }
        if self.llm.summary_words == 0 {
            return Err(ConfigError::Invalid(
                "llm.summary_words must be > 0".to_string(),
            ));
        }
        if self.loader.transcript_languages.is_empty() {
            return Err(ConfigError::Invalid(
                "loader.transcript_languages must not be empty".to_string(),
            ));
        }
        if self.loader.request_timeout.is_zero() {
            return Err(ConfigError::Invalid(
                "loader.request_timeout must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("static_dir", &self.static_dir)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("llm", &self.llm)
            .field("loader", &self.loader)
            .finish()
    }
}

fn parse_var<T, G>(get: &G, name: &'static str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    get(name)
        .map(|value| {
            value.parse::<T>().map_err(|e| ConfigError::InvalidValue {
                name,
                reason: e.to_string(),
                value,
            })
        })
        .transpose()
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            name,
            value: value.to_string(),
            reason: "expected a boolean".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&[]));
        let config = config.unwrap_or_default();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.bind_addr().to_string(), "127.0.0.1:8501");
        assert_eq!(config.llm.model, DEFAULT_MODEL);
        assert_eq!(config.llm.summary_words, 300);
        assert!(config.api_key.is_none());
        assert!(!config.loader.verify_tls);
    }

    #[test]
    fn test_env_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            (env::HOST, "0.0.0.0"),
            (env::PORT, "9000"),
            (env::API_KEY, " gsk_abc "),
            (env::MODEL, "gemma2-9b-it"),
            (env::TEMPERATURE, "0.7"),
            (env::MAX_TOKENS, "1024"),
            (env::SUMMARY_WORDS, "150"),
            (env::VERIFY_TLS, "yes"),
            (env::TRANSCRIPT_LANGS, "de, en ,"),
            (env::CACHE_TTL_SECS, "0"),
        ]));
        let config = config.unwrap_or_default();

        assert_eq!(config.bind_addr().to_string(), "0.0.0.0:9000");
        assert_eq!(config.api_key.as_deref(), Some("gsk_abc"));
        assert_eq!(config.llm.model, "gemma2-9b-it");
        assert!((config.llm.temperature - 0.7).abs() < f64::EPSILON);
        assert_eq!(config.llm.max_tokens, Some(1024));
        assert_eq!(config.llm.summary_words, 150);
        assert!(config.loader.verify_tls);
        assert_eq!(config.loader.transcript_languages, vec!["de", "en"]);
        assert!(!config.loader.cache_config.enabled);
    }

    #[test]
    fn test_bad_values_rejected() {
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[(env::PORT, "not-a-port")])),
            Err(ConfigError::InvalidValue { name: env::PORT, .. })
        ));
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[(env::HOST, "localhost")])),
            Err(ConfigError::InvalidValue { name: env::HOST, .. })
        ));
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[(env::VERIFY_TLS, "maybe")])),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[(env::TEMPERATURE, "5")])),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[(env::SUMMARY_WORDS, "0")])),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_api_key_not_serialized() {
        let config = AppConfig {
            api_key: Some("secret".to_string()),
            ..AppConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap_or_default();
        assert!(!json.contains("secret"));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = AppConfig {
            api_key: Some("gsk_secret".to_string()),
            ..AppConfig::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("gsk_secret"));
        assert!(debug.contains("<redacted>"));
    }
}
