//! Syntactic checks on submitted URLs and credentials.
//!
//! Nothing here touches the network: a URL that fails these checks never
//! reaches a loader.

use url::{Host, Url};

use crate::input::error::InputError;

/// Schemes the loaders know how to fetch.
const ALLOWED_SCHEMES: [&str; 2] = ["http", "https"];

/// Validate a raw URL and return it trimmed, as typed.
///
/// # Errors
/// Returns [`InputError::EmptyUrl`] for blank input and
/// [`InputError::InvalidUrl`] when the URL is not an absolute `http(s)` URL
/// with a public-looking host.
pub fn validate_url(raw: &str) -> Result<String, InputError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(InputError::EmptyUrl);
    }

    if trimmed.chars().any(char::is_whitespace) {
        return Err(InputError::InvalidUrl("contains whitespace".to_string()));
    }

    let parsed =
        Url::parse(trimmed).map_err(|e| InputError::InvalidUrl(format!("unparsable: {e}")))?;

    if !ALLOWED_SCHEMES.contains(&parsed.scheme()) {
        return Err(InputError::InvalidUrl(format!(
            "unsupported scheme: {}",
            parsed.scheme()
        )));
    }

    match parsed.host() {
        None => Err(InputError::InvalidUrl("missing host".to_string())),
        Some(Host::Ipv4(_) | Host::Ipv6(_)) => Ok(trimmed.to_string()),
        Some(Host::Domain(domain)) => {
            check_domain(domain)?;
            Ok(trimmed.to_string())
        }
    }
}

/// Validate an API credential, returning it trimmed.
///
/// # Errors
/// Returns [`InputError::MissingApiKey`] if the credential is blank.
pub fn validate_api_key(raw: &str) -> Result<String, InputError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(InputError::MissingApiKey);
    }
    Ok(trimmed.to_string())
}

/// A domain needs at least two labels and a plausible top-level label.
fn check_domain(domain: &str) -> Result<(), InputError> {
    let domain = domain.strip_suffix('.').unwrap_or(domain);
    let labels: Vec<&str> = domain.split('.').collect();

    if labels.len() < 2 {
        return Err(InputError::InvalidUrl(format!("host has no TLD: {domain}")));
    }

    for label in &labels {
        if !is_valid_label(label) {
            return Err(InputError::InvalidUrl(format!("bad host label: {label:?}")));
        }
    }

    let tld = labels[labels.len() - 1];
    let tld_ok = tld.starts_with("xn--")
        || (tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic()));
    if !tld_ok {
        return Err(InputError::InvalidUrl(format!("bad TLD: {tld}")));
    }

    Ok(())
}

fn is_valid_label(label: &str) -> bool {
    !label.is_empty()
        && label.len() <= 63
        && !label.starts_with('-')
        && !label.ends_with('-')
        && label
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_url() {
        assert_eq!(validate_url(""), Err(InputError::EmptyUrl));
        assert_eq!(validate_url("   \t "), Err(InputError::EmptyUrl));
    }

    #[test]
    fn test_accepts_common_urls() {
        for url in [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ",
            "http://example.com",
            "https://docs.rs/tokio/latest/tokio/",
            "https://192.168.1.10:8080/page",
            "https://[::1]/",
            "https://example.xn--p1ai/",
        ] {
            assert!(validate_url(url).is_ok(), "{url} should be valid");
        }
    }

    #[test]
    fn test_returns_trimmed_input() {
        assert_eq!(
            validate_url("  https://example.com/a?b=c  ").ok(),
            Some("https://example.com/a?b=c".to_string())
        );
    }

    #[test]
    fn test_rejects_invalid_urls() {
        for url in [
            "not a url",
            "example.com",
            "ftp://example.com/file",
            "mailto:someone@example.com",
            "https://localhost/",
            "https://example/",
            "https://example.c0m/",
            "https://-bad-.com/",
            "https://under_score.example.com/",
            "https://exa mple.com/",
            "javascript:alert(1)",
        ] {
            assert!(
                matches!(validate_url(url), Err(InputError::InvalidUrl(_))),
                "{url} should be invalid"
            );
        }
    }

    #[test]
    fn test_api_key() {
        assert_eq!(validate_api_key("  "), Err(InputError::MissingApiKey));
        assert_eq!(validate_api_key(" gsk_123 ").ok(), Some("gsk_123".to_string()));
    }
}
