//! Rewriting of shortened video links.

use url::Url;

/// Host of shortened YouTube links.
const SHORT_VIDEO_HOST: &str = "youtu.be";

/// Canonical watch URL prefix.
const WATCH_URL_PREFIX: &str = "https://www.youtube.com/watch?v=";

/// Expand a `youtu.be/<id>` link into its `youtube.com/watch?v=<id>` form.
///
/// Only URLs whose host is `youtu.be` are rewritten; the first path segment
/// is the video id and the query is dropped. Anything else is returned
/// unchanged.
#[must_use]
pub fn normalize_url(url: &str) -> String {
    let Ok(parsed) = Url::parse(url) else {
        return url.to_string();
    };
    if parsed.host_str() != Some(SHORT_VIDEO_HOST) {
        return url.to_string();
    }

    let video_id = parsed
        .path_segments()
        .and_then(|mut segments| segments.find(|s| !s.is_empty()));

    match video_id {
        Some(id) => format!("{WATCH_URL_PREFIX}{id}"),
        None => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_url_expanded() {
        assert_eq!(
            normalize_url("https://youtu.be/dQw4w9WgXcQ"),
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ"
        );
    }

    #[test]
    fn test_short_url_query_dropped() {
        assert_eq!(
            normalize_url("https://youtu.be/dQw4w9WgXcQ?si=abc&t=30"),
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ"
        );
    }

    #[test]
    fn test_other_urls_unchanged() {
        for url in [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://example.com/youtu/be",
            "https://example.com/youtu.be/abc",
            "https://blog.rust-lang.org/",
        ] {
            assert_eq!(normalize_url(url), url);
        }
    }

    #[test]
    fn test_short_url_without_id_unchanged() {
        assert_eq!(normalize_url("https://youtu.be/"), "https://youtu.be/");
        assert_eq!(normalize_url("https://youtu.be"), "https://youtu.be");
    }

    #[test]
    fn test_long_url_mentioning_short_host_unchanged() {
        let url = "https://www.youtube.com/watch?v=dQw4w9WgXcQ&feature=youtu.be";
        assert_eq!(normalize_url(url), url);
    }

    #[test]
    fn test_short_url_id_is_first_segment() {
        assert_eq!(
            normalize_url("https://youtu.be/dQw4w9WgXcQ/extra#t=5"),
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ"
        );
        assert_eq!(
            normalize_url("http://YOUTU.BE/abc123"),
            "https://www.youtube.com/watch?v=abc123"
        );
    }
}
