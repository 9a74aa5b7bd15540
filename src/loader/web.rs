//! Website loading and HTML text extraction.

use chrono::{DateTime, Utc};
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::loader::config::LoaderConfig;
use crate::loader::error::LoadError;
use crate::loader::types::{Document, DocumentMetadata, SourceKind};

/// Containers tried, in order, for the main article text.
const CONTENT_SELECTORS: [&str; 10] = [
    "article",
    "main",
    "[role='main']",
    ".post-content",
    ".article-content",
    ".entry-content",
    ".content",
    "#content",
    ".post",
    ".article",
];

/// A content container must hold more words than this to win over the body.
const MIN_CONTAINER_WORDS: usize = 50;

/// Elements whose text is never shown to a reader.
const HIDDEN_ELEMENTS: [&str; 5] = ["script", "style", "noscript", "template", "head"];

/// Load a web page as a single document.
///
/// # Errors
/// Returns an error if the request fails, the status is not a success, the
/// body is too large, or the content type is not text.
pub async fn load_page(
    client: &reqwest::Client,
    url: &str,
    config: &LoaderConfig,
) -> Result<Vec<Document>, LoadError> {
    let parsed_url = Url::parse(url)?;

    let response = client.get(parsed_url.as_str()).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(LoadError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    if let Some(len) = response.content_length() {
        if len > config.max_content_length as u64 {
            return Err(LoadError::ContentTooLarge(len));
        }
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("text/html")
        .to_ascii_lowercase();

    let is_plain = content_type.contains("text/plain");
    if !is_plain && !content_type.contains("html") && !content_type.contains("xml") {
        return Err(LoadError::UnsupportedContentType(content_type));
    }

    let body = read_body(response, config.max_content_length).await?;

    if is_plain {
        tracing::debug!("Loaded plain text from {url}");
        return Ok(vec![Document::new(clean_text(&body), url, SourceKind::Website)]);
    }

    let document = extract_document(&body, url);
    tracing::debug!(
        "Extracted {} words from {url}",
        document.metadata.word_count
    );
    Ok(vec![document])
}

/// Read a response body, giving up as soon as it exceeds `max_len` bytes.
///
/// # Errors
/// Returns [`LoadError::ContentTooLarge`] past the limit, or the transport
/// error if reading fails.
pub(crate) async fn read_body(
    mut response: reqwest::Response,
    max_len: usize,
) -> Result<String, LoadError> {
    let mut body = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        body.extend_from_slice(&chunk);
        if body.len() > max_len {
            return Err(LoadError::ContentTooLarge(body.len() as u64));
        }
    }
    Ok(String::from_utf8_lossy(&body).into_owned())
}

/// Build a document from raw HTML.
#[must_use]
pub fn extract_document(html: &str, source: &str) -> Document {
    let page = Html::parse_document(html);
    let text = extract_main_text(&page);

    let mut metadata = DocumentMetadata::new(source, SourceKind::Website);
    metadata.title = Some(extract_title(&page)).filter(|t| !t.is_empty());
    metadata.description =
        extract_meta(&page, "description").or_else(|| extract_meta(&page, "og:description"));
    metadata.author =
        extract_meta(&page, "author").or_else(|| extract_meta(&page, "article:author"));
    metadata.language = extract_language(&page);
    metadata.published_at = extract_publish_date(&page);
    metadata.thumbnail_url = extract_meta(&page, "og:image");
    metadata.word_count = text.split_whitespace().count();

    Document {
        page_content: text,
        metadata,
    }
}

/// Extract page title.
fn extract_title(document: &Html) -> String {
    if let Some(og_title) = extract_meta(document, "og:title") {
        return og_title;
    }

    for tag in ["title", "h1"] {
        if let Ok(selector) = Selector::parse(tag) {
            if let Some(element) = document.select(&selector).next() {
                let title = clean_text(&element.text().collect::<String>());
                if !title.is_empty() {
                    return title;
                }
            }
        }
    }

    String::new()
}

/// Extract meta tag content by `name` or `property`.
fn extract_meta(document: &Html, name: &str) -> Option<String> {
    for attr in ["name", "property", "itemprop"] {
        let selector_str = format!("meta[{attr}='{name}']");
        let Ok(selector) = Selector::parse(&selector_str) else {
            continue;
        };
        let content = document
            .select(&selector)
            .filter_map(|element| element.value().attr("content"))
            .map(str::trim)
            .find(|content| !content.is_empty());
        if let Some(content) = content {
            return Some(content.to_string());
        }
    }

    None
}

/// Extract publish date from meta tags or a `<time>` element.
fn extract_publish_date(document: &Html) -> Option<DateTime<Utc>> {
    let date_metas = [
        "article:published_time",
        "og:published_time",
        "datePublished",
        "date",
        "pubdate",
    ];

    for meta_name in date_metas {
        if let Some(date_str) = extract_meta(document, meta_name) {
            if let Some(date) = parse_date(&date_str) {
                return Some(date);
            }
        }
    }

    let selector = Selector::parse("time[datetime]").ok()?;
    document
        .select(&selector)
        .filter_map(|element| element.value().attr("datetime"))
        .find_map(parse_date)
}

/// Parse RFC 3339 timestamps or plain `YYYY-MM-DD` dates.
pub(crate) fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    let date = chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()?;
    date.and_hms_opt(0, 0, 0)
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}

/// Extract language from the `<html lang>` attribute or meta tags.
fn extract_language(document: &Html) -> Option<String> {
    if let Ok(selector) = Selector::parse("html") {
        if let Some(element) = document.select(&selector).next() {
            if let Some(lang) = element.value().attr("lang") {
                let lang = lang.split('-').next().unwrap_or(lang).trim();
                if !lang.is_empty() {
                    return Some(lang.to_ascii_lowercase());
                }
            }
        }
    }

    extract_meta(document, "language").or_else(|| extract_meta(document, "og:locale"))
}

/// Extract the main readable text of the page.
fn extract_main_text(document: &Html) -> String {
    for selector_str in CONTENT_SELECTORS {
        if let Ok(selector) = Selector::parse(selector_str) {
            if let Some(element) = document.select(&selector).next() {
                let text = visible_text(element);
                if text.split_whitespace().count() > MIN_CONTAINER_WORDS {
                    return text;
                }
            }
        }
    }

    if let Ok(body_selector) = Selector::parse("body") {
        if let Some(body) = document.select(&body_selector).next() {
            return visible_text(body);
        }
    }

    visible_text(document.root_element())
}

/// Text of an element, skipping script, style and similar subtrees.
fn visible_text(element: ElementRef<'_>) -> String {
    let mut text = String::new();

    for node in element.descendants() {
        let Some(fragment) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| HIDDEN_ELEMENTS.contains(&el.name()))
        });
        if hidden {
            continue;
        }

        let trimmed = fragment.trim();
        if !trimmed.is_empty() {
            if !text.is_empty() {
                text.push(' ');
            }
            text.push_str(trimmed);
        }
    }

    clean_text(&text)
}

/// Collapse every whitespace run into a single space.
pub(crate) fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
