//! YouTube transcript loading.
//!
//! The watch page embeds a `ytInitialPlayerResponse` JSON blob that lists the
//! caption tracks and the video details. A track's `baseUrl` serves the timed
//! text as XML, which is flattened into one document.

use regex::Regex;
use scraper::Html;
use serde_json::Value;
use url::Url;

use crate::loader::config::LoaderConfig;
use crate::loader::error::LoadError;
use crate::loader::types::{Document, DocumentMetadata, SourceKind};
use crate::loader::web::{parse_date, read_body};

/// Name of the embedded player JSON variable.
const PLAYER_RESPONSE_MARKER: &str = "ytInitialPlayerResponse";

/// Path prefixes that carry the video id as their next segment.
const ID_PATH_PREFIXES: [&str; 4] = ["shorts", "embed", "live", "v"];

/// A caption track offered by a video.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CaptionTrack {
    /// Timed-text URL.
    pub base_url: String,
    /// BCP-47 language code.
    pub language_code: String,
    /// Display name.
    pub name: String,
    /// Auto-generated (speech recognition) track.
    pub is_generated: bool,
}

/// One timed line of a transcript.
#[derive(Clone, Debug, PartialEq)]
pub struct TranscriptSegment {
    /// Offset in seconds.
    pub start: f64,
    /// Duration in seconds.
    pub duration: f64,
    /// Plain text.
    pub text: String,
}

/// Load the transcript of a YouTube video as a single document.
///
/// # Errors
/// Returns an error if the id cannot be found, the watch page cannot be
/// fetched or parsed, the video is unplayable, or no caption track matches
/// the configured languages.
pub async fn load_video(
    client: &reqwest::Client,
    url: &str,
    config: &LoaderConfig,
) -> Result<Vec<Document>, LoadError> {
    let video_id =
        extract_video_id(url).ok_or_else(|| LoadError::VideoIdNotFound(url.to_string()))?;
    let watch_url = format!(
        "{}/watch?v={video_id}",
        config.youtube_base_url.trim_end_matches('/')
    );

    let html = fetch_text(client, &watch_url, config.max_content_length).await?;
    let player = extract_player_response(&html)
        .ok_or_else(|| LoadError::PlayerResponseMissing(video_id.clone()))?;

    let tracks = caption_tracks(&player);
    if tracks.is_empty() {
        return Err(match unplayable_reason(&player) {
            Some(reason) => LoadError::VideoUnavailable { video_id, reason },
            None => LoadError::TranscriptsDisabled(video_id),
        });
    }

    let track = select_track(&tracks, &config.transcript_languages).ok_or_else(|| {
        LoadError::NoTranscript {
            video_id: video_id.clone(),
            requested: config.transcript_languages.clone(),
            available: tracks.iter().map(|t| t.language_code.clone()).collect(),
        }
    })?;
    tracing::debug!(
        "Using {} caption track '{}' for video {video_id}",
        if track.is_generated { "generated" } else { "manual" },
        track.language_code
    );

    let xml = fetch_text(client, &track.base_url, config.max_content_length).await?;
    let segments = parse_transcript(&xml)?;
    let text = join_segments(&segments);

    let mut metadata = if config.add_video_info {
        video_metadata(&player, &watch_url)
    } else {
        DocumentMetadata::new(watch_url.as_str(), SourceKind::Video)
    };
    if metadata.length_seconds.is_none() {
        metadata.length_seconds = transcript_length(&segments);
    }
    metadata.language = Some(track.language_code.clone());
    metadata.word_count = text.split_whitespace().count();

    Ok(vec![Document {
        page_content: text,
        metadata,
    }])
}

/// GET a URL and return the body, failing on non-success statuses.
async fn fetch_text(
    client: &reqwest::Client,
    url: &str,
    max_len: usize,
) -> Result<String, LoadError> {
    let response = client
        .get(url)
        .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
        .header(reqwest::header::COOKIE, "CONSENT=YES+1")
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(LoadError::HttpStatus {
            url: url.to_string(),
            status: response.status().as_u16(),
        });
    }

    read_body(response, max_len).await
}

/// Extract the video id from the usual YouTube URL shapes.
#[must_use]
pub fn extract_video_id(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let host = parsed.host_str()?.to_ascii_lowercase();
    let mut segments = parsed.path_segments()?.filter(|s| !s.is_empty());

    let id: Option<String> = if host == "youtu.be" || host.ends_with(".youtu.be") {
        segments.next().map(str::to_string)
    } else if host == "youtube.com" || host.ends_with(".youtube.com") {
        let from_query = parsed
            .query_pairs()
            .find(|(key, _)| key == "v")
            .map(|(_, value)| value.into_owned());
        from_query.or_else(|| {
            let first = segments.next()?;
            if ID_PATH_PREFIXES.contains(&first) {
                segments.next().map(str::to_string)
            } else {
                None
            }
        })
    } else {
        None
    };

    id.filter(|id| is_plausible_id(id))
}

fn is_plausible_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Find and parse the embedded player response JSON.
#[must_use]
pub fn extract_player_response(html: &str) -> Option<Value> {
    let mut rest = html;

    while let Some(pos) = rest.find(PLAYER_RESPONSE_MARKER) {
        rest = &rest[pos + PLAYER_RESPONSE_MARKER.len()..];

        let after_name =
            rest.trim_start_matches(|c: char| c == '"' || c == '\'' || c == ']' || c.is_whitespace());
        let Some(json_start) = after_name.strip_prefix('=') else {
            continue;
        };

        let mut stream =
            serde_json::Deserializer::from_str(json_start.trim_start()).into_iter::<Value>();
        match stream.next() {
            Some(Ok(value)) if value.is_object() => return Some(value),
            _ => continue,
        }
    }

    None
}

/// List the caption tracks of a player response.
#[must_use]
pub fn caption_tracks(player: &Value) -> Vec<CaptionTrack> {
    let Some(tracks) = player
        .get("captions")
        .and_then(|c| c.get("playerCaptionsTracklistRenderer"))
        .and_then(|r| r.get("captionTracks"))
        .and_then(Value::as_array)
    else {
        return Vec::new();
    };

    tracks
        .iter()
        .filter_map(|track| {
            let base_url = track.get("baseUrl")?.as_str()?.to_string();
            let language_code = track.get("languageCode")?.as_str()?.to_string();
            let name = track
                .get("name")
                .and_then(|n| {
                    n.get("simpleText").and_then(Value::as_str).map(String::from).or_else(|| {
                        n.get("runs").and_then(Value::as_array).map(|runs| {
                            runs.iter()
                                .filter_map(|r| r.get("text").and_then(Value::as_str))
                                .collect::<String>()
                        })
                    })
                })
                .unwrap_or_else(|| language_code.clone());
            let is_generated = track.get("kind").and_then(Value::as_str) == Some("asr");

            Some(CaptionTrack {
                base_url,
                language_code,
                name,
                is_generated,
            })
        })
        .collect()
}

/// Pick a track for the first matching language.
///
/// Exact language codes win over primary-subtag matches, and manual tracks
/// win over generated ones.
#[must_use]
pub fn select_track<'a>(tracks: &'a [CaptionTrack], languages: &[String]) -> Option<&'a CaptionTrack> {
    let exact = |lang: &str, generated: bool| {
        tracks
            .iter()
            .find(|t| t.is_generated == generated && t.language_code.eq_ignore_ascii_case(lang))
    };
    let primary = |lang: &str, generated: bool| {
        tracks.iter().find(|t| {
            t.is_generated == generated
                && t.language_code
                    .split('-')
                    .next()
                    .is_some_and(|p| p.eq_ignore_ascii_case(lang))
        })
    };

    languages
        .iter()
        .find_map(|lang| exact(lang, false).or_else(|| exact(lang, true)))
        .or_else(|| {
            languages
                .iter()
                .find_map(|lang| primary(lang, false).or_else(|| primary(lang, true)))
        })
}

/// Reason given by YouTube when the video cannot be played.
fn unplayable_reason(player: &Value) -> Option<String> {
    let status = player.get("playabilityStatus")?;
    let code = status.get("status").and_then(Value::as_str)?;
    if code == "OK" {
        return None;
    }
    let reason = status
        .get("reason")
        .and_then(Value::as_str)
        .unwrap_or(code)
        .to_string();
    Some(reason)
}

/// Build document metadata from `videoDetails` and `microformat`.
fn video_metadata(player: &Value, watch_url: &str) -> DocumentMetadata {
    let mut metadata = DocumentMetadata::new(watch_url, SourceKind::Video);
    let details = player.get("videoDetails");
    let field = |name: &str| {
        details
            .and_then(|d| d.get(name))
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
    };

    metadata.title = field("title");
    metadata.author = field("author");
    metadata.description = field("shortDescription");
    metadata.view_count = field("viewCount").and_then(|v| v.parse().ok());
    metadata.length_seconds = field("lengthSeconds").and_then(|v| v.parse().ok());
    metadata.thumbnail_url = details
        .and_then(|d| d.get("thumbnail"))
        .and_then(|t| t.get("thumbnails"))
        .and_then(Value::as_array)
        .and_then(|thumbs| thumbs.last())
        .and_then(|t| t.get("url"))
        .and_then(Value::as_str)
        .map(String::from);
    metadata.published_at = player
        .get("microformat")
        .and_then(|m| m.get("playerMicroformatRenderer"))
        .and_then(|r| r.get("publishDate"))
        .and_then(Value::as_str)
        .and_then(parse_date);

    metadata
}

/// Parse timed-text XML (`<text>` or srv3 `<p>` segments).
///
/// # Errors
/// Returns an error only if the built-in patterns fail to compile.
pub fn parse_transcript(xml: &str) -> Result<Vec<TranscriptSegment>, LoadError> {
    let text_re = Regex::new(r"(?s)<text\b([^>]*)>(.*?)</text>")?;
    let para_re = Regex::new(r"(?s)<p\b([^>]*)>(.*?)</p>")?;
    let attr_re = Regex::new(r#"([A-Za-z]+)="([^"]*)""#)?;

    let attr = |attrs: &str, name: &str| -> Option<f64> {
        attr_re
            .captures_iter(attrs)
            .find(|c| &c[1] == name)
            .and_then(|c| c[2].parse().ok())
    };

    let mut segments = Vec::new();

    if xml.contains("<text") {
        for caps in text_re.captures_iter(xml) {
            let text = decode_markup(&caps[2]);
            if text.is_empty() {
                continue;
            }
            segments.push(TranscriptSegment {
                start: attr(&caps[1], "start").unwrap_or_default(),
                duration: attr(&caps[1], "dur").unwrap_or_default(),
                text,
            });
        }
    } else {
        for caps in para_re.captures_iter(xml) {
            let text = decode_markup(&caps[2]);
            if text.is_empty() {
                continue;
            }
            segments.push(TranscriptSegment {
                start: attr(&caps[1], "t").unwrap_or_default() / 1000.0,
                duration: attr(&caps[1], "d").unwrap_or_default() / 1000.0,
                text,
            });
        }
    }

    Ok(segments)
}

/// Unescape entities and drop inline formatting tags.
///
/// Timed text is escaped twice (`&amp;#39;`), so the fragment is decoded twice.
fn decode_markup(raw: &str) -> String {
    let once = fragment_text(raw);
    let twice = fragment_text(&once);
    twice.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn fragment_text(raw: &str) -> String {
    Html::parse_fragment(raw)
        .root_element()
        .text()
        .collect::<String>()
}

/// Join transcript lines the way a reader would see them.
#[must_use]
pub fn join_segments(segments: &[TranscriptSegment]) -> String {
    segments
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Seconds covered by the transcript, rounded up.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn transcript_length(segments: &[TranscriptSegment]) -> Option<u32> {
    let end = segments
        .iter()
        .map(|s| s.start + s.duration)
        .fold(0.0_f64, f64::max);
    (end > 0.0).then(|| end.ceil() as u32)
}
