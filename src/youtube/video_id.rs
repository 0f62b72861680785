//! Video identifier extraction from YouTube URLs

use once_cell::sync::Lazy;
use regex::Regex;

/// Known YouTube URL shapes, tried before the generic path pattern.
static YOUTUBE_URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:youtube\.com/watch\?(?:[^#\s]*&)?v=|youtube\.com/embed/|youtube\.com/v/|youtu\.be/)([A-Za-z0-9_-]{11})(?:[^A-Za-z0-9_-]|$)",
    )
    .expect("valid youtube url regex")
});

/// Any path segment followed by an 11-character id segment.
static PATH_ID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"/[^/?#\s]+/([A-Za-z0-9_-]{11})(?:[^A-Za-z0-9_-]|$)")
        .expect("valid path id regex")
});

/// Extract the 11-character video id from a URL.
///
/// Returns `None` for empty input or when no pattern matches.
pub fn extract_video_id(url: &str) -> Option<String> {
    let url = url.trim();
    if url.is_empty() {
        return None;
    }

    [&*YOUTUBE_URL_RE, &*PATH_ID_RE]
        .iter()
        .find_map(|re| re.captures(url))
        .and_then(|caps| caps.get(1))
        .map(|id| id.as_str().to_string())
}
