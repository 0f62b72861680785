//! Caption track fetching from YouTube
//!
//! The watch page carries the innertube API key; the player endpoint lists the
//! caption tracks; each track's `baseUrl` serves timed-text XML.

use anyhow::Context;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::Settings;

static API_KEY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""INNERTUBE_API_KEY":\s*"([a-zA-Z0-9_-]+)""#).expect("valid api key regex")
});

static TEXT_ELEMENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<text\b([^>]*)>(.*?)</text>"#).expect("valid caption element regex")
});

static START_ATTR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\bstart="([0-9.]+)""#).expect("valid start attribute regex"));

static DUR_ATTR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\bdur="([0-9.]+)""#).expect("valid dur attribute regex"));

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));

/// Client version reported to the innertube player endpoint.
const INNERTUBE_CLIENT_VERSION: &str = "20.10.38";

/// Reasons a transcript could not be obtained.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TranscriptError {
    #[error("Transcripts Disabled: subtitles are disabled for video {0}")]
    TranscriptsDisabled(String),

    #[error("No Transcript Found: no transcript in [{}] for video {video_id}", languages.join(", "))]
    NoTranscriptFound {
        video_id: String,
        languages: Vec<String>,
    },

    #[error("Malformed Response: {0}")]
    MalformedResponse(String),

    #[error("Unknown Error: {0}")]
    Unknown(String),
}

/// One timed caption.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionLine {
    pub text: String,
    pub start: f64,
    pub duration: f64,
}

/// A caption track advertised by the player response.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionTrack {
    pub language_code: String,
    pub base_url: String,
    pub is_generated: bool,
}

/// Source of caption lines for a video id.
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    async fn fetch(&self, video_id: &str) -> Result<Vec<CaptionLine>, TranscriptError>;
}

/// Fetches captions straight from YouTube.
pub struct YouTubeTranscriptClient {
    http: Client,
    endpoint: String,
    languages: Vec<String>,
}

impl YouTubeTranscriptClient {
    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT_LANGUAGE,
            reqwest::header::HeaderValue::from_static("en-US"),
        );

        let http = Client::builder()
            .timeout(Duration::from_secs(settings.youtube.timeout_secs))
            .default_headers(headers)
            .build()
            .context("Failed to build YouTube HTTP client")?;

        let languages = if settings.youtube.languages.is_empty() {
            vec!["en".to_string()]
        } else {
            settings.youtube.languages.clone()
        };

        Ok(Self {
            http,
            endpoint: settings.youtube.endpoint.trim_end_matches('/').to_string(),
            languages,
        })
    }

    async fn fetch_watch_page(&self, video_id: &str) -> Result<String, TranscriptError> {
        let url = format!("{}/watch?v={}", self.endpoint, video_id);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| TranscriptError::Unknown(format!("failed to fetch watch page: {}", e)))?;

        check_status(response.status())?;

        response
            .text()
            .await
            .map_err(|e| TranscriptError::Unknown(format!("failed to read watch page: {}", e)))
    }

    async fn fetch_player_response(
        &self,
        video_id: &str,
        api_key: &str,
    ) -> Result<Value, TranscriptError> {
        let url = format!("{}/youtubei/v1/player?key={}", self.endpoint, api_key);
        let body = serde_json::json!({
            "context": {
                "client": {
                    "clientName": "ANDROID",
                    "clientVersion": INNERTUBE_CLIENT_VERSION
                }
            },
            "videoId": video_id
        });

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| TranscriptError::Unknown(format!("player request failed: {}", e)))?;

        check_status(response.status())?;

        response.json().await.map_err(|e| {
            TranscriptError::MalformedResponse(format!("player response is not valid JSON: {}", e))
        })
    }

    async fn fetch_caption_xml(&self, track: &CaptionTrack) -> Result<String, TranscriptError> {
        let response = self
            .http
            .get(&track.base_url)
            .send()
            .await
            .map_err(|e| TranscriptError::Unknown(format!("failed to fetch captions: {}", e)))?;

        check_status(response.status())?;

        response
            .text()
            .await
            .map_err(|e| TranscriptError::Unknown(format!("failed to read captions: {}", e)))
    }
}

#[async_trait]
impl TranscriptSource for YouTubeTranscriptClient {
    async fn fetch(&self, video_id: &str) -> Result<Vec<CaptionLine>, TranscriptError> {
        info!("Fetching transcript for video {}", video_id);

        let html = self.fetch_watch_page(video_id).await?;
        if html.contains("g-recaptcha") {
            return Err(TranscriptError::Unknown(
                "request blocked by YouTube bot detection".to_string(),
            ));
        }

        let api_key = extract_api_key(&html).ok_or_else(|| {
            TranscriptError::MalformedResponse("watch page has no innertube API key".to_string())
        })?;
        debug!("Found innertube API key for {}", video_id);

        let player = self.fetch_player_response(video_id, &api_key).await?;
        let tracks = parse_caption_tracks(video_id, &player)?;
        let track = select_track(video_id, &tracks, &self.languages)?;
        debug!(
            "Using {} caption track '{}'",
            if track.is_generated { "generated" } else { "manual" },
            track.language_code
        );

        let xml = self.fetch_caption_xml(track).await?;
        let lines = parse_caption_xml(&xml);
        if lines.is_empty() {
            warn!("Caption track for {} contained no text", video_id);
            return Err(TranscriptError::MalformedResponse(
                "caption track contained no text".to_string(),
            ));
        }

        info!("Fetched {} caption lines for video {}", lines.len(), video_id);
        Ok(lines)
    }
}

fn check_status(status: StatusCode) -> Result<(), TranscriptError> {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(TranscriptError::Unknown(
            "too many requests, YouTube is rate limiting this address".to_string(),
        ));
    }
    if !status.is_success() {
        return Err(TranscriptError::Unknown(format!("HTTP {}", status)));
    }
    Ok(())
}

/// Pull the innertube API key out of a watch page.
pub fn extract_api_key(html: &str) -> Option<String> {
    API_KEY_RE
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Read the caption tracks from a player response.
pub fn parse_caption_tracks(
    video_id: &str,
    player: &Value,
) -> Result<Vec<CaptionTrack>, TranscriptError> {
    check_playability(player)?;

    let renderer = player
        .get("captions")
        .and_then(|c| c.get("playerCaptionsTracklistRenderer"))
        .ok_or_else(|| TranscriptError::TranscriptsDisabled(video_id.to_string()))?;

    let tracks: Vec<CaptionTrack> = renderer
        .get("captionTracks")
        .and_then(Value::as_array)
        .map(|tracks| {
            tracks
                .iter()
                .filter_map(|track| {
                    let language_code = track.get("languageCode")?.as_str()?.to_string();
                    let base_url = track.get("baseUrl")?.as_str()?.replace("&fmt=srv3", "");
                    let is_generated = track.get("kind").and_then(Value::as_str) == Some("asr");
                    Some(CaptionTrack {
                        language_code,
                        base_url,
                        is_generated,
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    if tracks.is_empty() {
        return Err(TranscriptError::TranscriptsDisabled(video_id.to_string()));
    }

    Ok(tracks)
}

fn check_playability(player: &Value) -> Result<(), TranscriptError> {
    let Some(playability) = player.get("playabilityStatus") else {
        return Ok(());
    };

    let status = playability
        .get("status")
        .and_then(Value::as_str)
        .unwrap_or("OK");
    if status == "OK" {
        return Ok(());
    }

    let reason = playability
        .get("reason")
        .and_then(Value::as_str)
        .unwrap_or("no reason given");
    Err(TranscriptError::Unknown(format!(
        "video is not playable ({}): {}",
        status, reason
    )))
}

/// Pick the first track in language preference order, manual before generated.
pub fn select_track<'a>(
    video_id: &str,
    tracks: &'a [CaptionTrack],
    languages: &[String],
) -> Result<&'a CaptionTrack, TranscriptError> {
    for language in languages {
        let matching = |generated: bool| {
            tracks
                .iter()
                .find(|t| t.is_generated == generated && &t.language_code == language)
        };
        if let Some(track) = matching(false).or_else(|| matching(true)) {
            return Ok(track);
        }
    }

    Err(TranscriptError::NoTranscriptFound {
        video_id: video_id.to_string(),
        languages: languages.to_vec(),
    })
}

/// Parse timed-text XML into caption lines, skipping empty ones.
pub fn parse_caption_xml(xml: &str) -> Vec<CaptionLine> {
    TEXT_ELEMENT_RE
        .captures_iter(xml)
        .filter_map(|caps| {
            let attrs = caps.get(1).map_or("", |m| m.as_str());
            let raw = caps.get(2).map_or("", |m| m.as_str());

            let text = clean_caption_text(raw);
            if text.is_empty() {
                return None;
            }

            Some(CaptionLine {
                text,
                start: parse_attr(&START_ATTR_RE, attrs),
                duration: parse_attr(&DUR_ATTR_RE, attrs),
            })
        })
        .collect()
}

fn parse_attr(re: &Regex, attrs: &str) -> f64 {
    re.captures(attrs)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0.0)
}

/// Decode entities (captions are often double-encoded), drop inline tags and
/// collapse whitespace.
fn clean_caption_text(raw: &str) -> String {
    let mut text = raw.to_string();
    for _ in 0..2 {
        let decoded = html_escape::decode_html_entities(&text).into_owned();
        if decoded == text {
            break;
        }
        text = decoded;
    }

    let text = TAG_RE.replace_all(&text, "");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Join caption lines into the transcript text used as context.
pub fn join_caption_text(lines: &[CaptionLine]) -> String {
    lines
        .iter()
        .map(|line| line.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}
