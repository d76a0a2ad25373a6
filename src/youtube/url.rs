//! Video identifier extraction from the two YouTube URL shapes we accept.
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static WATCH_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"youtube\.com/watch\?v=([^&]*)").expect("valid watch regex"));
static SHORT_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"youtu\.be/([^?]*)").expect("valid short-link regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Invalid YouTube video URL")]
pub struct InvalidVideoUrl;

/// Pull the video identifier out of `url`.
///
/// The watch form wins when both markers are present. An identifier that is
/// empty after truncation is rejected like a non-matching URL.
pub fn extract_video_id(url: &str) -> Result<String, InvalidVideoUrl> {
    let caps = WATCH_URL
        .captures(url)
        .or_else(|| SHORT_URL.captures(url))
        .ok_or(InvalidVideoUrl)?;
    match caps.get(1).map(|m| m.as_str()) {
        Some(id) if !id.is_empty() => Ok(id.to_string()),
        _ => Err(InvalidVideoUrl),
    }
}

/// Loose host check used by the degraded existence check.
pub fn mentions_youtube_host(url: &str) -> bool {
    url.contains("youtube.com") || url.contains("youtu.be")
}
