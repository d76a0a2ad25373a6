//! Thin client for the YouTube Data API v3 `videos` endpoint.
//!
//! The service talks to YouTube through [`VideoMetadataApi`] so tests can swap
//! in a recording fake; [`YouTubeClient`] is the reqwest-backed implementation.
use async_trait::async_trait;
use reqwest::{Client, Url};
use std::fmt;
use thiserror::Error;
use tracing::{info, instrument, warn};

pub mod model;
pub mod url;

pub use model::{VideoItem, VideoListResponse, VideoSnippet};
pub use url::{extract_video_id, mentions_youtube_host, InvalidVideoUrl};

const VIDEOS_PATH: &str = "youtube/v3/videos";

/// Which resource parts to request from `videos.list`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoPart {
    Id,
    Snippet,
}

impl VideoPart {
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoPart::Id => "id",
            VideoPart::Snippet => "snippet",
        }
    }
}

/// Failure talking to the metadata API. The text is the underlying cause with
/// the request URL (and thus the API key) stripped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// Could not reach the API or it answered with a non-success status.
    #[error("{0}")]
    Transport(String),
    /// The API answered but the body could not be understood.
    #[error("{0}")]
    Decode(String),
}

#[async_trait]
pub trait VideoMetadataApi: Send + Sync {
    async fn list_videos(
        &self,
        video_id: &str,
        part: VideoPart,
    ) -> Result<VideoListResponse, LookupError>;
}

#[derive(Clone)]
pub struct YouTubeClient {
    http: Client,
    base_url: Url,
    api_key: String,
}

impl fmt::Debug for YouTubeClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("YouTubeClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl YouTubeClient {
    pub fn with_base_url(api_key: String, base_url: Url) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .user_agent(concat!("video-case-api/", env!("CARGO_PKG_VERSION")))
            .no_proxy()
            .build()?;
        Ok(Self {
            http,
            base_url,
            api_key,
        })
    }

    pub fn build_request(
        &self,
        video_id: &str,
        part: VideoPart,
    ) -> Result<reqwest::Request, LookupError> {
        let mut endpoint = self
            .base_url
            .join(VIDEOS_PATH)
            .map_err(|e| LookupError::Transport(format!("invalid YouTube base URL: {}", e)))?;
        endpoint
            .query_pairs_mut()
            .append_pair("id", video_id)
            .append_pair("key", &self.api_key)
            .append_pair("part", part.as_str());
        self.http
            .get(endpoint)
            .build()
            .map_err(|e| LookupError::Transport(e.without_url().to_string()))
    }
}

#[async_trait]
impl VideoMetadataApi for YouTubeClient {
    #[instrument(skip(self, part), fields(part = part.as_str()))]
    async fn list_videos(
        &self,
        video_id: &str,
        part: VideoPart,
    ) -> Result<VideoListResponse, LookupError> {
        let request = self.build_request(video_id, part)?;
        info!(path = %request.url().path(), "querying YouTube videos API");

        let res = self.http.execute(request).await.map_err(|e| {
            let e = e.without_url();
            warn!(error = %e, "YouTube API unreachable");
            LookupError::Transport(e.to_string())
        })?;

        let status = res.status();
        let res = res.error_for_status().map_err(|e| {
            warn!(%status, "YouTube API returned an error status");
            LookupError::Transport(e.without_url().to_string())
        })?;

        let body = res
            .text()
            .await
            .map_err(|e| LookupError::Transport(e.without_url().to_string()))?;
        let payload: VideoListResponse = serde_json::from_str(&body).map_err(|e| {
            warn!(error = %e, "invalid YouTube response JSON");
            LookupError::Decode(format!("invalid YouTube response: {}", e))
        })?;
        info!(items = payload.items.len(), "YouTube lookup finished");
        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn googleapis_client(key: &str) -> YouTubeClient {
        let base = Url::parse("https://www.googleapis.com/").unwrap();
        YouTubeClient::with_base_url(key.to_string(), base).unwrap()
    }

    #[test]
    fn build_request_sets_query() {
        let client = googleapis_client("secret");
        let request = client.build_request("abc123", VideoPart::Snippet).unwrap();
        assert_eq!(request.method(), reqwest::Method::GET);
        assert_eq!(request.url().host_str(), Some("www.googleapis.com"));
        assert_eq!(request.url().path(), "/youtube/v3/videos");
        let pairs: Vec<(String, String)> = request
            .url()
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("id".to_string(), "abc123".to_string()),
                ("key".to_string(), "secret".to_string()),
                ("part".to_string(), "snippet".to_string()),
            ]
        );
    }

    #[test]
    fn build_request_escapes_identifier() {
        let client = googleapis_client("k");
        let request = client.build_request("a&b c", VideoPart::Id).unwrap();
        let id = request
            .url()
            .query_pairs()
            .find(|(k, _)| k == "id")
            .map(|(_, v)| v.into_owned());
        assert_eq!(id.as_deref(), Some("a&b c"));
    }

    #[test]
    fn debug_hides_api_key() {
        let client = googleapis_client("super-secret");
        let shown = format!("{:?}", client);
        assert!(!shown.contains("super-secret"));
    }
}
