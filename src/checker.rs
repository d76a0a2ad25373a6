//! Video existence checks backed by the YouTube metadata API.
//!
//! Without an API key the checker runs in degraded mode: the plain check only
//! looks at the URL's host, and the channel check always answers "no".
use crate::config;
use crate::model::{ChannelLookup, VideoLookup};
use crate::youtube::{
    extract_video_id, mentions_youtube_host, LookupError, VideoMetadataApi, VideoPart,
    YouTubeClient,
};
use anyhow::Context;
use reqwest::Url;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, instrument};

pub const BASIC_CHECK_MESSAGE: &str = "YouTube API Key not configured, performing basic URL check.";
pub const NO_CHANNEL_CHECK_MESSAGE: &str =
    "YouTube API Key not configured, cannot check channel existence.";
pub const VIDEO_NOT_FOUND_MESSAGE: &str = "Video not found on YouTube.";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckError {
    #[error("Video URL is required")]
    MissingUrl,
    #[error("Video URL and Channel ID are required")]
    MissingParameters,
    #[error("Invalid YouTube video URL")]
    InvalidUrl,
    #[error("Failed to connect to YouTube API: {0}")]
    UpstreamUnavailable(String),
    #[error("An unexpected error occurred: {0}")]
    Upstream(String),
}

impl From<LookupError> for CheckError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::Transport(msg) => CheckError::UpstreamUnavailable(msg),
            LookupError::Decode(msg) => CheckError::Upstream(msg),
        }
    }
}

#[derive(Clone)]
pub struct ExistenceChecker {
    api: Option<Arc<dyn VideoMetadataApi>>,
}

impl fmt::Debug for ExistenceChecker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExistenceChecker")
            .field("has_credential", &self.has_credential())
            .finish()
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

impl ExistenceChecker {
    /// `api` is `None` when no credential is configured.
    pub fn new(api: Option<Arc<dyn VideoMetadataApi>>) -> Self {
        Self { api }
    }

    pub fn degraded() -> Self {
        Self::new(None)
    }

    /// Build the real client when the config carries a key.
    pub fn from_config(cfg: &config::YouTube) -> anyhow::Result<Self> {
        let Some(key) = cfg.credential() else {
            return Ok(Self::degraded());
        };
        let base = Url::parse(&cfg.api_base).context("invalid youtube.api_base")?;
        let client = YouTubeClient::with_base_url(key.to_string(), base)
            .context("failed to build YouTube HTTP client")?;
        Ok(Self::new(Some(Arc::new(client))))
    }

    pub fn has_credential(&self) -> bool {
        self.api.is_some()
    }

    #[instrument(skip_all)]
    pub async fn check_video_exists(&self, url: Option<&str>) -> Result<VideoLookup, CheckError> {
        let url = present(url).ok_or(CheckError::MissingUrl)?;
        let video_id = extract_video_id(url).map_err(|_| CheckError::InvalidUrl)?;

        let Some(api) = &self.api else {
            return Ok(VideoLookup {
                video_id,
                exists: mentions_youtube_host(url),
                message: Some(BASIC_CHECK_MESSAGE.to_string()),
            });
        };

        let found = api.list_videos(&video_id, VideoPart::Id).await?;
        let exists = !found.items.is_empty();
        info!(%video_id, exists, "video existence checked");
        Ok(VideoLookup {
            video_id,
            exists,
            message: None,
        })
    }

    #[instrument(skip_all)]
    pub async fn check_video_in_channel(
        &self,
        url: Option<&str>,
        channel_id: Option<&str>,
    ) -> Result<ChannelLookup, CheckError> {
        let (Some(url), Some(channel_id)) = (present(url), present(channel_id)) else {
            return Err(CheckError::MissingParameters);
        };
        let video_id = extract_video_id(url).map_err(|_| CheckError::InvalidUrl)?;

        let Some(api) = &self.api else {
            return Ok(ChannelLookup {
                video_id,
                exists_in_channel: false,
                message: Some(NO_CHANNEL_CHECK_MESSAGE.to_string()),
            });
        };

        // The API has no membership query; fetch the video and compare its owner.
        let found = api.list_videos(&video_id, VideoPart::Snippet).await?;
        let Some(first) = found.items.first() else {
            return Ok(ChannelLookup {
                video_id,
                exists_in_channel: false,
                message: Some(VIDEO_NOT_FOUND_MESSAGE.to_string()),
            });
        };
        let snippet = first
            .snippet
            .as_ref()
            .ok_or_else(|| CheckError::Upstream("video item has no snippet".to_string()))?;
        let exists_in_channel = snippet.channel_id.as_deref() == Some(channel_id);
        info!(%video_id, exists_in_channel, "channel membership checked");
        Ok(ChannelLookup {
            video_id,
            exists_in_channel,
            message: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn degraded_basic_check_trusts_host() {
        let checker = ExistenceChecker::degraded();
        let res = checker
            .check_video_exists(Some("https://youtu.be/not-a-real-video"))
            .await
            .unwrap();
        assert_eq!(res.video_id, "not-a-real-video");
        assert!(res.exists);
        assert_eq!(res.message.as_deref(), Some(BASIC_CHECK_MESSAGE));
    }

    #[tokio::test]
    async fn degraded_channel_check_is_always_false() {
        let checker = ExistenceChecker::degraded();
        let res = checker
            .check_video_in_channel(Some("https://youtube.com/watch?v=abc"), Some("UC1"))
            .await
            .unwrap();
        assert_eq!(res.video_id, "abc");
        assert!(!res.exists_in_channel);
        assert_eq!(res.message.as_deref(), Some(NO_CHANNEL_CHECK_MESSAGE));
    }

    #[tokio::test]
    async fn missing_and_invalid_inputs() {
        let checker = ExistenceChecker::degraded();
        assert_eq!(checker.check_video_exists(None).await, Err(CheckError::MissingUrl));
        assert_eq!(checker.check_video_exists(Some("")).await, Err(CheckError::MissingUrl));
        assert_eq!(
            checker.check_video_exists(Some("https://example.com/video")).await,
            Err(CheckError::InvalidUrl)
        );
        assert_eq!(
            checker.check_video_in_channel(Some("https://youtu.be/x"), None).await,
            Err(CheckError::MissingParameters)
        );
        assert_eq!(
            checker.check_video_in_channel(None, Some("UC1")).await,
            Err(CheckError::MissingParameters)
        );
        assert_eq!(
            checker
                .check_video_in_channel(Some("https://example.com/v"), Some("UC1"))
                .await,
            Err(CheckError::InvalidUrl)
        );
    }

    #[test]
    fn from_config_without_key_is_degraded() {
        let cfg = config::YouTube::default();
        assert!(!ExistenceChecker::from_config(&cfg).unwrap().has_credential());

        let cfg = config::YouTube {
            api_key: Some("key".into()),
            ..Default::default()
        };
        assert!(ExistenceChecker::from_config(&cfg).unwrap().has_credential());
    }

    #[test]
    fn lookup_errors_map_to_check_errors() {
        assert_eq!(
            CheckError::from(LookupError::Transport("refused".into())),
            CheckError::UpstreamUnavailable("refused".into())
        );
        assert_eq!(
            CheckError::from(LookupError::Decode("bad".into())).to_string(),
            "An unexpected error occurred: bad"
        );
    }
}
