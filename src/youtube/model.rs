use serde::Deserialize;

/// Subset of the `videos.list` response we read.
#[derive(Deserialize, Debug, Default)]
pub struct VideoListResponse {
    #[serde(default)]
    pub items: Vec<VideoItem>,
}

#[derive(Deserialize, Debug)]
pub struct VideoItem {
    #[serde(default)]
    pub snippet: Option<VideoSnippet>,
}

#[derive(Deserialize, Debug)]
pub struct VideoSnippet {
    #[serde(rename = "channelId", default)]
    pub channel_id: Option<String>,
}
