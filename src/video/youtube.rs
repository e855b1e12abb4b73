//! YouTube Data API metadata lookups.

use super::{MetadataProvider, VideoMetadata};
use crate::config::YoutubeSettings;
use crate::error::{Result, VidsumError};
use crate::http::build_client;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

/// Client for the `videos` endpoint of the YouTube Data API.
pub struct YoutubeDataApi {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    snippet: Snippet,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    title: String,
    #[serde(default)]
    thumbnails: Thumbnails,
}

#[derive(Debug, Default, Deserialize)]
struct Thumbnails {
    high: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

impl YoutubeDataApi {
    /// Create a client from settings. Requires an API key.
    pub fn new(settings: &YoutubeSettings) -> Result<Self> {
        let api_key = settings
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| VidsumError::Config("YouTube Data API key is not set".to_string()))?;

        Ok(Self::with_client(
            build_client(Duration::from_secs(settings.timeout_seconds))?,
            &settings.api_base_url,
            &api_key,
        ))
    }

    /// Create a client with an explicit HTTP client and endpoint.
    pub fn with_client(client: reqwest::Client, base_url: &str, api_key: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }
}

#[async_trait]
impl MetadataProvider for YoutubeDataApi {
    #[instrument(skip(self))]
    async fn fetch_metadata(&self, video_id: &str) -> Result<VideoMetadata> {
        let url = format!("{}/videos", self.base_url);

        // The key travels in the query string, so errors are stripped of the URL.
        let response = self
            .client
            .get(&url)
            .query(&[("part", "snippet"), ("id", video_id), ("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| VidsumError::MetadataFetch(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(VidsumError::MetadataFetch(format!(
                "Failed to fetch video details: {}",
                status.as_u16()
            )));
        }

        let body: VideoListResponse = response.json().await.map_err(|e| {
            VidsumError::MetadataFetch(format!("Invalid response: {}", e.without_url()))
        })?;

        debug!("Received {} metadata item(s)", body.items.len());
        metadata_from_response(video_id, body)
    }
}

fn metadata_from_response(video_id: &str, body: VideoListResponse) -> Result<VideoMetadata> {
    let item = body
        .items
        .into_iter()
        .next()
        .ok_or(VidsumError::MetadataNotFound)?;

    let thumbnail = item.snippet.thumbnails.high.ok_or_else(|| {
        VidsumError::MetadataFetch("Video has no high-resolution thumbnail".to_string())
    })?;

    Ok(VideoMetadata {
        id: video_id.to_string(),
        title: item.snippet.title,
        thumbnail_url: thumbnail.url,
    })
}
