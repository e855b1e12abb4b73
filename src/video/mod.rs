//! Video references and metadata.
//!
//! Turns user-supplied links into video identifiers and looks up the title
//! and thumbnail for a video.

mod youtube;

pub use youtube::YoutubeDataApi;

use crate::config::IdParsing;
use crate::error::{Result, VidsumError};
use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use url::Url;

static VIDEO_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{11}$").expect("Invalid regex"));

/// Title and thumbnail of a video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoMetadata {
    /// Video ID.
    pub id: String,
    /// Title.
    pub title: String,
    /// High-resolution thumbnail URL.
    pub thumbnail_url: String,
}

/// Trait for video metadata lookups.
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Fetch metadata for a video by ID.
    async fn fetch_metadata(&self, video_id: &str) -> Result<VideoMetadata>;
}

/// Extract a video ID from a reference using the configured mode.
pub fn extract_video_id(reference: &str, mode: IdParsing) -> Result<String> {
    match mode {
        IdParsing::Split => Ok(split_video_id(reference).to_string()),
        IdParsing::Strict => parse_video_id(reference).ok_or_else(|| {
            VidsumError::Validation(format!("Invalid YouTube URL: {}", reference))
        }),
    }
}

/// Everything after the last `=`, or the whole reference when there is none.
pub fn split_video_id(reference: &str) -> &str {
    reference
        .rsplit_once('=')
        .map(|(_, id)| id)
        .unwrap_or(reference)
}

/// Parse a YouTube link or bare ID into an 11-character video ID.
pub fn parse_video_id(reference: &str) -> Option<String> {
    let input = reference.trim();
    if VIDEO_ID.is_match(input) {
        return Some(input.to_string());
    }

    let url = if input.starts_with("http://") || input.starts_with("https://") {
        Url::parse(input).ok()?
    } else {
        Url::parse(&format!("https://{}", input)).ok()?
    };

    let host = url.host_str()?;
    let host = host
        .strip_prefix("www.")
        .or_else(|| host.strip_prefix("m."))
        .or_else(|| host.strip_prefix("music."))
        .unwrap_or(host);

    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|p| !p.is_empty()).collect())
        .unwrap_or_default();

    let candidate = match host {
        "youtu.be" => segments.first().map(|s| s.to_string()),
        "youtube.com" | "youtube-nocookie.com" => match segments.as_slice() {
            ["watch"] => url
                .query_pairs()
                .find(|(k, _)| k == "v")
                .map(|(_, v)| v.into_owned()),
            [kind, id, ..] if matches!(*kind, "embed" | "shorts" | "live" | "v") => {
                Some(id.to_string())
            }
            _ => None,
        },
        _ => None,
    }?;

    VIDEO_ID.is_match(&candidate).then_some(candidate)
}
