//! Caption retrieval.
//!
//! A [`CaptionProvider`] returns the ordered caption segments of a video;
//! [`join_segments`] flattens them into the transcript text that gets
//! summarized.

mod youtube;

pub use youtube::YoutubeCaptions;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A single caption line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionSegment {
    /// Caption text.
    pub text: String,
    /// Start time in seconds.
    pub start: f64,
    /// Duration in seconds.
    pub duration: f64,
}

/// Trait for caption sources.
#[async_trait]
pub trait CaptionProvider: Send + Sync {
    /// Fetch the caption segments of a video, in playback order.
    async fn fetch_captions(&self, video_id: &str) -> Result<Vec<CaptionSegment>>;
}

/// Join segment texts with single spaces, preserving order.
pub fn join_segments(segments: &[CaptionSegment]) -> String {
    segments
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}
