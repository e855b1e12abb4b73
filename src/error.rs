//! Error types for Vidsum.

use thiserror::Error;

/// Library-level error type for Vidsum operations.
///
/// The first group of variants is the request taxonomy surfaced to HTTP
/// clients; the rest are infrastructure failures.
#[derive(Error, Debug)]
pub enum VidsumError {
    #[error("{0}")]
    Validation(String),

    #[error("Captions are disabled for this video.")]
    CaptionsDisabled,

    #[error("No subtitles or captions were found for this video.")]
    NoCaptionsFound,

    #[error("The video is unavailable. Please check the URL.")]
    VideoUnavailable,

    #[error("Unexpected error fetching transcripts: {0}")]
    TranscriptFetch(String),

    #[error("Could not retrieve transcript for the provided URL.")]
    EmptyTranscript,

    #[error("Error fetching video details: Video details not found.")]
    MetadataNotFound,

    #[error("Error fetching video details: {0}")]
    MetadataFetch(String),

    #[error("Error generating summary: {0}")]
    SummaryGeneration(String),

    #[error("{0}")]
    Unexpected(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl VidsumError {
    /// Whether the caller can fix this by changing the request.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            VidsumError::Validation(_)
                | VidsumError::EmptyTranscript
                | VidsumError::CaptionsDisabled
                | VidsumError::NoCaptionsFound
                | VidsumError::VideoUnavailable
        )
    }

    /// HTTP status code reported for this error.
    pub fn status_code(&self) -> u16 {
        if self.is_client_error() {
            400
        } else {
            500
        }
    }
}

/// Result type alias for Vidsum operations.
pub type Result<T> = std::result::Result<T, VidsumError>;
