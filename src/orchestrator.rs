//! Request orchestrator for Vidsum.
//!
//! Sequences the three collaborator calls behind a single summarize
//! operation: captions, then metadata, then summary generation. The first
//! failure aborts the request.

use crate::captions::{join_segments, CaptionProvider, YoutubeCaptions};
use crate::config::Settings;
use crate::error::{Result, VidsumError};
use crate::summary::{create_summarizer, PromptBuilder, Summarizer};
use crate::video::{extract_video_id, MetadataProvider, YoutubeDataApi};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, field, info, instrument, Span};

/// Summary of a single video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryResult {
    pub title: String,
    #[serde(rename = "thumbnail")]
    pub thumbnail_url: String,
    pub summary: String,
}

/// The main orchestrator for the summarize pipeline.
pub struct Orchestrator {
    settings: Settings,
    prompt: PromptBuilder,
    captions: Arc<dyn CaptionProvider>,
    metadata: Arc<dyn MetadataProvider>,
    summarizer: Arc<dyn Summarizer>,
}

impl Orchestrator {
    /// Create an orchestrator with the YouTube and configured summary backends.
    pub fn new(settings: Settings) -> Result<Self> {
        let captions = Arc::new(YoutubeCaptions::new(&settings.youtube)?);
        let metadata = Arc::new(YoutubeDataApi::new(&settings.youtube)?);
        let summarizer = create_summarizer(&settings)?;

        info!(
            "Summaries via {} ({})",
            settings.summary.provider,
            summarizer.model()
        );

        Ok(Self::with_components(settings, captions, metadata, summarizer))
    }

    /// Create an orchestrator with custom components.
    pub fn with_components(
        settings: Settings,
        captions: Arc<dyn CaptionProvider>,
        metadata: Arc<dyn MetadataProvider>,
        summarizer: Arc<dyn Summarizer>,
    ) -> Self {
        let prompt = PromptBuilder::from_settings(&settings.summary);
        Self {
            settings,
            prompt,
            captions,
            metadata,
            summarizer,
        }
    }

    /// Get the settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Summarize the video behind a user-supplied reference.
    #[instrument(skip(self), fields(video_id))]
    pub async fn summarize(&self, video_reference: &str) -> Result<SummaryResult> {
        if video_reference.trim().is_empty() {
            return Err(VidsumError::Validation("YouTube URL is required.".to_string()));
        }

        let video_id = extract_video_id(video_reference, self.settings.youtube.id_parsing)?;
        Span::current().record("video_id", field::display(&video_id));
        info!("Summarizing video {}", video_id);

        let transcript = self.fetch_transcript(&video_id).await?;
        debug!("Transcript has {} characters", transcript.len());

        let metadata = self.metadata.fetch_metadata(&video_id).await.map_err(|e| match e {
            VidsumError::MetadataNotFound | VidsumError::MetadataFetch(_) => e,
            other => VidsumError::MetadataFetch(other.to_string()),
        })?;

        let input = self.prompt.build(&transcript);
        let summary = self.summarizer.summarize(&input).await.map_err(|e| match e {
            VidsumError::SummaryGeneration(_) => e,
            other => VidsumError::SummaryGeneration(other.to_string()),
        })?;

        info!("Summary ready for {}", video_id);
        Ok(SummaryResult {
            title: metadata.title,
            thumbnail_url: metadata.thumbnail_url,
            summary,
        })
    }

    async fn fetch_transcript(&self, video_id: &str) -> Result<String> {
        let segments = self
            .captions
            .fetch_captions(video_id)
            .await
            .map_err(|e| match e {
                VidsumError::CaptionsDisabled
                | VidsumError::NoCaptionsFound
                | VidsumError::VideoUnavailable
                | VidsumError::TranscriptFetch(_) => e,
                other => VidsumError::TranscriptFetch(other.to_string()),
            })?;

        let transcript = join_segments(&segments);
        if transcript.trim().is_empty() {
            return Err(VidsumError::EmptyTranscript);
        }
        Ok(transcript)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{IdParsing, Truncation};
    use crate::testing::{FakeCaptions, FakeMetadata, FakeSummarizer};
    use std::io::Write;
    use std::sync::Mutex;

    const URL: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";

    struct Harness {
        orchestrator: Orchestrator,
        captions: FakeCaptions,
        metadata: FakeMetadata,
        summarizer: FakeSummarizer,
    }

    fn harness(settings: Settings, captions: FakeCaptions, metadata: FakeMetadata, summarizer: FakeSummarizer) -> Harness {
        let orchestrator = Orchestrator::with_components(
            settings,
            Arc::new(captions.clone()),
            Arc::new(metadata.clone()),
            Arc::new(summarizer.clone()),
        );
        Harness {
            orchestrator,
            captions,
            metadata,
            summarizer,
        }
    }

    fn default_harness() -> Harness {
        harness(
            Settings::default(),
            FakeCaptions::new(&["hello", "world"]),
            FakeMetadata::default(),
            FakeSummarizer::new("Summary X"),
        )
    }

    #[tokio::test]
    async fn test_happy_path() {
        let h = default_harness();
        let result = h.orchestrator.summarize(URL).await.unwrap();

        assert_eq!(result.title, "Title of dQw4w9WgXcQ");
        assert_eq!(result.thumbnail_url, "https://i.ytimg.com/vi/dQw4w9WgXcQ/hqdefault.jpg");
        assert_eq!(result.summary, "Summary X");
        assert_eq!(*h.captions.calls.lock().unwrap(), vec!["dQw4w9WgXcQ"]);
        assert_eq!(*h.metadata.calls.lock().unwrap(), vec!["dQw4w9WgXcQ"]);

        let inputs = h.summarizer.calls.lock().unwrap();
        assert!(inputs[0].starts_with("hello world\n\n"));
    }

    #[tokio::test]
    async fn test_empty_reference_makes_no_calls() {
        let h = default_harness();
        for reference in ["", "   "] {
            let err = h.orchestrator.summarize(reference).await.unwrap_err();
            assert_eq!(err.to_string(), "YouTube URL is required.");
            assert_eq!(err.status_code(), 400);
        }
        assert!(h.captions.calls.lock().unwrap().is_empty());
        assert!(h.metadata.calls.lock().unwrap().is_empty());
        assert!(h.summarizer.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_url_makes_no_calls() {
        let h = default_harness();
        let err = h.orchestrator.summarize("https://example.com/video").await.unwrap_err();
        assert!(matches!(err, VidsumError::Validation(_)));
        assert!(h.captions.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_split_mode_passes_raw_suffix() {
        let mut settings = Settings::default();
        settings.youtube.id_parsing = IdParsing::Split;
        let h = harness(
            settings,
            FakeCaptions::new(&["text"]),
            FakeMetadata::default(),
            FakeSummarizer::new("s"),
        );

        h.orchestrator.summarize("no-equals-here").await.unwrap();
        assert_eq!(*h.captions.calls.lock().unwrap(), vec!["no-equals-here"]);
    }

    #[tokio::test]
    async fn test_captions_disabled_stops_pipeline() {
        let h = harness(
            Settings::default(),
            FakeCaptions::failing(|| VidsumError::CaptionsDisabled),
            FakeMetadata::default(),
            FakeSummarizer::new("s"),
        );

        let err = h.orchestrator.summarize(URL).await.unwrap_err();
        assert_eq!(err.to_string(), "Captions are disabled for this video.");
        assert!(h.metadata.calls.lock().unwrap().is_empty());
        assert!(h.summarizer.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_other_caption_errors_are_wrapped() {
        let h = harness(
            Settings::default(),
            FakeCaptions::failing(|| VidsumError::Unexpected("socket closed".to_string())),
            FakeMetadata::default(),
            FakeSummarizer::new("s"),
        );

        let err = h.orchestrator.summarize(URL).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unexpected error fetching transcripts: socket closed"
        );
        assert_eq!(err.status_code(), 500);
    }

    #[tokio::test]
    async fn test_empty_transcript() {
        for texts in [&[][..], &[""][..]] {
            let h = harness(
                Settings::default(),
                FakeCaptions::new(texts),
                FakeMetadata::default(),
                FakeSummarizer::new("s"),
            );
            let err = h.orchestrator.summarize(URL).await.unwrap_err();
            assert!(matches!(err, VidsumError::EmptyTranscript));
            assert!(h.metadata.calls.lock().unwrap().is_empty());
        }
    }

    #[tokio::test]
    async fn test_metadata_not_found() {
        let h = harness(
            Settings::default(),
            FakeCaptions::new(&["text"]),
            FakeMetadata::failing(|| VidsumError::MetadataNotFound),
            FakeSummarizer::new("s"),
        );

        let err = h.orchestrator.summarize(URL).await.unwrap_err();
        assert_eq!(err.status_code(), 500);
        assert!(err.to_string().contains("Video details not found."));
        assert!(h.summarizer.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_summarizer_failure() {
        let h = harness(
            Settings::default(),
            FakeCaptions::new(&["text"]),
            FakeMetadata::default(),
            FakeSummarizer::failing("quota exceeded"),
        );

        let err = h.orchestrator.summarize(URL).await.unwrap_err();
        assert_eq!(err.to_string(), "Error generating summary: quota exceeded");
    }

    #[tokio::test]
    async fn test_skip_leading_input() {
        let mut settings = Settings::default();
        settings.summary.truncation = Truncation::SkipLeading;
        let words: Vec<String> = (0..100).map(|i| format!("word{}", i)).collect();
        let texts: Vec<&str> = words.iter().map(String::as_str).collect();
        let h = harness(
            settings.clone(),
            FakeCaptions::new(&texts),
            FakeMetadata::default(),
            FakeSummarizer::new("s"),
        );

        h.orchestrator.summarize(URL).await.unwrap();

        let transcript = words.join(" ");
        assert!(transcript.len() >= 300);
        let expected = format!("{}{}", transcript, settings.summary.instruction);
        assert_eq!(h.summarizer.calls.lock().unwrap()[0], expected[300..]);
    }

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_span_records_video_id() {
        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let h = default_harness();
        h.orchestrator
            .summarize("https://youtu.be/dQw4w9WgXcQ?si=share")
            .await
            .unwrap();

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("Summary ready for dQw4w9WgXcQ"), "{}", output);
        assert!(output.contains("video_id=dQw4w9WgXcQ"), "{}", output);
    }
}
