//! Summary generation.
//!
//! [`PromptBuilder`] turns a transcript into the text sent to a
//! [`Summarizer`]; the backends live in the submodules.

mod gemini;
mod openai;

pub use gemini::GeminiSummarizer;
pub use openai::OpenAISummarizer;

use crate::config::{Settings, SummaryProvider, SummarySettings, Truncation};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Trait for generative summarization backends.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Model identifier used for generation.
    fn model(&self) -> &str;

    /// Generate a summary for the given input text.
    async fn summarize(&self, input: &str) -> Result<String>;
}

/// Create the summarizer selected in settings.
pub fn create_summarizer(settings: &Settings) -> Result<Arc<dyn Summarizer>> {
    let summarizer: Arc<dyn Summarizer> = match settings.summary.provider {
        SummaryProvider::Gemini => Arc::new(GeminiSummarizer::new(
            &settings.gemini,
            &settings.summary,
        )?),
        SummaryProvider::OpenAI => Arc::new(OpenAISummarizer::new(&settings.summary)?),
    };
    Ok(summarizer)
}

/// Builds summarizer input from a transcript and an instruction.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    instruction: String,
    truncation: Truncation,
    max_input_chars: usize,
    skip_chars: usize,
}

impl PromptBuilder {
    pub fn from_settings(settings: &SummarySettings) -> Self {
        Self {
            instruction: settings.instruction.clone(),
            truncation: settings.truncation,
            max_input_chars: settings.max_input_chars,
            skip_chars: settings.skip_chars,
        }
    }

    /// Build the input text for a transcript.
    ///
    /// Character counts are in Unicode scalar values.
    pub fn build(&self, transcript: &str) -> String {
        match self.truncation {
            Truncation::SkipLeading => transcript
                .chars()
                .chain(self.instruction.chars())
                .skip(self.skip_chars)
                .collect(),
            Truncation::Budget => {
                let kept: String = transcript.chars().take(self.max_input_chars).collect();
                if kept.len() < transcript.len() {
                    debug!(
                        "Transcript truncated to {} characters",
                        self.max_input_chars
                    );
                }
                format!("{}\n\n{}", kept, self.instruction)
            }
        }
    }
}
