//! OpenAI chat completion backend.

use super::Summarizer;
use crate::config::SummarySettings;
use crate::error::{Result, VidsumError};
use crate::openai::create_client_with_timeout;
use async_openai::config::OpenAIConfig;
use async_openai::types::{ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs};
use async_openai::Client;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, instrument};

/// OpenAI-based summarizer.
pub struct OpenAISummarizer {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAISummarizer {
    /// Create a summarizer using `OPENAI_API_KEY`.
    pub fn new(settings: &SummarySettings) -> Result<Self> {
        Ok(Self::with_client(
            create_client_with_timeout(Duration::from_secs(settings.timeout_seconds))?,
            settings.model(),
        ))
    }

    /// Create a summarizer with an explicit client.
    pub fn with_client(client: Client<OpenAIConfig>, model: &str) -> Self {
        Self {
            client,
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl Summarizer for OpenAISummarizer {
    fn model(&self) -> &str {
        &self.model
    }

    #[instrument(skip(self, input), fields(chars = input.len()))]
    async fn summarize(&self, input: &str) -> Result<String> {
        let message = ChatCompletionRequestUserMessageArgs::default()
            .content(input)
            .build()
            .map_err(|e| VidsumError::SummaryGeneration(e.to_string()))?;

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(vec![message.into()])
            .build()
            .map_err(|e| VidsumError::SummaryGeneration(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| VidsumError::SummaryGeneration(e.to_string()))?;

        let text = response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| VidsumError::SummaryGeneration("Empty response from LLM".to_string()))?;

        debug!("Generated summary of {} characters", text.len());
        Ok(text)
    }
}
