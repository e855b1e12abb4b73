//! Google Gemini `generateContent` backend.

use super::Summarizer;
use crate::config::{GeminiSettings, SummarySettings};
use crate::error::{Result, VidsumError};
use crate::http::build_client;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

/// Gemini-based summarizer.
pub struct GeminiSummarizer {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

impl GeminiSummarizer {
    /// Create a summarizer from settings. Requires an API key.
    pub fn new(gemini: &GeminiSettings, summary: &SummarySettings) -> Result<Self> {
        let api_key = gemini
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| VidsumError::Config("Gemini API key is not set".to_string()))?;

        Ok(Self::with_client(
            build_client(Duration::from_secs(summary.timeout_seconds))?,
            &gemini.base_url,
            &api_key,
            summary.model(),
        ))
    }

    /// Create a summarizer with an explicit HTTP client and endpoint.
    pub fn with_client(client: reqwest::Client, base_url: &str, api_key: &str, model: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl Summarizer for GeminiSummarizer {
    fn model(&self) -> &str {
        &self.model
    }

    #[instrument(skip(self, input), fields(chars = input.len()))]
    async fn summarize(&self, input: &str) -> Result<String> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: input }],
            }],
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| VidsumError::SummaryGeneration(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| VidsumError::SummaryGeneration(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|b| b.error.message)
                .unwrap_or_else(|_| format!("HTTP {}", status.as_u16()));
            return Err(VidsumError::SummaryGeneration(message));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| VidsumError::SummaryGeneration(format!("Invalid response: {}", e)))?;

        let text = response_text(parsed)?;
        debug!("Generated summary of {} characters", text.len());
        Ok(text)
    }
}

/// Concatenated text parts of the first candidate.
fn response_text(response: GenerateContentResponse) -> Result<String> {
    if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(VidsumError::SummaryGeneration(format!(
            "Prompt was blocked: {}",
            reason
        )));
    }

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| VidsumError::SummaryGeneration("Response has no candidates".to_string()))?;

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.is_empty() {
        return Err(VidsumError::SummaryGeneration(format!(
            "Response has no text (finish reason: {})",
            candidate.finish_reason.as_deref().unwrap_or("unknown")
        )));
    }

    Ok(text)
}
