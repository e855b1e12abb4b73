//! Configuration settings for Vidsum.

use crate::error::{Result, VidsumError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub youtube: YoutubeSettings,
    pub summary: SummarySettings,
    pub gemini: GeminiSettings,
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Address to bind to.
    pub host: String,
    /// Port to listen on. Overridden by `PORT`.
    pub port: u16,
    /// Allow cross-origin requests from any origin.
    pub cors: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            cors: true,
        }
    }
}

/// How a video identifier is pulled out of a user-supplied reference.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IdParsing {
    /// Parse the URL and accept only known YouTube link shapes.
    #[default]
    Strict,
    /// Take whatever follows the last `=`.
    Split,
}

impl std::str::FromStr for IdParsing {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "strict" => Ok(IdParsing::Strict),
            "split" => Ok(IdParsing::Split),
            _ => Err(format!("Unknown id parsing mode: {}", s)),
        }
    }
}

impl std::fmt::Display for IdParsing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdParsing::Strict => write!(f, "strict"),
            IdParsing::Split => write!(f, "split"),
        }
    }
}

/// YouTube-specific settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct YoutubeSettings {
    /// YouTube Data API key. Overridden by `YOUTUBE_API_KEY`.
    pub api_key: Option<String>,
    /// Base URL of the YouTube Data API.
    pub api_base_url: String,
    /// Base URL used for watch pages and the innertube player endpoint.
    pub watch_base_url: String,
    /// Caption languages to try, in order of preference.
    pub languages: Vec<String>,
    /// Identifier extraction mode.
    pub id_parsing: IdParsing,
    /// Per-request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for YoutubeSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base_url: "https://www.googleapis.com/youtube/v3".to_string(),
            watch_base_url: "https://www.youtube.com".to_string(),
            languages: vec!["en".to_string()],
            id_parsing: IdParsing::Strict,
            timeout_seconds: 30,
        }
    }
}

/// Summarization backend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SummaryProvider {
    /// Google Gemini `generateContent` (default).
    #[default]
    Gemini,
    /// OpenAI chat completions.
    OpenAI,
}

impl std::str::FromStr for SummaryProvider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gemini" | "google" => Ok(SummaryProvider::Gemini),
            "openai" => Ok(SummaryProvider::OpenAI),
            _ => Err(format!("Unknown summary provider: {}", s)),
        }
    }
}

impl SummaryProvider {
    /// Model used when `summary.model` is not set.
    pub fn default_model(&self) -> &'static str {
        match self {
            SummaryProvider::Gemini => "gemini-1.5-flash",
            SummaryProvider::OpenAI => "gpt-4o-mini",
        }
    }
}

impl std::fmt::Display for SummaryProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SummaryProvider::Gemini => write!(f, "gemini"),
            SummaryProvider::OpenAI => write!(f, "openai"),
        }
    }
}

/// How the summarizer input is bounded.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Truncation {
    /// Cut the transcript to `max_input_chars`, then append the instruction.
    #[default]
    Budget,
    /// Drop the first `skip_chars` characters of transcript + instruction.
    SkipLeading,
}

impl std::str::FromStr for Truncation {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "budget" => Ok(Truncation::Budget),
            "skip_leading" => Ok(Truncation::SkipLeading),
            _ => Err(format!("Unknown truncation strategy: {}", s)),
        }
    }
}

impl std::fmt::Display for Truncation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Truncation::Budget => write!(f, "budget"),
            Truncation::SkipLeading => write!(f, "skip_leading"),
        }
    }
}

/// Summary generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarySettings {
    /// Summarization backend.
    pub provider: SummaryProvider,
    /// Model identifier passed to the backend. Defaults per provider.
    pub model: Option<String>,
    /// Instruction appended to the transcript.
    pub instruction: String,
    /// Input bounding strategy.
    pub truncation: Truncation,
    /// Transcript character budget (budget strategy).
    pub max_input_chars: usize,
    /// Leading characters to drop (skip_leading strategy).
    pub skip_chars: usize,
    /// Per-request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for SummarySettings {
    fn default() -> Self {
        Self {
            provider: SummaryProvider::Gemini,
            model: None,
            instruction:
                "You are given the captions of a video. Summarize its content comprehensively."
                    .to_string(),
            truncation: Truncation::Budget,
            max_input_chars: 100_000,
            skip_chars: 300,
            timeout_seconds: 120,
        }
    }
}

impl SummarySettings {
    /// The configured model, or the provider's default.
    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| self.provider.default_model())
    }
}

/// Google Gemini settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiSettings {
    /// Gemini API key. Overridden by `GEMINI_API_KEY`.
    pub api_key: Option<String>,
    /// Base URL of the Generative Language API.
    pub base_url: String,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from the default configuration file plus environment.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    ///
    /// Environment overrides are applied after the file is read.
    pub fn load_from(path: Option<&PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        let mut settings = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            Settings::default()
        };

        settings.apply_env(|key| std::env::var(key).ok())?;
        Ok(settings)
    }

    /// Apply `PORT`, `YOUTUBE_API_KEY` and `GEMINI_API_KEY` overrides.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT").filter(|p| !p.is_empty()) {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| VidsumError::Config(format!("Invalid PORT value: {}", port)))?;
        }
        if let Some(key) = lookup("YOUTUBE_API_KEY").filter(|k| !k.is_empty()) {
            self.youtube.api_key = Some(key);
        }
        if let Some(key) = lookup("GEMINI_API_KEY").filter(|k| !k.is_empty()) {
            self.gemini.api_key = Some(key);
        }
        Ok(())
    }

    /// Check that every credential the configured providers need is present.
    pub fn validate(&self) -> Result<()> {
        if !has_value(&self.youtube.api_key) {
            return Err(VidsumError::Config(
                "YouTube Data API key is not set (youtube.api_key or YOUTUBE_API_KEY)".to_string(),
            ));
        }
        match self.summary.provider {
            SummaryProvider::Gemini if !has_value(&self.gemini.api_key) => {
                Err(VidsumError::Config(
                    "Gemini API key is not set (gemini.api_key or GEMINI_API_KEY)".to_string(),
                ))
            }
            SummaryProvider::OpenAI if std::env::var("OPENAI_API_KEY").is_err() => Err(
                VidsumError::Config("OPENAI_API_KEY is not set".to_string()),
            ),
            _ => Ok(()),
        }
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| VidsumError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vidsum")
            .join("config.toml")
    }
}

fn has_value(value: &Option<String>) -> bool {
    value.as_ref().is_some_and(|v| !v.trim().is_empty())
}
