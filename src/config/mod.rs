//! Configuration module for Vidsum.
//!
//! Settings come from a TOML file with environment overrides for the port
//! and API credentials.

mod settings;

pub use settings::{
    GeminiSettings, IdParsing, ServerSettings, Settings, SummaryProvider, SummarySettings,
    Truncation, YoutubeSettings,
};
