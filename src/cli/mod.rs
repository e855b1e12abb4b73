//! CLI module for Vidsum.

pub mod commands;
mod output;

pub use output::{mask_secret, Output};

use crate::config::{IdParsing, Settings, SummaryProvider, Truncation};
use clap::{Args, Parser, Subcommand};

/// Vidsum - YouTube video summaries
///
/// Fetches the captions and metadata of a YouTube video and asks a
/// generative model for a summary.
#[derive(Parser, Debug)]
#[command(name = "vidsum")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Host to bind to (defaults to server.host)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (defaults to server.port)
        #[arg(short, long, env = "PORT")]
        port: Option<u16>,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },

    /// Summarize a single video and print the result
    Summarize {
        /// YouTube URL or video ID
        url: String,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        pipeline: PipelineArgs,
    },

    /// Check configuration and credentials
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Per-run overrides for the summarize pipeline.
#[derive(Args, Debug, Default)]
pub struct PipelineArgs {
    /// Summary backend (gemini, openai)
    #[arg(long)]
    pub provider: Option<SummaryProvider>,

    /// Model identifier for the summary backend
    #[arg(long)]
    pub model: Option<String>,

    /// Input truncation strategy (budget, skip_leading)
    #[arg(long)]
    pub truncation: Option<Truncation>,

    /// Video ID extraction mode (strict, split)
    #[arg(long)]
    pub id_parsing: Option<IdParsing>,
}

impl PipelineArgs {
    /// Apply the given flags on top of loaded settings.
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(provider) = self.provider {
            settings.summary.provider = provider;
        }
        if let Some(model) = &self.model {
            settings.summary.model = Some(model.clone());
        }
        if let Some(truncation) = self.truncation {
            settings.summary.truncation = truncation;
        }
        if let Some(id_parsing) = self.id_parsing {
            settings.youtube.id_parsing = id_parsing;
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Write the default configuration file if it does not exist
    Init,

    /// Show configuration file path
    Path,
}
