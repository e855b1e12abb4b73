//! Vidsum - YouTube video summaries
//!
//! A small web service that takes a YouTube link, pulls the video's
//! captions and metadata, and asks a generative model for a summary.
//!
//! # Architecture
//!
//! - `config` - Configuration management
//! - `video` - Video ID extraction and metadata lookup
//! - `captions` - Caption retrieval and transcript assembly
//! - `summary` - Prompt assembly and summarization backends
//! - `orchestrator` - Request pipeline
//! - `cli` - Command line and HTTP server
//!
//! # Example
//!
//! ```rust,no_run
//! use vidsum::config::Settings;
//! use vidsum::orchestrator::Orchestrator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let orchestrator = Orchestrator::new(settings)?;
//!
//!     let result = orchestrator
//!         .summarize("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
//!         .await?;
//!     println!("{}: {}", result.title, result.summary);
//!
//!     Ok(())
//! }
//! ```

pub mod captions;
pub mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod openai;
pub mod orchestrator;
pub mod summary;
pub mod video;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{Result, VidsumError};
