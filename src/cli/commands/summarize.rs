//! Summarize command - one video from the terminal.

use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use anyhow::Result;

/// Run the summarize command.
pub async fn run_summarize(url: &str, json: bool, settings: Settings) -> Result<()> {
    settings.validate()?;
    let orchestrator = Orchestrator::new(settings)?;

    let spinner = Output::spinner("Fetching captions and generating summary...");
    let result = orchestrator.summarize(url).await;
    spinner.finish_and_clear();

    let result = result?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    Output::header(&result.title);
    Output::kv("Thumbnail", &result.thumbnail_url);
    println!();
    println!("{}", result.summary);

    Ok(())
}
