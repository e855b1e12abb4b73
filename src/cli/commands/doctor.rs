//! Doctor command - verify configuration and credentials.

use crate::cli::{mask_secret, Output};
use crate::config::{Settings, SummaryProvider};
use console::style;
use std::path::Path;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run the doctor command.
pub fn run_doctor(config_path: &Path, settings: &Settings) -> anyhow::Result<()> {
    Output::header("Vidsum Doctor");
    println!();

    let mut checks = Vec::new();

    println!("{}", style("Configuration").bold());
    let config_check = check_config_file(config_path);
    config_check.print();
    checks.push(config_check);

    println!();

    println!("{}", style("API Credentials").bold());
    let credential_checks = check_credentials(settings, std::env::var("OPENAI_API_KEY").ok());
    for check in &credential_checks {
        check.print();
    }
    checks.extend(credential_checks);

    println!();

    println!("{}", style("Summaries").bold());
    let summary_check = CheckResult::ok(
        "Model",
        &format!(
            "{} via {} ({} truncation)",
            settings.summary.model(), settings.summary.provider, settings.summary.truncation
        ),
    );
    summary_check.print();
    checks.push(summary_check);

    println!();

    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before using Vidsum.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! Vidsum is ready to use.");
    }

    Ok(())
}

/// Check if the config file exists.
fn check_config_file(config_path: &Path) -> CheckResult {
    if config_path.exists() {
        CheckResult::ok("Config file", &format!("{}", config_path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            "Create with: vidsum config init",
        )
    }
}

/// Check the credentials the configured providers need.
fn check_credentials(settings: &Settings, openai_key: Option<String>) -> Vec<CheckResult> {
    let mut results = vec![check_key(
        "YouTube Data API key",
        settings.youtube.api_key.as_deref(),
        "Set with: export YOUTUBE_API_KEY='...'",
    )];

    results.push(match settings.summary.provider {
        SummaryProvider::Gemini => check_key(
            "Gemini API key",
            settings.gemini.api_key.as_deref(),
            "Set with: export GEMINI_API_KEY='...'",
        ),
        SummaryProvider::OpenAI => check_key(
            "OPENAI_API_KEY",
            openai_key.as_deref(),
            "Set with: export OPENAI_API_KEY='sk-...'",
        ),
    });

    results
}

fn check_key(name: &str, value: Option<&str>, hint: &str) -> CheckResult {
    match value.map(str::trim) {
        Some(key) if !key.is_empty() => {
            CheckResult::ok(name, &format!("configured ({})", mask_secret(key)))
        }
        Some(_) => CheckResult::error(name, "empty", hint),
        None => CheckResult::error(name, "not set", hint),
    }
}
