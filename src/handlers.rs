//! CLI command handlers.
//!
//! All the file I/O and process-exit decisions live here, keeping the
//! assessment engine itself a pure function of the Dockerfile text.

use crate::assessment::{rule_catalog, AuditRun};
use crate::cli::{Cli, OutputFormat};
use crate::dockerfile;
use crate::dockerignore;
use crate::error::{AuditError, Result};
use crate::optimizer::{OptimizerClient, OptimizerConfig};
use crate::reporter::{
    json::JsonReporter, markdown::MarkdownReporter, terminal::TerminalReporter, Reporter,
};
use colored::Colorize;
use std::fs;
use std::path::Path;
use std::process::ExitCode;
use tracing::info;

/// Handler outcome, decoupled from ExitCode so it stays testable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerResult {
    Success,
    Error(u8),
}

impl From<HandlerResult> for ExitCode {
    fn from(result: HandlerResult) -> Self {
        match result {
            HandlerResult::Success => ExitCode::SUCCESS,
            HandlerResult::Error(code) => ExitCode::from(code),
        }
    }
}

/// Handle --list-rules: print the static catalog, no Dockerfile needed.
pub fn handle_list_rules() -> ExitCode {
    for rule in rule_catalog() {
        let kind = if rule.manual_review {
            "manual review"
        } else {
            "scored"
        };
        println!(
            "{:<5} [{}] {} ({}, {})",
            rule.id.bold(),
            rule.severity,
            rule.title,
            rule.category,
            kind
        );
        println!("      {}", rule.remediation.dimmed());
    }
    ExitCode::SUCCESS
}

/// Handle --dockerignore: generate a default exclusion file.
pub fn handle_dockerignore(cli: &Cli) -> ExitCode {
    let dir = cli
        .path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    match dockerignore::write_default(dir) {
        Ok(Some(path)) => {
            println!("Generated {}", path.display());
            ExitCode::SUCCESS
        }
        Ok(None) => {
            println!("A .dockerignore already exists; leaving it untouched.");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(2)
        }
    }
}

/// Normal mode: read, assess, render, optionally optimize.
pub fn run_audit(cli: &Cli) -> ExitCode {
    match audit(cli) {
        Ok(result) => result.into(),
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::from(2)
        }
    }
}

fn audit(cli: &Cli) -> Result<HandlerResult> {
    let text = read_dockerfile(&cli.path)?;
    let document = dockerfile::parse(&text)?;
    let run = AuditRun::new(cli.path.display().to_string(), &document);

    let rendered = match cli.format {
        OutputFormat::Terminal => TerminalReporter::new(cli.verbose).report(&run),
        OutputFormat::Json => JsonReporter::new().report(&run),
        OutputFormat::Markdown => MarkdownReporter::new().report(&run),
    };

    match &cli.output {
        Some(path) => {
            fs::write(path, &rendered).map_err(|source| AuditError::WriteError {
                path: path.display().to_string(),
                source,
            })?;
            info!(path = %path.display(), "report written");
        }
        None => print!("{rendered}"),
    }

    if cli.optimize {
        optimize(cli, &text, &run)?;
    }

    if run.passed(cli.fail_under) {
        Ok(HandlerResult::Success)
    } else {
        Ok(HandlerResult::Error(1))
    }
}

fn optimize(cli: &Cli, text: &str, run: &AuditRun) -> Result<()> {
    let config = OptimizerConfig::from_env().ok_or_else(|| {
        AuditError::Optimizer(
            "no optimizer endpoint configured; set DOCKER_AUDIT_OPTIMIZER_URL".to_string(),
        )
    })?;
    let client = OptimizerClient::new(config)?;
    let optimized = client.suggest(text, &run.assessment.findings)?;

    if cli.apply {
        let backup = cli.path.with_extension("backup");
        fs::copy(&cli.path, &backup).map_err(|source| AuditError::WriteError {
            path: backup.display().to_string(),
            source,
        })?;
        fs::write(&cli.path, &optimized).map_err(|source| AuditError::WriteError {
            path: cli.path.display().to_string(),
            source,
        })?;
        println!(
            "Optimized Dockerfile written to {} (original saved as {})",
            cli.path.display(),
            backup.display()
        );
    } else {
        println!("\n{}\n\n{}", "Suggested optimized Dockerfile:".bold(), optimized);
    }
    Ok(())
}

fn read_dockerfile(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(AuditError::FileNotFound(path.display().to_string()));
    }
    fs::read_to_string(path).map_err(|source| AuditError::ReadError {
        path: path.display().to_string(),
        source,
    })
}
