//! Import command
//!
//! Merge sessions from a JSON export, in either the current or the legacy
//! layout, into the completed log.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

use super::context::AppContext;

/// Arguments for the import command
#[derive(Debug, Args)]
pub struct ImportArgs {
    /// JSON file to import
    pub file: PathBuf,

    /// Print the import report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute the import command
pub fn execute(ctx: &AppContext, args: ImportArgs) -> Result<()> {
    let content = fs::read_to_string(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;

    let mut store = ctx.open_store()?;
    let report = store
        .import_json(&content)
        .with_context(|| format!("Failed to import {}", args.file.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{} Imported {} sessions from {} ({} format)",
        "✓".green(),
        report.imported.to_string().cyan(),
        args.file.display(),
        report.format
    );
    if report.duplicates > 0 {
        println!(
            "  {} {} already present, skipped",
            "ℹ".blue(),
            report.duplicates
        );
    }
    if report.skipped > 0 {
        println!(
            "  {} {} entries could not be read",
            "⚠".yellow(),
            report.skipped
        );
    }
    Ok(())
}
