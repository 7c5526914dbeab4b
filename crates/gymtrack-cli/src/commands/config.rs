//! Config command
//!
//! Manage gymtrack configuration.

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use std::fs;
use std::path::Path;

use gymtrack_core::config::Config;

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Show as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the configuration file path
    Path,

    /// Reset to default configuration
    Reset {
        /// Force reset without confirmation
        #[arg(long)]
        force: bool,
    },
}

/// Execute the config command
pub fn execute(cmd: ConfigCommand, config_path: &Path) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => show_config(config_path, json),
        ConfigCommand::Path => {
            println!("{}", config_path.display());
            Ok(())
        }
        ConfigCommand::Reset { force } => reset_config(config_path, force),
    }
}

fn show_config(config_path: &Path, as_json: bool) -> Result<()> {
    let exists = config_path.exists();
    let config = Config::load_or_default(config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&config)?);
        return Ok(());
    }

    println!("{}", "Configuration:".bold().underline());
    if exists {
        println!("{}", config_path.display().to_string().dimmed());
    } else {
        println!(
            "{}",
            format!("{} (not found, using defaults)", config_path.display()).dimmed()
        );
    }
    println!();
    println!("{}", config.to_toml()?);

    Ok(())
}

fn reset_config(config_path: &Path, force: bool) -> Result<()> {
    if !force {
        use dialoguer::Confirm;

        let confirmed = Confirm::new()
            .with_prompt("Reset configuration to defaults?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("Reset cancelled.");
            return Ok(());
        }
    }

    // Backup existing
    if config_path.exists() {
        let backup_path = format!(
            "{}.backup-{}",
            config_path.display(),
            chrono::Local::now().format("%Y%m%d-%H%M%S")
        );
        fs::copy(config_path, &backup_path)?;
        println!("{} Backed up to {}", "✓".green(), backup_path);
    }

    Config::default()
        .save(config_path)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    println!("{} Configuration reset to defaults.", "✓".green());

    Ok(())
}
