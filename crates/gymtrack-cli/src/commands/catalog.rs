//! Catalog command
//!
//! List the predefined exercises and their stable ids.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use gymtrack_core::catalog::{ExerciseCatalog, PredefinedCatalog};
use gymtrack_core::session::SessionCategory;

/// Arguments for the catalog command
#[derive(Debug, Args)]
pub struct CatalogArgs {
    /// Only exercises listed under this category
    #[arg(long)]
    pub category: Option<SessionCategory>,
}

/// Execute the catalog command
pub fn execute(args: CatalogArgs) -> Result<()> {
    let catalog = PredefinedCatalog;
    let entries = catalog.for_category(args.category);

    let title = match args.category {
        Some(category) => format!("{} Exercises", category.label()),
        None => "Exercises".to_string(),
    };
    println!("{}", title.bold().underline());
    println!();

    if entries.is_empty() {
        println!("  {}", "No exercises listed.".dimmed());
        return Ok(());
    }

    let width = entries.iter().map(|e| e.name.len()).max().unwrap_or(0);
    for entry in entries {
        let categories: Vec<&str> = entry.categories.iter().map(|c| c.label()).collect();
        println!(
            "  {:width$}  {}  {}",
            entry.name,
            entry.id.cyan(),
            categories.join(", ").dimmed(),
            width = width
        );
    }
    Ok(())
}
