//! Exercise command
//!
//! Add and remove exercises in the active session.

use anyhow::{bail, Result};
use clap::Subcommand;
use colored::Colorize;

use gymtrack_core::error::GymError;
use gymtrack_core::types::ExerciseId;

use super::context::AppContext;

/// Exercise subcommands
#[derive(Debug, Subcommand)]
pub enum ExerciseCommand {
    /// Add an exercise by name
    Add {
        /// Exercise name; catalog names get a stable id
        name: String,
    },

    /// Remove an exercise and all of its sets
    Remove {
        /// Exercise ID as shown by `gymtrack status`
        id: String,
    },
}

/// Execute the exercise command
pub fn execute(ctx: &AppContext, cmd: ExerciseCommand) -> Result<()> {
    let mut store = ctx.open_store()?;
    if store.active_session().is_none() {
        bail!("No active session. Run 'gymtrack start' first.");
    }

    match cmd {
        ExerciseCommand::Add { name } => {
            let name = name.trim();
            if name.is_empty() {
                bail!("Exercise name must not be empty");
            }
            let Some(id) = store.add_exercise(name) else {
                bail!("No active session. Run 'gymtrack start' first.");
            };
            let known = store.identifier_policy().catalog().by_id(id.as_str()).is_some();
            println!(
                "{} Added {} [{}]{}",
                "✓".green(),
                name.bold(),
                id.to_string().cyan(),
                if known { "" } else { " (custom)" }
            );
        }
        ExerciseCommand::Remove { id } => {
            let exercise_id = ExerciseId::from_string(id.as_str());
            if !store.remove_exercise(&exercise_id) {
                return Err(GymError::ExerciseNotFound(id).into());
            }
            println!("{} Removed exercise {}", "✓".green(), exercise_id);
        }
    }
    Ok(())
}
