//! Set command
//!
//! Record and remove sets on exercises in the active session.

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use colored::Colorize;

use gymtrack_core::error::GymError;
use gymtrack_core::session::ExerciseSet;
use gymtrack_core::types::ExerciseId;

use super::context::AppContext;
use super::display;

/// Set subcommands
#[derive(Debug, Subcommand)]
pub enum SetCommand {
    /// Record a set
    Add(SetAddArgs),

    /// Remove a set by its index
    Remove {
        /// Exercise ID
        exercise_id: String,

        /// Zero-based set index as shown by `gymtrack status`
        index: usize,
    },
}

/// Arguments for recording a set
#[derive(Debug, Args)]
pub struct SetAddArgs {
    /// Exercise ID
    pub exercise_id: String,

    /// Repetitions
    #[arg(long, short)]
    pub reps: Option<u32>,

    /// Weight lifted
    #[arg(long, short)]
    pub weight: Option<f64>,

    /// Duration in seconds
    #[arg(long, short)]
    pub duration: Option<u32>,

    /// Distance covered
    #[arg(long)]
    pub distance: Option<f64>,

    /// Free-form note
    #[arg(long, short)]
    pub note: Option<String>,
}

impl SetAddArgs {
    fn to_set(&self) -> Result<ExerciseSet> {
        for (flag, value) in [("--weight", self.weight), ("--distance", self.distance)] {
            if let Some(value) = value {
                if !value.is_finite() || value < 0.0 {
                    bail!("{} must be a non-negative number", flag);
                }
            }
        }

        let set = ExerciseSet {
            reps: self.reps,
            weight: self.weight,
            duration: self.duration,
            distance: self.distance,
            notes: self.note.clone(),
        };
        if set.is_empty() {
            bail!("Provide at least one of --reps, --weight, --duration, --distance or --note");
        }
        Ok(set)
    }
}

/// Execute the set command
pub fn execute(ctx: &AppContext, cmd: SetCommand) -> Result<()> {
    let mut store = ctx.open_store()?;
    if store.active_session().is_none() {
        bail!("No active session. Run 'gymtrack start' first.");
    }

    match cmd {
        SetCommand::Add(args) => {
            let set = args.to_set()?;
            let exercise_id = ExerciseId::from_string(args.exercise_id.as_str());
            let summary = display::format_set(&set, ctx.display());
            if !store.add_set(&exercise_id, set) {
                return Err(GymError::ExerciseNotFound(args.exercise_id).into());
            }
            println!("{} {}: {}", "✓".green(), exercise_id.to_string().cyan(), summary);
        }
        SetCommand::Remove { exercise_id, index } => {
            let id = ExerciseId::from_string(exercise_id.as_str());
            if !store.remove_set(&id, index) {
                let known = store
                    .active_session()
                    .and_then(|s| s.exercise(&id))
                    .is_some();
                if known {
                    bail!("Exercise {} has no set at index {}", id, index);
                }
                return Err(GymError::ExerciseNotFound(exercise_id).into());
            }
            println!("{} Removed set {} from {}", "✓".green(), index, id);
        }
    }
    Ok(())
}
