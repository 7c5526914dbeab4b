//! Session command
//!
//! Browse and edit completed sessions.

use anyhow::{bail, Result};
use clap::{ArgGroup, Subcommand};
use colored::Colorize;

use gymtrack_core::error::GymError;
use gymtrack_core::session::{SessionCategory, SessionFilter, SessionUpdate};
use gymtrack_core::types::SessionId;

use super::context::AppContext;
use super::display;

/// Session subcommands
#[derive(Debug, Subcommand)]
pub enum SessionCommand {
    /// List completed sessions, newest first
    List {
        /// Only sessions of this category
        #[arg(long)]
        category: Option<SessionCategory>,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Limit number of sessions
        #[arg(long, short, default_value = "10")]
        limit: usize,
    },

    /// Show session details
    Show {
        /// Session ID
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a session
    Delete {
        /// Session ID
        id: String,

        /// Skip confirmation
        #[arg(long, short)]
        yes: bool,
    },

    /// Change the category or notes of a session
    #[command(group(
        ArgGroup::new("changes")
            .required(true)
            .multiple(true)
            .args(["category", "clear_category", "notes", "clear_notes"])
    ))]
    Update {
        /// Session ID
        id: String,

        /// New category
        #[arg(long, conflicts_with = "clear_category")]
        category: Option<SessionCategory>,

        /// Remove the category
        #[arg(long)]
        clear_category: bool,

        /// New notes
        #[arg(long, conflicts_with = "clear_notes")]
        notes: Option<String>,

        /// Remove the notes
        #[arg(long)]
        clear_notes: bool,
    },
}

/// Execute the session command
pub fn execute(ctx: &AppContext, cmd: SessionCommand) -> Result<()> {
    match cmd {
        SessionCommand::List {
            category,
            json,
            limit,
        } => list_sessions(ctx, category, json, limit),
        SessionCommand::Show { id, json } => show_session(ctx, &id, json),
        SessionCommand::Delete { id, yes } => delete_session(ctx, &id, yes),
        SessionCommand::Update {
            id,
            category,
            clear_category,
            notes,
            clear_notes,
        } => {
            let mut update = SessionUpdate::new();
            if category.is_some() || clear_category {
                update = update.with_category(category);
            }
            if let Some(notes) = notes {
                update = update.with_notes(notes);
            }
            if clear_notes {
                update = update.clear_notes();
            }
            update_session(ctx, &id, update)
        }
    }
}

fn list_sessions(
    ctx: &AppContext,
    category: Option<SessionCategory>,
    as_json: bool,
    limit: usize,
) -> Result<()> {
    let store = ctx.open_store()?;

    let mut filter = SessionFilter::new();
    if let Some(category) = category {
        filter = filter.with_category(category);
    }
    let matching = store.filter(&filter);
    let total = matching.len();
    let sessions: Vec<_> = matching.into_iter().take(limit).collect();

    if as_json {
        println!("{}", serde_json::to_string_pretty(&sessions)?);
        return Ok(());
    }

    if sessions.is_empty() {
        println!("No sessions found.");
        return Ok(());
    }

    println!("{}", "Sessions:".bold().underline());
    println!();

    for session in &sessions {
        println!("  {}", display::session_summary(session, ctx.display()));
    }

    if total > limit {
        println!(
            "\n  {} Showing {} of {} sessions. Use --limit to show more.",
            "ℹ".blue(),
            limit,
            total
        );
    }

    Ok(())
}

fn show_session(ctx: &AppContext, id: &str, as_json: bool) -> Result<()> {
    let store = ctx.open_store()?;
    let session = store
        .get_session_by_id(&SessionId::from_string(id))
        .ok_or_else(|| GymError::SessionNotFound(id.to_string()))?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(session)?);
        return Ok(());
    }

    println!("{}", "Session Details".bold().underline());
    println!();
    display::print_session(session, ctx.display());

    Ok(())
}

fn delete_session(ctx: &AppContext, id: &str, yes: bool) -> Result<()> {
    let mut store = ctx.open_store()?;
    let session_id = SessionId::from_string(id);

    let Some(session) = store.get_session_by_id(&session_id) else {
        return Err(GymError::SessionNotFound(id.to_string()).into());
    };

    if !yes {
        use dialoguer::Confirm;

        println!("Session: {}", display::session_summary(session, ctx.display()));

        let confirmed = Confirm::new()
            .with_prompt("Delete this session?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("Deletion cancelled.");
            return Ok(());
        }
    }

    store.delete_session(&session_id);
    println!("{} Session '{}' deleted.", "✓".green(), id);

    Ok(())
}

fn update_session(ctx: &AppContext, id: &str, update: SessionUpdate) -> Result<()> {
    if update.is_empty() {
        bail!("Nothing to update");
    }

    let mut store = ctx.open_store()?;
    let session = store
        .update_session(&SessionId::from_string(id), update)
        .ok_or_else(|| GymError::SessionNotFound(id.to_string()))?;

    println!(
        "{} Updated {}",
        "✓".green(),
        display::session_summary(session, ctx.display())
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_command_list() {
        // Just verify the enum can be constructed
        let _cmd = SessionCommand::List {
            category: Some(SessionCategory::Legs),
            json: false,
            limit: 10,
        };
    }

    #[test]
    fn test_session_command_show() {
        let _cmd = SessionCommand::Show {
            id: "test".to_string(),
            json: false,
        };
    }
}
