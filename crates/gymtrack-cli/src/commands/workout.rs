//! Active session lifecycle: start, status, finish, cancel

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use gymtrack_core::session::SessionCategory;

use super::context::AppContext;
use super::display;

/// Arguments for the start command
#[derive(Debug, Args)]
pub struct StartArgs {
    /// Workout category (legs, chest, back, arms, shoulders, core, cardio,
    /// full-body, crossfit, mixed)
    #[arg(long)]
    pub category: Option<SessionCategory>,
}

/// Arguments for the status command
#[derive(Debug, Args)]
pub struct StatusArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn start(ctx: &AppContext, args: StartArgs) -> Result<()> {
    let mut store = ctx.open_store()?;

    if let Some(previous) = store.active_session() {
        eprintln!(
            "{} Discarding unfinished session {} ({} exercises).",
            "⚠".yellow(),
            previous.id,
            previous.exercises.len()
        );
    }

    let session = store.start(args.category);
    println!(
        "{} Started {} session {}",
        "✓".green(),
        display::category_label(session.category).cyan(),
        session.id.to_string().green()
    );
    Ok(())
}

pub fn status(ctx: &AppContext, args: StatusArgs) -> Result<()> {
    let store = ctx.open_store()?;
    let active = store.active_session();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&active)?);
        return Ok(());
    }

    match active {
        Some(session) => {
            let elapsed = chrono::Utc::now().signed_duration_since(session.start_time);
            println!("{}", "Active Session".bold().underline());
            println!();
            display::print_session(session, ctx.display());
            println!();
            println!(
                "  {} {}m elapsed",
                "ℹ".blue(),
                elapsed.num_minutes().max(0)
            );
        }
        None => println!("No active session."),
    }
    Ok(())
}

pub fn finish(ctx: &AppContext) -> Result<()> {
    let mut store = ctx.open_store()?;

    match store.finish() {
        Some(session) => println!(
            "{} Finished {} session {} ({} exercises, {} sets, {})",
            "✓".green(),
            display::category_label(session.category).cyan(),
            session.id.to_string().green(),
            session.exercises.len(),
            session.set_count(),
            session.duration_label()
        ),
        None => eprintln!(
            "{} No active session. Run '{}' first.",
            "⚠".yellow(),
            "gymtrack start".cyan()
        ),
    }
    Ok(())
}

pub fn cancel(ctx: &AppContext) -> Result<()> {
    let mut store = ctx.open_store()?;

    match store.cancel() {
        Some(session) => println!("{} Discarded session {}", "✓".green(), session.id),
        None => eprintln!("{} No active session.", "⚠".yellow()),
    }
    Ok(())
}
