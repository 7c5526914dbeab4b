//! History views: calendar and stats

use anyhow::{bail, Result};
use chrono::{Datelike, NaiveDate};
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use gymtrack_core::session::Session;

use super::context::AppContext;
use super::display;

/// Arguments for the calendar command
#[derive(Debug, Args)]
pub struct CalendarArgs {
    /// Only show one month (YYYY-MM)
    #[arg(long)]
    pub month: Option<String>,

    /// Output as JSON (date -> session count)
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the stats command
#[derive(Debug, Args)]
pub struct StatsArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Aggregate numbers over the completed log
#[derive(Debug, Default, PartialEq, Serialize)]
pub struct WorkoutStats {
    pub total_sessions: usize,
    pub training_days: usize,
    pub longest_streak_days: usize,
    pub total_exercises: usize,
    pub total_sets: usize,
    /// Sum of reps x weight over sets that carry both
    pub total_volume: f64,
    pub average_duration_minutes: Option<i64>,
    pub sessions_by_category: BTreeMap<String, usize>,
    /// Most frequently logged exercise names, at most five
    pub top_exercises: Vec<(String, usize)>,
}

/// Parse a `YYYY-MM` month into its first day
fn parse_month(month: &str) -> Result<NaiveDate> {
    match NaiveDate::parse_from_str(&format!("{}-01", month), "%Y-%m-%d") {
        Ok(date) => Ok(date),
        Err(_) => bail!("Invalid month '{}', expected YYYY-MM", month),
    }
}

pub fn calendar(ctx: &AppContext, args: CalendarArgs) -> Result<()> {
    let store = ctx.open_store()?;
    let month = args.month.as_deref().map(parse_month).transpose()?;

    let grouped: BTreeMap<NaiveDate, Vec<&Session>> = store
        .sessions_by_date()
        .into_iter()
        .filter(|(date, _)| match month {
            Some(first) => date.year() == first.year() && date.month() == first.month(),
            None => true,
        })
        .collect();

    if args.json {
        let counts: BTreeMap<String, usize> = grouped
            .iter()
            .map(|(date, sessions)| (date.format("%Y-%m-%d").to_string(), sessions.len()))
            .collect();
        println!("{}", serde_json::to_string_pretty(&counts)?);
        return Ok(());
    }

    if grouped.is_empty() {
        println!("No sessions found.");
        return Ok(());
    }

    println!("{}", "Training Days".bold().underline());
    println!();
    for (date, sessions) in grouped.iter().rev() {
        let categories: Vec<String> = sessions
            .iter()
            .map(|s| display::category_label(s.category))
            .collect();
        println!(
            "  {}  {} {}  {}",
            date.format(&ctx.display().date_format).to_string().green(),
            sessions.len().to_string().cyan(),
            if sessions.len() == 1 { "session " } else { "sessions" },
            categories.join(", ").dimmed()
        );
    }
    println!();
    println!("  {} {} training days", "ℹ".blue(), grouped.len());
    Ok(())
}

pub fn stats(ctx: &AppContext, args: StatsArgs) -> Result<()> {
    let store = ctx.open_store()?;
    let stats = compute_stats(store.sessions(), &store.dates_with_sessions());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    let display = ctx.display();
    println!("{}", "Training Statistics".bold().underline());
    println!();
    println!("  Sessions: {}", stats.total_sessions.to_string().cyan());
    println!("  Training days: {}", stats.training_days.to_string().cyan());
    println!(
        "  Longest streak: {} days",
        stats.longest_streak_days.to_string().cyan()
    );
    println!("  Exercises: {}", stats.total_exercises);
    println!("  Sets: {}", stats.total_sets);
    println!("  Volume: {}", display.format_weight(stats.total_volume));
    if let Some(minutes) = stats.average_duration_minutes {
        println!("  Average duration: {}m", minutes);
    }

    if !stats.sessions_by_category.is_empty() {
        println!();
        println!("{}", "By Category".bold());
        for (category, count) in &stats.sessions_by_category {
            println!("  {}: {}", category, count.to_string().yellow());
        }
    }

    if !stats.top_exercises.is_empty() {
        println!();
        println!("{}", "Top Exercises".bold());
        for (name, count) in &stats.top_exercises {
            println!("  {} ({} sessions)", name, count);
        }
    }
    Ok(())
}

/// Aggregate the completed log
pub fn compute_stats(sessions: &[Session], dates: &BTreeSet<NaiveDate>) -> WorkoutStats {
    let mut stats = WorkoutStats {
        total_sessions: sessions.len(),
        training_days: dates.len(),
        longest_streak_days: longest_streak(dates),
        ..Default::default()
    };

    let mut durations = Vec::new();
    let mut exercise_counts: HashMap<&str, usize> = HashMap::new();

    for session in sessions {
        *stats
            .sessions_by_category
            .entry(display::category_label(session.category))
            .or_default() += 1;

        if let Some(duration) = session.duration() {
            durations.push(duration.num_minutes());
        }

        stats.total_exercises += session.exercises.len();
        let mut seen = BTreeSet::new();
        for exercise in &session.exercises {
            stats.total_sets += exercise.sets.len();
            stats.total_volume += exercise
                .sets
                .iter()
                .filter_map(|set| Some(f64::from(set.reps?) * set.weight?))
                .sum::<f64>();
            if seen.insert(exercise.name.as_str()) {
                *exercise_counts.entry(exercise.name.as_str()).or_default() += 1;
            }
        }
    }

    if !durations.is_empty() {
        stats.average_duration_minutes = Some(durations.iter().sum::<i64>() / durations.len() as i64);
    }

    let mut top: Vec<(String, usize)> = exercise_counts
        .into_iter()
        .map(|(name, count)| (name.to_string(), count))
        .collect();
    top.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    top.truncate(5);
    stats.top_exercises = top;

    stats
}

/// Longest run of consecutive calendar days
fn longest_streak(dates: &BTreeSet<NaiveDate>) -> usize {
    let mut longest = 0;
    let mut current = 0;
    let mut previous: Option<NaiveDate> = None;

    for &date in dates {
        current = match previous {
            Some(prev) if prev.succ_opt() == Some(date) => current + 1,
            _ => 1,
        };
        longest = longest.max(current);
        previous = Some(date);
    }
    longest
}
