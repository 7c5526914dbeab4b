//! Terminal rendering of sessions

use chrono::{DateTime, Local, Utc};
use colored::Colorize;

use gymtrack_core::config::DisplayConfig;
use gymtrack_core::session::{is_valid_timestamp, ExerciseSet, Session, SessionCategory};

/// Category label, or "Uncategorized"
pub fn category_label(category: Option<SessionCategory>) -> String {
    category
        .map(|c| c.label().to_string())
        .unwrap_or_else(|| "Uncategorized".to_string())
}

/// Local date and time of a timestamp, or "invalid date" for the import sentinel
pub fn format_timestamp(timestamp: &DateTime<Utc>, display: &DisplayConfig) -> String {
    if !is_valid_timestamp(timestamp) {
        return "invalid date".to_string();
    }
    let local = timestamp.with_timezone(&Local);
    format!(
        "{} {}",
        local.format(&display.date_format),
        local.format(&display.time_format)
    )
}

/// Seconds as "1m 30s" or "45s"
pub fn format_seconds(seconds: u32) -> String {
    let (minutes, seconds) = (seconds / 60, seconds % 60);
    match (minutes, seconds) {
        (0, s) => format!("{}s", s),
        (m, 0) => format!("{}m", m),
        (m, s) => format!("{}m {}s", m, s),
    }
}

/// One-line description of a set
pub fn format_set(set: &ExerciseSet, display: &DisplayConfig) -> String {
    let mut parts = Vec::new();
    match (set.reps, set.weight) {
        (Some(reps), Some(weight)) => {
            parts.push(format!("{} x {}", reps, display.format_weight(weight)))
        }
        (Some(reps), None) => parts.push(format!("{} reps", reps)),
        (None, Some(weight)) => parts.push(display.format_weight(weight)),
        (None, None) => {}
    }
    if let Some(duration) = set.duration {
        parts.push(format_seconds(duration));
    }
    if let Some(distance) = set.distance {
        parts.push(display.format_distance(distance));
    }
    if let Some(notes) = &set.notes {
        parts.push(format!("\"{}\"", notes));
    }

    if parts.is_empty() {
        "(empty)".to_string()
    } else {
        parts.join(", ")
    }
}

/// Compact one-line summary used in lists
pub fn session_summary(session: &Session, display: &DisplayConfig) -> String {
    format!(
        "{} {} {} ({} exercises, {} sets, {})",
        session.id.to_string().green(),
        format_timestamp(&session.start_time, display).dimmed(),
        category_label(session.category).cyan(),
        session.exercises.len(),
        session.set_count(),
        session.duration_label()
    )
}

/// Full session with exercises and indexed sets
pub fn print_session(session: &Session, display: &DisplayConfig) {
    println!("  ID: {}", session.id.to_string().green());
    println!("  Category: {}", category_label(session.category).cyan());
    println!(
        "  Started: {}",
        format_timestamp(&session.start_time, display)
    );
    if let Some(end) = &session.end_time {
        println!("  Finished: {}", format_timestamp(end, display));
    }
    println!("  Duration: {}", session.duration_label());
    if let Some(notes) = &session.notes {
        println!("  Notes: {}", notes);
    }

    println!();
    if session.exercises.is_empty() {
        println!("  {}", "No exercises recorded.".dimmed());
        return;
    }

    println!("{}", "Exercises".bold());
    for exercise in &session.exercises {
        println!(
            "  {} {}",
            exercise.name.bold(),
            format!("[{}]", exercise.id).dimmed()
        );
        if let Some(notes) = &exercise.notes {
            println!("      {}", notes.italic());
        }
        for (index, set) in exercise.sets.iter().enumerate() {
            println!("      {}. {}", index, format_set(set, display));
        }
    }
}
