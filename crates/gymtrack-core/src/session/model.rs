//! Session data models

use crate::types::{ExerciseId, SessionId};
use chrono::{DateTime, Local, NaiveDate, Offset, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Workout category of a session
///
/// Persisted as a camelCase token, never as a numeric code, so stored data
/// survives reordering of the variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionCategory {
    Legs,
    Chest,
    Back,
    Arms,
    Shoulders,
    Mixed,
    Core,
    Cardio,
    FullBody,
    CrossFit,
}

impl SessionCategory {
    /// All categories in display order
    pub const ALL: [SessionCategory; 10] = [
        SessionCategory::Legs,
        SessionCategory::Chest,
        SessionCategory::Back,
        SessionCategory::Arms,
        SessionCategory::Shoulders,
        SessionCategory::Core,
        SessionCategory::Cardio,
        SessionCategory::FullBody,
        SessionCategory::CrossFit,
        SessionCategory::Mixed,
    ];

    /// Stable storage token
    pub fn token(&self) -> &'static str {
        match self {
            SessionCategory::Legs => "legs",
            SessionCategory::Chest => "chest",
            SessionCategory::Back => "back",
            SessionCategory::Arms => "arms",
            SessionCategory::Shoulders => "shoulders",
            SessionCategory::Mixed => "mixed",
            SessionCategory::Core => "core",
            SessionCategory::Cardio => "cardio",
            SessionCategory::FullBody => "fullBody",
            SessionCategory::CrossFit => "crossFit",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            SessionCategory::FullBody => "Full Body",
            SessionCategory::CrossFit => "CrossFit",
            SessionCategory::Legs => "Legs",
            SessionCategory::Chest => "Chest",
            SessionCategory::Back => "Back",
            SessionCategory::Arms => "Arms",
            SessionCategory::Shoulders => "Shoulders",
            SessionCategory::Mixed => "Mixed",
            SessionCategory::Core => "Core",
            SessionCategory::Cardio => "Cardio",
        }
    }

    /// Look up a category by its storage token (exact match)
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.token() == token)
    }
}

impl fmt::Display for SessionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for SessionCategory {
    type Err = crate::GymError;

    /// Accepts the storage token or the label, ignoring case and separators
    fn from_str(s: &str) -> crate::Result<Self> {
        let wanted: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        Self::ALL
            .into_iter()
            .find(|c| c.token().to_ascii_lowercase() == wanted)
            .ok_or_else(|| crate::GymError::Validation(format!("Unknown session category: {}", s)))
    }
}

/// Deserialize an optional category, treating unknown or non-string values
/// as absent
pub(crate) fn lenient_category<'de, D>(deserializer: D) -> std::result::Result<Option<SessionCategory>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match raw {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(token)) => {
            let category = SessionCategory::from_token(&token);
            if category.is_none() {
                warn!("Ignoring unknown session category '{}'", token);
            }
            category
        }
        Some(other) => {
            warn!("Ignoring non-string session category: {}", other);
            None
        }
    })
}

/// One performed set
///
/// Every field is optional: strength sets carry reps/weight, cardio sets
/// duration/distance, and a bodyweight set may carry only a note.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExerciseSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reps: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    /// Seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u32>,
    /// Meters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ExerciseSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Strength set with reps and weight
    pub fn strength(reps: u32, weight: f64) -> Self {
        Self {
            reps: Some(reps),
            weight: Some(weight),
            ..Default::default()
        }
    }

    pub fn with_reps(mut self, reps: u32) -> Self {
        self.reps = Some(reps);
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn with_duration(mut self, seconds: u32) -> Self {
        self.duration = Some(seconds);
        self
    }

    pub fn with_distance(mut self, meters: f64) -> Self {
        self.distance = Some(meters);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// True when no measurement or note is recorded
    pub fn is_empty(&self) -> bool {
        self.reps.is_none()
            && self.weight.is_none()
            && self.duration.is_none()
            && self.distance.is_none()
            && self.notes.is_none()
    }
}

/// A named movement performed within a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    /// Catalog slug or generated token
    pub id: ExerciseId,
    /// Display name
    pub name: String,
    /// Sets in performed order
    #[serde(default)]
    pub sets: Vec<ExerciseSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Exercise {
    /// Create an exercise with no sets
    pub fn new(id: ExerciseId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            sets: Vec::new(),
            notes: None,
        }
    }

    /// Number of recorded sets
    pub fn set_count(&self) -> usize {
        self.sets.len()
    }
}

/// One recorded workout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Unique session identifier
    pub id: SessionId,
    /// When the workout started
    pub start_time: DateTime<Utc>,
    /// When the workout finished; absent while active
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    /// Workout category
    #[serde(
        rename = "sessionType",
        alias = "category",
        default,
        deserialize_with = "lenient_category",
        skip_serializing_if = "Option::is_none"
    )]
    pub category: Option<SessionCategory>,
    /// Exercises in insertion order
    #[serde(default)]
    pub exercises: Vec<Exercise>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Session {
    /// Create an active session starting now
    pub fn new(id: SessionId, category: Option<SessionCategory>) -> Self {
        Self::started_at(id, Utc::now(), category)
    }

    /// Create an active session with an explicit start time
    pub fn started_at(
        id: SessionId,
        start_time: DateTime<Utc>,
        category: Option<SessionCategory>,
    ) -> Self {
        Self {
            id,
            start_time,
            end_time: None,
            category,
            exercises: Vec::new(),
            notes: None,
        }
    }

    /// A session without an end time is still in progress
    pub fn is_active(&self) -> bool {
        self.end_time.is_none()
    }

    /// Identity comparison
    pub fn same_session(&self, other: &Session) -> bool {
        self.id == other.id
    }

    /// Calendar date of the start time in local time
    pub fn local_date(&self) -> NaiveDate {
        self.date_in(&Local)
    }

    /// Calendar date of the start time in the given time zone
    ///
    /// Falls back to the UTC date when the shifted time is out of range.
    pub fn date_in<Tz: TimeZone>(&self, tz: &Tz) -> NaiveDate {
        let utc = self.start_time.naive_utc();
        let offset = tz.offset_from_utc_datetime(&utc).fix();
        utc.checked_add_offset(offset)
            .map(|local| local.date())
            .unwrap_or_else(|| utc.date())
    }

    /// Elapsed time between start and end
    pub fn duration(&self) -> Option<chrono::Duration> {
        self.end_time.map(|end| end - self.start_time)
    }

    /// Duration formatted as "2h 30m" or "45m"; "N/A" while active
    pub fn duration_label(&self) -> String {
        let Some(duration) = self.duration() else {
            return "N/A".to_string();
        };
        let minutes = duration.num_minutes();
        let hours = minutes / 60;
        if hours > 0 {
            format!("{}h {}m", hours, minutes % 60)
        } else {
            format!("{}m", minutes)
        }
    }

    /// Total number of sets across all exercises
    pub fn set_count(&self) -> usize {
        self.exercises.iter().map(Exercise::set_count).sum()
    }

    /// First exercise with the given id
    pub fn exercise(&self, id: &ExerciseId) -> Option<&Exercise> {
        self.exercises.iter().find(|e| &e.id == id)
    }

    /// First exercise with the given id, mutably
    pub fn exercise_mut(&mut self, id: &ExerciseId) -> Option<&mut Exercise> {
        self.exercises.iter_mut().find(|e| &e.id == id)
    }
}

/// Partial update of a completed session
///
/// There is no id field: a session keeps its identifier for
/// its whole life.
#[derive(Debug, Clone, Default)]
pub struct SessionUpdate {
    /// `Some(None)` clears the category
    pub category: Option<Option<SessionCategory>>,
    /// `Some(None)` clears the notes
    pub notes: Option<Option<String>>,
    /// Replaces the whole exercise list
    pub exercises: Option<Vec<Exercise>>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
}

impl SessionUpdate {
    /// Create an empty update
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_category(mut self, category: Option<SessionCategory>) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(Some(notes.into()));
        self
    }

    pub fn clear_notes(mut self) -> Self {
        self.notes = Some(None);
        self
    }

    pub fn with_exercises(mut self, exercises: Vec<Exercise>) -> Self {
        self.exercises = Some(exercises);
        self
    }

    pub fn with_start_time(mut self, start_time: DateTime<Utc>) -> Self {
        self.start_time = Some(start_time);
        self
    }

    pub fn with_end_time(mut self, end_time: DateTime<Utc>) -> Self {
        self.end_time = Some(end_time);
        self
    }

    /// True when nothing would change
    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.notes.is_none()
            && self.exercises.is_none()
            && self.start_time.is_none()
            && self.end_time.is_none()
    }

    /// Merge into a session. Returns true if the start time changed.
    pub fn apply_to(self, session: &mut Session) -> bool {
        if let Some(category) = self.category {
            session.category = category;
        }
        if let Some(notes) = self.notes {
            session.notes = notes;
        }
        if let Some(exercises) = self.exercises {
            session.exercises = exercises;
        }
        if let Some(end_time) = self.end_time {
            session.end_time = Some(end_time);
        }
        match self.start_time {
            Some(start) if start != session.start_time => {
                session.start_time = start;
                true
            }
            _ => false,
        }
    }
}

/// Filter criteria for listing completed sessions
#[derive(Debug, Clone, Default)]
pub struct SessionFilter {
    /// Only this category
    pub category: Option<SessionCategory>,
    /// Local start date on or after
    pub from: Option<NaiveDate>,
    /// Local start date on or before
    pub to: Option<NaiveDate>,
    /// Notes substring (case-insensitive)
    pub notes: Option<String>,
    /// Contains an exercise with this id
    pub exercise: Option<ExerciseId>,
}

impl SessionFilter {
    /// Create a new empty filter
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_category(mut self, category: SessionCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn between(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.from = Some(from);
        self.to = Some(to);
        self
    }

    pub fn with_notes(mut self, needle: impl Into<String>) -> Self {
        self.notes = Some(needle.into());
        self
    }

    pub fn with_exercise(mut self, id: ExerciseId) -> Self {
        self.exercise = Some(id);
        self
    }

    /// Check if a session matches this filter
    pub fn matches(&self, session: &Session) -> bool {
        if let Some(category) = self.category {
            if session.category != Some(category) {
                return false;
            }
        }

        if self.from.is_some() || self.to.is_some() {
            let date = session.local_date();
            if self.from.is_some_and(|from| date < from) {
                return false;
            }
            if self.to.is_some_and(|to| date > to) {
                return false;
            }
        }

        if let Some(ref needle) = self.notes {
            let needle = needle.to_lowercase();
            let hit = session
                .notes
                .as_ref()
                .map(|n| n.to_lowercase().contains(&needle))
                .unwrap_or(false);
            if !hit {
                return false;
            }
        }

        if let Some(ref id) = self.exercise {
            if session.exercise(id).is_none() {
                return false;
            }
        }

        true
    }
}
