//! Legacy export format and conversion into the current schema
//!
//! The previous version of the app exported sessions with numeric ids, a
//! bit-flag category and one reps/weight pair per exercise plus a set count.
//! Conversion is lossy in two documented ways: multi-category sessions
//! collapse to a single category, and per-set detail is synthesized from the
//! single reps/weight pair.

use super::model::{Exercise, ExerciseSet, Session, SessionCategory};
use crate::identity::IdentifierPolicy;
use crate::types::SessionId;
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

/// Placeholder name for legacy exercises recorded without one
pub const UNNAMED_EXERCISE: &str = "Unnamed Exercise";

/// Sentinel for timestamps that could not be parsed
///
/// One day above the representable minimum, so shifting it into any time
/// zone stays in range.
pub const INVALID_TIMESTAMP: DateTime<Utc> = match NaiveDate::from_ymd_opt(-262_143, 1, 2) {
    Some(date) => match date.and_hms_opt(0, 0, 0) {
        Some(midnight) => DateTime::from_naive_utc_and_offset(midnight, Utc),
        None => DateTime::<Utc>::MAX_UTC,
    },
    None => DateTime::<Utc>::MAX_UTC,
};

/// Upper bound on synthesized sets per legacy exercise
pub const MAX_LEGACY_SET_COUNT: usize = 100;

/// Fields that together mark the first element of a legacy export
const LEGACY_MARKER_FIELDS: [&str; 3] = ["StartTime", "Exercises", "Id"];

/// Legacy category bits in priority order; the first set bit wins
///
/// Bit 32 (CrossFit) is not in the list, so a session tagged only CrossFit
/// imports as `Mixed`.
const LEGACY_CATEGORY_FLAGS: [(i64, SessionCategory); 8] = [
    (1, SessionCategory::Legs),
    (2, SessionCategory::Chest),
    (4, SessionCategory::Back),
    (8, SessionCategory::Shoulders),
    (16, SessionCategory::Core),
    (64, SessionCategory::Cardio),
    (128, SessionCategory::FullBody),
    (512, SessionCategory::Arms),
];

/// Offset-less timestamp layouts, read as local time
const NAIVE_TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// A session record in the legacy export
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LegacySession {
    #[serde(default)]
    pub id: Option<i64>,
    /// Any JSON value; anything but a parseable string is an invalid date
    #[serde(default)]
    pub start_time: serde_json::Value,
    /// Absent when missing, null or not a string
    #[serde(default, deserialize_with = "lenient_text")]
    pub end_time: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    /// Bit flags: Legs=1, Chest=2, Back=4, Shoulders=8, Core=16,
    /// CrossFit=32, Cardio=64, FullBody=128, Mobility=256, Arms=512
    #[serde(default)]
    pub session_type: Option<i64>,
    #[serde(default)]
    pub exercises: Option<Vec<LegacyExercise>>,
    /// Ignored
    #[serde(default)]
    pub duration: Option<String>,
    /// Ignored
    #[serde(default)]
    pub schema_version: Option<i64>,
}

/// An exercise record in the legacy export
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LegacyExercise {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    /// Number of sets performed, all with the same reps and weight
    #[serde(default, deserialize_with = "lenient_count")]
    pub sets: Option<i64>,
    #[serde(default)]
    pub reps: Option<f64>,
    #[serde(default)]
    pub weight: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Strings pass through; any other JSON value reads as absent
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(text)) => Some(text),
        _ => None,
    })
}

/// Integers, integral floats and numeric strings; anything else is absent
fn lenient_count<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let count = match value {
        Some(serde_json::Value::Number(n)) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Some(serde_json::Value::String(text)) => text.trim().parse().ok(),
        _ => None,
    };
    Ok(count)
}

/// Structural sniff: a non-empty array whose first element carries the
/// legacy marker fields. Only the first element is inspected.
pub fn is_legacy_format(data: &serde_json::Value) -> bool {
    let Some(first) = data.as_array().and_then(|items| items.first()) else {
        return false;
    };
    match first.as_object() {
        Some(obj) => LEGACY_MARKER_FIELDS.iter().all(|f| obj.contains_key(*f)),
        None => false,
    }
}

/// Map a legacy bit-flag code to a single category
///
/// `0` means no category. Otherwise the lowest flag in the priority list
/// wins even when several bits are set, and a code with none of the listed
/// bits becomes `Mixed`.
pub fn map_legacy_category(code: i64) -> Option<SessionCategory> {
    if code == 0 {
        return None;
    }
    let category = LEGACY_CATEGORY_FLAGS
        .iter()
        .find(|(bit, _)| code & bit != 0)
        .map(|(_, category)| *category)
        .unwrap_or(SessionCategory::Mixed);
    Some(category)
}

/// Parse a legacy timestamp, returning [`INVALID_TIMESTAMP`] when malformed
pub fn parse_legacy_timestamp(raw: &str) -> DateTime<Utc> {
    let raw = raw.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.with_timezone(&Utc);
    }

    for format in NAIVE_TIMESTAMP_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            if let Some(local) = Local.from_local_datetime(&naive).earliest() {
                return local.with_timezone(&Utc);
            }
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Utc.from_utc_datetime(&midnight);
        }
    }

    warn!("Unparseable legacy timestamp '{}'", raw);
    INVALID_TIMESTAMP
}

/// Read a legacy timestamp field that may hold any JSON value
fn legacy_timestamp_value(value: &serde_json::Value) -> DateTime<Utc> {
    match value.as_str() {
        Some(raw) => parse_legacy_timestamp(raw),
        None => {
            warn!("Legacy timestamp is not a string: {}", value);
            INVALID_TIMESTAMP
        }
    }
}

/// True unless the timestamp is the invalid-date sentinel
pub fn is_valid_timestamp(timestamp: &DateTime<Utc>) -> bool {
    *timestamp != INVALID_TIMESTAMP
}

fn non_blank(text: &Option<String>) -> Option<String> {
    text.as_ref()
        .filter(|t| !t.trim().is_empty())
        .cloned()
}

fn convert_exercise(legacy: &LegacyExercise, policy: &IdentifierPolicy) -> Exercise {
    let name = non_blank(&legacy.name).unwrap_or_else(|| UNNAMED_EXERCISE.to_string());
    let notes = non_blank(&legacy.notes);

    // Zero or negative means "not recorded"
    let reps = legacy
        .reps
        .filter(|r| *r > 0.0)
        .map(|r| r.round() as u32);
    let weight = legacy.weight.filter(|w| *w > 0.0);

    let count = match usize::try_from(legacy.sets.unwrap_or(0).max(0)) {
        Ok(count) if count <= MAX_LEGACY_SET_COUNT => count,
        _ => {
            warn!(
                "Legacy exercise '{}' claims {:?} sets, recording none",
                name, legacy.sets
            );
            0
        }
    };
    let set = ExerciseSet {
        reps,
        weight,
        notes: notes.clone(),
        ..Default::default()
    };

    let mut exercise = Exercise::new(policy.exercise_id(&name), name);
    exercise.sets = vec![set; count];
    exercise.notes = notes;
    exercise
}

/// Convert one legacy session
///
/// `next_session_id` is called exactly once, so the caller decides how
/// imported sessions are identified. Never fails: malformed timestamps
/// become [`INVALID_TIMESTAMP`].
pub fn convert_legacy_session<F>(
    legacy: &LegacySession,
    policy: &IdentifierPolicy,
    mut next_session_id: F,
) -> Session
where
    F: FnMut() -> SessionId,
{
    let exercises = legacy
        .exercises
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|ex| convert_exercise(ex, policy))
        .collect();

    Session {
        id: next_session_id(),
        start_time: legacy_timestamp_value(&legacy.start_time),
        end_time: legacy.end_time.as_deref().map(parse_legacy_timestamp),
        category: map_legacy_category(legacy.session_type.unwrap_or(0)),
        exercises,
        notes: non_blank(&legacy.notes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SequentialIdGenerator;
    use pretty_assertions::assert_eq;
    use chrono::FixedOffset;
    use serde_json::json;

    fn policy() -> IdentifierPolicy {
        IdentifierPolicy::with_generator(SequentialIdGenerator::new("ex"))
    }

    fn legacy_exercise(name: &str, sets: i64, reps: f64, weight: f64) -> LegacyExercise {
        LegacyExercise {
            id: Some(1),
            name: Some(name.to_string()),
            sets: Some(sets),
            reps: Some(reps),
            weight: Some(weight),
            notes: None,
        }
    }

    fn legacy_session(exercises: Vec<LegacyExercise>) -> LegacySession {
        LegacySession {
            id: Some(12),
            start_time: json!("2024-03-05T18:00:00Z"),
            end_time: Some("2024-03-05T19:15:00Z".to_string()),
            notes: Some("Good one".to_string()),
            session_type: Some(1),
            exercises: Some(exercises),
            duration: Some("01:15:00".to_string()),
            schema_version: Some(2),
        }
    }

    #[test]
    fn test_sniff_legacy_format() {
        let legacy = json!([{ "Id": 1, "StartTime": "2024-01-01T10:00:00Z", "Exercises": [] }]);
        assert!(is_legacy_format(&legacy));

        let current = json!([{ "id": "a", "startTime": "2024-01-01T10:00:00Z", "exercises": [] }]);
        assert!(!is_legacy_format(&current));

        let missing_marker = json!([{ "Id": 1, "StartTime": "2024-01-01T10:00:00Z" }]);
        assert!(!is_legacy_format(&missing_marker));

        assert!(!is_legacy_format(&json!([])));
        assert!(!is_legacy_format(&json!({ "Id": 1 })));
        assert!(!is_legacy_format(&json!([1, 2])));
        assert!(!is_legacy_format(&json!([null])));
    }

    #[test]
    fn test_sniff_inspects_first_element_only() {
        let data = json!([
            { "Id": 1, "StartTime": "2024-01-01T10:00:00Z", "Exercises": [] },
            { "id": "whatever" }
        ]);
        assert!(is_legacy_format(&data));
    }

    #[test]
    fn test_category_mapping() {
        assert_eq!(map_legacy_category(0), None);
        assert_eq!(map_legacy_category(1), Some(SessionCategory::Legs));
        assert_eq!(map_legacy_category(3), Some(SessionCategory::Legs));
        assert_eq!(map_legacy_category(6), Some(SessionCategory::Chest));
        assert_eq!(map_legacy_category(8), Some(SessionCategory::Shoulders));
        assert_eq!(map_legacy_category(32), Some(SessionCategory::Mixed));
        assert_eq!(map_legacy_category(32 | 64), Some(SessionCategory::Cardio));
        assert_eq!(map_legacy_category(32 | 16), Some(SessionCategory::Core));
        assert_eq!(map_legacy_category(64 | 512), Some(SessionCategory::Cardio));
        assert_eq!(map_legacy_category(512), Some(SessionCategory::Arms));
        assert_eq!(map_legacy_category(256), Some(SessionCategory::Mixed));
        assert_eq!(map_legacy_category(1024), Some(SessionCategory::Mixed));
    }

    #[test]
    fn test_set_count_synthesizes_identical_sets() {
        let session = legacy_session(vec![legacy_exercise("Squat", 3, 10.0, 50.0)]);
        let converted = convert_legacy_session(&session, &policy(), || SessionId::from_string("s-1"));

        let exercise = &converted.exercises[0];
        assert_eq!(exercise.id.as_str(), "squat");
        assert_eq!(exercise.sets.len(), 3);
        for set in &exercise.sets {
            assert_eq!(set, &ExerciseSet::strength(10, 50.0));
        }
    }

    #[test]
    fn test_zero_set_count_gives_no_sets() {
        let session = legacy_session(vec![
            legacy_exercise("Squat", 0, 10.0, 50.0),
            LegacyExercise {
                name: Some("Plank".to_string()),
                ..Default::default()
            },
        ]);
        let converted = convert_legacy_session(&session, &policy(), || SessionId::from_string("s-1"));

        assert_eq!(converted.exercises.len(), 2);
        assert!(converted.exercises[0].sets.is_empty());
        assert!(converted.exercises[1].sets.is_empty());
    }

    #[test]
    fn test_non_positive_values_are_absent() {
        let session = legacy_session(vec![legacy_exercise("Plank", 2, 0.0, -5.0)]);
        let converted = convert_legacy_session(&session, &policy(), || SessionId::from_string("s-1"));

        let sets = &converted.exercises[0].sets;
        assert_eq!(sets.len(), 2);
        assert_eq!(sets[0].reps, None);
        assert_eq!(sets[0].weight, None);
    }

    #[test]
    fn test_notes_carried_to_sets_and_exercise() {
        let mut exercise = legacy_exercise("Deadlift", 2, 5.0, 140.0);
        exercise.notes = Some("belt".to_string());
        let converted = convert_legacy_session(
            &legacy_session(vec![exercise]),
            &policy(),
            || SessionId::from_string("s-1"),
        );

        let exercise = &converted.exercises[0];
        assert_eq!(exercise.notes.as_deref(), Some("belt"));
        assert!(exercise.sets.iter().all(|s| s.notes.as_deref() == Some("belt")));
        assert_eq!(converted.notes.as_deref(), Some("Good one"));
    }

    #[test]
    fn test_blank_name_gets_placeholder() {
        let mut blank = legacy_exercise("", 1, 5.0, 20.0);
        blank.name = Some("   ".to_string());
        let mut missing = legacy_exercise("", 1, 5.0, 20.0);
        missing.name = None;

        let converted = convert_legacy_session(
            &legacy_session(vec![blank, missing]),
            &policy(),
            || SessionId::from_string("s-1"),
        );
        assert!(converted.exercises.iter().all(|e| e.name == UNNAMED_EXERCISE));
    }

    #[test]
    fn test_missing_exercise_list() {
        let mut session = legacy_session(vec![]);
        session.exercises = None;
        let converted = convert_legacy_session(&session, &policy(), || SessionId::from_string("s-1"));
        assert!(converted.exercises.is_empty());
    }

    #[test]
    fn test_id_generator_called_once_per_session() {
        let mut calls = 0;
        let converted = convert_legacy_session(&legacy_session(vec![]), &policy(), || {
            calls += 1;
            SessionId::from_string(format!("import-{}", calls))
        });
        assert_eq!(calls, 1);
        assert_eq!(converted.id.as_str(), "import-1");
    }

    #[test]
    fn test_timestamps_carried_unchanged() {
        let converted = convert_legacy_session(&legacy_session(vec![]), &policy(), || {
            SessionId::from_string("s-1")
        });
        assert_eq!(converted.start_time.to_rfc3339(), "2024-03-05T18:00:00+00:00");
        assert_eq!(
            converted.end_time.map(|t| t.to_rfc3339()).as_deref(),
            Some("2024-03-05T19:15:00+00:00")
        );
        assert_eq!(converted.duration_label(), "1h 15m");
    }

    #[test]
    fn test_offset_timestamps_normalized_to_same_instant() {
        let parsed = parse_legacy_timestamp("2024-03-05T20:00:00+02:00");
        assert_eq!(parsed.to_rfc3339(), "2024-03-05T18:00:00+00:00");
    }

    #[test]
    fn test_offsetless_timestamp_is_local() {
        let parsed = parse_legacy_timestamp("2024-03-05T18:00:00.123");
        assert!(is_valid_timestamp(&parsed));
        let local = parsed.with_timezone(&Local);
        assert_eq!(local.format("%Y-%m-%d %H:%M").to_string(), "2024-03-05 18:00");
    }

    #[test]
    fn test_malformed_timestamp_is_sentinel() {
        let mut session = legacy_session(vec![]);
        session.start_time = json!("not a date");
        let converted = convert_legacy_session(&session, &policy(), || SessionId::from_string("s-1"));

        assert_eq!(converted.start_time, INVALID_TIMESTAMP);
        assert!(!is_valid_timestamp(&converted.start_time));
        assert!(converted.end_time.is_some_and(|t| is_valid_timestamp(&t)));
    }

    #[test]
    fn test_deserialize_legacy_record() {
        let raw = json!({
            "Id": 4,
            "StartTime": "2024-03-05T18:00:00Z",
            "EndTime": "2024-03-05T19:00:00Z",
            "Notes": null,
            "SessionType": 2,
            "Exercises": [
                { "Id": 1, "Name": "Dips", "Sets": 4, "Reps": 12, "Weight": 0, "Notes": null }
            ],
            "Duration": "01:00:00",
            "SchemaVersion": 1
        });
        let legacy: LegacySession = serde_json::from_value(raw).unwrap();
        let converted = convert_legacy_session(&legacy, &policy(), || SessionId::from_string("s-1"));

        assert_eq!(converted.category, Some(SessionCategory::Chest));
        assert_eq!(converted.notes, None);
        assert_eq!(converted.exercises[0].id.as_str(), "dips");
        assert_eq!(converted.exercises[0].sets.len(), 4);
        assert_eq!(converted.exercises[0].sets[0], ExerciseSet::new().with_reps(12));
    }

    #[test]
    fn test_sentinel_survives_any_offset() {
        let west = FixedOffset::west_opt(23 * 3600 + 59 * 60).unwrap();
        let east = FixedOffset::east_opt(23 * 3600 + 59 * 60).unwrap();
        let shifted = INVALID_TIMESTAMP.with_timezone(&west);
        assert!(shifted.date_naive() < NaiveDate::from_ymd_opt(0, 1, 1).unwrap());
        assert_eq!(
            INVALID_TIMESTAMP.with_timezone(&east).date_naive(),
            NaiveDate::from_ymd_opt(-262_143, 1, 2).unwrap()
        );
    }

    #[test]
    fn test_huge_set_count_records_no_sets() {
        let session = legacy_session(vec![
            legacy_exercise("Squat", i64::MAX, 5.0, 100.0),
            legacy_exercise("Bench", 101, 5.0, 80.0),
            legacy_exercise("Row", 100, 5.0, 60.0),
        ]);
        let converted = convert_legacy_session(&session, &policy(), || SessionId::from_string("s-1"));

        assert!(converted.exercises[0].sets.is_empty());
        assert!(converted.exercises[1].sets.is_empty());
        assert_eq!(converted.exercises[2].sets.len(), MAX_LEGACY_SET_COUNT);
    }

    #[test]
    fn test_null_and_non_string_timestamps_are_kept() {
        let raw = json!({
            "Id": 9,
            "StartTime": null,
            "EndTime": 1709661600,
            "SessionType": 1,
            "Exercises": []
        });
        let legacy: LegacySession = serde_json::from_value(raw).unwrap();
        let converted = convert_legacy_session(&legacy, &policy(), || SessionId::from_string("s-1"));

        assert_eq!(converted.start_time, INVALID_TIMESTAMP);
        assert_eq!(converted.end_time, None);
        assert_eq!(converted.category, Some(SessionCategory::Legs));

        let missing: LegacySession =
            serde_json::from_value(json!({ "Id": 10, "Exercises": [] })).unwrap();
        let converted = convert_legacy_session(&missing, &policy(), || SessionId::from_string("s-2"));
        assert!(!is_valid_timestamp(&converted.start_time));
    }

    #[test]
    fn test_float_and_text_set_counts() {
        let raw = json!({
            "Id": 4,
            "StartTime": "2024-03-05T18:00:00Z",
            "Exercises": [
                { "Name": "Squat", "Sets": 3.0, "Reps": 5, "Weight": 100 },
                { "Name": "Lunge", "Sets": "2", "Reps": 10 },
                { "Name": "Plank", "Sets": 2.5 },
                { "Name": "Curl", "Sets": true }
            ]
        });
        let legacy: LegacySession = serde_json::from_value(raw).unwrap();
        let converted = convert_legacy_session(&legacy, &policy(), || SessionId::from_string("s-1"));

        let counts: Vec<usize> = converted.exercises.iter().map(|e| e.sets.len()).collect();
        assert_eq!(counts, vec![3, 2, 0, 0]);
    }
}
