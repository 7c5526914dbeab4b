//! Import payload decoding
//!
//! An import payload is decoded as one of two shapes: a legacy export
//! (recognized by its marker fields) or an array of current-schema sessions.
//! Anything that is not an array is rejected.

use super::legacy::{convert_legacy_session, is_legacy_format, LegacySession, UNNAMED_EXERCISE};
use super::model::{lenient_category, Exercise, ExerciseSet, Session, SessionCategory};
use crate::error::{GymError, Result};
use crate::identity::IdentifierPolicy;
use crate::types::{ExerciseId, SessionId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Shape of an import payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportFormat {
    /// Previous bit-flag schema
    Legacy,
    /// Current schema
    Current,
}

impl fmt::Display for ImportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportFormat::Legacy => write!(f, "legacy"),
            ImportFormat::Current => write!(f, "current"),
        }
    }
}

/// Outcome of an import
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub format: ImportFormat,
    /// Sessions appended to the collection
    pub imported: usize,
    /// Sessions dropped because their id already existed
    pub duplicates: usize,
    /// Elements that could not be decoded
    pub skipped: usize,
}

impl ImportReport {
    pub(crate) fn new(format: ImportFormat, skipped: usize) -> Self {
        Self {
            format,
            imported: 0,
            duplicates: 0,
            skipped,
        }
    }
}

/// Sessions decoded from a payload, before merging
#[derive(Debug)]
pub(crate) struct DecodedImport {
    pub format: ImportFormat,
    pub sessions: Vec<Session>,
    pub skipped: usize,
}

/// Current-schema session as found in an export
///
/// More lenient than [`Session`]: the id may be missing and exercise ids
/// may be missing or non-string.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportedSession {
    #[serde(default)]
    id: Option<SessionId>,
    start_time: DateTime<Utc>,
    #[serde(default)]
    end_time: Option<DateTime<Utc>>,
    #[serde(
        rename = "sessionType",
        alias = "category",
        default,
        deserialize_with = "lenient_category"
    )]
    category: Option<SessionCategory>,
    #[serde(default)]
    exercises: Vec<ImportedExercise>,
    #[serde(default)]
    notes: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ImportedExercise {
    #[serde(default)]
    id: Option<serde_json::Value>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    sets: Vec<ExerciseSet>,
    #[serde(default)]
    notes: Option<String>,
}

impl ImportedExercise {
    fn into_exercise(self, policy: &IdentifierPolicy) -> Exercise {
        let name = if self.name.trim().is_empty() {
            UNNAMED_EXERCISE.to_string()
        } else {
            self.name
        };
        let id = match self.id {
            Some(serde_json::Value::String(id)) if !id.trim().is_empty() => ExerciseId(id),
            _ => policy.exercise_id(&name),
        };
        Exercise {
            id,
            name,
            sets: self.sets,
            notes: self.notes,
        }
    }
}

impl ImportedSession {
    fn into_session(self, policy: &IdentifierPolicy) -> Session {
        Session {
            id: self.id.unwrap_or_else(|| policy.session_id()),
            start_time: self.start_time,
            end_time: self.end_time,
            category: self.category,
            exercises: self
                .exercises
                .into_iter()
                .map(|e| e.into_exercise(policy))
                .collect(),
            notes: self.notes,
        }
    }
}

/// Classify and decode a payload
///
/// Legacy sessions get fresh ids from the policy. Elements that fail to
/// decode are skipped with a warning and counted.
pub(crate) fn decode_import(data: &serde_json::Value, policy: &IdentifierPolicy) -> Result<DecodedImport> {
    let items = data.as_array().ok_or_else(|| {
        GymError::InvalidImport("expected an array of sessions".to_string())
    })?;

    let format = if is_legacy_format(data) {
        ImportFormat::Legacy
    } else {
        ImportFormat::Current
    };

    let mut sessions = Vec::with_capacity(items.len());
    let mut skipped = 0;

    for (index, item) in items.iter().enumerate() {
        let decoded = match format {
            ImportFormat::Legacy => LegacySession::deserialize(item)
                .map(|legacy| convert_legacy_session(&legacy, policy, || policy.session_id())),
            ImportFormat::Current => {
                ImportedSession::deserialize(item).map(|imported| imported.into_session(policy))
            }
        };

        match decoded {
            Ok(session) => sessions.push(session),
            Err(e) => {
                warn!("Skipping {} import entry {}: {}", format, index, e);
                skipped += 1;
            }
        }
    }

    Ok(DecodedImport {
        format,
        sessions,
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SequentialIdGenerator;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn policy() -> IdentifierPolicy {
        IdentifierPolicy::with_generator(SequentialIdGenerator::new("gen"))
    }

    #[test]
    fn test_rejects_non_array() {
        let err = decode_import(&json!({ "sessions": [] }), &policy()).unwrap_err();
        assert!(matches!(err, GymError::InvalidImport(_)));

        assert!(decode_import(&json!("text"), &policy()).is_err());
        assert!(decode_import(&json!(null), &policy()).is_err());
    }

    #[test]
    fn test_empty_array_is_current_format() {
        let decoded = decode_import(&json!([]), &policy()).unwrap();
        assert_eq!(decoded.format, ImportFormat::Current);
        assert!(decoded.sessions.is_empty());
    }

    #[test]
    fn test_legacy_payload_gets_fresh_ids() {
        let data = json!([
            { "Id": 7, "StartTime": "2024-01-01T10:00:00Z", "EndTime": "2024-01-01T11:00:00Z",
              "SessionType": 4, "Exercises": [] },
            { "Id": 8, "StartTime": "2024-01-02T10:00:00Z", "EndTime": "2024-01-02T11:00:00Z",
              "SessionType": 0, "Exercises": null }
        ]);
        let decoded = decode_import(&data, &policy()).unwrap();

        assert_eq!(decoded.format, ImportFormat::Legacy);
        let ids: Vec<_> = decoded.sessions.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["gen-1", "gen-2"]);
        assert_eq!(decoded.sessions[0].category, Some(SessionCategory::Back));
        assert_eq!(decoded.sessions[1].category, None);
    }

    #[test]
    fn test_current_payload_normalizes_exercise_ids() {
        let data = json!([{
            "id": "abc",
            "date": "2026-01-15",
            "startTime": "2026-01-15T10:00:00Z",
            "sessionType": "legs",
            "exercises": [
                { "id": "squat", "name": "Squat", "sets": [{ "reps": 5, "weight": 100 }] },
                { "id": 3, "name": "Leg Press", "sets": [] },
                { "name": "Sled Push", "sets": [] },
                { "id": "", "name": "", "sets": [] }
            ]
        }]);
        let decoded = decode_import(&data, &policy()).unwrap();
        let session = &decoded.sessions[0];

        assert_eq!(session.id.as_str(), "abc");
        assert_eq!(session.category, Some(SessionCategory::Legs));
        let ids: Vec<_> = session.exercises.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["squat", "leg_press", "gen-1", "gen-2"]);
        assert_eq!(session.exercises[3].name, UNNAMED_EXERCISE);
        assert_eq!(session.exercises[0].sets[0], ExerciseSet::strength(5, 100.0));
    }

    #[test]
    fn test_current_payload_missing_id_gets_fresh_one() {
        let data = json!([{ "startTime": "2026-01-15T10:00:00Z", "exercises": [] }]);
        let decoded = decode_import(&data, &policy()).unwrap();
        assert_eq!(decoded.sessions[0].id.as_str(), "gen-1");
    }

    #[test]
    fn test_undecodable_elements_are_skipped() {
        let data = json!([
            { "id": "ok", "startTime": "2026-01-15T10:00:00Z" },
            { "id": "bad", "startTime": "yesterday" },
            42
        ]);
        let decoded = decode_import(&data, &policy()).unwrap();
        assert_eq!(decoded.sessions.len(), 1);
        assert_eq!(decoded.skipped, 2);
    }
}
