//! Session store: the completed log plus the single in-progress session

use super::import::{decode_import, ImportReport};
use super::model::{Exercise, ExerciseSet, Session, SessionCategory, SessionFilter, SessionUpdate};
use super::persistence::{KeyValueStore, ACTIVE_SESSION_KEY, SESSIONS_KEY};
use crate::error::{GymError, Result};
use crate::identity::IdentifierPolicy;
use crate::types::{ExerciseId, SessionId};
use chrono::{Local, NaiveDate, TimeZone, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Owner of all session state
///
/// Every mutation is written through to the key-value store right away.
/// Write failures are logged and swallowed; the in-memory state stays
/// authoritative for the rest of the process.
pub struct SessionStore {
    /// Storage backend
    kv: Arc<dyn KeyValueStore>,
    /// Id assignment
    ids: IdentifierPolicy,
    /// Completed sessions, newest start first
    sessions: Vec<Session>,
    /// In-progress session
    active: Option<Session>,
}

impl SessionStore {
    /// Open a store on the given backend with the default identifier policy
    pub fn open(kv: impl KeyValueStore + 'static) -> Self {
        Self::open_with(Arc::new(kv), IdentifierPolicy::default())
    }

    /// Open a store on a shared backend with a custom identifier policy
    pub fn open_with(kv: Arc<dyn KeyValueStore>, ids: IdentifierPolicy) -> Self {
        let mut store = Self {
            kv,
            ids,
            sessions: Vec::new(),
            active: None,
        };
        store.load();
        store
    }

    /// Re-read both collections from the backend
    pub fn load(&mut self) {
        self.sessions = self.read_sessions();
        sort_newest_first(&mut self.sessions);
        self.active = self.read_active();

        // A crash between the two writes of `finish` leaves the finished
        // session in both places
        let finished_twice = self
            .active
            .as_ref()
            .is_some_and(|active| self.sessions.iter().any(|s| s.same_session(active)));
        if finished_twice {
            warn!("Active session is already in the completed log; clearing it");
            self.active = None;
            self.persist_active();
        }

        debug!(
            "Loaded {} sessions (active: {})",
            self.sessions.len(),
            self.active.is_some()
        );
    }

    /// Write both collections to the backend
    pub fn save(&self) {
        self.persist_sessions();
        self.persist_active();
    }

    /// Start a new active session, replacing any existing one
    pub fn start(&mut self, category: Option<SessionCategory>) -> &Session {
        if let Some(previous) = &self.active {
            info!("Replacing unfinished session {}", previous.id);
        }
        let session = Session::new(self.ids.session_id(), category);
        info!("Started session {}", session.id);
        self.write_json(ACTIVE_SESSION_KEY, &session);
        self.active.insert(session)
    }

    /// Append an exercise to the active session
    pub fn add_exercise(&mut self, name: &str) -> Option<ExerciseId> {
        let active = self.active.as_mut()?;
        let id = self.ids.exercise_id(name);
        active.exercises.push(Exercise::new(id.clone(), name));
        self.persist_active();
        Some(id)
    }

    /// Append a set to the first exercise with the given id
    pub fn add_set(&mut self, exercise_id: &ExerciseId, set: ExerciseSet) -> bool {
        let Some(exercise) = self.active.as_mut().and_then(|s| s.exercise_mut(exercise_id)) else {
            return false;
        };
        exercise.sets.push(set);
        self.persist_active();
        true
    }

    /// Remove the set at `index` from the first exercise with the given id
    pub fn remove_set(&mut self, exercise_id: &ExerciseId, index: usize) -> bool {
        let Some(exercise) = self.active.as_mut().and_then(|s| s.exercise_mut(exercise_id)) else {
            return false;
        };
        if index >= exercise.sets.len() {
            return false;
        }
        exercise.sets.remove(index);
        self.persist_active();
        true
    }

    /// Remove the first exercise with the given id
    pub fn remove_exercise(&mut self, exercise_id: &ExerciseId) -> bool {
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        let Some(pos) = active.exercises.iter().position(|e| &e.id == exercise_id) else {
            return false;
        };
        active.exercises.remove(pos);
        self.persist_active();
        true
    }

    /// Stamp the end time and move the active session into the log
    pub fn finish(&mut self) -> Option<Session> {
        let mut session = self.active.take()?;
        session.end_time = Some(Utc::now());

        self.sessions.push(session.clone());
        sort_newest_first(&mut self.sessions);

        // Log first: a crash in between leaves a duplicate, which `load`
        // resolves, rather than a lost session
        self.persist_sessions();
        self.persist_active();

        info!(
            "Finished session {} ({} exercises, {})",
            session.id,
            session.exercises.len(),
            session.duration_label()
        );
        Some(session)
    }

    /// Discard the active session
    pub fn cancel(&mut self) -> Option<Session> {
        let discarded = self.active.take();
        if let Some(session) = &discarded {
            info!("Cancelled session {}", session.id);
        }
        self.persist_active();
        discarded
    }

    /// Delete a completed session
    pub fn delete_session(&mut self, id: &SessionId) -> bool {
        let Some(pos) = self.sessions.iter().position(|s| &s.id == id) else {
            return false;
        };
        self.sessions.remove(pos);
        self.persist_sessions();
        info!("Deleted session {}", id);
        true
    }

    /// Merge an update into a completed session; the id never changes
    pub fn update_session(&mut self, id: &SessionId, update: SessionUpdate) -> Option<&Session> {
        let session = self.sessions.iter_mut().find(|s| &s.id == id)?;
        if update.apply_to(session) {
            sort_newest_first(&mut self.sessions);
        }
        self.persist_sessions();
        self.get_session_by_id(id)
    }

    /// Look up a completed session
    pub fn get_session_by_id(&self, id: &SessionId) -> Option<&Session> {
        self.sessions.iter().find(|s| &s.id == id)
    }

    /// The in-progress session, if any
    pub fn active_session(&self) -> Option<&Session> {
        self.active.as_ref()
    }

    /// Completed sessions, newest start first
    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    /// Number of completed sessions
    pub fn total_sessions(&self) -> usize {
        self.sessions.len()
    }

    /// Completed sessions matching a filter
    pub fn filter(&self, filter: &SessionFilter) -> Vec<&Session> {
        self.sessions.iter().filter(|s| filter.matches(s)).collect()
    }

    /// Completed sessions grouped by local start date
    pub fn sessions_by_date(&self) -> BTreeMap<NaiveDate, Vec<&Session>> {
        self.sessions_by_date_in(&Local)
    }

    /// Completed sessions grouped by start date in the given time zone
    pub fn sessions_by_date_in<Tz: TimeZone>(&self, tz: &Tz) -> BTreeMap<NaiveDate, Vec<&Session>> {
        let mut grouped: BTreeMap<NaiveDate, Vec<&Session>> = BTreeMap::new();
        for session in &self.sessions {
            grouped.entry(session.date_in(tz)).or_default().push(session);
        }
        grouped
    }

    /// Local dates with at least one completed session
    pub fn dates_with_sessions(&self) -> BTreeSet<NaiveDate> {
        self.dates_with_sessions_in(&Local)
    }

    /// Dates with at least one completed session in the given time zone
    pub fn dates_with_sessions_in<Tz: TimeZone>(&self, tz: &Tz) -> BTreeSet<NaiveDate> {
        self.sessions.iter().map(|s| s.date_in(tz)).collect()
    }

    /// Merge an import payload into the completed log
    ///
    /// Sessions whose id is already present are dropped; existing entries
    /// are never overwritten. Fails only when the payload is not an array.
    pub fn import_sessions(&mut self, data: &serde_json::Value) -> Result<ImportReport> {
        let decoded = decode_import(data, &self.ids)?;
        let mut report = ImportReport::new(decoded.format, decoded.skipped);
        let mut known: HashSet<SessionId> = self.sessions.iter().map(|s| s.id.clone()).collect();

        for session in decoded.sessions {
            if known.insert(session.id.clone()) {
                self.sessions.push(session);
                report.imported += 1;
            } else {
                debug!("Skipping duplicate session {}", session.id);
                report.duplicates += 1;
            }
        }

        if report.imported > 0 {
            sort_newest_first(&mut self.sessions);
            self.persist_sessions();
        }

        info!(
            "Imported {} {} sessions ({} duplicates, {} skipped)",
            report.imported, report.format, report.duplicates, report.skipped
        );
        Ok(report)
    }

    /// Parse a JSON document and import it
    pub fn import_json(&mut self, json: &str) -> Result<ImportReport> {
        let data: serde_json::Value = serde_json::from_str(json)?;
        self.import_sessions(&data)
    }

    /// The identifier policy in use
    pub fn identifier_policy(&self) -> &IdentifierPolicy {
        &self.ids
    }

    fn read_sessions(&self) -> Vec<Session> {
        let raw = match self.kv.get(SESSIONS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                error!("Failed to load sessions: {}", e);
                return Vec::new();
            }
        };

        let items = match serde_json::from_str::<serde_json::Value>(&raw) {
            Ok(serde_json::Value::Array(items)) => items,
            Ok(_) => {
                warn!("Stored sessions are not an array; starting empty");
                return Vec::new();
            }
            Err(e) => {
                warn!("Stored sessions are not valid JSON: {}", e);
                return Vec::new();
            }
        };

        items
            .into_iter()
            .enumerate()
            .filter_map(|(index, item)| match serde_json::from_value::<Session>(item) {
                Ok(session) => Some(session),
                Err(e) => {
                    warn!("Skipping malformed stored session {}: {}", index, e);
                    None
                }
            })
            .collect()
    }

    fn read_active(&self) -> Option<Session> {
        let raw = match self.kv.get(ACTIVE_SESSION_KEY) {
            Ok(raw) => raw?,
            Err(e) => {
                error!("Failed to load active session: {}", e);
                return None;
            }
        };
        match serde_json::from_str::<Session>(&raw) {
            Ok(session) => Some(session),
            Err(e) => {
                warn!("Ignoring malformed active session: {}", e);
                None
            }
        }
    }

    fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        let result = serde_json::to_string(value)
            .map_err(GymError::from)
            .and_then(|json| self.kv.set(key, &json));
        match result {
            Ok(()) => debug!("Persisted '{}'", key),
            Err(e) => error!("Failed to persist '{}': {}", key, e),
        }
    }

    fn persist_sessions(&self) {
        self.write_json(SESSIONS_KEY, &self.sessions);
    }

    fn persist_active(&self) {
        match &self.active {
            Some(session) => self.write_json(ACTIVE_SESSION_KEY, session),
            None => {
                if let Err(e) = self.kv.remove(ACTIVE_SESSION_KEY) {
                    error!("Failed to clear active session: {}", e);
                }
            }
        }
    }
}

/// Stable sort by start time, newest first
fn sort_newest_first(sessions: &mut [Session]) {
    sessions.sort_by(|a, b| b.start_time.cmp(&a.start_time));
}
