//! Workout session management
//!
//! This module owns the session data model, the persisted store that tracks
//! one in-progress session plus the completed log, and the import path for
//! both current and legacy exports.
//!
//! # Example
//!
//! ```ignore
//! use gymtrack_core::session::{MemoryStore, SessionCategory, SessionStore};
//!
//! let mut store = SessionStore::open(MemoryStore::new());
//! store.start(Some(SessionCategory::Legs));
//! let squat = store.add_exercise("Squat").unwrap();
//! store.add_set(&squat, ExerciseSet::strength(5, 100.0));
//! let finished = store.finish();
//! ```

mod import;
pub mod legacy;
mod model;
mod persistence;
mod store;

// Re-export public API
pub use import::{ImportFormat, ImportReport};
pub use legacy::{
    is_valid_timestamp, LegacyExercise, LegacySession, INVALID_TIMESTAMP, MAX_LEGACY_SET_COUNT,
    UNNAMED_EXERCISE,
};
pub use model::{Exercise, ExerciseSet, Session, SessionCategory, SessionFilter, SessionUpdate};
pub use persistence::memory::MemoryStore;
pub use persistence::{KeyValueStore, ACTIVE_SESSION_KEY, SESSIONS_KEY};
pub use store::SessionStore;
