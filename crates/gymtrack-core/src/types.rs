//! Identifier types and id generation for gymtrack

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Unique identifier for a workout session
///
/// Freshly generated ids are UUID v4 strings. Older exports stored numeric
/// ids, so a JSON number is accepted on read and kept as its decimal string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl SessionId {
    /// Create a SessionId from a string
    pub fn from_string(s: impl Into<String>) -> Self {
        SessionId(s.into())
    }

    /// Get the string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for SessionId {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => SessionId(s),
            RawId::Number(n) => SessionId(n.to_string()),
        })
    }
}

/// Identifier of an exercise within a session
///
/// Catalog exercises carry a fixed slug (`squat`, `leg_press`); free-text
/// exercises carry a generated token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExerciseId(pub String);

impl ExerciseId {
    /// Create an ExerciseId from a string
    pub fn from_string(s: impl Into<String>) -> Self {
        ExerciseId(s.into())
    }

    /// Get the string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExerciseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Source of fresh unique tokens
///
/// Injected into the identifier policy so tests can swap in a deterministic
/// sequence. Any `Fn() -> String` closure is a generator too.
pub trait IdGenerator: Send + Sync {
    /// Produce a new token
    fn next_id(&self) -> String;
}

impl<F> IdGenerator for F
where
    F: Fn() -> String + Send + Sync,
{
    fn next_id(&self) -> String {
        self()
    }
}

/// Random 128-bit identifiers rendered as hyphenated UUID v4 strings
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Deterministic `<prefix>-<n>` tokens, starting at 1
#[derive(Debug)]
pub struct SequentialIdGenerator {
    prefix: String,
    counter: AtomicU64,
}

impl SequentialIdGenerator {
    /// Create a generator producing `<prefix>-1`, `<prefix>-2`, ...
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: AtomicU64::new(0),
        }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{}-{}", self.prefix, n)
    }
}

/// Derive a slug from an exercise name: "Leg Press" -> "leg_press"
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_sep = false;

    for c in name.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_sep && !slug.is_empty() {
                slug.push('_');
            }
            pending_sep = false;
            slug.push(c);
        } else {
            pending_sep = true;
        }
    }

    slug
}
