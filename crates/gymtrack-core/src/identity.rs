//! Identifier policy for sessions and exercises

use crate::catalog::{ExerciseCatalog, PredefinedCatalog};
use crate::types::{ExerciseId, IdGenerator, SessionId, UuidGenerator};
use std::fmt;
use std::sync::Arc;

/// Assigns identifiers to new sessions and exercises
///
/// Exercise names found in the catalog resolve to the catalog slug. Any other
/// name gets a fresh token from the generator, so two free-text exercises
/// with the same name are not merged unless the caller reuses an id.
#[derive(Clone)]
pub struct IdentifierPolicy {
    catalog: Arc<dyn ExerciseCatalog>,
    generator: Arc<dyn IdGenerator>,
}

impl IdentifierPolicy {
    /// Create a policy from a catalog and a token generator
    pub fn new(catalog: Arc<dyn ExerciseCatalog>, generator: Arc<dyn IdGenerator>) -> Self {
        Self { catalog, generator }
    }

    /// Built-in catalog with a custom generator
    pub fn with_generator(generator: impl IdGenerator + 'static) -> Self {
        Self::new(Arc::new(PredefinedCatalog), Arc::new(generator))
    }

    /// Identifier for an exercise name
    pub fn exercise_id(&self, name: &str) -> ExerciseId {
        match self.catalog.by_name(name) {
            Some(entry) => entry.exercise_id(),
            None => ExerciseId(self.generator.next_id()),
        }
    }

    /// Fresh session identifier
    pub fn session_id(&self) -> SessionId {
        SessionId(self.generator.next_id())
    }

    /// The catalog backing name lookups
    pub fn catalog(&self) -> &dyn ExerciseCatalog {
        self.catalog.as_ref()
    }
}

impl Default for IdentifierPolicy {
    fn default() -> Self {
        Self::with_generator(UuidGenerator)
    }
}

impl fmt::Debug for IdentifierPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentifierPolicy")
            .field("catalog_entries", &self.catalog.entries().len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SequentialIdGenerator;

    #[test]
    fn test_catalog_name_resolves_to_slug() {
        let policy = IdentifierPolicy::default();
        assert_eq!(policy.exercise_id("Squat").as_str(), "squat");
        assert_eq!(policy.exercise_id("Leg Press").as_str(), "leg_press");
    }

    #[test]
    fn test_catalog_lookup_is_case_sensitive() {
        let policy = IdentifierPolicy::with_generator(SequentialIdGenerator::new("ex"));
        assert_eq!(policy.exercise_id("squat").as_str(), "ex-1");
    }

    #[test]
    fn test_unknown_names_get_fresh_ids() {
        let policy = IdentifierPolicy::default();
        let a = policy.exercise_id("Zercher Carry");
        let b = policy.exercise_id("Zercher Carry");
        assert_ne!(a, b);
    }

    #[test]
    fn test_session_ids_are_unique() {
        let policy = IdentifierPolicy::default();
        assert_ne!(policy.session_id(), policy.session_id());
    }

    #[test]
    fn test_injected_generator() {
        let policy = IdentifierPolicy::with_generator(SequentialIdGenerator::new("s"));
        assert_eq!(policy.session_id().as_str(), "s-1");
        assert_eq!(policy.exercise_id("Custom Move").as_str(), "s-2");
    }
}
