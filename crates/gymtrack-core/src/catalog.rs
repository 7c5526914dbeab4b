//! Exercise catalog
//!
//! The catalog maps well-known exercise names to fixed slug identifiers so
//! that the same movement recorded in different sessions shares an id.

use crate::session::SessionCategory;
use crate::types::ExerciseId;

/// A predefined exercise
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Fixed slug identifier
    pub id: &'static str,
    /// Display name
    pub name: &'static str,
    /// Categories the exercise belongs to
    pub categories: &'static [SessionCategory],
}

impl CatalogEntry {
    /// The entry's id as an ExerciseId
    pub fn exercise_id(&self) -> ExerciseId {
        ExerciseId::from_string(self.id)
    }

    /// Whether the exercise is listed under the category
    pub fn belongs_to(&self, category: SessionCategory) -> bool {
        self.categories.contains(&category)
    }
}

/// Lookup boundary for exercise names
pub trait ExerciseCatalog: Send + Sync {
    /// Exact, case-sensitive name lookup
    fn by_name(&self, name: &str) -> Option<&CatalogEntry>;

    /// Lookup by slug identifier
    fn by_id(&self, id: &str) -> Option<&CatalogEntry>;

    /// All entries in catalog order
    fn entries(&self) -> &[CatalogEntry];

    /// Deduplicated names in catalog order
    fn all_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for entry in self.entries() {
            if !names.contains(&entry.name) {
                names.push(entry.name);
            }
        }
        names
    }

    /// Entries for a category, or every entry when `None`
    fn for_category(&self, category: Option<SessionCategory>) -> Vec<&CatalogEntry> {
        match category {
            None => self.entries().iter().collect(),
            Some(category) => self
                .entries()
                .iter()
                .filter(|e| e.belongs_to(category))
                .collect(),
        }
    }
}

use crate::session::SessionCategory::{Arms, Back, Cardio, Chest, Core, FullBody, Legs, Mixed, Shoulders};

#[rustfmt::skip]
static PREDEFINED: &[CatalogEntry] = &[
    // Legs
    CatalogEntry { id: "squat", name: "Squat", categories: &[Legs] },
    CatalogEntry { id: "leg_press", name: "Leg Press", categories: &[Legs] },
    CatalogEntry { id: "leg_curl_hamstring", name: "Leg Curl (Hamstring)", categories: &[Legs] },
    CatalogEntry { id: "hamstring_curls", name: "Hamstring Curls", categories: &[Legs] },
    CatalogEntry { id: "leg_extension", name: "Leg Extension", categories: &[Legs] },
    CatalogEntry { id: "romanian_deadlift", name: "Romanian Deadlift", categories: &[Legs, Back] },
    CatalogEntry { id: "calf_raises", name: "Calf Raises", categories: &[Legs] },
    CatalogEntry { id: "bulgarian_split_squat", name: "Bulgarian Split Squat", categories: &[Legs] },
    CatalogEntry { id: "lunges", name: "Lunges", categories: &[Legs] },
    CatalogEntry { id: "hack_squat", name: "Hack Squat", categories: &[Legs] },

    // Chest
    CatalogEntry { id: "barbell_bench_press", name: "Barbell Bench Press", categories: &[Chest] },
    CatalogEntry { id: "dumbbell_bench_press", name: "Dumbbell Bench Press", categories: &[Chest] },
    CatalogEntry { id: "incline_dumbbell_press", name: "Incline Dumbbell Press", categories: &[Chest] },
    CatalogEntry { id: "incline_barbell_press", name: "Incline Barbell Press", categories: &[Chest] },
    CatalogEntry { id: "decline_bench_press", name: "Decline Bench Press", categories: &[Chest] },
    CatalogEntry { id: "chest_fly", name: "Chest Fly", categories: &[Chest] },
    CatalogEntry { id: "dumbbell_fly", name: "Dumbbell Fly", categories: &[Chest] },
    CatalogEntry { id: "cable_fly", name: "Cable Fly", categories: &[Chest] },
    CatalogEntry { id: "push_ups", name: "Push-ups", categories: &[Chest] },
    CatalogEntry { id: "dips", name: "Dips", categories: &[Chest, Arms] },

    // Back
    CatalogEntry { id: "deadlift", name: "Deadlift", categories: &[Back] },
    CatalogEntry { id: "pull_ups", name: "Pull Ups", categories: &[Back] },
    CatalogEntry { id: "bent_over_row", name: "Bent Over Row", categories: &[Back] },
    CatalogEntry { id: "t_bar_row", name: "T-Bar Row", categories: &[Back] },
    CatalogEntry { id: "seated_cable_row", name: "Seated Cable Row", categories: &[Back] },
    CatalogEntry { id: "lat_pulldown", name: "Lat Pulldown", categories: &[Back] },
    CatalogEntry { id: "one_arm_dumbbell_row", name: "One-Arm Dumbbell Row", categories: &[Back] },
    CatalogEntry { id: "cable_row", name: "Cable Row", categories: &[Back] },
    CatalogEntry { id: "face_pulls", name: "Face Pulls", categories: &[Back, Shoulders] },
    CatalogEntry { id: "shrugs", name: "Shrugs", categories: &[Back, Shoulders] },

    // Arms
    CatalogEntry { id: "barbell_bicep_curl", name: "Barbell Bicep Curl", categories: &[Arms] },
    CatalogEntry { id: "dumbbell_bicep_curl", name: "Dumbbell Bicep Curl", categories: &[Arms] },
    CatalogEntry { id: "hammer_curl", name: "Hammer Curl", categories: &[Arms] },
    CatalogEntry { id: "tricep_pushdown", name: "Tricep Pushdown", categories: &[Arms] },
    CatalogEntry { id: "overhead_tricep_extension", name: "Overhead Tricep Extension", categories: &[Arms] },
    CatalogEntry { id: "close_grip_bench_press", name: "Close-Grip Bench Press", categories: &[Arms] },
    CatalogEntry { id: "preacher_curl", name: "Preacher Curl", categories: &[Arms] },
    CatalogEntry { id: "cable_curl", name: "Cable Curl", categories: &[Arms] },
    CatalogEntry { id: "tricep_dips", name: "Tricep Dips", categories: &[Arms] },

    // Shoulders
    CatalogEntry { id: "overhead_press", name: "Overhead Press", categories: &[Shoulders] },
    CatalogEntry { id: "dumbbell_shoulder_press", name: "Dumbbell Shoulder Press", categories: &[Shoulders] },
    CatalogEntry { id: "lateral_raise", name: "Lateral Raise", categories: &[Shoulders] },
    CatalogEntry { id: "front_raise", name: "Front Raise", categories: &[Shoulders] },
    CatalogEntry { id: "rear_delt_fly", name: "Rear Delt Fly", categories: &[Shoulders] },
    CatalogEntry { id: "upright_row", name: "Upright Row", categories: &[Shoulders] },
    CatalogEntry { id: "arnold_press", name: "Arnold Press", categories: &[Shoulders] },
    CatalogEntry { id: "cable_lateral_raise", name: "Cable Lateral Raise", categories: &[Shoulders] },

    // Core
    CatalogEntry { id: "plank", name: "Plank", categories: &[Core] },
    CatalogEntry { id: "crunches", name: "Crunches", categories: &[Core] },
    CatalogEntry { id: "russian_twists", name: "Russian Twists", categories: &[Core] },
    CatalogEntry { id: "leg_raises", name: "Leg Raises", categories: &[Core] },
    CatalogEntry { id: "dead_bug", name: "Dead Bug", categories: &[Core] },
    CatalogEntry { id: "mountain_climbers", name: "Mountain Climbers", categories: &[Core] },

    // Cardio
    CatalogEntry { id: "running", name: "Running", categories: &[Cardio] },
    CatalogEntry { id: "cycling", name: "Cycling", categories: &[Cardio] },
    CatalogEntry { id: "rowing", name: "Rowing", categories: &[Cardio] },
    CatalogEntry { id: "elliptical", name: "Elliptical", categories: &[Cardio] },
    CatalogEntry { id: "stair_climber", name: "Stair Climber", categories: &[Cardio] },

    // Full body
    CatalogEntry { id: "burpees", name: "Burpees", categories: &[FullBody, Mixed] },
    CatalogEntry { id: "kettlebell_swings", name: "Kettlebell Swings", categories: &[FullBody, Mixed] },
    CatalogEntry { id: "thruster", name: "Thruster", categories: &[FullBody, Mixed] },
];

/// Built-in catalog of common gym exercises
#[derive(Debug, Clone, Copy, Default)]
pub struct PredefinedCatalog;

impl ExerciseCatalog for PredefinedCatalog {
    fn by_name(&self, name: &str) -> Option<&CatalogEntry> {
        PREDEFINED.iter().find(|e| e.name == name)
    }

    fn by_id(&self, id: &str) -> Option<&CatalogEntry> {
        PREDEFINED.iter().find(|e| e.id == id)
    }

    fn entries(&self) -> &[CatalogEntry] {
        PREDEFINED
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::slugify;
    use std::collections::HashSet;

    #[test]
    fn test_lookup_by_name_is_exact() {
        let catalog = PredefinedCatalog;
        assert_eq!(catalog.by_name("Squat").map(|e| e.id), Some("squat"));
        assert!(catalog.by_name("squat").is_none());
        assert!(catalog.by_name("Squat ").is_none());
    }

    #[test]
    fn test_lookup_by_id() {
        let catalog = PredefinedCatalog;
        let entry = catalog.by_id("leg_press").unwrap();
        assert_eq!(entry.name, "Leg Press");
        assert!(catalog.by_id("nope").is_none());
    }

    #[test]
    fn test_ids_are_unique_slugs_of_names() {
        let catalog = PredefinedCatalog;
        let mut seen = HashSet::new();
        for entry in catalog.entries() {
            assert!(seen.insert(entry.id), "duplicate id {}", entry.id);
            assert_eq!(slugify(entry.name), entry.id);
            assert!(!entry.categories.is_empty());
        }
    }

    #[test]
    fn test_all_names_deduplicated() {
        let catalog = PredefinedCatalog;
        let names = catalog.all_names();
        let unique: HashSet<_> = names.iter().collect();
        assert_eq!(names.len(), unique.len());
        assert_eq!(names[0], "Squat");
    }

    #[test]
    fn test_for_category() {
        let catalog = PredefinedCatalog;
        assert_eq!(catalog.for_category(None).len(), catalog.entries().len());

        let back = catalog.for_category(Some(SessionCategory::Back));
        assert!(back.iter().any(|e| e.id == "romanian_deadlift"));
        assert!(back.iter().all(|e| e.belongs_to(SessionCategory::Back)));

        assert!(catalog.for_category(Some(SessionCategory::CrossFit)).is_empty());
    }
}
