//! Built-in exercise library.
//!
//! This module provides the pre-loaded exercises for the system, organized
//! by muscle group, and the idempotent seeding routine that installs them
//! into a store.

use crate::{MuscleGroup, Result, Store};
use once_cell::sync::Lazy;
use std::collections::HashSet;

/// One pre-loaded library entry
#[derive(Clone, Debug)]
pub struct ExerciseSeed {
    pub name: &'static str,
    pub muscle_group: MuscleGroup,
    pub equipment: &'static str,
    pub description: &'static str,
}

/// Cached default library - built once and reused across all operations
static DEFAULT_LIBRARY: Lazy<Vec<ExerciseSeed>> = Lazy::new(build_default_library);

/// Get a reference to the cached default exercise library
pub fn default_library() -> &'static [ExerciseSeed] {
    &DEFAULT_LIBRARY
}

fn seed(
    name: &'static str,
    muscle_group: MuscleGroup,
    equipment: &'static str,
    description: &'static str,
) -> ExerciseSeed {
    ExerciseSeed {
        name,
        muscle_group,
        equipment,
        description,
    }
}

fn build_default_library() -> Vec<ExerciseSeed> {
    use MuscleGroup::*;

    vec![
        // ====================================================================
        // Chest
        // ====================================================================
        seed("Bench Press", Chest, "Barbell", "Compound chest exercise"),
        seed("Incline Bench Press", Chest, "Barbell", "Upper chest focus"),
        seed(
            "Dumbbell Bench Press",
            Chest,
            "Dumbbells",
            "Chest exercise with dumbbells",
        ),
        seed("Dumbbell Flyes", Chest, "Dumbbells", "Chest isolation exercise"),
        seed("Push-ups", Chest, "Bodyweight", "Bodyweight chest exercise"),
        seed("Cable Flyes", Chest, "Cable Machine", "Cable chest isolation"),
        // ====================================================================
        // Back
        // ====================================================================
        seed("Deadlift", Back, "Barbell", "Full body compound movement"),
        seed("Barbell Row", Back, "Barbell", "Back thickness builder"),
        seed("Pull-ups", Back, "Bodyweight", "Bodyweight back exercise"),
        seed("Lat Pulldown", Back, "Cable Machine", "Lat width builder"),
        seed("Dumbbell Row", Back, "Dumbbells", "Unilateral back exercise"),
        seed("Seated Cable Row", Back, "Cable Machine", "Mid-back exercise"),
        // ====================================================================
        // Legs
        // ====================================================================
        seed("Squat", Legs, "Barbell", "Compound leg exercise"),
        seed("Front Squat", Legs, "Barbell", "Quad-focused squat variation"),
        seed("Leg Press", Legs, "Machine", "Machine-based leg exercise"),
        seed("Leg Curl", Legs, "Machine", "Hamstring isolation"),
        seed("Leg Extension", Legs, "Machine", "Quad isolation"),
        seed("Lunges", Legs, "Dumbbells", "Unilateral leg exercise"),
        seed(
            "Romanian Deadlift",
            Legs,
            "Barbell",
            "Hamstring and glute focus",
        ),
        // ====================================================================
        // Shoulders
        // ====================================================================
        seed(
            "Overhead Press",
            Shoulders,
            "Barbell",
            "Compound shoulder exercise",
        ),
        seed(
            "Dumbbell Shoulder Press",
            Shoulders,
            "Dumbbells",
            "Shoulder press variation",
        ),
        seed("Lateral Raises", Shoulders, "Dumbbells", "Side delt isolation"),
        seed("Front Raises", Shoulders, "Dumbbells", "Front delt isolation"),
        seed(
            "Face Pulls",
            Shoulders,
            "Cable Machine",
            "Rear delt and upper back",
        ),
        // ====================================================================
        // Arms
        // ====================================================================
        seed("Barbell Curl", Arms, "Barbell", "Bicep mass builder"),
        seed("Dumbbell Curl", Arms, "Dumbbells", "Bicep exercise"),
        seed("Hammer Curl", Arms, "Dumbbells", "Bicep and forearm exercise"),
        seed("Tricep Pushdown", Arms, "Cable Machine", "Tricep isolation"),
        seed("Skull Crushers", Arms, "Barbell", "Tricep extension"),
        seed(
            "Close-Grip Bench Press",
            Arms,
            "Barbell",
            "Compound tricep exercise",
        ),
        // ====================================================================
        // Core
        // ====================================================================
        seed("Plank", Core, "Bodyweight", "Core stability exercise"),
        seed("Crunches", Core, "Bodyweight", "Abdominal exercise"),
        seed("Russian Twists", Core, "Bodyweight", "Oblique exercise"),
        seed("Hanging Leg Raises", Core, "Pull-up Bar", "Lower ab exercise"),
        seed("Cable Crunches", Core, "Cable Machine", "Weighted ab exercise"),
        // ====================================================================
        // Cardio
        // ====================================================================
        seed("Running", Cardio, "None", "Cardiovascular exercise"),
        seed("Cycling", Cardio, "Bike", "Low-impact cardio"),
        seed("Rowing", Cardio, "Rowing Machine", "Full body cardio"),
        seed("Jump Rope", Cardio, "Jump Rope", "High-intensity cardio"),
    ]
}

/// Install the default library into a store.
///
/// Idempotent: does nothing when the library already has any exercises,
/// so repeated seeding never duplicates or overwrites entries. Returns
/// the number of exercises inserted.
pub fn seed_default_exercises(store: &mut Store) -> Result<usize> {
    let existing = store.exercise_count();
    if existing > 0 {
        tracing::info!("Exercise library already populated ({} exercises)", existing);
        return Ok(0);
    }

    let mut inserted = 0;
    for entry in default_library() {
        store.add_exercise(
            entry.name,
            entry.muscle_group,
            Some(entry.equipment.to_string()),
            Some(entry.description.to_string()),
            false,
        )?;
        inserted += 1;
    }

    tracing::info!(
        "Seeded {} exercises across {} muscle groups",
        inserted,
        MuscleGroup::STANDARD.len()
    );
    Ok(inserted)
}

/// Validate the built-in library for consistency.
///
/// Returns a list of validation errors, or empty Vec if valid.
pub fn validate_library() -> Vec<String> {
    let mut errors = Vec::new();
    let library = default_library();

    let mut names = HashSet::new();
    for entry in library {
        if entry.name.is_empty() {
            errors.push("Library entry has empty name".to_string());
        }
        if !names.insert(entry.name) {
            errors.push(format!("Duplicate library entry '{}'", entry.name));
        }
        if entry.muscle_group == MuscleGroup::Other {
            errors.push(format!(
                "Library entry '{}' uses the Other group, reserved for custom exercises",
                entry.name
            ));
        }
    }

    for group in MuscleGroup::STANDARD {
        if !library.iter().any(|e| e.muscle_group == group) {
            errors.push(format!("Library has no {} exercises", group));
        }
    }

    errors
}
