//! Core domain types for the Fittrack workout tracker.
//!
//! This module defines the fundamental records stored by the system:
//! - Users and their profile data
//! - Workouts (one dated training session per record)
//! - Exercises (the global library)
//! - WorkoutExercise entries (the performance numbers for one exercise
//!   inside one workout)
//!
//! Records reference each other by id only; all relations are resolved
//! through [`crate::store::Store`] lookups.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Identifiers
// ============================================================================

pub type UserId = u64;
pub type WorkoutId = u64;
pub type ExerciseId = u64;
pub type EntryId = u64;

// ============================================================================
// Muscle Groups
// ============================================================================

/// Training category an exercise is filed under.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum MuscleGroup {
    Chest,
    Back,
    Legs,
    Shoulders,
    Arms,
    Core,
    Cardio,
    /// Catch-all for custom exercises that fit none of the standard groups
    Other,
}

impl MuscleGroup {
    /// The seven standard groups offered when browsing the library
    pub const STANDARD: [MuscleGroup; 7] = [
        MuscleGroup::Chest,
        MuscleGroup::Back,
        MuscleGroup::Legs,
        MuscleGroup::Shoulders,
        MuscleGroup::Arms,
        MuscleGroup::Core,
        MuscleGroup::Cardio,
    ];

    /// Standard groups plus `Other`, offered when adding a custom exercise
    pub const ALL: [MuscleGroup; 8] = [
        MuscleGroup::Chest,
        MuscleGroup::Back,
        MuscleGroup::Legs,
        MuscleGroup::Shoulders,
        MuscleGroup::Arms,
        MuscleGroup::Core,
        MuscleGroup::Cardio,
        MuscleGroup::Other,
    ];

    /// Display label (also the exact-match token used when filtering)
    pub fn label(&self) -> &'static str {
        match self {
            MuscleGroup::Chest => "Chest",
            MuscleGroup::Back => "Back",
            MuscleGroup::Legs => "Legs",
            MuscleGroup::Shoulders => "Shoulders",
            MuscleGroup::Arms => "Arms",
            MuscleGroup::Core => "Core",
            MuscleGroup::Cardio => "Cardio",
            MuscleGroup::Other => "Other",
        }
    }
}

impl fmt::Display for MuscleGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Records
// ============================================================================

/// A person tracking their workouts
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub age: Option<u32>,
    pub weight: Option<f64>,
    pub fitness_goal: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// One dated training session belonging to a user
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Workout {
    pub id: WorkoutId,
    pub user_id: UserId,
    /// Calendar day of the session; no time component
    pub date: NaiveDate,
    pub duration_minutes: Option<u32>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A library entry describing an exercise, owned by no user
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Exercise {
    pub id: ExerciseId,
    /// Unique across the library, case-sensitive
    pub name: String,
    pub muscle_group: MuscleGroup,
    pub equipment: Option<String>,
    pub description: Option<String>,
    /// False for the pre-loaded library, true for user-added entries
    pub is_custom: bool,
    pub created_at: DateTime<Utc>,
}

/// The performance numbers for one exercise inside one workout
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkoutExercise {
    pub id: EntryId,
    pub workout_id: WorkoutId,
    pub exercise_id: ExerciseId,
    /// Number of sets performed, at least 1
    pub sets: u32,
    /// Reps per set, at least 1
    pub reps: u32,
    /// Weight used, non-negative; fractional plates are real
    pub weight: f64,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl WorkoutExercise {
    /// Training volume for this entry: sets × reps × weight.
    ///
    /// Computed in f64 so fractional weights never truncate.
    pub fn volume(&self) -> f64 {
        f64::from(self.sets) * f64::from(self.reps) * self.weight
    }
}

// ============================================================================
// Session
// ============================================================================

/// The active-user context threaded through interactive operations.
///
/// Constructed when a user is created or switched to, dropped at exit;
/// replaces any notion of a process-wide "current user".
#[derive(Clone, Debug)]
pub struct Session {
    pub user_id: UserId,
    pub user_name: String,
    pub started_at: DateTime<Utc>,
}

impl Session {
    pub fn for_user(user: &User) -> Self {
        Session {
            user_id: user.id,
            user_name: user.name.clone(),
            started_at: Utc::now(),
        }
    }
}
