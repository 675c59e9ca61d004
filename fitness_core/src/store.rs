//! The record store: arena tables with JSON persistence.
//!
//! Records live in flat `BTreeMap<u64, _>` tables keyed by id, with
//! relations expressed as id references checked at insert time. The whole
//! store round-trips through a single JSON document written atomically
//! (temp file, fsync, rename) under fs2 file locks.

use crate::{Error, Exercise, MuscleGroup, Result, User, Workout, WorkoutExercise};
use crate::types::{EntryId, ExerciseId, UserId, WorkoutId};
use chrono::{NaiveDate, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

fn first_id() -> u64 {
    1
}

/// On-disk shape of the store: four tables plus the id sequences.
///
/// Ids start at 1 and are never reused within a store file, so history
/// ordering by id stays stable across deletions.
#[derive(Debug, Serialize, Deserialize)]
struct StoreData {
    #[serde(default)]
    users: BTreeMap<UserId, User>,
    #[serde(default)]
    workouts: BTreeMap<WorkoutId, Workout>,
    #[serde(default)]
    exercises: BTreeMap<ExerciseId, Exercise>,
    #[serde(default)]
    entries: BTreeMap<EntryId, WorkoutExercise>,

    #[serde(default = "first_id")]
    next_user_id: u64,
    #[serde(default = "first_id")]
    next_workout_id: u64,
    #[serde(default = "first_id")]
    next_exercise_id: u64,
    #[serde(default = "first_id")]
    next_entry_id: u64,
}

impl Default for StoreData {
    fn default() -> Self {
        StoreData {
            users: BTreeMap::new(),
            workouts: BTreeMap::new(),
            exercises: BTreeMap::new(),
            entries: BTreeMap::new(),
            next_user_id: 1,
            next_workout_id: 1,
            next_exercise_id: 1,
            next_entry_id: 1,
        }
    }
}

/// The record store backing the whole application.
#[derive(Debug)]
pub struct Store {
    path: PathBuf,
    data: StoreData,
}

impl Store {
    /// Open a store backed by the given file.
    ///
    /// A missing file loads as an empty store. A file that exists but
    /// cannot be parsed is a hard error, never a silent reset: this file
    /// is the system of record.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            tracing::info!("No store file at {:?}, starting empty", path);
            return Ok(Store {
                path,
                data: StoreData::default(),
            });
        }

        let file = File::open(&path)?;
        // Shared lock while reading
        file.lock_shared()?;
        let mut contents = String::new();
        let read_result = std::io::BufReader::new(&file).read_to_string(&mut contents);
        file.unlock()?;
        read_result?;

        let data: StoreData = serde_json::from_str(&contents)?;
        tracing::debug!(
            "Opened store from {:?}: {} users, {} workouts, {} exercises, {} entries",
            path,
            data.users.len(),
            data.workouts.len(),
            data.exercises.len(),
            data.entries.len()
        );
        Ok(Store { path, data })
    }

    /// Create an in-memory store for tests and one-shot computations.
    pub fn in_memory() -> Self {
        Store {
            path: PathBuf::new(),
            data: StoreData::default(),
        }
    }

    /// Persist the store atomically: temp file in the same directory,
    /// exclusive lock, fsync, rename over the original.
    pub fn save(&self) -> Result<()> {
        if self.path.as_os_str().is_empty() {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let temp = NamedTempFile::new_in(self.path.parent().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::Other, "store path missing parent")
        })?)?;

        temp.as_file().lock_exclusive()?;
        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string(&self.data)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }
        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(&self.path).map_err(|e| Error::Io(e.error))?;
        tracing::debug!("Saved store to {:?}", self.path);
        Ok(())
    }

    // ========================================================================
    // Users
    // ========================================================================

    /// Create a user. The name must be non-empty after trimming.
    pub fn create_user(
        &mut self,
        name: &str,
        age: Option<u32>,
        weight: Option<f64>,
        fitness_goal: Option<String>,
    ) -> Result<UserId> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Validation("user name cannot be empty".into()));
        }

        let id = self.data.next_user_id;
        self.data.next_user_id += 1;
        self.data.users.insert(
            id,
            User {
                id,
                name: name.to_string(),
                age,
                weight,
                fitness_goal,
                created_at: Utc::now(),
            },
        );
        tracing::info!("Created user '{}' (id {})", name, id);
        Ok(id)
    }

    pub fn user(&self, id: UserId) -> Option<&User> {
        self.data.users.get(&id)
    }

    /// All users in id order
    pub fn users(&self) -> Vec<&User> {
        self.data.users.values().collect()
    }

    /// Exact-name lookup; first match in id order
    pub fn find_user_by_name(&self, name: &str) -> Option<&User> {
        self.data.users.values().find(|u| u.name == name)
    }

    /// Delete a user, cascading to their workouts and logged entries.
    pub fn delete_user(&mut self, id: UserId) -> Result<()> {
        if self.data.users.remove(&id).is_none() {
            return Err(Error::NotFound(format!("user {}", id)));
        }
        let workout_ids: Vec<WorkoutId> = self
            .data
            .workouts
            .values()
            .filter(|w| w.user_id == id)
            .map(|w| w.id)
            .collect();
        for wid in workout_ids {
            self.data.workouts.remove(&wid);
            self.data.entries.retain(|_, e| e.workout_id != wid);
        }
        tracing::info!("Deleted user {} and their workout history", id);
        Ok(())
    }

    // ========================================================================
    // Workouts
    // ========================================================================

    /// Record a workout session for a user on a calendar day.
    ///
    /// Several workouts on the same date are allowed.
    pub fn log_workout(
        &mut self,
        user_id: UserId,
        date: NaiveDate,
        duration_minutes: Option<u32>,
        notes: Option<String>,
    ) -> Result<WorkoutId> {
        if !self.data.users.contains_key(&user_id) {
            return Err(Error::NotFound(format!("user {}", user_id)));
        }

        let id = self.data.next_workout_id;
        self.data.next_workout_id += 1;
        self.data.workouts.insert(
            id,
            Workout {
                id,
                user_id,
                date,
                duration_minutes,
                notes,
                created_at: Utc::now(),
            },
        );
        tracing::info!("Logged workout {} for user {} on {}", id, user_id, date);
        Ok(id)
    }

    pub fn workout(&self, id: WorkoutId) -> Option<&Workout> {
        self.data.workouts.get(&id)
    }

    /// All workouts belonging to a user, in id order
    pub fn workouts_for(&self, user_id: UserId) -> Vec<&Workout> {
        self.data
            .workouts
            .values()
            .filter(|w| w.user_id == user_id)
            .collect()
    }

    /// Delete a workout, cascading to its entries.
    pub fn delete_workout(&mut self, id: WorkoutId) -> Result<()> {
        if self.data.workouts.remove(&id).is_none() {
            return Err(Error::NotFound(format!("workout {}", id)));
        }
        self.data.entries.retain(|_, e| e.workout_id != id);
        tracing::info!("Deleted workout {} and its entries", id);
        Ok(())
    }

    // ========================================================================
    // Exercises
    // ========================================================================

    /// Add an exercise to the library.
    ///
    /// Names are unique case-sensitively: an exact duplicate is rejected,
    /// while a name differing only in case is a distinct entry. Lookups via
    /// [`crate::query::search_by_name`] remain case-insensitive.
    pub fn add_exercise(
        &mut self,
        name: &str,
        muscle_group: MuscleGroup,
        equipment: Option<String>,
        description: Option<String>,
        is_custom: bool,
    ) -> Result<ExerciseId> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Validation("exercise name cannot be empty".into()));
        }
        if self.data.exercises.values().any(|e| e.name == name) {
            return Err(Error::DuplicateExercise(name.to_string()));
        }

        let id = self.data.next_exercise_id;
        self.data.next_exercise_id += 1;
        self.data.exercises.insert(
            id,
            Exercise {
                id,
                name: name.to_string(),
                muscle_group,
                equipment,
                description,
                is_custom,
                created_at: Utc::now(),
            },
        );
        tracing::debug!("Added exercise '{}' (id {}, {})", name, id, muscle_group);
        Ok(id)
    }

    pub fn exercise(&self, id: ExerciseId) -> Option<&Exercise> {
        self.data.exercises.get(&id)
    }

    /// All library entries in id order
    pub fn exercises(&self) -> Vec<&Exercise> {
        self.data.exercises.values().collect()
    }

    pub fn exercise_count(&self) -> usize {
        self.data.exercises.len()
    }

    /// Exact-name lookup, case-sensitive
    pub fn exercise_by_name(&self, name: &str) -> Option<&Exercise> {
        self.data.exercises.values().find(|e| e.name == name)
    }

    // ========================================================================
    // Workout entries
    // ========================================================================

    /// Log an exercise inside a workout.
    ///
    /// Both foreign keys must resolve; sets and reps must be at least 1 and
    /// weight must be a finite non-negative number.
    pub fn add_entry(
        &mut self,
        workout_id: WorkoutId,
        exercise_id: ExerciseId,
        sets: u32,
        reps: u32,
        weight: f64,
        notes: Option<String>,
    ) -> Result<EntryId> {
        if !self.data.workouts.contains_key(&workout_id) {
            return Err(Error::NotFound(format!("workout {}", workout_id)));
        }
        if !self.data.exercises.contains_key(&exercise_id) {
            return Err(Error::NotFound(format!("exercise {}", exercise_id)));
        }
        if sets < 1 {
            return Err(Error::Validation("sets must be at least 1".into()));
        }
        if reps < 1 {
            return Err(Error::Validation("reps must be at least 1".into()));
        }
        if !weight.is_finite() || weight < 0.0 {
            return Err(Error::Validation(
                "weight must be a non-negative number".into(),
            ));
        }

        let id = self.data.next_entry_id;
        self.data.next_entry_id += 1;
        self.data.entries.insert(
            id,
            WorkoutExercise {
                id,
                workout_id,
                exercise_id,
                sets,
                reps,
                weight,
                notes,
                created_at: Utc::now(),
            },
        );
        tracing::debug!(
            "Logged entry {}: exercise {} in workout {} ({}x{} @ {})",
            id,
            exercise_id,
            workout_id,
            sets,
            reps,
            weight
        );
        Ok(id)
    }

    /// Entries of one workout, in id order
    pub fn entries_for_workout(&self, workout_id: WorkoutId) -> Vec<&WorkoutExercise> {
        self.data
            .entries
            .values()
            .filter(|e| e.workout_id == workout_id)
            .collect()
    }

    /// Display name for an entry's exercise; "Unknown" if the id no longer
    /// resolves.
    pub fn exercise_name_for(&self, entry: &WorkoutExercise) -> &str {
        self.exercise(entry.exercise_id)
            .map(|e| e.name.as_str())
            .unwrap_or("Unknown")
    }
}
