//! Query/filter layer: library search, muscle-group browse, per-exercise
//! history, and the numbered-list selection contract.
//!
//! Lookups with no matches return empty results, never a fault; malformed
//! selection input is the caller's cue to re-prompt.

use crate::types::{ExerciseId, UserId, WorkoutId};
use crate::{Error, Exercise, MuscleGroup, Result, Store, WorkoutExercise};
use chrono::NaiveDate;

/// Case-insensitive substring search over exercise names.
///
/// Results come back name-ascending for a stable display order.
pub fn search_by_name<'a>(store: &'a Store, term: &str) -> Vec<&'a Exercise> {
    let needle = term.to_lowercase();
    let mut matches: Vec<&Exercise> = store
        .exercises()
        .into_iter()
        .filter(|e| e.name.to_lowercase().contains(&needle))
        .collect();
    matches.sort_by(|a, b| a.name.cmp(&b.name));
    matches
}

/// All exercises filed under one muscle group, name-ascending.
pub fn filter_by_muscle_group(store: &Store, group: MuscleGroup) -> Vec<&Exercise> {
    let mut matches: Vec<&Exercise> = store
        .exercises()
        .into_iter()
        .filter(|e| e.muscle_group == group)
        .collect();
    matches.sort_by(|a, b| a.name.cmp(&b.name));
    matches
}

/// One row of a user's history with a particular exercise
#[derive(Clone, Debug)]
pub struct HistorySample<'a> {
    pub date: NaiveDate,
    pub workout_id: WorkoutId,
    pub entry: &'a WorkoutExercise,
}

/// Every logged entry for `exercise_id` across all of the user's workouts,
/// most recent workout date first; same-date ties order workout-id
/// ascending. Unknown ids yield an empty result.
pub fn exercise_history<'a>(
    store: &'a Store,
    user_id: UserId,
    exercise_id: ExerciseId,
) -> Vec<HistorySample<'a>> {
    let mut samples: Vec<HistorySample> = store
        .workouts_for(user_id)
        .into_iter()
        .flat_map(|workout| {
            store
                .entries_for_workout(workout.id)
                .into_iter()
                .filter(|e| e.exercise_id == exercise_id)
                .map(move |entry| HistorySample {
                    date: workout.date,
                    workout_id: workout.id,
                    entry,
                })
        })
        .collect();

    samples.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then_with(|| a.workout_id.cmp(&b.workout_id))
    });
    samples
}

/// Outcome of a 1-based list selection
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Selection {
    /// A valid pick; carries the 0-based index into the list
    Chosen(usize),
    /// The user entered 0 to back out
    Cancelled,
}

/// Resolve raw input against an ordered list of `len` items.
///
/// `"0"` cancels; `1..=len` picks (returned 0-based); anything else -
/// non-numeric or out of range - is [`Error::InvalidSelection`] so the
/// caller can re-prompt.
pub fn select_by_index(len: usize, raw: &str) -> Result<Selection> {
    let choice: usize = raw
        .trim()
        .parse()
        .map_err(|_| Error::InvalidSelection(format!("'{}' is not a number", raw.trim())))?;

    if choice == 0 {
        return Ok(Selection::Cancelled);
    }
    if choice > len {
        return Err(Error::InvalidSelection(format!(
            "enter a number between 1 and {}",
            len
        )));
    }
    Ok(Selection::Chosen(choice - 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn press_catalog() -> Store {
        let mut store = Store::in_memory();
        store
            .add_exercise("Bench Press", MuscleGroup::Chest, None, None, false)
            .unwrap();
        store
            .add_exercise("Overhead Press", MuscleGroup::Shoulders, None, None, false)
            .unwrap();
        store
            .add_exercise("Squat", MuscleGroup::Legs, None, None, false)
            .unwrap();
        store
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let store = press_catalog();

        for term in ["press", "PRESS", "Press"] {
            let matches = search_by_name(&store, term);
            let names: Vec<&str> = matches.iter().map(|e| e.name.as_str()).collect();
            assert_eq!(names, vec!["Bench Press", "Overhead Press"]);
        }
    }

    #[test]
    fn test_search_no_matches_is_empty() {
        let store = press_catalog();
        assert!(search_by_name(&store, "deadlift").is_empty());
    }

    #[test]
    fn test_filter_by_muscle_group_is_exact() {
        let mut store = press_catalog();
        store
            .add_exercise("Front Squat", MuscleGroup::Legs, None, None, false)
            .unwrap();

        let legs = filter_by_muscle_group(&store, MuscleGroup::Legs);
        let names: Vec<&str> = legs.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Front Squat", "Squat"]);

        assert!(filter_by_muscle_group(&store, MuscleGroup::Cardio).is_empty());
    }

    #[test]
    fn test_exercise_history_newest_first() {
        let mut store = Store::in_memory();
        let user = store.create_user("Lifter", None, None, None).unwrap();
        let bench = store
            .add_exercise("Bench Press", MuscleGroup::Chest, None, None, false)
            .unwrap();
        let squat = store
            .add_exercise("Squat", MuscleGroup::Legs, None, None, false)
            .unwrap();

        let w1 = store
            .log_workout(user, date("2024-01-01"), None, None)
            .unwrap();
        store.add_entry(w1, bench, 3, 10, 135.0, None).unwrap();

        let w2 = store
            .log_workout(user, date("2024-01-08"), None, None)
            .unwrap();
        store.add_entry(w2, bench, 3, 10, 140.0, None).unwrap();
        store.add_entry(w2, squat, 4, 8, 225.0, None).unwrap();

        let history = exercise_history(&store, user, bench);
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].date, date("2024-01-08"));
        assert!((history[0].entry.weight - 140.0).abs() < 1e-9);
        assert_eq!(history[1].date, date("2024-01-01"));
    }

    #[test]
    fn test_exercise_history_same_date_orders_by_workout_id() {
        let mut store = Store::in_memory();
        let user = store.create_user("Lifter", None, None, None).unwrap();
        let bench = store
            .add_exercise("Bench Press", MuscleGroup::Chest, None, None, false)
            .unwrap();

        let morning = store
            .log_workout(user, date("2024-01-01"), None, None)
            .unwrap();
        let evening = store
            .log_workout(user, date("2024-01-01"), None, None)
            .unwrap();
        store.add_entry(evening, bench, 3, 10, 140.0, None).unwrap();
        store.add_entry(morning, bench, 3, 10, 135.0, None).unwrap();

        let history = exercise_history(&store, user, bench);
        assert_eq!(history[0].workout_id, morning);
        assert_eq!(history[1].workout_id, evening);
    }

    #[test]
    fn test_exercise_history_scoped_to_user() {
        let mut store = Store::in_memory();
        let lifter = store.create_user("Lifter", None, None, None).unwrap();
        let other = store.create_user("Other", None, None, None).unwrap();
        let bench = store
            .add_exercise("Bench Press", MuscleGroup::Chest, None, None, false)
            .unwrap();

        let w = store
            .log_workout(other, date("2024-01-01"), None, None)
            .unwrap();
        store.add_entry(w, bench, 3, 10, 135.0, None).unwrap();

        assert!(exercise_history(&store, lifter, bench).is_empty());
    }

    #[test]
    fn test_exercise_history_unknown_ids_empty() {
        let store = Store::in_memory();
        assert!(exercise_history(&store, 1, 1).is_empty());
    }

    #[test]
    fn test_select_by_index_contract() {
        assert_eq!(select_by_index(3, "0").unwrap(), Selection::Cancelled);
        assert_eq!(select_by_index(3, "1").unwrap(), Selection::Chosen(0));
        assert_eq!(select_by_index(3, " 3 ").unwrap(), Selection::Chosen(2));

        assert!(matches!(
            select_by_index(3, "4"),
            Err(Error::InvalidSelection(_))
        ));
        assert!(matches!(
            select_by_index(3, "abc"),
            Err(Error::InvalidSelection(_))
        ));
        assert!(matches!(
            select_by_index(3, "-1"),
            Err(Error::InvalidSelection(_))
        ));
        assert!(matches!(
            select_by_index(0, "1"),
            Err(Error::InvalidSelection(_))
        ));
    }
}
