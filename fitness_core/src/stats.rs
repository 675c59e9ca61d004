//! Aggregation engine: statistics over a user's workout history.
//!
//! Pure functions over store views; nothing here mutates state. The
//! range-seeking aggregations ([`date_range`], [`personal_record`],
//! [`compute_user_stats`]) treat an empty history as a precondition
//! violation and return [`Error::EmptyHistory`] - callers check
//! [`workout_count`] first.

use crate::types::{UserId, WorkoutId};
use crate::{Error, Result, Store, WorkoutExercise};
use chrono::NaiveDate;
use std::collections::HashMap;

/// Total volume of one workout: the sum of its entry volumes.
///
/// Zero for a workout with no entries (or an unknown workout id).
pub fn workout_volume(store: &Store, workout_id: WorkoutId) -> f64 {
    store
        .entries_for_workout(workout_id)
        .iter()
        .map(|e| e.volume())
        .sum()
}

/// Total volume a user has lifted across all their workouts
pub fn user_volume(store: &Store, user_id: UserId) -> f64 {
    store
        .workouts_for(user_id)
        .iter()
        .map(|w| workout_volume(store, w.id))
        .sum()
}

/// Number of workouts a user has logged
pub fn workout_count(store: &Store, user_id: UserId) -> usize {
    store.workouts_for(user_id).len()
}

/// Number of exercise entries a user has logged across all workouts
pub fn entries_logged(store: &Store, user_id: UserId) -> usize {
    store
        .workouts_for(user_id)
        .iter()
        .map(|w| store.entries_for_workout(w.id).len())
        .sum()
}

/// Earliest and latest workout dates for a user.
///
/// Errors with [`Error::EmptyHistory`] when the user has no workouts.
pub fn date_range(store: &Store, user_id: UserId) -> Result<(NaiveDate, NaiveDate)> {
    let workouts = store.workouts_for(user_id);
    let first = workouts
        .iter()
        .map(|w| w.date)
        .min()
        .ok_or_else(|| Error::EmptyHistory(format!("user {} has no workouts", user_id)))?;
    // min() returned Some, so max() will too
    let last = workouts.iter().map(|w| w.date).max().unwrap_or(first);
    Ok((first, last))
}

/// Workouts per week over the active date range.
///
/// `days_active` counts both endpoints, so a single workout gives 1 day
/// and roughly 7 workouts/week. The `weeks <= 0` fallback to 0.0 is
/// unreachable for a non-empty history (days_active >= 1); the division
/// can never fault regardless of input.
pub fn weekly_frequency(workouts: usize, range: (NaiveDate, NaiveDate)) -> f64 {
    let (first, last) = range;
    let days_active = (last - first).num_days() + 1;
    let weeks_active = days_active as f64 / 7.0;
    if weeks_active <= 0.0 {
        return 0.0;
    }
    workouts as f64 / weeks_active
}

/// One row of the most-frequent-exercises ranking
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExerciseUsage {
    pub name: String,
    /// One count per logged entry, not per distinct workout
    pub count: usize,
}

/// The user's most frequently trained exercises, at most `top_n` of them.
///
/// Counts one occurrence per logged entry. Ranked by count descending;
/// ties break name-ascending so the ranking is deterministic regardless
/// of entry order.
pub fn most_frequent_exercises(store: &Store, user_id: UserId, top_n: usize) -> Vec<ExerciseUsage> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for workout in store.workouts_for(user_id) {
        for entry in store.entries_for_workout(workout.id) {
            *counts.entry(store.exercise_name_for(entry)).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<ExerciseUsage> = counts
        .into_iter()
        .map(|(name, count)| ExerciseUsage {
            name: name.to_string(),
            count,
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    ranked.truncate(top_n);
    ranked
}

/// Heaviest weight among a set of entries for one exercise.
///
/// Errors with [`Error::EmptyHistory`] on an empty set.
pub fn personal_record(entries: &[&WorkoutExercise]) -> Result<f64> {
    entries
        .iter()
        .map(|e| e.weight)
        .fold(None, |best: Option<f64>, w| {
            Some(best.map_or(w, |b| b.max(w)))
        })
        .ok_or_else(|| Error::EmptyHistory("no entries for this exercise".into()))
}

/// The statistics-view bundle for one user
#[derive(Clone, Debug)]
pub struct UserStats {
    pub total_workouts: usize,
    pub total_entries: usize,
    pub total_volume: f64,
    pub first_workout: NaiveDate,
    pub last_workout: NaiveDate,
    pub days_active: i64,
    pub workouts_per_week: f64,
    pub top_exercises: Vec<ExerciseUsage>,
}

/// Compute the full statistics view for a user.
///
/// Errors with [`Error::EmptyHistory`] when the user has no workouts;
/// callers guard with [`workout_count`].
pub fn compute_user_stats(store: &Store, user_id: UserId, top_n: usize) -> Result<UserStats> {
    let range = date_range(store, user_id)?;
    let total_workouts = workout_count(store, user_id);
    let (first_workout, last_workout) = range;

    Ok(UserStats {
        total_workouts,
        total_entries: entries_logged(store, user_id),
        total_volume: user_volume(store, user_id),
        first_workout,
        last_workout,
        days_active: (last_workout - first_workout).num_days() + 1,
        workouts_per_week: weekly_frequency(total_workouts, range),
        top_exercises: most_frequent_exercises(store, user_id, top_n),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MuscleGroup;
    use chrono::Utc;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn entry(weight: f64) -> WorkoutExercise {
        WorkoutExercise {
            id: 0,
            workout_id: 0,
            exercise_id: 0,
            sets: 3,
            reps: 5,
            weight,
            notes: None,
            created_at: Utc::now(),
        }
    }

    /// Store with one user, two workouts: 3x10@135 Bench Press on Jan 1,
    /// 4x8@225 Squat on Jan 5.
    fn two_workout_fixture() -> (Store, UserId) {
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
            .log_workout(user, date("2024-01-05"), None, None)
            .unwrap();
        store.add_entry(w2, squat, 4, 8, 225.0, None).unwrap();

        (store, user)
    }

    #[test]
    fn test_workout_volume_sums_entries() {
        let (store, user) = two_workout_fixture();
        let workouts = store.workouts_for(user);
        assert!((workout_volume(&store, workouts[0].id) - 4050.0).abs() < 1e-9);
        assert!((workout_volume(&store, workouts[1].id) - 7200.0).abs() < 1e-9);
    }

    #[test]
    fn test_workout_volume_zero_without_entries() {
        let mut store = Store::in_memory();
        let user = store.create_user("Lifter", None, None, None).unwrap();
        let workout = store
            .log_workout(user, date("2024-01-01"), None, None)
            .unwrap();
        assert_eq!(workout_volume(&store, workout), 0.0);
    }

    #[test]
    fn test_two_workout_scenario() {
        let (store, user) = two_workout_fixture();

        assert_eq!(workout_count(&store, user), 2);
        assert_eq!(entries_logged(&store, user), 2);
        assert!((user_volume(&store, user) - 11250.0).abs() < 1e-9);

        let (first, last) = date_range(&store, user).unwrap();
        assert_eq!(first, date("2024-01-01"));
        assert_eq!(last, date("2024-01-05"));

        let stats = compute_user_stats(&store, user, 5).unwrap();
        assert_eq!(stats.days_active, 5);
        assert!((stats.workouts_per_week - 2.8).abs() < 1e-9);
    }

    #[test]
    fn test_date_range_errors_on_empty_history() {
        let mut store = Store::in_memory();
        let user = store.create_user("Lifter", None, None, None).unwrap();
        assert!(matches!(
            date_range(&store, user),
            Err(Error::EmptyHistory(_))
        ));
        assert!(matches!(
            compute_user_stats(&store, user, 5),
            Err(Error::EmptyHistory(_))
        ));
    }

    #[test]
    fn test_frequency_single_workout() {
        let mut store = Store::in_memory();
        let user = store.create_user("Lifter", None, None, None).unwrap();
        store
            .log_workout(user, date("2024-01-01"), None, None)
            .unwrap();

        let range = date_range(&store, user).unwrap();
        // 1 workout over 1 day = 1 / (1/7) = 7 per week
        assert!((weekly_frequency(1, range) - 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_frequency_zero_weeks_fallback() {
        // Unreachable through the store (a real range always spans >= 1
        // day), exercised directly with a degenerate range
        let degenerate = (date("2024-01-02"), date("2024-01-01"));
        assert_eq!(weekly_frequency(3, degenerate), 0.0);
    }

    #[test]
    fn test_most_frequent_counts_per_entry() {
        let mut store = Store::in_memory();
        let user = store.create_user("Lifter", None, None, None).unwrap();
        let bench = store
            .add_exercise("Bench Press", MuscleGroup::Chest, None, None, false)
            .unwrap();
        let squat = store
            .add_exercise("Squat", MuscleGroup::Legs, None, None, false)
            .unwrap();

        // Bench twice inside one workout: both occurrences count
        let w1 = store
            .log_workout(user, date("2024-01-01"), None, None)
            .unwrap();
        store.add_entry(w1, bench, 3, 10, 135.0, None).unwrap();
        store.add_entry(w1, bench, 2, 8, 145.0, None).unwrap();
        store.add_entry(w1, squat, 4, 8, 225.0, None).unwrap();

        let ranked = most_frequent_exercises(&store, user, 5);
        assert_eq!(ranked[0].name, "Bench Press");
        assert_eq!(ranked[0].count, 2);
        assert_eq!(ranked[1].name, "Squat");
        assert_eq!(ranked[1].count, 1);

        // Sum of counts equals entries logged
        let total: usize = ranked.iter().map(|u| u.count).sum();
        assert_eq!(total, entries_logged(&store, user));
    }

    #[test]
    fn test_most_frequent_tie_breaks_by_name() {
        let mut store = Store::in_memory();
        let user = store.create_user("Lifter", None, None, None).unwrap();
        let squat = store
            .add_exercise("Squat", MuscleGroup::Legs, None, None, false)
            .unwrap();
        let bench = store
            .add_exercise("Bench Press", MuscleGroup::Chest, None, None, false)
            .unwrap();

        let w = store
            .log_workout(user, date("2024-01-01"), None, None)
            .unwrap();
        // Squat logged first, but the tie breaks alphabetically
        store.add_entry(w, squat, 3, 5, 225.0, None).unwrap();
        store.add_entry(w, bench, 3, 5, 135.0, None).unwrap();

        let ranked = most_frequent_exercises(&store, user, 5);
        assert_eq!(ranked[0].name, "Bench Press");
        assert_eq!(ranked[1].name, "Squat");
    }

    #[test]
    fn test_most_frequent_truncates_to_top_n() {
        let mut store = Store::in_memory();
        let user = store.create_user("Lifter", None, None, None).unwrap();
        let w = store
            .log_workout(user, date("2024-01-01"), None, None)
            .unwrap();
        for name in ["A", "B", "C", "D"] {
            let ex = store
                .add_exercise(name, MuscleGroup::Other, None, None, true)
                .unwrap();
            store.add_entry(w, ex, 1, 1, 10.0, None).unwrap();
        }

        assert_eq!(most_frequent_exercises(&store, user, 2).len(), 2);
        assert_eq!(most_frequent_exercises(&store, user, 10).len(), 4);
    }

    #[test]
    fn test_personal_record_is_max_weight() {
        let entries = [entry(135.0), entry(185.0), entry(160.0)];
        let refs: Vec<&WorkoutExercise> = entries.iter().collect();
        assert!((personal_record(&refs).unwrap() - 185.0).abs() < 1e-9);
    }

    #[test]
    fn test_personal_record_monotone_under_heavier_entries() {
        let mut entries = vec![entry(135.0), entry(185.0)];
        let before = {
            let refs: Vec<&WorkoutExercise> = entries.iter().collect();
            personal_record(&refs).unwrap()
        };

        entries.push(entry(185.0));
        entries.push(entry(200.0));
        let after = {
            let refs: Vec<&WorkoutExercise> = entries.iter().collect();
            personal_record(&refs).unwrap()
        };

        assert!(after >= before);
        assert!((after - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_personal_record_errors_on_empty() {
        let refs: Vec<&WorkoutExercise> = Vec::new();
        assert!(matches!(
            personal_record(&refs),
            Err(Error::EmptyHistory(_))
        ));
    }
}
