//! CSV export of a user's logged workout history.
//!
//! One row per logged entry, ordered oldest workout first so the file
//! reads as a training log. The file is flushed and fsynced before the
//! function returns.

use crate::types::UserId;
use crate::{Result, Store};

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    date: String,
    exercise: String,
    muscle_group: String,
    sets: u32,
    reps: u32,
    weight: f64,
    volume: f64,
    notes: Option<String>,
}

/// Write a user's complete logged history to `path` as CSV.
///
/// Rows are ordered by workout date ascending, then workout id, then
/// entry id. Returns the number of rows written; a user with no history
/// produces a header-only file. Any existing file is replaced.
pub fn export_user_history(
    store: &Store,
    user_id: UserId,
    path: &std::path::Path,
) -> Result<usize> {
    let mut workouts = store.workouts_for(user_id);
    workouts.sort_by_key(|w| (w.date, w.id));

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut writer = csv::WriterBuilder::new().from_path(path)?;
    let mut rows = 0;

    for workout in workouts {
        for entry in store.entries_for_workout(workout.id) {
            let group = store
                .exercise(entry.exercise_id)
                .map(|e| e.muscle_group.to_string())
                .unwrap_or_else(|| "Unknown".to_string());

            writer.serialize(CsvRow {
                date: workout.date.to_string(),
                exercise: store.exercise_name_for(entry).to_string(),
                muscle_group: group,
                sets: entry.sets,
                reps: entry.reps,
                weight: entry.weight,
                volume: entry.volume(),
                notes: entry.notes.clone(),
            })?;
            rows += 1;
        }
    }

    if rows == 0 {
        // serialize() only emits headers alongside a first row
        writer.write_record([
            "date",
            "exercise",
            "muscle_group",
            "sets",
            "reps",
            "weight",
            "volume",
            "notes",
        ])?;
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    file.sync_all()?;

    tracing::info!("Exported {} history rows for user {} to {:?}", rows, user_id, path);
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MuscleGroup;
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_export_writes_rows_in_date_order() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("history.csv");

        let mut store = Store::in_memory();
        let user = store.create_user("Lifter", None, None, None).unwrap();
        let bench = store
            .add_exercise("Bench Press", MuscleGroup::Chest, None, None, false)
            .unwrap();
        let squat = store
            .add_exercise("Squat", MuscleGroup::Legs, None, None, false)
            .unwrap();

        // Logged out of date order on purpose
        let later = store
            .log_workout(user, date("2024-01-05"), None, None)
            .unwrap();
        store.add_entry(later, squat, 4, 8, 225.0, None).unwrap();
        let earlier = store
            .log_workout(user, date("2024-01-01"), None, None)
            .unwrap();
        store.add_entry(earlier, bench, 3, 10, 135.0, None).unwrap();

        let rows = export_user_history(&store, user, &csv_path).unwrap();
        assert_eq!(rows, 2);

        let contents = std::fs::read_to_string(&csv_path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3); // header + 2 rows
        assert!(lines[0].starts_with("date,exercise,muscle_group"));
        assert!(lines[1].starts_with("2024-01-01,Bench Press,Chest,3,10,135"));
        assert!(lines[2].starts_with("2024-01-05,Squat,Legs,4,8,225"));
    }

    #[test]
    fn test_export_empty_history_is_header_only() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("history.csv");

        let mut store = Store::in_memory();
        let user = store.create_user("Lifter", None, None, None).unwrap();

        let rows = export_user_history(&store, user, &csv_path).unwrap();
        assert_eq!(rows, 0);

        let contents = std::fs::read_to_string(&csv_path).unwrap();
        assert_eq!(contents.lines().count(), 1);
        assert!(contents.starts_with("date,exercise,muscle_group"));
    }
}
