use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use fitness_core::*;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "fittrack")]
#[command(about = "Personal fitness tracker and workout log", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive menu (default)
    Menu,

    /// Populate the exercise library with the built-in defaults
    Seed,

    /// Print the statistics view for a user
    Stats {
        /// User name, exact match
        #[arg(long)]
        user: String,
    },

    /// Export a user's logged history to CSV
    Export {
        /// User name, exact match
        #[arg(long)]
        user: String,

        /// Output CSV path
        #[arg(long)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    fitness_core::logging::init();

    let cli = Cli::parse();

    // Determine data directory
    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    let store_path = data_dir.join("store.json");

    match cli.command {
        Some(Commands::Seed) => cmd_seed(&store_path),
        Some(Commands::Stats { user }) => cmd_stats(&store_path, &user, &config),
        Some(Commands::Export { user, output }) => cmd_export(&store_path, &user, &output),
        Some(Commands::Menu) | None => cmd_menu(&store_path, &config),
    }
}

// ============================================================================
// Subcommands
// ============================================================================

/// Refuse to seed from a built-in library that fails its own checks.
fn check_library() -> Result<()> {
    let errors = catalog::validate_library();
    if errors.is_empty() {
        return Ok(());
    }
    eprintln!("Built-in exercise library is invalid:");
    for error in errors {
        eprintln!("  - {}", error);
    }
    Err(Error::Validation("invalid built-in exercise library".into()))
}

fn cmd_seed(store_path: &Path) -> Result<()> {
    check_library()?;

    let mut store = Store::open(store_path)?;
    let inserted = seed_default_exercises(&mut store)?;

    if inserted == 0 {
        println!(
            "Exercise library already populated ({} exercises).",
            store.exercise_count()
        );
    } else {
        store.save()?;
        println!("✓ Seeded {} exercises into the library.", inserted);
    }
    Ok(())
}

fn cmd_stats(store_path: &Path, user_name: &str, config: &Config) -> Result<()> {
    let store = Store::open(store_path)?;
    let user = store
        .find_user_by_name(user_name)
        .ok_or_else(|| Error::NotFound(format!("user '{}'", user_name)))?;

    if stats::workout_count(&store, user.id) == 0 {
        println!("\n  No workout data available yet.");
        return Ok(());
    }

    let summary = stats::compute_user_stats(&store, user.id, config.stats.top_exercises)?;
    print_subheader(&format!("Statistics - {}", user.name));
    print_stats(&summary, &config.display.weight_unit);
    Ok(())
}

fn cmd_export(store_path: &Path, user_name: &str, output: &Path) -> Result<()> {
    let store = Store::open(store_path)?;
    let user = store
        .find_user_by_name(user_name)
        .ok_or_else(|| Error::NotFound(format!("user '{}'", user_name)))?;

    let rows = export_user_history(&store, user.id, output)?;
    println!("✓ Exported {} rows to {}", rows, output.display());
    Ok(())
}

// ============================================================================
// Interactive menu
// ============================================================================

fn cmd_menu(store_path: &Path, config: &Config) -> Result<()> {
    println!("Initializing Fitness Tracker...");
    let mut store = Store::open(store_path)?;

    // Offer to seed on first run
    if store.exercise_count() == 0 {
        println!("\n! Exercise library is empty.");
        if confirm("Would you like to populate it with default exercises?")? {
            check_library()?;
            let inserted = seed_default_exercises(&mut store)?;
            store.save()?;
            println!("✓ Seeded {} exercises.", inserted);
        }
    }

    // The active user lives here for the duration of the loop; no global
    let mut session: Option<Session> = None;

    loop {
        print_header("FITNESS TRACKER & WORKOUT PLANNER");

        match &session {
            Some(s) => {
                println!("\n  Current User: {}", s.user_name);
                println!(
                    "  Workouts Logged: {}",
                    stats::workout_count(&store, s.user_id)
                );
            }
            None => println!("\n  No user selected - please create or select a user"),
        }

        println!("\n  MAIN MENU:");
        println!("  1. User Management (Create/Switch User)");
        println!("  2. Log New Workout");
        println!("  3. View Workout History");
        println!("  4. View Exercise History");
        println!("  5. View Statistics");
        println!("  6. Search Exercise Library");
        println!("  7. Add Custom Exercise");
        println!("  0. Exit");

        let choice = prompt("\n  Enter your choice: ")?;
        match choice.as_str() {
            "1" => user_management(&mut store, &mut session, config)?,
            "2" => log_workout(&mut store, &session, config)?,
            "3" => view_workout_history(&store, &session, config)?,
            "4" => view_exercise_history(&store, &session, config)?,
            "5" => view_statistics(&store, &session, config)?,
            "6" => search_library(&store)?,
            "7" => add_custom_exercise(&mut store)?,
            "0" => {
                print_header("Thank you for using Fittrack! Keep pushing your limits!");
                break;
            }
            _ => println!("\n✗ Invalid choice. Please enter a number from the menu."),
        }
    }

    Ok(())
}

// ============================================================================
// User management
// ============================================================================

fn user_management(
    store: &mut Store,
    session: &mut Option<Session>,
    config: &Config,
) -> Result<()> {
    loop {
        print_subheader("User Management");

        match session {
            Some(s) => println!("\n  Current User: {}", s.user_name),
            None => println!("\n  No user selected"),
        }

        println!("\n  1. Create New User");
        println!("  2. List All Users");
        println!("  3. Switch User");
        println!("  0. Back to Main Menu");

        let choice = prompt("\n  Enter choice: ")?;
        match choice.as_str() {
            "1" => create_user_flow(store, session)?,
            "2" => {
                list_users(store, config);
            }
            "3" => switch_user(store, session, config)?,
            "0" => break,
            _ => println!("✗ Invalid choice. Please try again."),
        }
    }
    Ok(())
}

fn create_user_flow(store: &mut Store, session: &mut Option<Session>) -> Result<()> {
    print_subheader("Create New User");

    let name = prompt("\n  Enter your name: ")?;
    if name.is_empty() {
        println!("✗ Name cannot be empty.");
        return Ok(());
    }

    let age = prompt_optional_u32("  Enter your age (optional, press Enter to skip): ")?;
    let weight = prompt_optional_f64("  Enter your weight (optional, press Enter to skip): ")?;
    let goal = prompt_optional("  Enter your fitness goal (optional, press Enter to skip): ")?;

    let user_id = store.create_user(&name, age, weight, goal)?;
    store.save()?;

    println!("\n✓ User '{}' created successfully! (ID: {})", name, user_id);

    if let Some(user) = store.user(user_id) {
        *session = Some(Session::for_user(user));
        println!("  '{}' is now the active user.", name);
    }
    Ok(())
}

/// Print the user roster and return the ids in display order.
fn list_users(store: &Store, config: &Config) -> Vec<UserId> {
    let users = store.users();
    if users.is_empty() {
        println!("\n  No users found. Create a user first!");
        return Vec::new();
    }

    println!("\n  Total Users: {}\n", users.len());
    for (idx, user) in users.iter().enumerate() {
        println!("  {}. {} (ID: {})", idx + 1, user.name, user.id);
        if let Some(age) = user.age {
            println!("     Age: {}", age);
        }
        if let Some(weight) = user.weight {
            println!("     Weight: {} {}", weight, config.display.weight_unit);
        }
        if let Some(goal) = &user.fitness_goal {
            println!("     Goal: {}", goal);
        }
        println!("     Workouts: {}", stats::workout_count(store, user.id));
        println!();
    }

    users.iter().map(|u| u.id).collect()
}

fn switch_user(store: &Store, session: &mut Option<Session>, config: &Config) -> Result<()> {
    print_subheader("Switch User");

    let ids = list_users(store, config);
    if ids.is_empty() {
        return Ok(());
    }

    let Some(idx) = choose_index(ids.len())? else {
        println!("  Cancelled.");
        return Ok(());
    };

    if let Some(user) = store.user(ids[idx]) {
        *session = Some(Session::for_user(user));
        println!("\n✓ Switched to user: {}", user.name);
    }
    Ok(())
}

// ============================================================================
// Workout logging
// ============================================================================

fn log_workout(store: &mut Store, session: &Option<Session>, config: &Config) -> Result<()> {
    let Some(session) = session else {
        println!("\n✗ Please select or create a user first!");
        return Ok(());
    };

    print_subheader(&format!("Log New Workout - {}", session.user_name));

    println!("\n  Enter workout date (YYYY-MM-DD or 'today'):");
    let date = prompt_date("  Date: ")?;
    let notes = prompt_optional("\n  Workout notes (optional, press Enter to skip): ")?;

    let workout_id = store.log_workout(session.user_id, date, None, notes)?;
    println!("\n✓ Workout session created for {}", date);
    println!("\n  Now let's add exercises to this workout...");

    loop {
        println!("\n{}", "-".repeat(60));
        println!("  Add Exercise");
        println!("{}", "-".repeat(60));

        let term = prompt("\n  Search exercise by name (or 'cancel' to finish): ")?;
        if term.eq_ignore_ascii_case("cancel") {
            break;
        }

        let matches = query::search_by_name(store, &term);
        let exercise_id = if matches.is_empty() {
            println!("\n  No exercises found matching '{}'", term);
            if confirm("Would you like to browse by muscle group?")? {
                match browse_by_muscle_group(store)? {
                    Some(id) => id,
                    None => continue,
                }
            } else {
                continue;
            }
        } else {
            display_exercise_list(&matches);
            match choose_index(matches.len())? {
                Some(idx) => matches[idx].id,
                None => continue,
            }
        };

        let name = store
            .exercise(exercise_id)
            .map(|e| e.name.clone())
            .unwrap_or_default();

        println!("\n  Adding: {}", name);
        let sets = prompt_u32_min("  Sets: ", 1)?;
        let reps = prompt_u32_min("  Reps: ", 1)?;
        let weight = prompt_f64_min(
            &format!("  Weight ({}): ", config.display.weight_unit),
            0.0,
        )?;
        let entry_notes = prompt_optional("  Notes (optional, press Enter to skip): ")?;

        store.add_entry(workout_id, exercise_id, sets, reps, weight, entry_notes)?;
        println!(
            "\n✓ Added: {} - {}x{} @ {}{}",
            name, sets, reps, weight, config.display.weight_unit
        );

        if !confirm("Add another exercise?")? {
            break;
        }
    }

    store.save()?;

    print_header("WORKOUT SUMMARY");
    print_workout_summary(store, workout_id, config);
    println!("\n✓ Workout logged successfully! (ID: {})", workout_id);
    Ok(())
}

fn browse_by_muscle_group(store: &Store) -> Result<Option<ExerciseId>> {
    println!("\n  Select Muscle Group:");
    for (idx, group) in MuscleGroup::STANDARD.iter().enumerate() {
        println!("  {}. {}", idx + 1, group);
    }
    println!("  0. Cancel");

    let Some(idx) = choose_index(MuscleGroup::STANDARD.len())? else {
        return Ok(None);
    };
    let group = MuscleGroup::STANDARD[idx];

    let matches = query::filter_by_muscle_group(store, group);
    if matches.is_empty() {
        println!("\n  No exercises found for {}", group);
        return Ok(None);
    }

    display_exercise_list(&matches);
    Ok(choose_index(matches.len())?.map(|i| matches[i].id))
}

// ============================================================================
// History and statistics views
// ============================================================================

fn view_workout_history(store: &Store, session: &Option<Session>, config: &Config) -> Result<()> {
    let Some(session) = session else {
        println!("\n✗ Please select or create a user first!");
        return Ok(());
    };

    print_subheader(&format!("Workout History - {}", session.user_name));

    let mut workouts = store.workouts_for(session.user_id);
    if workouts.is_empty() {
        println!("\n  No workouts logged yet. Start logging workouts!");
        return Ok(());
    }

    // Most recent first; same-date sessions keep id order
    workouts.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));

    println!("\n  Total Workouts: {}", workouts.len());
    println!(
        "  Total Exercises Logged: {}",
        stats::entries_logged(store, session.user_id)
    );

    for (idx, workout) in workouts.iter().enumerate() {
        print_header(&format!("WORKOUT #{}", idx + 1));
        print_workout_summary(store, workout.id, config);
        if let Some(notes) = &workout.notes {
            println!("  Notes: {}", notes);
        }
    }
    Ok(())
}

fn view_exercise_history(store: &Store, session: &Option<Session>, config: &Config) -> Result<()> {
    let Some(session) = session else {
        println!("\n✗ Please select or create a user first!");
        return Ok(());
    };

    print_subheader(&format!("Exercise History - {}", session.user_name));

    let term = prompt("\n  Search exercise by name: ")?;
    if term.is_empty() {
        println!("✗ Search term cannot be empty.");
        return Ok(());
    }

    let matches = query::search_by_name(store, &term);
    if matches.is_empty() {
        println!("\n  No exercises found matching '{}'", term);
        return Ok(());
    }

    display_exercise_list(&matches);
    let Some(idx) = choose_index(matches.len())? else {
        return Ok(());
    };
    let exercise = matches[idx];

    let history = query::exercise_history(store, session.user_id, exercise.id);
    if history.is_empty() {
        println!("\n  No history found for {}", exercise.name);
        return Ok(());
    }

    print_header(&format!("EXERCISE HISTORY: {}", exercise.name));
    println!("\n  Total Sessions: {}", history.len());

    // Non-empty history checked above
    let entries: Vec<&WorkoutExercise> = history.iter().map(|h| h.entry).collect();
    let record = stats::personal_record(&entries)?;
    println!(
        "  Personal Record: {} {}",
        record, config.display.weight_unit
    );

    println!("\n  Session History:");
    for (idx, sample) in history.iter().enumerate() {
        println!("\n  {}. Date: {}", idx + 1, sample.date);
        println!(
            "     {} sets × {} reps @ {} {}",
            sample.entry.sets, sample.entry.reps, sample.entry.weight, config.display.weight_unit
        );
        println!(
            "     Volume: {:.1} {}",
            sample.entry.volume(),
            config.display.weight_unit
        );
        if let Some(notes) = &sample.entry.notes {
            println!("     Notes: {}", notes);
        }
    }
    Ok(())
}

fn view_statistics(store: &Store, session: &Option<Session>, config: &Config) -> Result<()> {
    let Some(session) = session else {
        println!("\n✗ Please select or create a user first!");
        return Ok(());
    };

    print_subheader(&format!("Statistics - {}", session.user_name));

    if stats::workout_count(store, session.user_id) == 0 {
        println!("\n  No workout data available yet.");
        return Ok(());
    }

    let summary = stats::compute_user_stats(store, session.user_id, config.stats.top_exercises)?;
    print_stats(&summary, &config.display.weight_unit);
    Ok(())
}

fn print_stats(summary: &UserStats, unit: &str) {
    print_header("OVERALL STATISTICS");
    println!("\n  Total Workouts: {}", summary.total_workouts);
    println!("  Total Exercises Logged: {}", summary.total_entries);
    println!("  Total Volume Lifted: {:.1} {}", summary.total_volume, unit);
    println!("\n  First Workout: {}", summary.first_workout);
    println!("  Latest Workout: {}", summary.last_workout);
    println!("  Days Active: {}", summary.days_active);
    println!(
        "  Workout Frequency: {:.1} workouts/week",
        summary.workouts_per_week
    );

    println!("\n  Most Frequently Trained Exercises:");
    for (idx, usage) in summary.top_exercises.iter().enumerate() {
        println!("    {}. {}: {} sessions", idx + 1, usage.name, usage.count);
    }
}

// ============================================================================
// Exercise library
// ============================================================================

fn search_library(store: &Store) -> Result<()> {
    print_subheader("Search Exercise Library");

    println!("\n  Search Options:");
    println!("  1. Search by name");
    println!("  2. Browse by muscle group");
    println!("  3. View all exercises");
    println!("  0. Cancel");

    let choice = prompt("\n  Enter choice: ")?;
    match choice.as_str() {
        "1" => {
            let term = prompt("\n  Enter search term: ")?;
            if term.is_empty() {
                println!("✗ Search term cannot be empty.");
                return Ok(());
            }
            display_exercise_list(&query::search_by_name(store, &term));
        }
        "2" => {
            println!("\n  Select Muscle Group:");
            for (idx, group) in MuscleGroup::STANDARD.iter().enumerate() {
                println!("  {}. {}", idx + 1, group);
            }
            println!("  0. Cancel");

            if let Some(idx) = choose_index(MuscleGroup::STANDARD.len())? {
                let group = MuscleGroup::STANDARD[idx];
                display_exercise_list(&query::filter_by_muscle_group(store, group));
            }
        }
        "3" => {
            let total = store.exercise_count();
            if total == 0 {
                println!("\n  No exercises in library.");
                return Ok(());
            }

            println!("\n  Total Exercises: {}", total);
            for group in MuscleGroup::ALL {
                let in_group = query::filter_by_muscle_group(store, group);
                if in_group.is_empty() {
                    continue;
                }
                println!("\n  === {} ({} exercises) ===", group, in_group.len());
                for exercise in in_group {
                    println!("    • {}", exercise.name);
                    if let Some(equipment) = &exercise.equipment {
                        println!("      Equipment: {}", equipment);
                    }
                }
            }
        }
        "0" => {}
        _ => println!("✗ Invalid choice."),
    }
    Ok(())
}

fn add_custom_exercise(store: &mut Store) -> Result<()> {
    print_subheader("Add Custom Exercise");

    let name = prompt("\n  Exercise name: ")?;
    if name.is_empty() {
        println!("✗ Exercise name cannot be empty.");
        return Ok(());
    }

    println!("\n  Select Muscle Group:");
    for (idx, group) in MuscleGroup::ALL.iter().enumerate() {
        println!("  {}. {}", idx + 1, group);
    }

    let group = loop {
        let raw = prompt(&format!("\n  Enter choice (1-{}): ", MuscleGroup::ALL.len()))?;
        match raw.parse::<usize>() {
            Ok(v) if (1..=MuscleGroup::ALL.len()).contains(&v) => break MuscleGroup::ALL[v - 1],
            _ => println!(
                "✗ Please enter a number between 1 and {}",
                MuscleGroup::ALL.len()
            ),
        }
    };

    let equipment = prompt_optional("\n  Equipment needed (optional, press Enter to skip): ")?;
    let description = prompt_optional("  Description (optional, press Enter to skip): ")?;

    match store.add_exercise(&name, group, equipment, description, true) {
        Ok(_) => {
            store.save()?;
            println!("\n✓ Custom exercise '{}' added successfully!", name);
        }
        Err(Error::DuplicateExercise(_)) => {
            println!("✗ Exercise '{}' already exists in the library.", name);
        }
        Err(e) => return Err(e),
    }
    Ok(())
}

// ============================================================================
// Display helpers
// ============================================================================

fn print_header(text: &str) {
    println!("\n{}", "=".repeat(60));
    println!("  {}", text);
    println!("{}", "=".repeat(60));
}

fn print_subheader(text: &str) {
    println!("\n{}", "-".repeat(60));
    println!("  {}", text);
    println!("{}", "-".repeat(60));
}

fn display_exercise_list(exercises: &[&Exercise]) {
    if exercises.is_empty() {
        println!("  No exercises found.");
        return;
    }

    println!("\n  Found {} exercise(s):\n", exercises.len());
    for (idx, exercise) in exercises.iter().enumerate() {
        println!("  {}. {}", idx + 1, exercise.name);
        println!("     Muscle Group: {}", exercise.muscle_group);
        println!(
            "     Equipment: {}",
            exercise.equipment.as_deref().unwrap_or("None")
        );
        if let Some(description) = &exercise.description {
            println!("     Description: {}", description);
        }
        println!();
    }
}

fn print_workout_summary(store: &Store, workout_id: WorkoutId, config: &Config) {
    let Some(workout) = store.workout(workout_id) else {
        return;
    };
    let entries = store.entries_for_workout(workout_id);

    println!("\n  Date: {}", workout.date);
    println!("  Exercises: {}", entries.len());
    println!(
        "  Total Volume: {:.1} {}",
        stats::workout_volume(store, workout_id),
        config.display.weight_unit
    );

    if entries.is_empty() {
        println!("    (No exercises logged)");
    }
    for entry in entries {
        println!(
            "    {}: {}x{} @ {}{}",
            store.exercise_name_for(entry),
            entry.sets,
            entry.reps,
            entry.weight,
            config.display.weight_unit
        );
    }
}

// ============================================================================
// Prompt helpers
// ============================================================================

/// Read one trimmed line. End of input is a user-initiated abort and exits
/// the process cleanly.
fn prompt(msg: &str) -> Result<String> {
    print!("{}", msg);
    io::stdout().flush()?;

    let mut input = String::new();
    if io::stdin().read_line(&mut input)? == 0 {
        println!("\n  Goodbye!");
        std::process::exit(0);
    }
    Ok(input.trim().to_string())
}

fn prompt_optional(msg: &str) -> Result<Option<String>> {
    let value = prompt(msg)?;
    Ok(if value.is_empty() { None } else { Some(value) })
}

fn prompt_optional_u32(msg: &str) -> Result<Option<u32>> {
    loop {
        let raw = prompt(msg)?;
        if raw.is_empty() {
            return Ok(None);
        }
        match raw.parse::<u32>() {
            Ok(v) => return Ok(Some(v)),
            Err(_) => println!("✗ Invalid input. Please enter a valid number."),
        }
    }
}

fn prompt_optional_f64(msg: &str) -> Result<Option<f64>> {
    loop {
        let raw = prompt(msg)?;
        if raw.is_empty() {
            return Ok(None);
        }
        match raw.parse::<f64>() {
            Ok(v) if v.is_finite() => return Ok(Some(v)),
            _ => println!("✗ Invalid input. Please enter a valid number."),
        }
    }
}

fn prompt_u32_min(msg: &str, min: u32) -> Result<u32> {
    loop {
        let raw = prompt(msg)?;
        match raw.parse::<u32>() {
            Ok(v) if v >= min => return Ok(v),
            Ok(_) => println!("✗ Please enter a number >= {}", min),
            Err(_) => println!("✗ Invalid input. Please enter a valid number."),
        }
    }
}

fn prompt_f64_min(msg: &str, min: f64) -> Result<f64> {
    loop {
        let raw = prompt(msg)?;
        match raw.parse::<f64>() {
            Ok(v) if v.is_finite() && v >= min => return Ok(v),
            Ok(_) => println!("✗ Please enter a number >= {}", min),
            Err(_) => println!("✗ Invalid input. Please enter a valid number."),
        }
    }
}

fn prompt_date(msg: &str) -> Result<NaiveDate> {
    loop {
        let raw = prompt(msg)?;
        if raw.eq_ignore_ascii_case("today") {
            return Ok(Local::now().date_naive());
        }
        match NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
            Ok(date) => return Ok(date),
            Err(_) => println!("✗ Invalid date format. Please use YYYY-MM-DD (or type 'today')"),
        }
    }
}

fn confirm(msg: &str) -> Result<bool> {
    let response = prompt(&format!("\n  {} (y/n): ", msg))?.to_lowercase();
    Ok(response == "y" || response == "yes")
}

/// Re-prompt until the user picks a valid 1-based index or cancels with 0.
fn choose_index(len: usize) -> Result<Option<usize>> {
    loop {
        let raw = prompt(&format!("\n  Select (1-{}, or 0 to cancel): ", len))?;
        match select_by_index(len, &raw) {
            Ok(Selection::Chosen(idx)) => return Ok(Some(idx)),
            Ok(Selection::Cancelled) => return Ok(None),
            Err(e) => println!("✗ {}", e),
        }
    }
}
