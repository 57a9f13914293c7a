// First-run catalogue and starter template

use crate::models::{Exercise, PlannedExercise, SetSpec, WorkoutTemplate};

const DEFAULT_CATALOGUE: &[(&str, &[&str])] = &[
    ("Bench Press", &["chest", "triceps", "shoulders"]),
    ("Squat", &["quads", "glutes", "hamstrings"]),
    ("Deadlift", &["back", "glutes", "hamstrings"]),
    ("Overhead Press", &["shoulders", "triceps"]),
    ("Pull-up", &["back", "biceps"]),
    ("Barbell Row", &["back", "biceps", "forearms", "traps"]),
    ("Leg Press", &["quads", "glutes"]),
    ("Dumbbell Curl", &["biceps", "forearms"]),
    ("Tricep Extension", &["triceps"]),
    ("Lateral Raise", &["shoulders"]),
    ("Ab Rollout", &["abs", "shoulders"]),
    ("Arnold Press", &["shoulders", "triceps"]),
    ("Back Extension", &["back", "hamstrings", "glutes"]),
    ("Bar Triceps Pushdown", &["triceps"]),
    ("Barbell Curl", &["biceps", "forearms"]),
    ("Barbell Hip Thrust", &["glutes", "hamstrings"]),
    ("Barbell Shrug", &["traps"]),
    ("Bench Dips", &["triceps"]),
    ("Bicep Curl", &["biceps"]),
    ("Box Jump", &["quads", "hamstrings"]),
    ("Bulgarian Split Squat", &["quads", "hamstrings"]),
    ("Cable Crunch", &["abs"]),
    ("Cable Fly", &["chest"]),
];

/// (exercise, [(target reps, rest seconds)])
const STARTER_PLAN: &[(&str, &[(u32, u32)])] = &[
    ("Squat", &[(10, 90), (10, 90), (8, 90)]),
    ("Bench Press", &[(12, 60), (10, 60), (8, 60)]),
    ("Barbell Row", &[(12, 60), (12, 60), (10, 60)]),
    ("Overhead Press", &[(10, 60), (10, 60), (8, 60)]),
    ("Bicep Curl", &[(12, 45), (12, 45), (12, 45)]),
    ("Tricep Extension", &[(12, 45), (12, 45), (12, 45)]),
];

pub fn default_exercises() -> Vec<Exercise> {
    DEFAULT_CATALOGUE
        .iter()
        .map(|(name, muscles)| {
            Exercise::new(*name, muscles.iter().map(|m| m.to_string()).collect())
        })
        .collect()
}

/// "Full Body Workout" built from catalogue entries
pub fn default_template(catalogue: &[Exercise]) -> WorkoutTemplate {
    let mut template = WorkoutTemplate::new("Full Body Workout");
    template.category = Some("Full Body".to_string());

    template.exercises = STARTER_PLAN
        .iter()
        .filter_map(|(name, sets)| {
            let exercise = catalogue.iter().find(|e| e.name == *name)?;
            Some(PlannedExercise {
                exercise_id: exercise.id.clone(),
                exercise_name: exercise.name.clone(),
                sets: sets
                    .iter()
                    .map(|&(reps, rest)| SetSpec::new(reps, rest))
                    .collect(),
            })
        })
        .collect();

    template
}
