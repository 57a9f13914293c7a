// Data models shared by storage, sessions and the CLI

pub mod exercise;
pub mod goal;
pub mod photo;
pub mod settings;
pub mod template;
pub mod workout;

pub use exercise::Exercise;
pub use goal::{Goal, GoalKind, Timeframe};
pub use photo::{PhotoCategory, ProgressPhoto};
pub use settings::{UserProfile, UserSettings, WeightUnit};
pub use template::{PlannedExercise, SetSpec, WorkoutTemplate, DEFAULT_REST_SECONDS};
pub use workout::{
    CompletedWorkout, ExerciseLog, PreviousPerformance, WorkoutFilter, WorkoutSet, WorkoutStats,
};
