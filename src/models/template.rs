use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Rest period used when a set has none configured
pub const DEFAULT_REST_SECONDS: u32 = 60;

/// A reusable plan of exercises and target sets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutTemplate {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub last_used: Option<DateTime<Utc>>,
    pub exercises: Vec<PlannedExercise>,
}

/// One exercise inside a template, in logging order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedExercise {
    pub exercise_id: String,
    pub exercise_name: String,
    pub sets: Vec<SetSpec>,
}

/// Target for a single planned set
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SetSpec {
    pub target_reps: u32,
    #[serde(default)]
    pub rest_seconds: Option<u32>,
}

impl WorkoutTemplate {
    /// Create an empty template with a generated ID
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            description: None,
            category: None,
            last_used: None,
            exercises: Vec::new(),
        }
    }

    /// Append a planned exercise
    pub fn with_exercise(
        mut self,
        exercise_id: impl Into<String>,
        exercise_name: impl Into<String>,
        sets: Vec<SetSpec>,
    ) -> Self {
        self.exercises.push(PlannedExercise {
            exercise_id: exercise_id.into(),
            exercise_name: exercise_name.into(),
            sets,
        });
        self
    }

    /// Total number of planned sets across all exercises
    pub fn total_sets(&self) -> usize {
        self.exercises.iter().map(|e| e.sets.len()).sum()
    }

    pub fn mark_used(&mut self, at: DateTime<Utc>) {
        self.last_used = Some(at);
    }
}

impl SetSpec {
    pub fn new(target_reps: u32, rest_seconds: u32) -> Self {
        Self {
            target_reps,
            rest_seconds: Some(rest_seconds),
        }
    }

    /// Configured rest, falling back to `default` when unset or zero
    pub fn rest_or(&self, default: u32) -> u32 {
        match self.rest_seconds {
            Some(secs) if secs > 0 => secs,
            _ => default,
        }
    }
}
