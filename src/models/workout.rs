use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One logged (weight, reps) performance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSet {
    pub weight: f64,
    pub reps: u32,
    pub timestamp: DateTime<Utc>,
}

impl WorkoutSet {
    pub fn new(weight: f64, reps: u32) -> Self {
        Self {
            weight,
            reps,
            timestamp: Utc::now(),
        }
    }

    pub fn volume(&self) -> f64 {
        self.weight * self.reps as f64
    }

    /// Both weight and reps must be positive for a set to be recorded
    pub fn is_valid(&self) -> bool {
        self.weight.is_finite() && self.weight > 0.0 && self.reps > 0
    }
}

/// Sets logged for one exercise, with the name denormalized for history display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseLog {
    pub exercise_id: String,
    pub exercise_name: String,
    pub sets: Vec<WorkoutSet>,
}

impl ExerciseLog {
    pub fn volume(&self) -> f64 {
        self.sets.iter().map(WorkoutSet::volume).sum()
    }

    /// Heaviest set, first occurrence winning ties
    pub fn heaviest_set(&self) -> Option<&WorkoutSet> {
        self.sets.iter().fold(None, |best: Option<&WorkoutSet>, set| match best {
            Some(b) if b.weight >= set.weight => Some(b),
            _ => Some(set),
        })
    }
}

/// Aggregate figures stored alongside a completed workout
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WorkoutStats {
    pub total_volume: f64,
    pub total_sets: usize,
    pub completed_exercises: usize,
    pub average_weight: f64,
}

/// A finished, persisted workout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedWorkout {
    pub id: String,
    /// Session start time
    pub date: DateTime<Utc>,
    pub duration_seconds: u64,
    #[serde(default)]
    pub template_id: Option<String>,
    #[serde(default)]
    pub template_name: Option<String>,
    pub exercises: Vec<ExerciseLog>,
    pub stats: WorkoutStats,
}

impl CompletedWorkout {
    pub fn total_volume(&self) -> f64 {
        self.exercises.iter().map(ExerciseLog::volume).sum()
    }

    pub fn find_exercise(&self, exercise_id: &str) -> Option<&ExerciseLog> {
        self.exercises.iter().find(|e| e.exercise_id == exercise_id)
    }

    /// Case-insensitive match against the template name and exercise names
    pub fn matches_search(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        if query.is_empty() {
            return true;
        }

        let template_match = self
            .template_name
            .as_deref()
            .map(|name| name.to_lowercase().contains(&query))
            .unwrap_or(false);

        template_match
            || self
                .exercises
                .iter()
                .any(|e| e.exercise_name.to_lowercase().contains(&query))
    }
}

/// Reference performance shown next to the current set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviousPerformance {
    pub weight: f64,
    pub reps: u32,
    pub date: DateTime<Utc>,
}

/// Filter criteria for listing workouts
#[derive(Debug, Default)]
pub struct WorkoutFilter {
    pub search: Option<String>,
    pub template_id: Option<String>,
    pub from_date: Option<DateTime<Utc>>,
    pub to_date: Option<DateTime<Utc>>,
}

impl WorkoutFilter {
    pub fn matches(&self, workout: &CompletedWorkout) -> bool {
        if let Some(ref query) = self.search {
            if !workout.matches_search(query) {
                return false;
            }
        }

        if let Some(ref template_id) = self.template_id {
            if workout.template_id.as_ref() != Some(template_id) {
                return false;
            }
        }

        if let Some(from) = self.from_date {
            if workout.date < from {
                return false;
            }
        }

        if let Some(to) = self.to_date {
            if workout.date > to {
                return false;
            }
        }

        true
    }
}
