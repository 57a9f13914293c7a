use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, Utc};

use crate::models::{CompletedWorkout, Goal, GoalKind, Timeframe};
use crate::services::history_service;
use crate::storage::Storage;

pub struct GoalService<'a> {
    storage: &'a Storage,
}

impl<'a> GoalService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn create_goal(&self, kind: GoalKind, target: f64, unit: Option<String>) -> Result<Goal> {
        if target.is_nan() || target <= 0.0 {
            anyhow::bail!("Goal target must be greater than zero");
        }

        let goal = Goal::new(kind, target, unit);
        self.storage.save_goal(&goal)?;

        tracing::info!("Created goal {} ({})", goal.id, goal.title());
        Ok(goal)
    }

    pub fn list_goals(&self, include_completed: bool) -> Result<Vec<Goal>> {
        self.storage.list_goals(include_completed)
    }

    /// Record a manual progress value, completing the goal when it is reached
    pub fn update_progress(&self, goal_id: &str, value: f64) -> Result<Goal> {
        let mut goal = self
            .storage
            .get_goal(goal_id)?
            .with_context(|| format!("Goal {} not found", goal_id))?;

        goal.update_progress(value);
        if !goal.completed && goal.is_reached() {
            goal.mark_complete();
        }

        self.storage.save_goal(&goal)?;
        Ok(goal)
    }

    /// Recompute derived goals from workout history
    ///
    /// Returns the goals completed by this refresh.
    pub fn refresh_from_history(&self, now: DateTime<Utc>) -> Result<Vec<Goal>> {
        let workouts = self.storage.list_workouts()?;
        let mut newly_completed = Vec::new();

        for mut goal in self.storage.list_goals(false)? {
            let Some(value) = derived_value(&goal.kind, &workouts, now) else {
                continue;
            };

            if value == goal.current {
                continue;
            }

            goal.update_progress(value);
            if goal.is_reached() {
                goal.mark_complete();
                newly_completed.push(goal.clone());
            }

            self.storage.save_goal(&goal)?;
            tracing::debug!("Goal {} progress now {}", goal.id, goal.current);
        }

        Ok(newly_completed)
    }

    pub fn complete_goal(&self, goal_id: &str) -> Result<()> {
        self.storage.complete_goal(goal_id)
    }

    pub fn delete_goal(&self, goal_id: &str) -> Result<bool> {
        self.storage.delete_goal(goal_id)
    }
}

/// Current value of a goal as implied by history; None for goals tracked by hand
pub fn derived_value(
    kind: &GoalKind,
    workouts: &[CompletedWorkout],
    now: DateTime<Utc>,
) -> Option<f64> {
    match kind {
        GoalKind::Exercise { exercise_name } => heaviest_weight(workouts, exercise_name),
        GoalKind::Visits { timeframe } => Some(visits_in(workouts, *timeframe, now) as f64),
        GoalKind::BodyWeight => None,
    }
}

/// Heaviest weight ever logged for an exercise, matched by name
pub fn heaviest_weight(workouts: &[CompletedWorkout], exercise_name: &str) -> Option<f64> {
    workouts
        .iter()
        .flat_map(|w| w.exercises.iter())
        .filter(|log| log.exercise_name.eq_ignore_ascii_case(exercise_name))
        .flat_map(|log| log.sets.iter())
        .map(|set| set.weight)
        .reduce(f64::max)
}

pub fn visits_in(workouts: &[CompletedWorkout], timeframe: Timeframe, now: DateTime<Utc>) -> usize {
    match timeframe {
        Timeframe::Weekly => {
            let current_week = history_service::week_start(now);
            workouts
                .iter()
                .filter(|w| w.date <= now && history_service::week_start(w.date) == current_week)
                .count()
        }
        Timeframe::Monthly => workouts
            .iter()
            .filter(|w| {
                w.date <= now && w.date.year() == now.year() && w.date.month() == now.month()
            })
            .count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExerciseLog, WorkoutSet, WorkoutStats};
    use chrono::TimeZone;

    fn workout(date: DateTime<Utc>, exercise: &str, weights: &[f64]) -> CompletedWorkout {
        CompletedWorkout {
            id: uuid::Uuid::new_v4().to_string(),
            date,
            duration_seconds: 600,
            template_id: None,
            template_name: None,
            exercises: vec![ExerciseLog {
                exercise_id: exercise.to_lowercase(),
                exercise_name: exercise.to_string(),
                sets: weights.iter().map(|&w| WorkoutSet::new(w, 5)).collect(),
            }],
            stats: WorkoutStats::default(),
        }
    }

    fn exercise_goal(name: &str) -> GoalKind {
        GoalKind::Exercise {
            exercise_name: name.to_string(),
        }
    }

    #[test]
    fn test_heaviest_weight_matches_name_case_insensitively() {
        let now = Utc::now();
        let workouts = vec![
            workout(now, "Bench Press", &[135.0, 155.0]),
            workout(now, "bench press", &[165.0]),
            workout(now, "Squat", &[225.0]),
        ];

        assert_eq!(heaviest_weight(&workouts, "Bench Press"), Some(165.0));
        assert_eq!(heaviest_weight(&workouts, "Deadlift"), None);
    }

    #[test]
    fn test_visits_this_week_and_month() {
        // Thursday 2025-04-10
        let now = Utc.with_ymd_and_hms(2025, 4, 10, 12, 0, 0).unwrap();
        let workouts = vec![
            workout(Utc.with_ymd_and_hms(2025, 4, 6, 9, 0, 0).unwrap(), "Squat", &[100.0]),
            workout(Utc.with_ymd_and_hms(2025, 4, 9, 9, 0, 0).unwrap(), "Squat", &[100.0]),
            workout(Utc.with_ymd_and_hms(2025, 4, 2, 9, 0, 0).unwrap(), "Squat", &[100.0]),
            workout(Utc.with_ymd_and_hms(2025, 3, 30, 9, 0, 0).unwrap(), "Squat", &[100.0]),
        ];

        assert_eq!(visits_in(&workouts, Timeframe::Weekly, now), 2);
        assert_eq!(visits_in(&workouts, Timeframe::Monthly, now), 3);
    }

    #[test]
    fn test_body_weight_is_not_derived() {
        assert_eq!(derived_value(&GoalKind::BodyWeight, &[], Utc::now()), None);
    }

    #[test]
    fn test_refresh_completes_reached_goals() -> Result<()> {
        let storage = Storage::temporary()?;
        let service = GoalService::new(&storage);
        let now = Utc::now();

        let bench = service.create_goal(exercise_goal("Bench Press"), 200.0, None)?;
        let squat = service.create_goal(exercise_goal("Squat"), 300.0, None)?;

        storage.save_workout(&workout(now, "Bench Press", &[185.0, 205.0]))?;
        storage.save_workout(&workout(now, "Squat", &[225.0]))?;

        let completed = service.refresh_from_history(now)?;

        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].id, bench.id);

        let open = service.list_goals(false)?;
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].id, squat.id);
        assert_eq!(open[0].current, 225.0);
        assert_eq!(open[0].progress_percentage(), 75.0);
        Ok(())
    }

    #[test]
    fn test_manual_progress_on_body_weight_goal() -> Result<()> {
        let storage = Storage::temporary()?;
        let service = GoalService::new(&storage);

        let goal = service.create_goal(GoalKind::BodyWeight, 170.0, Some("lbs".to_string()))?;

        let updated = service.update_progress(&goal.id, 180.0)?;
        assert!(!updated.completed);

        let updated = service.update_progress(&goal.id, 169.0)?;
        assert!(updated.completed);
        assert!(updated.completed_at.is_some());

        assert!(service.update_progress("missing", 1.0).is_err());
        Ok(())
    }

    #[test]
    fn test_rejects_non_positive_target() -> Result<()> {
        let storage = Storage::temporary()?;
        let service = GoalService::new(&storage);

        assert!(service.create_goal(GoalKind::BodyWeight, 0.0, None).is_err());
        assert!(service.list_goals(true)?.is_empty());
        Ok(())
    }
}
