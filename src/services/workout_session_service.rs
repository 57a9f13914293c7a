// Active workout session: walks a template set by set
//
// Logging -> Resting -> Logging ... -> Completed -> (Saved | Discarded)

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

use crate::errors::SessionError;
use crate::models::{
    CompletedWorkout, PlannedExercise, PreviousPerformance, SetSpec, WeightUnit, WorkoutSet,
    WorkoutTemplate, DEFAULT_REST_SECONDS,
};
use crate::services::notification_service::{Notification, Notifier};
use crate::services::summary_service::{self, CompletedSets, WorkoutSummary};
use crate::storage::WorkoutStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Waiting for weight/reps of the current set
    Logging,
    /// Counting down before the next set
    Resting { remaining_seconds: u32 },
    /// Every planned set is done (or the user ended early)
    Completed,
    Saved,
    Discarded,
}

#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub default_rest_seconds: u32,
    pub weight_unit: WeightUnit,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            default_rest_seconds: DEFAULT_REST_SECONDS,
            weight_unit: WeightUnit::Lbs,
        }
    }
}

/// Result of a successfully recorded set
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SetOutcome {
    pub personal_record: bool,
    pub state: SessionState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardOutcome {
    /// Sets were logged; call again with confirmation
    ConfirmationRequired,
    Discarded,
}

pub struct WorkoutSession<'a> {
    template: WorkoutTemplate,
    store: &'a dyn WorkoutStore,
    notifier: &'a dyn Notifier,
    options: SessionOptions,
    references: HashMap<String, PreviousPerformance>,
    state: SessionState,
    exercise_index: usize,
    set_index: usize,
    completed: CompletedSets,
    workout_id: String,
    started_at: DateTime<Utc>,
}

impl<'a> WorkoutSession<'a> {
    /// Begin a session at the first planned set
    ///
    /// Exercises without sets are skipped; a template with no sets at all
    /// starts out `Completed`.
    pub fn start(
        template: WorkoutTemplate,
        store: &'a dyn WorkoutStore,
        notifier: &'a dyn Notifier,
        options: SessionOptions,
    ) -> Self {
        let completed = CompletedSets::for_template(&template);
        let mut session = Self {
            template,
            store,
            notifier,
            options,
            references: HashMap::new(),
            state: SessionState::Logging,
            exercise_index: 0,
            set_index: 0,
            completed,
            workout_id: Uuid::new_v4().to_string(),
            started_at: Utc::now(),
        };

        match session.next_exercise_with_sets(0) {
            Some(index) => session.exercise_index = index,
            None => session.state = SessionState::Completed,
        }

        tracing::info!(
            "Started session '{}' ({} planned sets)",
            session.template.name,
            session.template.total_sets()
        );

        session
    }

    /// Reference bests per exercise ID, used for comparison and PR detection
    pub fn with_references(mut self, references: HashMap<String, PreviousPerformance>) -> Self {
        self.references = references;
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn template(&self) -> &WorkoutTemplate {
        &self.template
    }

    pub fn completed_sets(&self) -> &CompletedSets {
        &self.completed
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Exercise the pointer is on, while sets remain
    pub fn current_exercise(&self) -> Option<&PlannedExercise> {
        match self.state {
            SessionState::Logging | SessionState::Resting { .. } => {
                self.template.exercises.get(self.exercise_index)
            }
            _ => None,
        }
    }

    pub fn current_set_spec(&self) -> Option<&SetSpec> {
        self.current_exercise()
            .and_then(|exercise| exercise.sets.get(self.set_index))
    }

    /// Zero-based (exercise, set) pointer
    pub fn position(&self) -> (usize, usize) {
        (self.exercise_index, self.set_index)
    }

    pub fn reference_for(&self, exercise_id: &str) -> Option<&PreviousPerformance> {
        self.references.get(exercise_id)
    }

    pub fn rest_remaining(&self) -> Option<u32> {
        match self.state {
            SessionState::Resting { remaining_seconds } => Some(remaining_seconds),
            _ => None,
        }
    }

    /// Logged sets as a percentage of planned sets, in [0, 100]
    pub fn progress_percent(&self) -> f64 {
        let planned = self.template.total_sets();
        if planned == 0 {
            return 0.0;
        }
        (self.completed.total_sets() as f64 / planned as f64 * 100.0).min(100.0)
    }

    pub fn summary(&self) -> WorkoutSummary {
        summary_service::summarize(&self.completed, &self.template)
    }

    /// Record weight x reps for the current set and advance
    pub fn complete_set(&mut self, weight: f64, reps: u32) -> Result<SetOutcome, SessionError> {
        if self.state != SessionState::Logging {
            return Err(self.invalid_state("complete a set"));
        }

        let set = WorkoutSet::new(weight, reps);
        if !set.is_valid() {
            let message = if reps == 0 && weight > 0.0 {
                "Please enter at least 1 rep"
            } else {
                "Please enter a weight greater than 0"
            };
            self.notifier
                .notify(Notification::ValidationError(message.to_string()));
            return Err(SessionError::InvalidSet { weight, reps });
        }

        let exercise = &self.template.exercises[self.exercise_index];
        let exercise_id = exercise.exercise_id.clone();
        let exercise_name = exercise.exercise_name.clone();
        let rest_seconds = exercise.sets[self.set_index].rest_or(self.options.default_rest_seconds);
        let last_in_exercise = self.set_index + 1 >= exercise.sets.len();

        let personal_record = self.check_personal_record(&exercise_id, &exercise_name, &set);
        self.completed.push(&exercise_id, set);

        let next = if last_in_exercise {
            self.next_exercise_with_sets(self.exercise_index + 1)
                .map(|index| (index, 0))
        } else {
            Some((self.exercise_index, self.set_index + 1))
        };

        match next {
            Some((exercise_index, set_index)) => {
                self.exercise_index = exercise_index;
                self.set_index = set_index;
                self.state = SessionState::Resting {
                    remaining_seconds: rest_seconds,
                };
            }
            None => {
                tracing::info!("All planned sets logged for '{}'", self.template.name);
                self.state = SessionState::Completed;
            }
        }

        Ok(SetOutcome {
            personal_record,
            state: self.state,
        })
    }

    pub fn skip_rest(&mut self) -> Result<(), SessionError> {
        if !matches!(self.state, SessionState::Resting { .. }) {
            return Err(self.invalid_state("skip rest"));
        }

        self.state = SessionState::Logging;
        self.notifier
            .notify(Notification::Info("Rest period skipped".to_string()));
        Ok(())
    }

    /// Advance the rest countdown by one second
    ///
    /// Outside of `Resting` this does nothing, so a late tick is harmless.
    pub fn tick(&mut self) -> SessionState {
        if let SessionState::Resting { remaining_seconds } = self.state {
            let remaining_seconds = remaining_seconds.saturating_sub(1);

            if remaining_seconds == 0 {
                self.state = SessionState::Logging;
                if let Err(e) = self.notifier.play_rest_cue() {
                    tracing::warn!("Error playing rest cue: {:#}", e);
                }
            } else {
                self.state = SessionState::Resting { remaining_seconds };
            }
        }

        self.state
    }

    /// Stop logging and go straight to the summary
    pub fn end_early(&mut self) -> Result<(), SessionError> {
        if !matches!(
            self.state,
            SessionState::Logging | SessionState::Resting { .. }
        ) {
            return Err(self.invalid_state("end the workout"));
        }

        tracing::info!(
            "Session '{}' ended early after {} sets",
            self.template.name,
            self.completed.total_sets()
        );
        self.state = SessionState::Completed;
        Ok(())
    }

    /// Persist the workout and mark the template as used
    ///
    /// On a storage failure the session stays `Completed` with all logged
    /// sets retained, so the call can be retried. The exclusive borrow keeps
    /// a second save from starting while one runs; once saved, further calls
    /// fail with `InvalidState`.
    pub fn finalize(&mut self) -> Result<CompletedWorkout, SessionError> {
        if self.state != SessionState::Completed {
            return Err(self.invalid_state("save the workout"));
        }

        let summary = self.summary();
        if summary.stats.completed_exercises == 0 {
            self.notifier.notify(Notification::ValidationError(
                "Cannot save workout with no completed sets".to_string(),
            ));
            return Err(SessionError::NoCompletedSets);
        }

        let finished_at = Utc::now();
        let workout = CompletedWorkout {
            id: self.workout_id.clone(),
            date: self.started_at,
            duration_seconds: (finished_at - self.started_at).num_seconds().max(0) as u64,
            template_id: Some(self.template.id.clone()),
            template_name: Some(self.template.name.clone()),
            exercises: summary_service::exercise_logs(&self.completed, &self.template),
            stats: summary.stats,
        };

        if let Err(e) = self.store.save_workout(&workout) {
            tracing::error!("Failed to save workout {}: {:#}", workout.id, e);
            self.notifier.notify(Notification::Error(
                "Failed to save workout. Please try again.".to_string(),
            ));
            return Err(SessionError::Persistence(e));
        }

        match self.store.touch_template(&self.template.id, finished_at) {
            Ok(true) => {}
            Ok(false) => tracing::debug!("Template {} no longer exists", self.template.id),
            Err(e) => tracing::warn!("Failed to update template's last-used date: {:#}", e),
        }

        self.state = SessionState::Saved;

        self.notifier.notify(Notification::Info(format!(
            "Workout saved: {} exercises, {} sets, {} {} total volume",
            workout.stats.completed_exercises,
            workout.stats.total_sets,
            workout.stats.total_volume,
            self.options.weight_unit
        )));

        Ok(workout)
    }

    /// Throw the session away
    ///
    /// With logged sets this needs `confirmed`; otherwise it discards at once.
    pub fn discard(&mut self, confirmed: bool) -> Result<DiscardOutcome, SessionError> {
        if self.state != SessionState::Completed {
            return Err(self.invalid_state("discard the workout"));
        }

        if !self.completed.is_empty() && !confirmed {
            return Ok(DiscardOutcome::ConfirmationRequired);
        }

        self.completed.clear();
        self.exercise_index = 0;
        self.set_index = 0;
        self.state = SessionState::Discarded;

        self.notifier
            .notify(Notification::Info("Workout discarded".to_string()));
        Ok(DiscardOutcome::Discarded)
    }

    fn check_personal_record(
        &mut self,
        exercise_id: &str,
        exercise_name: &str,
        set: &WorkoutSet,
    ) -> bool {
        let beats_reference = self
            .references
            .get(exercise_id)
            .map(|reference| set.weight > reference.weight)
            .unwrap_or(false);

        if beats_reference {
            // Raise the bar so the celebration fires once per improvement
            self.references.insert(
                exercise_id.to_string(),
                PreviousPerformance {
                    weight: set.weight,
                    reps: set.reps,
                    date: set.timestamp,
                },
            );
            self.notifier.notify(Notification::PersonalRecord {
                exercise_name: exercise_name.to_string(),
                weight: set.weight,
                reps: set.reps,
            });
        } else {
            self.notifier.notify(Notification::Info(format!(
                "Set completed: {} {} x {} reps",
                set.weight, self.options.weight_unit, set.reps
            )));
        }

        beats_reference
    }

    fn next_exercise_with_sets(&self, from: usize) -> Option<usize> {
        (from..self.template.exercises.len()).find(|&i| !self.template.exercises[i].sets.is_empty())
    }

    fn invalid_state(&self, operation: &'static str) -> SessionError {
        SessionError::InvalidState {
            operation,
            state: self.state,
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Logging => write!(f, "logging"),
            SessionState::Resting { remaining_seconds } => {
                write!(f, "resting ({}s left)", remaining_seconds)
            }
            SessionState::Completed => write!(f, "completed"),
            SessionState::Saved => write!(f, "saved"),
            SessionState::Discarded => write!(f, "discarded"),
        }
    }
}

/// Format a countdown as MM:SS
pub fn format_rest_time(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::notification_service::{LogNotifier, MockNotifier};
    use crate::storage::MockWorkoutStore;
    use mockall::predicate::*;
    use proptest::prelude::*;

    fn two_plus_one() -> WorkoutTemplate {
        WorkoutTemplate::new("Upper")
            .with_exercise("e1", "Bench Press", vec![SetSpec::new(10, 90), SetSpec::new(8, 90)])
            .with_exercise("e2", "Row", vec![SetSpec::new(12, 45)])
    }

    fn quiet_store() -> MockWorkoutStore {
        let mut store = MockWorkoutStore::new();
        store.expect_save_workout().returning(|_| Ok(()));
        store.expect_touch_template().returning(|_, _| Ok(true));
        store
    }

    #[test]
    fn test_transitions_through_rest_to_completed() {
        let store = quiet_store();
        let notifier = LogNotifier;
        let mut session =
            WorkoutSession::start(two_plus_one(), &store, &notifier, SessionOptions::default());

        assert_eq!(session.state(), SessionState::Logging);
        assert_eq!(session.progress_percent(), 0.0);

        let outcome = session.complete_set(100.0, 10).unwrap();
        assert_eq!(
            outcome.state,
            SessionState::Resting {
                remaining_seconds: 90
            }
        );
        assert_eq!(session.position(), (0, 1));

        session.skip_rest().unwrap();
        assert_eq!(session.state(), SessionState::Logging);

        let outcome = session.complete_set(100.0, 8).unwrap();
        assert!(matches!(outcome.state, SessionState::Resting { .. }));
        assert_eq!(session.position(), (1, 0));
        session.skip_rest().unwrap();

        let outcome = session.complete_set(60.0, 12).unwrap();
        assert_eq!(outcome.state, SessionState::Completed);
        assert_eq!(session.rest_remaining(), None);
        assert_eq!(session.progress_percent(), 100.0);
    }

    #[test]
    fn test_invalid_set_leaves_counters_unchanged() {
        let store = quiet_store();
        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .with(eq(Notification::ValidationError(
                "Please enter a weight greater than 0".to_string(),
            )))
            .times(2)
            .return_const(());
        notifier
            .expect_notify()
            .with(eq(Notification::ValidationError(
                "Please enter at least 1 rep".to_string(),
            )))
            .times(1)
            .return_const(());

        let mut session =
            WorkoutSession::start(two_plus_one(), &store, &notifier, SessionOptions::default());

        assert!(matches!(
            session.complete_set(0.0, 10),
            Err(SessionError::InvalidSet { .. })
        ));
        assert!(session.complete_set(-5.0, 10).is_err());
        assert!(session.complete_set(50.0, 0).is_err());

        assert_eq!(session.state(), SessionState::Logging);
        assert_eq!(session.position(), (0, 0));
        assert_eq!(session.completed_sets().total_sets(), 0);
    }

    #[test]
    fn test_rest_defaults_when_unset() {
        let store = quiet_store();
        let notifier = LogNotifier;
        let template = WorkoutTemplate::new("Legs").with_exercise(
            "squat",
            "Squat",
            vec![
                SetSpec {
                    target_reps: 5,
                    rest_seconds: None,
                },
                SetSpec::new(5, 120),
            ],
        );
        let mut session =
            WorkoutSession::start(template, &store, &notifier, SessionOptions::default());

        session.complete_set(100.0, 5).unwrap();
        assert_eq!(session.rest_remaining(), Some(DEFAULT_REST_SECONDS));
    }

    #[test]
    fn test_tick_counts_down_and_plays_cue() {
        let store = quiet_store();
        let mut notifier = MockNotifier::new();
        notifier.expect_notify().return_const(());
        notifier.expect_play_rest_cue().times(1).returning(|| Ok(()));

        let template = WorkoutTemplate::new("Short rest")
            .with_exercise("e1", "Curl", vec![SetSpec::new(10, 2), SetSpec::new(10, 2)]);
        let mut session =
            WorkoutSession::start(template, &store, &notifier, SessionOptions::default());

        session.complete_set(20.0, 10).unwrap();
        assert_eq!(
            session.tick(),
            SessionState::Resting {
                remaining_seconds: 1
            }
        );
        assert_eq!(session.tick(), SessionState::Logging);
        // Extra ticks outside Resting are ignored
        assert_eq!(session.tick(), SessionState::Logging);
    }

    #[test]
    fn test_cue_failure_is_not_fatal() {
        let store = quiet_store();
        let mut notifier = MockNotifier::new();
        notifier.expect_notify().return_const(());
        notifier
            .expect_play_rest_cue()
            .returning(|| Err(anyhow::anyhow!("no audio device")));

        let template = WorkoutTemplate::new("Quick")
            .with_exercise("e1", "Curl", vec![SetSpec::new(10, 1), SetSpec::new(10, 1)]);
        let mut session =
            WorkoutSession::start(template, &store, &notifier, SessionOptions::default());

        session.complete_set(20.0, 10).unwrap();
        assert_eq!(session.tick(), SessionState::Logging);
    }

    #[test]
    fn test_personal_record_fires_once_per_improvement() {
        let store = quiet_store();
        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .withf(|n| matches!(n, Notification::PersonalRecord { .. }))
            .times(2)
            .return_const(());
        notifier
            .expect_notify()
            .withf(|n| !matches!(n, Notification::PersonalRecord { .. }))
            .return_const(());

        let template = WorkoutTemplate::new("Bench")
            .with_exercise("bench", "Bench Press", vec![SetSpec::new(8, 60); 4]);
        let references = HashMap::from([(
            "bench".to_string(),
            PreviousPerformance {
                weight: 82.5,
                reps: 8,
                date: Utc::now(),
            },
        )]);
        let mut session =
            WorkoutSession::start(template, &store, &notifier, SessionOptions::default())
                .with_references(references);

        assert!(!session.complete_set(80.0, 8).unwrap().personal_record);
        session.skip_rest().unwrap();
        assert!(session.complete_set(85.0, 8).unwrap().personal_record);
        session.skip_rest().unwrap();
        assert!(!session.complete_set(85.0, 8).unwrap().personal_record);
        session.skip_rest().unwrap();
        assert!(session.complete_set(87.5, 6).unwrap().personal_record);

        assert_eq!(session.reference_for("bench").unwrap().weight, 87.5);
    }

    #[test]
    fn test_zero_set_exercises_are_skipped() {
        let store = quiet_store();
        let notifier = LogNotifier;
        let template = WorkoutTemplate::new("Gappy")
            .with_exercise("warmup", "Warm-up", vec![])
            .with_exercise("e1", "Squat", vec![SetSpec::new(5, 60)])
            .with_exercise("stretch", "Stretch", vec![]);
        let mut session =
            WorkoutSession::start(template, &store, &notifier, SessionOptions::default());

        assert_eq!(session.current_exercise().unwrap().exercise_id, "e1");

        // Only trailing empty exercises remain: no rest, straight to Completed
        let outcome = session.complete_set(100.0, 5).unwrap();
        assert_eq!(outcome.state, SessionState::Completed);
    }

    #[test]
    fn test_empty_exercise_between_others_is_skipped() {
        let notifier = LogNotifier;
        let template = WorkoutTemplate::new("Split")
            .with_exercise("a", "A", vec![SetSpec::new(10, 30)])
            .with_exercise("gap", "Gap", vec![])
            .with_exercise("b", "B", vec![SetSpec::new(8, 30)]);

        let mut store = MockWorkoutStore::new();
        store
            .expect_save_workout()
            .withf(|w| w.exercises.len() == 2)
            .times(1)
            .returning(|_| Ok(()));
        store.expect_touch_template().returning(|_, _| Ok(true));

        let mut session =
            WorkoutSession::start(template, &store, &notifier, SessionOptions::default());

        // Finishing A is not the last set: rest, then land on B
        let outcome = session.complete_set(50.0, 10).unwrap();
        assert_eq!(outcome.state, SessionState::Resting { remaining_seconds: 30 });
        assert_eq!(session.position(), (2, 0));
        assert_eq!(session.current_exercise().unwrap().exercise_id, "b");

        session.skip_rest().unwrap();
        let outcome = session.complete_set(60.0, 8).unwrap();
        assert_eq!(outcome.state, SessionState::Completed);
        assert_eq!(session.progress_percent(), 100.0);

        let workout = session.finalize().unwrap();
        assert_eq!(workout.exercises.len(), 2);
        assert_eq!(workout.stats.total_sets, 2);
    }

    #[test]
    fn test_template_without_sets_starts_completed() {
        let store = quiet_store();
        let notifier = LogNotifier;
        let template = WorkoutTemplate::new("Empty");
        let mut session =
            WorkoutSession::start(template, &store, &notifier, SessionOptions::default());

        assert_eq!(session.state(), SessionState::Completed);
        assert_eq!(session.progress_percent(), 0.0);
        assert_eq!(session.discard(false).unwrap(), DiscardOutcome::Discarded);
    }

    #[test]
    fn test_finalize_without_sets_skips_persistence() {
        let mut store = MockWorkoutStore::new();
        store.expect_save_workout().never();
        store.expect_touch_template().never();
        let notifier = LogNotifier;

        let mut session =
            WorkoutSession::start(two_plus_one(), &store, &notifier, SessionOptions::default());
        session.end_early().unwrap();

        assert!(matches!(
            session.finalize(),
            Err(SessionError::NoCompletedSets)
        ));
        assert_eq!(session.state(), SessionState::Completed);
    }

    #[test]
    fn test_finalize_persists_then_touches_template() {
        let template = two_plus_one();
        let template_id = template.id.clone();

        let mut seq = mockall::Sequence::new();
        let mut store = MockWorkoutStore::new();
        store
            .expect_save_workout()
            .withf(|w| w.exercises.len() == 1 && w.stats.total_sets == 1)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        store
            .expect_touch_template()
            .withf(move |id, _| id == template_id)
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(true));
        let notifier = LogNotifier;

        let mut session =
            WorkoutSession::start(template, &store, &notifier, SessionOptions::default());
        session.complete_set(100.0, 10).unwrap();
        session.end_early().unwrap();

        let workout = session.finalize().unwrap();
        assert_eq!(workout.stats.total_volume, 1000.0);
        assert_eq!(workout.template_name.as_deref(), Some("Upper"));
        assert_eq!(session.state(), SessionState::Saved);

        // A second save is refused without touching storage again
        assert!(matches!(
            session.finalize(),
            Err(SessionError::InvalidState { .. })
        ));
        assert!(matches!(
            session.discard(true),
            Err(SessionError::InvalidState { .. })
        ));
    }

    #[test]
    fn test_metadata_failure_does_not_block_save() {
        let mut store = MockWorkoutStore::new();
        store.expect_save_workout().times(1).returning(|_| Ok(()));
        store
            .expect_touch_template()
            .times(1)
            .returning(|_, _| Err(anyhow::anyhow!("quota exceeded")));
        let notifier = LogNotifier;

        let mut session =
            WorkoutSession::start(two_plus_one(), &store, &notifier, SessionOptions::default());
        session.complete_set(100.0, 10).unwrap();
        session.end_early().unwrap();

        assert!(session.finalize().is_ok());
        assert_eq!(session.state(), SessionState::Saved);
    }

    #[test]
    fn test_persistence_failure_keeps_session_for_retry() {
        let mut store = MockWorkoutStore::new();
        let mut seq = mockall::Sequence::new();
        store
            .expect_save_workout()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Err(anyhow::anyhow!("disk full")));
        store
            .expect_save_workout()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(()));
        store.expect_touch_template().times(1).returning(|_, _| Ok(true));

        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .with(eq(Notification::Error(
                "Failed to save workout. Please try again.".to_string(),
            )))
            .times(1)
            .return_const(());
        notifier.expect_notify().return_const(());

        let mut session =
            WorkoutSession::start(two_plus_one(), &store, &notifier, SessionOptions::default());
        session.complete_set(100.0, 10).unwrap();
        session.end_early().unwrap();

        assert!(matches!(
            session.finalize(),
            Err(SessionError::Persistence(_))
        ));
        assert_eq!(session.state(), SessionState::Completed);
        assert_eq!(session.completed_sets().total_sets(), 1);

        let first = session.finalize().unwrap();
        assert_eq!(first.stats.total_sets, 1);
    }

    #[test]
    fn test_discard_requires_confirmation_when_sets_logged() {
        let store = quiet_store();
        let notifier = LogNotifier;
        let mut session =
            WorkoutSession::start(two_plus_one(), &store, &notifier, SessionOptions::default());
        session.complete_set(100.0, 10).unwrap();

        // Only valid from Completed
        assert!(session.discard(true).is_err());
        session.end_early().unwrap();

        assert_eq!(
            session.discard(false).unwrap(),
            DiscardOutcome::ConfirmationRequired
        );
        assert_eq!(session.completed_sets().total_sets(), 1);
        assert_eq!(session.state(), SessionState::Completed);

        assert_eq!(session.discard(true).unwrap(), DiscardOutcome::Discarded);
        assert_eq!(session.completed_sets().total_sets(), 0);
        assert_eq!(session.state(), SessionState::Discarded);
    }

    #[test]
    fn test_operations_rejected_in_wrong_state() {
        let store = quiet_store();
        let notifier = LogNotifier;
        let mut session =
            WorkoutSession::start(two_plus_one(), &store, &notifier, SessionOptions::default());

        assert!(session.skip_rest().is_err());
        assert!(session.finalize().is_err());

        session.complete_set(100.0, 10).unwrap();
        assert!(matches!(
            session.complete_set(100.0, 10),
            Err(SessionError::InvalidState { .. })
        ));
    }

    #[test]
    fn test_format_rest_time() {
        assert_eq!(format_rest_time(90), "01:30");
        assert_eq!(format_rest_time(5), "00:05");
    }

    proptest! {
        #[test]
        fn prop_progress_stays_in_bounds(
            set_counts in proptest::collection::vec(0usize..4, 0..5),
            inputs in proptest::collection::vec((-10.0f64..200.0, 0u32..15), 0..20),
        ) {
            let store = quiet_store();
            let notifier = LogNotifier;
            let template = set_counts.iter().enumerate().fold(
                WorkoutTemplate::new("Generated"),
                |t, (i, &count)| t.with_exercise(format!("e{}", i), format!("Exercise {}", i), vec![SetSpec::new(8, 30); count]),
            );
            let mut session = WorkoutSession::start(template, &store, &notifier, SessionOptions::default());

            for (weight, reps) in inputs {
                let before = session.completed_sets().total_sets();
                match session.complete_set(weight, reps) {
                    Ok(_) => {
                        prop_assert_eq!(session.completed_sets().total_sets(), before + 1);
                    }
                    Err(_) => {
                        prop_assert_eq!(session.completed_sets().total_sets(), before);
                    }
                }
                if session.rest_remaining().is_some() {
                    session.skip_rest().unwrap();
                }
                let progress = session.progress_percent();
                prop_assert!((0.0..=100.0).contains(&progress));
            }
        }
    }
}
