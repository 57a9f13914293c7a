// Shared test doubles for the session ports
#![allow(dead_code)]

use anyhow::Result;
use chrono::{DateTime, Utc};
use std::cell::{Cell, RefCell};

use liftmate::models::{CompletedWorkout, SetSpec, WorkoutTemplate};
use liftmate::services::{Notification, Notifier};
use liftmate::storage::WorkoutStore;

/// In-memory store that records every call
#[derive(Default)]
pub struct RecordingStore {
    pub saved: RefCell<Vec<CompletedWorkout>>,
    pub touched: RefCell<Vec<(String, DateTime<Utc>)>>,
    /// Number of upcoming `save_workout` calls that fail
    pub failures_left: Cell<usize>,
}

impl RecordingStore {
    pub fn failing(times: usize) -> Self {
        let store = Self::default();
        store.failures_left.set(times);
        store
    }
}

impl WorkoutStore for RecordingStore {
    fn save_workout(&self, workout: &CompletedWorkout) -> Result<()> {
        let left = self.failures_left.get();
        if left > 0 {
            self.failures_left.set(left - 1);
            anyhow::bail!("disk full");
        }

        let mut saved = self.saved.borrow_mut();
        match saved.iter().position(|w| w.id == workout.id) {
            Some(index) => saved[index] = workout.clone(),
            None => saved.push(workout.clone()),
        }
        Ok(())
    }

    fn touch_template(&self, template_id: &str, used_at: DateTime<Utc>) -> Result<bool> {
        self.touched
            .borrow_mut()
            .push((template_id.to_string(), used_at));
        Ok(true)
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub notifications: RefCell<Vec<Notification>>,
    pub cues: Cell<usize>,
}

impl RecordingNotifier {
    pub fn personal_records(&self) -> usize {
        self.notifications
            .borrow()
            .iter()
            .filter(|n| matches!(n, Notification::PersonalRecord { .. }))
            .count()
    }

    pub fn last(&self) -> Option<Notification> {
        self.notifications.borrow().last().cloned()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.notifications.borrow_mut().push(notification);
    }

    fn play_rest_cue(&self) -> Result<()> {
        self.cues.set(self.cues.get() + 1);
        Ok(())
    }
}

/// E1 with two sets, E2 with one
pub fn push_template() -> WorkoutTemplate {
    WorkoutTemplate::new("Push Day")
        .with_exercise("e1", "Bench Press", vec![SetSpec::new(10, 3), SetSpec::new(8, 3)])
        .with_exercise("e2", "Overhead Press", vec![SetSpec::new(10, 2)])
}
