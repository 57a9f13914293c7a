use anyhow::Result;

/// Transient, fire-and-forget messages emitted during a session
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    Info(String),
    ValidationError(String),
    PersonalRecord {
        exercise_name: String,
        weight: f64,
        reps: u32,
    },
    Error(String),
}

/// Effects port: toasts, celebrations and the rest-complete cue
#[cfg_attr(test, mockall::automock)]
pub trait Notifier {
    fn notify(&self, notification: Notification);

    /// Best-effort audible cue when a rest period ends
    fn play_rest_cue(&self) -> Result<()>;
}

/// Notifier that only writes to the trace log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        match notification {
            Notification::Info(message) => tracing::info!("{}", message),
            Notification::ValidationError(message) => tracing::warn!("{}", message),
            Notification::PersonalRecord {
                exercise_name,
                weight,
                reps,
            } => tracing::info!("New personal record on {}: {} x {}", exercise_name, weight, reps),
            Notification::Error(message) => tracing::error!("{}", message),
        }
    }

    fn play_rest_cue(&self) -> Result<()> {
        tracing::debug!("Rest complete");
        Ok(())
    }
}
