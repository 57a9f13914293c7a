// Session, history and tracking logic on top of storage

pub mod goal_service;
pub mod history_service;
pub mod notification_service;
pub mod photo_service;
pub mod summary_service;
pub mod workout_session_service;

pub use goal_service::GoalService;
pub use notification_service::{LogNotifier, Notification, Notifier};
pub use photo_service::{PhotoComparison, PhotoService};
pub use summary_service::{CompletedSets, PersonalBest, WorkoutSummary};
pub use workout_session_service::{
    DiscardOutcome, SessionOptions, SessionState, SetOutcome, WorkoutSession,
};
