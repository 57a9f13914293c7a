use thiserror::Error;

use crate::services::workout_session_service::SessionState;

/// Errors raised by a workout session
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Invalid set: weight must be greater than 0 and reps at least 1 (got {weight} x {reps})")]
    InvalidSet { weight: f64, reps: u32 },
    #[error("Cannot {operation} while session is {state}")]
    InvalidState {
        operation: &'static str,
        state: SessionState,
    },
    #[error("Cannot save workout with no completed sets")]
    NoCompletedSets,
    #[error("Failed to save workout: {0}")]
    Persistence(#[source] anyhow::Error),
}

/// Errors raised while decoding a persisted collection
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Unsupported schema version {found} for '{key}' (expected at most {supported})")]
    UnsupportedVersion {
        key: String,
        found: u32,
        supported: u32,
    },
    #[error("Invalid record in '{key}': {reason}")]
    InvalidRecord { key: String, reason: String },
    #[error("Malformed JSON in '{key}': {source}")]
    Malformed {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}
