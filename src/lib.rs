pub mod config;
pub mod errors;
pub mod models;
pub mod services;
pub mod storage;

pub use config::Config;
pub use errors::{SchemaError, SessionError};
pub use storage::{Storage, WorkoutStore};
