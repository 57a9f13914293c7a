use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Exercise catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: String,
    pub name: String,
    pub muscles: Vec<String>,
}

impl Exercise {
    /// Create a new catalog entry with a generated ID
    pub fn new(name: impl Into<String>, muscles: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            muscles,
        }
    }

    /// Whether this exercise targets the given muscle group (case-insensitive)
    pub fn targets(&self, muscle: &str) -> bool {
        self.muscles.iter().any(|m| m.eq_ignore_ascii_case(muscle))
    }
}
