use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Goal data model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: String,
    pub kind: GoalKind,
    pub target: f64,
    pub current: f64,
    #[serde(default)]
    pub unit: Option<String>,
    pub completed: bool,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GoalKind {
    /// Lift a target weight on a named exercise
    Exercise { exercise_name: String },
    /// Reach a target body weight
    BodyWeight,
    /// Train a number of times per timeframe
    Visits { timeframe: Timeframe },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    Weekly,
    Monthly,
}

impl Goal {
    /// Create a new goal
    pub fn new(kind: GoalKind, target: f64, unit: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            kind,
            target,
            current: 0.0,
            unit,
            completed: false,
            completed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Mark goal as complete
    pub fn mark_complete(&mut self) {
        self.completed = true;
        self.completed_at = Some(Utc::now());
        self.updated_at = Utc::now();
    }

    /// Calculate progress percentage
    pub fn progress_percentage(&self) -> f64 {
        if self.target > 0.0 {
            return (self.current / self.target * 100.0).min(100.0);
        }
        0.0
    }

    /// Whether the current value satisfies the target
    pub fn is_reached(&self) -> bool {
        match self.kind {
            // Body-weight goals are usually about coming down to the target
            GoalKind::BodyWeight => self.current > 0.0 && self.current <= self.target,
            _ => self.current >= self.target,
        }
    }

    /// Update current progress value
    pub fn update_progress(&mut self, value: f64) {
        self.current = value;
        self.updated_at = Utc::now();
    }

    pub fn title(&self) -> String {
        match &self.kind {
            GoalKind::Exercise { exercise_name } => exercise_name.clone(),
            GoalKind::BodyWeight => "Body weight".to_string(),
            GoalKind::Visits { timeframe } => format!("{} visits", timeframe),
        }
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Timeframe::Weekly => write!(f, "Weekly"),
            Timeframe::Monthly => write!(f, "Monthly"),
        }
    }
}

impl std::str::FromStr for Timeframe {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "weekly" | "week" => Ok(Timeframe::Weekly),
            "monthly" | "month" => Ok(Timeframe::Monthly),
            _ => Err(anyhow::anyhow!("Invalid timeframe: {}", s)),
        }
    }
}
