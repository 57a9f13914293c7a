use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    Kg,
    Lbs,
}

/// User preferences persisted under the settings key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSettings {
    pub weight_unit: WeightUnit,
    pub theme: String,
    pub dark_mode: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    #[serde(default)]
    pub sex: String,
    #[serde(default)]
    pub age: u32,
    pub join_date: DateTime<Utc>,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            weight_unit: WeightUnit::Lbs,
            theme: "teal".to_string(),
            dark_mode: false,
        }
    }
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            name: "User".to_string(),
            sex: String::new(),
            age: 0,
            join_date: Utc::now(),
        }
    }
}

impl std::fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeightUnit::Kg => write!(f, "kg"),
            WeightUnit::Lbs => write!(f, "lbs"),
        }
    }
}

impl std::str::FromStr for WeightUnit {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "kg" | "kgs" => Ok(WeightUnit::Kg),
            "lb" | "lbs" => Ok(WeightUnit::Lbs),
            _ => Err(anyhow::anyhow!("Invalid weight unit: {}", s)),
        }
    }
}
