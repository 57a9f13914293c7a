use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// Progress photo metadata; the image itself lives on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressPhoto {
    pub id: String,
    pub taken_at: DateTime<Utc>,
    pub category: PhotoCategory,
    pub image_path: PathBuf,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhotoCategory {
    Front,
    Back,
    Side,
}

impl ProgressPhoto {
    pub fn new(category: PhotoCategory, image_path: PathBuf, notes: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            taken_at: Utc::now(),
            category,
            image_path,
            notes,
        }
    }
}

impl std::fmt::Display for PhotoCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PhotoCategory::Front => write!(f, "Front"),
            PhotoCategory::Back => write!(f, "Back"),
            PhotoCategory::Side => write!(f, "Side"),
        }
    }
}

impl std::str::FromStr for PhotoCategory {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "front" => Ok(PhotoCategory::Front),
            "back" => Ok(PhotoCategory::Back),
            "side" => Ok(PhotoCategory::Side),
            _ => Err(anyhow::anyhow!("Invalid photo category: {}", s)),
        }
    }
}
