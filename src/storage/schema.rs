// Versioned JSON envelopes for persisted collections
//
// Every key holds `{"version": N, "data": ...}`. A bare JSON value written
// before envelopes existed is read as version 0 and rewritten on next save.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::SchemaError;
use crate::models::{
    CompletedWorkout, Exercise, Goal, ProgressPhoto, UserProfile, UserSettings, WorkoutTemplate,
};

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    version: u32,
    data: &'a T,
}

#[derive(Deserialize)]
struct Envelope {
    version: u32,
    data: Value,
}

/// Record-level checks applied after decoding
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

pub fn encode<T: Serialize>(value: &T) -> serde_json::Result<Vec<u8>> {
    serde_json::to_vec(&EnvelopeRef {
        version: SCHEMA_VERSION,
        data: value,
    })
}

/// Decode and validate a stored value, returning it with the version it was stored at
pub fn decode<T>(key: &str, bytes: &[u8]) -> Result<(T, u32), SchemaError>
where
    T: DeserializeOwned + Validate,
{
    let malformed = |source| SchemaError::Malformed {
        key: key.to_string(),
        source,
    };

    let raw: Value = serde_json::from_slice(bytes).map_err(malformed)?;
    let (version, data) = match raw {
        Value::Object(ref map) if map.contains_key("version") && map.contains_key("data") => {
            let envelope: Envelope = serde_json::from_value(raw).map_err(malformed)?;
            (envelope.version, envelope.data)
        }
        legacy => (0, legacy),
    };

    if version > SCHEMA_VERSION {
        return Err(SchemaError::UnsupportedVersion {
            key: key.to_string(),
            found: version,
            supported: SCHEMA_VERSION,
        });
    }

    let value: T = serde_json::from_value(data).map_err(malformed)?;
    value.validate().map_err(|reason| SchemaError::InvalidRecord {
        key: key.to_string(),
        reason,
    })?;

    Ok((value, version))
}

fn require(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{} must not be empty", field));
    }
    Ok(())
}

impl<T: Validate> Validate for Vec<T> {
    fn validate(&self) -> Result<(), String> {
        self.iter().try_for_each(Validate::validate)
    }
}

impl Validate for Exercise {
    fn validate(&self) -> Result<(), String> {
        require("exercise id", &self.id)?;
        require("exercise name", &self.name)
    }
}

impl Validate for WorkoutTemplate {
    fn validate(&self) -> Result<(), String> {
        require("template id", &self.id)?;
        require("template name", &self.name)?;
        for exercise in &self.exercises {
            require("template exercise id", &exercise.exercise_id)?;
        }
        Ok(())
    }
}

impl Validate for CompletedWorkout {
    fn validate(&self) -> Result<(), String> {
        require("workout id", &self.id)?;
        for exercise in &self.exercises {
            if exercise.sets.is_empty() {
                return Err(format!(
                    "workout {} lists '{}' with no sets",
                    self.id, exercise.exercise_name
                ));
            }
            if let Some(set) = exercise.sets.iter().find(|s| !s.is_valid()) {
                return Err(format!(
                    "workout {} has a non-positive set ({} x {})",
                    self.id, set.weight, set.reps
                ));
            }
        }
        Ok(())
    }
}

impl Validate for Goal {
    fn validate(&self) -> Result<(), String> {
        require("goal id", &self.id)?;
        if !self.target.is_finite() || self.target <= 0.0 {
            return Err(format!("goal {} has a non-positive target", self.id));
        }
        Ok(())
    }
}

impl Validate for ProgressPhoto {
    fn validate(&self) -> Result<(), String> {
        require("photo id", &self.id)
    }
}

impl Validate for UserSettings {
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

impl Validate for UserProfile {
    fn validate(&self) -> Result<(), String> {
        require("profile name", &self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WeightUnit;

    #[test]
    fn test_encode_wraps_in_envelope() {
        let bytes = encode(&UserSettings::default()).unwrap();
        let value: Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(value["version"], SCHEMA_VERSION);
        assert_eq!(value["data"]["weight_unit"], "lbs");
    }

    #[test]
    fn test_bare_value_reads_as_version_zero() {
        let bytes = br#"{"weight_unit":"kg","theme":"teal","dark_mode":true}"#;
        let (settings, version): (UserSettings, u32) = decode("settings", bytes).unwrap();

        assert_eq!(version, 0);
        assert_eq!(settings.weight_unit, WeightUnit::Kg);
    }

    #[test]
    fn test_future_version_is_rejected() {
        let bytes = br#"{"version":99,"data":[]}"#;
        let result: Result<(Vec<Exercise>, u32), _> = decode("exercises", bytes);

        assert!(matches!(
            result,
            Err(SchemaError::UnsupportedVersion { found: 99, .. })
        ));
    }

    #[test]
    fn test_invalid_record_is_rejected() {
        let bytes = br#"{"version":1,"data":[{"id":"","name":"Squat","muscles":[]}]}"#;
        let result: Result<(Vec<Exercise>, u32), _> = decode("exercises", bytes);

        assert!(matches!(result, Err(SchemaError::InvalidRecord { .. })));
    }
}
