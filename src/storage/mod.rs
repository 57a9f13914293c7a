// Local storage module using the sled embedded database
//
// Each logical collection lives under its own key as a versioned JSON
// envelope (see `schema`). Writes replace the whole collection and flush.

pub mod schema;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sled::{Db, Tree};
use std::path::{Path, PathBuf};

use crate::config::{seeding, Config};
use crate::models::{
    CompletedWorkout, Exercise, Goal, ProgressPhoto, UserProfile, UserSettings, WorkoutTemplate,
};
use schema::Validate;

const DATA_TREE: &str = "liftmate";

pub const EXERCISES_KEY: &str = "exercises";
pub const TEMPLATES_KEY: &str = "templates";
pub const WORKOUTS_KEY: &str = "workouts";
pub const SETTINGS_KEY: &str = "settings";
pub const PROFILE_KEY: &str = "profile";
pub const GOALS_KEY: &str = "goals";
pub const PHOTOS_KEY: &str = "photos";

/// Persistence port used by a workout session
#[cfg_attr(test, mockall::automock)]
pub trait WorkoutStore {
    /// Append or replace a completed workout
    fn save_workout(&self, workout: &CompletedWorkout) -> Result<()>;

    /// Set a template's last-used marker; returns false when the template is gone
    fn touch_template(&self, template_id: &str, used_at: DateTime<Utc>) -> Result<bool>;
}

/// Records stored in id-keyed collections
pub trait Keyed {
    fn key(&self) -> &str;
}

/// Storage manager for the local embedded database
pub struct Storage {
    db: Db,
}

impl Storage {
    /// Resolve the database directory
    ///
    /// `LIFTMATE_DB_PATH` wins, then `[storage] data_dir` from config,
    /// then `~/.liftmate/db`.
    pub fn db_path(config: &Config) -> Result<PathBuf> {
        if let Ok(path) = std::env::var("LIFTMATE_DB_PATH") {
            return Ok(PathBuf::from(path));
        }

        Ok(config.data_dir()?.join("db"))
    }

    /// Open the database at the configured location and seed defaults on first run
    pub fn init(config: &Config) -> Result<Self> {
        let storage = Self::open(&Self::db_path(config)?)?;
        storage.initialize_defaults()?;
        Ok(storage)
    }

    /// Open (or create) a database at `path` without seeding
    pub fn open(path: &Path) -> Result<Self> {
        tracing::info!("Opening sled database at {:?}", path);

        let db = sled::open(path).context("Failed to open sled database")?;

        Ok(Self { db })
    }

    /// In-memory database removed on drop
    pub fn temporary() -> Result<Self> {
        let db = sled::Config::new()
            .temporary(true)
            .open()
            .context("Failed to open temporary sled database")?;

        Ok(Self { db })
    }

    /// Whether first-run defaults have been written
    pub fn is_initialized(&self) -> Result<bool> {
        Ok(self.tree()?.contains_key(SETTINGS_KEY)?)
    }

    /// Seed settings, profile, exercise catalogue and a starter template
    ///
    /// Returns false when the store was already initialized.
    pub fn initialize_defaults(&self) -> Result<bool> {
        if self.is_initialized()? {
            return Ok(false);
        }

        tracing::info!("Seeding default catalogue and starter template");

        let exercises = seeding::default_exercises();
        let template = seeding::default_template(&exercises);

        self.write(PROFILE_KEY, &UserProfile::default())?;
        self.write(EXERCISES_KEY, &exercises)?;
        self.write(TEMPLATES_KEY, &vec![template])?;
        self.write(WORKOUTS_KEY, &Vec::<CompletedWorkout>::new())?;
        // Settings last: its presence marks the store as initialized
        self.write(SETTINGS_KEY, &UserSettings::default())?;

        Ok(true)
    }

    // Settings and profile

    pub fn get_settings(&self) -> Result<UserSettings> {
        Ok(self.read(SETTINGS_KEY)?.unwrap_or_default())
    }

    pub fn save_settings(&self, settings: &UserSettings) -> Result<()> {
        self.write(SETTINGS_KEY, settings)
    }

    pub fn get_profile(&self) -> Result<UserProfile> {
        Ok(self.read(PROFILE_KEY)?.unwrap_or_default())
    }

    pub fn save_profile(&self, profile: &UserProfile) -> Result<()> {
        self.write(PROFILE_KEY, profile)
    }

    // Exercise catalogue

    pub fn list_exercises(&self) -> Result<Vec<Exercise>> {
        let mut exercises: Vec<Exercise> = self.list(EXERCISES_KEY)?;
        exercises.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(exercises)
    }

    pub fn get_exercise(&self, id: &str) -> Result<Option<Exercise>> {
        self.get(EXERCISES_KEY, id)
    }

    pub fn save_exercise(&self, exercise: &Exercise) -> Result<()> {
        self.upsert(EXERCISES_KEY, exercise)
    }

    pub fn delete_exercise(&self, id: &str) -> Result<bool> {
        Ok(self.remove::<Exercise>(EXERCISES_KEY, id)?.is_some())
    }

    // Templates

    pub fn list_templates(&self) -> Result<Vec<WorkoutTemplate>> {
        let mut templates: Vec<WorkoutTemplate> = self.list(TEMPLATES_KEY)?;
        // Most recently used first, never-used last
        templates.sort_by(|a, b| b.last_used.cmp(&a.last_used));
        Ok(templates)
    }

    pub fn get_template(&self, id: &str) -> Result<Option<WorkoutTemplate>> {
        self.get(TEMPLATES_KEY, id)
    }

    /// Look a template up by ID, falling back to a case-insensitive name match
    pub fn find_template(&self, id_or_name: &str) -> Result<Option<WorkoutTemplate>> {
        let templates: Vec<WorkoutTemplate> = self.list(TEMPLATES_KEY)?;
        let by_id = templates.iter().position(|t| t.id == id_or_name);
        let index = by_id.or_else(|| {
            templates
                .iter()
                .position(|t| t.name.eq_ignore_ascii_case(id_or_name))
        });
        Ok(index.map(|i| templates[i].clone()))
    }

    pub fn save_template(&self, template: &WorkoutTemplate) -> Result<()> {
        self.upsert(TEMPLATES_KEY, template)
    }

    pub fn delete_template(&self, id: &str) -> Result<bool> {
        Ok(self.remove::<WorkoutTemplate>(TEMPLATES_KEY, id)?.is_some())
    }

    pub fn touch_template(&self, id: &str, used_at: DateTime<Utc>) -> Result<bool> {
        match self.get_template(id)? {
            Some(mut template) => {
                template.mark_used(used_at);
                self.save_template(&template)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    // Workouts

    /// List workouts, most recent first
    pub fn list_workouts(&self) -> Result<Vec<CompletedWorkout>> {
        let mut workouts: Vec<CompletedWorkout> = self.list(WORKOUTS_KEY)?;
        workouts.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(workouts)
    }

    pub fn get_workout(&self, id: &str) -> Result<Option<CompletedWorkout>> {
        self.get(WORKOUTS_KEY, id)
    }

    pub fn save_workout(&self, workout: &CompletedWorkout) -> Result<()> {
        self.upsert(WORKOUTS_KEY, workout)
    }

    pub fn delete_workout(&self, id: &str) -> Result<bool> {
        Ok(self.remove::<CompletedWorkout>(WORKOUTS_KEY, id)?.is_some())
    }

    // Goals

    /// List goals, closest to completion first
    pub fn list_goals(&self, include_completed: bool) -> Result<Vec<Goal>> {
        let mut goals: Vec<Goal> = self
            .list::<Goal>(GOALS_KEY)?
            .into_iter()
            .filter(|g| include_completed || !g.completed)
            .collect();
        goals.sort_by(|a, b| b.progress_percentage().total_cmp(&a.progress_percentage()));
        Ok(goals)
    }

    pub fn get_goal(&self, id: &str) -> Result<Option<Goal>> {
        self.get(GOALS_KEY, id)
    }

    pub fn save_goal(&self, goal: &Goal) -> Result<()> {
        self.upsert(GOALS_KEY, goal)
    }

    pub fn delete_goal(&self, id: &str) -> Result<bool> {
        Ok(self.remove::<Goal>(GOALS_KEY, id)?.is_some())
    }

    /// Mark a goal as complete
    pub fn complete_goal(&self, id: &str) -> Result<()> {
        if let Some(mut goal) = self.get_goal(id)? {
            goal.mark_complete();
            self.save_goal(&goal)?;
            Ok(())
        } else {
            Err(anyhow::anyhow!("Goal {} not found", id))
        }
    }

    // Photos

    pub fn list_photos(&self) -> Result<Vec<ProgressPhoto>> {
        let mut photos: Vec<ProgressPhoto> = self.list(PHOTOS_KEY)?;
        photos.sort_by(|a, b| b.taken_at.cmp(&a.taken_at));
        Ok(photos)
    }

    pub fn save_photo(&self, photo: &ProgressPhoto) -> Result<()> {
        self.upsert(PHOTOS_KEY, photo)
    }

    /// Remove photo metadata, returning it so the caller can remove the image
    pub fn delete_photo(&self, id: &str) -> Result<Option<ProgressPhoto>> {
        self.remove(PHOTOS_KEY, id)
    }

    // Raw key access

    /// Delete a whole collection key
    pub fn delete_key(&self, key: &str) -> Result<bool> {
        let deleted = self
            .tree()?
            .remove(key)
            .with_context(|| format!("Failed to delete '{}'", key))?
            .is_some();

        if deleted {
            self.db.flush().context("Failed to flush database")?;
            tracing::debug!("Deleted key {}", key);
        }

        Ok(deleted)
    }

    pub(crate) fn tree(&self) -> Result<Tree> {
        self.db
            .open_tree(DATA_TREE)
            .context("Failed to open data tree")
    }

    fn read<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned + Validate,
    {
        let Some(bytes) = self
            .tree()?
            .get(key)
            .with_context(|| format!("Failed to read '{}'", key))?
        else {
            return Ok(None);
        };

        let (value, version) = schema::decode(key, &bytes)?;
        if version < schema::SCHEMA_VERSION {
            tracing::debug!(
                "'{}' stored at schema version {}, will upgrade on next write",
                key,
                version
            );
        }

        Ok(Some(value))
    }

    fn write<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let bytes =
            schema::encode(value).with_context(|| format!("Failed to serialize '{}'", key))?;

        self.tree()?
            .insert(key, bytes)
            .with_context(|| format!("Failed to write '{}'", key))?;

        self.db.flush().context("Failed to flush database")?;

        tracing::debug!("Wrote collection {}", key);
        Ok(())
    }

    fn list<T>(&self, key: &str) -> Result<Vec<T>>
    where
        T: DeserializeOwned + Validate,
    {
        Ok(self.read(key)?.unwrap_or_default())
    }

    fn get<T>(&self, key: &str, id: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned + Validate + Keyed,
    {
        Ok(self.list::<T>(key)?.into_iter().find(|item| item.key() == id))
    }

    fn upsert<T>(&self, key: &str, item: &T) -> Result<()>
    where
        T: DeserializeOwned + Serialize + Validate + Keyed + Clone,
    {
        let mut items: Vec<T> = self.list(key)?;

        match items.iter().position(|existing| existing.key() == item.key()) {
            Some(index) => items[index] = item.clone(),
            None => items.push(item.clone()),
        }

        self.write(key, &items)
    }

    fn remove<T>(&self, key: &str, id: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned + Serialize + Validate + Keyed,
    {
        let mut items: Vec<T> = self.list(key)?;

        let Some(index) = items.iter().position(|item| item.key() == id) else {
            return Ok(None);
        };

        let removed = items.remove(index);
        self.write(key, &items)?;
        Ok(Some(removed))
    }
}

impl WorkoutStore for Storage {
    fn save_workout(&self, workout: &CompletedWorkout) -> Result<()> {
        Storage::save_workout(self, workout)
    }

    fn touch_template(&self, template_id: &str, used_at: DateTime<Utc>) -> Result<bool> {
        Storage::touch_template(self, template_id, used_at)
    }
}

impl Keyed for Exercise {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for WorkoutTemplate {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for CompletedWorkout {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for Goal {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for ProgressPhoto {
    fn key(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GoalKind, WeightUnit};

    fn create_test_storage() -> Result<Storage> {
        Storage::temporary()
    }

    #[test]
    fn test_initialize_defaults_runs_once() -> Result<()> {
        let storage = create_test_storage()?;

        assert!(storage.initialize_defaults()?);
        assert!(!storage.initialize_defaults()?);

        let templates = storage.list_templates()?;
        assert_eq!(templates.len(), 1);
        assert_eq!(templates[0].name, "Full Body Workout");
        assert!(!storage.list_exercises()?.is_empty());
        assert!(storage.list_workouts()?.is_empty());

        Ok(())
    }

    #[test]
    fn test_settings_default_when_absent() -> Result<()> {
        let storage = create_test_storage()?;
        assert_eq!(storage.get_settings()?, UserSettings::default());

        let mut settings = storage.get_settings()?;
        settings.weight_unit = WeightUnit::Kg;
        storage.save_settings(&settings)?;

        assert_eq!(storage.get_settings()?.weight_unit, WeightUnit::Kg);
        Ok(())
    }

    #[test]
    fn test_upsert_replaces_by_id() -> Result<()> {
        let storage = create_test_storage()?;

        let mut exercise = Exercise::new("Squat", vec!["quads".to_string()]);
        storage.save_exercise(&exercise)?;

        exercise.name = "Back Squat".to_string();
        storage.save_exercise(&exercise)?;

        let exercises = storage.list_exercises()?;
        assert_eq!(exercises.len(), 1);
        assert_eq!(exercises[0].name, "Back Squat");

        assert!(storage.delete_exercise(&exercise.id)?);
        assert!(!storage.delete_exercise(&exercise.id)?);
        Ok(())
    }

    #[test]
    fn test_touch_template() -> Result<()> {
        let storage = create_test_storage()?;
        let template = WorkoutTemplate::new("Pull");
        storage.save_template(&template)?;

        let now = Utc::now();
        assert!(storage.touch_template(&template.id, now)?);
        assert!(!storage.touch_template("missing", now)?);

        let stored = storage.get_template(&template.id)?.unwrap();
        assert_eq!(stored.last_used, Some(now));
        Ok(())
    }

    #[test]
    fn test_find_template_by_name() -> Result<()> {
        let storage = create_test_storage()?;
        let template = WorkoutTemplate::new("Leg Day");
        storage.save_template(&template)?;

        let found = storage.find_template("leg day")?.unwrap();
        assert_eq!(found.id, template.id);
        assert!(storage.find_template("arm day")?.is_none());
        Ok(())
    }

    #[test]
    fn test_complete_goal() -> Result<()> {
        let storage = create_test_storage()?;
        let goal = Goal::new(GoalKind::BodyWeight, 170.0, Some("lbs".to_string()));
        storage.save_goal(&goal)?;

        storage.complete_goal(&goal.id)?;

        assert!(storage.list_goals(false)?.is_empty());
        assert_eq!(storage.list_goals(true)?.len(), 1);
        assert!(storage.complete_goal("missing").is_err());
        Ok(())
    }

    #[test]
    fn test_corrupt_collection_surfaces_error() -> Result<()> {
        let storage = create_test_storage()?;
        storage
            .tree()?
            .insert(WORKOUTS_KEY, br#"{"version":7,"data":[]}"#.to_vec())?;

        assert!(storage.list_workouts().is_err());
        assert!(storage.delete_key(WORKOUTS_KEY)?);
        assert!(storage.list_workouts()?.is_empty());
        Ok(())
    }
}
