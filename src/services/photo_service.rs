use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::models::{PhotoCategory, ProgressPhoto};
use crate::storage::Storage;

/// Progress photos: metadata in storage, images under `photos_dir`
pub struct PhotoService<'a> {
    storage: &'a Storage,
    photos_dir: PathBuf,
}

/// Earliest and latest photo of one category
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoComparison {
    pub before: ProgressPhoto,
    pub after: ProgressPhoto,
}

impl PhotoComparison {
    pub fn days_between(&self) -> i64 {
        (self.after.taken_at - self.before.taken_at).num_days()
    }
}

impl<'a> PhotoService<'a> {
    pub fn new(storage: &'a Storage, photos_dir: impl Into<PathBuf>) -> Self {
        Self {
            storage,
            photos_dir: photos_dir.into(),
        }
    }

    /// Copy an image into the photo directory and record it
    pub fn add_photo(
        &self,
        source: &Path,
        category: PhotoCategory,
        notes: Option<String>,
    ) -> Result<ProgressPhoto> {
        if !source.is_file() {
            anyhow::bail!("Image not found: {}", source.display());
        }

        std::fs::create_dir_all(&self.photos_dir).with_context(|| {
            format!("Failed to create photo directory {}", self.photos_dir.display())
        })?;

        let mut photo = ProgressPhoto::new(category, PathBuf::new(), notes);
        let file_name = match source.extension().and_then(|e| e.to_str()) {
            Some(ext) => format!("{}.{}", photo.id, ext.to_lowercase()),
            None => photo.id.clone(),
        };
        photo.image_path = self.photos_dir.join(file_name);

        std::fs::copy(source, &photo.image_path)
            .with_context(|| format!("Failed to copy {}", source.display()))?;

        if let Err(e) = self.storage.save_photo(&photo) {
            if let Err(cleanup) = std::fs::remove_file(&photo.image_path) {
                tracing::warn!(
                    "Could not remove unrecorded image {}: {}",
                    photo.image_path.display(),
                    cleanup
                );
            }
            return Err(e);
        }

        tracing::info!("Stored {} photo {}", photo.category, photo.id);
        Ok(photo)
    }

    /// Photos newest first, optionally of one category
    pub fn list_photos(&self, category: Option<PhotoCategory>) -> Result<Vec<ProgressPhoto>> {
        Ok(self
            .storage
            .list_photos()?
            .into_iter()
            .filter(|p| category.map_or(true, |c| p.category == c))
            .collect())
    }

    /// Remove a photo and its image file
    pub fn delete_photo(&self, id: &str) -> Result<bool> {
        let Some(photo) = self.storage.delete_photo(id)? else {
            return Ok(false);
        };

        if let Err(e) = std::fs::remove_file(&photo.image_path) {
            tracing::warn!(
                "Removed photo {} but could not delete {}: {}",
                photo.id,
                photo.image_path.display(),
                e
            );
        }

        Ok(true)
    }

    /// Earliest vs latest photo in a category; None with fewer than two photos
    pub fn compare(&self, category: PhotoCategory) -> Result<Option<PhotoComparison>> {
        let photos = self.list_photos(Some(category))?;
        if photos.len() < 2 {
            return Ok(None);
        }

        let before = photos.iter().min_by_key(|p| p.taken_at);
        let after = photos.iter().max_by_key(|p| p.taken_at);

        Ok(before.zip(after).map(|(before, after)| PhotoComparison {
            before: before.clone(),
            after: after.clone(),
        }))
    }
}
