//! On-disk image storage below the configured web root.
//!
//! Saved files live at `<web_root>/images/<folder>/<uuid>.<ext>` and are
//! referenced by their public path (`/images/<folder>/<uuid>.<ext>`).

use std::path::PathBuf;

use nps_core::error::CoreError;
use nps_core::media::{
    generate_file_name, public_path, storage_path, validate_folder, validate_upload, ImageUpload,
    IMAGES_DIR,
};

/// Result of a best-effort image removal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// No path was stored on the entity.
    Skipped,
    /// The path was valid but the file was already gone.
    Missing,
    /// The stored path points outside the images directory.
    Rejected,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct MediaStore {
    web_root: PathBuf,
    max_image_bytes: u64,
}

impl MediaStore {
    pub fn new(web_root: PathBuf, max_image_bytes: u64) -> Self {
        Self {
            web_root,
            max_image_bytes,
        }
    }

    /// Validate and persist an upload, returning its public path.
    pub async fn save_image(&self, upload: &ImageUpload, folder: &str) -> Result<String, CoreError> {
        validate_upload(upload, self.max_image_bytes)?;
        validate_folder(folder)?;

        let extension = upload
            .extension()
            .ok_or_else(|| CoreError::UnsupportedMediaType("Image has no extension".into()))?;
        let file_name = generate_file_name(&extension);

        let dir = self.web_root.join(IMAGES_DIR).join(folder);
        tokio::fs::create_dir_all(&dir).await.map_err(|e| {
            CoreError::Internal(format!("Failed to create image directory: {e}"))
        })?;

        let target = dir.join(&file_name);
        tokio::fs::write(&target, &upload.bytes)
            .await
            .map_err(|e| CoreError::Internal(format!("Failed to write image: {e}")))?;

        tracing::info!(path = %target.display(), bytes = upload.len(), "Image saved");
        Ok(public_path(folder, &file_name))
    }

    /// Remove a previously stored image. Never fails; the outcome is logged.
    pub async fn delete_image(&self, public: Option<&str>) -> DeleteOutcome {
        let Some(public) = public.map(str::trim).filter(|p| !p.is_empty()) else {
            return DeleteOutcome::Skipped;
        };
        let Some(relative) = storage_path(public) else {
            tracing::warn!(path = %public, "Refusing to delete image outside images directory");
            return DeleteOutcome::Rejected;
        };

        let target = self.web_root.join(relative);
        match tokio::fs::remove_file(&target).await {
            Ok(()) => {
                tracing::info!(path = %target.display(), "Image deleted");
                DeleteOutcome::Deleted
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %target.display(), "Image already absent");
                DeleteOutcome::Missing
            }
            Err(e) => {
                tracing::warn!(path = %target.display(), error = %e, "Failed to delete image");
                DeleteOutcome::Failed(e.to_string())
            }
        }
    }
}

/// Image column change staged by an edit.
///
/// The replacement (if any) is written before the row update. After the
/// update, call [`ImageEdit::commit`] on success or [`ImageEdit::rollback`]
/// on failure so exactly one of the two files survives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageEdit {
    /// Value to store in the row's `image_url` column.
    pub image_url: Option<String>,
    /// File written for this edit.
    saved: Option<String>,
    /// File the row referenced before the edit, if it is being dropped.
    superseded: Option<String>,
}

impl ImageEdit {
    /// Decide the new image for a row currently pointing at `current`.
    ///
    /// An upload wins over `remove`; with neither the current image stays.
    pub async fn stage(
        media: &MediaStore,
        current: Option<String>,
        upload: Option<&ImageUpload>,
        remove: bool,
        folder: &str,
    ) -> Result<Self, CoreError> {
        match upload {
            Some(upload) => {
                let path = media.save_image(upload, folder).await?;
                Ok(Self {
                    image_url: Some(path.clone()),
                    saved: Some(path),
                    superseded: current,
                })
            }
            None if remove => Ok(Self {
                image_url: None,
                saved: None,
                superseded: current,
            }),
            None => Ok(Self {
                image_url: current,
                saved: None,
                superseded: None,
            }),
        }
    }

    /// The row was written: drop the superseded file.
    pub async fn commit(self, media: &MediaStore) {
        if self.superseded.is_some() && self.superseded != self.image_url {
            media.delete_image(self.superseded.as_deref()).await;
        }
    }

    /// The row was not written: drop the file saved for this edit.
    pub async fn rollback(self, media: &MediaStore) {
        media.delete_image(self.saved.as_deref()).await;
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use nps_core::media::{DEFAULT_MAX_IMAGE_BYTES, NEWS_IMAGE_FOLDER};

    use super::*;

    fn png(size: usize) -> ImageUpload {
        ImageUpload {
            file_name: "cover.PNG".into(),
            content_type: "image/png".into(),
            bytes: vec![7; size],
        }
    }

    #[tokio::test]
    async fn saves_under_folder_and_deletes_again() {
        let root = tempfile::tempdir().unwrap();
        let store = MediaStore::new(root.path().to_path_buf(), DEFAULT_MAX_IMAGE_BYTES);

        let public = store.save_image(&png(32), NEWS_IMAGE_FOLDER).await.unwrap();
        assert!(public.starts_with("/images/news/"));
        assert!(public.ends_with(".png"));

        let on_disk = root.path().join(public.trim_start_matches('/'));
        assert_eq!(std::fs::read(&on_disk).unwrap().len(), 32);

        assert_eq!(store.delete_image(Some(&public)).await, DeleteOutcome::Deleted);
        assert!(!on_disk.exists());
        assert_eq!(store.delete_image(Some(&public)).await, DeleteOutcome::Missing);
    }

    #[tokio::test]
    async fn rejected_uploads_write_nothing() {
        let root = tempfile::tempdir().unwrap();
        let store = MediaStore::new(root.path().to_path_buf(), 16);

        assert_matches!(
            store.save_image(&png(17), NEWS_IMAGE_FOLDER).await,
            Err(CoreError::PayloadTooLarge(_))
        );
        let gif = ImageUpload {
            file_name: "a.gif".into(),
            content_type: "image/gif".into(),
            bytes: vec![1; 4],
        };
        assert_matches!(
            store.save_image(&gif, NEWS_IMAGE_FOLDER).await,
            Err(CoreError::UnsupportedMediaType(_))
        );
        assert!(!root.path().join(IMAGES_DIR).exists());
    }

    #[tokio::test]
    async fn delete_ignores_blank_and_foreign_paths() {
        let root = tempfile::tempdir().unwrap();
        std::fs::write(root.path().join("keep.txt"), b"x").unwrap();
        let store = MediaStore::new(root.path().to_path_buf(), DEFAULT_MAX_IMAGE_BYTES);

        assert_eq!(store.delete_image(None).await, DeleteOutcome::Skipped);
        assert_eq!(store.delete_image(Some("  ")).await, DeleteOutcome::Skipped);
        assert_eq!(
            store.delete_image(Some("/images/../keep.txt")).await,
            DeleteOutcome::Rejected
        );
        assert!(root.path().join("keep.txt").exists());
    }

    #[tokio::test]
    async fn replacing_an_image_keeps_exactly_one_file() {
        let root = tempfile::tempdir().unwrap();
        let store = MediaStore::new(root.path().to_path_buf(), DEFAULT_MAX_IMAGE_BYTES);
        let old = store.save_image(&png(8), NEWS_IMAGE_FOLDER).await.unwrap();
        let exists = |p: &str| root.path().join(p.trim_start_matches('/')).exists();

        let edit = ImageEdit::stage(&store, Some(old.clone()), Some(&png(8)), false, NEWS_IMAGE_FOLDER)
            .await
            .unwrap();
        let new = edit.image_url.clone().unwrap();
        assert_ne!(new, old);
        edit.commit(&store).await;
        assert!(!exists(&old));
        assert!(exists(&new));

        let failed = ImageEdit::stage(&store, Some(new.clone()), Some(&png(8)), false, NEWS_IMAGE_FOLDER)
            .await
            .unwrap();
        let orphan = failed.image_url.clone().unwrap();
        failed.rollback(&store).await;
        assert!(!exists(&orphan));
        assert!(exists(&new));
    }

    #[tokio::test]
    async fn remove_flag_clears_and_no_input_keeps() {
        let root = tempfile::tempdir().unwrap();
        let store = MediaStore::new(root.path().to_path_buf(), DEFAULT_MAX_IMAGE_BYTES);
        let current = store.save_image(&png(8), NEWS_IMAGE_FOLDER).await.unwrap();

        let keep = ImageEdit::stage(&store, Some(current.clone()), None, false, NEWS_IMAGE_FOLDER)
            .await
            .unwrap();
        assert_eq!(keep.image_url.as_deref(), Some(current.as_str()));
        keep.commit(&store).await;
        assert!(root.path().join(current.trim_start_matches('/')).exists());

        let clear = ImageEdit::stage(&store, Some(current.clone()), None, true, NEWS_IMAGE_FOLDER)
            .await
            .unwrap();
        assert_eq!(clear.image_url, None);
        clear.commit(&store).await;
        assert!(!root.path().join(current.trim_start_matches('/')).exists());
    }
}
