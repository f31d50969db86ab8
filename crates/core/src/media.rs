//! Image upload rules: allowed types, size limit, naming and public paths.
//!
//! The file-system side lives in the API crate's media store; this module
//! only decides whether an upload is acceptable and where it belongs.

use std::path::{Component, Path, PathBuf};

use crate::error::CoreError;

/// Default maximum accepted image size (5 MiB).
pub const DEFAULT_MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;

/// Accepted image extensions (lowercase, without the dot).
pub const ALLOWED_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// Declared content types must start with this marker.
pub const IMAGE_CONTENT_TYPE_PREFIX: &str = "image/";

/// Directory below the web root that holds every uploaded image.
pub const IMAGES_DIR: &str = "images";

/// Image folder for news articles.
pub const NEWS_IMAGE_FOLDER: &str = "news";

/// Image folder for projects.
pub const PROJECT_IMAGE_FOLDER: &str = "projects";

/// An uploaded file as received from a form.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// Client-supplied file name; only its extension is kept.
    pub file_name: String,
    /// Declared `Content-Type` of the part.
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Lowercased extension of the client file name, if any.
    pub fn extension(&self) -> Option<String> {
        Path::new(&self.file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
    }
}

/// Type check only: non-empty, allowed extension, image content type.
/// Size is deliberately not considered here.
pub fn is_valid_image(upload: &ImageUpload) -> bool {
    if upload.is_empty() {
        return false;
    }
    let extension_ok = upload
        .extension()
        .is_some_and(|ext| ALLOWED_IMAGE_EXTENSIONS.contains(&ext.as_str()));
    extension_ok
        && upload
            .content_type
            .to_ascii_lowercase()
            .starts_with(IMAGE_CONTENT_TYPE_PREFIX)
}

/// Full acceptance check, in order: empty, type, size.
pub fn validate_upload(upload: &ImageUpload, max_bytes: u64) -> Result<(), CoreError> {
    if upload.is_empty() {
        return Err(CoreError::Validation("Image file is empty".into()));
    }
    if !is_valid_image(upload) {
        return Err(CoreError::UnsupportedMediaType(format!(
            "Unsupported image '{}'. Allowed: .jpg, .jpeg, .png, .webp",
            upload.file_name
        )));
    }
    if upload.len() > max_bytes {
        return Err(CoreError::PayloadTooLarge(format!(
            "Image exceeds the maximum size of {} MB",
            max_bytes / 1024 / 1024
        )));
    }
    Ok(())
}

/// Folder names are single lowercase path segments.
pub fn validate_folder(folder: &str) -> Result<(), CoreError> {
    let ok = !folder.is_empty()
        && folder
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
    if ok {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid image folder '{folder}'"
        )))
    }
}

/// Collision-free stored file name: random UUID plus the original extension.
pub fn generate_file_name(extension: &str) -> String {
    format!("{}.{extension}", uuid::Uuid::new_v4())
}

/// Public path returned to callers and stored on the entity.
pub fn public_path(folder: &str, file_name: &str) -> String {
    format!("/{IMAGES_DIR}/{folder}/{file_name}")
}

/// Map a stored public path back to a path relative to the web root.
///
/// Returns `None` for anything outside `images/` or containing traversal,
/// root or prefix components.
pub fn storage_path(public: &str) -> Option<PathBuf> {
    let relative = Path::new(public.trim().trim_start_matches('/'));
    let mut components = relative.components();
    match components.next() {
        Some(Component::Normal(first)) if first == IMAGES_DIR => {}
        _ => return None,
    }
    let mut depth = 0;
    for component in components {
        match component {
            Component::Normal(_) => depth += 1,
            _ => return None,
        }
    }
    (depth > 0).then(|| relative.to_path_buf())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn upload(name: &str, content_type: &str, size: usize) -> ImageUpload {
        ImageUpload {
            file_name: name.to_string(),
            content_type: content_type.to_string(),
            bytes: vec![0xAB; size],
        }
    }

    #[test]
    fn accepts_allowed_extensions_case_insensitively() {
        for name in ["a.jpg", "a.JPEG", "photo.png", "x.y.webp"] {
            assert!(is_valid_image(&upload(name, "image/png", 10)), "{name}");
        }
    }

    #[test]
    fn gif_is_rejected_regardless_of_size() {
        assert!(!is_valid_image(&upload("anim.gif", "image/gif", 1)));
        assert!(!is_valid_image(&upload("anim.gif", "image/gif", 1024)));
        assert_matches!(
            validate_upload(&upload("anim.gif", "image/gif", 10), DEFAULT_MAX_IMAGE_BYTES),
            Err(CoreError::UnsupportedMediaType(_))
        );
    }

    #[test]
    fn non_image_content_type_is_rejected() {
        assert!(!is_valid_image(&upload("a.png", "application/pdf", 10)));
        assert!(!is_valid_image(&upload("noext", "image/png", 10)));
    }

    #[test]
    fn empty_file_is_invalid_input() {
        assert!(!is_valid_image(&upload("a.png", "image/png", 0)));
        assert_matches!(
            validate_upload(&upload("a.png", "image/png", 0), DEFAULT_MAX_IMAGE_BYTES),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn oversized_valid_image_fails_the_size_check_specifically() {
        let big = upload("big.jpg", "image/jpeg", 6 * 1024 * 1024);
        assert!(is_valid_image(&big));
        assert_matches!(
            validate_upload(&big, DEFAULT_MAX_IMAGE_BYTES),
            Err(CoreError::PayloadTooLarge(_))
        );
    }

    #[test]
    fn exactly_at_limit_is_accepted() {
        let edge = upload("edge.webp", "image/webp", DEFAULT_MAX_IMAGE_BYTES as usize);
        assert!(validate_upload(&edge, DEFAULT_MAX_IMAGE_BYTES).is_ok());
    }

    #[test]
    fn generated_names_are_unique_and_keep_extension() {
        let a = generate_file_name("png");
        let b = generate_file_name("png");
        assert_ne!(a, b);
        assert!(a.ends_with(".png"));
    }

    #[test]
    fn public_path_round_trips_to_storage_path() {
        let public = public_path(NEWS_IMAGE_FOLDER, "abc.png");
        assert_eq!(public, "/images/news/abc.png");
        assert_eq!(
            storage_path(&public),
            Some(PathBuf::from("images/news/abc.png"))
        );
    }

    #[test]
    fn storage_path_rejects_escapes() {
        assert_eq!(storage_path("/images/../secrets.txt"), None);
        assert_eq!(storage_path("/etc/passwd"), None);
        assert_eq!(storage_path("/images"), None);
        assert_eq!(storage_path(""), None);
        assert_eq!(storage_path("/images/news/./x.png"), Some(PathBuf::from("images/news/x.png")));
    }

    #[test]
    fn folder_names_are_single_safe_segments() {
        assert!(validate_folder(NEWS_IMAGE_FOLDER).is_ok());
        assert!(validate_folder(PROJECT_IMAGE_FOLDER).is_ok());
        assert!(validate_folder("../x").is_err());
        assert!(validate_folder("").is_err());
        assert!(validate_folder("News").is_err());
    }
}
